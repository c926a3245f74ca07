pub mod config;
pub mod documents;
pub mod extract;
pub mod fields;
pub mod rename;
