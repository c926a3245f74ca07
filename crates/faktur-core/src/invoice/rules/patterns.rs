//! Label patterns for the Faktur Pajak layout.
//!
//! Each catalog pattern has exactly one capture group and is compiled with
//! `.` matching line breaks. Several patterns rely on an earlier label (the
//! `Pengusaha Kena Pajak:` or `Pembeli Barang Kena Pajak` block header)
//! appearing before the label they capture.

use lazy_static::lazy_static;
use regex::Regex;

use super::extract::MatchFlags;

pub const KODE_FAKTUR: &str = r"Kode dan Nomor Seri Faktur Pajak:\s*(\d+)";

pub const NAMA_PKP: &str = r"Pengusaha Kena Pajak:\s*Nama\s*:\s*(.*?)\s*Alamat";

pub const ALAMAT_PKP: &str = r"Pengusaha Kena Pajak:.*?Alamat\s*:\s*(.*?)\s*NPWP";

pub const NPWP_PKP: &str = r"Pengusaha Kena Pajak:.*?NPWP\s*:\s*([0-9.]+)";

pub const NAMA_PEMBELI: &str = r"Pembeli Barang Kena Pajak.*?Nama\s*:\s*(.*?)\s*Alamat";

pub const ALAMAT_PEMBELI: &str = r"Pembeli Barang Kena Pajak.*?Alamat\s*:\s*(.*?)\s*#";

// The buyer's NPWP is the one directly followed by the NIK label.
pub const NPWP_PEMBELI: &str = r"NPWP\s*:\s*([0-9.]+)\s*NIK";

pub const REFERENSI: &str = r"Referensi:\s*(.*?)\n";

lazy_static! {
    pub static ref KODE_FAKTUR_PATTERN: Regex = MatchFlags::default().compile(KODE_FAKTUR).unwrap();
    pub static ref NAMA_PKP_PATTERN: Regex = MatchFlags::default().compile(NAMA_PKP).unwrap();
    pub static ref ALAMAT_PKP_PATTERN: Regex = MatchFlags::default().compile(ALAMAT_PKP).unwrap();
    pub static ref NPWP_PKP_PATTERN: Regex = MatchFlags::default().compile(NPWP_PKP).unwrap();
    pub static ref NAMA_PEMBELI_PATTERN: Regex = MatchFlags::default().compile(NAMA_PEMBELI).unwrap();
    pub static ref ALAMAT_PEMBELI_PATTERN: Regex = MatchFlags::default().compile(ALAMAT_PEMBELI).unwrap();
    pub static ref NPWP_PEMBELI_PATTERN: Regex = MatchFlags::default().compile(NPWP_PEMBELI).unwrap();
    pub static ref REFERENSI_PATTERN: Regex = MatchFlags::default().compile(REFERENSI).unwrap();

    // ", 17 Januari 2025" after the signing city
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r",\s*(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})"
    ).unwrap();

    // "#" followed by a run of exactly 22 digits
    pub static ref UNIT_ID_MARKER: Regex = Regex::new(
        r"#(\d{22})(?:\D|$)"
    ).unwrap();
}

/// Label that marks the line following a buyer unit identifier.
pub const NPWP_LABEL: &str = "NPWP";
