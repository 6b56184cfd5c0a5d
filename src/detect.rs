//! PDF header sniffing and input-file recognition.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header information read from the first bytes of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// Version string from the `%PDF-x.y` marker (e.g., "1.7")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const HEADER_LEN: usize = PDF_MAGIC.len() + 3;

/// Read and validate the header of a file on disk.
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; 16];
    let n = read_up_to(&mut file, &mut buf)?;
    sniff_header(&buf[..n])
}

/// Validate the header of an in-memory PDF.
///
/// Some producers emit a few junk bytes before the marker, so the marker
/// is accepted anywhere within the first 1024 bytes.
pub fn sniff_header(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(1024)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let rest = &data[start..];
    if rest.len() < HEADER_LEN {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&rest[PDF_MAGIC.len()..HEADER_LEN]).to_string();
    match version.as_bytes() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(PdfHeader { version })
        }
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Whether a path names a PDF by extension (case-insensitive).
///
/// Batch discovery uses this; the header itself is checked later, per
/// document, so a misnamed file fails on its own without stopping the batch.
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Check whether a file on disk carries a valid PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    read_header(path).is_ok()
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
