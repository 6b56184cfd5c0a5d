//! PDF document parser: pages to text fragments.

use std::io::Read;
use std::path::Path;

use crate::detect::{read_header, sniff_header};
use crate::error::{Error, Result};
use crate::model::{FragmentDocument, PageFragments};

use super::backend::{LopdfBackend, PdfBackend};
use super::extract::FragmentExtractor;
use super::options::{ErrorMode, PageSelection, ParseOptions};

/// PDF document parser.
pub struct PdfParser<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ParseOptions,
}

impl PdfParser<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = read_header(path)?;
        log::debug!("{}: {}", path.display(), header);

        let backend = LopdfBackend::load_file(path)?;
        Self::loaded(backend, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        sniff_header(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Self::loaded(backend, options)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Still encrypted after loading means the empty user password failed.
    fn loaded(backend: LopdfBackend, options: ParseOptions) -> Result<Self> {
        if backend.is_encrypted() {
            return Err(Error::Encrypted);
        }
        log::debug!(
            "loaded PDF {} ({} pages)",
            backend.version(),
            backend.pages().len()
        );
        Ok(Self { backend, options })
    }
}

impl<B: PdfBackend> PdfParser<B> {
    /// Wrap an already-loaded backend.
    pub fn with_backend(backend: B, options: ParseOptions) -> Self {
        Self { backend, options }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Decode the selected pages into fragments.
    ///
    /// In strict mode the first undecodable page fails the whole document
    /// with [`Error::Decode`]; in lenient mode that page is kept empty.
    pub fn parse(&self) -> Result<FragmentDocument> {
        let pages = self.backend.pages();
        let total = pages.len() as u32;

        if let PageSelection::Pages(list) = &self.options.pages {
            if let Some(&missing) = list.iter().find(|p| **p > total) {
                return Err(Error::PageOutOfRange(missing, total));
            }
        }

        let mut document = FragmentDocument::new();
        for (&number, &page_id) in &pages {
            if !self.options.pages.includes(number) {
                continue;
            }

            let fragments = FragmentExtractor::new(&self.backend, page_id, number)
                .and_then(|extractor| extractor.extract());

            match fragments {
                Ok(fragments) => {
                    log::trace!("page {}: {} fragments", number, fragments.len());
                    document.add_page(PageFragments::with_fragments(number, fragments));
                }
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to extract text from page {}: {}", number, e);
                    document.add_page(PageFragments::new(number));
                }
                Err(e) => return Err(Error::Decode(format!("page {}: {}", number, e))),
            }
        }

        Ok(document)
    }
}
