//! # pdf-outline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! A PDF carries no notion of "heading": this crate infers one from
//! typography. Text fragments decoded from each page are merged into lines,
//! a character-weighted font-size histogram fixes the body size, and sizes
//! above it are ranked into three heading levels after page furniture
//! (page numbers, running headers, boilerplate) has been filtered out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typographic inference**: title plus H1–H3 from size, weight and indent
//! - **Noise rejection**: page numbers, running headers/footers, long lines
//! - **Configurable thresholds**: [`ClassifierConfig`], loadable from JSON
//! - **Batch processing**: whole directories on a rayon pool, see [`batch`]

pub mod batch;
pub mod classify;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

pub use batch::{BatchEvent, BatchOptions, BatchReport, DocumentFailure};
pub use classify::{Analysis, Classifier, ClassifierConfig, FontProfile, TitleFallback, TitlePolicy};
pub use detect::{has_pdf_extension, is_pdf};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, ClassifiedLine, DiscardReason, FragmentDocument, HeadingLevel, Line,
    OutlineEntry, OutlineResult, PageFragments, Role, TextFragment,
};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file with default settings.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline;
///
/// let outline = extract_outline("report.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    OutlineExtractor::new().extract(path)
}

/// Extract the outline of a PDF file with custom parsing and thresholds.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{extract_outline_with_options, ClassifierConfig, ParseOptions};
///
/// let config = ClassifierConfig::new().with_max_heading_chars(80);
/// let outline = extract_outline_with_options("report.pdf", ParseOptions::new().lenient(), &config)?;
/// # Ok::<(), pdf_outline::Error>(())
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
    config: &ClassifierConfig,
) -> Result<OutlineResult> {
    OutlineExtractor::new()
        .with_parse_options(options)
        .with_config(config.clone())
        .extract(path)
}

/// Extract the outline of an in-memory PDF.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<OutlineResult> {
    OutlineExtractor::new().extract_bytes(data)
}

/// Classify fragments supplied by some other decoder.
///
/// Never fails: a document without usable text yields an empty title and
/// an empty outline.
pub fn outline_from_fragments(doc: &FragmentDocument) -> OutlineResult {
    Classifier::default().classify(doc)
}

/// Decode a PDF file into per-page fragments without classifying them.
pub fn parse_fragments<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<FragmentDocument> {
    PdfParser::open_with_options(path, options)?.parse()
}

/// Builder bundling decoding options with classifier thresholds.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{OutlineExtractor, TitlePolicy};
///
/// let outline = OutlineExtractor::new()
///     .lenient()
///     .with_title_policy(TitlePolicy::BoldFirst)
///     .with_file_name_title()
///     .extract("report.pdf")?;
/// # Ok::<(), pdf_outline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    parse_options: ParseOptions,
    classifier: Classifier,
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the classifier thresholds.
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.classifier = Classifier::new(config);
        self
    }

    /// Set the Title tie-break policy.
    pub fn with_title_policy(self, policy: TitlePolicy) -> Self {
        let config = self.config().clone().with_title_policy(policy);
        self.with_config(config)
    }

    /// Fall back to a title derived from the file name.
    pub fn with_file_name_title(self) -> Self {
        let config = self.config().clone().with_title_fallback(TitleFallback::FileName);
        self.with_config(config)
    }

    pub fn config(&self) -> &ClassifierConfig {
        self.classifier.config()
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Decode and classify a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<OutlineResult> {
        let path = path.as_ref();
        let doc = PdfParser::open_with_options(path, self.parse_options.clone())?.parse()?;
        Ok(self.classifier.classify_named(&doc, Some(path)))
    }

    /// Decode and classify an in-memory PDF.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<OutlineResult> {
        let doc = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?.parse()?;
        Ok(self.classifier.classify(&doc))
    }

    /// Decode a PDF file and keep every intermediate classification result.
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> Result<Analysis> {
        let doc = PdfParser::open_with_options(path, self.parse_options.clone())?.parse()?;
        Ok(self.classifier.analyze(&doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_builder() {
        let extractor = OutlineExtractor::new()
            .lenient()
            .with_title_policy(TitlePolicy::BoldFirst)
            .with_file_name_title();

        assert_eq!(extractor.parse_options().error_mode, ErrorMode::Lenient);
        assert_eq!(extractor.config().title_policy, TitlePolicy::BoldFirst);
        assert_eq!(extractor.config().title_fallback, TitleFallback::FileName);
    }

    #[test]
    fn test_extract_bytes_empty_data() {
        let result = extract_outline_from_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_bytes_too_short() {
        let result = extract_outline_from_bytes(b"%PDF");
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_bytes_bad_version() {
        let result = extract_outline_from_bytes(b"%PDF-x.y garbage");
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_extract_missing_file() {
        let result = extract_outline("/nonexistent/path/file.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_outline_from_empty_fragments() {
        let outline = outline_from_fragments(&FragmentDocument::new());
        assert_eq!(outline, OutlineResult::empty());
    }
}
