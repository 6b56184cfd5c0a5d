//! PDF parsing module: the page decoder feeding the classifier.

pub mod backend;
mod extract;
mod options;
mod pdf_parser;

pub use backend::{LopdfBackend, PdfBackend};
pub use extract::FragmentExtractor;
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_parser::PdfParser;
