//! Data model shared by the decoder, the classifier and the renderers.
//!
//! Fragments come in from the page decoder, lines and classified lines live
//! only inside one classification run, and the outline record is what goes
//! out.

mod fragment;
mod line;
mod outline;

pub use fragment::{style_from_font_name, BoundingBox, FragmentDocument, PageFragments, TextFragment};
pub use line::{ClassifiedLine, DiscardReason, Line, Role};
pub use outline::{HeadingLevel, OutlineEntry, OutlineResult};
