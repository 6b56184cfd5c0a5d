//! Test fixtures: small PDFs built in memory with lopdf, and fragment
//! documents built by hand.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_outline::{BoundingBox, FragmentDocument, PageFragments, TextFragment};

/// One text run placed on a page.
#[derive(Debug, Clone, Copy)]
pub struct Run {
    pub text: &'static str,
    pub size: f32,
    pub bold: bool,
    pub x: f32,
    pub y: f32,
}

pub fn run(text: &'static str, size: f32, bold: bool, x: f32, y: f32) -> Run {
    Run {
        text,
        size,
        bold,
        x,
        y,
    }
}

/// Build a PDF whose page `i` shows `pages[i]`, returned as bytes.
pub fn build_pdf(pages: &[Vec<Run>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids = Vec::new();
    for runs in pages {
        let mut operations = Vec::new();
        for r in runs {
            let font = if r.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), Object::Real(r.size)],
            ));
            operations.push(Operation::new("Td", vec![Object::Real(r.x), Object::Real(r.y)]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(r.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document saves");
    bytes
}

const BODY: [&str; 4] = [
    "This report describes the results of the year in some detail.",
    "Revenue grew steadily while operating costs stayed mostly flat.",
    "Several new offices opened and the team grew to forty people.",
    "The sections below walk through each of these points in turn.",
];

/// Two-page report: a 24pt title, 16pt sections, 13pt subsections, 11pt
/// body text and a bare page number in each footer.
pub fn report_pages() -> Vec<Vec<Run>> {
    let mut first = vec![
        run("Annual Report", 24.0, true, 72.0, 760.0),
        run("Introduction", 16.0, true, 72.0, 700.0),
    ];
    first.extend(body_runs(670.0));
    first.push(run("Background", 13.0, true, 72.0, 560.0));
    first.extend(body_runs(530.0));
    first.push(run("1", 10.0, false, 297.0, 30.0));

    let mut second = vec![run("Methods", 16.0, true, 72.0, 760.0)];
    second.extend(body_runs(730.0));
    second.push(run("Data Collection", 13.0, true, 72.0, 620.0));
    second.extend(body_runs(590.0));
    second.push(run("2", 10.0, false, 297.0, 30.0));

    vec![first, second]
}

fn body_runs(top: f32) -> Vec<Run> {
    BODY.iter()
        .enumerate()
        .map(|(i, text)| run(text, 11.0, false, 72.0, top - 14.0 * i as f32))
        .collect()
}

/// A fragment with a bounding box derived from its baseline position.
pub fn fragment(text: &str, size: f32, bold: bool, page: u32, x: f32, y: f32) -> TextFragment {
    let width = text.chars().count() as f32 * size * 0.5;
    TextFragment::new(
        text,
        size,
        page,
        BoundingBox::new(x, y - 0.2 * size, x + width, y + 0.8 * size),
    )
    .with_bold(bold)
}

/// Assemble pages of fragments into a document, numbering pages from 1.
pub fn document(pages: Vec<Vec<TextFragment>>) -> FragmentDocument {
    let mut doc = FragmentDocument::new();
    for (i, fragments) in pages.into_iter().enumerate() {
        doc.add_page(PageFragments::with_fragments(i as u32 + 1, fragments));
    }
    doc
}

/// Body text filler for fragment-level tests.
pub fn body_fragments(page: u32, top: f32, lines: usize) -> Vec<TextFragment> {
    (0..lines)
        .map(|i| {
            fragment(
                BODY[i % BODY.len()],
                11.0,
                false,
                page,
                72.0,
                top - 14.0 * i as f32,
            )
        })
        .collect()
}
