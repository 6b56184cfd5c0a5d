//! Integration tests for the classification pipeline, driven by hand-built
//! fragment documents.

mod common;

use common::{body_fragments, document, fragment};
use pdf_outline::classify::{classify_document, Classifier};
use pdf_outline::render::{to_json, JsonFormat};
use pdf_outline::{
    outline_from_fragments, ClassifierConfig, DiscardReason, HeadingLevel, OutlineEntry, Role,
    TitlePolicy,
};

#[test]
fn test_single_size_document_has_no_outline() {
    let doc = document(vec![body_fragments(1, 700.0, 8), body_fragments(2, 700.0, 8)]);

    let outline = outline_from_fragments(&doc);
    assert_eq!(outline.title, "");
    assert!(outline.outline.is_empty());
}

#[test]
fn test_title_only_document() {
    let mut page = vec![fragment("Annual Report 2024", 24.0, false, 1, 72.0, 760.0)];
    page.extend(body_fragments(1, 700.0, 6));
    let doc = document(vec![page, body_fragments(2, 760.0, 6)]);

    let outline = outline_from_fragments(&doc);
    assert_eq!(outline.title, "Annual Report 2024");
    assert!(outline.outline.is_empty());
}

#[test]
fn test_sections_across_pages() {
    let mut first = vec![fragment("Introduction", 18.0, false, 1, 72.0, 760.0)];
    first.extend(body_fragments(1, 730.0, 4));
    first.push(fragment("Background", 15.0, false, 1, 72.0, 640.0));
    first.extend(body_fragments(1, 610.0, 4));

    let second = body_fragments(2, 760.0, 8);

    let mut third = vec![fragment("Methods", 18.0, false, 3, 72.0, 760.0)];
    third.extend(body_fragments(3, 730.0, 4));

    let outline = outline_from_fragments(&document(vec![first, second, third]));

    // The largest size recurs on page 3, so it is a heading level, not a title
    assert_eq!(outline.title, "");
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Introduction", 1),
            OutlineEntry::new(HeadingLevel::H2, "Background", 1),
            OutlineEntry::new(HeadingLevel::H1, "Methods", 3),
        ]
    );
}

#[test]
fn test_title_removed_from_heading_ranking() {
    let mut first = vec![
        fragment("Field Guide", 28.0, true, 1, 72.0, 780.0),
        fragment("Birds", 18.0, true, 1, 72.0, 720.0),
    ];
    first.extend(body_fragments(1, 690.0, 4));
    first.push(fragment("Waders", 14.0, true, 1, 72.0, 600.0));
    first.extend(body_fragments(1, 570.0, 4));

    let outline = outline_from_fragments(&document(vec![first]));
    assert_eq!(outline.title, "Field Guide");
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Birds", 1),
            OutlineEntry::new(HeadingLevel::H2, "Waders", 1),
        ]
    );
}

#[test]
fn test_page_number_footer_at_heading_size_is_discarded() {
    let pages: Vec<_> = (1..=3)
        .map(|n| {
            let title = format!("Chapter {}", n);
            let mut page = vec![fragment(&title, 18.0, true, n, 72.0, 760.0)];
            page.extend(body_fragments(n, 730.0, 6));
            page.push(fragment("7", 18.0, false, n, 297.0, 30.0));
            page
        })
        .collect();
    let doc = document(pages);

    let outline = outline_from_fragments(&doc);
    assert!(outline.outline.iter().all(|e| e.text != "7"));
    assert_eq!(outline.outline.len(), 3);

    let analysis = Classifier::default().analyze(&doc);
    let footers: Vec<_> = analysis.lines.iter().filter(|l| l.line.text == "7").collect();
    assert_eq!(footers.len(), 3);
    assert!(footers
        .iter()
        .all(|l| l.role == Role::Discard(DiscardReason::PageNumber)));
}

const SECTIONS: [&str; 4] = ["Overview", "Sales", "Costs", "Outlook"];

#[test]
fn test_running_header_never_in_outline() {
    let pages: Vec<_> = (1..=4)
        .map(|n| {
            let mut page = vec![
                fragment("ACME Corp Quarterly", 14.0, false, n, 72.0, 810.0),
                fragment(SECTIONS[n as usize - 1], 16.0, true, n, 72.0, 760.0),
            ];
            page.extend(body_fragments(n, 730.0, 6));
            page
        })
        .collect();
    let doc = document(pages);

    let outline = outline_from_fragments(&doc);
    let texts: Vec<&str> = outline.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Overview", "Sales", "Costs", "Outlook"]);
    assert!(outline.outline.iter().all(|e| e.level == HeadingLevel::H1));

    let analysis = Classifier::default().analyze(&doc);
    assert!(analysis
        .lines
        .iter()
        .filter(|l| l.line.text == "ACME Corp Quarterly")
        .all(|l| l.role == Role::Discard(DiscardReason::RunningHeader)));
    // The header size never enters the ranking
    assert_eq!(analysis.profile.heading_sizes(), vec![16.0]);
}

#[test]
fn test_overlong_line_at_heading_size_is_body_noise() {
    let long = "This sentence is printed in a large font but it keeps going far longer than any heading would ever reasonably run on a page";
    let mut page = vec![
        fragment("Summary", 16.0, true, 1, 72.0, 760.0),
        fragment(long, 16.0, false, 1, 72.0, 720.0),
    ];
    page.extend(body_fragments(1, 690.0, 6));
    let mut second = vec![fragment("Details", 16.0, true, 2, 72.0, 760.0)];
    second.extend(body_fragments(2, 730.0, 6));

    let outline = outline_from_fragments(&document(vec![page, second]));
    let texts: Vec<&str> = outline.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Summary", "Details"]);
}

#[test]
fn test_more_than_three_sizes_fold_into_h3() {
    let sizes = [22.0, 19.0, 16.0, 14.0];
    let names = ["Part", "Chapter", "Section", "Clause"];
    let pages: Vec<_> = (1..=2)
        .map(|n| {
            let mut page = Vec::new();
            let mut y = 780.0;
            for (size, name) in sizes.iter().zip(names) {
                page.push(fragment(&format!("{} {}", name, n), *size, false, n, 72.0, y));
                page.extend(body_fragments(n, y - 28.0, 2));
                y -= 90.0;
            }
            page
        })
        .collect();

    let outline = outline_from_fragments(&document(pages));
    let levels: Vec<HeadingLevel> = outline.outline.iter().map(|e| e.level).collect();
    assert_eq!(
        levels,
        vec![
            HeadingLevel::H1,
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H3,
            HeadingLevel::H1,
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H3,
        ]
    );
}

#[test]
fn test_split_heading_fragments_are_joined() {
    let mut page = vec![
        fragment("Getting", 16.0, true, 1, 72.0, 760.0),
        fragment("Started", 16.0, true, 1, 72.0 + 7.0 * 8.0 + 4.0, 760.4),
    ];
    page.extend(body_fragments(1, 730.0, 6));
    let mut second = vec![fragment("Next Steps", 16.0, true, 2, 72.0, 760.0)];
    second.extend(body_fragments(2, 730.0, 6));

    let outline = outline_from_fragments(&document(vec![page, second]));
    assert_eq!(outline.outline[0].text, "Getting Started");
    assert_eq!(outline.outline[1].text, "Next Steps");
}

#[test]
fn test_order_follows_page_then_position() {
    // Fragments arrive bottom-up; the outline must still read top-down
    let mut first = body_fragments(1, 500.0, 6);
    first.push(fragment("Second", 16.0, true, 1, 72.0, 600.0));
    first.push(fragment("First", 16.0, true, 1, 72.0, 760.0));
    let mut second = vec![fragment("Third", 16.0, true, 2, 72.0, 760.0)];
    second.extend(body_fragments(2, 730.0, 6));

    let outline = outline_from_fragments(&document(vec![first, second]));
    let order: Vec<(&str, u32)> = outline
        .outline
        .iter()
        .map(|e| (e.text.as_str(), e.page))
        .collect();
    assert_eq!(order, vec![("First", 1), ("Second", 1), ("Third", 2)]);
}

#[test]
fn test_classification_is_deterministic() {
    let mut first = vec![
        fragment("Handbook", 26.0, true, 1, 72.0, 780.0),
        fragment("Scope", 16.0, true, 1, 72.0, 720.0),
    ];
    first.extend(body_fragments(1, 690.0, 5));
    first.push(fragment("Terms", 13.0, true, 1, 72.0, 600.0));
    let mut second = vec![fragment("Usage", 16.0, true, 2, 72.0, 760.0)];
    second.extend(body_fragments(2, 730.0, 5));
    let doc = document(vec![first, second]);

    let a = outline_from_fragments(&doc);
    let b = outline_from_fragments(&doc);
    assert_eq!(a, b);
    assert_eq!(
        to_json(&a, JsonFormat::Compact).unwrap(),
        to_json(&b, JsonFormat::Compact).unwrap()
    );

    let distinct: std::collections::BTreeSet<_> = a.outline.iter().map(|e| e.level).collect();
    assert!(distinct.len() <= 3);
}

#[test]
fn test_title_policy_breaks_ties() {
    let mut page = vec![
        fragment("Plain Banner", 24.0, false, 1, 72.0, 790.0),
        fragment("Bold Banner", 24.0, true, 1, 72.0, 740.0),
    ];
    page.extend(body_fragments(1, 700.0, 6));
    let doc = document(vec![page]);

    let topmost = classify_document(&doc, &ClassifierConfig::default());
    assert_eq!(topmost.title, "Plain Banner");

    let bold = classify_document(
        &doc,
        &ClassifierConfig::default().with_title_policy(TitlePolicy::BoldFirst),
    );
    assert_eq!(bold.title, "Bold Banner");

    // The losing candidate shares the title size, which is no longer ranked
    assert!(topmost.outline.is_empty());
}

#[test]
fn test_empty_document() {
    let doc = document(vec![vec![], vec![fragment("   ", 12.0, false, 2, 72.0, 700.0)]]);
    let outline = outline_from_fragments(&doc);
    assert!(outline.is_empty());
}
