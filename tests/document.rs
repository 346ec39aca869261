// File: tests/document.rs
use bidscope::document::{RenderOptions, render};
use bidscope::model::{Bid, ClientInfo, CompanyInfo, parse_scope};
use unicode_width::UnicodeWidthStr;

const SCOPE: &str = "\
Kitchen:
- Remove existing cabinets - 8 hours
- Install new cabinets - $8000, 24 hours
NOTES: Customer supplies handles
Bathroom:
- Replace toilet - $350, 3 hours
- Retile shower walls with large format porcelain tile and new niche - $1200 materials, 16 hours
Exterior:
- 10 windows @ $300 each, 20 hours";

fn bid() -> Bid {
    let mut bid = Bid::new(ClientInfo {
        name: "Stuart Wilson".to_string(),
        email: "stuart@example.com".to_string(),
        property_address: "735 Green Meadow Dr, Austin, TX".to_string(),
        ..ClientInfo::default()
    });
    bid.company = CompanyInfo {
        name: "Summit Builders".to_string(),
        tagline: "Remodeling done right".to_string(),
        location: "Aspen, CO".to_string(),
        ..CompanyInfo::default()
    };
    bid.add_parsed(&parse_scope(SCOPE));
    bid
}

fn page_of(doc: &bidscope::document::Document, pred: impl Fn(&str) -> bool) -> Option<usize> {
    doc.pages
        .iter()
        .position(|p| p.lines.iter().any(|l| pred(l.as_str())))
}

#[test]
fn test_pages_have_fixed_height_and_footer() {
    let options = RenderOptions {
        page_height: 20,
        page_width: 88,
    };
    let doc = render(&bid(), &options);
    let total = doc.page_count();
    assert!(total > 2);

    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.number, i + 1);
        assert_eq!(page.lines.len(), 20);
        assert_eq!(
            page.lines.last().unwrap(),
            &format!("Page {} of {}", i + 1, total)
        );
        for line in &page.lines {
            assert!(line.width() <= 88, "line too wide: {:?}", line);
        }
    }
}

#[test]
fn test_scope_starts_on_its_own_page() {
    let doc = render(&bid(), &RenderOptions::default());
    assert_eq!(page_of(&doc, |l| l == "CLIENT INFORMATION"), Some(0));
    let scope_page = page_of(&doc, |l| l == "DETAILED SCOPE OF WORK").unwrap();
    assert!(scope_page > 0);
    assert_eq!(doc.pages[scope_page].lines[0], "DETAILED SCOPE OF WORK");
}

#[test]
fn test_sections_are_not_split_when_they_fit() {
    let options = RenderOptions {
        page_height: 24,
        page_width: 88,
    };
    let doc = render(&bid(), &options);
    for name in ["Kitchen", "Bathroom", "Exterior"] {
        let header = page_of(&doc, |l| l == name.to_uppercase()).unwrap();
        let subtotal = page_of(&doc, |l| l.starts_with(&format!("{} Subtotal", name))).unwrap();
        assert_eq!(header, subtotal, "section {} split across pages", name);
    }
}

#[test]
fn test_notes_callout_follows_its_section() {
    let doc = render(&bid(), &RenderOptions::default());
    let lines: Vec<&String> = doc.pages.iter().flat_map(|p| p.lines.iter()).collect();

    let subtotal = lines
        .iter()
        .position(|l| l.starts_with("Kitchen Subtotal"))
        .unwrap();
    assert!(lines[subtotal + 1].starts_with('┌'));
    assert!(lines[subtotal + 2].contains("NOTES"));
    assert!(lines[subtotal + 3].contains("Customer supplies handles"));
    assert!(lines[subtotal + 4].starts_with('└'));

    // Sections without notes get no callout
    let bath = lines
        .iter()
        .position(|l| l.starts_with("Bathroom Subtotal"))
        .unwrap();
    assert!(!lines[bath + 1].starts_with('┌'));
}

#[test]
fn test_long_descriptions_wrap_inside_table() {
    let doc = render(&bid(), &RenderOptions::default());
    let text = doc.to_text();
    assert!(text.contains("Retile shower walls"));
    assert!(!text.lines().any(|l| l.contains("Retile") && l.contains("niche")));
}

#[test]
fn test_cost_plus_language_follows_flag() {
    let mut bid = bid();
    let text = render(&bid, &RenderOptions::default()).to_text();
    assert!(text.contains("Cost-Plus Pricing: Actual Cost + 20% Markup"));
    assert!(text.contains("Base Project: Cost + 20% | Change Orders: Cost + 35%"));
    assert!(text.contains("this is an ESTIMATE"));

    bid.show_cost_plus_language = false;
    let text = render(&bid, &RenderOptions::default()).to_text();
    assert!(!text.contains("Cost-Plus"));
    assert!(text.contains("Fixed Price:"));
    assert!(text.contains("cost + 35%"));
}

#[test]
fn test_header_totals_and_signatures() {
    let bid = bid();
    let text = render(&bid, &RenderOptions::default()).to_text();
    assert!(text.starts_with("SUMMIT BUILDERS\nRemodeling done right\nAspen, CO\n"));
    assert!(text.contains("stuart@example.com"));
    assert!(text.contains("PROJECT TOTALS"));
    assert!(text.contains("Markup (20%)"));
    assert!(text.contains("Client Signature:"));
    assert!(text.contains("  Summit Builders"));
    assert!(text.contains(&bidscope::pricing::format_currency(bid.totals.total_bid)));
}

#[test]
fn test_oversized_section_spills_across_pages() {
    let scope: String = std::iter::once("Punch List:".to_string())
        .chain((1..=40).map(|i| format!("- Touch up item number {} - 1 hour", i)))
        .collect::<Vec<_>>()
        .join("\n");
    let mut bid = Bid::new(ClientInfo::default());
    bid.add_parsed(&parse_scope(&scope));

    let doc = render(
        &bid,
        &RenderOptions {
            page_height: 20,
            page_width: 60,
        },
    );
    assert!(doc.page_count() >= 4);
    assert!(doc.pages.iter().all(|p| p.lines.len() == 20));
    assert!(doc.to_text().contains("Touch up item number 40"));
}
