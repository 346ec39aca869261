// File: tests/archive.rs
use bidscope::archive::{
    ArchiveOutcome, BidArchive, DirectoryArchive, Submission, format_import_json,
    format_markdown, normalize_component,
};
use bidscope::context::TestContext;
use bidscope::model::{Bid, ClientInfo, IMPORTED_SECTION_NAME, parse_scope};
use chrono::{NaiveDate, TimeZone, Utc};
use std::fs;

fn submission() -> Submission {
    let mut bid = Bid::new(ClientInfo {
        name: "Stuart Wilson".to_string(),
        property_address: "735 Green Meadow Dr, Austin, TX 78701".to_string(),
        ..ClientInfo::default()
    });
    bid.add_parsed(&parse_scope(
        "Kitchen Renovation:\n- Remove existing cabinets - 8 hours\n- Install new cabinets - $8000, 24 hours\n- 10 windows @ $300 each",
    ));
    let mut sub = Submission::from_bid(&bid);
    sub.date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    sub
}

#[test]
fn test_submission_key_and_folder() {
    let sub = submission();
    assert_eq!(sub.key(), "2025-01-15_stuart_wilson_735_green_meadow_dr");
    assert_eq!(
        sub.folder(),
        std::path::Path::new("bids/2025/2025-01-15_stuart_wilson_735_green_meadow_dr")
    );
    assert_eq!(sub.base_file_name(), "stuart_wilson_estimate");
}

#[test]
fn test_address_prefix_is_truncated() {
    let mut sub = submission();
    sub.address = "12345 Extremely Long Boulevard Name Northwest, Town".to_string();
    let key = sub.key();
    let street = key.trim_start_matches("2025-01-15_stuart_wilson_");
    assert_eq!(street.chars().count(), 30);
    assert_eq!(normalize_component("O'Brien & Sons"), "o_brien___sons");
}

#[test]
fn test_labor_lines_per_section() {
    let sub = submission();
    assert_eq!(sub.labor.len(), 1);
    assert_eq!(sub.labor[0].hours, 32.0);
    assert_eq!(sub.labor[0].description, "Kitchen Renovation");
    assert_eq!(sub.labor[0].total(), 32.0 * 65.0);
}

#[test]
fn test_markdown_and_json_layout() {
    let sub = submission();
    let at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();

    let md = format_markdown(&sub, at);
    assert!(md.starts_with("# Bid Estimate - Stuart Wilson"));
    assert!(md.contains("**Date:** January 15, 2025"));
    assert!(md.contains("| Windows | 10 windows | 10 | windows | $300 | $3,000 |"));
    assert!(md.contains("## Labor"));

    let json: serde_json::Value = serde_json::from_str(&format_import_json(&sub, at).unwrap()).unwrap();
    assert_eq!(json["clientInfo"]["name"], "Stuart Wilson");
    assert_eq!(json["clientInfo"]["date"], "2025-01-15");
    assert_eq!(json["materials"].as_array().unwrap().len(), 3);
    assert_eq!(json["materials"][0]["unit"], "EA");
    assert_eq!(json["projectScope"]["materialCost"], 11000.0);
    assert_eq!(json["labor"][0]["hourlyRate"], 65.0);
}

#[test]
fn test_import_json_restores_bid() {
    let sub = submission();
    let at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    let json = format_import_json(&sub, at).unwrap();

    let bid = Bid::from_import_json(&json).unwrap();
    assert_eq!(bid.client.name, "Stuart Wilson");
    assert_eq!(bid.client.property_address, sub.address);
    assert_eq!(bid.markup_percentage, 20.0);
    assert_eq!(bid.labor_rate, 65.0);
    assert_eq!(bid.sections.len(), 1);
    assert_eq!(bid.sections[0].name, IMPORTED_SECTION_NAME);

    let windows = bid
        .all_items()
        .find(|i| i.description == "10 windows")
        .unwrap();
    assert_eq!(windows.quantity, Some(10));
    assert_eq!(windows.material_cost, 3000.0);
    assert_eq!(windows.material_cost_per_unit, Some(300.0));
    assert_eq!(bid.totals.labor_costs, 32.0 * 65.0);
    assert!((bid.totals.total_bid - sub.total_cost).abs() < 1e-6);

    // Same date, client and address: re-archiving lands on the same key
    assert_eq!(Submission::from_bid(&bid).key(), sub.key());
}

#[test]
fn test_conflict_then_override() {
    let ctx = TestContext::new();
    let archive = DirectoryArchive::new(ctx.root.join("archive"));
    let sub = submission().with_document("estimate.txt", b"PROJECT ESTIMATE".to_vec());

    assert!(!archive.exists(&sub).unwrap());
    let location = match archive.submit(&sub, false).unwrap() {
        ArchiveOutcome::Saved { location } => location,
        other => panic!("expected Saved, got {:?}", other),
    };
    assert!(location.join("stuart_wilson_estimate.md").exists());
    assert!(location.join("stuart_wilson_estimate.json").exists());
    assert_eq!(
        fs::read(location.join("stuart_wilson_estimate.txt")).unwrap(),
        b"PROJECT ESTIMATE"
    );

    assert_eq!(
        archive.submit(&sub, false).unwrap(),
        ArchiveOutcome::Conflict { key: sub.key() }
    );
    assert!(matches!(
        archive.submit(&sub, true).unwrap(),
        ArchiveOutcome::Saved { .. }
    ));
}

#[test]
fn test_partial_failure_is_reported() {
    let ctx = TestContext::new();
    let archive = DirectoryArchive::new(ctx.root.join("archive"));
    let sub = submission();

    // A directory where the JSON file should go makes that one write fail
    let folder = archive.root().join(sub.folder());
    fs::create_dir_all(folder.join("stuart_wilson_estimate.json")).unwrap();

    match archive.submit(&sub, false).unwrap() {
        ArchiveOutcome::Partial { location, failures } => {
            assert_eq!(location, folder);
            assert_eq!(failures.len(), 1);
            assert!(failures[0].starts_with("stuart_wilson_estimate.json"));
            assert!(folder.join("stuart_wilson_estimate.md").is_file());
        }
        other => panic!("expected Partial, got {:?}", other),
    }
}

#[test]
fn test_all_writes_failing_is_an_error() {
    let ctx = TestContext::new();
    let archive = DirectoryArchive::new(ctx.root.join("archive"));
    let sub = submission();

    let folder = archive.root().join(sub.folder());
    fs::create_dir_all(folder.join("stuart_wilson_estimate.json")).unwrap();
    fs::create_dir_all(folder.join("stuart_wilson_estimate.md")).unwrap();

    // The markdown path exists (as a directory), so force past the conflict check
    let err = archive.submit(&sub, true).unwrap_err();
    assert!(err.to_string().contains("All saves failed"));
}

#[test]
fn test_unreachable_root_is_an_error() {
    let ctx = TestContext::new();
    let root = ctx.root.join("not_a_dir");
    fs::write(&root, "file").unwrap();

    let archive = DirectoryArchive::new(&root);
    assert!(archive.submit(&submission(), false).is_err());
}
