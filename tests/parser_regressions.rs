// File: tests/parser_regressions.rs
// Lines that once produced wrong costs or messy descriptions.
use bidscope::model::{parse_item, parse_scope};

#[test]
fn test_hours_after_dash_are_not_material_cost() {
    let item = parse_item("- Demo kitchen - 8 hours", "Kitchen").unwrap();
    assert_eq!(item.material_cost, 0.0);
    assert_eq!(item.labor_hours, 8.0);
    assert_eq!(item.description, "Demo kitchen");
}

#[test]
fn test_title_does_not_swallow_next_line() {
    // "Project:" followed by a newline must not turn the next line into the name
    let result = parse_scope("Project:\n- Install new furnace - $3200, 10 hours");
    assert_eq!(result.project_name, "Custom Project");
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].category, "HVAC");
}

#[test]
fn test_title_line_keeps_its_hours() {
    let result = parse_scope("Job: Replace roof 40 hours");
    assert_eq!(result.project_name, "Replace roof 40 hours");
    assert_eq!(result.items.len(), 1);

    let item = &result.items[0];
    assert_eq!(item.labor_hours, 40.0);
    assert_eq!(item.description, "Job: Replace roof");
    assert_eq!(item.category, "Roofing");
    assert_eq!(item.section_name, "Replace roof 40 hours");
}

#[test]
fn test_title_line_is_an_item_before_bullets() {
    let result = parse_scope("Project: Wilson Kitchen\n- Demo cabinets - 8 hours");
    assert_eq!(result.project_name, "Wilson Kitchen");
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].description, "Project: Wilson Kitchen");
    assert_eq!(result.items[1].description, "Demo cabinets");
    assert_eq!(result.items[1].labor_hours, 8.0);
}

#[test]
fn test_title_shaped_line_inside_notes_stays_in_notes() {
    let input = "Bath:\n- Install sink - $400\nNOTES: check supply lines\nScope: rough-in only";
    let result = parse_scope(input);
    let sections = result.sections();

    assert_eq!(sections.len(), 1);
    assert_eq!(
        sections[0].notes.as_deref(),
        Some("check supply lines Scope: rough-in only")
    );
    assert_eq!(result.items.len(), 1);
}

#[test]
fn test_explicit_materials_keyword_with_thousands() {
    let item = parse_item("• New roof shingles $12,500 materials, 40 hrs", "Roof").unwrap();
    assert_eq!(item.material_cost, 12500.0);
    assert_eq!(item.labor_hours, 40.0);
    assert_eq!(item.description, "New roof shingles");
    assert_eq!(item.category, "Roofing");
}

#[test]
fn test_trailing_price_without_dollar_sign() {
    let item = parse_item("Replace faucet 275", "Bath").unwrap();
    assert_eq!(item.material_cost, 275.0);
    assert_eq!(item.description, "Replace faucet");
}

#[test]
fn test_quantity_line_keeps_quantity_phrase() {
    let item = parse_item("- Install 6 outlets @ $25 each, 3 hours", "Electric").unwrap();
    assert_eq!(item.quantity, Some(6));
    assert_eq!(item.material_cost, 150.0);
    assert_eq!(item.labor_hours, 3.0);
    assert_eq!(item.labor_hours_per_unit, Some(0.5));
    assert_eq!(item.description, "Install 6 outlets");
    assert_eq!(item.category, "Electrical");
}

#[test]
fn test_quantity_line_ignores_trailing_number() {
    // The unit price already set the cost; a stray trailing number must not
    // overwrite it.
    let item = parse_item("- 4 doors @ $250 each 2", "Doors").unwrap();
    assert_eq!(item.quantity, Some(4));
    assert_eq!(item.material_cost, 1000.0);
}

#[test]
fn test_parenthetical_annotations_removed() {
    let item = parse_item("- Paint ceilings (two coats, flat white) - 10 hours", "Paint").unwrap();
    assert_eq!(item.description, "Paint ceilings");
    assert_eq!(item.category, "Painting");
}

#[test]
fn test_long_dollar_line_is_not_a_header() {
    let result = parse_scope("Allowance for fixtures $500:\n");
    assert!(result.sections().iter().all(|s| s.name != "Allowance for fixtures $500"));
}

#[test]
fn test_fallback_splits_unstructured_text() {
    let input = "Garage Door: haul away old door; tune up opener, replace springs";
    let result = parse_scope(input);
    assert!(!result.items.is_empty());
}

#[test]
fn test_fallback_when_only_headers() {
    let input = "Kitchen work to be scoped later:\nBathroom work to be scoped later:";
    let result = parse_scope(input);

    assert_eq!(result.items.len(), 2);
    assert!(result.sections.is_none());
    for item in &result.items {
        assert_eq!(item.section_name, "Custom Work");
        assert_eq!(item.category, "General Construction");
        assert_eq!(item.material_cost, 0.0);
    }
    assert_eq!(result.items[0].description, "Kitchen work to be scoped later:");
}
