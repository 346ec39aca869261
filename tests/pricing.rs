// File: tests/pricing.rs
use bidscope::catalog::{HISTORICAL_PROJECTS, default_crew_rate};
use bidscope::model::{Bid, ClientInfo, parse_scope};
use bidscope::pricing::{
    change_order_cost, compute_totals, estimate_from_historical, format_currency,
    section_subtotal,
};

fn kitchen_bid() -> Bid {
    let parsed = parse_scope(
        "Kitchen Renovation:\n- Remove existing cabinets - 8 hours\n- Install new cabinets - $8000, 24 hours",
    );
    let mut bid = Bid::new(ClientInfo {
        name: "Stuart Wilson".to_string(),
        property_address: "735 Green Meadow Dr, Austin, TX".to_string(),
        ..ClientInfo::default()
    });
    bid.add_parsed(&parsed);
    bid
}

#[test]
fn test_cost_plus_totals() {
    let bid = kitchen_bid();
    assert_eq!(bid.labor_rate, 65.0);
    assert_eq!(bid.markup_percentage, 20.0);

    let totals = bid.totals;
    assert_eq!(totals.material_costs, 8000.0);
    assert_eq!(totals.labor_costs, 32.0 * 65.0);
    assert_eq!(totals.base_cost, 10080.0);
    assert!((totals.markup - 2016.0).abs() < 1e-9);
    assert!((totals.total_bid - 12096.0).abs() < 1e-9);
}

#[test]
fn test_repricing_updates_totals() {
    let mut bid = kitchen_bid();
    bid.set_pricing(85.0, 25.0);
    assert_eq!(bid.totals.labor_costs, 32.0 * 85.0);
    assert!((bid.totals.total_bid - (8000.0 + 2720.0) * 1.25).abs() < 1e-9);
}

#[test]
fn test_removing_section_recalculates() {
    let mut bid = kitchen_bid();
    let id = bid.sections[0].id.clone();
    assert!(bid.remove_section(&id));
    assert_eq!(bid.totals.total_bid, 0.0);
    assert!(!bid.remove_section(&id));
}

#[test]
fn test_change_orders_carry_higher_markup() {
    let bid = kitchen_bid();
    assert!((bid.change_order_cost(1000.0) - 1350.0).abs() < 1e-9);
    assert!((change_order_cost(200.0, 0.5) - 300.0).abs() < 1e-9);
}

#[test]
fn test_section_subtotal_excludes_markup() {
    let bid = kitchen_bid();
    assert_eq!(section_subtotal(&bid.sections[0], bid.labor_rate), 10080.0);
}

#[test]
fn test_totals_from_parsed_items() {
    let parsed = parse_scope("- 10 windows @ $300 each\n- Install windows - 20 hours");
    let totals = compute_totals(&parsed.items, default_crew_rate(), 0.0);
    assert_eq!(totals.material_costs, 3000.0);
    assert_eq!(totals.labor_costs, 1300.0);
    assert_eq!(totals.total_bid, 4300.0);
}

#[test]
fn test_historical_estimate_range() {
    let estimate = estimate_from_historical(3000.0, HISTORICAL_PROJECTS).unwrap();
    // Cheapest past project ran $66/sq ft, the dearest $125/sq ft
    assert_eq!(estimate.min, 198000.0);
    assert_eq!(estimate.max, 375000.0);
    assert!(estimate.min < estimate.average && estimate.average < estimate.max);

    assert!(estimate_from_historical(0.0, HISTORICAL_PROJECTS).is_none());
    assert!(estimate_from_historical(1000.0, &[]).is_none());
}

#[test]
fn test_currency_formatting_in_totals() {
    let bid = kitchen_bid();
    assert_eq!(format_currency(bid.totals.total_bid), "$12,096");
}
