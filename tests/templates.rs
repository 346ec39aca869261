// File: tests/templates.rs
use bidscope::catalog::{
    LABOR_RATES, PROJECT_TEMPLATES, TemplateCategory, find_labor_rate, find_template,
    templates_in,
};
use bidscope::model::{Bid, ClientInfo};
use strum::IntoEnumIterator;

#[test]
fn test_template_ids_are_unique() {
    let mut ids: Vec<&str> = PROJECT_TEMPLATES.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), PROJECT_TEMPLATES.len());
}

#[test]
fn test_per_unit_items_keep_quantity_invariant() {
    for template in PROJECT_TEMPLATES {
        for item in template.instantiate(None, Some(7)) {
            if let Some(q) = item.quantity {
                let per_unit = item.material_cost_per_unit.unwrap();
                assert!((item.material_cost - f64::from(q) * per_unit).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn test_windows_template_scales_with_quantity() {
    let template = find_template("windows-full-house").unwrap();
    let items = template.instantiate(Some("Upstairs"), Some(20));

    assert!(items.iter().all(|i| i.section_name == "Upstairs"));
    let windows = items
        .iter()
        .find(|i| i.category == "Windows")
        .unwrap();
    assert_eq!(windows.quantity, Some(20));
    assert_eq!(windows.material_cost, 10000.0);

    let install = items
        .iter()
        .find(|i| i.category == "Installation")
        .unwrap();
    assert_eq!(install.labor_hours, 40.0);

    // Fixed lines are untouched
    let trim = items.iter().find(|i| i.category == "Trim").unwrap();
    assert_eq!(trim.material_cost, 800.0);
    assert_eq!(trim.quantity, None);
}

#[test]
fn test_template_without_quantity_uses_defaults() {
    let template = find_template("windows-full-house").unwrap();
    let items = template.instantiate(None, None);
    let windows = items.iter().find(|i| i.category == "Windows").unwrap();
    assert_eq!(windows.quantity, Some(10));
    assert_eq!(windows.material_cost, 5000.0);
    assert_eq!(items[0].section_name, template.name);
}

#[test]
fn test_adding_template_copies_to_bid() {
    let template = find_template("windows-full-house").unwrap();
    let mut bid = Bid::new(ClientInfo::default());
    assert_eq!(bid.add_template(template, Some("Windows"), Some(20), 2), 2);

    assert_eq!(bid.sections.len(), 2);
    assert_eq!(bid.sections[0].name, "Windows #1");
    assert_eq!(bid.sections[1].name, "Windows #2");
    assert!(bid.sections[1].items.iter().all(|i| i.section == "Windows #2"));
    // 12000 materials and 74 hours per copy
    assert_eq!(bid.totals.material_costs, 24000.0);
    assert_eq!(bid.totals.labor_costs, 148.0 * bid.labor_rate);
}

#[test]
fn test_mid_cost_per_unit() {
    let roof = find_template("roof-asphalt").unwrap();
    assert_eq!(roof.mid_cost_per_unit(), Some(6.0));
    assert_eq!(find_template("entry-door").unwrap().mid_cost_per_unit(), None);
}

#[test]
fn test_templates_by_category() {
    let covered: usize = TemplateCategory::iter().map(|c| templates_in(c).count()).sum();
    assert_eq!(covered, PROJECT_TEMPLATES.len());
    assert!(templates_in(TemplateCategory::Bathroom).all(|t| t.id.contains("bathroom")));
    assert!(find_template("no-such-template").is_none());
}

#[test]
fn test_labor_rates_have_four_hour_minimum() {
    for rate in LABOR_RATES {
        assert_eq!(rate.minimum_charge, rate.hourly_rate * 4.0);
    }
    let plumber = find_labor_rate("plumber").unwrap();
    assert_eq!(plumber.hourly_rate, 95.0);
    assert!(!plumber.is_internal);
}
