// File: ./src/pricing.rs
//! Cost-plus pricing: totals, change orders and historical estimates.
use crate::catalog::HistoricalProject;
use crate::model::{BidSection, ParsedScopeItem, ScopeItem};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MARKUP_PERCENTAGE: f64 = 20.0;
/// Change orders carry a higher markup than the base contract.
pub const DEFAULT_CHANGE_ORDER_MARKUP: f64 = 0.35;

/// Anything with a material cost and labor hours can be priced.
pub trait Priced {
    fn material_cost(&self) -> f64;
    fn labor_hours(&self) -> f64;
}

impl Priced for ParsedScopeItem {
    fn material_cost(&self) -> f64 {
        self.material_cost
    }
    fn labor_hours(&self) -> f64 {
        self.labor_hours
    }
}

impl Priced for ScopeItem {
    fn material_cost(&self) -> f64 {
        self.material_cost
    }
    fn labor_hours(&self) -> f64 {
        self.labor_hours
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidTotals {
    pub labor_costs: f64,
    pub material_costs: f64,
    pub base_cost: f64,
    pub markup: f64,
    pub total_bid: f64,
}

pub fn labor_cost(hours: f64, hourly_rate: f64) -> f64 {
    hours * hourly_rate
}

pub fn base_cost(labor_costs: f64, material_costs: f64) -> f64 {
    labor_costs + material_costs
}

pub fn markup(base_cost: f64, markup_percentage: f64) -> f64 {
    base_cost * (markup_percentage / 100.0)
}

pub fn change_order_cost(amount: f64, markup_fraction: f64) -> f64 {
    amount * (1.0 + markup_fraction)
}

pub fn compute_totals<'a, I, T>(items: I, hourly_rate: f64, markup_percentage: f64) -> BidTotals
where
    I: IntoIterator<Item = &'a T>,
    T: Priced + 'a,
{
    let (material_costs, labor_hours) = items
        .into_iter()
        .fold((0.0, 0.0), |(m, h), item| {
            (m + item.material_cost(), h + item.labor_hours())
        });
    let labor_costs = labor_cost(labor_hours, hourly_rate);
    let base_cost = base_cost(labor_costs, material_costs);
    let markup = markup(base_cost, markup_percentage);

    BidTotals {
        labor_costs,
        material_costs,
        base_cost,
        markup,
        total_bid: base_cost + markup,
    }
}

/// Materials plus labor for one section, before markup.
pub fn section_subtotal(section: &BidSection, hourly_rate: f64) -> f64 {
    let totals = compute_totals(&section.items, hourly_rate, 0.0);
    totals.base_cost
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Range of likely totals for a property of `square_footage`, from the
/// per-square-foot cost of past projects.
pub fn estimate_from_historical(
    square_footage: f64,
    projects: &[HistoricalProject],
) -> Option<Estimate> {
    if square_footage <= 0.0 {
        return None;
    }
    let per_sq_ft: Vec<f64> = projects
        .iter()
        .filter(|p| p.square_footage > 0.0)
        .map(HistoricalProject::cost_per_square_foot)
        .collect();
    if per_sq_ft.is_empty() {
        return None;
    }

    let min = per_sq_ft.iter().copied().fold(f64::INFINITY, f64::min);
    let max = per_sq_ft.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = per_sq_ft.iter().sum::<f64>() / per_sq_ft.len() as f64;

    Some(Estimate {
        min: (min * square_footage).round(),
        max: (max * square_footage).round(),
        average: (average * square_footage).round(),
    })
}

/// Whole-dollar US currency: `$12,345`, `-$80`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(1234567.4), "$1,234,567");
        assert_eq!(format_currency(-80.0), "-$80");
        assert_eq!(format_currency(12345.5), "$12,346");
    }
}
