// File: ./src/model/import.rs
//! Reading bids back from the archive's import JSON.
//!
//! Two layouts are accepted: a `sections[]` array of named sections with
//! their items, or the flat `materials[]` / `labor[]` lists that the archive
//! writes. Missing, empty or zero fields fall back to defaults, the same way
//! the bid form fills them in.
use crate::model::{Bid, BidSection, ClientInfo, PropertyType, ScopeItem};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

pub const IMPORTED_SECTION_NAME: &str = "Imported Items";
const IMPORTED_SECTION_FALLBACK: &str = "Imported Section";
const DEFAULT_UNIT: &str = "EA";
const DEFAULT_MARKUP_PERCENT: f64 = 20.0;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    #[serde(default)]
    client_info: Option<ImportClient>,
    #[serde(default)]
    project_scope: Option<ImportScope>,
    #[serde(default)]
    sections: Option<Vec<ImportSection>>,
    #[serde(default)]
    materials: Option<Vec<ImportItem>>,
    #[serde(default)]
    labor: Option<Vec<ImportLabor>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImportClient {
    name: Option<String>,
    property_address: Option<String>,
    address: Option<String>,
    date: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    property_type: Option<String>,
    square_footage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImportScope {
    markup_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImportSection {
    name: Option<String>,
    items: Option<Vec<ImportItem>>,
    notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImportItem {
    category: Option<String>,
    description: Option<String>,
    item: Option<String>,
    quantity: Option<f64>,
    unit: Option<String>,
    material_cost: Option<f64>,
    unit_price: Option<f64>,
    total_price: Option<f64>,
    hours: Option<f64>,
    labor_hours: Option<f64>,
    labor_hours_per_unit: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImportLabor {
    trade: Option<String>,
    hours: Option<f64>,
    hourly_rate: Option<f64>,
    description: Option<String>,
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

fn item_quantity(value: Option<f64>) -> u32 {
    amount(value)
        .filter(|q| *q >= 1.0 && *q <= f64::from(u32::MAX))
        .map_or(1, |q| q.round() as u32)
}

impl ImportItem {
    fn description(&self) -> String {
        text(&self.description)
            .or_else(|| text(&self.item))
            .unwrap_or_default()
            .to_string()
    }

    /// Whole-line material cost. A bare unit price is multiplied out.
    fn material_cost(&self, quantity: u32) -> f64 {
        amount(self.material_cost)
            .or_else(|| amount(self.total_price))
            .or_else(|| amount(self.unit_price).map(|p| p * f64::from(quantity)))
            .unwrap_or(0.0)
    }

    fn into_scope_item(self, default_category: &str, section: &str) -> ScopeItem {
        let quantity = item_quantity(self.quantity);
        let material_cost = self.material_cost(quantity);
        let labor_hours = amount(self.hours)
            .or_else(|| amount(self.labor_hours))
            .unwrap_or(0.0);
        ScopeItem {
            id: Uuid::new_v4().to_string(),
            category: text(&self.category).unwrap_or(default_category).to_string(),
            description: self.description(),
            material_cost,
            labor_hours,
            section: section.to_string(),
            quantity: Some(quantity),
            unit: Some(text(&self.unit).unwrap_or(DEFAULT_UNIT).to_string()),
            material_cost_per_unit: amount(self.unit_price)
                .or_else(|| amount(self.material_cost)),
            labor_hours_per_unit: amount(self.labor_hours_per_unit),
        }
    }
}

impl ImportLabor {
    fn into_scope_item(self, section: &str) -> Option<ScopeItem> {
        let hours = amount(self.hours)?;
        let description = text(&self.description)
            .or_else(|| text(&self.trade))
            .unwrap_or("Labor")
            .to_string();
        Some(ScopeItem {
            id: Uuid::new_v4().to_string(),
            category: "Labor".to_string(),
            description,
            material_cost: 0.0,
            labor_hours: hours,
            section: section.to_string(),
            quantity: None,
            unit: None,
            material_cost_per_unit: None,
            labor_hours_per_unit: None,
        })
    }
}

fn client_from(info: &ImportClient) -> ClientInfo {
    ClientInfo {
        name: text(&info.name).unwrap_or_default().to_string(),
        email: text(&info.email).unwrap_or_default().to_string(),
        phone: text(&info.phone).unwrap_or_default().to_string(),
        property_address: text(&info.property_address)
            .or_else(|| text(&info.address))
            .unwrap_or_default()
            .to_string(),
        property_type: text(&info.property_type)
            .and_then(|t| PropertyType::from_str(&t.to_lowercase()).ok())
            .unwrap_or_default(),
        square_footage: amount(info.square_footage).unwrap_or(0.0),
    }
}

impl Bid {
    /// Build a bid from import JSON. Sections win over the flat lists; with
    /// only `materials`/`labor` everything lands in one "Imported Items"
    /// section. The labor rate of the first labor line, if any, becomes the
    /// bid's rate.
    pub fn from_import_json(json: &str) -> Result<Bid> {
        let doc: ImportDocument =
            serde_json::from_str(json).context("Invalid import JSON")?;

        let client = doc.client_info.as_ref().map(client_from).unwrap_or_default();
        let mut bid = Bid::new(client);

        if let Some(date) = doc.client_info.as_ref().and_then(|c| text(&c.date)) {
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(day) => {
                    if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
                        bid.created_at = midnight.and_utc();
                    }
                }
                Err(_) => log::warn!("Ignoring unreadable import date {:?}", date),
            }
        }

        let markup = doc
            .project_scope
            .as_ref()
            .and_then(|s| amount(s.markup_percent))
            .unwrap_or(DEFAULT_MARKUP_PERCENT);
        let rate = doc
            .labor
            .iter()
            .flatten()
            .find_map(|l| amount(l.hourly_rate))
            .unwrap_or(bid.labor_rate);

        match doc.sections {
            Some(sections) => {
                for section in sections {
                    let name = text(&section.name)
                        .unwrap_or(IMPORTED_SECTION_FALLBACK)
                        .to_string();
                    let notes = text(&section.notes).map(str::to_string);
                    let items = section
                        .items
                        .unwrap_or_default()
                        .into_iter()
                        .map(|item| item.into_scope_item("General", &name))
                        .collect();
                    bid.sections.push(BidSection {
                        id: Uuid::new_v4().to_string(),
                        name,
                        items,
                        notes,
                    });
                }
            }
            None if doc.materials.is_some() || doc.labor.is_some() => {
                let mut items: Vec<ScopeItem> = doc
                    .materials
                    .unwrap_or_default()
                    .into_iter()
                    .map(|item| {
                        let mut item = item.into_scope_item("Materials", IMPORTED_SECTION_NAME);
                        item.labor_hours = 0.0;
                        item.labor_hours_per_unit = None;
                        item
                    })
                    .collect();
                items.extend(
                    doc.labor
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|line| line.into_scope_item(IMPORTED_SECTION_NAME)),
                );
                bid.sections.push(BidSection {
                    id: Uuid::new_v4().to_string(),
                    name: IMPORTED_SECTION_NAME.to_string(),
                    items,
                    notes: None,
                });
            }
            None => {}
        }

        bid.set_pricing(rate, markup);
        log::debug!(
            "Imported bid for {:?}: {} sections, {} items",
            bid.client.name,
            bid.sections.len(),
            bid.all_items().count()
        );
        Ok(bid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materials_without_sections_become_one_section() {
        let bid = Bid::from_import_json(
            r#"{
                "clientInfo": {"name": "Lee", "address": "12 Oak St"},
                "materials": [
                    {"description": "Vanity", "unitPrice": 450},
                    {"item": "Tile", "quantity": 3, "unit": "box", "unitPrice": 60},
                    {"description": "Grout", "totalPrice": 40, "quantity": 0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(bid.client.property_address, "12 Oak St");
        assert_eq!(bid.markup_percentage, 20.0);
        assert_eq!(bid.sections.len(), 1);
        let section = &bid.sections[0];
        assert_eq!(section.name, IMPORTED_SECTION_NAME);

        let vanity = &section.items[0];
        assert_eq!(vanity.category, "Materials");
        assert_eq!(vanity.quantity, Some(1));
        assert_eq!(vanity.unit.as_deref(), Some("EA"));
        assert_eq!(vanity.material_cost, 450.0);

        let tile = &section.items[1];
        assert_eq!(tile.description, "Tile");
        assert_eq!(tile.material_cost, 180.0);
        assert_eq!(tile.material_cost_per_unit, Some(60.0));

        assert_eq!(section.items[2].quantity, Some(1));
        assert_eq!(section.items[2].material_cost, 40.0);
    }

    #[test]
    fn sections_take_precedence_over_materials() {
        let bid = Bid::from_import_json(
            r#"{
                "projectScope": {"markupPercent": 25},
                "sections": [
                    {"name": "Kitchen", "notes": "Island stays",
                     "items": [{"description": "Cabinets", "materialCost": 8000, "hours": 24}]},
                    {"items": []}
                ],
                "materials": [{"description": "ignored", "unitPrice": 5}]
            }"#,
        )
        .unwrap();

        assert_eq!(bid.markup_percentage, 25.0);
        assert_eq!(bid.sections.len(), 2);
        assert_eq!(bid.sections[0].notes.as_deref(), Some("Island stays"));
        assert_eq!(bid.sections[0].items[0].labor_hours, 24.0);
        assert_eq!(bid.sections[0].items[0].category, "General");
        assert_eq!(bid.sections[1].name, "Imported Section");
        assert_eq!(bid.totals.material_costs, 8000.0);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Bid::from_import_json("{ not json").is_err());
        assert!(Bid::from_import_json(r#"{"sections": 3}"#).is_err());
    }
}
