// File: ./src/model/bid.rs
use crate::catalog::{ProjectTemplate, default_crew_rate};
use crate::model::{ParseResult, ParsedScopeItem};
use crate::pricing::{
    self, BidTotals, DEFAULT_CHANGE_ORDER_MARKUP, DEFAULT_MARKUP_PERCENTAGE,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

fn default_uid() -> String {
    Uuid::new_v4().to_string()
}

fn default_true() -> bool {
    true
}

fn default_change_order_markup() -> f64 {
    DEFAULT_CHANGE_ORDER_MARKUP
}

fn default_markup_percentage() -> f64 {
    DEFAULT_MARKUP_PERCENTAGE
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Residential,
    Commercial,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub property_address: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub square_footage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
}

/// A scope line that belongs to a bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeItem {
    #[serde(default = "default_uid")]
    pub id: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub material_cost: f64,
    #[serde(default)]
    pub labor_hours: f64,
    #[serde(default)]
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_cost_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_hours_per_unit: Option<f64>,
}

impl From<ParsedScopeItem> for ScopeItem {
    fn from(item: ParsedScopeItem) -> Self {
        Self {
            id: default_uid(),
            category: item.category,
            description: item.description,
            material_cost: item.material_cost,
            labor_hours: item.labor_hours,
            section: item.section_name,
            quantity: item.quantity,
            unit: item.unit,
            material_cost_per_unit: item.material_cost_per_unit,
            labor_hours_per_unit: item.labor_hours_per_unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidSection {
    #[serde(default = "default_uid")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ScopeItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BidSection {
    pub fn new(name: &str, items: Vec<ParsedScopeItem>, notes: Option<String>) -> Self {
        Self {
            id: default_uid(),
            name: name.to_string(),
            items: items
                .into_iter()
                .map(|mut item| {
                    item.section_name = name.to_string();
                    ScopeItem::from(item)
                })
                .collect(),
            notes,
        }
    }

    pub fn material_cost(&self) -> f64 {
        self.items.iter().map(|i| i.material_cost).sum()
    }

    pub fn labor_hours(&self) -> f64 {
        self.items.iter().map(|i| i.labor_hours).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[serde(default = "default_uid")]
    pub id: String,
    pub client: ClientInfo,
    #[serde(default)]
    pub project_timeline: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sections: Vec<BidSection>,
    #[serde(default)]
    pub totals: BidTotals,
    #[serde(default = "default_markup_percentage")]
    pub markup_percentage: f64,
    #[serde(default = "default_change_order_markup")]
    pub change_order_markup: f64,
    #[serde(default = "default_crew_rate")]
    pub labor_rate: f64,
    #[serde(default)]
    pub company: CompanyInfo,
    #[serde(default = "default_true")]
    pub show_cost_plus_language: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_file_name: Option<String>,
}

impl Bid {
    pub fn new(client: ClientInfo) -> Self {
        Self {
            id: default_uid(),
            client,
            project_timeline: String::new(),
            notes: String::new(),
            sections: Vec::new(),
            totals: BidTotals::default(),
            markup_percentage: DEFAULT_MARKUP_PERCENTAGE,
            change_order_markup: DEFAULT_CHANGE_ORDER_MARKUP,
            labor_rate: default_crew_rate(),
            company: CompanyInfo::default(),
            show_cost_plus_language: true,
            created_at: Utc::now(),
            document_file_name: None,
        }
    }

    pub fn add_section(
        &mut self,
        name: &str,
        items: Vec<ParsedScopeItem>,
        notes: Option<String>,
    ) -> &BidSection {
        self.sections.push(BidSection::new(name, items, notes));
        self.recalculate();
        &self.sections[self.sections.len() - 1]
    }

    /// Add the sections of a parsed scope. When the parser captured no
    /// sections, its flat items go into one section named after the project.
    /// Returns the number of sections added.
    pub fn add_parsed(&mut self, parsed: &ParseResult) -> usize {
        let before = self.sections.len();
        match &parsed.sections {
            Some(sections) if !sections.is_empty() => {
                for section in sections {
                    self.sections.push(BidSection::new(
                        &section.name,
                        section.items.clone(),
                        section.notes.clone(),
                    ));
                }
            }
            _ if !parsed.items.is_empty() => {
                self.sections.push(BidSection::new(
                    &parsed.project_name,
                    parsed.items.clone(),
                    None,
                ));
            }
            _ => {}
        }
        self.recalculate();
        self.sections.len() - before
    }

    /// Add `copies` sections built from a template. Multiple copies are
    /// numbered "<name> #1", "<name> #2", ...
    pub fn add_template(
        &mut self,
        template: &ProjectTemplate,
        section_name: Option<&str>,
        quantity: Option<u32>,
        copies: u32,
    ) -> usize {
        let base_name = section_name.unwrap_or(template.name);
        let copies = copies.max(1);
        for i in 0..copies {
            let name = if copies > 1 {
                format!("{} #{}", base_name, i + 1)
            } else {
                base_name.to_string()
            };
            let items = template.instantiate(Some(&name), quantity);
            self.sections.push(BidSection::new(&name, items, None));
        }
        self.recalculate();
        copies as usize
    }

    pub fn remove_section(&mut self, section_id: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != section_id);
        let removed = self.sections.len() != before;
        if removed {
            self.recalculate();
        }
        removed
    }

    pub fn all_items(&self) -> impl Iterator<Item = &ScopeItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn set_pricing(&mut self, labor_rate: f64, markup_percentage: f64) {
        self.labor_rate = labor_rate;
        self.markup_percentage = markup_percentage;
        self.recalculate();
    }

    pub fn recalculate(&mut self) {
        self.totals = pricing::compute_totals(
            self.sections.iter().flat_map(|s| s.items.iter()),
            self.labor_rate,
            self.markup_percentage,
        );
    }

    pub fn change_order_cost(&self, amount: f64) -> f64 {
        pricing::change_order_cost(amount, self.change_order_markup)
    }
}
