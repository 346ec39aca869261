// File: ./src/model/scope.rs
use serde::{Deserialize, Serialize};

/// One line item recognized in free-text scope input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScopeItem {
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub material_cost: f64,
    #[serde(default)]
    pub labor_hours: f64,
    pub section_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_cost_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_hours_per_unit: Option<f64>,
}

impl ParsedScopeItem {
    /// A bare item with no numbers attached, to be priced by hand later.
    pub fn bare(category: &str, description: &str, section_name: &str) -> Self {
        Self {
            category: category.to_string(),
            description: description.to_string(),
            material_cost: 0.0,
            labor_hours: 0.0,
            section_name: section_name.to_string(),
            quantity: None,
            unit: None,
            material_cost_per_unit: None,
            labor_hours_per_unit: None,
        }
    }
}

/// Items collected under one section header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSection {
    pub name: String,
    pub items: Vec<ParsedScopeItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub project_name: String,
    /// Every item across all sections, in input order.
    pub items: Vec<ParsedScopeItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<ParsedSection>>,
    /// Reserved; the line grammar never fills it.
    #[serde(default)]
    pub notes: String,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sections(&self) -> &[ParsedSection] {
        self.sections.as_deref().unwrap_or(&[])
    }
}
