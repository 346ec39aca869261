// File: ./src/catalog.rs
//! Read-only lookup tables: crew and trade labor rates, past projects used
//! for per-square-foot estimates, and reusable project templates.
use crate::model::ParsedScopeItem;
use chrono::NaiveDate;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborRate {
    pub trade: &'static str,
    pub hourly_rate: f64,
    pub minimum_charge: f64,
    pub is_internal: bool,
}

const fn rate(trade: &'static str, hourly_rate: f64, is_internal: bool) -> LaborRate {
    LaborRate {
        trade,
        hourly_rate,
        // Four-hour minimum on every trade
        minimum_charge: hourly_rate * 4.0,
        is_internal,
    }
}

/// Trade whose rate prices all labor hours on a bid unless configured otherwise.
pub const DEFAULT_CREW_TRADE: &str = "General Carpenter (Our Crew)";
pub const DEFAULT_LABOR_RATE: f64 = 65.0;

pub static LABOR_RATES: &[LaborRate] = &[
    // Our crew
    rate("General Laborer (Our Crew)", 45.0, true),
    rate("General Carpenter (Our Crew)", 65.0, true),
    rate("Master Carpenter (Our Crew)", 85.0, true),
    rate("Construction Manager", 150.0, true),
    // External contractors
    rate("General Laborer (External)", 45.0, false),
    rate("General Carpenter (External)", 65.0, false),
    rate("Master Carpenter (External)", 85.0, false),
    rate("Electrician", 95.0, false),
    rate("Master Electrician", 125.0, false),
    rate("Plumber", 95.0, false),
    rate("Master Plumber", 125.0, false),
    rate("HVAC Technician", 105.0, false),
    rate("Painter", 55.0, false),
    rate("Drywall Installer", 60.0, false),
    rate("Tile Installer", 75.0, false),
    rate("Flooring Installer", 65.0, false),
    rate("Roofer", 70.0, false),
    rate("Designer/Architect", 150.0, false),
];

pub fn find_labor_rate(trade: &str) -> Option<&'static LaborRate> {
    LABOR_RATES
        .iter()
        .find(|r| r.trade.eq_ignore_ascii_case(trade))
}

/// Hourly rate of the default crew trade.
pub fn default_crew_rate() -> f64 {
    find_labor_rate(DEFAULT_CREW_TRADE)
        .map(|r| r.hourly_rate)
        .unwrap_or(DEFAULT_LABOR_RATE)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalProject {
    pub id: &'static str,
    pub address: &'static str,
    pub square_footage: f64,
    pub total_cost: f64,
    /// ISO date, `YYYY-MM-DD`
    pub completion_date: &'static str,
    pub scope: &'static str,
}

impl HistoricalProject {
    pub fn completion_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.completion_date, "%Y-%m-%d").ok()
    }

    pub fn cost_per_square_foot(&self) -> f64 {
        self.total_cost / self.square_footage
    }
}

pub static HISTORICAL_PROJECTS: &[HistoricalProject] = &[
    HistoricalProject {
        id: "1",
        address: "123 Aspen Mountain Rd",
        square_footage: 3500.0,
        total_cost: 285000.0,
        completion_date: "2024-06-15",
        scope: "Full kitchen remodel, master bathroom renovation",
    },
    HistoricalProject {
        id: "2",
        address: "456 Snowmass Village",
        square_footage: 4200.0,
        total_cost: 425000.0,
        completion_date: "2024-05-20",
        scope: "Complete home renovation, new deck, kitchen and 3 bathrooms",
    },
    HistoricalProject {
        id: "3",
        address: "789 Red Mountain",
        square_footage: 2800.0,
        total_cost: 195000.0,
        completion_date: "2024-07-10",
        scope: "Kitchen remodel, flooring replacement throughout",
    },
    HistoricalProject {
        id: "4",
        address: "321 Buttermilk Rd",
        square_footage: 5000.0,
        total_cost: 580000.0,
        completion_date: "2024-04-05",
        scope: "Luxury master suite addition, wine cellar, home theater",
    },
    HistoricalProject {
        id: "5",
        address: "654 Highlands Dr",
        square_footage: 3200.0,
        total_cost: 220000.0,
        completion_date: "2024-08-12",
        scope: "Two bathroom remodels, new hardwood floors, painting",
    },
    HistoricalProject {
        id: "6",
        address: "987 Ajax Ave",
        square_footage: 4500.0,
        total_cost: 510000.0,
        completion_date: "2024-03-25",
        scope: "Complete interior renovation, new electrical and plumbing",
    },
    HistoricalProject {
        id: "7",
        address: "147 Tiehack Rd",
        square_footage: 2500.0,
        total_cost: 165000.0,
        completion_date: "2024-09-01",
        scope: "Kitchen update, new appliances, cabinet refacing",
    },
    HistoricalProject {
        id: "8",
        address: "258 Shadow Mountain",
        square_footage: 6000.0,
        total_cost: 750000.0,
        completion_date: "2024-02-14",
        scope: "Full home remodel, structural modifications, high-end finishes",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TemplateCategory {
    Bathroom,
    Kitchen,
    Fixture,
    Room,
    Exterior,
    Systems,
    Flooring,
    WindowsDoors,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostRange {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// One line of a template. Per-unit lines carry `quantity`,
/// `material_cost_per_unit` and `labor_hours_per_unit` and scale with the
/// size the operator asks for; the rest are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    pub category: &'static str,
    pub description: &'static str,
    pub material_cost: f64,
    pub labor_hours: f64,
    pub quantity: Option<u32>,
    pub unit: Option<&'static str>,
    pub material_cost_per_unit: Option<f64>,
    pub labor_hours_per_unit: Option<f64>,
}

const fn fixed(
    category: &'static str,
    description: &'static str,
    material_cost: f64,
    labor_hours: f64,
) -> TemplateItem {
    TemplateItem {
        category,
        description,
        material_cost,
        labor_hours,
        quantity: None,
        unit: None,
        material_cost_per_unit: None,
        labor_hours_per_unit: None,
    }
}

const fn per_unit(
    category: &'static str,
    description: &'static str,
    quantity: u32,
    unit: &'static str,
    material_cost_per_unit: f64,
    labor_hours_per_unit: f64,
) -> TemplateItem {
    TemplateItem {
        category,
        description,
        material_cost: material_cost_per_unit * quantity as f64,
        labor_hours: labor_hours_per_unit * quantity as f64,
        quantity: Some(quantity),
        unit: Some(unit),
        material_cost_per_unit: Some(material_cost_per_unit),
        labor_hours_per_unit: Some(labor_hours_per_unit),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub description: &'static str,
    pub default_unit: Option<&'static str>,
    pub default_quantity: Option<u32>,
    pub average_cost: CostRange,
    pub items: &'static [TemplateItem],
}

impl ProjectTemplate {
    /// Materialize the template's items for a section.
    ///
    /// With a quantity (explicit, or the template default) every per-unit
    /// line is rescaled to it; fixed lines are copied unchanged.
    pub fn instantiate(
        &self,
        section_name: Option<&str>,
        custom_quantity: Option<u32>,
    ) -> Vec<ParsedScopeItem> {
        let section = section_name.unwrap_or(self.name);
        let quantity = custom_quantity.or(self.default_quantity);

        self.items
            .iter()
            .map(|item| {
                let mut out = ParsedScopeItem::bare(item.category, item.description, section);
                out.material_cost = item.material_cost;
                out.labor_hours = item.labor_hours;
                out.quantity = item.quantity;
                out.unit = item.unit.map(str::to_string);
                out.material_cost_per_unit = item.material_cost_per_unit;
                out.labor_hours_per_unit = item.labor_hours_per_unit;

                if let (Some(q), Some(per_unit), Some(_)) =
                    (quantity, item.material_cost_per_unit, item.quantity)
                {
                    out.quantity = Some(q);
                    out.material_cost = per_unit * f64::from(q);
                    out.labor_hours = item.labor_hours_per_unit.unwrap_or(0.0) * f64::from(q);
                }
                out
            })
            .collect()
    }

    /// Mid-range cost per default unit, when the template is sized.
    pub fn mid_cost_per_unit(&self) -> Option<f64> {
        match (self.default_unit, self.default_quantity) {
            (Some(_), Some(q)) if q > 0 => Some(self.average_cost.mid / f64::from(q)),
            _ => None,
        }
    }
}

pub static PROJECT_TEMPLATES: &[ProjectTemplate] = &[
    ProjectTemplate {
        id: "full-bathroom",
        name: "Full Bathroom Remodel",
        category: TemplateCategory::Bathroom,
        description: "Complete bathroom renovation including all fixtures",
        default_unit: None,
        default_quantity: None,
        average_cost: CostRange {
            low: 12000.0,
            mid: 20000.0,
            high: 35000.0,
        },
        items: &[
            fixed(
                "Demolition",
                "Remove existing bathroom fixtures, flooring, and wall coverings",
                300.0,
                16.0,
            ),
            fixed(
                "Plumbing",
                "Rough-in plumbing for toilet, sink, shower/tub",
                1500.0,
                24.0,
            ),
            fixed(
                "Electrical",
                "GFCI outlets, vanity lighting, exhaust fan wiring",
                600.0,
                12.0,
            ),
            fixed(
                "Flooring",
                "Waterproof vinyl plank or tile flooring (50 sq ft)",
                750.0,
                8.0,
            ),
            fixed(
                "Drywall",
                "Moisture-resistant drywall and finishing",
                400.0,
                12.0,
            ),
            fixed(
                "Tiling",
                "Shower surround tile (80 sq ft) with waterproofing",
                1200.0,
                20.0,
            ),
            fixed("Fixtures", "Toilet - Kohler Cimarron or similar", 400.0, 3.0),
            fixed(
                "Fixtures",
                "Vanity - 36\" single sink with quartz top",
                1200.0,
                4.0,
            ),
            fixed(
                "Fixtures",
                "Shower system - Delta or Moen with glass door",
                1500.0,
                8.0,
            ),
            fixed("Fixtures", "Medicine cabinet and accessories", 300.0, 2.0),
            fixed("Painting", "Prime and paint walls and ceiling", 150.0, 6.0),
            fixed("Finishing", "Trim, caulking, and final touches", 200.0, 4.0),
        ],
    },
    ProjectTemplate {
        id: "half-bathroom",
        name: "Half Bathroom Remodel",
        category: TemplateCategory::Bathroom,
        description: "Powder room renovation (toilet and sink only)",
        default_unit: None,
        default_quantity: None,
        average_cost: CostRange {
            low: 5000.0,
            mid: 8000.0,
            high: 12000.0,
        },
        items: &[
            fixed("Demolition", "Remove existing fixtures and finishes", 150.0, 8.0),
            fixed("Plumbing", "Rough-in plumbing for toilet and sink", 800.0, 12.0),
            fixed("Electrical", "GFCI outlet and vanity lighting", 300.0, 6.0),
            fixed(
                "Flooring",
                "Luxury vinyl or tile flooring (25 sq ft)",
                375.0,
                4.0,
            ),
            fixed("Drywall", "Patch and repair drywall as needed", 200.0, 6.0),
            fixed("Fixtures", "Toilet - American Standard or similar", 300.0, 3.0),
            fixed("Fixtures", "Pedestal sink or 24\" vanity", 500.0, 3.0),
            fixed("Fixtures", "Mirror and accessories", 150.0, 1.0),
            fixed("Painting", "Prime and paint walls and ceiling", 100.0, 4.0),
        ],
    },
    ProjectTemplate {
        id: "roof-asphalt",
        name: "Asphalt Shingle Roof (1500 sq ft)",
        category: TemplateCategory::Exterior,
        description: "Complete tear-off and replacement with architectural shingles",
        default_unit: Some("sq ft"),
        default_quantity: Some(1500),
        average_cost: CostRange {
            low: 6000.0,
            mid: 9000.0,
            high: 13500.0,
        },
        items: &[
            per_unit(
                "Demolition",
                "Remove existing shingles and underlayment",
                1500,
                "sq ft",
                0.25,
                0.012,
            ),
            per_unit(
                "Materials",
                "Architectural shingles - 30 year warranty",
                1500,
                "sq ft",
                1.50,
                0.0,
            ),
            per_unit(
                "Materials",
                "Ice and water shield, synthetic underlayment",
                1500,
                "sq ft",
                0.60,
                0.0,
            ),
            per_unit(
                "Installation",
                "Install shingles, ridge vents, and flashing",
                1500,
                "sq ft",
                0.25,
                0.02,
            ),
            fixed("Materials", "New gutters and downspouts", 1200.0, 8.0),
            fixed("Finishing", "Cleanup and disposal", 300.0, 4.0),
        ],
    },
    ProjectTemplate {
        id: "windows-full-house",
        name: "Window Replacement (10 windows)",
        category: TemplateCategory::WindowsDoors,
        description: "Replace all windows",
        default_unit: Some("windows"),
        default_quantity: Some(10),
        average_cost: CostRange {
            low: 8000.0,
            mid: 15000.0,
            high: 25000.0,
        },
        items: &[
            fixed("Demolition", "Remove existing windows", 0.0, 10.0),
            per_unit(
                "Windows",
                "Double-hung vinyl windows - Energy Star rated",
                10,
                "windows",
                500.0,
                0.0,
            ),
            per_unit(
                "Installation",
                "Install windows with proper flashing",
                10,
                "windows",
                50.0,
                2.0,
            ),
            fixed("Trim", "Interior and exterior trim", 800.0, 16.0),
            fixed(
                "Finishing",
                "Caulking, insulation, and touch-up paint",
                200.0,
                8.0,
            ),
        ],
    },
    ProjectTemplate {
        id: "entry-door",
        name: "Entry Door Replacement",
        category: TemplateCategory::WindowsDoors,
        description: "New fiberglass or steel entry door with sidelights",
        default_unit: None,
        default_quantity: None,
        average_cost: CostRange {
            low: 2500.0,
            mid: 4000.0,
            high: 6000.0,
        },
        items: &[
            fixed("Demolition", "Remove existing door and frame", 0.0, 2.0),
            fixed("Materials", "Fiberglass entry door with sidelights", 2000.0, 0.0),
            fixed(
                "Installation",
                "Install door, adjust, and weatherproof",
                100.0,
                6.0,
            ),
            fixed("Hardware", "Smart lock and door hardware", 400.0, 1.0),
            fixed("Finishing", "Trim work and threshold adjustment", 150.0, 3.0),
        ],
    },
    ProjectTemplate {
        id: "water-heater",
        name: "Water Heater Replacement",
        category: TemplateCategory::Systems,
        description: "New 50-gallon water heater installation",
        default_unit: None,
        default_quantity: None,
        average_cost: CostRange {
            low: 1500.0,
            mid: 2200.0,
            high: 3500.0,
        },
        items: &[
            fixed("Demolition", "Remove and dispose old water heater", 0.0, 2.0),
            fixed(
                "Equipment",
                "50-gallon gas water heater - Energy Star",
                1200.0,
                0.0,
            ),
            fixed("Plumbing", "Connect water lines and gas", 150.0, 4.0),
            fixed("Venting", "Install or modify venting", 200.0, 2.0),
            fixed("Safety", "Expansion tank and pressure relief", 150.0, 1.0),
        ],
    },
    ProjectTemplate {
        id: "hardwood-floors",
        name: "Hardwood Flooring (500 sq ft)",
        category: TemplateCategory::Flooring,
        description: "Install hardwood flooring",
        default_unit: Some("sq ft"),
        default_quantity: Some(500),
        average_cost: CostRange {
            low: 4000.0,
            mid: 6000.0,
            high: 9000.0,
        },
        items: &[
            fixed("Demolition", "Remove existing flooring", 0.0, 8.0),
            per_unit(
                "Materials",
                "Oak hardwood flooring - 3/4\" solid",
                500,
                "sq ft",
                5.00,
                0.0,
            ),
            fixed("Subfloor", "Subfloor prep and leveling", 300.0, 6.0),
            per_unit(
                "Installation",
                "Install hardwood flooring",
                500,
                "sq ft",
                0.40,
                0.048,
            ),
            fixed("Finishing", "Sand, stain, and apply finish", 500.0, 16.0),
            fixed("Trim", "Baseboards and transitions", 300.0, 6.0),
        ],
    },
];

pub fn find_template(id: &str) -> Option<&'static ProjectTemplate> {
    PROJECT_TEMPLATES.iter().find(|t| t.id == id)
}

pub fn templates_in(category: TemplateCategory) -> impl Iterator<Item = &'static ProjectTemplate> {
    PROJECT_TEMPLATES
        .iter()
        .filter(move |t| t.category == category)
}
