// File: ./src/model/extract.rs
//! Field extraction for a single scope line.
//!
//! Each [`Rule`] looks for one recognizable shape (a quantity priced per
//! unit, a material cost, labor hours, a bare trailing price) and reports
//! the values it found plus the byte span it consumed. Rules run in the
//! fixed order of [`RULE_ORDER`]; a rule may refuse to run depending on
//! what earlier rules captured (see [`Rule::is_enabled`]).
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Amount with optional thousands separators and decimals ("8,000", "7.50").
const AMOUNT: &str = r"[0-9][0-9,]*(?:\.[0-9]+)?";

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)([0-9]+)\s+(\w+)\s*@\s*\$?({AMOUNT})\s*(?:each|per|/)?"
    ))
    .unwrap()
});

static MATERIAL_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\$?({AMOUNT})\s*(?:materials?\b|mat\b\.?)")).unwrap()
});

static MATERIAL_DASH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)[-–]\s*\$?({AMOUNT})\s*(?:materials?)?\s*(?:,|$)"
    ))
    .unwrap()
});

static LABOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:hours?|hrs?)\b(?:\s*labor)?").unwrap()
});

static TRAILING_PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\$?({AMOUNT})\s*$")).unwrap());

static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
static LEADING_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-•*]\s*").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    QuantityUnitPrice,
    MaterialCost,
    LaborHours,
    TrailingPrice,
}

pub const RULE_ORDER: [Rule; 4] = [
    Rule::QuantityUnitPrice,
    Rule::MaterialCost,
    Rule::LaborHours,
    Rule::TrailingPrice,
];

/// Values a single rule pulled out of a line.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Quantity {
        quantity: u32,
        unit: String,
        unit_price: f64,
    },
    MaterialCost(f64),
    LaborHours(f64),
    TrailingPrice(f64),
}

/// A span of the line to drop from the description, or to rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub extraction: Extraction,
    pub edit: Edit,
}

/// Accumulated result of running every rule over one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub material_cost: f64,
    pub labor_hours: f64,
    pub quantity: Option<u32>,
    pub unit: Option<String>,
    pub material_cost_per_unit: Option<f64>,
    pub labor_hours_per_unit: Option<f64>,
    pub edits: Vec<Edit>,
}

impl Rule {
    /// Whether this rule may run given what earlier rules captured.
    pub fn is_enabled(&self, fields: &ExtractedFields) -> bool {
        match self {
            Rule::QuantityUnitPrice | Rule::LaborHours => true,
            Rule::MaterialCost => fields.quantity.is_none(),
            Rule::TrailingPrice => {
                fields.quantity.is_none()
                    && fields.material_cost == 0.0
                    && fields.labor_hours == 0.0
            }
        }
    }

    /// Run this rule alone against a line.
    pub fn apply(&self, line: &str) -> Option<RuleMatch> {
        match self {
            Rule::QuantityUnitPrice => {
                let caps = QUANTITY_RE.captures(line)?;
                let whole = caps.get(0)?;
                let quantity = caps[1].parse::<u32>().ok()?;
                let unit = caps[2].to_string();
                let unit_price = parse_amount(&caps[3])?;
                if !(f64::from(quantity) * unit_price).is_finite() {
                    return None;
                }
                Some(RuleMatch {
                    edit: Edit {
                        span: whole.range(),
                        replacement: Some(format!("{} {}", quantity, unit)),
                    },
                    extraction: Extraction::Quantity {
                        quantity,
                        unit,
                        unit_price,
                    },
                })
            }
            Rule::MaterialCost => {
                // Explicit "materials" keyword wins over the dash-prefixed form.
                let caps = MATERIAL_KEYWORD_RE
                    .captures(line)
                    .or_else(|| MATERIAL_DASH_RE.captures(line))?;
                let amount = parse_amount(&caps[1])?;
                Some(removal(line, caps.get(0)?.range(), Extraction::MaterialCost(amount)))
            }
            Rule::LaborHours => {
                let caps = LABOR_RE.captures(line)?;
                let hours = caps[1].parse::<f64>().ok().filter(|h| h.is_finite())?;
                Some(removal(line, caps.get(0)?.range(), Extraction::LaborHours(hours)))
            }
            Rule::TrailingPrice => {
                let caps = TRAILING_PRICE_RE.captures(line)?;
                let amount = parse_amount(&caps[1])?;
                Some(RuleMatch {
                    edit: Edit {
                        span: caps.get(0)?.range(),
                        replacement: None,
                    },
                    extraction: Extraction::TrailingPrice(amount),
                })
            }
        }
    }
}

impl ExtractedFields {
    fn absorb(mut self, found: RuleMatch) -> Self {
        match found.extraction {
            Extraction::Quantity {
                quantity,
                unit,
                unit_price,
            } => {
                self.quantity = Some(quantity);
                self.unit = Some(unit);
                self.material_cost_per_unit = Some(unit_price);
                self.material_cost = f64::from(quantity) * unit_price;
            }
            Extraction::MaterialCost(amount) | Extraction::TrailingPrice(amount) => {
                self.material_cost = amount;
            }
            Extraction::LaborHours(hours) => {
                self.labor_hours = hours;
                if let Some(q) = self.quantity
                    && q > 0
                    && self.labor_hours_per_unit.is_none()
                {
                    self.labor_hours_per_unit = Some(hours / f64::from(q));
                }
            }
        }
        self.edits.push(found.edit);
        self
    }
}

/// Run all rules in precedence order over a trimmed line.
pub fn extract_fields(line: &str) -> ExtractedFields {
    RULE_ORDER
        .iter()
        .fold(ExtractedFields::default(), |fields, rule| {
            if !rule.is_enabled(&fields) {
                return fields;
            }
            match rule.apply(line) {
                Some(found) => {
                    log::trace!("{:?} matched {:?} in {:?}", rule, found.extraction, line);
                    fields.absorb(found)
                }
                None => fields,
            }
        })
}

/// Build the item description: apply the edits, drop parenthesized
/// annotations and the bullet marker, then tidy separators and spacing.
pub fn clean_description(line: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| e.span.start);

    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for edit in ordered {
        let start = edit.span.start.max(cursor);
        if start >= edit.span.end {
            continue;
        }
        out.push_str(&line[cursor..start]);
        if let Some(replacement) = &edit.replacement {
            out.push_str(replacement);
        }
        cursor = edit.span.end;
    }
    out.push_str(&line[cursor..]);

    let out = PARENTHETICAL_RE.replace_all(&out, "");
    let out = LEADING_BULLET_RE.replace(&out, "");
    let out = WHITESPACE_RE.replace_all(&out, " ");
    out.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | ',' | ';'))
        .to_string()
}

/// Amounts too large for an `f64` are rejected: infinity cannot be
/// stored as JSON.
fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn removal(line: &str, span: Range<usize>, extraction: Extraction) -> RuleMatch {
    RuleMatch {
        edit: Edit {
            span: widen_separators(line, span),
            replacement: None,
        },
        extraction,
    }
}

/// Extend a removal span over the " - " or ", " that introduced it and a
/// trailing comma, so "Demo - $500 materials, 8 hours" does not leave
/// dangling punctuation behind.
fn widen_separators(line: &str, span: Range<usize>) -> Range<usize> {
    let mut start = span.start;
    let before = line[..start].trim_end();
    if let Some(sep) = before.chars().next_back()
        && matches!(sep, '-' | '–' | ',')
    {
        start = before[..before.len() - sep.len_utf8()].trim_end().len();
    }

    let mut end = span.end;
    let rest = line[end..].trim_start();
    if rest.starts_with(',') {
        end = line.len() - rest.len() + 1;
    }
    start..end
}
