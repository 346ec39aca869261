// File: ./src/model/parser.rs
//! Free-text scope-of-work parser.
//!
//! Turns pasted or typed work descriptions such as
//!
//! ```text
//! Kitchen Renovation:
//! - Remove existing cabinets - 8 hours
//! - Install new cabinets - $8000, 24 hours
//! NOTES: Mid-size kitchen with island
//! ```
//!
//! into sections of priced line items. The grammar is line oriented:
//! soft-wrapped continuation lines are merged first, then every logical
//! line is classified as a section header, a notes line or an item, and
//! items go through the extraction rules in `model::extract`. A title line
//! (`Project: ...`) only names the project; it is classified like any
//! other line.
//! Parsing never fails; text that matches nothing still comes back as
//! bare "Custom Work" items when it is long enough to mean something.
use crate::model::category::{DEFAULT_CATEGORY, infer_category};
use crate::model::extract::{clean_description, extract_fields};
use crate::model::scope::{ParseResult, ParsedScopeItem, ParsedSection};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_PROJECT_NAME: &str = "Custom Project";
pub const DEFAULT_SECTION_NAME: &str = "General Work";
pub const FALLBACK_SECTION_NAME: &str = "Custom Work";

const MAX_HEADER_CHARS: usize = 50;
const MIN_DESCRIPTION_CHARS: usize = 3;
const MIN_FALLBACK_CHARS: usize = 10;

static NOTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^notes?:").unwrap());

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:scope of work|project|job|work|scope|renovation)(?:\s+(?:name|title))?\s*:\s*(\S.*)$",
    )
    .unwrap()
});

fn is_bullet(trimmed: &str) -> bool {
    trimmed.starts_with('-') || trimmed.starts_with('•') || trimmed.starts_with('*')
}

fn has_header_shape(trimmed: &str) -> bool {
    trimmed.ends_with(':') && !trimmed.contains('$')
}

fn is_section_header(trimmed: &str) -> bool {
    has_header_shape(trimmed) && trimmed.chars().count() < MAX_HEADER_CHARS
}

fn notes_remainder(trimmed: &str) -> Option<&str> {
    NOTES_RE.find(trimmed).map(|m| trimmed[m.end()..].trim())
}

/// Merge soft-wrapped continuation lines into their bullet line.
///
/// An indented line (two leading spaces) directly below a `-` bullet is
/// appended to it with a single space, unless it looks like a new bullet,
/// a notes line or a section header.
pub fn normalize_lines(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let raw: Vec<&str> = text.split('\n').collect();

    let mut logical: Vec<String> = Vec::with_capacity(raw.len());
    for (i, line) in raw.iter().enumerate() {
        let trimmed = line.trim();
        let starts_new = i == 0
            || is_bullet(trimmed)
            || NOTES_RE.is_match(trimmed)
            || has_header_shape(trimmed);

        let continues_bullet =
            !starts_new && line.starts_with("  ") && raw[i - 1].trim().starts_with('-');

        match logical.last_mut() {
            Some(last) if continues_bullet => {
                last.push(' ');
                last.push_str(trimmed);
            }
            _ => logical.push(line.to_string()),
        }
    }
    logical
}

/// Find the project title, if any.
fn detect_title(lines: &[String]) -> Option<String> {
    lines.iter().find_map(|line| {
        let trimmed = line.trim();
        if trimmed.starts_with('#') || is_bullet(trimmed) || trimmed.contains('$') {
            return None;
        }
        if NOTES_RE.is_match(trimmed) {
            return None;
        }
        TITLE_RE
            .captures(trimmed)
            .map(|caps| caps[1].trim().to_string())
    })
}

/// Extract a single item from a classified item line.
///
/// Returns `None` when nothing usable is left of the line: an empty
/// description, or a description of three characters or fewer with no
/// cost and no hours.
pub fn parse_item(line: &str, section_name: &str) -> Option<ParsedScopeItem> {
    let trimmed = line.trim();
    let fields = extract_fields(trimmed);
    let description = clean_description(trimmed, &fields.edits);

    let accepted = !description.is_empty()
        && (fields.material_cost > 0.0
            || fields.labor_hours > 0.0
            || description.chars().count() > MIN_DESCRIPTION_CHARS);
    if !accepted {
        log::debug!("Dropping scope line without content: {:?}", trimmed);
        return None;
    }

    Some(ParsedScopeItem {
        category: infer_category(&description).to_string(),
        description,
        material_cost: fields.material_cost,
        labor_hours: fields.labor_hours,
        section_name: section_name.to_string(),
        quantity: fields.quantity,
        unit: fields.unit,
        material_cost_per_unit: fields.material_cost_per_unit,
        labor_hours_per_unit: fields.labor_hours_per_unit,
    })
}

/// Accumulator threaded through the line scan.
#[derive(Debug)]
struct ScanState {
    section_name: String,
    section_items: Vec<ParsedScopeItem>,
    section_notes: String,
    in_notes: bool,
    sections: Vec<ParsedSection>,
    items: Vec<ParsedScopeItem>,
}

impl ScanState {
    fn new(section_name: String) -> Self {
        Self {
            section_name,
            section_items: Vec::new(),
            section_notes: String::new(),
            in_notes: false,
            sections: Vec::new(),
            items: Vec::new(),
        }
    }

    fn consume(mut self, line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return self;
        }

        if let Some(rest) = notes_remainder(trimmed) {
            self.section_notes = rest.to_string();
            self.in_notes = true;
            return self;
        }

        if self.in_notes {
            if !is_bullet(trimmed) && !trimmed.ends_with(':') {
                self.section_notes.push(' ');
                self.section_notes.push_str(trimmed);
                return self;
            }
            self.in_notes = false;
        }

        if is_section_header(trimmed) {
            self.flush();
            self.section_name = trimmed[..trimmed.len() - 1].trim().to_string();
            self.section_notes.clear();
            return self;
        }

        if let Some(item) = parse_item(trimmed, &self.section_name) {
            self.section_items.push(item.clone());
            self.items.push(item);
        }
        self
    }

    /// Close the current section. Sections without items are dropped.
    fn flush(&mut self) {
        if self.section_items.is_empty() {
            return;
        }
        let notes = self.section_notes.trim();
        self.sections.push(ParsedSection {
            name: self.section_name.clone(),
            items: std::mem::take(&mut self.section_items),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        });
        self.section_notes.clear();
    }

    fn finish(mut self) -> (Vec<ParsedSection>, Vec<ParsedScopeItem>) {
        self.flush();
        (self.sections, self.items)
    }
}

/// Fallback for text that matched no line shape at all: every fragment
/// between `;`, newlines and bullet characters that is long enough becomes
/// a bare item.
fn fallback_items(text: &str) -> Vec<ParsedScopeItem> {
    text.split(|c| matches!(c, ';' | '\n' | '•' | '-' | '*'))
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > MIN_FALLBACK_CHARS)
        .map(|fragment| ParsedScopeItem::bare(DEFAULT_CATEGORY, fragment, FALLBACK_SECTION_NAME))
        .collect()
}

/// Parse free-text scope input into sections and line items.
pub fn parse_scope(input: &str) -> ParseResult {
    let lines = normalize_lines(input);
    let project_name = detect_title(&lines);
    let initial_section = project_name
        .clone()
        .unwrap_or_else(|| DEFAULT_SECTION_NAME.to_string());

    let (sections, mut items) = lines
        .iter()
        .fold(ScanState::new(initial_section), |state, line| state.consume(line))
        .finish();

    if items.is_empty() {
        items = fallback_items(input);
        if !items.is_empty() {
            log::debug!("No scope lines recognized, fell back to {} bare items", items.len());
        }
    }

    log::debug!(
        "Parsed scope: {} items in {} sections",
        items.len(),
        sections.len()
    );

    ParseResult {
        project_name: project_name.unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
        items,
        sections: (!sections.is_empty()).then_some(sections),
        notes: String::new(),
    }
}
