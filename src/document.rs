// File: ./src/document.rs
//! Paginated plain-text rendering of a bid.
//!
//! The renderer builds a list of blocks (header, client details, one block
//! per section table, totals, terms, signatures). A block is kept on a single
//! page when it fits; longer blocks are split across pages. Every page ends
//! with a `Page n of m` footer.
use crate::model::{Bid, BidSection};
use crate::pricing::{self, format_currency};
use std::fmt;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const QTY_WIDTH: usize = 6;
const MATERIAL_WIDTH: usize = 12;
const HOURS_WIDTH: usize = 7;
const MIN_DESCRIPTION_WIDTH: usize = 16;
const MIN_PAGE_WIDTH: usize = QTY_WIDTH + MATERIAL_WIDTH + HOURS_WIDTH + 9 + MIN_DESCRIPTION_WIDTH;
/// Lines reserved at the bottom of each page: a blank line and the footer.
const FOOTER_LINES: usize = 2;
const MIN_PAGE_HEIGHT: usize = FOOTER_LINES + 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub page_height: usize,
    pub page_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_height: 60,
            page_width: 88,
        }
    }
}

impl RenderOptions {
    fn width(&self) -> usize {
        self.page_width.max(MIN_PAGE_WIDTH)
    }

    fn body_height(&self) -> usize {
        self.page_height.max(MIN_PAGE_HEIGHT) - FOOTER_LINES
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                // Form feed between pages.
                writeln!(f, "\u{c}")?;
            }
            for line in &page.lines {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

enum Block {
    Lines(Vec<String>),
    PageBreak,
}

/// Render `bid` into fixed-size text pages.
pub fn render(bid: &Bid, options: &RenderOptions) -> Document {
    let width = options.width();
    let mut blocks = vec![
        Block::Lines(header_block(bid, width)),
        Block::Lines(client_block(bid)),
        Block::Lines(summary_block(bid, width)),
    ];
    if !bid.notes.trim().is_empty() {
        blocks.push(Block::Lines(callout("PROJECT NOTES", &bid.notes, width)));
    }

    if !bid.sections.is_empty() {
        blocks.push(Block::PageBreak);
        blocks.push(Block::Lines(vec![
            "DETAILED SCOPE OF WORK".to_string(),
            "=".repeat(width),
            String::new(),
        ]));
        for section in &bid.sections {
            blocks.push(Block::Lines(section_block(section, bid.labor_rate, width)));
        }
    }

    blocks.push(Block::Lines(totals_block(bid, width)));
    blocks.push(Block::Lines(terms_block(bid, width)));
    blocks.push(Block::Lines(signature_block(bid)));

    paginate(blocks, options.body_height())
}

fn paginate(blocks: Vec<Block>, body_height: usize) -> Document {
    let mut bodies: Vec<Vec<String>> = vec![Vec::new()];

    for block in blocks {
        let lines = match block {
            Block::PageBreak => {
                if bodies.last().is_some_and(|b| !b.is_empty()) {
                    bodies.push(Vec::new());
                }
                continue;
            }
            Block::Lines(lines) => lines,
        };

        let used = bodies.last().map_or(0, Vec::len);
        if used > 0 && used + lines.len() > body_height && lines.len() <= body_height {
            bodies.push(Vec::new());
        }
        for line in lines {
            if bodies.last().map_or(0, Vec::len) >= body_height {
                bodies.push(Vec::new());
            }
            if let Some(body) = bodies.last_mut() {
                body.push(line);
            }
        }
    }

    if bodies.len() > 1 && bodies.last().is_some_and(Vec::is_empty) {
        bodies.pop();
    }

    let total = bodies.len();
    let pages = bodies
        .into_iter()
        .enumerate()
        .map(|(i, mut lines)| {
            lines.resize(body_height, String::new());
            lines.push(String::new());
            lines.push(format!("Page {} of {}", i + 1, total));
            Page {
                number: i + 1,
                lines,
            }
        })
        .collect();

    Document { pages }
}

fn header_block(bid: &Bid, width: usize) -> Vec<String> {
    let company = &bid.company;
    let mut lines = Vec::new();
    if !company.name.is_empty() {
        lines.push(company.name.to_uppercase());
    }
    if !company.tagline.is_empty() {
        lines.push(company.tagline.clone());
    }
    let contact: Vec<&str> = [&company.location, &company.email, &company.website]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if !contact.is_empty() {
        lines.push(contact.join(" | "));
    }
    lines.push("=".repeat(width));
    lines.push("PROJECT ESTIMATE".to_string());
    lines.push(format!("Date: {}", bid.created_at.format("%B %-d, %Y")));
    lines.push(String::new());
    lines
}

fn client_block(bid: &Bid) -> Vec<String> {
    let client = &bid.client;
    let mut lines = vec!["CLIENT INFORMATION".to_string()];
    lines.push(format!("  Name:     {}", client.name));
    if !client.email.is_empty() {
        lines.push(format!("  Email:    {}", client.email));
    }
    if !client.phone.is_empty() {
        lines.push(format!("  Phone:    {}", client.phone));
    }
    lines.push(format!("  Property: {}", client.property_address));
    let mut property = format!("  Type:     {}", client.property_type);
    if client.square_footage > 0.0 {
        property.push_str(&format!(", {} sq ft", client.square_footage));
    }
    lines.push(property);
    if !bid.project_timeline.is_empty() {
        lines.push(format!("  Timeline: {}", bid.project_timeline));
    }
    lines.push(String::new());
    lines
}

fn summary_block(bid: &Bid, width: usize) -> Vec<String> {
    let mut lines = vec!["PROJECT PRICING SUMMARY".to_string(), "-".repeat(width)];
    lines.push(amount_row(
        "Total Project Cost",
        &format_currency(bid.totals.total_bid),
        width,
    ));
    if bid.show_cost_plus_language {
        lines.extend(wrap(
            &format!(
                "Cost-Plus Pricing: Actual Cost + {}% Markup",
                percent(bid.markup_percentage)
            ),
            width,
        ));
    }
    lines.push(String::new());
    lines
}

fn section_block(section: &BidSection, labor_rate: f64, width: usize) -> Vec<String> {
    let description_width = width - QTY_WIDTH - MATERIAL_WIDTH - HOURS_WIDTH - 9;
    let mut lines = vec![section.name.to_uppercase()];
    lines.push(table_row(
        &["Description", "Qty", "Material", "Hours"],
        description_width,
    ));
    lines.push("-".repeat(width));

    for item in &section.items {
        let quantity = item
            .quantity
            .map(|q| match &item.unit {
                Some(unit) if unit.width() + 1 + q.to_string().len() <= QTY_WIDTH => {
                    format!("{} {}", q, unit)
                }
                _ => q.to_string(),
            })
            .unwrap_or_default();
        let material = if item.material_cost > 0.0 {
            format_currency(item.material_cost)
        } else {
            String::new()
        };
        let hours = if item.labor_hours > 0.0 {
            format!("{}", item.labor_hours)
        } else {
            String::new()
        };

        let wrapped = wrap(&item.description, description_width);
        for (i, text) in wrapped.iter().enumerate() {
            let cells: [&str; 4] = if i == 0 {
                [text.as_str(), quantity.as_str(), material.as_str(), hours.as_str()]
            } else {
                [text.as_str(), "", "", ""]
            };
            lines.push(table_row(&cells, description_width));
        }
    }

    lines.push("-".repeat(width));
    lines.push(amount_row(
        &format!("{} Subtotal", section.name),
        &format_currency(pricing::section_subtotal(section, labor_rate)),
        width,
    ));
    if let Some(notes) = section.notes.as_deref()
        && !notes.trim().is_empty()
    {
        lines.extend(callout("NOTES", notes, width));
    }
    lines.push(String::new());
    lines
}

fn totals_block(bid: &Bid, width: usize) -> Vec<String> {
    let totals = &bid.totals;
    let mut lines = vec!["PROJECT TOTALS".to_string(), "-".repeat(width)];
    lines.push(amount_row(
        "Materials",
        &format_currency(totals.material_costs),
        width,
    ));
    lines.push(amount_row(
        &format!("Labor ({}/hr)", format_currency(bid.labor_rate)),
        &format_currency(totals.labor_costs),
        width,
    ));
    lines.push(amount_row(
        "Base Cost",
        &format_currency(totals.base_cost),
        width,
    ));
    lines.push(amount_row(
        &format!("Markup ({}%)", percent(bid.markup_percentage)),
        &format_currency(totals.markup),
        width,
    ));
    lines.push("=".repeat(width));
    lines.push(amount_row(
        "TOTAL",
        &format_currency(totals.total_bid),
        width,
    ));
    lines.push(String::new());
    lines
}

fn terms_block(bid: &Bid, width: usize) -> Vec<String> {
    let markup = percent(bid.markup_percentage);
    let change_order = percent(bid.change_order_markup * 100.0);

    let paragraphs: Vec<String> = if bid.show_cost_plus_language {
        vec![
            format!("Cost-Plus Pricing: Actual Cost + {}% Markup", markup),
            "All materials billed at actual cost with receipts provided.".to_string(),
            format!(
                "Base Project: Cost + {}% | Change Orders: Cost + {}%",
                markup, change_order
            ),
            "Client acknowledges this is an ESTIMATE based on a Cost-Plus pricing model. \
             Final costs will reflect actual materials and labor used."
                .to_string(),
        ]
    } else {
        vec![
            format!(
                "Fixed Price: {} for the scope of work described above.",
                format_currency(bid.totals.total_bid)
            ),
            format!(
                "Work outside this scope is billed as a change order at cost + {}%.",
                change_order
            ),
        ]
    };

    let mut lines = vec!["TERMS AND CONDITIONS".to_string(), "-".repeat(width)];
    for paragraph in paragraphs {
        lines.extend(wrap(&paragraph, width));
    }
    lines.extend(wrap(
        "Change orders must be approved in writing before work begins.",
        width,
    ));
    lines.push(String::new());
    lines
}

fn signature_block(bid: &Bid) -> Vec<String> {
    let contractor = if bid.company.name.is_empty() {
        "Contractor".to_string()
    } else {
        bid.company.name.clone()
    };
    vec![
        "ACCEPTANCE".to_string(),
        String::new(),
        format!("{:<40}{}", "Client Signature:", "Date:"),
        format!("{:<40}{}", "_".repeat(32), "_".repeat(16)),
        format!("  {}", bid.client.name),
        String::new(),
        format!("{:<40}{}", "Contractor:", "Date:"),
        format!("{:<40}{}", "_".repeat(32), "_".repeat(16)),
        format!("  {}", contractor),
    ]
}

/// Boxed block of wrapped text.
fn callout(title: &str, text: &str, width: usize) -> Vec<String> {
    let inner = width - 4;
    let mut lines = vec![format!("┌{}┐", "─".repeat(width - 2))];
    lines.push(format!("│ {} │", pad(title, inner)));
    for paragraph in text.lines() {
        for line in wrap(paragraph, inner) {
            lines.push(format!("│ {} │", pad(&line, inner)));
        }
    }
    lines.push(format!("└{}┘", "─".repeat(width - 2)));
    lines
}

fn table_row(cells: &[&str; 4], description_width: usize) -> String {
    format!(
        "{} | {} | {} | {}",
        pad(cells[0], description_width),
        pad_left(cells[1], QTY_WIDTH),
        pad_left(cells[2], MATERIAL_WIDTH),
        pad_left(cells[3], HOURS_WIDTH)
    )
}

fn amount_row(label: &str, amount: &str, width: usize) -> String {
    let gap = width.saturating_sub(label.width() + amount.width()).max(1);
    format!("{}{}{}", label, " ".repeat(gap), amount)
}

fn percent(value: f64) -> String {
    let value = (value * 100.0).round() / 100.0;
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", " ".repeat(fill), s)
}

/// Greedy word wrap by terminal display width. Words wider than `width`
/// are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current_width + w > width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_display_width() {
        let lines = wrap("install new kitchen cabinets and hardware", 12);
        assert!(lines.iter().all(|l| l.width() <= 12));
        assert_eq!(lines.join(" "), "install new kitchen cabinets and hardware");
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_counts_wide_chars() {
        let lines = wrap("日本語のテキスト", 6);
        assert!(lines.iter().all(|l| l.width() <= 6));
    }

    #[test]
    fn percent_drops_trailing_zero() {
        assert_eq!(percent(20.0), "20");
        assert_eq!(percent(35.0), "35");
        assert_eq!(percent(12.5), "12.5");
    }
}
