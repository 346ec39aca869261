// File: ./src/archive.rs
//! Long-term bid archive.
//!
//! A submission is stored under a key built from the bid date, the client
//! and the street part of the address, so re-submitting the same bid lands
//! on the same artifacts. An existing submission is reported as a conflict
//! unless the caller explicitly asks to override it; nothing is ever
//! deleted or merged.
use crate::catalog::DEFAULT_CREW_TRADE;
use crate::model::{Bid, ScopeItem};
use crate::pricing::format_currency;
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

const ADDRESS_PREFIX_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct LaborLine {
    pub trade: String,
    pub hours: f64,
    pub rate: f64,
    pub description: String,
}

impl LaborLine {
    pub fn total(&self) -> f64 {
        self.hours * self.rate
    }
}

/// A rendered document to store next to the bid files.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub client_name: String,
    pub address: String,
    pub date: NaiveDate,
    pub total_cost: f64,
    pub markup_percentage: f64,
    pub items: Vec<ScopeItem>,
    pub labor: Vec<LaborLine>,
    pub document: Option<Attachment>,
}

impl Submission {
    /// Build a submission from a bid. Labor is reported per section at the
    /// bid's crew rate.
    pub fn from_bid(bid: &Bid) -> Self {
        let labor = bid
            .sections
            .iter()
            .filter(|s| s.labor_hours() > 0.0)
            .map(|s| LaborLine {
                trade: DEFAULT_CREW_TRADE.to_string(),
                hours: s.labor_hours(),
                rate: bid.labor_rate,
                description: s.name.clone(),
            })
            .collect();

        Self {
            client_name: bid.client.name.clone(),
            address: bid.client.property_address.clone(),
            date: bid.created_at.date_naive(),
            total_cost: bid.totals.total_bid,
            markup_percentage: bid.markup_percentage,
            items: bid.all_items().cloned().collect(),
            labor,
            document: None,
        }
    }

    pub fn with_document(mut self, file_name: &str, bytes: Vec<u8>) -> Self {
        self.document = Some(Attachment {
            file_name: file_name.to_string(),
            bytes,
        });
        self
    }

    /// `{date}_{client}_{address prefix}`, e.g.
    /// `2025-01-15_stuart_wilson_735_green_meadow_dr`.
    pub fn key(&self) -> String {
        let street = self.address.split(',').next().unwrap_or_default();
        let street: String = normalize_component(street)
            .chars()
            .take(ADDRESS_PREFIX_CHARS)
            .collect();
        format!(
            "{}_{}_{}",
            self.date.format("%Y-%m-%d"),
            normalize_component(&self.client_name),
            street
        )
    }

    /// Relative folder of this submission inside an archive.
    pub fn folder(&self) -> PathBuf {
        PathBuf::from("bids")
            .join(self.date.year().to_string())
            .join(self.key())
    }

    pub fn base_file_name(&self) -> String {
        format!("{}_estimate", normalize_component(&self.client_name))
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `_` and lowercase.
pub fn normalize_component(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Human-readable summary stored alongside the JSON.
pub fn format_markdown(sub: &Submission, generated_at: DateTime<Utc>) -> String {
    let mut content = format!("# Bid Estimate - {}\n\n", sub.client_name);
    content.push_str(&format!("**Date:** {}\n", sub.date.format("%B %-d, %Y")));
    content.push_str(&format!("**Address:** {}\n", sub.address));
    content.push_str(&format!(
        "**Total Cost:** {}\n\n",
        format_currency(sub.total_cost)
    ));

    if !sub.items.is_empty() {
        content.push_str("## Materials & Services\n\n");
        content.push_str("| Category | Description | Quantity | Unit | Price | Total |\n");
        content.push_str("|----------|-------------|----------|------|-------|-------|\n");
        for item in &sub.items {
            let quantity = item.quantity.unwrap_or(1);
            let unit = item.unit.as_deref().unwrap_or("EA");
            let unit_price = item.material_cost_per_unit.unwrap_or(item.material_cost);
            content.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                item.category,
                item.description,
                quantity,
                unit,
                format_currency(unit_price),
                format_currency(item.material_cost)
            ));
        }
        content.push('\n');
    }

    if !sub.labor.is_empty() {
        content.push_str("## Labor\n\n");
        content.push_str("| Trade | Hours | Rate/Hour | Total |\n");
        content.push_str("|-------|-------|-----------|-------|\n");
        for line in &sub.labor {
            content.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                line.trade,
                line.hours,
                format_currency(line.rate),
                format_currency(line.total())
            ));
        }
        content.push('\n');
    }

    content.push_str("---\n");
    content.push_str(&format!(
        "*Generated by bidscope on {}*\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    content
}

/// JSON layout that the bid form can import back.
pub fn format_import_json(sub: &Submission, generated_at: DateTime<Utc>) -> Result<String> {
    let labor_cost: f64 = sub.labor.iter().map(LaborLine::total).sum();
    let material_cost: f64 = sub.items.iter().map(|i| i.material_cost).sum();

    let materials: Vec<_> = sub
        .items
        .iter()
        .map(|item| {
            json!({
                "category": item.category,
                "description": item.description,
                "quantity": item.quantity.unwrap_or(1),
                "unit": item.unit.as_deref().unwrap_or("EA"),
                "unitPrice": item.material_cost_per_unit.unwrap_or(item.material_cost),
                "totalPrice": item.material_cost,
            })
        })
        .collect();

    let labor: Vec<_> = sub
        .labor
        .iter()
        .map(|line| {
            json!({
                "trade": line.trade,
                "hours": line.hours,
                "hourlyRate": line.rate,
                "total": line.total(),
                "description": line.description,
            })
        })
        .collect();

    let value = json!({
        "clientInfo": {
            "name": sub.client_name,
            "address": sub.address,
            "date": sub.date.format("%Y-%m-%d").to_string(),
        },
        "projectScope": {
            "totalCost": sub.total_cost,
            "laborCost": labor_cost,
            "materialCost": material_cost,
            "markupPercent": sub.markup_percentage,
            "baseProject": true,
        },
        "materials": materials,
        "labor": labor,
        "notes": "Imported from saved bid",
        "timestamp": generated_at.to_rfc3339(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveOutcome {
    Saved {
        location: PathBuf,
    },
    /// At least one artifact was written, some were not.
    Partial {
        location: PathBuf,
        failures: Vec<String>,
    },
    /// A submission with the same key exists; retry with an override.
    Conflict {
        key: String,
    },
}

/// Storage for finished bids. Hard failures (nothing written, storage
/// unreachable) are returned as `Err`.
pub trait BidArchive {
    fn exists(&self, submission: &Submission) -> Result<bool>;
    fn submit(&self, submission: &Submission, force_override: bool) -> Result<ArchiveOutcome>;
}

/// Archive laid out as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder(&self, submission: &Submission) -> PathBuf {
        self.root.join(submission.folder())
    }

    fn markdown_path(&self, submission: &Submission) -> PathBuf {
        self.folder(submission)
            .join(format!("{}.md", submission.base_file_name()))
    }
}

impl BidArchive for DirectoryArchive {
    fn exists(&self, submission: &Submission) -> Result<bool> {
        Ok(self.markdown_path(submission).exists())
    }

    fn submit(&self, submission: &Submission, force_override: bool) -> Result<ArchiveOutcome> {
        if !force_override && self.exists(submission)? {
            log::info!("Submission {} already archived", submission.key());
            return Ok(ArchiveOutcome::Conflict {
                key: submission.key(),
            });
        }

        let folder = self.folder(submission);
        fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create archive folder {:?}", folder))?;

        let now = Utc::now();
        let base = submission.base_file_name();
        let mut artifacts: Vec<(String, Result<Vec<u8>>)> = vec![
            (
                format!("{}.md", base),
                Ok(format_markdown(submission, now).into_bytes()),
            ),
            (
                format!("{}.json", base),
                format_import_json(submission, now).map(String::into_bytes),
            ),
        ];
        if let Some(doc) = &submission.document {
            let ext = Path::new(&doc.file_name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("txt");
            artifacts.push((format!("{}.{}", base, ext), Ok(doc.bytes.clone())));
        }

        let mut written = 0;
        let mut failures = Vec::new();
        for (name, contents) in artifacts {
            let path = folder.join(&name);
            match contents.and_then(|bytes| LocalStorage::atomic_write(&path, bytes)) {
                Ok(()) => {
                    log::info!("Archived {}", path.display());
                    written += 1;
                }
                Err(e) => {
                    log::warn!("Failed to archive {}: {}", path.display(), e);
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }

        if written == 0 {
            return Err(anyhow::anyhow!(
                "All saves failed: {}",
                failures.join("; ")
            ));
        }
        if failures.is_empty() {
            Ok(ArchiveOutcome::Saved { location: folder })
        } else {
            Ok(ArchiveOutcome::Partial {
                location: folder,
                failures,
            })
        }
    }
}
