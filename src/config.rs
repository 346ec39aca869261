// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::catalog::default_crew_rate;
use crate::context::AppContext;
use crate::model::{Bid, ClientInfo, CompanyInfo};
use crate::pricing::{DEFAULT_CHANGE_ORDER_MARKUP, DEFAULT_MARKUP_PERCENTAGE};
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

fn default_markup_percentage() -> f64 {
    DEFAULT_MARKUP_PERCENTAGE
}

fn default_change_order_markup() -> f64 {
    DEFAULT_CHANGE_ORDER_MARKUP
}

fn default_page_height() -> usize {
    60
}

fn default_page_width() -> usize {
    88
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Hourly rate applied to every labor hour on a bid.
    #[serde(default = "default_crew_rate")]
    pub labor_rate: f64,
    #[serde(default = "default_markup_percentage")]
    pub markup_percentage: f64,
    /// Fraction, e.g. 0.35 for 35%.
    #[serde(default = "default_change_order_markup")]
    pub change_order_markup: f64,
    #[serde(default = "default_true")]
    pub show_cost_plus_language: bool,
    /// Where `archive` writes submissions. Defaults to `<data>/archive`.
    #[serde(default)]
    pub archive_root: Option<PathBuf>,
    #[serde(default = "default_page_height")]
    pub page_height: usize,
    #[serde(default = "default_page_width")]
    pub page_width: usize,
    // Must stay after the plain values: TOML tables come last.
    #[serde(default)]
    pub company: CompanyInfo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labor_rate: default_crew_rate(),
            markup_percentage: DEFAULT_MARKUP_PERCENTAGE,
            change_order_markup: DEFAULT_CHANGE_ORDER_MARKUP,
            show_cost_plus_language: true,
            archive_root: None,
            page_height: 60,
            page_width: 88,
            company: CompanyInfo::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    /// Unreadable or malformed files are still errors.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Detect whether an error from [`Config::load`] means the file was absent,
    /// either by our explicit message or an IO NotFound anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn archive_root(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.archive_root {
            Some(root) => Ok(root.clone()),
            None => ctx.get_default_archive_dir(),
        }
    }

    /// Start a bid for `client` carrying this configuration's pricing and
    /// company details.
    pub fn new_bid(&self, client: ClientInfo) -> Bid {
        let mut bid = Bid::new(client);
        bid.company = self.company.clone();
        bid.change_order_markup = self.change_order_markup;
        bid.show_cost_plus_language = self.show_cost_plus_language;
        bid.set_pricing(self.labor_rate, self.markup_percentage);
        bid
    }
}
