// File: ./src/model/mod.rs
pub mod bid;
pub mod category;
pub mod extract;
pub mod import;
pub mod parser;
pub mod scope;

pub use bid::{Bid, BidSection, ClientInfo, CompanyInfo, PropertyType, ScopeItem};
pub use category::{CATEGORY_KEYWORDS, DEFAULT_CATEGORY, infer_category};
pub use extract::{Extraction, Rule, RULE_ORDER};
pub use import::IMPORTED_SECTION_NAME;
pub use parser::{
    DEFAULT_PROJECT_NAME, DEFAULT_SECTION_NAME, FALLBACK_SECTION_NAME, normalize_lines,
    parse_item, parse_scope,
};
pub use scope::{ParseResult, ParsedScopeItem, ParsedSection};
