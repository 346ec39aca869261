// Crate root library declaration and module exports.
pub mod archive;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod document;
pub mod model;
pub mod pricing;
pub mod storage;
