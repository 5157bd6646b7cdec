//! Data models: configuration, extracted documents and per-type records.

pub mod config;
pub mod document;
pub mod records;
