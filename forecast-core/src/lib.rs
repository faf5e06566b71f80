//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - The reply parser that turns a search-grounded model answer into per-provider records
//! - The query dispatcher abstraction and its Gemini implementation
//! - Configuration & credentials handling
//! - Shared domain models, provider display names and temperature statistics
//!
//! It is used by `forecast-cli`, but the parser has no I/O and can be reused anywhere.

pub mod config;
pub mod dispatch;
pub mod display;
pub mod model;
pub mod parse;
pub mod stats;

pub use config::Config;
pub use display::provider_label;
pub use dispatch::{DispatchError, DispatchReply, QueryDispatcher, fetch_comparison};
pub use model::{CitationRecord, ComparisonResult, IconCategory, ProviderRecord};
pub use parse::{parse, parse_on};
pub use stats::TemperatureSpread;
