//! Data layer for the commerce dashboard.
//!
//! Responsible for loading the flat order-line dataset from CSV,
//! deriving the seven summary tables consumed by the presentation
//! layer, narrowing the monthly table per the user's metric/year
//! selectors, and running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod selector;

pub use dashboard_core as core;
