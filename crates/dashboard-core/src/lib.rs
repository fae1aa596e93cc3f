//! Core domain types and ambient utilities for the commerce dashboard.
//!
//! Holds the order-line record model, the selector enums consumed by the
//! filter layer, error types, display formatting helpers, calendar
//! utilities and the CLI settings layer. No dataset I/O happens here.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
