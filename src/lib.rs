//! `mpg-predictor` library crate.
//!
//! The binary (`mpg`) is a thin wrapper around this library so that:
//!
//! - the feature transform and prediction path are testable without a terminal
//! - the TUI and the one-shot commands share one pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod form;
pub mod logging;
pub mod models;
pub mod report;
pub mod tui;
