//! Result presentation: metric label, progress ratio, and text summaries.

pub mod format;

pub use format::*;
