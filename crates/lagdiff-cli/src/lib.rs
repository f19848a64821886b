//! CLI library components for lagdiff.

pub mod logging;
pub mod output;
