//! CLI library components for the report comparison tool.

pub mod logging;
pub mod pipeline;
