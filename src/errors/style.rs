//! Style model error types

use thiserror::Error;

/// Style-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// No rule with the given name in the style
    #[error("Rule '{0}' not found")]
    RuleNotFound(String),

    /// Operation needs a selected rule
    #[error("No rule is selected")]
    NoSelection,

    /// The selected rule has no raster symbolizer to hold a color map
    #[error("Rule '{0}' has no raster symbolizer")]
    NotRaster(String),

    /// Palette range where min exceeds max
    #[error("Invalid palette range: min {min} is greater than max {max}")]
    InvalidRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Color string that is not `#rrggbb`
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
