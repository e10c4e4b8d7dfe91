//! REST collaborator that persists styles and serves raster statistics

pub mod rest;
pub mod sequence;

pub use rest::RestBackend;
pub use sequence::RequestSequencer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::BackendError;
use crate::style::{ColorPoint, Style};

/// Value distribution of a raster band
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub values: Vec<u64>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Persist a new style; returns the server's copy
    async fn create_style(&self, style: &Style) -> Result<Style, BackendError>;

    /// Overwrite an existing style; returns the server's copy
    async fn update_style(&self, style: &Style) -> Result<Style, BackendError>;

    /// Color map breakpoints the server computes for a raster rule
    async fn get_palette(
        &self,
        style_name: &str,
        rule_name: &str,
        interval: u32,
    ) -> Result<Vec<ColorPoint>, BackendError>;

    async fn get_histogram(&self, data_id: &str) -> Result<Histogram, BackendError>;
}
