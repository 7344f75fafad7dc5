use anyhow::{Context, Result};
use rimscan_align::AlignCfg;
use rimscan_face::FaceCfg;
use rimscan_features::HeatmapCfg;
use rimscan_filters::{CleanCfg, SampleCfg};
use serde::{Deserialize, Serialize};

/// Every knob of the pipeline. Missing fields in JSON fall back to defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub clean: CleanCfg,
    pub align: AlignCfg,
    pub face: FaceCfg,
    pub sample: SampleCfg,
    pub heatmap: HeatmapCfg,
}

impl PipelineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing pipeline config")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
