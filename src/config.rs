// src/config.rs

use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

use crate::ingest::DuplicatePolicy;
use crate::model::{DisplacementModel, ProductivityModel, RiskModel};

/// Rows in the risk table need at least this many indicators present.
pub const RISK_MIN_INDICATORS: usize = 2;

/// Options applied to every source file at ingestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestOptions {
    pub duplicate_policy: DuplicatePolicy,
}

/// Everything the three pipelines can be tuned with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ingest: IngestOptions,
    pub displacement: DisplacementModel,
    /// Displacement growth target used for the years-to-threshold column.
    pub threshold_pct: f64,
    pub productivity: ProductivityModel,
    pub risk: RiskModel,
    pub risk_min_indicators: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ingest: IngestOptions::default(),
            displacement: DisplacementModel::default(),
            threshold_pct: 0.5,
            productivity: ProductivityModel::default(),
            risk: RiskModel::default(),
            risk_min_indicators: RISK_MIN_INDICATORS,
        }
    }
}

/// Where the binary reads inputs from and writes outputs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Paths {
    /// `AUTOMATION_DATA_DIR` (default `.`) and `AUTOMATION_OUT_DIR`
    /// (default `parquet`).
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("AUTOMATION_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            out_dir: env::var("AUTOMATION_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("parquet")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurveMode;

    #[test]
    fn test_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.displacement.beta, 0.3);
        assert_eq!(cfg.productivity.alpha, 0.4);
        assert_eq!(cfg.risk.mode, CurveMode::Linear);
        assert_eq!(cfg.ingest.duplicate_policy, DuplicatePolicy::KeepLast);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"displacement":{"beta":0.5},"risk":{"weight_a":1.0,"weight_w":1.0,"weight_s":1.0,"mode":"logistic","bands":{"low_below":0.33,"high_from":0.67}}}"#)
                .unwrap();
        assert_eq!(cfg.displacement.beta, 0.5);
        assert_eq!(cfg.risk.mode, CurveMode::Logistic);
        assert_eq!(cfg.threshold_pct, 0.5);
        assert_eq!(cfg.risk_min_indicators, 2);
    }
}
