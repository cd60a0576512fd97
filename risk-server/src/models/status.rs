//! Model status bodies

use serde::Serialize;

use santerisk_core::logic::model::ThresholdConfig;
use santerisk_core::logic::service::EngineStatus;
use santerisk_core::FeatureImportance;

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    #[serde(flatten)]
    pub engine: EngineStatus,
    pub feature_names: Vec<&'static str>,
    pub threshold: ThresholdConfig,
}

#[derive(Debug, Serialize)]
pub struct ImportancesResponse {
    /// False when the loaded model has no linear stage (or no model is loaded)
    pub available: bool,
    pub importances: Vec<FeatureImportance>,
    pub intercept: Option<f64>,
}
