//! Risk Service - Request orchestration
//!
//! Holds the model loaded once at startup (read-only, shared across
//! requests) and runs the pipeline for one request:
//! validate → score → classify → summarize → explain.
//!
//! Each request is independent; the only shared mutable state is a set
//! of counters.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::dataset::RawTable;
use super::explain::{explain_batch, importances, Attributor, ExactShapley, Explanation, FeatureImportance};
use super::features::{Batch, LayoutInfo, Record};
use super::model::{load_model, ModelError, ModelLoad, ModelMetadata};
use super::scoring::{ScoredBatch, ScoredRecord, Scorer};
use super::summary::{summarize, Summary};
use super::validate::{validate_and_coerce, validate_records, ValidationReport};
use crate::constants::{MAX_EXPLAIN_BACKGROUND, MAX_EXPLAIN_ROWS};

// ============================================================================
// ERRORS
// ============================================================================

/// Failure of one request; nothing is partially returned
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    Validation(#[from] ValidationReport),

    #[error("Seuil invalide: {0} (attendu entre 0 et 1)")]
    Threshold(f64),

    #[error("Erreur du modèle: {0}")]
    Model(#[from] ModelError),
}

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

/// Per-request batch options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Run the bounded attribution demo
    pub explain: bool,
}

/// Single-record result
#[derive(Debug, Clone, Serialize)]
pub struct SingleOutcome {
    pub record: ScoredRecord,
    pub importances: Vec<FeatureImportance>,
}

/// Batch result
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub scored: ScoredBatch,
    pub summary: Summary,
    pub importances: Vec<FeatureImportance>,
    pub explanation: Option<Explanation>,
    /// Non-fatal notices (attribution unavailable, etc.)
    pub warnings: Vec<String>,
}

// ============================================================================
// STATUS
// ============================================================================

/// Model section of the engine status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub engine: String,
    pub loaded: bool,
    pub metadata: Option<ModelMetadata>,
    pub reason: Option<String>,
    pub message: String,
}

/// Request counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoringStats {
    pub requests: u64,
    pub completed: u64,
    pub records_scored: u64,
    pub validation_failures: u64,
    pub model_failures: u64,
    /// Mean latency of completed requests
    pub avg_latency_ms: f64,
}

/// Snapshot of the engine for status endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,
    pub model: ModelStatus,
    pub stats: ScoringStats,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    completed: AtomicU64,
    latency_us: AtomicU64,
    records_scored: AtomicU64,
    validation_failures: AtomicU64,
    model_failures: AtomicU64,
}

impl Counters {
    fn complete(&self, started: Instant) {
        let elapsed = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.latency_us.fetch_add(elapsed, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ScoringStats {
        let completed = self.completed.load(Ordering::Relaxed);
        let latency_us = self.latency_us.load(Ordering::Relaxed);
        ScoringStats {
            requests: self.requests.load(Ordering::Relaxed),
            completed,
            avg_latency_ms: if completed > 0 {
                latency_us as f64 / completed as f64 / 1000.0
            } else {
                0.0
            },
            records_scored: self.records_scored.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            model_failures: self.model_failures.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// SERVICE
// ============================================================================

/// Scoring service over a model loaded once
pub struct RiskService {
    model: ModelLoad,
    attributor: Box<dyn Attributor>,
    counters: Counters,
}

impl RiskService {
    pub fn new(model: ModelLoad) -> Self {
        Self::with_attributor(model, Box::new(ExactShapley))
    }

    pub fn with_attributor(model: ModelLoad, attributor: Box<dyn Attributor>) -> Self {
        Self {
            model,
            attributor,
            counters: Counters::default(),
        }
    }

    /// Load the artifact at `path` (absent → fallback formula)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::new(load_model(path))
    }

    pub fn model(&self) -> &ModelLoad {
        &self.model
    }

    /// Global importances of the loaded model; empty without one
    pub fn importances(&self) -> Vec<FeatureImportance> {
        self.model.model().map(importances).unwrap_or_default()
    }

    /// Intercept of the loaded model's linear stage, if it has one
    pub fn intercept(&self) -> Option<f64> {
        self.model.model()?.linear().map(|linear| linear.intercept())
    }

    pub fn stats(&self) -> ScoringStats {
        self.counters.snapshot()
    }

    pub fn status(&self) -> EngineStatus {
        let layout = LayoutInfo::current();
        let engine = match self.model.metadata() {
            Some(meta) => format!("{:?}", meta.kind),
            None => "Fallback".to_string(),
        };

        EngineStatus {
            feature_version: layout.version,
            layout_hash: layout.hash,
            feature_count: layout.feature_count,
            model: ModelStatus {
                engine,
                loaded: self.model.is_loaded(),
                metadata: self.model.metadata().cloned(),
                reason: self.model.reason().map(|r| r.to_string()),
                message: self.model.status_message(),
            },
            stats: self.stats(),
        }
    }

    /// Score one record (interactive mode)
    pub fn score_record(&self, record: Record, threshold: f64) -> Result<SingleOutcome, RequestError> {
        let started = Instant::now();
        self.begin(threshold)?;

        let issues = validate_records(std::slice::from_ref(&record));
        if !issues.is_empty() {
            self.counters.validation_failures.fetch_add(1, Ordering::Relaxed);
            return Err(ValidationReport::new(issues).into());
        }

        let batch = Batch::from_records(vec![record]);
        let scored = self.score(&batch, threshold)?;
        let record = scored.into_rows().into_iter().next().ok_or(ModelError::OutputShape {
            rows: 0,
            cols: 2,
            expected_rows: 1,
        })?;

        self.counters.complete(started);
        Ok(SingleOutcome {
            record,
            importances: self.importances(),
        })
    }

    /// Score a raw table (batch mode)
    pub fn score_table(
        &self,
        table: &RawTable,
        threshold: f64,
        options: BatchOptions,
    ) -> Result<BatchOutcome, RequestError> {
        let started = Instant::now();
        self.begin(threshold)?;

        let batch = validate_and_coerce(table).map_err(|report| {
            self.counters.validation_failures.fetch_add(1, Ordering::Relaxed);
            log::info!("Batch rejected: {}", report);
            report
        })?;

        let scored = self.score(&batch, threshold)?;
        let summary = summarize(scored.rows());

        let mut warnings = Vec::new();
        let explanation = if options.explain {
            self.explain(&batch, &mut warnings)
        } else {
            None
        };

        log::info!(
            "Scored batch of {} rows ({} at risk)",
            summary.total,
            summary.pct_at_risk
        );

        self.counters.complete(started);
        Ok(BatchOutcome {
            scored,
            summary,
            importances: self.importances(),
            explanation,
            warnings,
        })
    }

    fn begin(&self, threshold: f64) -> Result<(), RequestError> {
        self.counters.requests.fetch_add(1, Ordering::Relaxed);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RequestError::Threshold(threshold));
        }
        Ok(())
    }

    fn score(&self, batch: &Batch, threshold: f64) -> Result<ScoredBatch, RequestError> {
        match Scorer::predict(batch, self.model.model(), threshold) {
            Ok(scored) => {
                self.counters
                    .records_scored
                    .fetch_add(scored.len() as u64, Ordering::Relaxed);
                Ok(scored)
            }
            Err(e) => {
                self.counters.model_failures.fetch_add(1, Ordering::Relaxed);
                log::error!("Model failure: {}", e);
                Err(e.into())
            }
        }
    }

    /// Attribution demo; failures become warnings, never request errors
    fn explain(&self, batch: &Batch, warnings: &mut Vec<String>) -> Option<Explanation> {
        let Some(model) = self.model.model() else {
            warnings.push("SHAP non disponible: aucun modèle chargé.".to_string());
            return None;
        };

        let rows = batch.feature_rows();
        match explain_batch(
            model,
            &rows,
            MAX_EXPLAIN_BACKGROUND,
            MAX_EXPLAIN_ROWS,
            self.attributor.as_ref(),
        ) {
            Ok(Some(explanation)) => Some(explanation),
            Ok(None) => {
                warnings.push("Pas de données suffisantes pour SHAP.".to_string());
                None
            }
            Err(e) => {
                log::warn!("Attribution failed: {}", e);
                warnings.push(format!("SHAP non disponible: {}", e));
                None
            }
        }
    }
}
