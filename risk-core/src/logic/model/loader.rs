//! Model Loader
//!
//! Loads the persisted artifact once at startup. Never fails: any problem
//! yields `ModelLoad::Absent(reason)` and the caller falls back to the
//! closed-form formula for the rest of the process lifetime.
//!
//! An optional `<artifact>.sha256` sidecar pins the artifact's digest.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::pipeline::{LogisticPipeline, PipelineLoadError};
use super::{ModelHandle, ModelKind, RiskModel};

/// Why no model is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AbsentReason {
    NotFound(PathBuf),
    Io(String),
    Corrupt(String),
    LayoutMismatch(String),
    InvalidArtifact(String),
    ChecksumMismatch { expected: String, actual: String },
    UnsupportedFormat(String),
    OnnxDisabled,
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsentReason::NotFound(path) => write!(f, "model not found: {}", path.display()),
            AbsentReason::Io(msg) => write!(f, "cannot read model: {}", msg),
            AbsentReason::Corrupt(msg) => write!(f, "corrupt model: {}", msg),
            AbsentReason::LayoutMismatch(msg) => write!(f, "incompatible model: {}", msg),
            AbsentReason::InvalidArtifact(msg) => write!(f, "invalid model: {}", msg),
            AbsentReason::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {}, got {}", expected, actual)
            }
            AbsentReason::UnsupportedFormat(ext) => write!(f, "unsupported model format: {}", ext),
            AbsentReason::OnnxDisabled => write!(f, "ONNX support not compiled in"),
        }
    }
}

/// Loaded model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub kind: ModelKind,
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

/// Outcome of the one-time load
#[derive(Clone)]
pub enum ModelLoad {
    Loaded {
        model: ModelHandle,
        metadata: ModelMetadata,
    },
    Absent(AbsentReason),
}

impl ModelLoad {
    /// Wrap an in-memory model (tests, embedding)
    pub fn from_model(model: ModelHandle, model_path: &str) -> Self {
        let kind = model.kind();
        ModelLoad::Loaded {
            model,
            metadata: ModelMetadata {
                model_path: model_path.to_string(),
                kind,
                sha256: String::new(),
                loaded_at: Utc::now(),
            },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelLoad::Loaded { .. })
    }

    pub fn model(&self) -> Option<&dyn RiskModel> {
        match self {
            ModelLoad::Loaded { model, .. } => Some(model.as_ref()),
            ModelLoad::Absent(_) => None,
        }
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        match self {
            ModelLoad::Loaded { metadata, .. } => Some(metadata),
            ModelLoad::Absent(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&AbsentReason> {
        match self {
            ModelLoad::Loaded { .. } => None,
            ModelLoad::Absent(reason) => Some(reason),
        }
    }

    /// One-line status for the caller ("model loaded" vs "fallback formula")
    pub fn status_message(&self) -> String {
        match self {
            ModelLoad::Loaded { metadata, .. } => {
                format!("Modèle chargé ({}) ✅", metadata.model_path)
            }
            ModelLoad::Absent(_) => {
                "Aucun modèle trouvé. Utilisation de la formule logistique interprétable.".to_string()
            }
        }
    }
}

impl fmt::Debug for ModelLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLoad::Loaded { metadata, .. } => {
                f.debug_struct("Loaded").field("metadata", metadata).finish()
            }
            ModelLoad::Absent(reason) => f.debug_tuple("Absent").field(reason).finish(),
        }
    }
}

/// Load the model artifact at `path`; never raises
pub fn load_model<P: AsRef<Path>>(path: P) -> ModelLoad {
    let path = path.as_ref();
    log::info!("Loading risk model from: {}", path.display());

    match try_load(path) {
        Ok((model, metadata)) => {
            log::info!(
                "Risk model loaded ({:?}, sha256 {})",
                metadata.kind,
                short_digest(&metadata.sha256)
            );
            ModelLoad::Loaded { model, metadata }
        }
        Err(reason) => {
            log::warn!("Model unavailable ({}), using fallback formula", reason);
            ModelLoad::Absent(reason)
        }
    }
}

fn try_load(path: &Path) -> Result<(ModelHandle, ModelMetadata), AbsentReason> {
    if !path.exists() {
        return Err(AbsentReason::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| AbsentReason::Io(e.to_string()))?;
    let sha256 = hex::encode(Sha256::digest(&bytes));
    verify_sidecar_checksum(path, &sha256)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let model: ModelHandle = match extension.as_str() {
        "json" => Arc::new(LogisticPipeline::from_json(&bytes).map_err(pipeline_reason)?),
        "onnx" => load_onnx(&bytes)?,
        other => return Err(AbsentReason::UnsupportedFormat(other.to_string())),
    };

    let metadata = ModelMetadata {
        model_path: path.display().to_string(),
        kind: model.kind(),
        sha256,
        loaded_at: Utc::now(),
    };

    Ok((model, metadata))
}

fn pipeline_reason(err: PipelineLoadError) -> AbsentReason {
    use super::pipeline::ArtifactError;

    match err {
        PipelineLoadError::Parse(e) => AbsentReason::Corrupt(e.to_string()),
        PipelineLoadError::Invalid(ArtifactError::Layout(e)) => AbsentReason::LayoutMismatch(e.to_string()),
        PipelineLoadError::Invalid(e) => AbsentReason::InvalidArtifact(e.to_string()),
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(bytes: &[u8]) -> Result<ModelHandle, AbsentReason> {
    super::onnx::OnnxClassifier::from_bytes(bytes)
        .map(|m| Arc::new(m) as ModelHandle)
        .map_err(|e| AbsentReason::Corrupt(e.to_string()))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_bytes: &[u8]) -> Result<ModelHandle, AbsentReason> {
    Err(AbsentReason::OnnxDisabled)
}

/// Path of the optional digest sidecar
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".sha256");
    PathBuf::from(name)
}

fn verify_sidecar_checksum(path: &Path, actual: &str) -> Result<(), AbsentReason> {
    let sidecar = sidecar_path(path);
    if !sidecar.exists() {
        return Ok(());
    }

    let content = fs::read_to_string(&sidecar).map_err(|e| AbsentReason::Io(e.to_string()))?;
    let expected = content
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if expected != actual {
        return Err(AbsentReason::ChecksumMismatch {
            expected,
            actual: actual.to_string(),
        });
    }

    Ok(())
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::fallback::{FALLBACK_COEFFICIENTS, FALLBACK_INTERCEPT};
    use tempfile::tempdir;

    fn write_pipeline(dir: &Path) -> PathBuf {
        let path = dir.join("modele_risque.json");
        let model = LogisticPipeline::new(None, FALLBACK_COEFFICIENTS.to_vec(), FALLBACK_INTERCEPT);
        fs::write(&path, model.to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempdir().unwrap();
        let load = load_model(dir.path().join("nope.json"));
        assert!(!load.is_loaded());
        assert!(matches!(load.reason(), Some(AbsentReason::NotFound(_))));
        assert!(load.status_message().contains("formule logistique"));
    }

    #[test]
    fn test_loads_json_pipeline() {
        let dir = tempdir().unwrap();
        let path = write_pipeline(dir.path());

        let load = load_model(&path);
        assert!(load.is_loaded());
        let metadata = load.metadata().unwrap();
        assert_eq!(metadata.kind, ModelKind::LogisticPipeline);
        assert_eq!(metadata.sha256.len(), 64);
        assert!(load.model().unwrap().linear().is_some());
        assert!(load.status_message().starts_with("Modèle chargé"));
    }

    #[test]
    fn test_corrupt_file_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modele_risque.json");
        fs::write(&path, b"\x00\x01garbage").unwrap();

        assert!(matches!(load_model(&path).reason(), Some(AbsentReason::Corrupt(_))));
    }

    #[test]
    fn test_layout_mismatch_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modele_risque.json");
        let mut model = LogisticPipeline::new(None, FALLBACK_COEFFICIENTS.to_vec(), FALLBACK_INTERCEPT);
        model.layout_hash ^= 0xFFFF;
        fs::write(&path, model.to_json().unwrap()).unwrap();

        assert!(matches!(load_model(&path).reason(), Some(AbsentReason::LayoutMismatch(_))));
    }

    #[test]
    fn test_unsupported_extension_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modele_risque.joblib");
        fs::write(&path, b"pickle").unwrap();

        assert_eq!(
            load_model(&path).reason(),
            Some(&AbsentReason::UnsupportedFormat("joblib".to_string()))
        );
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_without_feature_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modele_risque.onnx");
        fs::write(&path, b"onnx").unwrap();

        assert_eq!(load_model(&path).reason(), Some(&AbsentReason::OnnxDisabled));
    }

    #[test]
    fn test_sidecar_checksum() {
        let dir = tempdir().unwrap();
        let path = write_pipeline(dir.path());
        let digest = hex::encode(Sha256::digest(fs::read(&path).unwrap()));

        fs::write(sidecar_path(&path), format!("{}  modele_risque.json\n", digest)).unwrap();
        assert!(load_model(&path).is_loaded());

        fs::write(sidecar_path(&path), "deadbeef\n").unwrap();
        assert!(matches!(
            load_model(&path).reason(),
            Some(AbsentReason::ChecksumMismatch { .. })
        ));
    }
}
