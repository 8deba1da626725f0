use std::path::{Path, PathBuf};

use crate::alignment::AlignerConfig;

/// Environment variable naming a ggml model file, overriding the model name.
pub const MODEL_PATH_ENV: &str = "WHISPER_MODEL_PATH";
/// Whisper model used when none is requested.
pub const DEFAULT_MODEL: &str = "small";
const DEFAULT_MODELS_DIR: &str = "./models";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub aligner: AlignerConfig,
}

impl AppConfig {
    /// Resolve the whisper model path: explicit override, then
    /// `WHISPER_MODEL_PATH`, then `./models/ggml-<model>.bin`.
    pub fn resolve(model: &str, model_path: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os(MODEL_PATH_ENV).map(PathBuf::from);
        Self::from_sources(model, model_path, env_path)
    }

    fn from_sources(model: &str, model_path: Option<PathBuf>, env_path: Option<PathBuf>) -> Self {
        let model_path = model_path
            .or(env_path)
            .unwrap_or_else(|| default_model_path(Path::new(DEFAULT_MODELS_DIR), model));
        Self {
            model_path,
            aligner: AlignerConfig::default(),
        }
    }
}

fn default_model_path(models_dir: &Path, model: &str) -> PathBuf {
    models_dir.join(format!("ggml-{model}.bin"))
}
