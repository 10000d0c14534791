use std::path::{Path, PathBuf};
use std::fs;
use std::io;
use std::sync::Arc;
use std::env;
use tokio::sync::Mutex;
use sha2::{Sha256, Digest};

use crate::models::{BuiltinModel, ModelInfo};

const CACHE_ENV_VAR: &str = "AMYGDALA_CACHE";
const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// Local cache of downloaded models.
///
/// Each model lives in its own directory holding `model.onnx`,
/// `tokenizer.json` and `config.json`. Every downloaded model and tokenizer
/// file gets a `<file>.sha256` sidecar so later runs can detect corruption
/// even for models without a pinned hash.
#[derive(Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(CACHE_ENV_VAR) {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("amygdala").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("amygdala").join("models");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("amygdala").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_dir(&self, info: &ModelInfo) -> PathBuf {
        self.models_dir.join(&info.name)
    }

    pub fn get_model_path(&self, info: &ModelInfo) -> PathBuf {
        self.get_model_dir(info).join(MODEL_FILE)
    }

    pub fn get_tokenizer_path(&self, info: &ModelInfo) -> PathBuf {
        self.get_model_dir(info).join(TOKENIZER_FILE)
    }

    pub fn get_config_path(&self, info: &ModelInfo) -> PathBuf {
        self.get_model_dir(info).join(CONFIG_FILE)
    }

    pub fn is_model_downloaded(&self, info: &ModelInfo) -> bool {
        let model_path = self.get_model_path(info);
        let tokenizer_path = self.get_tokenizer_path(info);
        log::debug!("Checking if model '{}' is downloaded:", info.name);
        log::debug!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        log::debug!("  Tokenizer path: {:?} (exists: {})", tokenizer_path, tokenizer_path.exists());
        model_path.exists() && tokenizer_path.exists()
    }

    /// Returns the directory of a built-in model, failing if it is not cached.
    pub fn require_builtin(&self, model: BuiltinModel) -> Result<PathBuf, ModelError> {
        let info = model.get_model_info();
        if !self.is_model_downloaded(&info) {
            return Err(ModelError::NotDownloaded(info.name));
        }
        Ok(self.get_model_dir(&info))
    }

    /// Downloads any missing or corrupted file of the model.
    ///
    /// Concurrent calls on clones of the same manager are serialised. On
    /// failure the partially downloaded model is removed.
    pub async fn download_model(&self, info: &ModelInfo) -> Result<(), ModelError> {
        let _lock = self.download_lock.lock().await;

        let model_dir = self.get_model_dir(info);
        log::info!("Creating model directory at {:?}", model_dir);
        fs::create_dir_all(&model_dir)?;

        let result = self.fetch_all(info).await;
        match &result {
            Ok(()) => log::info!("Model '{}' ready to use", info.name),
            Err(e) => {
                log::error!("Failed to set up model '{}': {}", info.name, e);
                let _ = self.remove_download(info);
            }
        }
        result
    }

    async fn fetch_all(&self, info: &ModelInfo) -> Result<(), ModelError> {
        let model_path = self.get_model_path(info);
        if !self.verify_file(&model_path, info.model_hash.as_deref())? {
            self.download_and_verify_file(&info.model_url, &model_path, info.model_hash.as_deref(), "model")
                .await?;
        } else {
            log::info!("Existing model file verified successfully");
        }

        let tokenizer_path = self.get_tokenizer_path(info);
        if !self.verify_file(&tokenizer_path, info.tokenizer_hash.as_deref())? {
            self.download_and_verify_file(
                &info.tokenizer_url,
                &tokenizer_path,
                info.tokenizer_hash.as_deref(),
                "tokenizer",
            )
            .await?;
        } else {
            log::info!("Existing tokenizer file verified successfully");
        }

        let config_path = self.get_config_path(info);
        if !config_path.exists() {
            log::info!("Downloading model config from {}", info.config_url);
            let bytes = fetch_bytes(&info.config_url).await?;
            fs::write(&config_path, bytes)?;
        }

        Ok(())
    }

    /// Checks `path` against the pinned hash, or against its recorded
    /// sidecar hash when nothing is pinned. Missing files and files with no
    /// hash to compare against do not verify.
    fn verify_file(&self, path: &Path, pinned_hash: Option<&str>) -> Result<bool, ModelError> {
        if !path.exists() {
            log::debug!("File {:?} does not exist", path);
            return Ok(false);
        }

        let expected = match pinned_hash {
            Some(hash) => hash.to_string(),
            None => {
                let sidecar = sidecar_path(path);
                if !sidecar.exists() {
                    log::warn!("No recorded hash for {:?}", path);
                    return Ok(false);
                }
                fs::read_to_string(&sidecar)?.trim().to_string()
            }
        };

        let actual = sha256_file(path)?;
        log::debug!("Calculated hash: {}", actual);
        log::debug!("Expected hash:   {}", expected);
        Ok(actual == expected)
    }

    pub fn verify_model(&self, info: &ModelInfo) -> Result<bool, ModelError> {
        let model_ok = self.verify_file(&self.get_model_path(info), info.model_hash.as_deref())?;
        let tokenizer_ok =
            self.verify_file(&self.get_tokenizer_path(info), info.tokenizer_hash.as_deref())?;

        log::info!("Verification results for '{}':", info.name);
        log::info!("  Model hash verification: {}", model_ok);
        log::info!("  Tokenizer hash verification: {}", tokenizer_ok);

        Ok(model_ok && tokenizer_ok)
    }

    async fn download_and_verify_file(
        &self,
        url: &str,
        path: &Path,
        pinned_hash: Option<&str>,
        file_type: &str,
    ) -> Result<(), ModelError> {
        log::info!("Downloading {} file from {} to {:?}", file_type, url, path);
        let bytes = fetch_bytes(url).await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let hash = sha256_bytes(&bytes);
        if let Some(expected) = pinned_hash {
            if hash != expected {
                log::error!("{} hash mismatch: expected {}, got {}", file_type, expected, hash);
                return Err(ModelError::HashMismatch {
                    file_type: file_type.to_string(),
                    expected: expected.to_string(),
                    actual: hash,
                });
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;
        fs::write(sidecar_path(path), &hash)?;

        if !self.verify_file(path, pinned_hash)? {
            return Err(ModelError::VerificationFailed);
        }

        log::info!("{} file downloaded and verified successfully", file_type);
        Ok(())
    }

    pub fn remove_download(&self, info: &ModelInfo) -> Result<(), ModelError> {
        for path in [
            self.get_model_path(info),
            self.get_tokenizer_path(info),
            self.get_config_path(info),
        ] {
            let sidecar = sidecar_path(&path);
            if path.exists() {
                fs::remove_file(&path)?;
            }
            if sidecar.exists() {
                fs::remove_file(&sidecar)?;
            }
        }
        Ok(())
    }

    /// Ensures that a model is downloaded and verified.
    /// If the model doesn't exist, it will be downloaded.
    /// If verification fails, it will be re-downloaded.
    pub async fn ensure_model_downloaded(&self, info: &ModelInfo) -> Result<(), ModelError> {
        if !self.is_model_downloaded(info) {
            log::info!("Model '{}' not found, downloading...", info.name);
            self.download_model(info).await?;
        } else if !self.verify_model(info)? {
            log::info!("Model '{}' failed verification, re-downloading...", info.name);
            self.remove_download(info)?;
            self.download_model(info).await?;
        } else {
            log::info!("Model '{}' verified", info.name);
        }
        Ok(())
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ModelError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    log::debug!("Download response status: {}", response.status());
    Ok(response.bytes().await?.to_vec())
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".sha256");
    path.with_file_name(name)
}

fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn sha256_file(path: &Path) -> Result<String, ModelError> {
    Ok(sha256_bytes(&fs::read(path)?))
}
