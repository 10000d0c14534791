use amygdala::{BuiltinModel, ModelError, ModelInfo, ModelManager};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("amygdala-it")
        .join(format!("{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn unreachable_info() -> ModelInfo {
    ModelInfo {
        name: "offline".to_string(),
        model_url: "http://127.0.0.1:9/model.onnx".to_string(),
        tokenizer_url: "http://127.0.0.1:9/tokenizer.json".to_string(),
        config_url: "http://127.0.0.1:9/config.json".to_string(),
        model_hash: None,
        tokenizer_hash: None,
    }
}

#[test]
fn test_paths_follow_model_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = scratch_dir("paths");
    let manager = ModelManager::new(&dir)?;
    let info = BuiltinModel::DistilBertSst2.get_model_info();

    assert!(dir.exists());
    assert_eq!(manager.models_dir(), dir.as_path());
    assert_eq!(manager.get_model_path(&info), dir.join("distilbert-sst2").join("model.onnx"));
    assert_eq!(manager.get_tokenizer_path(&info), dir.join("distilbert-sst2").join("tokenizer.json"));
    assert_eq!(manager.get_config_path(&info), dir.join("distilbert-sst2").join("config.json"));
    Ok(())
}

#[test]
fn test_empty_cache() -> Result<(), Box<dyn std::error::Error>> {
    let manager = ModelManager::new(scratch_dir("empty"))?;
    let info = unreachable_info();

    assert!(!manager.is_model_downloaded(&info));
    assert!(!manager.verify_model(&info)?);
    // Removing nothing is fine
    manager.remove_download(&info)?;
    Ok(())
}

#[test]
fn test_files_without_recorded_hash_do_not_verify() -> Result<(), Box<dyn std::error::Error>> {
    let manager = ModelManager::new(scratch_dir("unrecorded"))?;
    let info = unreachable_info();
    fs::create_dir_all(manager.get_model_dir(&info))?;
    fs::write(manager.get_model_path(&info), b"model")?;
    fs::write(manager.get_tokenizer_path(&info), b"{}")?;

    assert!(manager.is_model_downloaded(&info));
    assert!(!manager.verify_model(&info)?);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_download_fails() -> Result<(), Box<dyn std::error::Error>> {
    let manager = ModelManager::new(scratch_dir("unreachable"))?;
    let info = unreachable_info();

    let result = manager.ensure_model_downloaded(&info).await;
    assert!(matches!(result, Err(ModelError::DownloadError(_))));
    assert!(!manager.is_model_downloaded(&info));
    Ok(())
}

#[test]
fn test_clones_share_cache_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = scratch_dir("clones");
    let manager = ModelManager::new(&dir)?;
    let clone = manager.clone();
    let info = unreachable_info();

    fs::create_dir_all(manager.get_model_dir(&info))?;
    fs::write(manager.get_model_path(&info), b"m")?;
    fs::write(manager.get_tokenizer_path(&info), b"t")?;
    assert!(clone.is_model_downloaded(&info));

    clone.remove_download(&info)?;
    assert!(!manager.is_model_downloaded(&info));
    Ok(())
}
