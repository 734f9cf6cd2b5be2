use std::env;
use std::path::PathBuf;

/// File name of the persisted car list inside the cache directory.
pub const CACHE_FILE_NAME: &str = "car-storage.json";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub cache_dir: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        ClientConfig {
            api_url: env::var("CAR_CATALOG_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            cache_dir: env::var("CAR_CATALOG_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }
}
