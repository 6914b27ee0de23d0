//! Pipeline configuration. Every stage takes what it needs from here
//! instead of reaching for process-wide constants.

use std::path::PathBuf;

/// Comparison-mode dataset archives are named `{prefix}{i}.tar.gz` for
/// i in 1..=replicas under the base URL.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL the archive names are appended to.
    pub base_url: String,
    /// Dataset prefixes for the default comparison mode.
    pub datasets: Vec<String>,
    /// Replica archives per comparison dataset.
    pub replicas: u32,
    /// Where downloaded archives are cached, keyed by basename.
    pub cache_dir: PathBuf,
    /// Download chunk size in bytes.
    pub chunk_size: usize,
    /// Chart size in pixels.
    pub chart_size: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            datasets: vec!["cephfs".to_string(), "mfs".to_string()],
            replicas: 3,
            cache_dir: PathBuf::from("."),
            chunk_size: 8192,
            chart_size: (1280, 640),
        }
    }
}

impl Config {
    /// URL of a named archive (merge mode).
    pub fn archive_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// URLs of a comparison dataset's replica archives.
    pub fn dataset_urls(&self, prefix: &str) -> Vec<String> {
        (1..=self.replicas)
            .map(|i| self.archive_url(&format!("{prefix}{i}.tar.gz")))
            .collect()
    }
}
