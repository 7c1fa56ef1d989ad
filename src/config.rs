use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Runtime settings. Defaults cover a normal run; any field can be
/// overridden through the environment with a `MART_` prefix, e.g.
/// `MART_MAX_PAGES_PER_CATEGORY=5`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_max_pages")]
    pub max_pages_per_category: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_delay_min")]
    pub delay_min_secs: f64,
    #[serde(default = "default_delay_max")]
    pub delay_max_secs: f64,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_analysis_dir")]
    pub analysis_dir: PathBuf,
    #[serde(default = "default_anomaly_sigma")]
    pub anomaly_sigma: f64,
    #[serde(default = "default_missing_threshold")]
    pub missing_threshold: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_max_pages() -> usize {
    3
}
fn default_max_retries() -> u32 {
    3
}
fn default_delay_min() -> f64 {
    2.0
}
fn default_delay_max() -> f64 {
    5.0
}
fn default_categories() -> Vec<String> {
    [
        "industrial machinery",
        "electronics components",
        "textile machinery",
        "packaging machines",
        "construction equipment",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_analysis_dir() -> PathBuf {
    PathBuf::from("analysis_results")
}
fn default_anomaly_sigma() -> f64 {
    3.0
}
fn default_missing_threshold() -> f64 {
    0.5
}
fn default_top_n() -> usize {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_pages_per_category: default_max_pages(),
            max_retries: default_max_retries(),
            delay_min_secs: default_delay_min(),
            delay_max_secs: default_delay_max(),
            categories: default_categories(),
            data_dir: default_data_dir(),
            analysis_dir: default_analysis_dir(),
            anomaly_sigma: default_anomaly_sigma(),
            missing_threshold: default_missing_threshold(),
            top_n: default_top_n(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let cfg = Config::builder()
            .add_source(Environment::with_prefix("MART").try_parsing(true))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn raw_path(&self) -> PathBuf {
        self.data_dir.join("scraped_data.json")
    }

    pub fn processed_path(&self) -> PathBuf {
        self.data_dir.join("processed_data.csv")
    }

    pub fn quality_path(&self) -> PathBuf {
        self.data_dir.join("quality_report.json")
    }

    pub fn insights_path(&self) -> PathBuf {
        self.analysis_dir.join("insights.json")
    }

    pub fn report_path(&self) -> PathBuf {
        self.analysis_dir.join("ANALYSIS_REPORT.md")
    }

    pub fn chart_path(&self, name: &str) -> PathBuf {
        self.analysis_dir.join(name)
    }
}

/// Create a file's parent directory if it does not exist yet.
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
