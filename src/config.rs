use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::color::CategoryColors;

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "FUND_BENCH_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "fund-bench.json";

// ---------------------------------------------------------------------------
// Configuration model
// ---------------------------------------------------------------------------

/// A benchmark population offered in the "Fund Manager Location" selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Label shown to the user, also the cache key.
    pub id: String,
    /// Sheet of the workbook holding this cohort.
    pub sheet: String,
    /// Per-cohort file, overriding the shared workbook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl CohortConfig {
    fn new(id: &str, sheet: &str) -> Self {
        Self {
            id: id.to_string(),
            sheet: sheet.to_string(),
            file: None,
        }
    }
}

/// Hex colours per chart category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub top_decile: String,
    pub top_quartile: String,
    pub average: String,
    pub fund: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            top_decile: "#4E79A7".into(),
            top_quartile: "#76B7B2".into(),
            average: "#F28E2B".into(),
            fund: "#E15759".into(),
        }
    }
}

/// Data-source summary printed under the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub data_source: String,
    pub vintages_covered: String,
    pub sector: String,
    pub geography: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            data_source: "Preqin".into(),
            vintages_covered: "2015 & 2016".into(),
            sector: "Sector-Agnostic".into(),
            geography: "Europe & US".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub workbook: PathBuf,
    pub cohorts: Vec<CohortConfig>,
    pub vintages: Vec<i32>,
    pub colors: ColorConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
    pub footer: FooterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("data/benchmark_data.json"),
            cohorts: vec![
                CohortConfig::new("Europe (25 funds)", "VC EU Benchmark"),
                CohortConfig::new("US (95 funds)", "VC US Benchmark"),
                CohortConfig::new("Europe & US (120 funds)", "VC EU & US Benchmark"),
            ],
            vintages: vec![2015, 2016],
            colors: ColorConfig::default(),
            logo: Some(PathBuf::from("assets/logo.png")),
            footer: FooterConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Locate and load the configuration.
    ///
    /// `$FUND_BENCH_CONFIG` wins, then `fund-bench.json` in the working
    /// directory, then the built-in defaults.
    pub fn discover() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(local);
        }
        log::info!("No config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load a JSON config file. Relative paths inside it are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let config = config.resolved_against(base);
        config.validate()?;
        log::info!(
            "Loaded config {} ({} cohorts, vintages {:?})",
            path.display(),
            config.cohorts.len(),
            config.vintages
        );
        Ok(config)
    }

    /// Make every relative path absolute with respect to `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let join = |p: &Path| -> PathBuf {
            if p.is_relative() {
                base.join(p)
            } else {
                p.to_path_buf()
            }
        };
        self.workbook = join(&self.workbook);
        self.logo = self.logo.as_deref().map(join);
        for cohort in &mut self.cohorts {
            cohort.file = cohort.file.as_deref().map(join);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cohorts.is_empty() {
            bail!("config lists no cohorts");
        }
        if self.vintages.is_empty() {
            bail!("config lists no vintages");
        }
        let mut seen = BTreeSet::new();
        for cohort in &self.cohorts {
            if !seen.insert(cohort.id.as_str()) {
                bail!("cohort '{}' is listed twice", cohort.id);
            }
        }
        CategoryColors::from_config(&self.colors).context("invalid chart colours")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_match_shipped_dataset() {
        let config = AppConfig::default();
        assert_eq!(config.vintages, vec![2015, 2016]);
        let ids: Vec<_> = config.cohorts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            ["Europe (25 funds)", "US (95 funds)", "Europe & US (120 funds)"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_paths_exist_in_the_crate() {
        let config = AppConfig::default().resolved_against(Path::new(env!("CARGO_MANIFEST_DIR")));
        assert!(config.workbook.is_file(), "{}", config.workbook.display());
        let logo = config.logo.unwrap();
        assert!(logo.is_file(), "{}", logo.display());
    }

    #[test]
    fn partial_file_keeps_defaults_and_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fund-bench.json");
        fs::write(
            &path,
            r#"{
                "workbook": "bench.csv",
                "cohorts": [{"id": "All funds", "sheet": "Benchmark"}],
                "logo": "/opt/logo.png"
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.workbook, dir.path().join("bench.csv"));
        assert_eq!(config.logo.as_deref(), Some(Path::new("/opt/logo.png")));
        assert_eq!(config.cohorts.len(), 1);
        assert_eq!(config.vintages, vec![2015, 2016]);
        assert_eq!(config.colors, ColorConfig::default());
    }

    #[test]
    fn duplicate_cohorts_are_rejected() {
        let mut config = AppConfig::default();
        config.cohorts.push(config.cohorts[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn bad_colour_is_rejected() {
        let mut config = AppConfig::default();
        config.colors.fund = "crimson-ish".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_vintages_are_rejected() {
        let config = AppConfig {
            vintages: Vec::new(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
