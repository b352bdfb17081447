use std::path::PathBuf;

use crate::color::CategoryColors;
use crate::config::AppConfig;
use crate::data::model::FundInput;
use crate::data::repository::BenchmarkRepository;
use crate::data::series::{MetricComparison, compare_all};
use crate::error::BenchmarkError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Cohort sheets, cached per cohort for the lifetime of the workbook.
    pub repository: BenchmarkRepository,

    /// Sidebar inputs.
    pub input: FundInput,

    /// Chart colour per category.
    pub colors: CategoryColors,

    /// Results of the last submit (None until the user submits).
    pub comparisons: Option<Vec<MetricComparison>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let colors = CategoryColors::from_config(&config.colors).unwrap_or_else(|e| {
            log::warn!("Falling back to default chart colours: {e:#}");
            CategoryColors::default()
        });
        let input = FundInput {
            name: String::new(),
            vintage: config.vintages.first().copied().unwrap_or_default(),
            cohort: config
                .cohorts
                .first()
                .map(|c| c.id.clone())
                .unwrap_or_default(),
            net_irr: 0.0,
            net_tvpi: 0.0,
            net_dpi: 0.0,
        };
        let repository = BenchmarkRepository::new(&config.workbook, config.cohorts.clone());

        Self {
            config,
            repository,
            input,
            colors,
            comparisons: None,
            status_message: None,
        }
    }

    /// Run the comparison for the current inputs.
    pub fn submit(&mut self) {
        log::info!(
            "Comparing '{}' (vintage {}) against '{}'",
            self.input.name,
            self.input.vintage,
            self.input.cohort
        );
        match self.repository.load(&self.input.cohort) {
            Ok(table) => {
                self.comparisons = Some(compare_all(&table, &self.input));
                self.status_message = None;
            }
            Err(e) => {
                if !e.is_fatal() {
                    log::warn!("Unexpected lookup error while loading a cohort: {e}");
                }
                self.comparisons = None;
                self.status_message = Some(status_for(&e));
            }
        }
    }

    /// Point every cohort at a different workbook file. Cached sheets from
    /// the previous workbook are dropped.
    pub fn replace_workbook(&mut self, path: PathBuf) {
        log::info!("Switching workbook to {}", path.display());
        for cohort in &mut self.config.cohorts {
            cohort.file = None;
        }
        self.config.workbook = path;
        self.repository =
            BenchmarkRepository::new(&self.config.workbook, self.config.cohorts.clone());
        self.comparisons = None;
        self.status_message = None;
    }
}

/// Status-bar text for an error that stopped the whole request.
fn status_for(err: &BenchmarkError) -> String {
    match err {
        BenchmarkError::DataSourceUnavailable { .. } => err.to_string(),
        other => format!("Benchmark data unavailable: {other}"),
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
