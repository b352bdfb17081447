use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::CohortConfig;
use crate::error::BenchmarkError;

use super::loader;
use super::model::{BenchmarkTable, BenchmarkTriple, Metric};

// ---------------------------------------------------------------------------
// BenchmarkRepository – cohort id → memoized benchmark table
// ---------------------------------------------------------------------------

/// Resolves cohorts to their benchmark sheets and caches each sheet after the
/// first successful read.
pub struct BenchmarkRepository {
    workbook: PathBuf,
    cohorts: Vec<CohortConfig>,
    cache: RwLock<HashMap<String, Arc<BenchmarkTable>>>,
    reads: AtomicUsize,
}

impl BenchmarkRepository {
    pub fn new(workbook: impl Into<PathBuf>, cohorts: Vec<CohortConfig>) -> Self {
        Self {
            workbook: workbook.into(),
            cohorts,
            cache: RwLock::new(HashMap::new()),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn workbook(&self) -> &Path {
        &self.workbook
    }

    pub fn cohorts(&self) -> &[CohortConfig] {
        &self.cohorts
    }

    /// Number of times a sheet was actually read from disk.
    #[cfg(test)]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// File backing the given cohort.
    fn source_for<'a>(&'a self, cohort: &'a CohortConfig) -> &'a Path {
        cohort.file.as_deref().unwrap_or(self.workbook.as_path())
    }

    /// Return the cohort's benchmark table, reading it on first use.
    ///
    /// Concurrent first loads may each read the file; the first table stored
    /// wins and every caller gets that one.
    pub fn load(&self, cohort_id: &str) -> Result<Arc<BenchmarkTable>, BenchmarkError> {
        if let Some(table) = self.cached(cohort_id) {
            log::debug!("Cache hit for cohort '{cohort_id}'");
            return Ok(table);
        }

        let cohort = self
            .cohorts
            .iter()
            .find(|c| c.id == cohort_id)
            .ok_or_else(|| BenchmarkError::UnknownCohort(cohort_id.to_string()))?;
        let path = self.source_for(cohort);

        self.reads.fetch_add(1, Ordering::Relaxed);
        let table = loader::load_sheet(path, &cohort.sheet).map_err(|e| {
            log::error!("Failed to load cohort '{cohort_id}': {e:#}");
            BenchmarkError::DataSourceUnavailable {
                cohort: cohort_id.to_string(),
                path: path.to_path_buf(),
                reason: format!("{e:#}"),
            }
        })?;

        let missing = table.missing_labels();
        if !missing.is_empty() {
            log::warn!(
                "Sheet '{}' for cohort '{cohort_id}' lacks rows {missing:?}",
                table.sheet
            );
        }

        let mut cache = self.cache.write().unwrap_or_else(|p| p.into_inner());
        let stored = cache
            .entry(cohort_id.to_string())
            .or_insert_with(|| Arc::new(table));
        Ok(Arc::clone(stored))
    }

    fn cached(&self, cohort_id: &str) -> Option<Arc<BenchmarkTable>> {
        let cache = self.cache.read().unwrap_or_else(|p| p.into_inner());
        cache.get(cohort_id).cloned()
    }
}

/// Look up the (decile, quartile, average) values of `metric` for `vintage`.
pub fn resolve_triple(
    table: &BenchmarkTable,
    metric: Metric,
    vintage: i32,
) -> Result<BenchmarkTriple, BenchmarkError> {
    if !table.has_vintage(vintage) {
        return Err(BenchmarkError::ColumnNotFound { vintage });
    }

    let [decile, quartile, average] = metric.row_labels().map(|label| {
        table
            .value(&label, vintage)
            .ok_or(BenchmarkError::RowNotFound { label, vintage })
    });

    Ok(BenchmarkTriple::new(decile?, quartile?, average?))
}
