/// Data layer: benchmark tables, loading, lookup and chart series.
///
/// Architecture:
/// ```text
///  .json workbook / .csv / .parquet sheet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse one sheet → BenchmarkTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ repository  │  cohort id → cached Arc<BenchmarkTable>,
///   └────────────┘  (metric, vintage) → BenchmarkTriple
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  triple + fund value → ComparisonSeries (×3 metrics)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod repository;
pub mod series;
