use crate::error::BenchmarkError;

use super::model::{BenchmarkTable, BenchmarkTriple, FundInput, Metric, Statistic};
use super::repository::resolve_triple;

// ---------------------------------------------------------------------------
// ComparisonSeries – the four bars of one chart
// ---------------------------------------------------------------------------

/// What a bar represents; drives its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Benchmark(Statistic),
    Fund,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub category: Category,
    pub label: String,
    pub value: f64,
}

/// Benchmark values followed by the fund's own value.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    pub metric: Metric,
    pub points: [SeriesPoint; 4],
}

impl ComparisonSeries {
    /// The user's point, always last.
    pub fn fund_point(&self) -> &SeriesPoint {
        &self.points[3]
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }

    #[cfg(test)]
    pub fn values(&self) -> [f64; 4] {
        self.points.each_ref().map(|p| p.value)
    }
}

/// Assemble the chart series for one metric. Values are kept unrounded and
/// the fund name is used verbatim, even when empty.
pub fn build(
    metric: Metric,
    triple: BenchmarkTriple,
    user_value: f64,
    fund_name: &str,
) -> ComparisonSeries {
    let [d, q, a] = Statistic::ALL.map(|stat| SeriesPoint {
        category: Category::Benchmark(stat),
        label: stat.category_label().to_string(),
        value: triple.get(stat),
    });
    let fund = SeriesPoint {
        category: Category::Fund,
        label: fund_name.to_string(),
        value: user_value,
    };
    ComparisonSeries {
        metric,
        points: [d, q, a, fund],
    }
}

// ---------------------------------------------------------------------------
// Per-metric comparison for a submitted fund
// ---------------------------------------------------------------------------

/// One chart's worth of result: the series, or why it could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricComparison {
    pub metric: Metric,
    pub outcome: Result<ComparisonSeries, BenchmarkError>,
}

impl MetricComparison {
    pub fn title(&self) -> String {
        format!("{} Benchmark", self.metric.display_name())
    }
}

/// Compare the fund against `table` for every metric. Each metric is
/// resolved on its own; a lookup failure only affects that metric.
pub fn compare_all(table: &BenchmarkTable, fund: &FundInput) -> Vec<MetricComparison> {
    Metric::ALL
        .into_iter()
        .map(|metric| {
            let outcome = resolve_triple(table, metric, fund.vintage)
                .map(|triple| build(metric, triple, fund.value_for(metric), &fund.name));
            if let Err(e) = &outcome {
                log::warn!("{metric} skipped for sheet '{}': {e}", table.sheet);
            }
            MetricComparison { metric, outcome }
        })
        .collect()
}
