use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Metric – one of the three fund performance measures
// ---------------------------------------------------------------------------

/// A fund performance metric. Declaration order is chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    NetIrr,
    NetTvpi,
    NetDpi,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::NetIrr, Metric::NetTvpi, Metric::NetDpi];

    /// Display name, also used as the y-axis label.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::NetIrr => "Net IRR (%)",
            Metric::NetTvpi => "Net TVPI (X)",
            Metric::NetDpi => "Net DPI (X)",
        }
    }

    /// Short key used inside benchmark row labels.
    pub fn key(self) -> &'static str {
        match self {
            Metric::NetIrr => "IRR",
            Metric::NetTvpi => "TVPI",
            Metric::NetDpi => "DPI",
        }
    }

    /// The three benchmark row labels for this metric, in statistic order.
    pub fn row_labels(self) -> [String; 3] {
        Statistic::ALL.map(|stat| stat.row_label(self))
    }

    /// Whether negative user values make sense for this metric.
    pub fn allows_negative(self) -> bool {
        matches!(self, Metric::NetIrr)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Statistic – the published summary per metric and vintage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statistic {
    TopDecile,
    TopQuartile,
    Average,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [
        Statistic::TopDecile,
        Statistic::TopQuartile,
        Statistic::Average,
    ];

    /// Chart category label.
    pub fn category_label(self) -> &'static str {
        match self {
            Statistic::TopDecile => "Top Decile (90%)",
            Statistic::TopQuartile => "Top Quartile (75%)",
            Statistic::Average => "Average",
        }
    }

    /// Row label in the benchmark sheet, e.g. `Top Quartile (75%) TVPI`.
    pub fn row_label(self, metric: Metric) -> String {
        format!("{} {}", self.category_label(), metric.key())
    }
}

/// All nine row labels a complete benchmark sheet carries.
pub fn label_vocabulary() -> Vec<String> {
    Metric::ALL
        .into_iter()
        .flat_map(|m| m.row_labels())
        .collect()
}

// ---------------------------------------------------------------------------
// BenchmarkTable – one cohort sheet
// ---------------------------------------------------------------------------

/// A cohort's benchmark sheet: (row label, vintage) → value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BenchmarkTable {
    /// Sheet the table was read from.
    pub sheet: String,
    /// Vintage years present as columns.
    pub vintages: BTreeSet<i32>,
    rows: BTreeMap<String, BTreeMap<i32, f64>>,
}

impl BenchmarkTable {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            ..Default::default()
        }
    }

    /// Register a vintage column, even if no cell in it has a value.
    pub fn add_vintage(&mut self, vintage: i32) {
        self.vintages.insert(vintage);
    }

    /// Add a row. Returns `false` (keeping the first row) if the label is
    /// already present.
    pub fn insert_row(&mut self, label: impl Into<String>, cells: BTreeMap<i32, f64>) -> bool {
        let label = label.into();
        if self.rows.contains_key(&label) {
            return false;
        }
        self.vintages.extend(cells.keys().copied());
        self.rows.insert(label, cells);
        true
    }

    pub fn has_vintage(&self, vintage: i32) -> bool {
        self.vintages.contains(&vintage)
    }

    /// Cell value, `None` if the row or the cell is absent.
    pub fn value(&self, label: &str, vintage: i32) -> Option<f64> {
        self.rows.get(label)?.get(&vintage).copied()
    }

    /// Vocabulary labels missing from this sheet.
    pub fn missing_labels(&self) -> Vec<String> {
        label_vocabulary()
            .into_iter()
            .filter(|l| !self.rows.contains_key(l))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// BenchmarkTriple
// ---------------------------------------------------------------------------

/// The resolved (decile, quartile, average) values for one metric and vintage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkTriple {
    pub top_decile: f64,
    pub top_quartile: f64,
    pub average: f64,
}

impl BenchmarkTriple {
    pub fn new(top_decile: f64, top_quartile: f64, average: f64) -> Self {
        Self {
            top_decile,
            top_quartile,
            average,
        }
    }

    pub fn get(&self, stat: Statistic) -> f64 {
        match stat {
            Statistic::TopDecile => self.top_decile,
            Statistic::TopQuartile => self.top_quartile,
            Statistic::Average => self.average,
        }
    }
}

#[cfg(test)]
impl BenchmarkTriple {
    /// Values in statistic order.
    pub fn values(&self) -> [f64; 3] {
        [self.top_decile, self.top_quartile, self.average]
    }
}

// ---------------------------------------------------------------------------
// FundInput – what the user typed into the sidebar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FundInput {
    pub name: String,
    pub vintage: i32,
    pub cohort: String,
    pub net_irr: f64,
    pub net_tvpi: f64,
    pub net_dpi: f64,
}

impl FundInput {
    pub fn value_for(&self, metric: Metric) -> f64 {
        match metric {
            Metric::NetIrr => self.net_irr,
            Metric::NetTvpi => self.net_tvpi,
            Metric::NetDpi => self.net_dpi,
        }
    }

    pub fn value_for_mut(&mut self, metric: Metric) -> &mut f64 {
        match metric {
            Metric::NetIrr => &mut self.net_irr,
            Metric::NetTvpi => &mut self.net_tvpi,
            Metric::NetDpi => &mut self.net_dpi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_labels_follow_sheet_naming() {
        assert_eq!(
            Metric::NetIrr.row_labels(),
            [
                "Top Decile (90%) IRR".to_string(),
                "Top Quartile (75%) IRR".to_string(),
                "Average IRR".to_string(),
            ]
        );
        assert_eq!(Statistic::Average.row_label(Metric::NetDpi), "Average DPI");
    }

    #[test]
    fn vocabulary_has_nine_distinct_labels() {
        let vocab = label_vocabulary();
        assert_eq!(vocab.len(), 9);
        let unique: BTreeSet<_> = vocab.iter().collect();
        assert_eq!(unique.len(), 9);
    }

    #[test]
    fn display_names() {
        let names: Vec<_> = Metric::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["Net IRR (%)", "Net TVPI (X)", "Net DPI (X)"]);
    }

    #[test]
    fn duplicate_rows_keep_the_first() {
        let mut table = BenchmarkTable::new("VC US Benchmark");
        assert!(table.insert_row("Average IRR", BTreeMap::from([(2015, 8.0)])));
        assert!(!table.insert_row("Average IRR", BTreeMap::from([(2015, 99.0)])));
        assert_eq!(table.value("Average IRR", 2015), Some(8.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn missing_labels_reports_absent_vocabulary() {
        let mut table = BenchmarkTable::new("partial");
        for label in Metric::NetIrr.row_labels() {
            table.insert_row(label, BTreeMap::from([(2015, 1.0)]));
        }
        let missing = table.missing_labels();
        assert_eq!(missing.len(), 6);
        assert!(missing.contains(&"Average TVPI".to_string()));
        assert!(!missing.contains(&"Average IRR".to_string()));
    }

    #[test]
    fn fund_input_routes_values_by_metric() {
        let mut input = FundInput {
            name: "Acme Fund".into(),
            vintage: 2015,
            cohort: "US (95 funds)".into(),
            net_irr: 12.5,
            net_tvpi: 1.8,
            net_dpi: 0.9,
        };
        assert_eq!(input.value_for(Metric::NetTvpi), 1.8);
        *input.value_for_mut(Metric::NetDpi) = 1.1;
        assert_eq!(input.net_dpi, 1.1);
    }
}
