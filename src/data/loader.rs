use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::{CastOptions, cast, cast_with_options};
use arrow::datatypes::{DataType, Float64Type};
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::BenchmarkTable;

/// Header of the column holding the row labels.
pub const METRICS_COLUMN: &str = "Metrics";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one benchmark sheet from a workbook file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `{ "<sheet>": [{ "Metrics": "...", "2015": 22.0, ... }, ...] }`
/// * `.csv`     – the file is the sheet; `sheet` only names the result
/// * `.parquet` – the file is the sheet; `Metrics` column plus year columns
/// * `.xlsx` / `.xls` / `.ods` – spreadsheet with one named sheet per cohort
pub fn load_sheet(path: &Path, sheet: &str) -> Result<BenchmarkTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "json" => load_json(path, sheet),
        "csv" => load_csv(path, sheet),
        "parquet" | "pq" => load_parquet(path, sheet),
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(path, sheet),
        other => bail!("Unsupported workbook extension: .{other}"),
    }?;

    if table.is_empty() {
        log::warn!("Sheet '{sheet}' in {} has no labelled rows", path.display());
    }
    log::info!(
        "Loaded sheet '{sheet}' from {}: {} rows, vintages {:?}",
        path.display(),
        table.len(),
        table.vintages
    );
    Ok(table)
}

/// Parse a column header as a vintage year.
fn vintage_header(header: &str) -> Option<i32> {
    header.trim().parse::<i32>().ok()
}

fn push_row(table: &mut BenchmarkTable, label: &str, cells: BTreeMap<i32, f64>) {
    if !table.insert_row(label, cells) {
        log::warn!(
            "Sheet '{}' repeats row '{label}'; keeping the first occurrence",
            table.sheet
        );
    }
}

// ---------------------------------------------------------------------------
// JSON workbook
// ---------------------------------------------------------------------------

/// Expected JSON schema: one records-oriented array per sheet
/// (`df.to_json(orient='records')` for each sheet of the spreadsheet):
///
/// ```json
/// {
///   "VC US Benchmark": [
///     { "Metrics": "Top Decile (90%) IRR", "2015": 22.0, "2016": 19.4 },
///     ...
///   ]
/// }
/// ```
fn load_json(path: &Path, sheet: &str) -> Result<BenchmarkTable> {
    let text = std::fs::read_to_string(path).context("reading JSON workbook")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON workbook")?;

    let sheets = root
        .as_object()
        .context("Expected top-level JSON object of sheets")?;
    let records = sheets
        .get(sheet)
        .with_context(|| format!("Workbook has no sheet '{sheet}'"))?
        .as_array()
        .with_context(|| format!("Sheet '{sheet}' is not an array of records"))?;

    let mut table = BenchmarkTable::new(sheet);

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let label = match obj.get(METRICS_COLUMN) {
            Some(JsonValue::String(s)) => s.trim(),
            Some(JsonValue::Null) | None => continue,
            Some(other) => bail!("Row {i}: '{METRICS_COLUMN}' is not a string: {other}"),
        };
        if label.is_empty() {
            continue;
        }

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if key == METRICS_COLUMN {
                continue;
            }
            let Some(vintage) = vintage_header(key) else {
                log::debug!("Sheet '{sheet}': ignoring column '{key}'");
                continue;
            };
            table.add_vintage(vintage);
            match val {
                JsonValue::Null => {}
                JsonValue::Number(n) => {
                    let v = n
                        .as_f64()
                        .with_context(|| format!("Row {i}, {key}: not representable as f64"))?;
                    cells.insert(vintage, v);
                }
                other => bail!("Row {i}, {key}: '{other}' is not a number"),
            }
        }

        push_row(&mut table, label, cells);
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV sheet
// ---------------------------------------------------------------------------

/// CSV layout: header row with `Metrics` (or the first column) holding the
/// row labels and one column per vintage year. Empty cells are absent values.
fn load_csv(path: &Path, sheet: &str) -> Result<BenchmarkTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV sheet")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV sheet has no columns");
    }
    let label_idx = headers
        .iter()
        .position(|h| h == METRICS_COLUMN)
        .unwrap_or(0);

    let year_cols: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != label_idx)
        .filter_map(|(idx, h)| match vintage_header(h) {
            Some(year) => Some((idx, year)),
            None => {
                log::debug!("Sheet '{sheet}': ignoring column '{h}'");
                None
            }
        })
        .collect();

    let mut table = BenchmarkTable::new(sheet);
    for &(_, year) in &year_cols {
        table.add_vintage(year);
    }

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let label = record.get(label_idx).unwrap_or("").trim();
        if label.is_empty() {
            continue;
        }

        let mut cells = BTreeMap::new();
        for &(idx, year) in &year_cols {
            let raw = record.get(idx).unwrap_or("").trim();
            if raw.is_empty() {
                continue;
            }
            let v = raw
                .parse::<f64>()
                .with_context(|| format!("Row {row_no}, {year}: '{raw}' is not a number"))?;
            cells.insert(year, v);
        }

        push_row(&mut table, label, cells);
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// Parquet sheet
// ---------------------------------------------------------------------------

/// Load a Parquet benchmark sheet.
///
/// Expected schema:
/// - `Metrics`: Utf8 / LargeUtf8 row labels
/// - one numeric column (any int or float type) per vintage year, named by
///   the year
fn load_parquet(path: &Path, sheet: &str) -> Result<BenchmarkTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut table = BenchmarkTable::new(sheet);

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let label_idx = schema
            .index_of(METRICS_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet sheet missing '{METRICS_COLUMN}' column"))?;
        let labels = cast(batch.column(label_idx), &DataType::Utf8)
            .context("reading 'Metrics' as text")?;
        let labels = labels.as_string::<i32>();

        let mut year_cols = Vec::new();
        for (idx, field) in schema.fields().iter().enumerate() {
            if idx == label_idx {
                continue;
            }
            let Some(year) = vintage_header(field.name()) else {
                log::debug!("Sheet '{sheet}': ignoring column '{}'", field.name());
                continue;
            };
            // Unsafe cast: a cell that cannot become a float is an error, not a null.
            let strict = CastOptions {
                safe: false,
                ..Default::default()
            };
            let values = cast_with_options(batch.column(idx), &DataType::Float64, &strict)
                .with_context(|| format!("column {year} has a non-numeric cell"))?;
            table.add_vintage(year);
            year_cols.push((year, values));
        }

        for row in 0..batch.num_rows() {
            if labels.is_null(row) {
                continue;
            }
            let label = labels.value(row).trim();
            if label.is_empty() {
                continue;
            }

            let mut cells = BTreeMap::new();
            for (year, values) in &year_cols {
                let values = values.as_primitive::<Float64Type>();
                if !values.is_null(row) {
                    cells.insert(*year, values.value(row));
                }
            }
            push_row(&mut table, label, cells);
        }
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// Spreadsheet workbook
// ---------------------------------------------------------------------------

/// Load a named sheet from an Excel / OpenDocument workbook.
///
/// The first row is the header: `Metrics` (or the first column) holds the row
/// labels, year headers (text or numeric cells) name the vintage columns.
fn load_spreadsheet(path: &Path, sheet: &str) -> Result<BenchmarkTable> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;
    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("Workbook has no sheet '{sheet}'"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("Spreadsheet sheet has no header row")?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let label_idx = headers
        .iter()
        .position(|h| h == METRICS_COLUMN)
        .unwrap_or(0);
    let year_cols: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != label_idx)
        .filter_map(|(idx, h)| vintage_header(h).map(|year| (idx, year)))
        .collect();

    let mut table = BenchmarkTable::new(sheet);
    for &(_, year) in &year_cols {
        table.add_vintage(year);
    }

    for (row_no, row) in rows.enumerate() {
        let label = match row.get(label_idx) {
            Some(Data::String(s)) => s.trim(),
            _ => continue,
        };
        if label.is_empty() {
            continue;
        }

        let mut cells = BTreeMap::new();
        for &(idx, year) in &year_cols {
            let value = match row.get(idx) {
                None | Some(Data::Empty) => continue,
                Some(Data::Float(v)) => *v,
                Some(Data::Int(v)) => *v as f64,
                Some(Data::String(s)) if s.trim().is_empty() => continue,
                Some(Data::String(s)) => s.trim().parse::<f64>().with_context(|| {
                    format!("Row {row_no}, {year}: '{s}' is not a number")
                })?,
                Some(other) => bail!("Row {row_no}, {year}: '{other}' is not a number"),
            };
            cells.insert(year, value);
        }

        push_row(&mut table, label, cells);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn json_workbook_selects_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "workbook.json",
            r#"{
                "VC US Benchmark": [
                    {"Metrics": "Top Decile (90%) IRR", "2015": 22.0, "2016": 19},
                    {"Metrics": "Average IRR", "2015": 8.0, "2016": null, "Notes": "x"}
                ],
                "VC EU Benchmark": [
                    {"Metrics": "Average IRR", "2015": 5.0}
                ]
            }"#,
        );

        let table = load_sheet(&path, "VC US Benchmark").unwrap();
        assert_eq!(table.sheet, "VC US Benchmark");
        assert_eq!(table.len(), 2);
        assert_eq!(table.value("Top Decile (90%) IRR", 2016), Some(19.0));
        assert_eq!(table.value("Average IRR", 2016), None);
        assert!(table.has_vintage(2016));
        assert_eq!(table.vintages.len(), 2);

        let eu = load_sheet(&path, "VC EU Benchmark").unwrap();
        assert_eq!(eu.value("Average IRR", 2015), Some(5.0));
    }

    #[test]
    fn json_missing_sheet_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "workbook.json", r#"{"Other": []}"#);
        let err = load_sheet(&path, "VC US Benchmark").unwrap_err();
        assert!(format!("{err:#}").contains("no sheet 'VC US Benchmark'"));
    }

    #[test]
    fn json_non_numeric_cell_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "workbook.json",
            r#"{"S": [{"Metrics": "Average IRR", "2015": "eight"}]}"#,
        );
        assert!(load_sheet(&path, "S").is_err());
    }

    #[test]
    fn csv_sheet_with_metrics_column() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "us.csv",
            "Index,Metrics,2015,2016\n\
             0,Top Decile (90%) TVPI,2.9,2.5\n\
             1,Average TVPI,1.6,\n\
             2,,1.0,1.0\n",
        );

        let table = load_sheet(&path, "VC US Benchmark").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value("Top Decile (90%) TVPI", 2015), Some(2.9));
        assert_eq!(table.value("Average TVPI", 2016), None);
        assert!(table.has_vintage(2016));
        assert!(table.value("Index", 2015).is_none());
    }

    #[test]
    fn csv_without_metrics_header_uses_first_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "eu.csv", "Label,2015\nAverage DPI,0.7\n");
        let table = load_sheet(&path, "VC EU Benchmark").unwrap();
        assert_eq!(table.value("Average DPI", 2015), Some(0.7));
    }

    #[test]
    fn csv_bad_number_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "Metrics,2015\nAverage DPI,n/a\n");
        let err = load_sheet(&path, "S").unwrap_err();
        assert!(format!("{err:#}").contains("'n/a' is not a number"));
    }

    #[test]
    fn parquet_sheet_casts_numeric_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("us.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(METRICS_COLUMN, DataType::Utf8, true),
            Field::new("2015", DataType::Float64, true),
            Field::new("2016", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Average IRR"), None])),
                Arc::new(Float64Array::from(vec![Some(8.0), Some(1.0)])),
                Arc::new(Int64Array::from(vec![None, Some(3)])),
            ],
        )
        .unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_sheet(&path, "VC US Benchmark").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.value("Average IRR", 2015), Some(8.0));
        assert_eq!(table.value("Average IRR", 2016), None);
        assert!(table.has_vintage(2016));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_sheet(Path::new("benchmarks.txt"), "S").unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn parquet_non_numeric_cell_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(METRICS_COLUMN, DataType::Utf8, true),
            Field::new("2015", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Average IRR"])),
                Arc::new(StringArray::from(vec!["eight"])),
            ],
        )
        .unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_sheet(&path, "S").unwrap_err();
        assert!(format!("{err:#}").contains("non-numeric"));
    }

    #[test]
    fn parquet_numeric_text_still_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("text.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(METRICS_COLUMN, DataType::Utf8, true),
            Field::new("2015", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Average IRR", "Average DPI"])),
                Arc::new(StringArray::from(vec![Some("8.0"), None])),
            ],
        )
        .unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_sheet(&path, "S").unwrap();
        assert_eq!(table.value("Average IRR", 2015), Some(8.0));
        assert_eq!(table.value("Average DPI", 2015), None);
    }

    fn shipped_xlsx() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/benchmark_data.xlsx")
    }

    #[test]
    fn xlsx_workbook_selects_named_sheet() {
        let us = load_sheet(&shipped_xlsx(), "VC US Benchmark").unwrap();
        assert_eq!(us.sheet, "VC US Benchmark");
        assert_eq!(us.len(), 9);
        assert!(us.has_vintage(2015) && us.has_vintage(2016));
        assert_eq!(us.value("Top Decile (90%) IRR", 2015), Some(22.0));
        assert_eq!(us.value("Average IRR", 2015), Some(8.0));
        assert!(us.missing_labels().is_empty());

        let both = load_sheet(&shipped_xlsx(), "VC EU & US Benchmark").unwrap();
        assert_eq!(both.value("Average DPI", 2016), Some(0.32));
    }

    #[test]
    fn xlsx_matches_json_workbook() {
        let json = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/benchmark_data.json");
        for sheet in ["VC EU Benchmark", "VC US Benchmark", "VC EU & US Benchmark"] {
            assert_eq!(
                load_sheet(&shipped_xlsx(), sheet).unwrap(),
                load_sheet(&json, sheet).unwrap()
            );
        }
    }

    #[test]
    fn xlsx_missing_sheet_is_an_error() {
        let err = load_sheet(&shipped_xlsx(), "VC Asia Benchmark").unwrap_err();
        assert!(format!("{err:#}").contains("no sheet 'VC Asia Benchmark'"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_sheet(&dir.path().join("nope.json"), "S").is_err());
    }
}
