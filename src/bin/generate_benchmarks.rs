use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue, json};

const VINTAGES: [i32; 2] = [2015, 2016];
const STATISTICS: [&str; 3] = ["Top Decile (90%)", "Top Quartile (75%)", "Average"];
const METRIC_KEYS: [&str; 3] = ["IRR", "TVPI", "DPI"];

/// Per metric (IRR, TVPI, DPI), per vintage: (decile, quartile, average).
type SheetValues = [[[f64; 3]; 2]; 3];

const SHEETS: [(&str, SheetValues); 3] = [
    (
        "VC EU Benchmark",
        [
            [[19.5, 12.8, 6.9], [17.2, 11.4, 5.8]],
            [[2.65, 1.92, 1.48], [2.31, 1.74, 1.39]],
            [[1.12, 0.71, 0.42], [0.84, 0.52, 0.29]],
        ],
    ),
    (
        "VC US Benchmark",
        [
            [[22.0, 15.0, 8.0], [20.6, 13.9, 7.4]],
            [[2.98, 2.11, 1.62], [2.72, 1.95, 1.51]],
            [[1.24, 0.79, 0.47], [0.96, 0.58, 0.33]],
        ],
    ),
    (
        "VC EU & US Benchmark",
        [
            [[21.4, 14.6, 7.8], [19.9, 13.4, 7.1]],
            [[2.91, 2.07, 1.59], [2.63, 1.90, 1.49]],
            [[1.21, 0.77, 0.46], [0.93, 0.56, 0.32]],
        ],
    ),
];

/// One sheet flattened into rows: label plus one value per vintage.
fn sheet_rows(values: &SheetValues) -> Vec<(String, [f64; 2])> {
    let mut rows = Vec::with_capacity(9);
    for (m, key) in METRIC_KEYS.iter().enumerate() {
        for (s, stat) in STATISTICS.iter().enumerate() {
            rows.push((format!("{stat} {key}"), [values[m][0][s], values[m][1][s]]));
        }
    }
    rows
}

/// File stem for a sheet, e.g. `VC EU & US Benchmark` → `vc_eu_us_benchmark`.
fn slug(sheet: &str) -> String {
    sheet
        .to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn record_batch(rows: &[(String, [f64; 2])]) -> Result<RecordBatch> {
    let mut fields = vec![Field::new("Metrics", DataType::Utf8, false)];
    fields.extend(
        VINTAGES
            .iter()
            .map(|v| Field::new(v.to_string(), DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let labels = StringArray::from(rows.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>());
    let mut columns: Vec<arrow::array::ArrayRef> = vec![Arc::new(labels)];
    for i in 0..VINTAGES.len() {
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|(_, v)| v[i]).collect::<Vec<_>>(),
        )));
    }

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn write_csv(path: &Path, rows: &[(String, [f64; 2])]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    let mut header = vec!["Metrics".to_string()];
    header.extend(VINTAGES.iter().map(|v| v.to_string()));
    writer.write_record(&header)?;
    for (label, values) in rows {
        let mut record = vec![label.clone()];
        record.extend(values.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut workbook = Map::new();

    for (sheet, values) in &SHEETS {
        let rows = sheet_rows(values);

        let records: Vec<JsonValue> = rows
            .iter()
            .map(|(label, v)| {
                let mut record = Map::new();
                record.insert("Metrics".into(), json!(label));
                for (year, value) in VINTAGES.iter().zip(v) {
                    record.insert(year.to_string(), json!(value));
                }
                JsonValue::Object(record)
            })
            .collect();
        workbook.insert(sheet.to_string(), JsonValue::Array(records));

        let stem = slug(sheet);
        write_csv(&out_dir.join(format!("{stem}.csv")), &rows)?;

        let batch = record_batch(&rows)?;
        write_parquet(&out_dir.join(format!("{stem}.parquet")), &batch)?;

        println!("{sheet}\n{}", pretty_format_batches(&[batch])?);
    }

    let json_path = out_dir.join("benchmark_data.json");
    let text = serde_json::to_string_pretty(&JsonValue::Object(workbook))?;
    std::fs::write(&json_path, text + "\n")
        .with_context(|| format!("writing {}", json_path.display()))?;

    println!(
        "Wrote {} sheets ({} vintages each) to {}",
        SHEETS.len(),
        VINTAGES.len(),
        out_dir.display()
    );
    Ok(())
}
