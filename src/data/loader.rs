use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, PlayerRow, SeasonTable};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a season table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one player per line (the season export)
/// * `.json`    – `[{ "Player Name": "...", "Total Goals": 3, ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats or booleans
pub fn load_file(path: &Path) -> Result<SeasonTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::debug!(
        "Loaded {} rows, {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

/// Load a season table and check that every `required` column is in the
/// header.
pub fn load_season(path: &Path, required: &[&str]) -> Result<SeasonTable, LoadError> {
    let table = load_file(path)?;
    require_columns(&table, path, required)?;
    Ok(table)
}

pub fn require_columns(table: &SeasonTable, path: &Path, required: &[&str]) -> Result<(), LoadError> {
    match table.missing_column(required) {
        Some(column) => Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<SeasonTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file, path)
}

/// CSV layout: header row with column names, one player per record.
///
/// Cells are kept as raw text so sentinel tokens survive until cleaning;
/// empty cells become `Null`. Short records are accepted and simply lack
/// the trailing columns.
pub fn read_csv<R: Read>(reader: R, source: &Path) -> Result<SeasonTable, LoadError> {
    let csv_err = |source_err: csv::Error| LoadError::Csv {
        path: source.to_path_buf(),
        source: source_err,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), text_cell(value)))
            .collect();
        rows.push(PlayerRow { cells });
    }

    Ok(SeasonTable::new(headers, rows))
}

fn text_cell(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `to_json(orient='records')`):
///
/// ```json
/// [
///   { "Player Name": "J. Doe", "Player's Role": "ATTACKER", "Total Goals": 5 },
///   ...
/// ]
/// ```
///
/// The header is the union of keys over all records.
fn load_json(path: &Path) -> Result<SeasonTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let malformed = |message: String| LoadError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let records = root
        .as_array()
        .ok_or_else(|| malformed("expected top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| malformed(format!("row {i} is not a JSON object")))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            cells.insert(key.clone(), json_to_cell(val));
        }
        rows.push(PlayerRow { cells });
    }

    Ok(SeasonTable::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per season field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested columns are rejected.
fn load_parquet(path: &Path) -> Result<SeasonTable, LoadError> {
    let parquet_err = |source: ParquetError| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = batch.schema();

        let mut batch_rows = vec![PlayerRow::default(); batch.num_rows()];
        for (col_idx, field) in schema.fields().iter().enumerate() {
            let col = batch.column(col_idx);
            for (row, player) in batch_rows.iter_mut().enumerate() {
                let value = extract_cell(col, row).map_err(|message| LoadError::Malformed {
                    path: path.to_path_buf(),
                    message: format!("column '{}': {message}", field.name()),
                })?;
                player.cells.insert(field.name().clone(), value);
            }
        }
        rows.extend(batch_rows);
    }

    Ok(SeasonTable::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue, String> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => return Err(format!("unsupported column type {other:?}")),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DUELS_WON_PCT, PLAYER_NAME, ROLE, TOTAL_GOALS};
    use arrow::array::{ArrayRef, Float64Array, Int64Array, ListArray, StringArray};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::io::Write;

    const SEASON: &str = "\
Player Name,Player's Role,Total Goals,Duels Won %
Ana Ruiz,ATTACKER,5,0.52
Bo Lind,GOALKEEPER,0,-
Cy Park,DEFENDER,,0.61
Di Moss,MIDFIELDER";

    #[test]
    fn csv_keeps_raw_text_and_nulls() {
        let table = read_csv(SEASON.as_bytes(), Path::new("season.csv")).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.columns, vec![PLAYER_NAME, ROLE, TOTAL_GOALS, DUELS_WON_PCT]);

        let bo = &table.rows[1];
        assert_eq!(bo.get(DUELS_WON_PCT), Some(&CellValue::Text("-".into())));
        assert_eq!(table.rows[2].get(TOTAL_GOALS), Some(&CellValue::Null));
        // Short record: trailing columns are simply absent.
        assert_eq!(table.rows[3].get(TOTAL_GOALS), None);
        assert_eq!(table.rows[3].role().as_deref(), Some("MIDFIELDER"));
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let table = read_csv(SEASON.as_bytes(), Path::new("season.csv")).unwrap();
        let err = require_columns(&table, Path::new("season.csv"), &[ROLE, "Yellow Cards"])
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref column, .. } if column == "Yellow Cards"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/season.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("season.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn csv_file_round_trip_through_load_season() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SEASON.as_bytes()).unwrap();

        let table = load_season(file.path(), &[PLAYER_NAME, ROLE, TOTAL_GOALS]).unwrap();
        assert_eq!(table.rows[0].player_name(), "Ana Ruiz");
    }

    #[test]
    fn json_records_load_with_typed_cells() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"Player Name":"Ana","Player's Role":"ATTACKER","Total Goals":5,"Duels Won %":0.5}},
                {{"Player Name":"Bo","Player's Role":"GOALKEEPER","Total Goals":null,"Duels Won %":"-"}}]"#
        )
        .unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column(DUELS_WON_PCT));
        assert_eq!(table.rows[0].get(TOTAL_GOALS), Some(&CellValue::Integer(5)));
        assert_eq!(table.rows[0].get(DUELS_WON_PCT), Some(&CellValue::Float(0.5)));
        assert_eq!(table.rows[1].get(TOTAL_GOALS), Some(&CellValue::Null));
    }

    #[test]
    fn json_that_is_not_an_array_is_malformed() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"Player Name":"Ana"}"#).unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    fn write_parquet(batch: &RecordBatch) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn parquet_columns_load_as_typed_cells() {
        let batch = RecordBatch::try_from_iter(vec![
            (PLAYER_NAME, Arc::new(StringArray::from(vec!["Ana Ruiz", "Bo Lind"])) as ArrayRef),
            (ROLE, Arc::new(StringArray::from(vec![Some("ATTACKER"), None])) as ArrayRef),
            (TOTAL_GOALS, Arc::new(Int64Array::from(vec![5, 0])) as ArrayRef),
            (DUELS_WON_PCT, Arc::new(Float64Array::from(vec![Some(0.52), None])) as ArrayRef),
        ])
        .unwrap();
        let file = write_parquet(&batch);

        let table = load_season(file.path(), &[ROLE, TOTAL_GOALS]).unwrap();
        assert_eq!(table.columns, vec![PLAYER_NAME, ROLE, TOTAL_GOALS, DUELS_WON_PCT]);
        assert_eq!(table.len(), 2);

        let ana = &table.rows[0];
        assert_eq!(ana.player_name(), "Ana Ruiz");
        assert_eq!(ana.role().as_deref(), Some("ATTACKER"));
        assert_eq!(ana.get(TOTAL_GOALS), Some(&CellValue::Integer(5)));
        assert_eq!(ana.get(DUELS_WON_PCT), Some(&CellValue::Float(0.52)));

        let bo = &table.rows[1];
        assert_eq!(bo.get(ROLE), Some(&CellValue::Null));
        assert_eq!(bo.get(DUELS_WON_PCT), Some(&CellValue::Null));
    }

    #[test]
    fn nested_parquet_column_is_malformed() {
        let shots = ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
            Some(vec![Some(1), Some(2)]),
            Some(vec![Some(3)]),
        ]);
        let batch = RecordBatch::try_from_iter(vec![
            (PLAYER_NAME, Arc::new(StringArray::from(vec!["Ana", "Bo"])) as ArrayRef),
            ("Shots", Arc::new(shots) as ArrayRef),
        ])
        .unwrap();
        let file = write_parquet(&batch);

        let err = load_file(file.path()).unwrap_err();
        assert!(
            matches!(err, LoadError::Malformed { ref message, .. } if message.contains("Shots")),
            "{err}"
        );
    }
}
