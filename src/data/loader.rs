use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{Car, CarDataset, NumericField, NAME_COLUMN, ORIGIN_COLUMN};

/// Columns every input must carry, checked in this order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    ORIGIN_COLUMN,
    "Miles_per_Gallon",
    "Horsepower",
    "Weight_in_lbs",
    "Cylinders",
    "Displacement",
    "Acceleration",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding parquet record batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("column `{column}` is missing")]
    MissingColumn { column: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the cars table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma-delimited, values auto-typed
/// * `.json`    – `[{ "Origin": "USA", "Horsepower": 130, ... }, ...]`
/// * `.parquet` – one column per field, nullable
///
/// Fails with [`LoadError::MissingColumn`] if a required column is absent from
/// the schema. Records with a null required value are dropped.
pub fn load_file(path: &Path) -> Result<CarDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = complete_records(raw);
    log::info!(
        "Loaded {} cars from {} ({} origins)",
        dataset.len(),
        path.display(),
        dataset.origins.len()
    );
    Ok(dataset)
}

/// Same as [`load_file`], wrapped for sharing across views.
pub fn load_shared(path: &Path) -> Result<Arc<CarDataset>, LoadError> {
    load_file(path).map(Arc::new)
}

fn check_columns(has_column: impl Fn(&str) -> bool) -> Result<(), LoadError> {
    match REQUIRED_COLUMNS.iter().find(|col| !has_column(col)) {
        Some(col) => Err(LoadError::MissingColumn {
            column: col.to_string(),
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Raw records: every field optional until validated
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawCar {
    #[serde(rename = "Name", default, deserialize_with = "auto_text")]
    name: Option<String>,
    #[serde(rename = "Origin", default, deserialize_with = "auto_text")]
    origin: Option<String>,
    #[serde(rename = "Miles_per_Gallon", default, deserialize_with = "auto_number")]
    miles_per_gallon: Option<f64>,
    #[serde(rename = "Cylinders", default, deserialize_with = "auto_number")]
    cylinders: Option<f64>,
    #[serde(rename = "Displacement", default, deserialize_with = "auto_number")]
    displacement: Option<f64>,
    #[serde(rename = "Horsepower", default, deserialize_with = "auto_number")]
    horsepower: Option<f64>,
    #[serde(rename = "Weight_in_lbs", default, deserialize_with = "auto_number")]
    weight_in_lbs: Option<f64>,
    #[serde(rename = "Acceleration", default, deserialize_with = "auto_number")]
    acceleration: Option<f64>,
}

impl RawCar {
    fn set_number(&mut self, field: NumericField, value: Option<f64>) {
        let slot = match field {
            NumericField::MilesPerGallon => &mut self.miles_per_gallon,
            NumericField::Cylinders => &mut self.cylinders,
            NumericField::Displacement => &mut self.displacement,
            NumericField::Horsepower => &mut self.horsepower,
            NumericField::WeightInLbs => &mut self.weight_in_lbs,
            NumericField::Acceleration => &mut self.acceleration,
        };
        *slot = value;
    }

    fn into_car(self) -> Option<Car> {
        Some(Car {
            name: self.name,
            origin: self.origin?,
            miles_per_gallon: self.miles_per_gallon?,
            cylinders: self.cylinders?,
            displacement: self.displacement?,
            horsepower: self.horsepower?,
            weight_in_lbs: self.weight_in_lbs?,
            acceleration: self.acceleration?,
        })
    }
}

/// A cell before typing: numbers stay numbers, anything else is text or ignored.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Numeric strings become numbers; blanks, `NA` and other text become null.
fn auto_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Cell>::deserialize(de)? {
        Some(Cell::Number(v)) => Some(v).filter(|v| v.is_finite()),
        Some(Cell::Text(s)) => parse_number(&s),
        Some(Cell::Other(_)) | None => None,
    })
}

fn auto_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Cell>::deserialize(de)? {
        Some(Cell::Text(s)) => Some(s).filter(|s| !s.trim().is_empty()),
        Some(Cell::Number(v)) => Some(v.to_string()),
        Some(Cell::Other(_)) | None => None,
    })
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn complete_records(raw: Vec<RawCar>) -> CarDataset {
    let total = raw.len();
    let cars: Vec<Car> = raw.into_iter().filter_map(RawCar::into_car).collect();
    if cars.len() < total {
        log::info!("Excluded {} incomplete records", total - cars.len());
    }
    CarDataset::from_cars(cars)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawCar>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    check_columns(|col| headers.iter().any(|h| h == col))?;

    reader
        .deserialize::<RawCar>()
        .map(|row| row.map_err(LoadError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Name": "chevrolet chevelle malibu", "Miles_per_Gallon": 18,
///     "Cylinders": 8, "Displacement": 307, "Horsepower": 130,
///     "Weight_in_lbs": 3504, "Acceleration": 12, "Origin": "USA" },
///   ...
/// ]
/// ```
///
/// Every object must carry every required key (a `null` value is fine).
fn read_json(path: &Path) -> Result<Vec<RawCar>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_reader(BufReader::new(file))?;

    for row in &rows {
        check_columns(|col| row.contains_key(col))?;
    }

    rows.into_iter()
        .map(|row| serde_json::from_value(JsonValue::Object(row)).map_err(LoadError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Numeric columns may be Int32, Int64, Float32, Float64 (or numeric Utf8);
/// Origin and Name are Utf8 / LargeUtf8. Arrow nulls are null.
fn read_parquet(path: &Path) -> Result<Vec<RawCar>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    check_columns(|col| schema.index_of(col).is_ok())?;
    let reader = builder.build()?;

    let mut raw = Vec::new();
    for batch in reader {
        let batch = batch?;
        let origin = batch.column(schema.index_of(ORIGIN_COLUMN)?);
        let name = schema.index_of(NAME_COLUMN).ok().map(|i| batch.column(i));
        let numeric: Vec<(NumericField, &Arc<dyn Array>)> = NumericField::ALL
            .iter()
            .map(|&f| Ok((f, batch.column(schema.index_of(f.column())?))))
            .collect::<Result<_, arrow::error::ArrowError>>()?;

        for row in 0..batch.num_rows() {
            let mut car = RawCar {
                origin: text_at(origin, row),
                name: name.and_then(|col| text_at(col, row)),
                ..RawCar::default()
            };
            for (field, col) in &numeric {
                car.set_number(*field, number_at(col, row));
            }
            raw.push(car);
        }
    }
    Ok(raw)
}

fn number_at(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Utf8 | DataType::LargeUtf8 => text_at(col, row).and_then(|s| parse_number(&s)),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn text_at(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    let text = if let Some(s) = any.downcast_ref::<StringArray>() {
        s.value(row)
    } else if let Some(s) = any.downcast_ref::<LargeStringArray>() {
        s.value(row)
    } else {
        return None;
    };
    Some(text.to_string()).filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{ArrayRef, Float64Builder, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str =
        "Name,Miles_per_Gallon,Cylinders,Displacement,Horsepower,Weight_in_lbs,Acceleration,Year,Origin";

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_values_are_auto_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "cars.csv",
            &format!(
                "{HEADER}\n\
                 chevrolet chevelle malibu,18,8,307,130,3504,12,1970-01-01,USA\n\
                 toyota corona,24.5,4,113,95,2372,15,1970-01-01,Japan\n"
            ),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let chevy = &ds.cars[0];
        assert_eq!(chevy.name.as_deref(), Some("chevrolet chevelle malibu"));
        assert_eq!(chevy.origin, "USA");
        assert_eq!(chevy.miles_per_gallon, 18.0);
        assert_eq!(chevy.weight_in_lbs, 3504.0);
        assert_eq!(ds.cars[1].miles_per_gallon, 24.5);
    }

    #[test]
    fn csv_rows_with_missing_values_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "cars.csv",
            &format!(
                "{HEADER}\n\
                 ford pinto,25,4,98,,2046,19,1971-01-01,USA\n\
                 citroen ds-21 pallas,,4,133,115,3090,17.5,1970-01-01,Europe\n\
                 renault 12,NA,4,96,69,2189,18,1972-01-01,Europe\n\
                 datsun 510,27,4,97,88,2130,14.5,1970-01-01,\n\
                 amc hornet,18,6,199,97,2774,15.5,1970-01-01,USA\n"
            ),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.cars[0].name.as_deref(), Some("amc hornet"));
        assert_eq!(ds.origins.len(), 1);
    }

    #[test]
    fn missing_column_fails_fast_with_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "cars.csv",
            "Name,Miles_per_Gallon,Cylinders,Displacement,Weight_in_lbs,Acceleration,Origin\n\
             amc hornet,18,6,199,2774,15.5,USA\n",
        );

        match load_file(&path) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "Horsepower"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn json_records_load_and_nulls_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "cars.json",
            r#"[
              {"Name": "buick skylark 320", "Miles_per_Gallon": 15, "Cylinders": 8,
               "Displacement": 350, "Horsepower": 165, "Weight_in_lbs": 3693,
               "Acceleration": 11.5, "Year": "1970-01-01", "Origin": "USA"},
              {"Name": "ford torino", "Miles_per_Gallon": null, "Cylinders": 8,
               "Displacement": 302, "Horsepower": 140, "Weight_in_lbs": 3449,
               "Acceleration": 10.5, "Year": "1970-01-01", "Origin": "USA"}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.cars[0].horsepower, 165.0);
    }

    #[test]
    fn json_object_without_required_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "cars.json",
            r#"[{"Miles_per_Gallon": 15, "Cylinders": 8, "Displacement": 350,
                 "Horsepower": 165, "Weight_in_lbs": 3693, "Acceleration": 11.5}]"#,
        );

        match load_file(&path) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "Origin"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parquet_columns_load_with_nulls_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.parquet");

        let mut hp = Float64Builder::new();
        hp.append_value(130.0);
        hp.append_null();
        let columns: Vec<(&str, ArrayRef)> = vec![
            ("Origin", Arc::new(StringArray::from(vec!["USA", "Japan"]))),
            ("Miles_per_Gallon", Arc::new(Float64Array::from(vec![18.0, 31.0]))),
            ("Horsepower", Arc::new(hp.finish())),
            ("Weight_in_lbs", Arc::new(Int64Array::from(vec![3504, 1950]))),
            ("Cylinders", Arc::new(Int64Array::from(vec![8, 4]))),
            ("Displacement", Arc::new(Float64Array::from(vec![307.0, 97.0]))),
            ("Acceleration", Arc::new(Float64Array::from(vec![12.0, 16.5]))),
        ];
        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), true))
                .collect::<Vec<_>>(),
        ));
        let batch =
            RecordBatch::try_new(schema.clone(), columns.into_iter().map(|(_, a)| a).collect())
                .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.cars[0].origin, "USA");
        assert_eq!(ds.cars[0].weight_in_lbs, 3504.0);
        assert_eq!(ds.cars[0].name, None);
    }

    #[test]
    fn csv_and_json_yield_the_same_cars() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_file(
            &dir,
            "cars.csv",
            &format!(
                "{HEADER}\n\
                 volkswagen 1131 deluxe sedan,26,4,97,46,1835,20.5,1970-01-01,Europe\n\
                 datsun pl510,27,4,97,88,2130,14.5,1970-01-01,Japan\n"
            ),
        );
        let json = write_file(
            &dir,
            "cars.json",
            r#"[
              {"Name": "volkswagen 1131 deluxe sedan", "Miles_per_Gallon": 26, "Cylinders": 4,
               "Displacement": 97, "Horsepower": 46, "Weight_in_lbs": 1835,
               "Acceleration": 20.5, "Year": "1970-01-01", "Origin": "Europe"},
              {"Name": "datsun pl510", "Miles_per_Gallon": 27, "Cylinders": 4,
               "Displacement": 97, "Horsepower": 88, "Weight_in_lbs": 2130,
               "Acceleration": 14.5, "Year": "1970-01-01", "Origin": "Japan"}
            ]"#,
        );

        let from_csv = load_file(&csv).unwrap();
        let from_json = load_file(&json).unwrap();
        assert_eq!(from_csv.cars, from_json.cars);
        assert_eq!(from_csv.origins, from_json.origins);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let result = load_file(Path::new("cars.xlsx"));
        assert!(matches!(result, Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"));
    }
}
