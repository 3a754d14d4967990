use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, NumericField, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while turning an input file into a [`Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: {message}")]
    BadRow { row: usize, message: String },
    #[error("workbook has no worksheets")]
    EmptyWorkbook,
    #[error("reading workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// Columns that must be present in every input file.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Country",
    "Region",
    "Year",
    "GDP (Billion USD)",
    "Economic Growth (%)",
    "Inflation (%)",
    "Unemployment Rate (%)",
    "Population (Millions)",
    "Manufacturing Output (Million Units)",
    "Energy Consumption (GWh)",
    "Digital Adoption Index (0-1)",
    "Carbon Emission (MT)",
];

/// One raw row as it appears in CSV or records-oriented JSON. The trade
/// columns are optional; every other column is required.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "GDP (Billion USD)")]
    gdp: f64,
    #[serde(rename = "Economic Growth (%)")]
    growth: f64,
    #[serde(rename = "Inflation (%)")]
    inflation: f64,
    #[serde(rename = "Unemployment Rate (%)")]
    unemployment: f64,
    #[serde(rename = "Population (Millions)")]
    population: f64,
    #[serde(rename = "Manufacturing Output (Million Units)")]
    manufacturing: f64,
    #[serde(rename = "Energy Consumption (GWh)")]
    energy: f64,
    #[serde(rename = "Digital Adoption Index (0-1)")]
    digital_adoption: f64,
    #[serde(rename = "Carbon Emission (MT)")]
    carbon: f64,
    #[serde(rename = "Export Revenue (Billion USD)", default)]
    exports: Option<f64>,
    #[serde(rename = "Import Cost (Billion USD)", default)]
    imports: Option<f64>,
}

impl RawRow {
    fn into_record(self) -> Record {
        // Trade Balance is derived once here and treated as a regular field
        // downstream.
        let trade_balance = self.exports.zip(self.imports).map(|(e, i)| e - i);
        Record {
            country: self.country,
            region: self.region,
            year: self.year,
            gdp: self.gdp,
            growth: self.growth,
            inflation: self.inflation,
            unemployment: self.unemployment,
            population: self.population,
            manufacturing: self.manufacturing,
            energy: self.energy,
            digital_adoption: self.digital_adoption,
            carbon: self.carbon,
            exports: self.exports,
            imports: self.imports,
            trade_balance,
        }
    }
}

fn check_required_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), LoadError> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.as_ref() == required) {
            return Err(LoadError::MissingColumn(required));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an indicator dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – Excel workbook, first sheet, header row on top
/// * `.csv`           – header row with the fixed column names
/// * `.json`          – records-oriented array of objects
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => load_excel(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    check_required_columns(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result.map_err(|e| LoadError::BadRow {
            row: row_no,
            message: e.to_string(),
        })?;
        records.push(raw.into_record());
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "India", "Region": "Asia", "Year": 2020, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root.as_array().ok_or_else(|| LoadError::BadRow {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    if let Some(first) = rows.first().and_then(|r| r.as_object()) {
        let keys: Vec<&String> = first.keys().collect();
        check_required_columns(&keys)?;
    }

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let raw: RawRow = serde_json::from_value(row.clone()).map_err(|e| LoadError::BadRow {
            row: row_no,
            message: e.to_string(),
        })?;
        records.push(raw.into_record());
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Read the first worksheet. The top row is the header; cells are coerced to
/// the column's type (numbers may arrive as Int, Float, or numeric text).
fn load_excel(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => return Err(LoadError::EmptyWorkbook),
    };
    check_required_columns(&headers)?;

    let col_idx = |name: &str| headers.iter().position(|h| h == name);
    // Required columns were just checked, these lookups cannot fail.
    let required_idx: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .map(|name| col_idx(name).unwrap_or_default())
        .collect();
    let exports_idx = col_idx(NumericField::ExportRevenue.label());
    let imports_idx = col_idx(NumericField::ImportCost.label());

    static EMPTY_CELL: Data = Data::Empty;

    let mut records = Vec::new();
    for (row_no, row) in rows.enumerate() {
        let cell = |i: usize| row.get(i).unwrap_or(&EMPTY_CELL);
        let num = |slot: usize| -> Result<f64, LoadError> {
            cell_to_f64(cell(required_idx[slot])).ok_or_else(|| LoadError::BadRow {
                row: row_no,
                message: format!("'{}' is not a number", REQUIRED_COLUMNS[slot]),
            })
        };

        let year_cell = cell(required_idx[2]);
        let year = cell_to_f64(year_cell)
            .map(|v| v as i32)
            .ok_or_else(|| LoadError::BadRow {
                row: row_no,
                message: "'Year' is not a number".to_string(),
            })?;

        let exports = exports_idx.and_then(|i| cell_to_f64(cell(i)));
        let imports = imports_idx.and_then(|i| cell_to_f64(cell(i)));
        let trade_balance = exports.zip(imports).map(|(e, i)| e - i);

        records.push(Record {
            country: cell_to_string(cell(required_idx[0])),
            region: cell_to_string(cell(required_idx[1])),
            year,
            gdp: num(3)?,
            growth: num(4)?,
            inflation: num(5)?,
            unemployment: num(6)?,
            population: num(7)?,
            manufacturing: num(8)?,
            energy: num(9)?,
            digital_adoption: num(10)?,
            carbon: num(11)?,
            exports,
            imports,
            trade_balance,
        });
    }

    Ok(Dataset::from_records(records))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => Some(*v),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
