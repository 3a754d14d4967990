use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// NumericField – the numeric indicator columns
// ---------------------------------------------------------------------------

/// One of the numeric indicator columns of the dataset.
///
/// `Ord` so fields can key a `BTreeMap` (range filters, extents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    Gdp,
    Growth,
    Inflation,
    Unemployment,
    Population,
    Manufacturing,
    Energy,
    DigitalAdoption,
    Carbon,
    ExportRevenue,
    ImportCost,
    TradeBalance,
}

impl NumericField {
    /// Every numeric field, in display order.
    pub const ALL: [NumericField; 12] = [
        NumericField::Gdp,
        NumericField::Growth,
        NumericField::Inflation,
        NumericField::Unemployment,
        NumericField::Population,
        NumericField::Manufacturing,
        NumericField::Energy,
        NumericField::DigitalAdoption,
        NumericField::Carbon,
        NumericField::ExportRevenue,
        NumericField::ImportCost,
        NumericField::TradeBalance,
    ];

    /// The fields exposed as range sliders. Trade columns are optional in the
    /// source file, so they are not part of the default filter set.
    pub const FILTERABLE: [NumericField; 9] = [
        NumericField::Gdp,
        NumericField::Growth,
        NumericField::Inflation,
        NumericField::Unemployment,
        NumericField::Population,
        NumericField::Manufacturing,
        NumericField::Energy,
        NumericField::DigitalAdoption,
        NumericField::Carbon,
    ];

    /// Column header as it appears in the source file.
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::Gdp => "GDP (Billion USD)",
            NumericField::Growth => "Economic Growth (%)",
            NumericField::Inflation => "Inflation (%)",
            NumericField::Unemployment => "Unemployment Rate (%)",
            NumericField::Population => "Population (Millions)",
            NumericField::Manufacturing => "Manufacturing Output (Million Units)",
            NumericField::Energy => "Energy Consumption (GWh)",
            NumericField::DigitalAdoption => "Digital Adoption Index (0-1)",
            NumericField::Carbon => "Carbon Emission (MT)",
            NumericField::ExportRevenue => "Export Revenue (Billion USD)",
            NumericField::ImportCost => "Import Cost (Billion USD)",
            NumericField::TradeBalance => "Trade Balance",
        }
    }

    /// Short name for axis labels and compact headers.
    pub fn short_label(&self) -> &'static str {
        match self {
            NumericField::Gdp => "GDP",
            NumericField::Growth => "Growth",
            NumericField::Inflation => "Inflation",
            NumericField::Unemployment => "Unemployment",
            NumericField::Population => "Population",
            NumericField::Manufacturing => "Manufacturing",
            NumericField::Energy => "Energy",
            NumericField::DigitalAdoption => "Digital",
            NumericField::Carbon => "Carbon",
            NumericField::ExportRevenue => "Exports",
            NumericField::ImportCost => "Imports",
            NumericField::TradeBalance => "Trade Bal.",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single (country, year) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub region: String,
    pub year: i32,
    pub gdp: f64,
    pub growth: f64,
    pub inflation: f64,
    pub unemployment: f64,
    pub population: f64,
    pub manufacturing: f64,
    pub energy: f64,
    pub digital_adoption: f64,
    pub carbon: f64,
    /// Present only when the source file carries the trade columns.
    pub exports: Option<f64>,
    pub imports: Option<f64>,
    /// Derived at load time: exports − imports.
    pub trade_balance: Option<f64>,
}

impl Record {
    /// Resolve a numeric field on this record. Trade columns (and the derived
    /// balance) may be absent.
    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Gdp => Some(self.gdp),
            NumericField::Growth => Some(self.growth),
            NumericField::Inflation => Some(self.inflation),
            NumericField::Unemployment => Some(self.unemployment),
            NumericField::Population => Some(self.population),
            NumericField::Manufacturing => Some(self.manufacturing),
            NumericField::Energy => Some(self.energy),
            NumericField::DigitalAdoption => Some(self.digital_adoption),
            NumericField::Carbon => Some(self.carbon),
            NumericField::ExportRevenue => self.exports,
            NumericField::ImportCost => self.imports,
            NumericField::TradeBalance => self.trade_balance,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records, in source-file order.
    pub records: Vec<Record>,
    /// Distinct years present, sorted.
    pub years: BTreeSet<i32>,
    /// Distinct regions present, sorted.
    pub regions: BTreeSet<String>,
    /// Distinct countries present, sorted.
    pub countries: BTreeSet<String>,
    /// Observed [min, max] per numeric field (only fields with at least one
    /// value appear).
    pub extents: BTreeMap<NumericField, (f64, f64)>,
}

impl Dataset {
    /// Build the distinct-value and extent indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut years = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut extents: BTreeMap<NumericField, (f64, f64)> = BTreeMap::new();

        for rec in &records {
            years.insert(rec.year);
            regions.insert(rec.region.clone());
            countries.insert(rec.country.clone());

            for field in NumericField::ALL {
                if let Some(v) = rec.numeric(field) {
                    extents
                        .entry(field)
                        .and_modify(|(lo, hi)| {
                            *lo = lo.min(v);
                            *hi = hi.max(v);
                        })
                        .or_insert((v, v));
                }
            }
        }

        Dataset {
            records,
            years,
            regions,
            countries,
            extents,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the trade columns were present in the source file.
    pub fn has_trade_data(&self) -> bool {
        self.records.iter().any(|r| r.trade_balance.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, region: &str, year: i32, gdp: f64) -> Record {
        Record {
            country: country.to_string(),
            region: region.to_string(),
            year,
            gdp,
            growth: 2.0,
            inflation: 3.0,
            unemployment: 5.0,
            population: 50.0,
            manufacturing: 100.0,
            energy: 400.0,
            digital_adoption: 0.5,
            carbon: 120.0,
            exports: None,
            imports: None,
            trade_balance: None,
        }
    }

    #[test]
    fn indices_cover_distinct_values_and_extents() {
        let ds = Dataset::from_records(vec![
            record("India", "Asia", 2020, 2000.0),
            record("USA", "Americas", 2021, 20000.0),
            record("India", "Asia", 2021, 2200.0),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2020, 2021]);
        assert_eq!(ds.countries.len(), 2);
        assert_eq!(ds.regions.len(), 2);
        assert_eq!(ds.extents[&NumericField::Gdp], (2000.0, 20000.0));
        // No trade columns loaded, so no trade extents either.
        assert!(!ds.extents.contains_key(&NumericField::TradeBalance));
        assert!(!ds.has_trade_data());
    }

    #[test]
    fn numeric_resolves_optional_fields() {
        let mut rec = record("India", "Asia", 2020, 2000.0);
        assert_eq!(rec.numeric(NumericField::Gdp), Some(2000.0));
        assert_eq!(rec.numeric(NumericField::TradeBalance), None);

        rec.exports = Some(300.0);
        rec.imports = Some(350.0);
        rec.trade_balance = Some(-50.0);
        assert_eq!(rec.numeric(NumericField::TradeBalance), Some(-50.0));
    }
}
