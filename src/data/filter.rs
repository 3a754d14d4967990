use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use super::model::{Dataset, NumericField, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Raised only by hand-built range constraints; specs assembled through
/// [`FilterSpec::default_spec`] and the `with_*` updates are valid by
/// construction.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("inverted range for {field}: {lo} > {hi}")]
    InvertedRange {
        field: NumericField,
        lo: f64,
        hi: f64,
    },
    #[error("non-finite bound for {field}")]
    NonFiniteBound { field: NumericField },
}

// ---------------------------------------------------------------------------
// ValueRange – a closed numeric interval
// ---------------------------------------------------------------------------

/// Closed interval `[lo, hi]`, inclusive on both ends. `lo <= hi` always
/// holds; an inverted pair is rejected at construction, never swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    lo: f64,
    hi: f64,
}

impl ValueRange {
    pub fn new(field: NumericField, lo: f64, hi: f64) -> Result<Self, FilterError> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(FilterError::NonFiniteBound { field });
        }
        if lo > hi {
            return Err(FilterError::InvertedRange { field, lo, hi });
        }
        Ok(ValueRange { lo, hi })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – the full set of user-selected constraints
// ---------------------------------------------------------------------------

/// Per-field inclusion constraints: selection sets for the categorical
/// columns, closed intervals for numeric columns. All constraints combine
/// conjunctively in [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub years: BTreeSet<i32>,
    pub regions: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub ranges: BTreeMap<NumericField, ValueRange>,
}

impl FilterSpec {
    /// The identity filter for a dataset: every categorical value selected,
    /// every slider field spanning its observed [min, max]. The Digital
    /// Adoption Index always spans the fixed [0, 1] domain regardless of the
    /// observed data.
    pub fn default_spec(dataset: &Dataset) -> Self {
        let mut ranges = BTreeMap::new();
        for field in NumericField::FILTERABLE {
            let (lo, hi) = if field == NumericField::DigitalAdoption {
                (0.0, 1.0)
            } else {
                match dataset.extents.get(&field) {
                    Some(&extent) => extent,
                    None => continue,
                }
            };
            // Observed extents satisfy lo <= hi, so this cannot fail.
            if let Ok(range) = ValueRange::new(field, lo, hi) {
                ranges.insert(field, range);
            }
        }

        FilterSpec {
            years: dataset.years.clone(),
            regions: dataset.regions.clone(),
            countries: dataset.countries.clone(),
            ranges,
        }
    }

    /// Replace the year selection, leaving `self` untouched.
    pub fn with_years(&self, years: BTreeSet<i32>) -> Self {
        FilterSpec {
            years,
            ..self.clone()
        }
    }

    /// Replace the region selection, leaving `self` untouched.
    pub fn with_regions(&self, regions: BTreeSet<String>) -> Self {
        FilterSpec {
            regions,
            ..self.clone()
        }
    }

    /// Replace the country selection, leaving `self` untouched.
    pub fn with_countries(&self, countries: BTreeSet<String>) -> Self {
        FilterSpec {
            countries,
            ..self.clone()
        }
    }

    /// Replace one numeric field's interval, leaving `self` untouched.
    pub fn with_range(
        &self,
        field: NumericField,
        lo: f64,
        hi: f64,
    ) -> Result<Self, FilterError> {
        let mut next = self.clone();
        next.ranges.insert(field, ValueRange::new(field, lo, hi)?);
        Ok(next)
    }

    /// Whether a record satisfies every constraint. Records lacking a
    /// constrained numeric field (an absent trade column) are excluded: a
    /// missing value cannot witness membership in an interval.
    pub fn matches(&self, rec: &Record) -> bool {
        if !self.years.contains(&rec.year)
            || !self.regions.contains(&rec.region)
            || !self.countries.contains(&rec.country)
        {
            return false;
        }
        self.ranges.iter().all(|(&field, range)| {
            rec.numeric(field).map(|v| range.contains(v)).unwrap_or(false)
        })
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the rows passing the current spec
// ---------------------------------------------------------------------------

/// Indices of the records satisfying a [`FilterSpec`], in dataset order.
/// Immutable once produced; recomputed from scratch on every spec change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over the records of `dataset` selected by this view.
    pub fn records<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices.iter().map(move |&i| &dataset.records[i])
    }
}

/// Apply a spec to a dataset. Membership is the conjunction of all
/// constraints; a record failing any single one is excluded. Row order is
/// preserved (stable filter), and an empty categorical selection yields an
/// empty view — there is no implicit "select all" fallback.
pub fn apply(dataset: &Dataset, spec: &FilterSpec) -> FilteredView {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect();
    FilteredView { indices }
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

    fn sample_dataset() -> Dataset {
        let mut india = record("India", "Asia", 2020, 2000.0);
        india.exports = Some(300.0);
        india.imports = Some(350.0);
        india.trade_balance = Some(-50.0);

        let mut usa = record("USA", "Americas", 2020, 20000.0);
        usa.exports = Some(1500.0);
        usa.imports = Some(2000.0);
        usa.trade_balance = Some(-500.0);

        let germany = record("Germany", "Europe", 2021, 4200.0);

        Dataset::from_records(vec![india, usa, germany])
    }

    #[test]
    fn default_spec_selects_the_full_domain() {
        let ds = sample_dataset();
        let spec = FilterSpec::default_spec(&ds);

        assert_eq!(spec.countries.len(), 3);
        assert_eq!(spec.years.len(), 2);
        let gdp = &spec.ranges[&NumericField::Gdp];
        assert_eq!((gdp.lo(), gdp.hi()), (2000.0, 20000.0));
        // Digital adoption is pinned to [0, 1] no matter what was observed.
        let dig = &spec.ranges[&NumericField::DigitalAdoption];
        assert_eq!((dig.lo(), dig.hi()), (0.0, 1.0));
    }

    #[test]
    fn identity_filter_reproduces_the_dataset() {
        let ds = sample_dataset();
        let view = apply(&ds, &FilterSpec::default_spec(&ds));
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn result_is_a_stable_subsequence() {
        let ds = sample_dataset();
        let spec = FilterSpec::default_spec(&ds)
            .with_countries(["India", "Germany"].iter().map(|s| s.to_string()).collect());
        let view = apply(&ds, &spec);

        assert_eq!(view.indices(), &[0, 2]);
        let names: Vec<&str> = view.records(&ds).map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["India", "Germany"]);
    }

    #[test]
    fn empty_categorical_selection_yields_empty_view() {
        let ds = sample_dataset();
        let spec = FilterSpec::default_spec(&ds).with_countries(BTreeSet::new());
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn numeric_range_excludes_out_of_interval_rows() {
        let ds = sample_dataset();
        let spec = FilterSpec::default_spec(&ds)
            .with_range(NumericField::Gdp, 0.0, 1000.0)
            .expect("valid range");
        assert!(apply(&ds, &spec).is_empty());

        let spec = FilterSpec::default_spec(&ds)
            .with_range(NumericField::Gdp, 0.0, 3000.0)
            .expect("valid range");
        let view = apply(&ds, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records(&ds).next().map(|r| r.country.as_str()), Some("India"));
    }

    #[test]
    fn range_ends_are_inclusive() {
        let ds = sample_dataset();
        let spec = FilterSpec::default_spec(&ds)
            .with_range(NumericField::Gdp, 2000.0, 20000.0)
            .expect("valid range");
        assert_eq!(apply(&ds, &spec).len(), 3);
    }

    #[test]
    fn constraints_combine_conjunctively() {
        let ds = sample_dataset();
        // Country matches but the year does not: the row must be excluded.
        let spec = FilterSpec::default_spec(&ds)
            .with_countries(std::iter::once("Germany".to_string()).collect())
            .with_years(std::iter::once(2020).collect());
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn narrowing_a_constraint_never_grows_the_view() {
        let ds = sample_dataset();
        let wide = FilterSpec::default_spec(&ds);
        let narrow = wide
            .with_range(NumericField::Gdp, 1000.0, 5000.0)
            .expect("valid range");
        assert!(apply(&ds, &narrow).len() <= apply(&ds, &wide).len());
    }

    #[test]
    fn reapplying_a_spec_is_idempotent() {
        let ds = sample_dataset();
        let spec = FilterSpec::default_spec(&ds)
            .with_range(NumericField::Gdp, 1000.0, 5000.0)
            .expect("valid range");

        let once = apply(&ds, &spec);
        let materialized = Dataset::from_records(once.records(&ds).cloned().collect());
        let twice = apply(&materialized, &spec);

        assert_eq!(once.len(), twice.len());
        assert!(once
            .records(&ds)
            .zip(twice.records(&materialized))
            .all(|(a, b)| a == b));
    }

    #[test]
    fn records_without_a_constrained_trade_field_are_excluded() {
        let ds = sample_dataset();
        // Germany has no trade columns; constraining the balance drops it.
        let spec = FilterSpec::default_spec(&ds)
            .with_range(NumericField::TradeBalance, -1000.0, 0.0)
            .expect("valid range");
        let view = apply(&ds, &spec);
        let names: Vec<&str> = view
            .records(&ds)
            .map(|r| r.country.as_str())
            .collect();
        assert_eq!(names, vec!["India", "USA"]);
    }

    #[test]
    fn updates_do_not_mutate_the_original_spec() {
        let ds = sample_dataset();
        let original = FilterSpec::default_spec(&ds);
        let snapshot = original.clone();

        let _ = original.with_countries(BTreeSet::new());
        let _ = original.with_range(NumericField::Gdp, 0.0, 1.0);

        assert_eq!(original, snapshot);
    }

    #[test]
    fn inverted_range_is_rejected_not_swapped() {
        let err = ValueRange::new(NumericField::Gdp, 10.0, 5.0).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvertedRange {
                field: NumericField::Gdp,
                lo: 10.0,
                hi: 5.0
            }
        );
        assert!(ValueRange::new(NumericField::Gdp, f64::NAN, 5.0).is_err());
    }
}
