use super::filter::FilteredView;
use super::model::{Dataset, NumericField};

// ---------------------------------------------------------------------------
// KpiSet – scalar aggregates over a filtered view
// ---------------------------------------------------------------------------

/// The headline metrics shown above the charts. Sums over an empty view are
/// 0.0; means are NaN so callers can tell "no data" from "zero".
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSet {
    pub total_gdp: f64,
    pub mean_growth: f64,
    /// Sum of the derived Trade Balance over rows where it is present.
    pub total_trade_balance: f64,
    pub samples: usize,
}

/// Compute the KPI set over exactly the rows selected by `view`.
pub fn summarize(dataset: &Dataset, view: &FilteredView) -> KpiSet {
    let mut total_gdp = 0.0;
    let mut growth_sum = 0.0;
    let mut total_trade_balance = 0.0;

    for rec in view.records(dataset) {
        total_gdp += rec.gdp;
        growth_sum += rec.growth;
        if let Some(tb) = rec.trade_balance {
            total_trade_balance += tb;
        }
    }

    let samples = view.len();
    let mean_growth = if samples == 0 {
        f64::NAN
    } else {
        growth_sum / samples as f64
    };

    KpiSet {
        total_gdp,
        mean_growth,
        total_trade_balance,
        samples,
    }
}

// ---------------------------------------------------------------------------
// CorrelationMatrix – pairwise Pearson over the numeric fields
// ---------------------------------------------------------------------------

/// Square matrix of Pearson coefficients over [`NumericField::ALL`].
/// Undefined cells (fewer than 2 complete rows, or zero variance on either
/// side) hold NaN — never a fabricated 0 or 1.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    fields: Vec<NumericField>,
    cells: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn fields(&self) -> &[NumericField] {
        &self.fields
    }

    pub fn dim(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.fields.len() + col]
    }
}

/// Pearson coefficient over paired samples. NaN when fewer than two pairs or
/// when either side has zero variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    if x.len() < 2 {
        return f64::NAN;
    }

    let n = x.len() as f64;
    let mean_x: f64 = x.iter().sum::<f64>() / n;
    let mean_y: f64 = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x > 0.0 && var_y > 0.0 {
        cov / (var_x.sqrt() * var_y.sqrt())
    } else {
        f64::NAN
    }
}

/// Pairwise-complete Pearson correlation over all numeric fields of the
/// filtered rows. Each field pair uses only the rows where both values are
/// present, so optional trade columns degrade that pair, not the matrix.
pub fn correlate(dataset: &Dataset, view: &FilteredView) -> CorrelationMatrix {
    let fields: Vec<NumericField> = NumericField::ALL.to_vec();
    let n = fields.len();
    let mut cells = vec![f64::NAN; n * n];

    // Per-field column vectors over the view (None kept for pairing).
    let columns: Vec<Vec<Option<f64>>> = fields
        .iter()
        .map(|&f| view.records(dataset).map(|r| r.numeric(f)).collect())
        .collect();

    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(columns[j].iter())
                .filter_map(|(a, b)| (*a).zip(*b))
                .unzip();

            let value = if i == j {
                // Exact diagonal: defined whenever the field varies at all.
                if xs.len() >= 2 && pearson(&xs, &ys).is_finite() {
                    1.0
                } else {
                    f64::NAN
                }
            } else {
                pearson(&xs, &ys)
            };

            cells[i * n + j] = value;
            cells[j * n + i] = value;
        }
    }

    CorrelationMatrix { fields, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSpec};
    use crate::data::model::Record;
    use std::collections::BTreeSet;

    fn record(country: &str, year: i32, gdp: f64, growth: f64) -> Record {
        Record {
            country: country.to_string(),
            region: "Asia".to_string(),
            year,
            gdp,
            growth,
            inflation: 3.0,
            unemployment: 5.0,
            population: 50.0,
            manufacturing: 100.0,
            energy: gdp * 0.2,
            digital_adoption: 0.5,
            carbon: 120.0,
            exports: None,
            imports: None,
            trade_balance: None,
        }
    }

    fn scenario_dataset() -> Dataset {
        let mut india = record("India", 2020, 2000.0, 6.5);
        india.exports = Some(300.0);
        india.imports = Some(350.0);
        india.trade_balance = Some(-50.0);

        let mut usa = record("USA", 2020, 20000.0, 2.1);
        usa.region = "Americas".to_string();
        usa.exports = Some(1500.0);
        usa.imports = Some(2000.0);
        usa.trade_balance = Some(-500.0);

        Dataset::from_records(vec![india, usa])
    }

    #[test]
    fn kpis_cover_exactly_the_filtered_rows() {
        let ds = scenario_dataset();
        let spec = FilterSpec::default_spec(&ds);

        let all = summarize(&ds, &apply(&ds, &spec));
        assert_eq!(all.total_gdp, 22000.0);
        assert_eq!(all.total_trade_balance, -550.0);
        assert_eq!(all.samples, 2);
        assert!((all.mean_growth - 4.3).abs() < 1e-12);

        let india_only = spec.with_countries(std::iter::once("India".to_string()).collect());
        let kpis = summarize(&ds, &apply(&ds, &india_only));
        assert_eq!(kpis.total_gdp, 2000.0);
        assert_eq!(kpis.total_trade_balance, -50.0);
        assert_eq!(kpis.samples, 1);
    }

    #[test]
    fn empty_view_reports_zero_sums_and_nan_mean() {
        let ds = scenario_dataset();
        let spec = FilterSpec::default_spec(&ds).with_countries(BTreeSet::new());
        let kpis = summarize(&ds, &apply(&ds, &spec));

        assert_eq!(kpis.samples, 0);
        assert_eq!(kpis.total_gdp, 0.0);
        assert_eq!(kpis.total_trade_balance, 0.0);
        assert!(kpis.mean_growth.is_nan());
    }

    #[test]
    fn self_correlation_is_exactly_one() {
        let ds = scenario_dataset();
        let view = apply(&ds, &FilterSpec::default_spec(&ds));
        let matrix = correlate(&ds, &view);

        let gdp_idx = matrix
            .fields()
            .iter()
            .position(|&f| f == NumericField::Gdp)
            .unwrap();
        assert_eq!(matrix.get(gdp_idx, gdp_idx), 1.0);
    }

    #[test]
    fn linearly_dependent_fields_correlate_perfectly() {
        // energy = gdp * 0.2 in the fixture.
        let ds = Dataset::from_records(vec![
            record("A", 2020, 1000.0, 1.0),
            record("B", 2020, 2000.0, 2.0),
            record("C", 2020, 3000.0, 3.0),
        ]);
        let view = apply(&ds, &FilterSpec::default_spec(&ds));
        let matrix = correlate(&ds, &view);

        let fields = matrix.fields();
        let gdp = fields.iter().position(|&f| f == NumericField::Gdp).unwrap();
        let energy = fields.iter().position(|&f| f == NumericField::Energy).unwrap();
        assert!((matrix.get(gdp, energy) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_cells_are_nan() {
        let ds = scenario_dataset();

        // Single row: no pair has 2 complete observations.
        let spec =
            FilterSpec::default_spec(&ds).with_countries(std::iter::once("India".to_string()).collect());
        let matrix = correlate(&ds, &apply(&ds, &spec));
        let gdp = matrix.fields().iter().position(|&f| f == NumericField::Gdp).unwrap();
        assert!(matrix.get(gdp, gdp).is_nan());

        // Constant column (digital adoption is 0.5 everywhere): zero variance.
        let full = correlate(&ds, &apply(&ds, &FilterSpec::default_spec(&ds)));
        let dig = full
            .fields()
            .iter()
            .position(|&f| f == NumericField::DigitalAdoption)
            .unwrap();
        assert!(full.get(dig, gdp).is_nan());
        assert!(full.get(dig, dig).is_nan());
    }

    #[test]
    fn missing_trade_rows_only_shrink_their_pairs() {
        let mut with_trade = record("A", 2020, 1000.0, 1.0);
        with_trade.exports = Some(100.0);
        with_trade.imports = Some(80.0);
        with_trade.trade_balance = Some(20.0);
        let mut with_trade2 = record("B", 2020, 2000.0, 2.0);
        with_trade2.exports = Some(300.0);
        with_trade2.imports = Some(100.0);
        with_trade2.trade_balance = Some(200.0);

        let ds = Dataset::from_records(vec![
            with_trade,
            with_trade2,
            record("C", 2020, 3000.0, 3.0), // no trade columns
        ]);
        let view = apply(&ds, &FilterSpec::default_spec(&ds));
        let matrix = correlate(&ds, &view);

        let fields = matrix.fields();
        let gdp = fields.iter().position(|&f| f == NumericField::Gdp).unwrap();
        let tb = fields.iter().position(|&f| f == NumericField::TradeBalance).unwrap();

        // Two complete (gdp, trade_balance) pairs remain: still defined.
        assert!((matrix.get(gdp, tb) - 1.0).abs() < 1e-12);
        // And the full-column pair is untouched by the missing row.
        assert_eq!(matrix.get(gdp, gdp), 1.0);
    }
}
