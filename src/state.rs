use std::collections::BTreeSet;
use std::path::Path;

use crate::color::CountryColors;
use crate::data::aggregate::{correlate, summarize, CorrelationMatrix, KpiSet};
use crate::data::cache::DatasetCache;
use crate::data::filter::{apply, FilterSpec, FilteredView};
use crate::data::model::{Dataset, NumericField};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Industry,
    Correlation,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Industry, Tab::Correlation];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview KPIs",
            Tab::Industry => "Industry Barometer",
            Tab::Correlation => "Correlation Modeling",
        }
    }
}

/// The full UI state, independent of rendering.
///
/// The pipeline is explicit: every interaction that changes the spec runs
/// `apply` → `summarize` → `correlate` once, via [`AppState::refilter`].
/// Nothing is read from ambient globals.
pub struct AppState {
    /// Parse-once dataset cache (content-hash keyed).
    pub cache: DatasetCache,

    /// Current filter selections (None until a dataset is loaded).
    pub spec: Option<FilterSpec>,

    /// Rows passing the current spec (cached between interactions).
    pub view: Option<FilteredView>,

    /// Headline metrics over the current view.
    pub kpis: Option<KpiSet>,

    /// Pearson matrix over the current view.
    pub correlation: Option<CorrelationMatrix>,

    /// Stable per-country chart colours.
    pub colors: Option<CountryColors>,

    /// Active central tab.
    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: DatasetCache::new(),
            spec: None,
            view: None,
            kpis: None,
            correlation: None,
            colors: None,
            tab: Tab::Overview,
            status_message: None,
        }
    }
}

impl AppState {
    /// The loaded dataset, if any.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.cache.dataset()
    }

    /// Load (or re-load) a file through the cache. On success the filters
    /// reset to the identity spec; on failure the previous dataset stays and
    /// the error becomes the status line.
    pub fn open_path(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} records, {} countries from {}",
                    dataset.len(),
                    dataset.countries.len(),
                    path.display()
                );
                self.spec = Some(FilterSpec::default_spec(dataset));
                self.colors = Some(CountryColors::new(&dataset.countries));
                self.status_message = None;
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        }
        let (hits, misses) = self.cache.stats();
        log::debug!("dataset cache: {hits} hits, {misses} misses");
        self.refilter();
    }

    /// Drop the dataset and every derived value.
    pub fn close_dataset(&mut self) {
        self.cache.clear();
        self.spec = None;
        self.colors = None;
        self.status_message = None;
        self.refilter();
    }

    /// Run the pipeline once: filter, then aggregate. Recomputes the cached
    /// view, KPI set, and correlation matrix from the current spec.
    pub fn refilter(&mut self) {
        let (Some(dataset), Some(spec)) = (self.cache.dataset(), self.spec.as_ref()) else {
            self.view = None;
            self.kpis = None;
            self.correlation = None;
            return;
        };

        let view = apply(dataset, spec);
        self.kpis = Some(summarize(dataset, &view));
        self.correlation = Some(correlate(dataset, &view));
        self.view = Some(view);
    }

    /// Replace the year selection and rerun the pipeline.
    pub fn set_years(&mut self, years: BTreeSet<i32>) {
        if let Some(spec) = self.spec.take() {
            self.spec = Some(spec.with_years(years));
            self.refilter();
        }
    }

    /// Replace the region selection and rerun the pipeline.
    pub fn set_regions(&mut self, regions: BTreeSet<String>) {
        if let Some(spec) = self.spec.take() {
            self.spec = Some(spec.with_regions(regions));
            self.refilter();
        }
    }

    /// Replace the country selection and rerun the pipeline.
    pub fn set_countries(&mut self, countries: BTreeSet<String>) {
        if let Some(spec) = self.spec.take() {
            self.spec = Some(spec.with_countries(countries));
            self.refilter();
        }
    }

    /// Replace one numeric range and rerun the pipeline. The widgets keep
    /// `lo <= hi`, so a rejected range here is a programming error: it is
    /// logged and the previous spec stays in force.
    pub fn set_range(&mut self, field: NumericField, lo: f64, hi: f64) {
        let Some(spec) = self.spec.take() else { return };
        match spec.with_range(field, lo, hi) {
            Ok(next) => {
                self.spec = Some(next);
                self.refilter();
            }
            Err(e) => {
                log::error!("rejected range update: {e}");
                self.spec = Some(spec);
            }
        }
    }

    /// Reset all filters to the identity spec.
    pub fn reset_filters(&mut self) {
        if let Some(dataset) = self.cache.dataset() {
            self.spec = Some(FilterSpec::default_spec(dataset));
        }
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Country,Region,Year,GDP (Billion USD),Economic Growth (%),Inflation (%),Unemployment Rate (%),Population (Millions),Manufacturing Output (Million Units),Energy Consumption (GWh),Digital Adoption Index (0-1),Carbon Emission (MT),Export Revenue (Billion USD),Import Cost (Billion USD)
India,Asia,2020,2000,6.5,5.0,7.0,1380,420,1500,0.45,2400,300,350
USA,Americas,2021,20000,2.1,1.8,4.0,331,600,4000,0.85,5000,1500,2000
";

    fn loaded_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, CSV).expect("write");

        let mut state = AppState::default();
        state.open_path(&path);
        (dir, state)
    }

    #[test]
    fn open_path_initialises_the_pipeline() {
        let (_dir, state) = loaded_state();

        assert!(state.status_message.is_none());
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(2));
        assert_eq!(state.kpis.as_ref().map(|k| k.samples), Some(2));
        assert!(state.correlation.is_some());
    }

    #[test]
    fn selection_changes_rerun_the_pipeline() {
        let (_dir, mut state) = loaded_state();

        state.set_countries(std::iter::once("India".to_string()).collect());
        assert_eq!(state.kpis.as_ref().map(|k| k.total_gdp), Some(2000.0));

        state.set_years(std::iter::once(2021).collect());
        // India ∧ 2021 is empty: conjunction across fields.
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(0));

        state.reset_filters();
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(2));
    }

    #[test]
    fn close_drops_everything_derived() {
        let (_dir, mut state) = loaded_state();

        state.close_dataset();
        assert!(state.dataset().is_none());
        assert!(state.spec.is_none());
        assert!(state.view.is_none());
        assert!(state.kpis.is_none());
        assert!(state.correlation.is_none());
    }

    #[test]
    fn load_failure_keeps_previous_dataset_and_sets_status() {
        let (_dir, mut state) = loaded_state();

        state.open_path(Path::new("/nonexistent/data.csv"));
        assert!(state.status_message.is_some());
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(2));
    }
}
