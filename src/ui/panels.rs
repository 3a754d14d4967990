use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::NumericField;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Pending widget edits, applied to the state after rendering so the panel
/// never mutates the spec mid-frame.
#[derive(Default)]
struct PendingEdits {
    years: Option<BTreeSet<i32>>,
    regions: Option<BTreeSet<String>>,
    countries: Option<BTreeSet<String>>,
    ranges: Vec<(NumericField, f64, f64)>,
    reset: bool,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(spec) = state.spec.as_ref() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Snapshot what the widgets need so edits can be applied afterwards.
    let all_years = dataset.years.clone();
    let all_regions = dataset.regions.clone();
    let all_countries = dataset.countries.clone();
    let sel_years = spec.years.clone();
    let sel_regions = spec.regions.clone();
    let sel_countries = spec.countries.clone();
    let sliders: Vec<(NumericField, (f64, f64), (f64, f64))> = NumericField::FILTERABLE
        .iter()
        .filter_map(|&field| {
            let range = spec.ranges.get(&field)?;
            let domain = if field == NumericField::DigitalAdoption {
                (0.0, 1.0)
            } else {
                *dataset.extents.get(&field)?
            };
            Some((field, domain, (range.lo(), range.hi())))
        })
        .collect();

    let mut edits = PendingEdits::default();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if ui.button("Reset all filters").clicked() {
                edits.reset = true;
            }
            ui.separator();

            ui.strong("Selection");
            edits.years = categorical_section(ui, "Year", &all_years, &sel_years);
            edits.regions = categorical_section(ui, "Region", &all_regions, &sel_regions);
            edits.countries = categorical_section(ui, "Country", &all_countries, &sel_countries);

            ui.separator();
            ui.strong("Ranges");
            for &(field, domain, current) in &sliders {
                if let Some((lo, hi)) = range_section(ui, field, domain, current) {
                    edits.ranges.push((field, lo, hi));
                }
            }
        });

    // Apply collected edits; each one reruns the pipeline exactly once.
    if edits.reset {
        state.reset_filters();
        return;
    }
    if let Some(years) = edits.years {
        state.set_years(years);
    }
    if let Some(regions) = edits.regions {
        state.set_regions(regions);
    }
    if let Some(countries) = edits.countries {
        state.set_countries(countries);
    }
    for (field, lo, hi) in edits.ranges {
        state.set_range(field, lo, hi);
    }
}

/// Checkbox list for one categorical column. Returns the new selection when
/// the user changed anything.
fn categorical_section<T: Ord + Clone + ToString>(
    ui: &mut Ui,
    title: &str,
    all: &BTreeSet<T>,
    selected: &BTreeSet<T>,
) -> Option<BTreeSet<T>> {
    let mut next = selected.clone();
    let mut changed = false;

    let header = format!("{title}  ({}/{})", selected.len(), all.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    next = all.clone();
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    next.clear();
                    changed = true;
                }
            });

            for value in all {
                let mut checked = next.contains(value);
                if ui.checkbox(&mut checked, value.to_string()).changed() {
                    if checked {
                        next.insert(value.clone());
                    } else {
                        next.remove(value);
                    }
                    changed = true;
                }
            }
        });

    changed.then_some(next)
}

/// Min/max sliders for one numeric field. The max slider's floor is the min
/// slider's value (and vice versa), so `lo <= hi` holds by construction.
fn range_section(
    ui: &mut Ui,
    field: NumericField,
    domain: (f64, f64),
    current: (f64, f64),
) -> Option<(f64, f64)> {
    let (mut lo, mut hi) = current;
    let mut changed = false;

    egui::CollapsingHeader::new(field.short_label())
        .id_salt(field.label())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(field.label()).weak().small());
            changed |= ui
                .add(egui::Slider::new(&mut lo, domain.0..=hi).text("min"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut hi, lo..=domain.1).text("max"))
                .changed();
        });

    changed.then_some((lo, hi))
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Close").clicked() {
                state.close_dataset();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = state
            .cache
            .source_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            ui.label(RichText::new(name).weak());
            ui.separator();
        }

        if let (Some(dataset), Some(view)) = (state.dataset(), state.view.as_ref()) {
            ui.label(format!(
                "{} records loaded, {} matching",
                dataset.len(),
                view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open indicator data")
        .add_filter("Supported files", &["xlsx", "xls", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
