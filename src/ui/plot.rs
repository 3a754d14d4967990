use std::collections::BTreeMap;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::data::aggregate::CorrelationMatrix;
use crate::data::model::{Dataset, NumericField};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Central panel – tabbed chart views
// ---------------------------------------------------------------------------

/// Render the active tab of the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if state.dataset().is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data file to start  (File → Open…)");
        });
        return;
    }

    match state.tab {
        Tab::Overview => overview_tab(ui, state),
        Tab::Industry => industry_tab(ui, state),
        Tab::Correlation => correlation_tab(ui, state),
    }
}

// ---------------------------------------------------------------------------
// Overview: KPI row + GDP trends
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(view), Some(kpis)) =
        (state.dataset(), state.view.as_ref(), state.kpis.as_ref())
    else {
        return;
    };

    ui.columns(4, |cols: &mut [Ui]| {
        kpi_metric(&mut cols[0], "Total GDP", format!("${:.1}B", kpis.total_gdp));
        let growth = if kpis.mean_growth.is_nan() {
            "–".to_string()
        } else {
            format!("{:.2}%", kpis.mean_growth)
        };
        kpi_metric(&mut cols[1], "Avg Growth", growth);
        let trade = if dataset.has_trade_data() {
            format!("${:.1}B", kpis.total_trade_balance)
        } else {
            "–".to_string()
        };
        kpi_metric(&mut cols[2], "Trade Balance", trade);
        kpi_metric(&mut cols[3], "Samples Found", kpis.samples.to_string());
    });
    ui.separator();

    // Group the visible rows into one (year, gdp) series per country.
    let mut series: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
    for rec in view.records(dataset) {
        series.entry(&rec.country).or_default().push((rec.year, rec.gdp));
    }
    for points in series.values_mut() {
        points.sort_by_key(|&(year, _)| year);
    }

    Plot::new("gdp_trends")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("GDP (Billion USD)")
        .show(ui, |plot_ui| {
            for (country, points) in &series {
                let color = country_color(state, country);
                let plot_points: PlotPoints = points
                    .iter()
                    .map(|&(year, gdp)| [year as f64, gdp])
                    .collect();
                plot_ui.line(Line::new(plot_points).name(*country).color(color).width(1.5));
            }
        });
}

fn kpi_metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

// ---------------------------------------------------------------------------
// Industry: environmental scatter + manufacturing bars
// ---------------------------------------------------------------------------

fn industry_tab(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(view)) = (state.dataset(), state.view.as_ref()) else {
        return;
    };

    let max_gdp = view
        .records(dataset)
        .map(|r| r.gdp)
        .fold(f64::NEG_INFINITY, f64::max);

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(RichText::new("Environmental Impact vs Economic Scale").strong());
        Plot::new("energy_carbon")
            .legend(Legend::default())
            .x_axis_label("Energy Consumption (GWh)")
            .y_axis_label("Carbon Emission (MT)")
            .show(&mut cols[0], |plot_ui| {
                for rec in view.records(dataset) {
                    // Marker area tracks GDP share.
                    let radius = if max_gdp > 0.0 {
                        2.0 + 8.0 * (rec.gdp / max_gdp).sqrt() as f32
                    } else {
                        3.0
                    };
                    let marker = Points::new(PlotPoints::from(vec![[rec.energy, rec.carbon]]))
                        .name(&rec.country)
                        .color(country_color(state, &rec.country))
                        .radius(radius);
                    plot_ui.points(marker);
                }
            });

        cols[1].label(RichText::new("Industrial Power Rank").strong());
        // Manufacturing output summed per country over the visible rows.
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for rec in view.records(dataset) {
            *totals.entry(&rec.country).or_default() += rec.manufacturing;
        }

        Plot::new("manufacturing_rank")
            .legend(Legend::default())
            .y_axis_label("Manufacturing Output (Million Units)")
            .show_x(false)
            .show(&mut cols[1], |plot_ui| {
                for (i, (country, total)) in totals.iter().enumerate() {
                    let bar = Bar::new(i as f64, *total).width(0.7);
                    plot_ui.bar_chart(
                        BarChart::new(vec![bar])
                            .name(*country)
                            .color(country_color(state, country)),
                    );
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Correlation: Pearson heatmap + data table
// ---------------------------------------------------------------------------

fn correlation_tab(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(view), Some(matrix)) = (
        state.dataset(),
        state.view.as_ref(),
        state.correlation.as_ref(),
    ) else {
        return;
    };

    ui.label(RichText::new("Statistical Correlation (Pearson Coeff)").strong());
    correlation_heatmap(ui, matrix);
    ui.separator();

    data_table(ui, dataset, view.indices());
}

/// Paint the matrix as a coloured grid with a label gutter. Undefined cells
/// (NaN) are grey.
fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.dim();
    if n == 0 {
        return;
    }

    let gutter = 92.0_f32;
    let available = ui.available_width() - gutter;
    let cell = (available / n as f32).clamp(18.0, 46.0);
    let size = Vec2::new(gutter + cell * n as f32, gutter + cell * n as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + Vec2::new(gutter, gutter);

    let label_font = FontId::proportional(10.0);
    let value_font = FontId::proportional(9.0);
    let text_color = ui.visuals().text_color();

    for (i, field) in matrix.fields().iter().enumerate() {
        // Row label (right-aligned against the grid) and column label.
        painter.text(
            egui::pos2(origin.x - 4.0, origin.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            field.short_label(),
            label_font.clone(),
            text_color,
        );
        painter.text(
            egui::pos2(origin.x + (i as f32 + 0.5) * cell, origin.y - 4.0),
            Align2::CENTER_BOTTOM,
            field.short_label(),
            label_font.clone(),
            text_color,
        );
    }

    for row in 0..n {
        for col in 0..n {
            let value = matrix.get(row, col);
            let rect = egui::Rect::from_min_size(
                origin + Vec2::new(col as f32 * cell, row as f32 * cell),
                Vec2::splat(cell),
            );
            painter.rect_filled(rect.shrink(0.5), 2.0, crate::color::correlation_color(value));

            if cell >= 26.0 && !value.is_nan() {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("{value:.2}"),
                    value_font.clone(),
                    Color32::BLACK,
                );
            }
        }
    }
}

/// Scrollable table of the filtered rows.
fn data_table(ui: &mut Ui, dataset: &Dataset, indices: &[usize]) {
    use egui_extras::{Column, TableBuilder};

    let columns = 3 + NumericField::ALL.len();

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true), columns)
        .header(20.0, |mut header| {
            for title in ["Country", "Region", "Year"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            for field in NumericField::ALL {
                header.col(|ui| {
                    ui.strong(field.short_label());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let rec = &dataset.records[indices[row.index()]];
                row.col(|ui| {
                    ui.label(&rec.country);
                });
                row.col(|ui| {
                    ui.label(&rec.region);
                });
                row.col(|ui| {
                    ui.label(rec.year.to_string());
                });
                for field in NumericField::ALL {
                    row.col(|ui| {
                        match rec.numeric(field) {
                            Some(v) => ui.label(format!("{v:.2}")),
                            None => ui.label(RichText::new("–").weak()),
                        };
                    });
                }
            });
        });
}

fn country_color(state: &AppState, country: &str) -> Color32 {
    state
        .colors
        .as_ref()
        .map(|c| c.color_for(country))
        .unwrap_or(Color32::LIGHT_BLUE)
}
