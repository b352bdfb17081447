use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotPoint, Text, uniform_grid_spacer};

use crate::color::CategoryColors;
use crate::data::series::{ComparisonSeries, MetricComparison};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Benchmark charts (central panel)
// ---------------------------------------------------------------------------

/// Render the three benchmark charts side by side.
pub fn benchmark_charts(ui: &mut Ui, state: &AppState) {
    let comparisons = match &state.comparisons {
        Some(c) => c,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Enter your fund details and press Submit");
            });
            return;
        }
    };

    ui.columns(comparisons.len().max(1), |columns: &mut [Ui]| {
        for (ui, comparison) in columns.iter_mut().zip(comparisons) {
            chart_cell(ui, comparison, &state.colors);
        }
    });
}

fn chart_cell(ui: &mut Ui, comparison: &MetricComparison, colors: &CategoryColors) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(comparison.title());
    });
    match &comparison.outcome {
        Ok(series) => {
            let fund = series.fund_point();
            let name = if fund.label.is_empty() {
                "Your fund"
            } else {
                fund.label.as_str()
            };
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("{name}: {:.2}", fund.value))
                        .color(colors.color_for(fund.category)),
                );
            });
            benchmark_chart(ui, series, colors);
        }
        Err(e) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new(format!("No benchmark: {e}")).color(Color32::RED));
            });
        }
    }
}

/// One bar chart: three benchmark bars and the fund's bar.
fn benchmark_chart(ui: &mut Ui, series: &ComparisonSeries, colors: &CategoryColors) {
    let labels: Vec<String> = series.labels().map(str::to_string).collect();

    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Bar::new(i as f64, p.value)
                .name(&p.label)
                .fill(colors.color_for(p.category))
                .width(0.8)
        })
        .collect();
    let chart = BarChart::new(bars)
        .name(series.metric.display_name())
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}: {:.2}", bar.name, bar.value)
        }));

    let x_labels = labels.clone();
    Plot::new(format!("chart_{}", series.metric.key()))
        .height(ui.available_height().clamp(240.0, 480.0))
        .x_axis_label("Categories")
        .y_axis_label(series.metric.display_name())
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_tick(&x_labels, mark.value)
        })
        .show_grid([false, true])
        .include_y(0.0)
        .include_x(-0.6)
        .include_x(labels.len() as f64 - 0.4)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            for (i, p) in series.points.iter().enumerate() {
                let anchor = if p.value < 0.0 {
                    Align2::CENTER_TOP
                } else {
                    Align2::CENTER_BOTTOM
                };
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(i as f64, p.value),
                        RichText::new(format!("{:.2}", p.value)).strong(),
                    )
                    .anchor(anchor),
                );
            }
        });
}

/// Category label for an x-axis grid mark; blank between bars.
fn category_tick(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
