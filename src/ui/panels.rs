use eframe::egui::{self, Color32, DragValue, RichText, Ui};

use crate::data::model::Metric;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – fund inputs
// ---------------------------------------------------------------------------

/// Render the left input panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered, optional) ----
    if let Some(logo) = state.config.logo.as_ref().filter(|p| p.is_file()) {
        let uri = format!("file://{}", logo.display());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0)
                    .rounding(4.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Fund Details");
    ui.label(
        RichText::new("Input your VC fund details to compare against industry benchmarks.")
            .weak(),
    );
    ui.separator();

    egui::CollapsingHeader::new(RichText::new("Fund Details").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Enter Fund Name");
            ui.text_edit_singleline(&mut state.input.name);

            ui.label("Select Vintage");
            egui::ComboBox::from_id_salt("vintage")
                .selected_text(state.input.vintage.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for &year in &state.config.vintages {
                        ui.selectable_value(&mut state.input.vintage, year, year.to_string());
                    }
                });

            ui.label("Fund Manager Location");
            egui::ComboBox::from_id_salt("cohort")
                .selected_text(state.input.cohort.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for cohort in state.repository.cohorts() {
                        ui.selectable_value(
                            &mut state.input.cohort,
                            cohort.id.clone(),
                            cohort.id.as_str(),
                        );
                    }
                });
        });

    egui::CollapsingHeader::new(RichText::new("Performance Metrics").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                ui.label(metric.display_name());
                let value = state.input.value_for_mut(metric);
                let mut drag = DragValue::new(value).speed(0.01).fixed_decimals(2);
                if !metric.allows_negative() {
                    drag = drag.range(0.0..=f64::INFINITY);
                }
                ui.add(drag);
            }
        });

    ui.add_space(8.0);
    if ui.button("Submit").clicked() {
        state.submit();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open workbook…").clicked() {
                open_workbook_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(
            RichText::new(format!("Workbook: {}", state.repository.workbook().display())).weak(),
        );

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

/// Data-source summary under the charts.
pub fn footer(ui: &mut Ui, state: &AppState) {
    let footer = &state.config.footer;
    ui.separator();
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!(
                "Data Source: {} | Vintage Years Covered: {} | Sector: {} | Geography: {}",
                footer.data_source, footer.vintages_covered, footer.sector, footer.geography
            ))
            .small()
            .color(Color32::GRAY),
        );
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_workbook_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open benchmark workbook")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "json", "csv", "parquet", "pq"],
        )
        .add_filter("Spreadsheet workbook", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("JSON workbook", &["json"])
        .add_filter("CSV sheet", &["csv"])
        .add_filter("Parquet sheet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.replace_workbook(path);
    }
}
