use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::series::DateRange;
use crate::state::AppState;
use crate::view::Header;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, header: &Header) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(header.emoji).size(40.0));
        ui.heading(RichText::new(header.title).strong());
        ui.label(RichText::new(header.description).weak());
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the region / type / date-range controls.
///
/// `region_search` holds the text typed into the region dropdown's search box.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, region_search: &mut String) {
    // Clone what we need so we can mutate state inside the closures.
    let view = state.view.clone();
    header(ui, &view.header);

    ui.heading("Filters");
    ui.separator();

    // ---- Region selector ----
    let region = &view.menu.region;
    ui.strong(region.label);
    egui::ComboBox::from_id_salt(region.id)
        .selected_text(region.value.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if region.searchable {
                ui.text_edit_singleline(region_search);
            }
            let needle = region_search.to_lowercase();
            for option in &region.options {
                if !needle.is_empty() && !option.to_lowercase().contains(&needle) {
                    continue;
                }
                if ui
                    .selectable_label(region.value == *option, option.as_str())
                    .clicked()
                {
                    state.set_region(option);
                }
            }
        });
    ui.add_space(6.0);

    // ---- Type selector ----
    let kind = &view.menu.kind;
    ui.strong(kind.label);
    egui::ComboBox::from_id_salt(kind.id)
        .selected_text(kind.value.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &kind.options {
                if ui
                    .selectable_label(kind.value == *option, option.to_string())
                    .clicked()
                {
                    state.set_kind(*option);
                }
            }
        });
    ui.add_space(6.0);

    // ---- Date range ----
    let Some(picker) = &view.menu.date_range else {
        ui.label(RichText::new("No dates for this selection").weak());
        return;
    };
    ui.strong(picker.label);
    let mut start = picker.start_date;
    let mut end = picker.end_date;
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .add(DatePickerButton::new(&mut start).id_salt("date-range-start"))
            .changed();
        ui.label("→");
        changed |= ui
            .add(DatePickerButton::new(&mut end).id_salt("date-range-end"))
            .changed();
    });
    ui.label(
        RichText::new(format!(
            "{} … {}",
            picker.min_date_allowed, picker.max_date_allowed
        ))
        .small()
        .weak(),
    );
    if changed {
        state.set_date_range(DateRange::new(start, end));
    }
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
        });

        ui.separator();

        ui.label(format!(
            "{} records loaded from {}, {} shown",
            state.dataset.len(),
            state.dataset.source().display(),
            state.series.len()
        ));

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
        .set_title("Open avocado price data")
        .add_filter("Supported files", &["csv", "tsv", "tab", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "tab"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are already logged and shown in the status line.
        if state.open(&path).is_ok() {
            log::info!(
                "Showing {} {} rows from {}",
                state.query.region,
                state.query.kind,
                path.display()
            );
        }
    }
}
