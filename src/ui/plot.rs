use chrono::{Datelike, NaiveDate};
use eframe::egui::{RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::color::to_color32;
use crate::view::{ChartSpec, Content};

// ---------------------------------------------------------------------------
// Time-series charts (central panel)
// ---------------------------------------------------------------------------

/// Render every chart of `content`, stacked vertically, or its empty state.
pub fn charts(ui: &mut Ui, content: &Content) {
    let charts = match content {
        Content::Charts { charts } => charts,
        Content::Empty { message } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(message);
            });
            return;
        }
    };

    let spacing = ui.spacing().item_spacing.y;
    let per_chart = (ui.available_height() / charts.len().max(1) as f32 - spacing * 3.0).max(120.0);
    for spec in charts {
        ui.label(RichText::new(spec.title).strong().size(16.0));
        time_series(ui, spec, per_chart);
        ui.add_space(spacing);
    }
}

fn time_series(ui: &mut Ui, spec: &ChartSpec, height: f32) {
    let points: PlotPoints = spec
        .x
        .iter()
        .zip(spec.y.iter())
        .map(|(date, &value)| [day_number(*date), value])
        .collect();

    let tick_spec = spec.clone();
    let hover_spec = spec.clone();
    let interactive = !spec.fixed_range;

    Plot::new(spec.id)
        .height(height)
        .allow_boxed_zoom(interactive)
        .allow_drag(interactive)
        .allow_scroll(interactive)
        .allow_zoom(interactive)
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .y_axis_formatter(move |mark, _range| tick_spec.format_value(mark.value))
        .label_formatter(move |_name, point| {
            format!("{}\n{}", format_day(point.x), hover_spec.format_value(point.y))
        })
        .show(ui, |plot_ui| {
            let line = Line::new(points)
                .name(spec.title)
                .color(to_color32(&spec.color))
                .width(2.0);
            plot_ui.line(line);
        });
}

/// Dates are plotted as days since 1 January of year 1.
fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
