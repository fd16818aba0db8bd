use chrono::NaiveDate;
use serde::Serialize;

use crate::color::chart_color;
use crate::data::filter::{require_rows, FilterOptions, RecordQuery};
use crate::data::model::{AvocadoType, PriceRecord};
use crate::data::series::{ChartSeries, DateRange, SeriesPoint};

// ---------------------------------------------------------------------------
// Serializable view model
// ---------------------------------------------------------------------------
//
// Everything a renderer needs to draw the dashboard.  The egui front end in
// `ui` draws it; `--print-view` dumps it as JSON.

pub const WINDOW_TITLE: &str = "Avocado Analytics: Understand Your Avocados!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub header: Header,
    pub menu: Menu,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub emoji: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            emoji: "🥑",
            title: "Avocado Analytics",
            description: "Analyze the behavior of avocado prices and the number of avocados \
                          sold in the US between 2015 and 2018",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    pub region: Dropdown<String>,
    #[serde(rename = "type")]
    pub kind: Dropdown<AvocadoType>,
    /// Absent when the region/type pair has no rows.
    pub date_range: Option<DatePickerRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown<T> {
    pub id: &'static str,
    pub label: &'static str,
    pub options: Vec<T>,
    pub value: T,
    pub clearable: bool,
    pub searchable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePickerRange {
    pub id: &'static str,
    pub label: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_date_allowed: NaiveDate,
    pub max_date_allowed: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Charts { charts: Vec<ChartSpec> },
    /// Shown instead of blank charts.
    Empty { message: String },
}

/// One line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub value_prefix: Option<&'static str>,
    /// Decimals shown in hover labels and ticks.
    pub decimals: usize,
    pub color: String,
    /// Axes cannot be zoomed or panned.
    pub fixed_range: bool,
}

impl ChartSpec {
    fn line(id: &'static str, title: &'static str, points: &[SeriesPoint], index: usize) -> Self {
        ChartSpec {
            id,
            title,
            x: points.iter().map(|p| p.date).collect(),
            y: points.iter().map(|p| p.value).collect(),
            value_prefix: None,
            decimals: 0,
            color: chart_color(index),
            fixed_range: true,
        }
    }

    /// Format a y value the way hover labels show it, e.g. `$1.22`.
    pub fn format_value(&self, value: f64) -> String {
        let prefix = self.value_prefix.unwrap_or("");
        format!("{prefix}{value:.prec$}", prec = self.decimals)
    }
}

/// Everything the view is built from.
pub struct ViewInputs<'a> {
    pub options: &'a FilterOptions,
    pub query: &'a RecordQuery,
    /// Rows for the selected region and type, before date slicing.
    pub filtered: &'a [PriceRecord],
    pub bounds: Option<DateRange>,
    pub range: Option<DateRange>,
    pub series: &'a ChartSeries,
}

impl DashboardView {
    pub fn build(inputs: &ViewInputs<'_>) -> Self {
        let menu = Menu {
            region: Dropdown {
                id: "region-filter",
                label: "Region",
                options: inputs.options.regions.clone(),
                value: inputs.query.region.clone(),
                clearable: false,
                searchable: true,
            },
            kind: Dropdown {
                id: "type-filter",
                label: "Type",
                options: inputs.options.kinds.clone(),
                value: inputs.query.kind,
                clearable: false,
                searchable: false,
            },
            date_range: match (inputs.bounds, inputs.range) {
                (Some(bounds), Some(range)) => Some(DatePickerRange {
                    id: "date-range",
                    label: "Date Range",
                    start_date: range.start,
                    end_date: range.end,
                    min_date_allowed: bounds.start,
                    max_date_allowed: bounds.end,
                }),
                _ => None,
            },
        };

        DashboardView {
            title: WINDOW_TITLE,
            header: Header::default(),
            menu,
            content: build_content(inputs),
        }
    }
}

fn build_content(inputs: &ViewInputs<'_>) -> Content {
    if let Err(err) = require_rows(inputs.filtered, inputs.query) {
        return Content::Empty {
            message: format!("No data available: {err}"),
        };
    }
    if inputs.series.is_empty() {
        let message = match inputs.range {
            Some(r) => format!("No data between {} and {}", r.start, r.end),
            None => "No data in the selected date range".to_string(),
        };
        return Content::Empty { message };
    }

    let mut price = ChartSpec::line("price-chart", "Average Price Of Avocados", &inputs.series.price, 0);
    price.value_prefix = Some("$");
    price.decimals = 2;

    let volume = ChartSpec::line("volume-chart", "Avocado Sold", &inputs.series.volume, 1);

    Content::Charts {
        charts: vec![price, volume],
    }
}
