use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::filter::{filter_records, FilterOptions, RecordQuery};
use crate::data::loader::load_file;
use crate::data::model::{AvocadoType, PriceDataset, PriceRecord};
use crate::data::series::{in_range, project, ChartSeries, DateRange};
use crate::error::DataError;
use crate::view::{DashboardView, ViewInputs};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, unfiltered.
    pub dataset: PriceDataset,

    /// Region and type options derived from `dataset`.
    pub options: FilterOptions,

    /// Current region/type selection.
    pub query: RecordQuery,

    /// Date range shown; `None` while `filtered` is empty.
    pub range: Option<DateRange>,

    /// Rows for `query`, sorted by date (cached).
    pub filtered: Vec<PriceRecord>,

    /// First and last date of `filtered`.
    pub bounds: Option<DateRange>,

    /// Series projected from `filtered` within `range`.
    pub series: ChartSeries,

    /// View model handed to the renderer.
    pub view: DashboardView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: PriceDataset, config: &DashboardConfig) -> Self {
        if dataset.is_empty() {
            log::warn!("{} contains no records", dataset.source().display());
        }
        let options = FilterOptions::derive(&dataset.records);
        let query = initial_query(&options, &config.region, config.kind);
        let mut state = Self {
            filtered: Vec::new(),
            bounds: None,
            range: None,
            series: ChartSeries::default(),
            view: empty_view(&options, &query),
            dataset,
            options,
            query,
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Replace the dataset, keeping the selection when it still exists.
    pub fn set_dataset(&mut self, dataset: PriceDataset) {
        self.options = FilterOptions::derive(&dataset.records);
        self.query = initial_query(&self.options, &self.query.region, self.query.kind);
        self.dataset = dataset;
        self.status_message = None;
        self.refilter();
    }

    /// Load a file and make it the current dataset.  On failure the current
    /// dataset stays and the error is shown in the status line.
    pub fn open(&mut self, path: &Path) -> Result<(), DataError> {
        match load_file(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    pub fn set_region(&mut self, region: &str) {
        if self.query.region != region {
            self.query.region = region.to_string();
            self.refilter();
        }
    }

    pub fn set_kind(&mut self, kind: AvocadoType) {
        if self.query.kind != kind {
            self.query.kind = kind;
            self.refilter();
        }
    }

    /// Change the date range, clamped to the dates of the filtered rows.
    pub fn set_date_range(&mut self, range: DateRange) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let clamped = range.clamp_to(&bounds);
        if self.range != Some(clamped) {
            self.range = Some(clamped);
            self.reproject();
        }
    }

    /// Recompute the filtered rows after a region/type change.  The date
    /// range is reset to the full span of the new rows.
    pub fn refilter(&mut self) {
        self.filtered = filter_records(&self.dataset.records, &self.query);
        self.bounds = DateRange::covering(&self.filtered);
        self.range = self.bounds;
        if self.filtered.is_empty() {
            log::warn!(
                "No rows for region '{}' and type '{}'",
                self.query.region,
                self.query.kind
            );
        }
        self.reproject();
    }

    fn reproject(&mut self) {
        let visible = match &self.range {
            Some(range) => in_range(&self.filtered, range),
            None => &self.filtered[..],
        };
        self.series = project(visible);
        log::debug!(
            "{} of {} rows visible for {}/{}",
            self.series.len(),
            self.filtered.len(),
            self.query.region,
            self.query.kind
        );
        self.view = DashboardView::build(&ViewInputs {
            options: &self.options,
            query: &self.query,
            filtered: &self.filtered,
            bounds: self.bounds,
            range: self.range,
            series: &self.series,
        });
    }
}

/// Use the requested selection when the dataset has it, else its first option.
fn initial_query(options: &FilterOptions, region: &str, kind: AvocadoType) -> RecordQuery {
    let region = if options.has_region(region) {
        region.to_string()
    } else if let Some(first) = options.regions.first() {
        log::warn!("Region '{region}' not in dataset, using '{first}'");
        first.clone()
    } else {
        region.to_string()
    };
    let kind = if options.has_kind(kind) {
        kind
    } else {
        options.kinds.first().copied().unwrap_or(kind)
    };
    RecordQuery::new(region, kind)
}

fn empty_view(options: &FilterOptions, query: &RecordQuery) -> DashboardView {
    DashboardView::build(&ViewInputs {
        options,
        query,
        filtered: &[],
        bounds: None,
        range: None,
        series: &ChartSeries::default(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::view::Content;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(date: &str, region: &str, kind: AvocadoType, price: f64) -> PriceRecord {
        PriceRecord {
            date: d(date),
            region: region.to_string(),
            kind,
            average_price: price,
            total_volume: 1000.0,
        }
    }

    fn dataset() -> PriceDataset {
        use AvocadoType::*;
        PriceDataset::new(
            "memory.csv",
            vec![
                record("2015-01-18", "Albany", Conventional, 1.3),
                record("2015-01-04", "Albany", Conventional, 1.22),
                record("2015-01-11", "Albany", Conventional, 1.10),
                record("2015-02-01", "Boston", Organic, 2.0),
            ],
        )
    }

    #[test]
    fn starts_with_configured_selection_and_full_range() {
        let state = AppState::new(dataset(), &DashboardConfig::default());

        assert_eq!(state.query, RecordQuery::new("Albany", AvocadoType::Conventional));
        assert_eq!(state.filtered.len(), 3);
        assert_eq!(state.range, Some(DateRange::new(d("2015-01-04"), d("2015-01-18"))));
        let prices: Vec<f64> = state.series.price.iter().map(|p| p.value).collect();
        assert_eq!(prices, vec![1.22, 1.10, 1.3]);
        assert!(matches!(state.view.content, Content::Charts { .. }));
    }

    #[test]
    fn unknown_configured_region_falls_back_to_first_option() {
        let config = DashboardConfig {
            region: "Denver".into(),
            ..DashboardConfig::default()
        };
        let state = AppState::new(dataset(), &config);
        assert_eq!(state.query.region, "Albany");
    }

    #[test]
    fn empty_combination_shows_empty_state() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        state.set_kind(AvocadoType::Organic);

        assert!(state.filtered.is_empty());
        assert_eq!(state.range, None);
        assert!(state.series.is_empty());
        assert!(matches!(state.view.content, Content::Empty { .. }));

        state.set_region("Boston");
        assert_eq!(state.filtered.len(), 1);
        assert!(matches!(state.view.content, Content::Charts { .. }));
    }

    #[test]
    fn date_range_is_clamped_and_slices_series() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());

        state.set_date_range(DateRange::new(d("2015-01-10"), d("2020-01-01")));
        assert_eq!(state.range, Some(DateRange::new(d("2015-01-10"), d("2015-01-18"))));
        let dates: Vec<NaiveDate> = state.series.price.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2015-01-11"), d("2015-01-18")]);
        // Filtered rows are untouched by the date range.
        assert_eq!(state.filtered.len(), 3);
    }

    #[test]
    fn range_between_observations_is_empty_state() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        state.set_date_range(DateRange::new(d("2015-01-05"), d("2015-01-10")));
        match &state.view.content {
            Content::Empty { message } => assert!(message.contains("2015-01-05"), "{message}"),
            other => panic!("expected empty state, got {other:?}"),
        }
    }

    #[test]
    fn changing_region_resets_range() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        state.set_date_range(DateRange::new(d("2015-01-11"), d("2015-01-11")));
        state.set_region("Boston");
        state.set_kind(AvocadoType::Organic);
        assert_eq!(state.range, Some(DateRange::new(d("2015-02-01"), d("2015-02-01"))));
    }

    #[test]
    fn failed_open_keeps_dataset_and_reports_status() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "region,type\nAlbany,organic\n").unwrap();

        assert!(matches!(state.open(&bad), Err(DataError::DataFormat { .. })));
        assert_eq!(state.dataset.len(), 4);
        assert!(state.status_message.as_deref().unwrap().contains("missing column 'Date'"));
    }

    #[test]
    fn open_replaces_dataset_and_keeps_valid_selection() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        state.status_message = Some("old".into());
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(
            &good,
            "Date,AveragePrice,Total Volume,type,region\n\
             2016-01-03,1.5,10,conventional,Atlanta\n\
             2016-01-03,1.4,10,conventional,Albany\n",
        )
        .unwrap();

        state.open(&good).unwrap();
        assert_eq!(state.dataset.len(), 2);
        assert_eq!(state.query.region, "Albany");
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.status_message, None);
    }
}
