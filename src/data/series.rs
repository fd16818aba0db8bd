use chrono::NaiveDate;
use serde::Serialize;

use super::model::PriceRecord;

// ---------------------------------------------------------------------------
// Date range selected in the picker
// ---------------------------------------------------------------------------

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the endpoints if they are reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateRange { start: a, end: b }
        } else {
            DateRange { start: b, end: a }
        }
    }

    /// Earliest and latest date of `records`, or `None` when empty.
    pub fn covering(records: &[PriceRecord]) -> Option<Self> {
        let start = records.iter().map(|r| r.date).min()?;
        let end = records.iter().map(|r| r.date).max()?;
        Some(DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Restrict `self` to `bounds`.  A range entirely outside the bounds
    /// collapses onto the nearest bound.  Either range may have been built
    /// with reversed fields.
    pub fn clamp_to(&self, bounds: &DateRange) -> Self {
        let bounds = DateRange::new(bounds.start, bounds.end);
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(bounds.start, bounds.end);
        DateRange::new(start, end)
    }
}

/// The contiguous part of a date-sorted slice that falls inside `range`.
pub fn in_range<'a>(records: &'a [PriceRecord], range: &DateRange) -> &'a [PriceRecord] {
    let lo = records.partition_point(|r| r.date < range.start);
    let hi = records.partition_point(|r| r.date <= range.end);
    &records[lo..hi.max(lo)]
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// One point of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// The two series plotted by the dashboard, index-aligned with the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub price: Vec<SeriesPoint>,
    pub volume: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }
}

/// Project records into (date, average price) and (date, total volume),
/// keeping order and length.
pub fn project(records: &[PriceRecord]) -> ChartSeries {
    let (price, volume) = records
        .iter()
        .map(|r| {
            (
                SeriesPoint {
                    date: r.date,
                    value: r.average_price,
                },
                SeriesPoint {
                    date: r.date,
                    value: r.total_volume,
                },
            )
        })
        .unzip();
    ChartSeries { price, volume }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AvocadoType;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weekly(dates: &[&str]) -> Vec<PriceRecord> {
        dates
            .iter()
            .enumerate()
            .map(|(i, date)| PriceRecord {
                date: d(date),
                region: "Albany".into(),
                kind: AvocadoType::Conventional,
                average_price: 1.0 + i as f64 / 10.0,
                total_volume: 1000.0 * (i + 1) as f64,
            })
            .collect()
    }

    #[test]
    fn projection_keeps_order_and_length() {
        let records = weekly(&["2015-01-04", "2015-01-11", "2015-01-18"]);
        let series = project(&records);

        assert_eq!(series.len(), records.len());
        assert_eq!(series.volume.len(), records.len());
        for (i, r) in records.iter().enumerate() {
            assert_eq!(series.price[i], SeriesPoint { date: r.date, value: r.average_price });
            assert_eq!(series.volume[i], SeriesPoint { date: r.date, value: r.total_volume });
        }
    }

    #[test]
    fn projection_of_nothing_is_empty() {
        assert!(project(&[]).is_empty());
    }

    #[test]
    fn covering_spans_min_and_max() {
        let records = weekly(&["2015-01-04", "2015-01-11", "2015-01-18"]);
        assert_eq!(
            DateRange::covering(&records),
            Some(DateRange { start: d("2015-01-04"), end: d("2015-01-18") })
        );
        assert_eq!(DateRange::covering(&[]), None);
    }

    #[test]
    fn in_range_is_inclusive() {
        let records = weekly(&["2015-01-04", "2015-01-11", "2015-01-18", "2015-01-25"]);

        let range = DateRange::new(d("2015-01-11"), d("2015-01-18"));
        let slice = in_range(&records, &range);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].date, d("2015-01-11"));
        assert_eq!(slice[1].date, d("2015-01-18"));

        let between_weeks = DateRange::new(d("2015-01-05"), d("2015-01-10"));
        assert!(in_range(&records, &between_weeks).is_empty());
    }

    #[test]
    fn reversed_endpoints_are_swapped() {
        let range = DateRange::new(d("2016-01-01"), d("2015-01-01"));
        assert_eq!(range.start, d("2015-01-01"));
        assert!(range.contains(d("2015-06-01")));
    }

    #[test]
    fn clamp_keeps_range_inside_bounds() {
        let bounds = DateRange::new(d("2015-01-04"), d("2018-03-25"));

        let wide = DateRange::new(d("2014-01-01"), d("2019-01-01"));
        assert_eq!(wide.clamp_to(&bounds), bounds);

        let inner = DateRange::new(d("2016-01-01"), d("2016-06-01"));
        assert_eq!(inner.clamp_to(&bounds), inner);

        let after = DateRange::new(d("2019-01-01"), d("2019-02-01"));
        assert_eq!(
            after.clamp_to(&bounds),
            DateRange::new(d("2018-03-25"), d("2018-03-25"))
        );
    }

    #[test]
    fn clamp_accepts_ranges_built_with_reversed_fields() {
        let bounds = DateRange { start: d("2018-03-25"), end: d("2015-01-04") };
        let range = DateRange { start: d("2019-01-01"), end: d("2016-01-01") };
        assert_eq!(
            range.clamp_to(&bounds),
            DateRange::new(d("2016-01-01"), d("2018-03-25"))
        );
    }
}
