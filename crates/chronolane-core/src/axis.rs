//! Date axis: a linear day → pixel scale and its month ticks.

use crate::config::LayoutConfig;
use crate::date::{DateRange, days_between, first_of_month, month_name_short};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisModel {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: i64,
    pub px_per_day: f64,
    pub inner_width_px: f64,
    pub padding_px: f64,
}

impl AxisModel {
    pub fn new(range: DateRange, min_inner_width: f64, px_per_day: f64, padding_px: f64) -> Self {
        let total_days = range.total_days();
        let inner_width_px = min_inner_width.max(total_days as f64 * px_per_day);
        Self {
            start: range.start(),
            end: range.end(),
            total_days,
            px_per_day,
            inner_width_px,
            padding_px,
        }
    }

    pub fn from_config(range: DateRange, cfg: &LayoutConfig) -> Self {
        Self::new(range, cfg.min_inner_width, cfg.px_per_day, cfg.padding)
    }

    pub fn track_width_px(&self) -> f64 {
        self.inner_width_px + self.padding_px * 2.0
    }

    /// Linear in elapsed days; the number of events on a day never affects it.
    pub fn day_to_x(&self, day: NaiveDate) -> f64 {
        let dx = days_between(self.start, day) as f64;
        self.padding_px + (dx / self.total_days as f64) * self.inner_width_px
    }

    pub fn month_ticks(&self) -> MonthTicks<'_> {
        MonthTicks {
            axis: self,
            year: self.start.year(),
            month: self.start.month(),
            end_year: self.end.year(),
            end_month: self.end.month(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTick {
    pub year: i32,
    pub month: u32,
    /// Synthetic first-of-month day anchoring the tick.
    pub day: NaiveDate,
    pub x: f64,
    pub label: String,
}

/// Months from the range start's month through the end's month, inclusive.
///
/// The first tick sits left of `padding` whenever the range does not begin on the 1st.
#[derive(Debug)]
pub struct MonthTicks<'a> {
    axis: &'a AxisModel,
    year: i32,
    month: u32,
    end_year: i32,
    end_month: u32,
}

impl Iterator for MonthTicks<'_> {
    type Item = MonthTick;

    fn next(&mut self) -> Option<Self::Item> {
        if self.year > self.end_year || (self.year == self.end_year && self.month > self.end_month)
        {
            return None;
        }
        let (year, month) = (self.year, self.month);
        self.month += 1;
        if self.month == 13 {
            self.month = 1;
            self.year += 1;
        }

        let day = NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap_or_else(|| first_of_month(self.axis.start));
        Some(MonthTick {
            year,
            month,
            day,
            x: self.axis.day_to_x(day),
            label: format!("{} {year}", month_name_short(month)),
        })
    }
}
