//! One render pass: every derived view the dashboard shows for a selection.

use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{
    Extremes, TimeWindowView, daily_max, daily_mean, extremes, hourly_mean, month_window,
    two_week_trend,
};
use crate::filter::FilteredDataset;

/// Which charts the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
pub enum GraphType {
    #[default]
    #[value(name = "all")]
    #[serde(rename = "all")]
    All,
    #[value(name = "24h")]
    #[serde(rename = "24h")]
    Last24Hours,
    #[value(name = "2-week")]
    #[serde(rename = "2-week")]
    TwoWeek,
    #[value(name = "daily-max")]
    #[serde(rename = "daily-max")]
    DailyMax,
}

impl GraphType {
    fn wants(self, other: GraphType) -> bool {
        self == GraphType::All || self == other
    }
}

/// Title and axis labels handed to the chart renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartLabels {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

pub const HOURLY_LABELS: ChartLabels = ChartLabels {
    title: "최근 24시간 시간대별 평균 온도",
    x_label: "시간대 (시)",
    y_label: "평균 온도 (°C)",
};

pub const TWO_WEEK_LABELS: ChartLabels = ChartLabels {
    title: "2주 평균 온도",
    x_label: "날짜 (월-일)",
    y_label: "평균 온도 (°C)",
};

pub const DAILY_MAX_LABELS: ChartLabels = ChartLabels {
    title: "일단위 최대 온도",
    x_label: "날짜 (월-일)",
    y_label: "최대 온도 (°C)",
};

/// Everything computed for one selection at one instant.
///
/// Chart views the graph type did not ask for are `None`; a requested view
/// with no readings in its window is `Some` with no points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub now: NaiveDateTime,
    pub graph: GraphType,
    pub reading_count: usize,
    pub daily_mean: TimeWindowView<NaiveDate>,
    pub extremes: Option<Extremes>,
    pub hourly_mean: Option<TimeWindowView<u32>>,
    pub two_week_trend: Option<TimeWindowView<String>>,
    pub daily_max: Option<TimeWindowView<NaiveDate>>,
}

impl Dashboard {
    /// Recomputes all views from scratch.
    #[tracing::instrument(skip(data), fields(readings = data.len()))]
    pub fn compute(data: &FilteredDataset<'_>, graph: GraphType, now: NaiveDateTime) -> Self {
        let month = month_window(data, now);
        debug!(month_readings = month.len(), "Month window selected");

        Dashboard {
            now,
            graph,
            reading_count: data.len(),
            daily_mean: daily_mean(&month),
            extremes: extremes(&month),
            hourly_mean: graph
                .wants(GraphType::Last24Hours)
                .then(|| hourly_mean(data, now)),
            two_week_trend: graph
                .wants(GraphType::TwoWeek)
                .then(|| two_week_trend(data, now)),
            daily_max: graph.wants(GraphType::DailyMax).then(|| daily_max(data)),
        }
    }

    /// True when the month window held no readings.
    pub fn month_is_empty(&self) -> bool {
        self.extremes.is_none()
    }
}
