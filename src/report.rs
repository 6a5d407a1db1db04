//! Terminal and file rendering of a computed [`Dashboard`].

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::chart::{Rendered, render_line_chart};
use crate::dashboard::{DAILY_MAX_LABELS, Dashboard, HOURLY_LABELS, TWO_WEEK_LABELS};
use crate::filter::Selection;

/// Message shown wherever a window holds no readings.
pub const NO_DATA: &str = "데이터가 없습니다.";

/// One row of the month extremes table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeRow {
    pub date: NaiveDate,
    pub temperature: f64,
    pub kind: &'static str,
    pub alert: bool,
}

/// Max row then min row, flagging temperatures at or above `threshold`.
/// Empty when the month window held no readings.
pub fn extremes_table(dashboard: &Dashboard, threshold: f64) -> Vec<ExtremeRow> {
    let Some(ext) = &dashboard.extremes else {
        return Vec::new();
    };

    [(&ext.max, "최고 온도"), (&ext.min, "최저 온도")]
        .into_iter()
        .map(|(r, kind)| ExtremeRow {
            date: r.timestamp.date(),
            temperature: r.temperature,
            kind,
            alert: r.temperature >= threshold,
        })
        .collect()
}

/// Logs the hottest module, the daily-mean table and the extremes table.
pub fn print_summary(selection: &Selection, dashboard: &Dashboard, threshold: f64) {
    info!(
        location = %selection,
        readings = dashboard.reading_count,
        now = %dashboard.now,
        "Dashboard"
    );

    match &dashboard.extremes {
        Some(ext) => info!(
            module_id = %ext.max.module_id,
            temperature = ext.max.temperature,
            "가장 높은 온도를 가진 모듈번호"
        ),
        None => warn!("{NO_DATA}"),
    }

    info!("최근 1개월 평균 온도");
    for (date, mean) in &dashboard.daily_mean.points {
        info!(%date, mean = (mean * 100.0).round() / 100.0, "일별 평균");
    }

    for row in extremes_table(dashboard, threshold) {
        if row.alert {
            warn!(date = %row.date, temperature = row.temperature, kind = row.kind, "고온 경보");
        } else {
            info!(date = %row.date, temperature = row.temperature, kind = row.kind);
        }
    }
}

/// Prints the dashboard to stdout as pretty-printed JSON.
pub fn print_json(dashboard: &Dashboard) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(dashboard)?);
    Ok(())
}

/// Writes each computed chart view into `dir` as SVG.
///
/// Returns the files written; views with no points are logged as having no
/// data and skipped.
pub fn render_charts(dir: &Path, dashboard: &Dashboard) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let views = [
        (
            "hourly_mean.svg",
            &HOURLY_LABELS,
            dashboard.hourly_mean.as_ref().map(|v| v.labeled()),
        ),
        (
            "two_week_trend.svg",
            &TWO_WEEK_LABELS,
            dashboard.two_week_trend.as_ref().map(|v| v.labeled()),
        ),
        (
            "daily_max.svg",
            &DAILY_MAX_LABELS,
            dashboard.daily_max.as_ref().map(|v| v.labeled()),
        ),
    ];

    let mut written = Vec::new();
    for (file, labels, points) in views {
        let Some(points) = points else { continue };

        match render_line_chart(&dir.join(file), labels, &points)? {
            Rendered::Written(path) => {
                info!(title = labels.title, path = %path.display(), "Chart rendered");
                written.push(path);
            }
            Rendered::NoData => warn!(title = labels.title, "{NO_DATA}"),
        }
    }

    Ok(written)
}
