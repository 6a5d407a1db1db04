//! SVG line charts for the dashboard views.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Result, anyhow, bail};
use glob::glob;
use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::dashboard::ChartLabels;

/// Family used when the Korean font cannot be found.
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";

const PREFERRED_FONT: &str = "NanumGothic";

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

static FONT_FAMILY: OnceLock<String> = OnceLock::new();

/// Resolves the chart font family once per process.
///
/// Checks `font_path` and then the system font directories for a NanumGothic
/// file. Falls back to [`FALLBACK_FONT_FAMILY`] with a warning. Calls after the
/// first return the cached family.
pub fn configure_fonts(font_path: Option<&Path>) -> &'static str {
    FONT_FAMILY.get_or_init(|| resolve_font_family(font_path))
}

fn font_family() -> &'static str {
    configure_fonts(None)
}

fn resolve_font_family(font_path: Option<&Path>) -> String {
    if let Some(path) = font_path {
        if path.is_file() && is_preferred_font(path) {
            info!(path = %path.display(), "Using configured chart font");
            return PREFERRED_FONT.to_string();
        }
        warn!(path = %path.display(), "Configured font is missing or not {PREFERRED_FONT}");
    }

    let found = SYSTEM_FONT_DIRS
        .iter()
        .find_map(|dir| find_font_file(dir, PREFERRED_FONT));

    match found {
        Some(path) => {
            info!(path = %path.display(), "Found chart font");
            PREFERRED_FONT.to_string()
        }
        None => {
            warn!("{PREFERRED_FONT} font not found, using {FALLBACK_FONT_FAMILY}");
            FALLBACK_FONT_FAMILY.to_string()
        }
    }
}

fn is_preferred_font(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(PREFERRED_FONT))
}

/// First file under `dir` (at any depth) whose name contains `needle`.
fn find_font_file(dir: &str, needle: &str) -> Option<PathBuf> {
    glob(&format!("{dir}/**/*{needle}*"))
        .ok()?
        .flatten()
        .find(|p| p.is_file())
}

/// Outcome of handing one view to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Written(PathBuf),
    NoData,
}

/// Draws `points` as a line chart with markers into an SVG at `path`.
///
/// Labels are plotted at evenly spaced x positions in the given order.
/// Returns [`Rendered::NoData`] without touching the filesystem when there
/// are no points.
pub fn render_line_chart(
    path: &Path,
    labels: &ChartLabels,
    points: &[(String, f64)],
) -> Result<Rendered> {
    if points.is_empty() {
        debug!(title = labels.title, "No points, skipping chart");
        return Ok(Rendered::NoData);
    }

    let (lo, hi) = y_range(points)?;
    let family = font_family();
    let n = points.len() as i32;

    {
        let root = SVGBackend::new(path, (1000, 500)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(labels.title, (family, 24))
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .margin(15)
            .build_cartesian_2d(-1..n, lo..hi)
            .map_err(|e| anyhow!("{e}"))?;

        let x_label = |i: &i32| {
            usize::try_from(*i)
                .ok()
                .and_then(|i| points.get(i))
                .map(|(l, _)| l.clone())
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_desc(labels.x_label)
            .y_desc(labels.y_label)
            .axis_desc_style((family, 18))
            .label_style((family, 13))
            .x_labels(points.len().min(31) + 2)
            .x_label_formatter(&x_label)
            .draw()
            .map_err(|e| anyhow!("{e}"))?;

        let series = points.iter().enumerate().map(|(i, (_, v))| (i as i32, *v));

        chart
            .draw_series(LineSeries::new(series.clone(), BLUE.stroke_width(2)))
            .map_err(|e| anyhow!("{e}"))?;
        chart
            .draw_series(series.map(|p| Circle::new(p, 4, BLUE.filled())))
            .map_err(|e| anyhow!("{e}"))?;

        root.present().map_err(|e| anyhow!("{e}"))?;
    }

    debug!(path = %path.display(), points = points.len(), "Chart written");
    Ok(Rendered::Written(path.to_path_buf()))
}

/// Padded y-axis bounds. Non-finite values are rejected since plotters
/// cannot lay out an infinite range.
fn y_range(points: &[(String, f64)]) -> Result<(f64, f64)> {
    if let Some((label, v)) = points.iter().find(|(_, v)| !v.is_finite()) {
        bail!("cannot chart non-finite value {v} at `{label}`");
    }

    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });
    let pad = ((max - min) * 0.1).max(1.0);
    Ok((min - pad, max + pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::HOURLY_LABELS;
    use std::env;
    use std::fs;

    #[test]
    fn test_empty_points_render_no_data() {
        let path = env::temp_dir().join("office_temp_monitor_test_empty.svg");
        let _ = fs::remove_file(&path);

        let out = render_line_chart(&path, &HOURLY_LABELS, &[]).unwrap();

        assert_eq!(out, Rendered::NoData);
        assert!(!path.exists());
    }

    #[test]
    fn test_render_writes_svg_with_title() {
        let path = env::temp_dir().join("office_temp_monitor_test_chart.svg");
        let _ = fs::remove_file(&path);

        let points = vec![("9".to_string(), 28.5), ("10".to_string(), 30.0)];
        let out = render_line_chart(&path, &HOURLY_LABELS, &points).unwrap();

        assert_eq!(out, Rendered::Written(path.clone()));
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(HOURLY_LABELS.title));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_single_point_renders() {
        let path = env::temp_dir().join("office_temp_monitor_test_single.svg");
        let points = vec![("07-01".to_string(), 31.0)];

        let out = render_line_chart(&path, &HOURLY_LABELS, &points).unwrap();
        assert!(matches!(out, Rendered::Written(_)));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_y_range_pads_flat_series() {
        let (lo, hi) = y_range(&[("a".to_string(), 30.0), ("b".to_string(), 30.0)]).unwrap();
        assert_eq!((lo, hi), (29.0, 31.0));
    }

    #[test]
    fn test_font_configuration_is_sticky() {
        let first = configure_fonts(None);
        let second = configure_fonts(Some(Path::new("/nonexistent/NanumGothic.ttf")));
        assert_eq!(first, second);
        assert!(first == PREFERRED_FONT || first == FALLBACK_FONT_FAMILY);
    }

    #[test]
    fn test_non_finite_points_are_refused() {
        let path = env::temp_dir().join("office_temp_monitor_test_inf.svg");
        let _ = fs::remove_file(&path);

        let points = vec![("9".to_string(), 30.0), ("10".to_string(), f64::INFINITY)];
        let err = render_line_chart(&path, &HOURLY_LABELS, &points).unwrap_err();

        assert!(err.to_string().contains("non-finite"));
        assert!(!path.exists());
        assert!(y_range(&[("a".to_string(), f64::NAN)]).is_err());
    }

    #[test]
    fn test_configured_font_must_be_nanum() {
        assert!(is_preferred_font(Path::new("/fonts/NanumGothic.ttf")));
        assert!(is_preferred_font(Path::new("NanumGothicBold.ttf")));
        assert!(!is_preferred_font(Path::new("/fonts/DejaVuSans.ttf")));
    }

    #[test]
    fn test_find_font_file() {
        let dir = env::temp_dir().join("office_temp_monitor_test_fonts/truetype/nanum");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("NanumGothicBold.ttf"), b"").unwrap();

        let root = env::temp_dir().join("office_temp_monitor_test_fonts");
        let root = root.to_str().unwrap();
        assert_eq!(
            find_font_file(root, PREFERRED_FONT),
            Some(dir.join("NanumGothicBold.ttf"))
        );
        assert!(find_font_file(root, "NotoSans").is_none());
        assert!(find_font_file("/nonexistent/fonts", PREFERRED_FONT).is_none());

        fs::remove_dir_all(root).unwrap();
    }
}
