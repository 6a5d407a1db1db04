use chrono::{NaiveDate, NaiveDateTime};
use office_temp_monitor::dashboard::{Dashboard, GraphType};
use office_temp_monitor::export::export;
use office_temp_monitor::filter::{Selection, filter, selector_options};
use office_temp_monitor::ingest::{IngestError, load};
use office_temp_monitor::report::extremes_table;

fn fixture() -> &'static [u8] {
    include_bytes!("fixtures/sample_readings.csv")
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

#[test]
fn test_full_pipeline() {
    let dataset = load(fixture()).expect("Failed to load fixture");

    // 13 rows, one missing temperature and two non-positive
    assert_eq!(dataset.len(), 10);
    assert!(dataset.iter().all(|r| r.temperature > 0.0));
    assert_eq!(selector_options(&dataset), vec!["전체", "강남", "역삼"]);

    let gangnam = filter(&dataset, &Selection::Location("강남".to_string()));
    assert!(gangnam.iter().all(|r| r.location_name == "강남"));

    let d = Dashboard::compute(&gangnam, GraphType::All, now());

    // GN-02 on 07-10 and GN-01 on 07-20 both read 32.0; the earlier row wins
    let ext = d.extremes.as_ref().unwrap();
    assert_eq!(ext.max.module_id, "GN-02");
    assert_eq!(ext.max.temperature, 32.0);
    assert_eq!(ext.min.temperature, 28.0);

    assert_eq!(
        d.daily_mean.points,
        vec![
            (date(7, 5), 30.0),
            (date(7, 10), 32.0),
            (date(7, 15), 31.5),
            (date(7, 19), 28.0),
            (date(7, 20), 32.0),
        ]
    );

    assert_eq!(
        d.hourly_mean.as_ref().unwrap().points,
        vec![(8, 32.0), (14, 28.0)]
    );
    assert_eq!(
        d.two_week_trend.as_ref().unwrap().labeled(),
        vec![
            ("07-10".to_string(), 32.0),
            ("07-15".to_string(), 31.5),
            ("07-19".to_string(), 28.0),
            ("07-20".to_string(), 32.0),
        ]
    );
    assert_eq!(d.daily_max.as_ref().unwrap().len(), 5);

    let table = extremes_table(&d, 31.0);
    assert!(table[0].alert);
    assert!(!table[1].alert);
}

#[test]
fn test_all_locations_daily_max_includes_old_rows() {
    let dataset = load(fixture()).unwrap();
    let all = filter(&dataset, &Selection::All);
    assert_eq!(all.len(), dataset.len());

    let d = Dashboard::compute(&all, GraphType::DailyMax, now());
    let max = d.daily_max.unwrap();

    assert_eq!(max.points[0], (date(6, 1), 29.0));
    assert!(d.hourly_mean.is_none());
    // 06-01 is outside the month window
    assert_eq!(d.daily_mean.points[0].0, date(7, 5));
}

#[test]
fn test_stale_file_has_no_month_data() {
    let dataset = load(fixture()).unwrap();
    let all = filter(&dataset, &Selection::All);
    let later = now() + chrono::Duration::days(90);

    let d = Dashboard::compute(&all, GraphType::All, later);

    assert!(d.month_is_empty());
    assert!(d.daily_mean.is_empty());
    assert!(d.hourly_mean.unwrap().is_empty());
    assert!(d.two_week_trend.unwrap().is_empty());
    assert!(!d.daily_max.unwrap().is_empty());
}

#[test]
fn test_export_round_trip_for_location() {
    let dataset = load(fixture()).unwrap();
    let yeoksam = filter(&dataset, &Selection::Location("역삼".to_string()));

    let bytes = export(&yeoksam).unwrap();
    let reloaded = load(&bytes).unwrap();

    assert_eq!(reloaded.len(), yeoksam.len());
    assert!(reloaded.iter().zip(yeoksam.iter()).all(|(a, b)| a == b));
}

#[test]
fn test_malformed_file_is_rejected() {
    let mut bytes = fixture().to_vec();
    bytes.extend_from_slice("someday,강남,GN-09,30.0\n".as_bytes());

    let err = load(&bytes).unwrap_err();
    assert!(matches!(err, IngestError::InvalidTimestamp { row: 14, .. }));
}
