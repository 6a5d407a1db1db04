//! Temperature readings and the in-memory dataset they are loaded into.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Header of the timestamp column.
pub const COL_TIMESTAMP: &str = "날짜";
/// Header of the location (통합국) name column.
pub const COL_LOCATION: &str = "통합국명";
/// Header of the module/sensor identifier column.
pub const COL_MODULE: &str = "모듈번호";
/// Header of the temperature column.
pub const COL_TEMPERATURE: &str = "온도";

/// Column headers in file order.
pub const HEADERS: [&str; 4] = [COL_TIMESTAMP, COL_LOCATION, COL_MODULE, COL_TEMPERATURE];

/// Timestamp layout used when readings are written back out.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cleaned row of the uploaded file.
///
/// Field order matches the column order of the file so a `Reading` can be
/// serialized straight back to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    #[serde(rename = "날짜", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "통합국명")]
    pub location_name: String,
    #[serde(rename = "모듈번호")]
    pub module_id: String,
    #[serde(rename = "온도")]
    pub temperature: f64,
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

/// Readings in source order. Replaced wholesale on every upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Reading {
        Reading {
            timestamp: NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            location_name: "강남".to_string(),
            module_id: "M-01".to_string(),
            temperature: 30.0,
        }
    }

    #[test]
    fn test_serializes_in_column_order() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(sample()).unwrap();
        let out = writer.into_inner().map_err(|e| e.into_error()).unwrap();
        let out = String::from_utf8(out).unwrap();

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("날짜,통합국명,모듈번호,온도"));
        assert_eq!(lines.next(), Some("2024-07-01 09:30:00,강남,M-01,30.0"));
    }

    #[test]
    fn test_dataset_preserves_order() {
        let mut second = sample();
        second.module_id = "M-02".to_string();
        let ds = Dataset::new(vec![sample(), second]);

        let ids: Vec<_> = ds.iter().map(|r| r.module_id.as_str()).collect();
        assert_eq!(ids, vec!["M-01", "M-02"]);
        assert_eq!(ds.len(), 2);
        assert!(!ds.is_empty());
    }
}
