#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;

use crate::domain::models::HistoryRecord;

pub const UNKNOWN_DATE: &str = "Unknown date";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses the timestamp formats the backend emits. Timestamps without an
/// offset are written in UTC.
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let timestamp = timestamp.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, format) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(timestamp) {
        return Some(parsed.with_timezone(&Utc));
    }

    return None;
}

pub fn date_key_in<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String {
    match parse_timestamp(timestamp) {
        Some(parsed) => {
            return parsed
                .with_timezone(tz)
                .date_naive()
                .format("%Y-%m-%d")
                .to_string()
        }
        None => return UNKNOWN_DATE.to_string(),
    }
}

pub fn group_by_date(records: &[HistoryRecord]) -> Vec<(String, Vec<&HistoryRecord>)> {
    return group_by_date_in(records, &Local);
}

/// Groups records by calendar day in `tz`. Groups keep the order in which
/// their day first appears, and records keep their input order.
pub fn group_by_date_in<'a, Tz: TimeZone>(
    records: &'a [HistoryRecord],
    tz: &Tz,
) -> Vec<(String, Vec<&'a HistoryRecord>)> {
    let mut groups: Vec<(String, Vec<&'a HistoryRecord>)> = vec![];

    for record in records {
        let key = date_key_in(&record.timestamp, tz);
        match groups.iter_mut().find(|(date, _)| return *date == key) {
            Some((_, group)) => group.push(record),
            None => groups.push((key, vec![record])),
        }
    }

    return groups;
}

/// At most one record is expanded at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandedRecord {
    id: Option<String>,
}

impl ExpandedRecord {
    #[cfg(test)]
    pub fn expanded(&self) -> Option<&str> {
        return self.id.as_deref();
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        return self.id.as_deref() == Some(id);
    }

    pub fn toggle(&mut self, id: &str) {
        if self.is_expanded(id) {
            self.id = None;
        } else {
            self.id = Some(id.to_string());
        }
    }

    pub fn collapse(&mut self) {
        self.id = None;
    }
}
