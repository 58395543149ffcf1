use chrono::FixedOffset;
use chrono::Utc;
use test_utils::history_fixture;

use super::date_key_in;
use super::group_by_date_in;
use super::parse_timestamp;
use super::ExpandedRecord;
use super::UNKNOWN_DATE;
use crate::domain::models::HistoryRecord;

fn records() -> Vec<HistoryRecord> {
    return serde_json::from_str(history_fixture()).unwrap();
}

mod timestamps {
    use super::*;

    #[test]
    fn it_parses_backend_formats() {
        let expected = "2024-03-01T10:30:00Z";
        for timestamp in [
            "2024-03-01T10:30:00Z",
            "2024-03-01T16:00:00+05:30",
            "2024-03-01T10:30:00",
            "2024-03-01T10:30:00.123456",
            "2024-03-01 10:30:00",
            "Fri, 01 Mar 2024 10:30:00 GMT",
        ] {
            let parsed = parse_timestamp(timestamp).unwrap();
            assert_eq!(
                parsed.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                expected,
                "{timestamp}"
            );
        }
    }

    #[test]
    fn it_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
        assert_eq!(date_key_in("not a date", &Utc), UNKNOWN_DATE);
    }

    #[test]
    fn it_uses_the_calendar_day_of_the_timezone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(date_key_in("2024-03-01T20:00:00", &Utc), "2024-03-01");
        assert_eq!(date_key_in("2024-03-01T20:00:00", &ist), "2024-03-02");
    }
}

mod grouping {
    use super::*;

    #[test]
    fn it_groups_ten_records_into_three_days() {
        let records = records();
        assert_eq!(records.len(), 10);

        let groups = group_by_date_in(&records, &Utc);

        let keys: Vec<&str> = groups.iter().map(|(key, _)| return key.as_str()).collect();
        assert_eq!(keys, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);

        let total: usize = groups.iter().map(|(_, group)| return group.len()).sum();
        assert_eq!(total, records.len());

        for (key, group) in &groups {
            for record in group {
                assert_eq!(&date_key_in(&record.timestamp, &Utc), key);
            }
        }

        for record in &records {
            let appearances = groups
                .iter()
                .flat_map(|(_, group)| return group.iter())
                .filter(|r| return r.id == record.id)
                .count();
            assert_eq!(appearances, 1);
        }
    }

    #[test]
    fn it_orders_groups_by_first_appearance() {
        let records = records();
        let mut shuffled = vec![records[9].clone(), records[0].clone(), records[8].clone()];
        shuffled.push(records[1].clone());

        let groups = group_by_date_in(&shuffled, &Utc);

        assert_eq!(groups[0].0, "2024-03-03");
        assert_eq!(groups[1].0, "2024-03-01");
        let ids: Vec<&str> = groups[0]
            .1
            .iter()
            .map(|r| return r.id.as_str())
            .collect();
        assert_eq!(ids, vec![records[9].id.as_str(), records[8].id.as_str()]);
    }

    #[test]
    fn it_puts_unparseable_timestamps_in_their_own_group() {
        let mut records = records();
        records[4].timestamp = "sometime".to_string();

        let groups = group_by_date_in(&records, &Utc);

        let unknown = groups
            .iter()
            .find(|(key, _)| return key == UNKNOWN_DATE)
            .unwrap();
        assert_eq!(unknown.1.len(), 1);
        assert_eq!(unknown.1[0].id, records[4].id);
    }

    #[test]
    fn it_returns_nothing_for_no_records() {
        assert!(group_by_date_in(&[], &Utc).is_empty());
    }
}

mod expanded_record {
    use super::*;

    #[test]
    fn it_toggles_a_record() {
        let mut expanded = ExpandedRecord::default();

        expanded.toggle("a");
        assert!(expanded.is_expanded("a"));

        expanded.toggle("a");
        assert_eq!(expanded.expanded(), None);
    }

    #[test]
    fn it_keeps_only_the_last_toggled_record() {
        let mut expanded = ExpandedRecord::default();

        expanded.toggle("a");
        expanded.toggle("b");

        assert!(!expanded.is_expanded("a"));
        assert_eq!(expanded.expanded(), Some("b"));
    }
}
