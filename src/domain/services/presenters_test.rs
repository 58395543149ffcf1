use chrono::Utc;
use test_utils::history_fixture;
use test_utils::insta_snapshot;

use super::*;
use crate::domain::models::SentimentPoint;

fn records() -> Vec<HistoryRecord> {
    return serde_json::from_str(history_fixture()).unwrap();
}

#[test]
fn it_formats_file_sizes() {
    assert_eq!(format_file_size(None), "Unknown");
    assert_eq!(format_file_size(Some(0)), "Unknown");
    assert_eq!(format_file_size(Some(512)), "0.50 KB");
    assert_eq!(format_file_size(Some(1023 * 1024)), "1023.00 KB");
    assert_eq!(format_file_size(Some(1024 * 1024)), "1.00 MB");
    assert_eq!(format_file_size(Some(2_621_440)), "2.50 MB");
}

#[test]
fn it_formats_timestamps() {
    assert_eq!(
        format_timestamp_in("2024-03-01T14:05:00", &Utc),
        "Mar 1, 2024 2:05 PM"
    );
    assert_eq!(format_timestamp_in("later", &Utc), "later");
}

#[test]
fn it_formats_stats() {
    let stats = AdminStats {
        total_users: 12,
        total_chats: 340,
        unanswered_queries: 5,
    };

    assert_eq!(
        stats_lines(&stats),
        vec![
            "Total users: 12",
            "Total chats: 340",
            "Unanswered queries: 5"
        ]
    );
}

#[test]
fn it_formats_analytics() {
    let analytics = QueryAnalytics {
        sentiment_analytics: vec![
            SentimentPoint {
                date: "2024-03-01".to_string(),
                avg_sentiment: 0.4567,
                count: 3,
            },
            SentimentPoint {
                date: "2024-03-02".to_string(),
                avg_sentiment: -0.1,
                count: 1,
            },
        ],
        trending_topics: vec![("library".to_string(), 9), ("fees".to_string(), 4)],
    };

    assert_eq!(
        sentiment_lines(&analytics),
        vec![
            "2024-03-01: Avg Sentiment: 0.46 (Count: 3)",
            "2024-03-02: Avg Sentiment: -0.10 (Count: 1)"
        ]
    );
    assert_eq!(trending_lines(&analytics), vec!["library: 9", "fees: 4"]);
}

#[test]
fn it_explains_empty_analytics() {
    let analytics = QueryAnalytics::default();

    assert_eq!(sentiment_lines(&analytics), vec![NO_SENTIMENT_TEXT]);
    assert_eq!(trending_lines(&analytics), vec![NO_TOPICS_TEXT]);
}

#[test]
fn it_formats_pdfs() {
    let pdfs = vec![PdfDocument {
        public_id: "pdfs/handbook".to_string(),
        filename: None,
        created_at: "not a date".to_string(),
        size: Some(2_621_440),
        url: "https://files.example.com/handbook.pdf".to_string(),
    }];

    assert_eq!(
        pdf_lines(&pdfs),
        vec![
            "handbook (2.50 MB, uploaded not a date)\n  id: pdfs/handbook\n  https://files.example.com/handbook.pdf"
        ]
    );
    assert_eq!(pdf_lines(&[]), vec![NO_PDFS_TEXT]);
}

#[test]
fn it_formats_unanswered_queries() {
    let queries = vec![UnansweredQuery {
        id: "q1".to_string(),
        question: "Is there a hostel?".to_string(),
    }];

    assert_eq!(unanswered_lines(&queries), vec!["[q1] Is there a hostel?"]);
    assert_eq!(unanswered_lines(&[]), vec![NO_QUERIES_TEXT]);
}

#[test]
fn it_formats_history_by_day() {
    let records = records();
    let lines = history_lines_in(&records[3..5], &Utc);

    insta_snapshot(|| {
        insta::assert_snapshot!(lines.join("\n"), @r###"
        == 2024-03-01 ==
        Mar 1, 2024 2:00 PM
        Q: Where is the admin block?
        A: Next to the main gate.

        == 2024-03-02 ==
        Mar 2, 2024 8:00 AM
        Q: When are exams?
        A: - Midterms in April
        - Finals in June
        "###);
    });
}

#[test]
fn it_shows_usernames_in_admin_history() {
    let records = records();
    let lines = history_lines_in(&records[8..9], &Utc);

    assert_eq!(lines[1], "Mar 3, 2024 1:10 PM (asha)");
}

#[test]
fn it_explains_empty_history() {
    assert_eq!(history_lines_in(&[], &Utc), vec![NO_HISTORY_TEXT]);
}
