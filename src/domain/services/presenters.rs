#[cfg(test)]
#[path = "presenters_test.rs"]
mod tests;

use chrono::Local;
use chrono::TimeZone;

use super::history::group_by_date_in;
use super::history::parse_timestamp;
use super::html::html_to_text;
use crate::domain::models::AdminStats;
use crate::domain::models::HistoryRecord;
use crate::domain::models::PdfDocument;
use crate::domain::models::QueryAnalytics;
use crate::domain::models::UnansweredQuery;

pub const NO_HISTORY_TEXT: &str = "No chat history found";
pub const NO_SENTIMENT_TEXT: &str = "No sentiment data available.";
pub const NO_TOPICS_TEXT: &str = "No trending topics available.";
pub const NO_PDFS_TEXT: &str = "No PDFs uploaded yet.";
pub const NO_QUERIES_TEXT: &str = "No unanswered queries.";

pub fn format_file_size(bytes: Option<u64>) -> String {
    let bytes = match bytes {
        Some(bytes) if bytes > 0 => bytes,
        _ => return "Unknown".to_string(),
    };

    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.2} KB");
    }

    return format!("{:.2} MB", kb / 1024.0);
}

/// Renders a timestamp like `Mar 1, 2024 9:15 AM`, or hands back the raw
/// value when it can't be read.
pub fn format_timestamp_in<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(timestamp) {
        Some(parsed) => {
            return parsed
                .with_timezone(tz)
                .format("%b %-d, %Y %-I:%M %p")
                .to_string()
        }
        None => return timestamp.to_string(),
    }
}

pub fn stats_lines(stats: &AdminStats) -> Vec<String> {
    return vec![
        format!("Total users: {}", stats.total_users),
        format!("Total chats: {}", stats.total_chats),
        format!("Unanswered queries: {}", stats.unanswered_queries),
    ];
}

pub fn sentiment_lines(analytics: &QueryAnalytics) -> Vec<String> {
    if analytics.sentiment_analytics.is_empty() {
        return vec![NO_SENTIMENT_TEXT.to_string()];
    }

    return analytics
        .sentiment_analytics
        .iter()
        .map(|point| {
            return format!(
                "{}: Avg Sentiment: {:.2} (Count: {})",
                point.date, point.avg_sentiment, point.count
            );
        })
        .collect();
}

pub fn trending_lines(analytics: &QueryAnalytics) -> Vec<String> {
    if analytics.trending_topics.is_empty() {
        return vec![NO_TOPICS_TEXT.to_string()];
    }

    return analytics
        .trending_topics
        .iter()
        .map(|(term, count)| return format!("{term}: {count}"))
        .collect();
}

pub fn pdf_lines(pdfs: &[PdfDocument]) -> Vec<String> {
    if pdfs.is_empty() {
        return vec![NO_PDFS_TEXT.to_string()];
    }

    return pdfs
        .iter()
        .map(|pdf| {
            return format!(
                "{name} ({size}, uploaded {created})\n  id: {id}\n  {url}",
                name = pdf.display_name(),
                size = format_file_size(pdf.size),
                created = format_timestamp_in(&pdf.created_at, &Local),
                id = pdf.public_id,
                url = pdf.url
            );
        })
        .collect();
}

pub fn unanswered_lines(queries: &[UnansweredQuery]) -> Vec<String> {
    if queries.is_empty() {
        return vec![NO_QUERIES_TEXT.to_string()];
    }

    return queries
        .iter()
        .map(|query| return format!("[{}] {}", query.id, query.question))
        .collect();
}

/// Plain text listing of history grouped by day, used outside the TUI.
pub fn history_lines_in<Tz: TimeZone>(records: &[HistoryRecord], tz: &Tz) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    if records.is_empty() {
        return vec![NO_HISTORY_TEXT.to_string()];
    }

    let mut lines = vec![];
    for (date, group) in group_by_date_in(records, tz) {
        if !lines.is_empty() {
            lines.push("".to_string());
        }
        lines.push(format!("== {date} =="));

        for record in group {
            let who = match &record.username {
                Some(username) => format!(" ({username})"),
                None => "".to_string(),
            };
            lines.push(format!(
                "{}{who}",
                format_timestamp_in(&record.timestamp, tz)
            ));
            lines.push(format!("Q: {}", record.question));
            lines.push(format!("A: {}", html_to_text(&record.answer)));
        }
    }

    return lines;
}
