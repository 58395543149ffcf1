use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnansweredQuery {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_chats: u64,
    #[serde(default)]
    pub unanswered_queries: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub date: String,
    pub avg_sentiment: f64,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalytics {
    #[serde(default)]
    pub sentiment_analytics: Vec<SentimentPoint>,
    #[serde(default)]
    pub trending_topics: Vec<(String, u64)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfDocument {
    pub public_id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: String,
}

impl PdfDocument {
    /// Uploaded files may lack a filename, in which case the last segment of
    /// the storage id is the best name available.
    pub fn display_name(&self) -> String {
        if let Some(filename) = &self.filename {
            if !filename.is_empty() {
                return filename.to_string();
            }
        }

        return self
            .public_id
            .split('/')
            .last()
            .unwrap_or(&self.public_id)
            .to_string();
    }
}
