use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use super::AdminStats;
use super::HistoryRecord;
use super::PdfDocument;
use super::QueryAnalytics;
use super::QueryOutcome;
use super::UnansweredQuery;

/// Failures callers are expected to branch on. Anything else is reported as
/// a plain `anyhow` error.
#[derive(Debug, PartialEq, Eq)]
pub enum TransportError {
    Unauthorized,
    Status(u16),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Unauthorized => {
                return write!(f, "Authentication error. Please log in again.")
            }
            TransportError::Status(status) => {
                return write!(f, "Request failed with status {status}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    return err.downcast_ref::<TransportError>() == Some(&TransportError::Unauthorized);
}

#[async_trait]
pub trait Transport {
    /// Returns the session token for a user account.
    async fn user_login(&self, username: &str, password: &str) -> Result<String>;

    /// Registers an account. Some backends answer with a token straight away,
    /// others only confirm the registration.
    async fn user_signup(&self, username: &str, email: &str, password: &str)
        -> Result<Option<String>>;

    /// Returns the session token for an admin account.
    async fn admin_login(&self, email: &str, password: &str) -> Result<String>;

    /// Asks the chatbot a question. Never fails: every failure is folded into
    /// a `QueryOutcome` so the pending exchange can always be resolved. The
    /// token is attached when present, and the request is sent either way.
    async fn submit_query(&self, question: &str, token: Option<&str>) -> QueryOutcome;

    async fn chat_history(&self, token: &str) -> Result<Vec<HistoryRecord>>;

    async fn admin_chat_history(&self, token: &str) -> Result<Vec<HistoryRecord>>;

    async fn unanswered_queries(&self) -> Result<Vec<UnansweredQuery>>;

    async fn add_response(&self, id: &str, response: &str) -> Result<()>;

    async fn delete_query(&self, id: &str) -> Result<()>;

    async fn admin_stats(&self, token: &str) -> Result<AdminStats>;

    async fn query_analytics(&self, token: &str) -> Result<QueryAnalytics>;

    async fn list_pdfs(&self, token: &str) -> Result<Vec<PdfDocument>>;

    async fn upload_pdf(&self, token: &str, file_name: &str, bytes: Vec<u8>) -> Result<()>;

    async fn delete_pdf(&self, token: &str, public_id: &str) -> Result<()>;

    async fn rebuild_embeddings(&self, token: &str) -> Result<()>;
}

pub type TransportBox = Box<dyn Transport + Send + Sync>;
