#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AdminStats;
use crate::domain::models::HistoryRecord;
use crate::domain::models::PdfDocument;
use crate::domain::models::QueryAnalytics;
use crate::domain::models::QueryOutcome;
use crate::domain::models::Transport;
use crate::domain::models::TransportError;
use crate::domain::models::UnansweredQuery;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserLoginRequest {
    username: String,
    password: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserSignupRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AdminLoginRequest {
    email: String,
    password: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct QueryRequest {
    question: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct QueryErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user_friendly_error: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<HistoryRecord>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UnansweredQueriesResponse {
    #[serde(default)]
    queries: Vec<UnansweredQuery>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AddResponseRequest {
    id: String,
    response: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PdfListResponse {
    #[serde(default)]
    pdfs: Vec<PdfDocument>,
}

/// Maps a failed query response to what the user sees. The backend attaches
/// a readable `error` to 503s, and to 408/429 when it flags the message as
/// user friendly.
fn query_failure(status: StatusCode, body: &str) -> QueryOutcome {
    if status == StatusCode::NOT_FOUND {
        return QueryOutcome::NotFound;
    }

    let parsed = serde_json::from_str::<QueryErrorResponse>(body).unwrap_or_default();
    let message = parsed.error.filter(|e| return !e.trim().is_empty());

    if let Some(message) = message {
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return QueryOutcome::Unavailable(message);
        }

        let user_facing = status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS;
        if user_facing && parsed.user_friendly_error {
            return QueryOutcome::Unavailable(message);
        }
    }

    return QueryOutcome::Failed;
}

pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> HttpTransport {
        return HttpTransport::new(&Config::get(ConfigKey::ApiURL));
    }
}

impl HttpTransport {
    pub fn new(url: &str) -> HttpTransport {
        return HttpTransport {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url);
    }

    /// Builds a URL whose trailing segments are percent encoded, so ids
    /// containing `/` stay a single segment.
    fn endpoint_with_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        url.path_segments_mut()
            .map_err(|_| return anyhow!("API URL {} cannot have a path", self.url))?
            .pop_if_empty()
            .extend(segments);

        return Ok(url);
    }

    async fn send(&self, req: RequestBuilder, name: &str) -> Result<Response> {
        let res = req.send().await?;
        let status = res.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(request = name, "Request was not authorized");
            bail!(TransportError::Unauthorized);
        }

        if !status.is_success() {
            tracing::error!(
                request = name,
                status = status.as_u16(),
                "Request to Sahayak failed"
            );
            bail!(TransportError::Status(status.as_u16()));
        }

        return Ok(res);
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder, name: &str) -> Result<T> {
        let res = self.send(req, name).await?;
        let body = res.json::<T>().await?;
        return Ok(body);
    }

    async fn token_from(&self, req: RequestBuilder, name: &str) -> Result<String> {
        let body: TokenResponse = self.send_json(req, name).await?;
        match body.token {
            Some(token) if !token.is_empty() => return Ok(token),
            _ => bail!("{name} response did not include a token"),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[allow(clippy::implicit_return)]
    async fn user_login(&self, username: &str, password: &str) -> Result<String> {
        let req = self
            .client
            .post(self.endpoint("/api/login"))
            .json(&UserLoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            });

        return self.token_from(req, "user login").await;
    }

    #[allow(clippy::implicit_return)]
    async fn user_signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<String>> {
        let req = self
            .client
            .post(self.endpoint("/api/signup"))
            .json(&UserSignupRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            });

        let body: TokenResponse = self.send_json(req, "user signup").await?;
        return Ok(body.token.filter(|token| return !token.is_empty()));
    }

    #[allow(clippy::implicit_return)]
    async fn admin_login(&self, email: &str, password: &str) -> Result<String> {
        let req = self
            .client
            .post(self.endpoint("/api/admin/login"))
            .json(&AdminLoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });

        return self.token_from(req, "admin login").await;
    }

    #[allow(clippy::implicit_return)]
    async fn submit_query(&self, question: &str, token: Option<&str>) -> QueryOutcome {
        let mut req = self
            .client
            .post(self.endpoint("/api/query"))
            .json(&QueryRequest {
                question: question.to_string(),
            });

        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        let res = match req.send().await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Query request did not get a response");
                return QueryOutcome::Network;
            }
        };

        let status = res.status();
        let body = match res.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to read query response");
                return QueryOutcome::Network;
            }
        };

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Query was not answered");
            return query_failure(status, &body);
        }

        match serde_json::from_str::<QueryResponse>(&body) {
            Ok(parsed) => {
                tracing::debug!(body = ?parsed, "Query response");
                return QueryOutcome::answered(parsed.answer);
            }
            Err(err) => {
                tracing::error!(error = ?err, "Query response was not valid JSON");
                return QueryOutcome::Failed;
            }
        }
    }

    #[allow(clippy::implicit_return)]
    async fn chat_history(&self, token: &str) -> Result<Vec<HistoryRecord>> {
        let req = self
            .client
            .get(self.endpoint("/api/chat-history"))
            .bearer_auth(token);

        let body: HistoryResponse = self.send_json(req, "chat history").await?;
        return Ok(body.history);
    }

    #[allow(clippy::implicit_return)]
    async fn admin_chat_history(&self, token: &str) -> Result<Vec<HistoryRecord>> {
        let req = self
            .client
            .get(self.endpoint("/api/admin/chat-history"))
            .bearer_auth(token);

        let body: HistoryResponse = self.send_json(req, "admin chat history").await?;
        return Ok(body.history);
    }

    #[allow(clippy::implicit_return)]
    async fn unanswered_queries(&self) -> Result<Vec<UnansweredQuery>> {
        let req = self.client.get(self.endpoint("/api/unanswered-queries"));

        let body: UnansweredQueriesResponse = self.send_json(req, "unanswered queries").await?;
        return Ok(body.queries);
    }

    #[allow(clippy::implicit_return)]
    async fn add_response(&self, id: &str, response: &str) -> Result<()> {
        let req = self
            .client
            .post(self.endpoint("/api/add-response"))
            .json(&AddResponseRequest {
                id: id.to_string(),
                response: response.to_string(),
            });

        self.send(req, "add response").await?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn delete_query(&self, id: &str) -> Result<()> {
        let url = self.endpoint_with_segments(&["api", "delete-query", id])?;
        let req = self.client.delete(url);

        self.send(req, "delete query").await?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn admin_stats(&self, token: &str) -> Result<AdminStats> {
        let req = self
            .client
            .get(self.endpoint("/api/admin/stats"))
            .bearer_auth(token);

        return self.send_json(req, "admin stats").await;
    }

    #[allow(clippy::implicit_return)]
    async fn query_analytics(&self, token: &str) -> Result<QueryAnalytics> {
        let req = self
            .client
            .get(self.endpoint("/api/admin/query-analytics"))
            .bearer_auth(token);

        return self.send_json(req, "query analytics").await;
    }

    #[allow(clippy::implicit_return)]
    async fn list_pdfs(&self, token: &str) -> Result<Vec<PdfDocument>> {
        let req = self
            .client
            .get(self.endpoint("/api/pdfs/"))
            .bearer_auth(token);

        let body: PdfListResponse = self.send_json(req, "list pdfs").await?;
        return Ok(body.pdfs);
    }

    #[allow(clippy::implicit_return)]
    async fn upload_pdf(&self, token: &str, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let req = self
            .client
            .post(self.endpoint("/api/pdfs/upload"))
            .bearer_auth(token)
            .multipart(form);

        self.send(req, "upload pdf").await?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn delete_pdf(&self, token: &str, public_id: &str) -> Result<()> {
        let url = self.endpoint_with_segments(&["api", "pdfs", public_id])?;
        let req = self.client.delete(url).bearer_auth(token);

        self.send(req, "delete pdf").await?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn rebuild_embeddings(&self, token: &str) -> Result<()> {
        let req = self
            .client
            .post(self.endpoint("/api/pdfs/rebuild-embeddings"))
            .bearer_auth(token)
            .json(&serde_json::json!({}));

        self.send(req, "rebuild embeddings").await?;
        return Ok(());
    }
}
