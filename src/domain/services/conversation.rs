#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use crate::domain::models::Exchange;
use crate::domain::models::ExchangeId;
use crate::domain::models::QueryOutcome;
use crate::domain::models::QueryRequest;
use crate::domain::models::Session;

/// Ordered exchanges of the current panel session. Ids keep counting across
/// resets, so an answer to a dropped exchange never matches a new one.
#[derive(Default)]
pub struct Conversation {
    exchanges: Vec<Exchange>,
    in_flight: bool,
    next_id: u64,
}

impl Conversation {
    #[cfg(test)]
    pub fn exchanges(&self) -> &[Exchange] {
        return &self.exchanges;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        return self.exchanges.len();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        return self.exchanges.is_empty();
    }

    pub fn is_in_flight(&self) -> bool {
        return self.in_flight;
    }

    pub fn get(&self, id: ExchangeId) -> Option<&Exchange> {
        return self.exchanges.iter().find(|e| return e.id() == id);
    }

    /// Appends a pending exchange and returns the request to send for it.
    /// Blank text, or a submission while another one is pending, is ignored.
    pub fn submit(&mut self, text: &str, session: &Session) -> Option<QueryRequest> {
        let question = text.trim();
        if question.is_empty() || self.in_flight {
            return None;
        }

        self.next_id += 1;
        let id = ExchangeId(self.next_id);
        let exchange = Exchange::new(id, question);
        let question = exchange.query().to_string();
        self.exchanges.push(exchange);
        self.in_flight = true;

        tracing::debug!(id = id.0, "Submitting query");

        return Some(QueryRequest {
            id,
            question,
            token: session.user_token.clone(),
        });
    }

    /// Resolves the pending exchange with this id and returns its display
    /// text. Unknown or already resolved ids leave everything untouched.
    pub fn resolve(&mut self, id: ExchangeId, outcome: &QueryOutcome) -> Option<&str> {
        let idx = self
            .exchanges
            .iter()
            .position(|e| return e.id() == id && e.is_pending())?;

        let pending = self.exchanges[idx].clone();
        self.exchanges[idx] = pending.resolve(&outcome.display_text());
        self.in_flight = false;

        tracing::debug!(id = id.0, error = outcome.is_error(), "Resolved query");

        return self.exchanges[idx].response();
    }

    /// Drops every exchange. Any answer still on its way is discarded when it
    /// arrives.
    pub fn reset(&mut self) {
        self.exchanges.clear();
        self.in_flight = false;
    }
}
