#[cfg(test)]
#[path = "exchange_test.rs"]
mod tests;

use std::fmt;

use chrono::DateTime;
use chrono::Local;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(pub u64);

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

/// One user query and its eventual answer. An exchange starts out `Pending`
/// and moves to `Resolved` exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exchange {
    Pending {
        id: ExchangeId,
        query: String,
        submitted_at: DateTime<Local>,
    },
    Resolved {
        id: ExchangeId,
        query: String,
        submitted_at: DateTime<Local>,
        response: String,
    },
}

impl Exchange {
    pub fn new(id: ExchangeId, query: &str) -> Exchange {
        return Exchange::Pending {
            id,
            query: query.to_string(),
            submitted_at: Local::now(),
        };
    }

    pub fn id(&self) -> ExchangeId {
        match self {
            Exchange::Pending { id, .. } | Exchange::Resolved { id, .. } => return *id,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Exchange::Pending { query, .. } | Exchange::Resolved { query, .. } => return query,
        }
    }

    pub fn submitted_at(&self) -> DateTime<Local> {
        match self {
            Exchange::Pending { submitted_at, .. } | Exchange::Resolved { submitted_at, .. } => {
                return *submitted_at
            }
        }
    }

    pub fn response(&self) -> Option<&str> {
        match self {
            Exchange::Pending { .. } => return None,
            Exchange::Resolved { response, .. } => return Some(response),
        }
    }

    pub fn is_pending(&self) -> bool {
        return matches!(self, Exchange::Pending { .. });
    }

    /// Consumes a pending exchange and returns its resolved form. Resolving an
    /// already resolved exchange keeps the first response.
    pub fn resolve(self, response: &str) -> Exchange {
        match self {
            Exchange::Pending {
                id,
                query,
                submitted_at,
            } => {
                return Exchange::Resolved {
                    id,
                    query,
                    submitted_at,
                    response: response.to_string(),
                };
            }
            resolved => return resolved,
        }
    }
}
