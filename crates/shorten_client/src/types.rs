use std::fmt;

use serde::{Deserialize, Serialize};

pub type Ticket = u64;

/// Wrapper the service puts around every response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// One shortening job as serialized by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortenRecord {
    pub id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub status: String,
    pub code: String,
    pub long_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub long_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Only the part of an error body the client shows.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True for the 404 a long-URL lookup returns while encoding is still running.
    pub fn is_not_found(&self) -> bool {
        self.kind == ClientErrorKind::NotFound
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    NotFound,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
    InvalidBaseUrl,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErrorKind::NotFound => write!(f, "not found"),
            ClientErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ClientErrorKind::Timeout => write!(f, "timeout"),
            ClientErrorKind::Network => write!(f, "network error"),
            ClientErrorKind::InvalidResponse => write!(f, "invalid response body"),
            ClientErrorKind::InvalidBaseUrl => write!(f, "invalid base url"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Submitted {
        ticket: Ticket,
        result: Result<Envelope<serde_json::Value>, ClientError>,
    },
    LongUrlLookedUp {
        ticket: Ticket,
        result: Result<Envelope<ShortenRecord>, ClientError>,
    },
    ShortUrlDecoded {
        ticket: Ticket,
        result: Result<Envelope<ShortenRecord>, ClientError>,
    },
    TimerElapsed {
        ticket: Ticket,
    },
}

impl EngineEvent {
    pub fn ticket(&self) -> Ticket {
        match self {
            EngineEvent::Submitted { ticket, .. }
            | EngineEvent::LongUrlLookedUp { ticket, .. }
            | EngineEvent::ShortUrlDecoded { ticket, .. }
            | EngineEvent::TimerElapsed { ticket } => *ticket,
        }
    }
}
