//! Shorten client: HTTP access to the shortening service and a background
//! engine that runs requests and timers off the UI thread.
mod client;
mod engine;
mod types;

pub use client::{ApiClient, ClientSettings, ReqwestApiClient, DEFAULT_API_BASE_URL};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use types::{
    ClientError, ClientErrorKind, EngineEvent, Envelope, ShortenRecord, SubmitRequest, Ticket,
};
