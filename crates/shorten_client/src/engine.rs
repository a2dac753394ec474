use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use shorten_logging::{shorten_debug, shorten_info, shorten_warn};

use crate::{ApiClient, ClientError, ClientSettings, EngineEvent, ReqwestApiClient, Ticket};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to configure api client: {0}")]
    Client(#[from] ClientError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Receives engine events. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Submit {
        ticket: Ticket,
        long_url: String,
        callback_url: Option<String>,
    },
    LookupLongUrl {
        ticket: Ticket,
        long_url: String,
    },
    DecodeShortUrl {
        ticket: Ticket,
        shorten_url: String,
    },
    Schedule {
        ticket: Ticket,
        delay: Duration,
    },
}

/// Runs API calls and timers on a background tokio runtime.
///
/// Every command completes with exactly one [`EngineEvent`] carrying the
/// caller's ticket. Dropping the handle stops the runtime and abandons
/// anything still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestApiClient::new(settings)?);
        Self::with_api(api, sink)
    }

    pub fn with_api(
        api: Arc<dyn ApiClient>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, sink.as_ref()).await;
                });
            }
            shorten_debug!("engine command channel closed; shutting down runtime");
        });

        Ok(Self { cmd_tx })
    }

    pub fn submit(&self, ticket: Ticket, long_url: impl Into<String>, callback_url: Option<String>) {
        self.send(EngineCommand::Submit {
            ticket,
            long_url: long_url.into(),
            callback_url,
        });
    }

    pub fn lookup_long_url(&self, ticket: Ticket, long_url: impl Into<String>) {
        self.send(EngineCommand::LookupLongUrl {
            ticket,
            long_url: long_url.into(),
        });
    }

    pub fn decode_short_url(&self, ticket: Ticket, shorten_url: impl Into<String>) {
        self.send(EngineCommand::DecodeShortUrl {
            ticket,
            shorten_url: shorten_url.into(),
        });
    }

    /// Emits [`EngineEvent::TimerElapsed`] for `ticket` after `delay`.
    pub fn schedule(&self, ticket: Ticket, delay: Duration) {
        self.send(EngineCommand::Schedule { ticket, delay });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            shorten_warn!("engine is no longer running; command dropped");
        }
    }
}

async fn handle_command(api: &dyn ApiClient, command: EngineCommand, sink: &dyn EventSink) {
    let event = match command {
        EngineCommand::Submit {
            ticket,
            long_url,
            callback_url,
        } => {
            let result = api.submit(&long_url, callback_url.as_deref()).await;
            log_outcome("submit", ticket, &result);
            EngineEvent::Submitted { ticket, result }
        }
        EngineCommand::LookupLongUrl { ticket, long_url } => {
            let result = api.lookup_by_long_url(&long_url).await;
            match &result {
                Err(err) if err.is_not_found() => {
                    shorten_debug!("lookup ticket={} not ready yet", ticket);
                }
                _ => log_outcome("lookup", ticket, &result),
            }
            EngineEvent::LongUrlLookedUp { ticket, result }
        }
        EngineCommand::DecodeShortUrl {
            ticket,
            shorten_url,
        } => {
            let result = api.lookup_by_short_url(&shorten_url).await;
            log_outcome("decode", ticket, &result);
            EngineEvent::ShortUrlDecoded { ticket, result }
        }
        EngineCommand::Schedule { ticket, delay } => {
            tokio::time::sleep(delay).await;
            EngineEvent::TimerElapsed { ticket }
        }
    };
    sink.emit(event);
}

fn log_outcome<T>(operation: &str, ticket: Ticket, result: &Result<T, ClientError>) {
    match result {
        Ok(_) => shorten_info!("{} ticket={} ok", operation, ticket),
        Err(err) => shorten_warn!(
            "{} ticket={} failed ({}): {}",
            operation,
            ticket,
            err.kind,
            err.message
        ),
    }
}
