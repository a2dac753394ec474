use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};

use shorten_client::{
    ClientError, ClientSettings, EngineError, EngineEvent, EngineHandle, Envelope, EventSink,
    Ticket,
};
use shorten_core::{Effect, Form, Generation, LookupFailure, LookupResult, Msg, ShortenRecord};
use shorten_logging::{shorten_debug, shorten_info, shorten_warn};

use super::app::AppEvent;
use super::clipboard::Clipboard;

/// What an outstanding engine ticket will turn into when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Submit(Generation),
    Lookup(Generation),
    Decode(Generation),
    PollTimer(Generation),
    CopyReset(Form, Generation),
}

type PendingMap = Arc<Mutex<HashMap<Ticket, Pending>>>;

pub struct EffectRunner {
    engine: EngineHandle,
    pending: PendingMap,
    next_ticket: Ticket,
    clipboard: Box<dyn Clipboard>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        clipboard: Box<dyn Clipboard>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let sink = Arc::new(MsgSink {
            pending: pending.clone(),
            event_tx: event_tx.clone(),
        });
        let engine = EngineHandle::new(settings, sink)?;
        Ok(Self {
            engine,
            pending,
            next_ticket: 0,
            clipboard,
            event_tx,
        })
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitUrl {
                    generation,
                    long_url,
                    callback_url,
                } => {
                    shorten_info!(
                        "SubmitUrl generation={} url_len={} url={} callback={}",
                        generation,
                        long_url.len(),
                        long_url,
                        callback_url.is_some()
                    );
                    let ticket = self.track(Pending::Submit(generation));
                    self.engine.submit(ticket, long_url, callback_url);
                }
                Effect::SchedulePoll { generation, delay } => {
                    shorten_debug!("SchedulePoll generation={} delay={:?}", generation, delay);
                    let ticket = self.track(Pending::PollTimer(generation));
                    self.engine.schedule(ticket, delay);
                }
                Effect::LookupLongUrl {
                    generation,
                    long_url,
                } => {
                    shorten_debug!("LookupLongUrl generation={} url={}", generation, long_url);
                    let ticket = self.track(Pending::Lookup(generation));
                    self.engine.lookup_long_url(ticket, long_url);
                }
                Effect::DecodeShortUrl {
                    generation,
                    shorten_url,
                } => {
                    shorten_info!("DecodeShortUrl generation={} url={}", generation, shorten_url);
                    let ticket = self.track(Pending::Decode(generation));
                    self.engine.decode_short_url(ticket, shorten_url);
                }
                Effect::CopyToClipboard {
                    form,
                    generation,
                    text,
                } => {
                    let result = self.clipboard.copy(&text).map_err(|err| {
                        shorten_warn!("clipboard write failed: {}", err);
                        err.to_string()
                    });
                    // Delivered through the inbox so `update` sees it after this batch.
                    let _ = self.event_tx.send(AppEvent::Msgs(vec![Msg::CopyCompleted {
                        form,
                        generation,
                        result,
                    }]));
                }
                Effect::ScheduleCopyReset {
                    form,
                    generation,
                    delay,
                } => {
                    let ticket = self.track(Pending::CopyReset(form, generation));
                    self.engine.schedule(ticket, delay);
                }
            }
        }
    }

    fn track(&mut self, pending: Pending) -> Ticket {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Ok(mut map) = self.pending.lock() {
            map.insert(ticket, pending);
        }
        ticket
    }
}

/// Turns engine events back into core messages using the ticket table.
struct MsgSink {
    pending: PendingMap,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let ticket = event.ticket();
        let pending = self
            .pending
            .lock()
            .ok()
            .and_then(|mut map| map.remove(&ticket));
        let Some(pending) = pending else {
            shorten_warn!("engine event for unknown ticket {}", ticket);
            return;
        };

        match to_msg(pending, event) {
            Some(msg) => {
                let _ = self.event_tx.send(AppEvent::Msgs(vec![msg]));
            }
            None => shorten_warn!("engine event did not match {:?} for ticket {}", pending, ticket),
        }
    }
}

fn to_msg(pending: Pending, event: EngineEvent) -> Option<Msg> {
    let msg = match (pending, event) {
        (Pending::Submit(generation), EngineEvent::Submitted { result, .. }) => {
            Msg::SubmitCompleted {
                generation,
                result: result.map(|_| ()).map_err(|err| err.message),
            }
        }
        (Pending::Lookup(generation), EngineEvent::LongUrlLookedUp { result, .. }) => {
            Msg::PollCompleted {
                generation,
                result: to_lookup_result(result),
            }
        }
        (Pending::Decode(generation), EngineEvent::ShortUrlDecoded { result, .. }) => {
            Msg::DecodeCompleted {
                generation,
                result: result
                    .map(|envelope| envelope.data.map(to_core_record))
                    .map_err(|err| err.message),
            }
        }
        (Pending::PollTimer(generation), EngineEvent::TimerElapsed { .. }) => {
            Msg::PollTick { generation }
        }
        (Pending::CopyReset(form, generation), EngineEvent::TimerElapsed { .. }) => {
            Msg::CopyResetElapsed { form, generation }
        }
        _ => return None,
    };
    Some(msg)
}

fn to_lookup_result(
    result: Result<Envelope<shorten_client::ShortenRecord>, ClientError>,
) -> LookupResult {
    match result {
        Ok(envelope) => Ok(envelope.data.map(to_core_record)),
        Err(err) if err.is_not_found() => Err(LookupFailure::NotFound),
        Err(err) => Err(LookupFailure::Service(err.message)),
    }
}

fn to_core_record(record: shorten_client::ShortenRecord) -> ShortenRecord {
    ShortenRecord {
        id: record.id,
        created_at: record.created_at,
        updated_at: record.updated_at,
        status: record.status,
        code: record.code,
        long_url: record.long_url,
    }
}
