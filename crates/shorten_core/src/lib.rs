//! Shorten core: pure state machines for the shorten and decode forms.
mod effect;
mod error;
mod msg;
mod record;
mod state;
mod update;
mod urls;
mod view_model;

pub use effect::Effect;
pub use error::{
    WorkflowError, DECODE_FALLBACK, EMPTY_DECODE_INPUT, EMPTY_URL, INVALID_CALLBACK_URL,
    INVALID_URL, LOOKUP_FALLBACK, NO_DATA, SUBMIT_FALLBACK,
};
pub use msg::{Form, LookupFailure, LookupResult, Msg};
pub use record::{ShortenRecord, STATUS_ENCODED};
pub use state::{
    AppState, DecodePhase, Generation, Hosts, PollPolicy, SubmitPhase, COPY_RESET_DELAY,
    MAX_POLL_ATTEMPTS, POLL_INTERVAL,
};
pub use update::update;
pub use urls::{
    is_valid_url, join_on_host, normalize_decode_input, DEFAULT_DECODE_HOST,
    DEFAULT_SHORT_LINK_HOST,
};
pub use view_model::{AppViewModel, DecodeView, ShortenView};
