use crate::{Generation, ShortenRecord};

/// Which of the two forms a message or effect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Shorten,
    Decode,
}

/// Why a long-URL lookup produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// The service has no record for the URL yet (HTTP 404).
    NotFound,
    /// Any other failure, with the message to show.
    Service(String),
}

/// Outcome of one long-URL lookup. `Ok(None)` means the envelope carried no data.
pub type LookupResult = Result<Option<ShortenRecord>, LookupFailure>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the long URL input.
    ShortenInputChanged(String),
    /// User edited the optional callback URL input.
    CallbackInputChanged(String),
    /// User submitted the shorten form.
    ShortenSubmitted,
    /// The submit request finished.
    SubmitCompleted {
        generation: Generation,
        result: Result<(), String>,
    },
    /// The delay before the next poll elapsed.
    PollTick { generation: Generation },
    /// A long-URL lookup finished.
    PollCompleted {
        generation: Generation,
        result: LookupResult,
    },
    /// User edited the decode input.
    DecodeInputChanged(String),
    /// User submitted the decode form.
    DecodeSubmitted,
    /// The decode lookup finished.
    DecodeCompleted {
        generation: Generation,
        result: Result<Option<ShortenRecord>, String>,
    },
    /// User asked to copy the form's result link.
    CopyRequested(Form),
    /// The clipboard write finished.
    CopyCompleted {
        form: Form,
        generation: Generation,
        result: Result<(), String>,
    },
    /// The "copied" indicator should be cleared.
    CopyResetElapsed { form: Form, generation: Generation },
    /// User closed the error shown on a form.
    ErrorDismissed(Form),
    /// Fallback for placeholder wiring.
    NoOp,
}
