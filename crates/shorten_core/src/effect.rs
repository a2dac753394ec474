use std::time::Duration;

use crate::{Form, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the long URL to the encode endpoint.
    SubmitUrl {
        generation: Generation,
        long_url: String,
        callback_url: Option<String>,
    },
    /// Deliver `Msg::PollTick` for `generation` after `delay`.
    SchedulePoll {
        generation: Generation,
        delay: Duration,
    },
    /// Look the record up by its original long URL.
    LookupLongUrl {
        generation: Generation,
        long_url: String,
    },
    /// Look the record up by its short URL.
    DecodeShortUrl {
        generation: Generation,
        shorten_url: String,
    },
    /// Write `text` to the clipboard and report `Msg::CopyCompleted`.
    CopyToClipboard {
        form: Form,
        generation: Generation,
        text: String,
    },
    /// Deliver `Msg::CopyResetElapsed` after `delay`.
    ScheduleCopyReset {
        form: Form,
        generation: Generation,
        delay: Duration,
    },
}
