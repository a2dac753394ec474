use std::time::Duration;

use crate::view_model::{AppViewModel, DecodeView, ShortenView};
use crate::{
    join_on_host, ShortenRecord, WorkflowError, DEFAULT_DECODE_HOST, DEFAULT_SHORT_LINK_HOST,
};

/// Identifies one run of a workflow. Completions carrying an older value are stale.
pub type Generation = u64;

pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const MAX_POLL_ATTEMPTS: u32 = 30;
pub const COPY_RESET_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Hosts used to build short links and to expand bare decode codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hosts {
    pub short_link_host: String,
    pub decode_host: String,
}

impl Hosts {
    /// A configured redirect host serves both purposes; unset or blank falls
    /// back to the per-purpose defaults.
    pub fn from_redirect_host(redirect_host: Option<&str>) -> Self {
        match redirect_host.map(str::trim).filter(|host| !host.is_empty()) {
            Some(host) => Self {
                short_link_host: host.to_string(),
                decode_host: host.to_string(),
            },
            None => Self {
                short_link_host: DEFAULT_SHORT_LINK_HOST.to_string(),
                decode_host: DEFAULT_DECODE_HOST.to_string(),
            },
        }
    }
}

impl Default for Hosts {
    fn default() -> Self {
        Self::from_redirect_host(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Polling,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePhase {
    #[default]
    Idle,
    Normalizing,
    LookingUp,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ShortenForm {
    input: String,
    callback_input: String,
    phase: SubmitPhase,
    generation: Generation,
    submitted_url: Option<String>,
    attempts: u32,
    lookup_in_flight: bool,
    error: Option<WorkflowError>,
    notice: Option<String>,
    record: Option<ShortenRecord>,
    short_url: Option<String>,
    copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct DecodeForm {
    input: String,
    phase: DecodePhase,
    generation: Generation,
    normalized_url: Option<String>,
    error: Option<WorkflowError>,
    notice: Option<String>,
    record: Option<ShortenRecord>,
    copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    hosts: Hosts,
    policy: PollPolicy,
    shorten: ShortenForm,
    decode: DecodeForm,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(hosts: Hosts, policy: PollPolicy) -> Self {
        Self {
            hosts,
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let shorten = &self.shorten;
        let decode = &self.decode;
        AppViewModel {
            shorten: ShortenView {
                input: shorten.input.clone(),
                callback_input: shorten.callback_input.clone(),
                phase: shorten.phase,
                attempts: shorten.attempts,
                max_attempts: self.policy.max_attempts,
                error: shorten.error.as_ref().map(ToString::to_string),
                notice: shorten.notice.clone(),
                record: shorten.record.clone(),
                short_url: shorten.short_url.clone(),
                copied: shorten.copied,
            },
            decode: DecodeView {
                input: decode.input.clone(),
                phase: decode.phase,
                normalized_url: decode.normalized_url.clone(),
                error: decode.error.as_ref().map(ToString::to_string),
                notice: decode.notice.clone(),
                record: decode.record.clone(),
                copied: decode.copied,
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn hosts(&self) -> &Hosts {
        &self.hosts
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn shorten_generation(&self) -> Generation {
        self.shorten.generation
    }

    pub fn decode_generation(&self) -> Generation {
        self.decode.generation
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // --- shorten form ---

    pub(crate) fn shorten_input(&self) -> &str {
        &self.shorten.input
    }

    pub(crate) fn callback_input(&self) -> &str {
        &self.shorten.callback_input
    }

    pub(crate) fn set_shorten_input(&mut self, text: String) {
        if self.shorten.input != text {
            self.shorten.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_callback_input(&mut self, text: String) {
        if self.shorten.callback_input != text {
            self.shorten.callback_input = text;
            self.mark_dirty();
        }
    }

    /// Discards the previous run and opens a new generation in `Validating`.
    pub(crate) fn restart_shorten(&mut self) -> Generation {
        let form = &mut self.shorten;
        form.generation += 1;
        form.phase = SubmitPhase::Validating;
        form.submitted_url = None;
        form.attempts = 0;
        form.lookup_in_flight = false;
        form.error = None;
        form.notice = None;
        form.record = None;
        form.short_url = None;
        form.copied = false;
        self.mark_dirty();
        self.shorten.generation
    }

    pub(crate) fn begin_submitting(&mut self, long_url: String) {
        self.shorten.submitted_url = Some(long_url);
        self.shorten.phase = SubmitPhase::Submitting;
        self.mark_dirty();
    }

    pub(crate) fn begin_polling(&mut self) {
        self.shorten.phase = SubmitPhase::Polling;
        self.mark_dirty();
    }

    pub(crate) fn is_current_shorten(&self, generation: Generation, phase: SubmitPhase) -> bool {
        self.shorten.generation == generation && self.shorten.phase == phase
    }

    /// Counts one lookup attempt and returns the URL to look up, unless a
    /// lookup is already outstanding.
    pub(crate) fn issue_poll(&mut self) -> Option<String> {
        if self.shorten.lookup_in_flight {
            return None;
        }
        let long_url = self.shorten.submitted_url.clone()?;
        self.shorten.lookup_in_flight = true;
        self.shorten.attempts += 1;
        self.mark_dirty();
        Some(long_url)
    }

    /// Marks the outstanding lookup as answered. False if none was outstanding.
    pub(crate) fn finish_poll(&mut self) -> bool {
        std::mem::replace(&mut self.shorten.lookup_in_flight, false)
    }

    pub(crate) fn attempts_exhausted(&self) -> bool {
        self.shorten.attempts >= self.policy.max_attempts
    }

    pub(crate) fn succeed_shorten(&mut self, record: ShortenRecord) {
        let short_url = join_on_host(&self.hosts.short_link_host, &record.code);
        self.shorten.short_url = Some(short_url);
        self.shorten.record = Some(record);
        self.shorten.phase = SubmitPhase::Succeeded;
        self.mark_dirty();
    }

    pub(crate) fn fail_shorten(&mut self, error: WorkflowError) {
        self.shorten.error = Some(error);
        self.shorten.lookup_in_flight = false;
        self.shorten.phase = SubmitPhase::Failed;
        self.mark_dirty();
    }

    pub(crate) fn short_url(&self) -> Option<&str> {
        self.shorten.short_url.as_deref()
    }

    // --- decode form ---

    pub(crate) fn decode_input(&self) -> &str {
        &self.decode.input
    }

    pub(crate) fn set_decode_input(&mut self, text: String) {
        if self.decode.input != text {
            self.decode.input = text;
            self.mark_dirty();
        }
    }

    /// Discards the previous lookup and opens a new generation in `Normalizing`.
    pub(crate) fn restart_decode(&mut self) -> Generation {
        let form = &mut self.decode;
        form.generation += 1;
        form.phase = DecodePhase::Normalizing;
        form.normalized_url = None;
        form.error = None;
        form.notice = None;
        form.record = None;
        form.copied = false;
        self.mark_dirty();
        self.decode.generation
    }

    pub(crate) fn begin_lookup(&mut self, normalized_url: String) {
        self.decode.normalized_url = Some(normalized_url);
        self.decode.phase = DecodePhase::LookingUp;
        self.mark_dirty();
    }

    pub(crate) fn is_current_decode(&self, generation: Generation) -> bool {
        self.decode.generation == generation && self.decode.phase == DecodePhase::LookingUp
    }

    pub(crate) fn succeed_decode(&mut self, record: ShortenRecord) {
        self.decode.record = Some(record);
        self.decode.phase = DecodePhase::Succeeded;
        self.mark_dirty();
    }

    pub(crate) fn fail_decode(&mut self, error: WorkflowError) {
        self.decode.error = Some(error);
        self.decode.phase = DecodePhase::Failed;
        self.mark_dirty();
    }

    pub(crate) fn decoded_long_url(&self) -> Option<&str> {
        self.decode.record.as_ref().map(|record| record.long_url.as_str())
    }

    // --- shared by both forms ---

    pub(crate) fn generation_of(&self, form: crate::Form) -> Generation {
        match form {
            crate::Form::Shorten => self.shorten.generation,
            crate::Form::Decode => self.decode.generation,
        }
    }

    pub(crate) fn set_copied(&mut self, form: crate::Form, copied: bool) {
        let slot = match form {
            crate::Form::Shorten => &mut self.shorten.copied,
            crate::Form::Decode => &mut self.decode.copied,
        };
        if *slot != copied {
            *slot = copied;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, form: crate::Form, notice: String) {
        match form {
            crate::Form::Shorten => self.shorten.notice = Some(notice),
            crate::Form::Decode => self.decode.notice = Some(notice),
        }
        self.mark_dirty();
    }

    /// Clears the shown error and notice; the phase is left as-is.
    pub(crate) fn dismiss_error(&mut self, form: crate::Form) {
        let (error, notice) = match form {
            crate::Form::Shorten => (&mut self.shorten.error, &mut self.shorten.notice),
            crate::Form::Decode => (&mut self.decode.error, &mut self.decode.notice),
        };
        if error.is_some() || notice.is_some() {
            *error = None;
            *notice = None;
            self.mark_dirty();
        }
    }
}
