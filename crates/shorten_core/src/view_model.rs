use crate::{DecodePhase, ShortenRecord, SubmitPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub shorten: ShortenView,
    pub decode: DecodeView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortenView {
    pub input: String,
    pub callback_input: String,
    pub phase: SubmitPhase,
    pub attempts: u32,
    pub max_attempts: u32,
    pub error: Option<String>,
    /// Clipboard problems; shown without failing the workflow.
    pub notice: Option<String>,
    pub record: Option<ShortenRecord>,
    pub short_url: Option<String>,
    pub copied: bool,
}

impl ShortenView {
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            SubmitPhase::Validating | SubmitPhase::Submitting | SubmitPhase::Polling
        )
    }

    pub fn button_label(&self) -> &'static str {
        match self.phase {
            SubmitPhase::Validating | SubmitPhase::Submitting => "Submitting...",
            SubmitPhase::Polling => "Processing...",
            SubmitPhase::Idle | SubmitPhase::Succeeded | SubmitPhase::Failed => "Shorten URL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodeView {
    pub input: String,
    pub phase: DecodePhase,
    pub normalized_url: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub record: Option<ShortenRecord>,
    pub copied: bool,
}

impl DecodeView {
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, DecodePhase::Normalizing | DecodePhase::LookingUp)
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_busy() {
            "Decoding..."
        } else {
            "Decode URL"
        }
    }
}
