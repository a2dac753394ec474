use shorten_core::{AppViewModel, DecodePhase, DecodeView, ShortenView, SubmitPhase};

/// Renders the sections of `view` that differ from `previous` as output lines.
pub fn render_changes(previous: &AppViewModel, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if previous.shorten != view.shorten {
        lines.extend(render_shorten(&view.shorten));
    }
    if previous.decode != view.decode {
        lines.extend(render_decode(&view.decode));
    }
    lines
}

pub fn render_shorten(view: &ShortenView) -> Vec<String> {
    let status = match view.phase {
        SubmitPhase::Idle => return Vec::new(),
        SubmitPhase::Validating | SubmitPhase::Submitting => view.button_label().to_string(),
        SubmitPhase::Polling if view.attempts == 0 => view.button_label().to_string(),
        SubmitPhase::Polling => format!(
            "{} (attempt {}/{})",
            view.button_label(),
            view.attempts,
            view.max_attempts
        ),
        SubmitPhase::Succeeded => "Done".to_string(),
        SubmitPhase::Failed => "Failed".to_string(),
    };

    let mut lines = vec![format!("[shorten] {status}")];
    if let Some(error) = &view.error {
        lines.push(format!("[shorten] error: {error}"));
    }
    if let Some(short_url) = &view.short_url {
        let copied = if view.copied { " (copied)" } else { "" };
        lines.push(format!("[shorten] short url: {short_url}{copied}"));
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("[shorten] {notice}"));
    }
    lines
}

pub fn render_decode(view: &DecodeView) -> Vec<String> {
    let status = match view.phase {
        DecodePhase::Idle => return Vec::new(),
        DecodePhase::Normalizing | DecodePhase::LookingUp => match &view.normalized_url {
            Some(url) => format!("{} {url}", view.button_label()),
            None => view.button_label().to_string(),
        },
        DecodePhase::Succeeded => "Done".to_string(),
        DecodePhase::Failed => "Failed".to_string(),
    };

    let mut lines = vec![format!("[decode] {status}")];
    if let Some(error) = &view.error {
        lines.push(format!("[decode] error: {error}"));
    }
    if let Some(record) = &view.record {
        let copied = if view.copied { " (copied)" } else { "" };
        lines.push(format!("[decode] long url: {}{copied}", record.long_url));
        lines.push(format!("[decode] status: {}", record.status));
        lines.push(format!("[decode] code: {}", record.code));
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("[decode] {notice}"));
    }
    lines
}
