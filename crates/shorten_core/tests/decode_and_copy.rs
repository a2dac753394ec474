use pretty_assertions::assert_eq;
use shorten_core::{
    update, AppState, DecodePhase, Effect, Form, Hosts, Msg, PollPolicy, ShortenRecord,
    SubmitPhase, COPY_RESET_DELAY, DECODE_FALLBACK, EMPTY_DECODE_INPUT, NO_DATA,
};

fn init_logging() {
    shorten_logging::initialize_for_tests();
}

fn decoded(long_url: &str) -> ShortenRecord {
    ShortenRecord {
        id: 1,
        status: "encoded".to_string(),
        code: "abc123".to_string(),
        long_url: long_url.to_string(),
        ..ShortenRecord::default()
    }
}

fn decode(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::DecodeInputChanged(input.to_string()));
    update(state, Msg::DecodeSubmitted)
}

fn lookup_target(effects: &[Effect]) -> &str {
    match effects {
        [Effect::DecodeShortUrl { shorten_url, .. }] => shorten_url.as_str(),
        other => panic!("expected one decode effect, got {other:?}"),
    }
}

#[test]
fn bare_code_is_expanded_on_decode_host() {
    init_logging();
    let (state, effects) = decode(AppState::new(), "  abc123 ");
    assert_eq!(lookup_target(&effects), "http://localhost:8080/api/v1/abc123");

    let view = state.view().decode;
    assert_eq!(view.phase, DecodePhase::LookingUp);
    assert_eq!(view.button_label(), "Decoding...");
    assert_eq!(
        view.normalized_url.as_deref(),
        Some("http://localhost:8080/api/v1/abc123")
    );
}

#[test]
fn configured_redirect_host_expands_codes() {
    init_logging();
    let state = AppState::with_config(
        Hosts::from_redirect_host(Some("https://sho.rt/")),
        PollPolicy::default(),
    );
    let (_, effects) = decode(state, "abc123");
    assert_eq!(lookup_target(&effects), "https://sho.rt/abc123");
}

#[test]
fn host_and_path_input_gets_http_scheme() {
    init_logging();
    let (_, effects) = decode(AppState::new(), "example.com/abc");
    assert_eq!(lookup_target(&effects), "http://example.com/abc");

    let (_, effects) = decode(AppState::new(), "https://x/y");
    assert_eq!(lookup_target(&effects), "https://x/y");
}

#[test]
fn blank_decode_input_fails_locally() {
    init_logging();
    let (state, effects) = decode(AppState::new(), "   ");
    assert!(effects.is_empty());
    let view = state.view().decode;
    assert_eq!(view.phase, DecodePhase::Failed);
    assert_eq!(view.error.as_deref(), Some(EMPTY_DECODE_INPUT));
}

#[test]
fn decode_success_and_failures() {
    init_logging();
    let (state, _) = decode(AppState::new(), "abc123");
    let generation = state.decode_generation();
    let (state, effects) = update(
        state,
        Msg::DecodeCompleted {
            generation,
            result: Ok(Some(decoded("https://example.com/long"))),
        },
    );
    assert!(effects.is_empty());
    let view = state.view().decode;
    assert_eq!(view.phase, DecodePhase::Succeeded);
    assert_eq!(view.record, Some(decoded("https://example.com/long")));

    let (state, _) = decode(state, "abc123");
    let generation = state.decode_generation();
    let (state, _) = update(
        state,
        Msg::DecodeCompleted {
            generation,
            result: Ok(None),
        },
    );
    assert_eq!(state.view().decode.error.as_deref(), Some(NO_DATA));

    let (state, _) = decode(state, "abc123");
    let generation = state.decode_generation();
    let (state, _) = update(
        state,
        Msg::DecodeCompleted {
            generation,
            result: Err(String::new()),
        },
    );
    let view = state.view().decode;
    assert_eq!(view.phase, DecodePhase::Failed);
    assert_eq!(view.error.as_deref(), Some(DECODE_FALLBACK));
    assert_eq!(view.record, None);
}

#[test]
fn stale_decode_result_is_dropped() {
    init_logging();
    let (state, _) = decode(AppState::new(), "first");
    let stale = state.decode_generation();
    let (state, _) = decode(state, "second");

    let (state, _) = update(
        state,
        Msg::DecodeCompleted {
            generation: stale,
            result: Ok(Some(decoded("https://stale.example.com"))),
        },
    );
    let view = state.view().decode;
    assert_eq!(view.phase, DecodePhase::LookingUp);
    assert_eq!(view.record, None);
}

fn shortened_state() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::ShortenInputChanged("https://example.com".to_string()),
    );
    let (state, _) = update(state, Msg::ShortenSubmitted);
    let generation = state.shorten_generation();
    let (state, _) = update(
        state,
        Msg::SubmitCompleted {
            generation,
            result: Ok(()),
        },
    );
    let (state, _) = update(state, Msg::PollTick { generation });
    let (state, _) = update(
        state,
        Msg::PollCompleted {
            generation,
            result: Ok(Some(ShortenRecord {
                status: "encoded".to_string(),
                code: "xyz".to_string(),
                long_url: "https://example.com".to_string(),
                ..ShortenRecord::default()
            })),
        },
    );
    assert_eq!(state.view().shorten.phase, SubmitPhase::Succeeded);
    state
}

#[test]
fn copy_needs_a_result() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::CopyRequested(Form::Shorten));
    assert!(effects.is_empty());
}

#[test]
fn copy_sets_and_resets_indicator() {
    init_logging();
    let state = shortened_state();
    let generation = state.shorten_generation();

    let (state, effects) = update(state, Msg::CopyRequested(Form::Shorten));
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            form: Form::Shorten,
            generation,
            text: "http://localhost:8080/xyz".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::CopyCompleted {
            form: Form::Shorten,
            generation,
            result: Ok(()),
        },
    );
    assert!(state.view().shorten.copied);
    assert_eq!(
        effects,
        vec![Effect::ScheduleCopyReset {
            form: Form::Shorten,
            generation,
            delay: COPY_RESET_DELAY,
        }]
    );

    let (state, _) = update(
        state,
        Msg::CopyResetElapsed {
            form: Form::Shorten,
            generation,
        },
    );
    assert!(!state.view().shorten.copied);
}

#[test]
fn copy_failure_is_a_notice_not_a_workflow_failure() {
    init_logging();
    let state = shortened_state();
    let generation = state.shorten_generation();

    let (state, effects) = update(
        state,
        Msg::CopyCompleted {
            form: Form::Shorten,
            generation,
            result: Err("terminal closed".to_string()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view().shorten;
    assert_eq!(view.phase, SubmitPhase::Succeeded);
    assert_eq!(view.notice.as_deref(), Some("Failed to copy to clipboard"));
    assert_eq!(view.error, None);
    assert!(!view.copied);

    let (state, _) = update(state, Msg::ErrorDismissed(Form::Shorten));
    let view = state.view().shorten;
    assert_eq!(view.notice, None);
    assert_eq!(view.phase, SubmitPhase::Succeeded);
}

#[test]
fn decode_form_copies_long_url() {
    init_logging();
    let (state, _) = decode(AppState::new(), "abc123");
    let generation = state.decode_generation();
    let (state, _) = update(
        state,
        Msg::DecodeCompleted {
            generation,
            result: Ok(Some(decoded("https://example.com/long"))),
        },
    );

    let (_, effects) = update(state, Msg::CopyRequested(Form::Decode));
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            form: Form::Decode,
            generation,
            text: "https://example.com/long".to_string(),
        }]
    );
}

#[test]
fn dismissing_an_error_keeps_failed_phase() {
    init_logging();
    let (state, _) = decode(AppState::new(), "");
    let (state, _) = update(state, Msg::ErrorDismissed(Form::Decode));
    let view = state.view().decode;
    assert_eq!(view.error, None);
    assert_eq!(view.phase, DecodePhase::Failed);
    assert_eq!(view.button_label(), "Decode URL");
}
