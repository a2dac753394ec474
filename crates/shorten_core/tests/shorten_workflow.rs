use std::sync::Once;
use std::time::Duration;

use pretty_assertions::assert_eq;
use shorten_core::{
    update, AppState, Effect, Generation, Hosts, LookupFailure, LookupResult, Msg, PollPolicy,
    ShortenRecord, SubmitPhase, WorkflowError, EMPTY_URL, INVALID_CALLBACK_URL, INVALID_URL,
    LOOKUP_FALLBACK, MAX_POLL_ATTEMPTS, POLL_INTERVAL, SUBMIT_FALLBACK,
};

const LONG_URL: &str = "https://example.com/some/very/long/path?q=1";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shorten_logging::initialize_for_tests);
}

fn record(status: &str, code: &str) -> ShortenRecord {
    ShortenRecord {
        id: 7,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:01Z".to_string(),
        status: status.to_string(),
        code: code.to_string(),
        long_url: LONG_URL.to_string(),
    }
}

fn submit(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::ShortenInputChanged(input.to_string()));
    update(state, Msg::ShortenSubmitted)
}

/// Submits `LONG_URL` and acknowledges the submit, leaving the form polling.
fn submitted_and_polling(state: AppState) -> (AppState, Generation) {
    let (state, effects) = submit(state, LONG_URL);
    let generation = state.shorten_generation();
    assert_eq!(
        effects,
        vec![Effect::SubmitUrl {
            generation,
            long_url: LONG_URL.to_string(),
            callback_url: None,
        }]
    );

    let (state, effects) = update(
        state,
        Msg::SubmitCompleted {
            generation,
            result: Ok(()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            generation,
            delay: state.policy().interval,
        }]
    );
    assert_eq!(state.view().shorten.phase, SubmitPhase::Polling);
    (state, generation)
}

/// Plays poll ticks, answering each lookup with the next scripted result,
/// until the workflow stops asking for another poll. Returns the lookup count.
fn run_polls(
    mut state: AppState,
    generation: Generation,
    mut next_result: impl FnMut(u32) -> LookupResult,
) -> (AppState, u32) {
    let mut lookups = 0;
    loop {
        let (next, effects) = update(state, Msg::PollTick { generation });
        assert_eq!(
            effects,
            vec![Effect::LookupLongUrl {
                generation,
                long_url: LONG_URL.to_string(),
            }]
        );
        lookups += 1;

        let (next, effects) = update(
            next,
            Msg::PollCompleted {
                generation,
                result: next_result(lookups),
            },
        );
        state = next;
        match effects.as_slice() {
            [Effect::SchedulePoll { delay, .. }] => {
                assert_eq!(*delay, state.policy().interval);
            }
            [] => return (state, lookups),
            other => panic!("unexpected effects {other:?}"),
        }
    }
}

#[test]
fn default_policy_polls_every_two_seconds_thirty_times() {
    assert_eq!(POLL_INTERVAL, Duration::from_secs(2));
    assert_eq!(MAX_POLL_ATTEMPTS, 30);
    assert_eq!(
        PollPolicy::default(),
        PollPolicy {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    );
}

#[test]
fn polling_succeeds_on_third_attempt() {
    init_logging();
    let (state, generation) = submitted_and_polling(AppState::new());

    let (state, lookups) = run_polls(state, generation, |attempt| {
        if attempt < 3 {
            Ok(Some(record("pending", "")))
        } else {
            Ok(Some(record("encoded", "xyz")))
        }
    });

    assert_eq!(lookups, 3);
    let view = state.view().shorten;
    assert_eq!(view.phase, SubmitPhase::Succeeded);
    assert_eq!(view.attempts, 3);
    assert_eq!(view.short_url.as_deref(), Some("http://localhost:8080/xyz"));
    assert_eq!(view.record, Some(record("encoded", "xyz")));
    assert_eq!(view.error, None);
}

#[test]
fn short_link_uses_configured_host_without_trailing_slash() {
    init_logging();
    let state = AppState::with_config(
        Hosts::from_redirect_host(Some("https://sho.rt/")),
        PollPolicy::default(),
    );
    let (state, generation) = submitted_and_polling(state);

    let (state, lookups) = run_polls(state, generation, |_| Ok(Some(record("encoded", "abc"))));

    assert_eq!(lookups, 1);
    assert_eq!(
        state.view().shorten.short_url.as_deref(),
        Some("https://sho.rt/abc")
    );
}

#[test]
fn polling_times_out_after_exactly_max_attempts() {
    init_logging();
    let (state, generation) = submitted_and_polling(AppState::new());

    let (state, lookups) = run_polls(state, generation, |_| Err(LookupFailure::NotFound));

    assert_eq!(lookups, MAX_POLL_ATTEMPTS);
    let view = state.view().shorten;
    assert_eq!(view.phase, SubmitPhase::Failed);
    assert_eq!(view.attempts, MAX_POLL_ATTEMPTS);
    assert_eq!(view.error, Some(WorkflowError::Timeout.to_string()));
    assert_eq!(view.short_url, None);
}

#[test]
fn unknown_statuses_and_missing_data_count_as_not_ready() {
    init_logging();
    let policy = PollPolicy {
        interval: Duration::from_millis(10),
        max_attempts: 4,
    };
    let (state, generation) = submitted_and_polling(AppState::with_config(Hosts::default(), policy));

    let (state, lookups) = run_polls(state, generation, |attempt| match attempt {
        1 => Ok(None),
        2 => Ok(Some(record("submitted", ""))),
        3 => Ok(Some(record("some-future-status", "ignored"))),
        _ => Err(LookupFailure::NotFound),
    });

    assert_eq!(lookups, 4);
    assert_eq!(
        state.view().shorten.error,
        Some(WorkflowError::Timeout.to_string())
    );
}

#[test]
fn lookup_service_error_fails_without_retry() {
    init_logging();
    let (state, generation) = submitted_and_polling(AppState::new());

    let (state, lookups) = run_polls(state, generation, |_| {
        Err(LookupFailure::Service("database unavailable".to_string()))
    });

    assert_eq!(lookups, 1);
    let view = state.view().shorten;
    assert_eq!(view.phase, SubmitPhase::Failed);
    assert_eq!(view.error.as_deref(), Some("database unavailable"));
}

#[test]
fn lookup_service_error_without_message_uses_fallback() {
    init_logging();
    let (state, generation) = submitted_and_polling(AppState::new());

    let (state, _) = run_polls(state, generation, |_| {
        Err(LookupFailure::Service(String::new()))
    });

    assert_eq!(state.view().shorten.error.as_deref(), Some(LOOKUP_FALLBACK));
}

#[test]
fn submit_failure_short_circuits_with_zero_polls() {
    init_logging();
    let (state, _) = submit(AppState::new(), LONG_URL);
    let generation = state.shorten_generation();

    let (state, effects) = update(
        state,
        Msg::SubmitCompleted {
            generation,
            result: Err("long_url is required".to_string()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view().shorten;
    assert_eq!(view.phase, SubmitPhase::Failed);
    assert_eq!(view.attempts, 0);
    assert_eq!(view.error.as_deref(), Some("long_url is required"));

    // A late tick for the failed run does nothing.
    let (state, effects) = update(state, Msg::PollTick { generation });
    assert!(effects.is_empty());
    assert_eq!(state.view().shorten.attempts, 0);
}

#[test]
fn submit_failure_without_message_uses_fallback() {
    init_logging();
    let (state, _) = submit(AppState::new(), LONG_URL);
    let generation = state.shorten_generation();
    let (state, _) = update(
        state,
        Msg::SubmitCompleted {
            generation,
            result: Err(String::new()),
        },
    );
    assert_eq!(state.view().shorten.error.as_deref(), Some(SUBMIT_FALLBACK));
}

#[test]
fn empty_and_invalid_input_fail_without_network() {
    init_logging();
    for (input, expected) in [
        ("", EMPTY_URL),
        ("   ", EMPTY_URL),
        ("not a url", INVALID_URL),
        ("ftp://example.com/file", INVALID_URL),
        ("example.com", INVALID_URL),
    ] {
        let (state, effects) = submit(AppState::new(), input);
        assert!(effects.is_empty(), "input {input:?} produced effects");
        let view = state.view().shorten;
        assert_eq!(view.phase, SubmitPhase::Failed);
        assert_eq!(view.error.as_deref(), Some(expected));
    }
}

#[test]
fn callback_url_is_forwarded_and_validated() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::CallbackInputChanged(" https://hooks.example.com/done ".to_string()),
    );
    let (state, effects) = submit(state, LONG_URL);
    assert_eq!(
        effects,
        vec![Effect::SubmitUrl {
            generation: state.shorten_generation(),
            long_url: LONG_URL.to_string(),
            callback_url: Some("https://hooks.example.com/done".to_string()),
        }]
    );

    let (state, _) = update(state, Msg::CallbackInputChanged("nope".to_string()));
    let (state, effects) = update(state, Msg::ShortenSubmitted);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().shorten.error.as_deref(),
        Some(INVALID_CALLBACK_URL)
    );
}

#[test]
fn duplicate_tick_while_lookup_outstanding_is_ignored() {
    init_logging();
    let (state, generation) = submitted_and_polling(AppState::new());

    let (state, first) = update(state, Msg::PollTick { generation });
    assert_eq!(first.len(), 1);
    let (state, second) = update(state, Msg::PollTick { generation });
    assert!(second.is_empty());
    assert_eq!(state.view().shorten.attempts, 1);
}

#[test]
fn new_submission_fences_out_stale_poll_sequence() {
    init_logging();
    let (state, first_generation) = submitted_and_polling(AppState::new());
    let (state, effects) = update(
        state,
        Msg::PollTick {
            generation: first_generation,
        },
    );
    assert_eq!(effects.len(), 1);

    // The user submits again while the first lookup is still in flight.
    let (state, effects) = submit(state, "https://second.example.com/");
    let second_generation = state.shorten_generation();
    assert_ne!(first_generation, second_generation);
    assert_eq!(
        effects,
        vec![Effect::SubmitUrl {
            generation: second_generation,
            long_url: "https://second.example.com/".to_string(),
            callback_url: None,
        }]
    );

    // The first sequence's lookup resolves late and must not be applied.
    let before = state.view();
    let (mut state, effects) = update(
        state,
        Msg::PollCompleted {
            generation: first_generation,
            result: Ok(Some(record("encoded", "stale"))),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
    assert!(state.consume_dirty());

    let (state, effects) = update(
        state,
        Msg::PollTick {
            generation: first_generation,
        },
    );
    assert!(effects.is_empty());

    // The second sequence proceeds normally.
    let (state, effects) = update(
        state,
        Msg::SubmitCompleted {
            generation: second_generation,
            result: Ok(()),
        },
    );
    assert_eq!(effects.len(), 1);
    let (state, _) = update(
        state,
        Msg::PollTick {
            generation: second_generation,
        },
    );
    let (state, _) = update(
        state,
        Msg::PollCompleted {
            generation: second_generation,
            result: Ok(Some(record("encoded", "fresh"))),
        },
    );

    let view = state.view().shorten;
    assert_eq!(view.phase, SubmitPhase::Succeeded);
    assert_eq!(view.short_url.as_deref(), Some("http://localhost:8080/fresh"));
    assert_eq!(view.attempts, 1);
}

#[test]
fn resubmitting_clears_previous_result() {
    init_logging();
    let (state, generation) = submitted_and_polling(AppState::new());
    let (state, _) = run_polls(state, generation, |_| Ok(Some(record("encoded", "xyz"))));
    assert!(state.view().shorten.short_url.is_some());

    let (state, _) = submit(state, LONG_URL);
    let view = state.view().shorten;
    assert_eq!(view.phase, SubmitPhase::Submitting);
    assert_eq!(view.short_url, None);
    assert_eq!(view.record, None);
    assert_eq!(view.attempts, 0);
    assert_eq!(view.button_label(), "Submitting...");
}
