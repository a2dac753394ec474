use crate::{
    is_valid_url, normalize_decode_input, AppState, Effect, Form, LookupFailure, LookupResult,
    Msg, SubmitPhase, WorkflowError, COPY_RESET_DELAY, DECODE_FALLBACK, EMPTY_URL,
    INVALID_CALLBACK_URL, INVALID_URL, LOOKUP_FALLBACK, NO_DATA, SUBMIT_FALLBACK,
};

const COPY_FAILED: &str = "Failed to copy to clipboard";

/// Pure update function: applies a message to state and returns any effects.
///
/// Completion messages carry the generation they were issued for; anything
/// from an older generation, or arriving in the wrong phase, is dropped.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ShortenInputChanged(text) => {
            state.set_shorten_input(text);
            Vec::new()
        }
        Msg::CallbackInputChanged(text) => {
            state.set_callback_input(text);
            Vec::new()
        }
        Msg::ShortenSubmitted => submit_shorten(&mut state),
        Msg::SubmitCompleted { generation, result } => {
            if !state.is_current_shorten(generation, SubmitPhase::Submitting) {
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    state.begin_polling();
                    vec![Effect::SchedulePoll {
                        generation,
                        delay: state.policy().interval,
                    }]
                }
                Err(message) => {
                    state.fail_shorten(WorkflowError::service(message, SUBMIT_FALLBACK));
                    Vec::new()
                }
            }
        }
        Msg::PollTick { generation } => {
            if !state.is_current_shorten(generation, SubmitPhase::Polling) {
                return (state, Vec::new());
            }
            match state.issue_poll() {
                Some(long_url) => vec![Effect::LookupLongUrl {
                    generation,
                    long_url,
                }],
                None => Vec::new(),
            }
        }
        Msg::PollCompleted { generation, result } => {
            if !state.is_current_shorten(generation, SubmitPhase::Polling) || !state.finish_poll()
            {
                return (state, Vec::new());
            }
            apply_poll_result(&mut state, generation, result)
        }
        Msg::DecodeInputChanged(text) => {
            state.set_decode_input(text);
            Vec::new()
        }
        Msg::DecodeSubmitted => submit_decode(&mut state),
        Msg::DecodeCompleted { generation, result } => {
            if !state.is_current_decode(generation) {
                return (state, Vec::new());
            }
            match result {
                Ok(Some(record)) => state.succeed_decode(record),
                Ok(None) => state.fail_decode(WorkflowError::Service(NO_DATA.to_string())),
                Err(message) => state.fail_decode(WorkflowError::service(message, DECODE_FALLBACK)),
            }
            Vec::new()
        }
        Msg::CopyRequested(form) => {
            let text = match form {
                Form::Shorten => state.short_url(),
                Form::Decode => state.decoded_long_url(),
            };
            match text {
                Some(text) => vec![Effect::CopyToClipboard {
                    form,
                    generation: state.generation_of(form),
                    text: text.to_string(),
                }],
                None => Vec::new(),
            }
        }
        Msg::CopyCompleted {
            form,
            generation,
            result,
        } => {
            if state.generation_of(form) != generation {
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    state.set_copied(form, true);
                    vec![Effect::ScheduleCopyReset {
                        form,
                        generation,
                        delay: COPY_RESET_DELAY,
                    }]
                }
                Err(_) => {
                    state.set_notice(form, COPY_FAILED.to_string());
                    Vec::new()
                }
            }
        }
        Msg::CopyResetElapsed { form, generation } => {
            if state.generation_of(form) == generation {
                state.set_copied(form, false);
            }
            Vec::new()
        }
        Msg::ErrorDismissed(form) => {
            state.dismiss_error(form);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_shorten(state: &mut AppState) -> Vec<Effect> {
    let generation = state.restart_shorten();

    let long_url = state.shorten_input().to_string();
    if long_url.trim().is_empty() {
        state.fail_shorten(WorkflowError::Validation(EMPTY_URL.to_string()));
        return Vec::new();
    }
    if !is_valid_url(&long_url) {
        state.fail_shorten(WorkflowError::Validation(INVALID_URL.to_string()));
        return Vec::new();
    }

    let callback = state.callback_input().trim().to_string();
    let callback_url = if callback.is_empty() {
        None
    } else if is_valid_url(&callback) {
        Some(callback)
    } else {
        state.fail_shorten(WorkflowError::Validation(INVALID_CALLBACK_URL.to_string()));
        return Vec::new();
    };

    state.begin_submitting(long_url.clone());
    vec![Effect::SubmitUrl {
        generation,
        long_url,
        callback_url,
    }]
}

fn apply_poll_result(
    state: &mut AppState,
    generation: crate::Generation,
    result: LookupResult,
) -> Vec<Effect> {
    match result {
        Ok(Some(record)) if record.is_encoded() => {
            state.succeed_shorten(record);
            Vec::new()
        }
        Ok(_) | Err(LookupFailure::NotFound) => {
            if state.attempts_exhausted() {
                state.fail_shorten(WorkflowError::Timeout);
                Vec::new()
            } else {
                vec![Effect::SchedulePoll {
                    generation,
                    delay: state.policy().interval,
                }]
            }
        }
        Err(LookupFailure::Service(message)) => {
            state.fail_shorten(WorkflowError::service(message, LOOKUP_FALLBACK));
            Vec::new()
        }
    }
}

fn submit_decode(state: &mut AppState) -> Vec<Effect> {
    let generation = state.restart_decode();

    match normalize_decode_input(state.decode_input(), &state.hosts().decode_host) {
        Ok(shorten_url) => {
            state.begin_lookup(shorten_url.clone());
            vec![Effect::DecodeShortUrl {
                generation,
                shorten_url,
            }]
        }
        Err(error) => {
            state.fail_decode(error);
            Vec::new()
        }
    }
}
