use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use shorten_core::{update, AppState, AppViewModel, Form, Generation, Msg, PollPolicy};
use shorten_logging::{shorten_debug, shorten_info, shorten_warn};

use super::clipboard::Osc52Clipboard;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::render_changes;

/// Everything the event loop reacts to, from stdin and from the engine.
#[derive(Debug)]
pub enum AppEvent {
    Msgs(Vec<Msg>),
    Help,
    Unknown(String),
    InputClosed,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load();
    shorten_logging::initialize(config.log_destination);
    for note in &config.notes {
        shorten_info!("{}", note);
    }
    shorten_info!("starting shorten client: {}", config);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let mut runner = EffectRunner::new(
        config.client_settings(),
        Box::new(Osc52Clipboard::new(io::stdout())),
        event_tx.clone(),
    )
    .context("failed to start request engine")?;

    spawn_input_reader(event_tx);

    let mut out = io::stdout();
    writeln!(out, "{HELP}")?;

    let mut state = AppState::with_config(config.hosts(), PollPolicy::default());
    let mut shown = state.view();
    let mut input_closed = false;

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msgs(msgs) => {
                for msg in msgs {
                    shorten_debug!("dispatch {:?}", msg);
                    log_if_stale(&state, &msg);
                    let (next, effects) = update(std::mem::take(&mut state), msg);
                    state = next;
                    runner.run(effects);
                }
                if state.consume_dirty() {
                    let view = state.view();
                    print_lines(&mut out, &render_changes(&shown, &view))?;
                    shown = view;
                }
            }
            AppEvent::Help => writeln!(out, "{HELP}")?,
            AppEvent::Unknown(word) => {
                writeln!(out, "unknown command '{word}'; type 'help' for a list")?
            }
            AppEvent::InputClosed => input_closed = true,
            AppEvent::Quit => break,
        }

        if input_closed && !is_busy(&shown) {
            break;
        }
    }

    shorten_info!("shorten client exiting");
    Ok(())
}

/// Reads commands line by line. End of input lets running workflows finish.
fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    shorten_warn!("failed to read input: {}", err);
                    break;
                }
            };
            let event = match parse_command(&line) {
                Command::Empty => continue,
                Command::Help => AppEvent::Help,
                Command::Quit => AppEvent::Quit,
                Command::Unknown(word) => AppEvent::Unknown(word),
                command => AppEvent::Msgs(command.into_msgs()),
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

fn log_if_stale(state: &AppState, msg: &Msg) {
    let (form, generation) = match msg {
        Msg::SubmitCompleted { generation, .. }
        | Msg::PollTick { generation }
        | Msg::PollCompleted { generation, .. } => (Form::Shorten, *generation),
        Msg::DecodeCompleted { generation, .. } => (Form::Decode, *generation),
        _ => return,
    };
    let current: Generation = match form {
        Form::Shorten => state.shorten_generation(),
        Form::Decode => state.decode_generation(),
    };
    if generation != current {
        shorten_debug!(
            "dropping stale {:?} completion generation={} current={}",
            form,
            generation,
            current
        );
    }
}

fn is_busy(view: &AppViewModel) -> bool {
    view.shorten.is_busy() || view.decode.is_busy()
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
