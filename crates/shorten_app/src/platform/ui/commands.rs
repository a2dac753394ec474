use shorten_core::{Form, Msg};

pub const HELP: &str = "\
commands:
  shorten <long-url> [callback-url]   submit a URL and wait for its short link
  decode <short-url-or-code>          look up the original URL
  copy [decode]                       copy the short link (or the decoded URL)
  dismiss [decode]                    clear the shown error
  help                                show this text
  quit                                exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Shorten {
        long_url: String,
        callback_url: Option<String>,
    },
    Decode(String),
    Copy(Form),
    Dismiss(Form),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "shorten" | "s" => {
            let mut parts = rest.split_whitespace();
            Command::Shorten {
                long_url: parts.next().unwrap_or_default().to_string(),
                callback_url: parts.next().map(ToOwned::to_owned),
            }
        }
        "decode" | "d" => Command::Decode(rest.to_string()),
        "copy" => Command::Copy(form_arg(rest)),
        "dismiss" => Command::Dismiss(form_arg(rest)),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    }
}

fn form_arg(rest: &str) -> Form {
    if rest.eq_ignore_ascii_case("decode") {
        Form::Decode
    } else {
        Form::Shorten
    }
}

impl Command {
    /// Messages a form would send for this command, in order.
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            Command::Shorten {
                long_url,
                callback_url,
            } => vec![
                Msg::ShortenInputChanged(long_url),
                Msg::CallbackInputChanged(callback_url.unwrap_or_default()),
                Msg::ShortenSubmitted,
            ],
            Command::Decode(input) => vec![Msg::DecodeInputChanged(input), Msg::DecodeSubmitted],
            Command::Copy(form) => vec![Msg::CopyRequested(form)],
            Command::Dismiss(form) => vec![Msg::ErrorDismissed(form)],
            Command::Help | Command::Quit | Command::Empty | Command::Unknown(_) => Vec::new(),
        }
    }
}
