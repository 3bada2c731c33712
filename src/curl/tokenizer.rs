//! Shell-like tokenizer for curl commands
//!
//! Quoting is modelled as a small finite-state machine: [`step`] is a pure
//! transition function from `(state, char, lookahead)` to `(state, action)`,
//! and [`tokenize`] drives it over the input.
//!
//! Supported quoting:
//! - `'single'` - everything literal
//! - `"double"` - backslash escapes only `"`, `\`, `$` and `` ` ``
//! - `$'ansi-c'` - `\n`, `\t`, `\r`, `\xHH`, `\uHHHH` and friends are decoded
//! - unquoted backslash escapes the next character

use crate::errors::{ConvertError, Result};
use tracing::debug;

/// Quote/escape state of the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unquoted,
    /// After an unquoted backslash
    Escaped,
    Single,
    Double,
    /// After a backslash inside double quotes
    DoubleEscaped,
    /// Saw `$`, the opening `'` comes next
    AnsiCOpening,
    AnsiC,
    /// After a backslash inside `$'...'`
    AnsiCEscaped,
    /// Reading the hex digits of `\xHH` / `\uHHHH`
    AnsiCHex { marker: char, left: u8, read: u8, value: u32 },
}

/// What the driver does with the current character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop the character
    Skip,
    /// Append a character to the current token
    Push(char),
    /// Append two characters (a backslash that did not escape anything)
    PushPair(char, char),
    /// A quote opened: the current token exists even if it stays empty
    Open,
    /// Whitespace outside quotes: finish the current token
    Split,
    /// Append a character, then feed the same input character again
    Replay(char),
}

/// Transition function of the quoting state machine
pub fn step(state: State, ch: char, next: Option<char>) -> (State, Action) {
    use State::*;

    match state {
        Unquoted => match ch {
            '\\' => (Escaped, Action::Skip),
            '\'' => (Single, Action::Open),
            '"' => (Double, Action::Open),
            '$' if next == Some('\'') => (AnsiCOpening, Action::Open),
            c if c.is_whitespace() => (Unquoted, Action::Split),
            c => (Unquoted, Action::Push(c)),
        },
        Escaped => (Unquoted, Action::Push(ch)),
        Single => match ch {
            '\'' => (Unquoted, Action::Skip),
            c => (Single, Action::Push(c)),
        },
        Double => match ch {
            '"' => (Unquoted, Action::Skip),
            '\\' => (DoubleEscaped, Action::Skip),
            c => (Double, Action::Push(c)),
        },
        DoubleEscaped => match ch {
            '"' | '\\' | '$' | '`' => (Double, Action::Push(ch)),
            c => (Double, Action::PushPair('\\', c)),
        },
        AnsiCOpening => (AnsiC, Action::Skip),
        AnsiC => match ch {
            '\'' => (Unquoted, Action::Skip),
            '\\' => (AnsiCEscaped, Action::Skip),
            c => (AnsiC, Action::Push(c)),
        },
        AnsiCEscaped => match ch {
            'n' => (AnsiC, Action::Push('\n')),
            't' => (AnsiC, Action::Push('\t')),
            'r' => (AnsiC, Action::Push('\r')),
            '0' => (AnsiC, Action::Push('\0')),
            'e' | 'E' => (AnsiC, Action::Push('\u{1b}')),
            'x' => (AnsiCHex { marker: 'x', left: 2, read: 0, value: 0 }, Action::Skip),
            'u' => (AnsiCHex { marker: 'u', left: 4, read: 0, value: 0 }, Action::Skip),
            '\\' | '\'' | '"' | '?' => (AnsiC, Action::Push(ch)),
            c => (AnsiC, Action::PushPair('\\', c)),
        },
        AnsiCHex { marker, left, read, value } => match ch.to_digit(16) {
            Some(digit) => {
                let value = value * 16 + digit;
                if left == 1 {
                    (AnsiC, Action::Push(decode_code_point(value)))
                } else {
                    (AnsiCHex { marker, left: left - 1, read: read + 1, value }, Action::Skip)
                }
            }
            // No digits at all: keep the escape as written
            None if read == 0 => (AnsiC, Action::PushPair('\\', marker)),
            None => (AnsiC, Action::Replay(decode_code_point(value))),
        },
    }
}

fn decode_code_point(value: u32) -> char {
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Remove line continuations so a multi-line command becomes one line
pub fn join_continuations(command: &str) -> String {
    command.replace("\\\r\n", " ").replace("\\\n", " ")
}

/// Split a command line into tokens, honouring quotes and escapes
///
/// The program name is kept; see [`tokenize_command`].
pub fn tokenize(command: &str) -> Result<Vec<String>> {
    let normalized = join_continuations(command);
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut state = State::Unquoted;
    let mut chars = normalized.chars().peekable();

    while let Some(ch) = chars.next() {
        loop {
            let (next_state, action) = step(state, ch, chars.peek().copied());
            state = next_state;
            match action {
                Action::Skip => {}
                Action::Push(c) => {
                    current.push(c);
                    started = true;
                }
                Action::PushPair(a, b) => {
                    current.push(a);
                    current.push(b);
                    started = true;
                }
                Action::Open => started = true,
                Action::Split => {
                    if started {
                        tokens.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                Action::Replay(c) => {
                    current.push(c);
                    started = true;
                    continue;
                }
            }
            break;
        }
    }

    match state {
        State::Single | State::AnsiCOpening | State::AnsiC | State::AnsiCEscaped | State::AnsiCHex { .. } => {
            return Err(ConvertError::UnterminatedQuote("single"));
        }
        State::Double | State::DoubleEscaped => {
            return Err(ConvertError::UnterminatedQuote("double"));
        }
        // A trailing lone backslash escapes nothing
        State::Escaped => {
            current.push('\\');
            started = true;
        }
        State::Unquoted => {}
    }

    if started {
        tokens.push(current);
    }

    debug!(count = tokens.len(), "Tokenized command");
    Ok(tokens)
}

/// Whether a token names the curl program (`curl`, `curl.exe`, `/usr/bin/curl`)
pub fn is_program_token(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    let base = lower.rsplit(['/', '\\']).next().unwrap_or(lower.as_str());
    base == "curl" || base == "curl.exe"
}

/// Tokenize a curl command and drop the leading program name
pub fn tokenize_command(command: &str) -> Result<Vec<String>> {
    if command.trim().is_empty() {
        return Err(ConvertError::EmptyCommand);
    }

    let mut tokens = tokenize(command)?;
    match tokens.first() {
        Some(first) if is_program_token(first) => {
            tokens.remove(0);
            Ok(tokens)
        }
        _ => Err(ConvertError::NotCurl),
    }
}
