use std::env;
use std::fmt;

pub const TERM: &str = "TERM";
pub const TMUX: &str = "TMUX";
pub const TERM_PROGRAM: &str = "TERM_PROGRAM";

const XTERM_PREFIX: &str = "xterm";
const EXCLUDED_TERM_PROGRAM: &str = "Apple_Terminal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    NoTerm,
    Multiplexer,
    ExcludedProgram(String),
    UnknownTerm(String),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::NoTerm => write!(f, "{} is not set", TERM),
            Unsupported::Multiplexer => write!(f, "running inside tmux"),
            Unsupported::ExcludedProgram(program) => {
                write!(f, "{} does not support OSC 52", program)
            }
            Unsupported::UnknownTerm(term) => write!(f, "unrecognized terminal type {:?}", term),
        }
    }
}

/// Reports whether the terminal described by the process environment honors OSC 52.
///
/// The environment is read on every call.
pub fn supported() -> bool {
    check().is_ok()
}

pub fn supported_with<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    check_with(lookup).is_ok()
}

/// Same decision as [`supported_with`], keeping the reason a terminal was rejected.
pub fn check_with<F>(lookup: F) -> Result<(), Unsupported>
where
    F: Fn(&str) -> Option<String>,
{
    let term = non_empty(lookup(TERM)).ok_or(Unsupported::NoTerm)?;

    if non_empty(lookup(TMUX)).is_some() {
        return Err(Unsupported::Multiplexer);
    }

    if let Some(program) = lookup(TERM_PROGRAM)
        && program == EXCLUDED_TERM_PROGRAM
    {
        return Err(Unsupported::ExcludedProgram(program));
    }

    if term.starts_with(XTERM_PREFIX) {
        Ok(())
    } else {
        Err(Unsupported::UnknownTerm(term))
    }
}

pub fn check() -> Result<(), Unsupported> {
    check_with(process_env)
}

// Non-UTF-8 values still count as set.
fn process_env(key: &str) -> Option<String> {
    env::var_os(key).map(|v| v.to_string_lossy().into_owned())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
