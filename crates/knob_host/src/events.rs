use async_channel::Receiver;
use knob::{Knob, KnobEvent};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SetValue(f64),
    SetEnabled(bool),
    ConfigReload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
enum Verb {
    Set,
    Enable,
    Disable,
    Reload,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    UnknownVerb(String),
    #[error("'{0}' expects a value in radians")]
    MissingArgument(String),
    #[error("Invalid value '{0}'")]
    InvalidValue(String),
    #[error("Unexpected trailing input '{0}'")]
    TrailingInput(String),
}

/// One line of the control socket protocol.
impl FromStr for AppEvent {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(CommandError::Empty)?;
        let verb =
            Verb::from_str(word).map_err(|_| CommandError::UnknownVerb(word.to_string()))?;

        let event = match verb {
            Verb::Set => {
                let raw = words
                    .next()
                    .ok_or_else(|| CommandError::MissingArgument(verb.to_string()))?;
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| CommandError::InvalidValue(raw.to_string()))?;
                AppEvent::SetValue(value)
            }
            Verb::Enable => AppEvent::SetEnabled(true),
            Verb::Disable => AppEvent::SetEnabled(false),
            Verb::Reload => AppEvent::ConfigReload,
        };

        match words.next() {
            Some(extra) => Err(CommandError::TrailingInput(extra.to_string())),
            None => Ok(event),
        }
    }
}

impl AppEvent {
    /// Socket line for this event, the inverse of `from_str`.
    pub fn to_command(&self) -> String {
        match self {
            AppEvent::SetValue(v) => format!("{} {}", Verb::Set, v),
            AppEvent::SetEnabled(true) => Verb::Enable.to_string(),
            AppEvent::SetEnabled(false) => Verb::Disable.to_string(),
            AppEvent::ConfigReload => Verb::Reload.to_string(),
        }
    }
}

/// Logs one `value: …` line per pending knob change and returns the logged
/// values. Call right after each drag step so the value matches that step.
pub fn log_changes(changes: &Receiver<KnobEvent>, knob: &Knob) -> Vec<f64> {
    std::iter::from_fn(|| changes.try_recv().ok())
        .map(|KnobEvent::ValueChanged| {
            let value = knob.value();
            log::info!("value: {}", value);
            value
        })
        .collect()
}
