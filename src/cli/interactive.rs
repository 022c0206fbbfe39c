//! Line-based event source for a long-running converter session
//!
//! Each input line becomes one reducer event; fetch completions are rendered
//! as they arrive. `shake` stands in for the device shake gesture.

use super::render;
use crate::core::Session;
use crate::core::source::RateSource;
use crate::core::state::{Event, TableStatus};
use anyhow::{Result, bail};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  from <CODE>     set the source currency
  to <CODE>       set the target currency
  amount <VALUE>  set the amount to convert
  shake           pick a random pair
  point <N>       inspect history point N
  show            render the current state
  help            show this help
  quit            leave";

#[derive(Debug, PartialEq)]
pub enum Input {
    Event(Event),
    Show,
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    let require_arg = |what: &str| {
        if arg.is_empty() {
            Err(format!("'{command}' needs {what}"))
        } else {
            Ok(arg.to_string())
        }
    };

    let input = match command.to_lowercase().as_str() {
        "from" => Input::Event(Event::FromSelected(require_arg("a currency code")?)),
        "to" => Input::Event(Event::ToSelected(require_arg("a currency code")?)),
        "amount" => Input::Event(Event::AmountChanged(arg.to_string())),
        "shake" => Input::Event(Event::ShakeDetected),
        "point" => {
            let index = require_arg("an index")?;
            let index = index
                .parse::<usize>()
                .map_err(|_| format!("Invalid point index: {index}"))?;
            Input::Event(Event::PointSelected(index))
        }
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("Unknown command: {other}. Type 'help'.")),
    };
    Ok(Some(input))
}

/// Drives `session` from `input` until `quit`, end of input, or a failed
/// rate-table load.
pub async fn run<S, R>(session: &mut Session<S>, input: R, out: &mut impl Write) -> Result<()>
where
    S: RateSource + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    session.start();
    writeln!(out, "{}", render::state(session.state()))?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                match parse_input(&line) {
                    Ok(None) => {}
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Help)) => writeln!(out, "{HELP}")?,
                    Ok(Some(Input::Show)) => writeln!(out, "{}", render::state(session.state()))?,
                    Ok(Some(Input::Event(event))) => {
                        let state = session.dispatch(event);
                        writeln!(out, "{}", render::state(state))?;
                    }
                    Err(msg) => writeln!(out, "{msg}")?,
                }
            }
            Some(event) = session.recv_event() => {
                let state = session.dispatch(event);
                writeln!(out, "{}", render::state(state))?;
                if let TableStatus::Failed(msg) = &state.table {
                    bail!("Could not load exchange rates: {msg}");
                }
            }
        }
    }
    Ok(())
}
