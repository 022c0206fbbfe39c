use super::{render, ui};
use crate::core::source::RateSource;
use crate::core::state::{AppState, Event, TableStatus};
use crate::core::Session;
use anyhow::{Result, bail};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Starts a session and waits for the rate table. A failed load is fatal.
async fn ready_session<S: RateSource + 'static>(
    source: Arc<S>,
    amount: &str,
) -> Result<Session<S>> {
    let mut session = Session::new(source, AppState::with_amount(amount));
    session.start();

    let spinner = ui::new_spinner("Loading exchange rates...");
    session.settle().await;
    spinner.finish_and_clear();

    if let TableStatus::Failed(msg) = &session.state().table {
        bail!("Could not load exchange rates: {msg}");
    }
    Ok(session)
}

async fn settle_history<S: RateSource + 'static>(session: &mut Session<S>) {
    if session.is_busy() {
        let spinner = ui::new_spinner("Loading history...");
        session.settle().await;
        spinner.finish_and_clear();
    }
}

fn write_view(state: &AppState, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", render::state(state))?;
    if !state.history.is_empty() {
        writeln!(out, "{}", render::history_table(&state.history))?;
    }
    Ok(())
}

/// Lists the current table.
pub async fn rates<S: RateSource + 'static>(source: Arc<S>, out: &mut impl Write) -> Result<()> {
    let session = ready_session(source, "0").await?;
    if let Some(table) = session.state().rate_table() {
        writeln!(out, "{}", render::rate_table(table))?;
    }
    Ok(())
}

/// Converts `amount` between two currencies and shows the pair's history.
pub async fn convert<S: RateSource + 'static>(
    source: Arc<S>,
    amount: &str,
    from: &str,
    to: &str,
    out: &mut impl Write,
) -> Result<()> {
    let mut session = ready_session(source, amount).await?;

    if let Some(table) = session.state().rate_table() {
        for code in [from, to] {
            if table.get(code).is_none() {
                let known: Vec<_> = table.iter().map(|r| r.code()).collect();
                bail!(
                    "Unknown currency code: {code}. Available: {}",
                    known.join(", ")
                );
            }
        }
    }

    session.dispatch(Event::FromSelected(from.to_string()));
    session.dispatch(Event::ToSelected(to.to_string()));
    settle_history(&mut session).await;

    debug!(state = ?session.state(), "Conversion settled");
    write_view(session.state(), out)
}

/// Same as a shake: a random pair of distinct currencies.
pub async fn random<S: RateSource + 'static>(
    source: Arc<S>,
    amount: &str,
    out: &mut impl Write,
) -> Result<()> {
    let mut session = ready_session(source, amount).await?;
    session.dispatch(Event::ShakeDetected);
    settle_history(&mut session).await;
    write_view(session.state(), out)
}
