//! Interactive search loop.
//!
//! Reducer effects are spawned as tokio tasks; their completions come back
//! over an mpsc channel and are fed to the reducer on this task.

use anyhow::bail;
use cityweather_core::{Action, AppState, DisplayConfig, WeatherFetcher, reduce, run_effect};
use inquire::{InquireError, Text};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::render;

/// Source of city searches. `None` ends the session.
pub trait CityInput {
    async fn next_city(&mut self, current: &str) -> anyhow::Result<Option<String>>;
}

/// Reads cities from the terminal, prefilled with the current query.
#[derive(Debug, Default)]
pub struct PromptInput;

impl CityInput for PromptInput {
    async fn next_city(&mut self, current: &str) -> anyhow::Result<Option<String>> {
        let current = current.to_string();
        tokio::task::spawn_blocking(move || {
            match Text::new("City:")
                .with_initial_value(&current)
                .with_help_message("Enter to search, Esc to quit")
                .prompt()
            {
                Ok(text) => Ok(Some(text)),
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    Ok(None)
                }
                Err(err) => Err(anyhow::Error::from(err)),
            }
        })
        .await?
    }
}

pub async fn run(
    fetcher: Arc<dyn WeatherFetcher>,
    city: String,
    display: &DisplayConfig,
) -> anyhow::Result<()> {
    run_with(fetcher, city, display, PromptInput, |text| println!("{text}\n")).await
}

pub async fn run_with<I, F>(
    fetcher: Arc<dyn WeatherFetcher>,
    city: String,
    display: &DisplayConfig,
    mut input: I,
    mut emit: F,
) -> anyhow::Result<()>
where
    I: CityInput,
    F: FnMut(String),
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut state = dispatch(AppState::new(city), Action::Mount, &fetcher, &tx);

    loop {
        let rendered = render::render_view(state.view(), display);
        if !rendered.is_empty() {
            emit(rendered);
        }

        if state.loading {
            let Some(action) = rx.recv().await else {
                bail!("weather fetch task channel closed");
            };
            state = dispatch(state, action, &fetcher, &tx);
            continue;
        }

        match input.next_city(&state.query_text).await? {
            Some(text) => {
                state = dispatch(state, Action::QueryEdited(text), &fetcher, &tx);
                state = dispatch(state, Action::SearchRequested, &fetcher, &tx);
            }
            None => break,
        }
    }

    info!("session ended");
    Ok(())
}

fn dispatch(
    state: AppState,
    action: Action,
    fetcher: &Arc<dyn WeatherFetcher>,
    tx: &mpsc::UnboundedSender<Action>,
) -> AppState {
    let (next, effect) = reduce(state, action);

    if let Some(effect) = effect {
        let fetcher = Arc::clone(fetcher);
        let tx = tx.clone();
        tokio::spawn(async move {
            let action = run_effect(fetcher.as_ref(), effect).await;
            deliver(&tx, action);
        });
    }

    next
}

/// Hand a completion back to the loop. Returns false once the session is over.
fn deliver(tx: &mpsc::UnboundedSender<Action>, action: Action) -> bool {
    match tx.send(action) {
        Ok(()) => true,
        Err(mpsc::error::SendError(action)) => {
            debug!(?action, "session ended before fetch completed, dropping result");
            false
        }
    }
}
