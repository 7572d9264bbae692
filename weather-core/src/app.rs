//! Widget state machine.
//!
//! [`reduce`] is pure: it takes the current [`AppState`] and an [`Action`]
//! and returns the next state plus at most one [`Effect`] for the caller to
//! run. Effects come back as `FetchSucceeded`/`FetchFailed` actions.
//!
//! Each fetch is tagged with a [`RequestId`]. Only the completion of the
//! most recently issued fetch is applied; late completions of superseded
//! fetches are dropped, so the last request wins.

use tracing::{debug, warn};

use crate::{model::WeatherData, provider::WeatherFetcher};

pub const DEFAULT_QUERY: &str = "London";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching weather data. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub query_text: String,
    pub loading: bool,
    pub error: Option<String>,
    /// Kept across failed fetches.
    pub last_result: Option<WeatherData>,
    latest_request: RequestId,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY)
    }
}

impl AppState {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            loading: false,
            error: None,
            last_result: None,
            latest_request: RequestId::default(),
        }
    }

    /// Id of the most recently issued fetch.
    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }

    /// What should be on screen.
    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if let Some(message) = &self.error {
            View::Error(message)
        } else if let Some(data) = &self.last_result {
            View::Success(data)
        } else {
            View::Empty
        }
    }

    fn begin_fetch(mut self) -> (Self, Option<Effect>) {
        self.latest_request = self.latest_request.next();
        self.loading = true;
        self.error = None;

        let effect = Effect::FetchWeather {
            request: self.latest_request,
            city: self.query_text.clone(),
        };
        (self, Some(effect))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The widget appeared; fetch the current query.
    Mount,
    /// The input text changed. Does not fetch.
    QueryEdited(String),
    /// The search control was activated.
    SearchRequested,
    FetchSucceeded { request: RequestId, data: WeatherData },
    FetchFailed { request: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchWeather { request: RequestId, city: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    /// Nothing fetched yet.
    Empty,
    Loading,
    Error(&'a str),
    Success(&'a WeatherData),
}

pub fn reduce(state: AppState, action: Action) -> (AppState, Option<Effect>) {
    match action {
        Action::Mount | Action::SearchRequested => state.begin_fetch(),
        Action::QueryEdited(text) => (AppState { query_text: text, ..state }, None),
        Action::FetchSucceeded { request, data } => {
            if request != state.latest_request {
                debug!(?request, latest = ?state.latest_request, "dropping stale weather result");
                return (state, None);
            }
            let next = AppState {
                loading: false,
                error: None,
                last_result: Some(data),
                ..state
            };
            (next, None)
        }
        Action::FetchFailed { request } => {
            if request != state.latest_request {
                debug!(?request, latest = ?state.latest_request, "dropping stale weather failure");
                return (state, None);
            }
            let next = AppState {
                loading: false,
                error: Some(FETCH_ERROR_MESSAGE.to_string()),
                ..state
            };
            (next, None)
        }
    }
}

/// Run an effect against `fetcher` and turn the outcome into the completion action.
pub async fn run_effect(fetcher: &dyn WeatherFetcher, effect: Effect) -> Action {
    match effect {
        Effect::FetchWeather { request, city } => match fetcher.fetch_weather(&city).await {
            Ok(data) => {
                debug!(?request, city = %data.location.city, "weather fetched");
                Action::FetchSucceeded { request, data }
            }
            Err(err) => {
                warn!(?request, %city, kind = err.kind(), error = %err, "weather fetch failed");
                Action::FetchFailed { request }
            }
        },
    }
}
