//! Core library for the `cityweather` lookup widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its RapidAPI implementation
//! - The normalized `WeatherData` model
//! - The widget state machine (reducer, effects, views)
//!
//! It is used by `cityweather-cli`, but can also be driven by other front ends.

pub mod app;
pub mod config;
pub mod error;
pub mod locale;
pub mod model;
pub mod provider;

pub use app::{Action, AppState, Effect, RequestId, View, reduce, run_effect};
pub use config::{Config, DisplayConfig, ProviderConfig};
pub use error::FetchError;
pub use model::{Condition, CurrentObservation, Location, WeatherData};
pub use provider::{WeatherFetcher, fetcher_from_config};
