//! Caller locale lookup for time-of-day rendering.

use chrono::Locale;
use tracing::debug;

/// Used when the system locale is missing or has no chrono equivalent.
pub const FALLBACK_LOCALE: Locale = Locale::en_US;

/// The caller's locale as reported by the OS.
pub fn caller_locale() -> Locale {
    match sys_locale::get_locale() {
        Some(tag) => parse_locale(&tag),
        None => {
            debug!("no system locale, using {FALLBACK_LOCALE:?}");
            FALLBACK_LOCALE
        }
    }
}

/// Map a BCP 47 or POSIX tag (`de-DE`, `de_DE.UTF-8`, `fr`) to a chrono locale.
pub fn parse_locale(tag: &str) -> Locale {
    let base = tag.split(['.', '@']).next().unwrap_or_default().replace('-', "_");

    if let Ok(locale) = Locale::try_from(base.as_str()) {
        return locale;
    }

    // Bare language: try the language's own region, e.g. `fr` -> `fr_FR`.
    if !base.is_empty() && !base.contains('_') {
        let guess = format!("{base}_{}", base.to_uppercase());
        if let Ok(locale) = Locale::try_from(guess.as_str()) {
            return locale;
        }
    }

    debug!(tag, "unknown locale, using {FALLBACK_LOCALE:?}");
    FALLBACK_LOCALE
}
