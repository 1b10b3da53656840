//! Localized strings for the dashboard components.
//!
//! Bundles live under `i18n/<lang>/kaizen-ui.ftl` (en-US is the fallback)
//! and are embedded at compile time. `fl!` checks keys against the fallback
//! bundle while compiling, so a typo in a `t!("…")` call is a build error.
//!
//! ```ignore
//! use crate::t;
//! crate::i18n::init(); // idempotent
//! let heading = t!("insights-title");
//! let cell = t!("dashboard-calendar-answered", count = 3);
//! ```
//!
//! Adding a locale: copy `en-US/kaizen-ui.ftl` to `i18n/<lang>/`, translate
//! the values and register the file in `tests/i18n_missing_keys.rs`.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use tracing::warn;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// `t!("key")` or `t!("key", name = value)` through the shared [`LOADER`].
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fallback bundle is `i18n/en-US/{DOMAIN}.ftl`.
const DOMAIN: &str = "kaizen-ui";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = "en-US".parse().expect("valid fallback language identifier");
    FluentLanguageLoader::new(DOMAIN, fallback)
});

static INIT: Once = Once::new();

/// Load the bundles for the platform's preferred languages (idempotent).
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            warn!(target: "kaizen::i18n", %err, "language selection failed; using fallback");
        }
        // Strings land in attributes and titles; no bidi isolation marks.
        LOADER.set_use_isolating(false);
    });
}

/// Switch language at runtime. Unparsable tags are ignored.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let Ok(lang) = tag.parse::<LanguageIdentifier>() else {
        return Ok(());
    };
    i18n_embed::select(&*LOADER, &Localizations, &[lang])?;
    LOADER.set_use_isolating(false);
    Ok(())
}

/// Embedded language tags, sorted.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}
