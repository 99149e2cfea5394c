//! Declarative menu options loaded from TOML.
//!
//! ```toml
//! auto_answer = true
//! outdated = "This menu changed, please try again."   # or `false` to trust coordinates
//! ```
//!
//! Custom fingerprints and custom outdated handlers are code-only and set on
//! the [`MenuOptions`] returned by [`MenuConfig::into_options`].

use serde::Deserialize;
use thiserror::Error;

use crate::menu::{DEFAULT_OUTDATED_NOTICE, MenuOptions, OutdatedPolicy};

/// Errors that can occur when loading menu configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// `outdated` key: a notice string, or a switch for the default notice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OutdatedSetting {
	Enabled(bool),
	Notice(String),
}

impl Default for OutdatedSetting {
	fn default() -> Self {
		Self::Enabled(true)
	}
}

/// Serializable subset of [`MenuOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
	pub auto_answer: bool,
	pub outdated: OutdatedSetting,
}

impl Default for MenuConfig {
	fn default() -> Self {
		Self {
			auto_answer: true,
			outdated: OutdatedSetting::default(),
		}
	}
}

impl MenuConfig {
	pub fn from_toml(text: &str) -> ConfigResult<Self> {
		Ok(toml::from_str(text)?)
	}

	pub fn into_options<C>(self) -> MenuOptions<C> {
		let on_outdated = match self.outdated {
			OutdatedSetting::Enabled(true) => OutdatedPolicy::Notice(DEFAULT_OUTDATED_NOTICE.to_owned()),
			OutdatedSetting::Enabled(false) => OutdatedPolicy::Disabled,
			OutdatedSetting::Notice(notice) => OutdatedPolicy::Notice(notice),
		};
		MenuOptions {
			auto_answer: self.auto_answer,
			on_outdated,
			fingerprint: None,
		}
	}
}
