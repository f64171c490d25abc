//! Registry conflict policies.
//!
//! Configuration is format-neutral: build a [`RegistryConfig`] in code or load one
//! from TOML with [`RegistryConfig::from_toml`].
//!
//! ```toml
//! alias-policy = "replace"
//! atomic-labels = false
//! ```

use serde::{Deserialize, Serialize};

/// How an alias that is already bound to another type is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AliasPolicy {
	/// Fail the registration with [`RegistryError::AliasConflict`](crate::RegistryError::AliasConflict).
	#[default]
	Reject,
	/// Rebind the alias to the incoming type (last registration wins).
	///
	/// Canonical names are never rebound, under either policy.
	Replace,
}

/// Registry behavior knobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegistryConfig {
	pub alias_policy: AliasPolicy,
	/// Validate every label of a registration before committing any of them.
	///
	/// When false, labels are committed one at a time and a conflict leaves the
	/// labels committed earlier in the same call registered.
	pub atomic_labels: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			alias_policy: AliasPolicy::Reject,
			atomic_labels: true,
		}
	}
}

impl RegistryConfig {
	/// Parses a configuration from TOML. Missing keys keep their defaults.
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid registry config: {0}")]
	Toml(#[from] toml::de::Error),
}
