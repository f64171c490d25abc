//! Load-time model registration via `inventory`.
//!
//! Crates declare their models next to the type definitions:
//!
//! ```rust,ignore
//! armature_registry::register_model!(Asset, "host");
//! ```
//!
//! Every submission linked into the binary is applied by
//! [`TypeRegistry::from_submissions`].

use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::registry::TypeRegistry;

/// Static registration entry collected via `inventory`.
pub struct ModelRegistration {
	/// Type as written at the submission site, for diagnostics.
	pub model: &'static str,
	pub aliases: &'static [&'static str],
	/// Registration function, normally `TypeRegistry::register::<T>`.
	pub register: fn(&mut TypeRegistry, &[&str]) -> Result<(), RegistryError>,
}

inventory::collect!(ModelRegistration);

/// Submits a model type for load-time registration.
#[macro_export]
macro_rules! register_model {
	($model:ty $(, $alias:literal)* $(,)?) => {
		$crate::inventory::submit! {
			$crate::ModelRegistration {
				model: ::std::stringify!($model),
				aliases: &[$($alias),*],
				register: $crate::TypeRegistry::register::<$model>,
			}
		}
	};
}

impl TypeRegistry {
	/// Builds a registry from every [`register_model!`] submission.
	///
	/// Submissions are applied in order of their type name so the outcome does not
	/// depend on link order.
	///
	/// # Panics
	///
	/// Panics if any submission conflicts, like [`TypeRegistry::must_register`].
	pub fn from_submissions() -> Self {
		Self::from_submissions_with(RegistryConfig::default())
	}

	/// [`from_submissions`](Self::from_submissions) with an explicit config.
	pub fn from_submissions_with(config: RegistryConfig) -> Self {
		let mut registry = Self::with_config(config);
		let mut submissions: Vec<&ModelRegistration> = inventory::iter::<ModelRegistration>.into_iter().collect();
		submissions.sort_by_key(|submission| submission.model);
		for submission in submissions {
			if let Err(e) = (submission.register)(&mut registry, submission.aliases) {
				panic!("model registration for '{}' failed: {e}", submission.model);
			}
		}
		debug!(count = registry.len(), "registry built from submissions");
		registry
	}
}
