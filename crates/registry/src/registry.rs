//! The type registry.
//!
//! # Role
//!
//! Maps folded names to registered types. Each type owns exactly one canonical
//! name and any number of aliases; both resolve to the same [`TypeEntry`].
//!
//! # Invariants
//!
//! - All names are folded before storage and lookup.
//! - A canonical name is bound once and never rebound.
//! - A rejected registration leaves the registry as it was, except for labels
//!   committed before the conflict when `atomic_labels` is off.

use std::collections::BTreeMap;

use armature_model::{Capability, Model, canonical_name, fold};
use rustc_hash::FxHashMap as HashMap;
use tracing::{debug, warn};

use crate::config::{AliasPolicy, RegistryConfig};
use crate::entry::TypeEntry;
use crate::error::RegistryError;
use crate::labels::LabelTable;

/// What a registered name is to the entry it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
	/// The entry's own canonical name.
	Canonical,
	/// A secondary name added at registration.
	Alias,
}

impl std::fmt::Display for NameKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Canonical => write!(f, "canonical"),
			Self::Alias => write!(f, "alias"),
		}
	}
}

#[derive(Debug, Clone, Copy)]
struct Binding {
	index: usize,
	kind: NameKind,
}

/// Case-insensitive catalog of model types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
	config: RegistryConfig,
	/// Entries in registration order.
	types: Vec<TypeEntry>,
	by_name: HashMap<String, Binding>,
	labels: LabelTable,
}

impl TypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Registers `T` under its canonical name plus `aliases`.
	///
	/// Fails if the canonical name is taken, if a declared label conflicts, or if an
	/// alias conflicts under [`AliasPolicy::Reject`].
	pub fn register<T>(&mut self, aliases: &[&str]) -> Result<(), RegistryError>
	where
		T: Model + Default,
	{
		let name = canonical_name::<T>();
		if let Some(binding) = self.by_name.get(&name) {
			return Err(RegistryError::DuplicateType {
				name,
				existing: self.types[binding.index].rust_type(),
				incoming: std::any::type_name::<T>(),
			});
		}

		let entry = TypeEntry::of::<T>(name.clone());
		let aliases = self.plan_aliases(&name, aliases)?;

		if self.config.atomic_labels {
			self.labels.check_all(entry.labels())?;
		}
		for label in entry.labels() {
			self.labels.insert(label)?;
		}

		let index = self.types.len();
		debug!(
			name = %name,
			rust_type = entry.rust_type(),
			labels = ?entry.labels(),
			aliases = ?aliases,
			"registered model type"
		);
		self.types.push(entry);
		self.by_name.insert(
			name,
			Binding {
				index,
				kind: NameKind::Canonical,
			},
		);
		for alias in aliases {
			let previous = self.by_name.insert(
				alias.clone(),
				Binding {
					index,
					kind: NameKind::Alias,
				},
			);
			if let Some(previous) = previous {
				warn!(
					alias = %alias,
					previous = self.types[previous.index].name(),
					incoming = self.types[index].name(),
					"alias rebound to a different type"
				);
			}
		}
		Ok(())
	}

	/// Like [`register`](Self::register), but panics on conflict.
	///
	/// Intended for load-time registration where a conflict is a programming error.
	pub fn must_register<T>(&mut self, aliases: &[&str])
	where
		T: Model + Default,
	{
		if let Err(e) = self.register::<T>(aliases) {
			panic!("model registration failed: {e}");
		}
	}

	/// Folds and validates aliases, dropping ones that repeat or name the type itself.
	fn plan_aliases(&self, canonical: &str, aliases: &[&str]) -> Result<Vec<String>, RegistryError> {
		let mut planned: Vec<String> = Vec::with_capacity(aliases.len());
		for alias in aliases {
			let alias = fold(alias);
			if alias.is_empty() || alias == canonical || planned.contains(&alias) {
				continue;
			}
			if let Some(binding) = self.by_name.get(&alias) {
				let existing = &self.types[binding.index];
				match (binding.kind, self.config.alias_policy) {
					(NameKind::Alias, AliasPolicy::Replace) => {}
					(NameKind::Canonical, _) | (NameKind::Alias, AliasPolicy::Reject) => {
						return Err(RegistryError::AliasConflict {
							alias,
							existing: existing.name().to_owned(),
							incoming: canonical.to_owned(),
						});
					}
				}
			}
			planned.push(alias);
		}
		Ok(planned)
	}

	/// Looks up a type by canonical name or alias.
	pub fn get(&self, name: &str) -> Option<&TypeEntry> {
		let binding = self.by_name.get(&fold(name))?;
		Some(&self.types[binding.index])
	}

	/// Returns how `name` is bound, if it is.
	pub fn name_kind(&self, name: &str) -> Option<NameKind> {
		self.by_name.get(&fold(name)).map(|binding| binding.kind)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(&fold(name))
	}

	/// Builds a fresh zero-value instance by name.
	///
	/// Instances exposing [`Aliased`](armature_model::Aliased) are told which
	/// folded name resolved them.
	pub fn make(&self, name: &str) -> Option<Box<dyn Model>> {
		let name = fold(name);
		let binding = self.by_name.get(&name)?;
		let mut model = self.types[binding.index].instantiate();
		if let Some(aliased) = model.as_aliased_mut() {
			aliased.set_alias(&name);
		}
		Some(model)
	}

	/// Builds a fresh instance by name and views it as `C`.
	///
	/// Returns `None` if the name is unknown or the type does not provide `C`.
	pub fn make_as<C: ?Sized + Capability>(&self, name: &str) -> Option<Box<C>> {
		let entry = self.get(name)?;
		if !entry.supports::<C>() {
			return None;
		}
		entry.cast::<C>(self.make(name)?)
	}

	/// Returns the registered casing of `label`.
	pub fn format_label(&self, label: &str) -> Option<&str> {
		self.labels.format(label)
	}

	/// Every registered label in its stored casing, sorted.
	pub fn labels(&self) -> Vec<&str> {
		let mut labels: Vec<_> = self.labels.iter().collect();
		labels.sort_unstable();
		labels
	}

	/// Snapshot of every name, canonical and alias, and the entry it resolves to.
	pub fn all_types(&self) -> BTreeMap<&str, &TypeEntry> {
		self.by_name
			.iter()
			.map(|(name, binding)| (name.as_str(), &self.types[binding.index]))
			.collect()
	}

	/// Every registered name whose type is `C` or provides capability `C`,
	/// sorted.
	pub fn types_of<C: ?Sized + Capability>(&self) -> Vec<&str> {
		let mut names: Vec<_> = self
			.by_name
			.iter()
			.filter(|(_, binding)| self.types[binding.index].supports::<C>())
			.map(|(name, _)| name.as_str())
			.collect();
		names.sort_unstable();
		names
	}

	/// Canonical names in registration order.
	pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
		self.types.iter().map(TypeEntry::name)
	}

	/// Aliases bound to `name`'s entry, sorted.
	pub fn aliases_of(&self, name: &str) -> Vec<&str> {
		let Some(target) = self.by_name.get(&fold(name)) else {
			return Vec::new();
		};
		let mut aliases: Vec<_> = self
			.by_name
			.iter()
			.filter(|(_, binding)| binding.kind == NameKind::Alias && binding.index == target.index)
			.map(|(alias, _)| alias.as_str())
			.collect();
		aliases.sort_unstable();
		aliases
	}

	/// Number of registered types, not counting aliases.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}
