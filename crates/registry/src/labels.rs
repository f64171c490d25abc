//! Global label table.
//!
//! # Invariants
//!
//! - Keys are folded (lowercased); values keep the first-registered casing.
//! - Re-registering a label succeeds only when the casing is byte-identical.

use armature_model::fold;
use rustc_hash::FxHashMap as HashMap;

use crate::error::RegistryError;

#[derive(Debug, Clone, Default)]
pub struct LabelTable {
	by_folded: HashMap<String, String>,
}

impl LabelTable {
	/// Returns the registered casing of `label`, matched case-insensitively.
	pub fn format(&self, label: &str) -> Option<&str> {
		self.by_folded.get(&fold(label)).map(String::as_str)
	}

	/// Checks `label` against the table without committing it.
	pub fn check(&self, label: &str) -> Result<(), RegistryError> {
		match self.by_folded.get(&fold(label)) {
			Some(existing) if existing != label => Err(RegistryError::LabelConflict {
				existing: existing.clone(),
				incoming: label.to_owned(),
			}),
			_ => Ok(()),
		}
	}

	/// Checks a whole set of labels, including conflicts within the set.
	pub fn check_all(&self, labels: &[String]) -> Result<(), RegistryError> {
		let mut pending: HashMap<String, &str> = HashMap::default();
		for label in labels {
			self.check(label)?;
			if let Some(existing) = pending.insert(fold(label), label)
				&& existing != label
			{
				return Err(RegistryError::LabelConflict {
					existing: existing.to_owned(),
					incoming: label.clone(),
				});
			}
		}
		Ok(())
	}

	/// Registers `label`, keeping the stored casing if it is already present.
	pub fn insert(&mut self, label: &str) -> Result<(), RegistryError> {
		self.check(label)?;
		self.by_folded
			.entry(fold(label))
			.or_insert_with(|| label.to_owned());
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.by_folded.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_folded.is_empty()
	}

	/// Iterates registered labels in their stored casing.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.by_folded.values().map(String::as_str)
	}
}
