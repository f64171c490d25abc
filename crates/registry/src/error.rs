//! Registration conflicts.
//!
//! Lookups never error: a missing name is an ordinary `None`.

/// A registration call was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A type with the same canonical name (or an alias spelled the same) exists.
	#[error("type '{name}' is already registered (existing: {existing}, incoming: {incoming})")]
	DuplicateType {
		name: String,
		/// Rust type path of the entry that owns the name.
		existing: &'static str,
		/// Rust type path of the rejected type.
		incoming: &'static str,
	},

	/// A label folds to one already registered with different casing.
	#[error("label '{incoming}' conflicts with registered label '{existing}'")]
	LabelConflict { existing: String, incoming: String },

	/// An alias is already bound to another type.
	#[error("alias '{alias}' for '{incoming}' is already bound to '{existing}'")]
	AliasConflict {
		alias: String,
		existing: String,
		incoming: String,
	},
}
