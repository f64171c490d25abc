//! Per-type registry descriptors.

use std::any::TypeId;
use std::fmt;

use armature_model::{Capabilities, Capability, CastSlot, Model};
use rustc_hash::FxHashMap as HashMap;

/// Descriptor and factory for one registered model type.
pub struct TypeEntry {
	name: String,
	rust_type: &'static str,
	type_id: TypeId,
	description: String,
	labels: Vec<String>,
	factory: fn() -> Box<dyn Model>,
	casts: HashMap<TypeId, CastSlot>,
}

impl TypeEntry {
	/// Builds the descriptor for `T` under canonical `name`.
	///
	/// A zero value of `T` is inspected once for its description and labels.
	pub(crate) fn of<T: Model + Default>(name: String) -> Self {
		let zero = T::default();
		let labels = zero
			.as_labeled()
			.map(|labeled| labeled.labels())
			.unwrap_or_default();

		let mut caps = Capabilities::<T>::new();
		T::capabilities(&mut caps);
		let casts = caps
			.into_slots()
			.into_iter()
			.map(|slot| (slot.capability(), slot))
			.collect();

		Self {
			name,
			rust_type: std::any::type_name::<T>(),
			type_id: TypeId::of::<T>(),
			description: zero.description().to_owned(),
			labels,
			factory: zero_value::<T>,
			casts,
		}
	}

	/// Canonical (lowercased) name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Full Rust type path of the registered type.
	pub fn rust_type(&self) -> &'static str {
		self.rust_type
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	/// Labels the type declared, in declared casing.
	pub fn labels(&self) -> &[String] {
		&self.labels
	}

	/// Names of every capability view the type provides.
	pub fn capability_names(&self) -> Vec<&'static str> {
		let mut names: Vec<_> = self.casts.values().map(CastSlot::name).collect();
		names.sort_unstable();
		names
	}

	/// Returns true if the type is `C` or declared `C` as a capability.
	pub fn supports<C: ?Sized + Capability>(&self) -> bool {
		self.casts.contains_key(&TypeId::of::<C>())
	}

	/// Builds a fresh zero value.
	pub fn instantiate(&self) -> Box<dyn Model> {
		(self.factory)()
	}

	/// Views a model built by this entry as `C`.
	///
	/// Returns `None` if `C` is not supported or `model` is not this entry's type.
	pub fn cast<C: ?Sized + Capability>(&self, model: Box<dyn Model>) -> Option<Box<C>> {
		self.casts.get(&TypeId::of::<C>())?.cast::<C>(model)
	}
}

impl fmt::Debug for TypeEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeEntry")
			.field("name", &self.name)
			.field("rust_type", &self.rust_type)
			.field("labels", &self.labels)
			.field("capabilities", &self.capability_names())
			.finish_non_exhaustive()
	}
}

fn zero_value<T: Model + Default>() -> Box<dyn Model> {
	Box::new(T::default())
}
