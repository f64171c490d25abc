use std::any::Any;
use std::fmt;

use crate::capability::{Aliased, Capabilities, Labeled};
use crate::erased::ErasedModel;
use crate::hook::Hook;
use crate::name::short_type_name;

/// A named, polymorphic record type.
///
/// Only [`description`](Self::description) is required. Everything else has a
/// neutral default so a concrete type opts into exactly the behavior it needs.
/// Optional behaviors ([`Labeled`], [`Aliased`]) are reached through the `as_*`
/// methods instead of a shared base type.
///
/// Implementors must also be serde types (`Serialize + DeserializeOwned`); the
/// blanket [`ErasedModel`] impl supplies the object-safe codec on top of that.
pub trait Model: Any + Send + Sync + ErasedModel + 'static {
	/// Returns the human-readable description of this type.
	fn description(&self) -> &str;

	/// Returns post-decode hooks in execution order.
	fn hooks(&self) -> Vec<Hook<Self>>
	where
		Self: Sized,
	{
		Vec::new()
	}

	/// Sets default field values in place. Runs before any payload is applied.
	fn defaulted(&mut self) {}

	/// Returns the identity key, empty when the model has none.
	fn key(&self) -> &str {
		""
	}

	/// Returns the direct sub-entities held by this model.
	///
	/// Children held by value, by `Box`, or through a capability-typed field are
	/// listed here. Absent optional children are simply omitted.
	fn submodels_mut(&mut self) -> Vec<&mut dyn Model> {
		Vec::new()
	}

	/// Returns the label view of this model, if it declares labels.
	fn as_labeled(&self) -> Option<&dyn Labeled> {
		None
	}

	/// Returns the alias view of this model, if it tracks its resolving name.
	fn as_aliased(&self) -> Option<&dyn Aliased> {
		None
	}

	/// Mutable counterpart of [`as_aliased`](Self::as_aliased).
	fn as_aliased_mut(&mut self) -> Option<&mut dyn Aliased> {
		None
	}

	/// Declares the capability trait objects this type may be viewed as.
	fn capabilities(caps: &mut Capabilities<Self>)
	where
		Self: Sized,
	{
		let _ = caps;
	}

	/// Returns the type name the canonical registry name is derived from.
	fn type_name() -> &'static str
	where
		Self: Sized,
	{
		short_type_name::<Self>()
	}
}

impl dyn Model {
	/// Returns true if the concrete type is `T`.
	pub fn is<T: Model>(&self) -> bool {
		let any: &dyn Any = self;
		any.is::<T>()
	}

	pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
		let any: &dyn Any = self;
		any.downcast_ref::<T>()
	}

	pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
		let any: &mut dyn Any = self;
		any.downcast_mut::<T>()
	}

	/// Recovers the concrete box, handing the original back on mismatch.
	pub fn downcast<T: Model>(self: Box<Self>) -> Result<Box<T>, Box<dyn Model>> {
		if self.is::<T>() {
			let any: Box<dyn Any> = self;
			Ok(any.downcast::<T>().unwrap_or_else(|_| unreachable!("type checked above")))
		} else {
			Err(self)
		}
	}
}

impl fmt::Debug for dyn Model {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.to_value() {
			Ok(value) => f
				.debug_tuple(&self.canonical_name())
				.field(&value)
				.finish(),
			Err(_) => f.debug_tuple(&self.canonical_name()).finish_non_exhaustive(),
		}
	}
}
