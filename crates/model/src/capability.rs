//! Opt-in behaviors and trait-object views of a model.
//!
//! # Role
//!
//! A concrete model opts into extra behavior without a shared base type. Two kinds
//! exist:
//!
//! - Optional behaviors ([`Labeled`], [`Aliased`]) reached through the `as_*` methods
//!   on [`Model`].
//! - Capability views: trait objects such as `dyn Target` that a type declares in
//!   [`Model::capabilities`]. The registry keeps the declared casts per type so a
//!   `Box<dyn Model>` built by name can be turned into `Box<dyn Target>` later.
//!
//! # Invariants
//!
//! - Every type implicitly provides itself and `dyn Model`.
//! - A cast only succeeds for the concrete type that declared it.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::contract::Model;

/// A model that declares classification labels.
pub trait Labeled {
	fn labels(&self) -> Vec<String>;
}

/// A model that remembers which registry name resolved it.
pub trait Aliased {
	/// Records the (folded) name the instance was constructed through.
	fn set_alias(&mut self, alias: &str);

	/// Returns the recorded name, if any.
	fn alias(&self) -> Option<&str>;
}

/// A view a registered model can be requested as.
///
/// Implemented for every concrete model, for `dyn Model`, and for user trait
/// objects through [`capability!`](crate::capability!).
pub trait Capability: 'static {
	fn as_model(&self) -> &dyn Model;

	fn as_model_mut(&mut self) -> &mut dyn Model;

	fn into_model(self: Box<Self>) -> Box<dyn Model>;

	/// Name used in diagnostics.
	fn capability_name() -> &'static str {
		std::any::type_name::<Self>()
	}
}

impl<T: Model> Capability for T {
	fn as_model(&self) -> &dyn Model {
		self
	}

	fn as_model_mut(&mut self) -> &mut dyn Model {
		self
	}

	fn into_model(self: Box<Self>) -> Box<dyn Model> {
		self
	}
}

impl Capability for dyn Model {
	fn as_model(&self) -> &dyn Model {
		self
	}

	fn as_model_mut(&mut self) -> &mut dyn Model {
		self
	}

	fn into_model(self: Box<Self>) -> Box<dyn Model> {
		self
	}

	fn capability_name() -> &'static str {
		"dyn Model"
	}
}

/// Declares a model sub-trait as a capability.
///
/// ```rust,ignore
/// pub trait Target: Model {
///     fn group(&self) -> &str;
/// }
/// armature_model::capability!(Target);
/// ```
#[macro_export]
macro_rules! capability {
	($($cap:ident)::+) => {
		impl $crate::Capability for dyn $($cap)::+ {
			fn as_model(&self) -> &dyn $crate::Model {
				self
			}

			fn as_model_mut(&mut self) -> &mut dyn $crate::Model {
				self
			}

			fn into_model(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn $crate::Model> {
				self
			}
		}
	};
}

/// Type-erased conversion from `Box<dyn Model>` into `Box<C>`.
struct Caster<C: ?Sized>(Box<dyn Fn(Box<dyn Model>) -> Option<Box<C>> + Send + Sync>);

/// One declared capability of a registered type.
pub struct CastSlot {
	capability: TypeId,
	name: &'static str,
	caster: Box<dyn Any + Send + Sync>,
}

impl CastSlot {
	pub fn capability(&self) -> TypeId {
		self.capability
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Converts `model` into the capability view, `None` when `C` is not the
	/// capability this slot was declared for or the concrete type differs.
	pub fn cast<C: ?Sized + Capability>(&self, model: Box<dyn Model>) -> Option<Box<C>> {
		let caster = self.caster.downcast_ref::<Caster<C>>()?;
		(caster.0)(model)
	}
}

impl fmt::Debug for CastSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CastSlot").field("name", &self.name).finish_non_exhaustive()
	}
}

/// Builder collecting the capabilities a model type provides.
pub struct Capabilities<T> {
	slots: Vec<CastSlot>,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Model> Capabilities<T> {
	/// Starts with the identity views: `T` itself and `dyn Model`.
	pub fn new() -> Self {
		let mut caps = Self {
			slots: Vec::new(),
			_marker: PhantomData,
		};
		caps.insert::<T, _>(|model| {
			let any: Box<dyn Any> = model;
			any.downcast::<T>().ok()
		});
		caps.insert::<dyn Model, _>(Some);
		caps
	}

	/// Declares that `T` can be viewed as `C`.
	///
	/// ```rust,ignore
	/// fn capabilities(caps: &mut Capabilities<Self>) {
	///     caps.provide::<dyn Target>(|asset| asset);
	/// }
	/// ```
	pub fn provide<C>(&mut self, cast: fn(Box<T>) -> Box<C>) -> &mut Self
	where
		C: ?Sized + Capability,
	{
		self.insert::<C, _>(move |model| {
			let any: Box<dyn Any> = model;
			any.downcast::<T>().ok().map(cast)
		});
		self
	}

	/// Returns true if `C` has been declared.
	pub fn provides<C: ?Sized + Capability>(&self) -> bool {
		let id = TypeId::of::<C>();
		self.slots.iter().any(|slot| slot.capability == id)
	}

	pub fn into_slots(self) -> Vec<CastSlot> {
		self.slots
	}

	fn insert<C, F>(&mut self, cast: F)
	where
		C: ?Sized + Capability,
		F: Fn(Box<dyn Model>) -> Option<Box<C>> + Send + Sync + 'static,
	{
		let id = TypeId::of::<C>();
		self.slots.retain(|slot| slot.capability != id);
		self.slots.push(CastSlot {
			capability: id,
			name: C::capability_name(),
			caster: Box::new(Caster::<C>(Box::new(cast))),
		});
	}
}

impl<T: Model> Default for Capabilities<T> {
	fn default() -> Self {
		Self::new()
	}
}
