//! Polymorphic envelopes.
//!
//! An [`Envelope`] holds a field whose concrete type is only known once the payload
//! has been read. On the wire it is `{"type": ..., "model": ...}`; either part may
//! be missing. The type parameter is the capability every decoded model must
//! provide, `dyn Model` when anything registered will do:
//!
//! ```rust,ignore
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Risk {
//!     name: String,
//!     target: Envelope<dyn Target>,
//! }
//! ```
//!
//! Decoding resolves a registered name (see [`resolve`]), builds a fresh instance
//! through the registry, runs that instance's own `defaulted()` and decodes the
//! payload into it. Hooks are left to the lifecycle engine, which reaches the
//! envelope's model when the owning model lists it in `submodels_mut()`.

mod resolve;

use std::fmt;

use armature_model::{Capability, Model};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

pub use self::resolve::type_from_key;
use self::resolve::{MODEL, Resolution, TYPE, resolve};
use crate::context::DecodeContext;
use crate::error::{CodecError, ResolutionError, Result};

/// A model of a type chosen at decode time, constrained to capability `C`.
pub struct Envelope<C: ?Sized + Capability = dyn Model> {
	type_name: String,
	model: Option<Box<C>>,
}

impl<C: ?Sized + Capability> Default for Envelope<C> {
	fn default() -> Self {
		Self {
			type_name: String::new(),
			model: None,
		}
	}
}

impl<C: ?Sized + Capability> Envelope<C> {
	/// Wraps `model`. The type name is derived from the model when encoding.
	pub fn new(model: Box<C>) -> Self {
		Self {
			type_name: String::new(),
			model: Some(model),
		}
	}

	/// An empty envelope whose decode will construct `name`, whatever the payload says.
	pub fn with_type(name: impl Into<String>) -> Self {
		Self {
			type_name: name.into(),
			model: None,
		}
	}

	/// The preset or resolved type name; empty when neither exists.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn set_type_name(&mut self, name: impl Into<String>) {
		self.type_name = name.into();
	}

	pub fn model(&self) -> Option<&C> {
		self.model.as_deref()
	}

	pub fn model_mut(&mut self) -> Option<&mut C> {
		self.model.as_deref_mut()
	}

	/// The held model viewed as `dyn Model`.
	pub fn as_model(&self) -> Option<&dyn Model> {
		self.model.as_deref().map(|model| model.as_model())
	}

	/// Mutable `dyn Model` view, for listing the envelope in `submodels_mut()`.
	pub fn as_model_mut(&mut self) -> Option<&mut dyn Model> {
		self.model.as_deref_mut().map(|model| model.as_model_mut())
	}

	pub fn into_model(self) -> Option<Box<C>> {
		self.model
	}

	pub fn is_empty(&self) -> bool {
		self.model.is_none()
	}

	/// The name written on encode: the preset or resolved name, else the name the
	/// model reports for itself.
	pub fn reported_type(&self) -> String {
		if !self.type_name.is_empty() {
			return self.type_name.clone();
		}
		self.as_model()
			.map(|model| model.reported_name())
			.unwrap_or_default()
	}

	pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
		self.as_model()?.downcast_ref::<T>()
	}

	/// Resolves and decodes `payload` into this envelope, replacing its model.
	///
	/// A null payload leaves the envelope empty, preset type included. An empty
	/// object does the same unless a type is preset, in which case it yields a
	/// defaulted instance of that type.
	pub fn decode_value(&mut self, payload: Value, context: &DecodeContext) -> Result<()> {
		let _guard = context.enter();
		let Resolution::Resolved { name, body } = resolve(&self.type_name, payload)? else {
			trace!("envelope payload is empty");
			*self = Self::default();
			return Ok(());
		};

		let registry = context.registry();
		let entry = registry
			.get(&name)
			.ok_or_else(|| ResolutionError::Unregistered { name: name.clone() })?;
		if !entry.supports::<C>() {
			return Err(ResolutionError::Unsatisfied {
				name,
				capability: C::capability_name(),
			}
			.into());
		}
		trace!(name = %name, rust_type = entry.rust_type(), "resolved envelope type");

		let mut model = entry.instantiate();
		if !context.options().skip_defaults {
			model.defaulted();
		}
		model.decode_value(body).map_err(CodecError::from)?;
		if let Some(aliased) = model.as_aliased_mut() {
			aliased.set_alias(&name);
		}

		let model = entry.cast::<C>(model).ok_or_else(|| ResolutionError::Unsatisfied {
			name: name.clone(),
			capability: C::capability_name(),
		})?;
		self.type_name = name;
		self.model = Some(model);
		Ok(())
	}

	/// Encodes the envelope as a value tree.
	///
	/// `type` is written whenever a name is known, so a preset survives a round
	/// trip even before a model exists. An envelope with neither is `{}`.
	pub fn to_value(&self) -> Result<Value, serde_json::Error> {
		let mut object = Map::new();
		let reported = self.reported_type();
		if !reported.is_empty() {
			object.insert(TYPE.to_owned(), Value::String(reported));
		}
		if let Some(model) = self.as_model() {
			object.insert(MODEL.to_owned(), model.to_value()?);
		}
		Ok(Value::Object(object))
	}
}

impl<C: ?Sized + Capability> Serialize for Envelope<C> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_value()
			.map_err(serde::ser::Error::custom)?
			.serialize(serializer)
	}
}

/// Decodes through the active [`DecodeContext`], so an envelope can be a plain
/// field of any model.
impl<'de, C: ?Sized + Capability> Deserialize<'de> for Envelope<C> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let payload = Value::deserialize(deserializer)?;
		let mut envelope = Self::default();
		envelope
			.decode_value(payload, &DecodeContext::current())
			.map_err(D::Error::custom)?;
		Ok(envelope)
	}
}

impl<C: ?Sized + Capability> fmt::Debug for Envelope<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Envelope")
			.field("type_name", &self.type_name)
			.field("model", &self.as_model())
			.finish()
	}
}
