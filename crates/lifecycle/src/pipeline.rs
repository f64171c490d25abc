//! Byte-level entry points.
//!
//! A [`Pipeline`] pairs a registry with a wire [`Encoding`] and decode options.
//! Every call installs its [`DecodeContext`] for the duration of the call, so
//! envelopes nested anywhere in the payload resolve against the same registry.

use std::sync::Arc;

use armature_model::{Capability, Model};
use armature_registry::TypeRegistry;
use tracing::debug;

use crate::context::{DecodeContext, DecodeOptions};
use crate::encoding::Encoding;
use crate::envelope::Envelope;
use crate::error::{Error, ResolutionError, Result};
use crate::lifecycle;

#[derive(Clone, Debug)]
pub struct Pipeline {
	context: DecodeContext,
	encoding: Encoding,
}

impl Pipeline {
	pub fn new(registry: Arc<TypeRegistry>) -> Self {
		Self {
			context: DecodeContext::new(registry),
			encoding: Encoding::default(),
		}
	}

	/// A pipeline over the process-wide registry.
	pub fn global() -> Self {
		Self::new(armature_registry::global())
	}

	pub fn with_encoding(mut self, encoding: Encoding) -> Self {
		self.encoding = encoding;
		self
	}

	pub fn with_options(mut self, options: DecodeOptions) -> Self {
		self.context = self.context.with_options(options);
		self
	}

	pub fn registry(&self) -> &Arc<TypeRegistry> {
		self.context.registry()
	}

	pub fn encoding(&self) -> Encoding {
		self.encoding
	}

	pub fn context(&self) -> &DecodeContext {
		&self.context
	}

	/// Defaults, decodes and hooks `model` in place.
	///
	/// On error `model` keeps whatever state the failing phase left behind.
	pub fn populate(&self, model: &mut dyn Model, payload: &[u8]) -> Result<()> {
		let value = self.encoding.decode(payload)?;
		let _guard = self.context.enter();
		lifecycle::populate_value(model, value)
	}

	/// Builds a `T` from its zero value and populates it.
	pub fn populate_into<T: Model + Default>(&self, payload: &[u8]) -> Result<T> {
		let mut model = T::default();
		self.populate(&mut model, payload)?;
		Ok(model)
	}

	/// Builds the type registered as `name` and populates it.
	pub fn construct(&self, name: &str, payload: &[u8]) -> Result<Box<dyn Model>> {
		let mut model = self
			.registry()
			.make(name)
			.ok_or_else(|| Error::UnknownType(name.to_owned()))?;
		debug!(name, model = %model.canonical_name(), encoding = %self.encoding, "constructing model");
		self.populate(model.as_mut(), payload)?;
		Ok(model)
	}

	/// Like [`construct`](Self::construct), viewing the result as capability `C`.
	pub fn construct_as<C: ?Sized + Capability>(&self, name: &str, payload: &[u8]) -> Result<Box<C>> {
		let entry = self
			.registry()
			.get(name)
			.ok_or_else(|| Error::UnknownType(name.to_owned()))?;
		let unsatisfied = || ResolutionError::Unsatisfied {
			name: entry.name().to_owned(),
			capability: C::capability_name(),
		};
		if !entry.supports::<C>() {
			return Err(unsatisfied().into());
		}
		let model = self.construct(name, payload)?;
		Ok(entry.cast::<C>(model).ok_or_else(unsatisfied)?)
	}

	pub fn decode_envelope<C: ?Sized + Capability>(&self, payload: &[u8]) -> Result<Envelope<C>> {
		let mut envelope = Envelope::default();
		self.decode_envelope_into(&mut envelope, payload)?;
		Ok(envelope)
	}

	/// Decodes into an existing envelope, honoring a preset type name.
	pub fn decode_envelope_into<C: ?Sized + Capability>(&self, envelope: &mut Envelope<C>, payload: &[u8]) -> Result<()> {
		let value = self.encoding.decode(payload)?;
		envelope.decode_value(value, &self.context)
	}

	pub fn encode_envelope<C: ?Sized + Capability>(&self, envelope: &Envelope<C>) -> Result<Vec<u8>> {
		let value = envelope.to_value()?;
		Ok(self.encoding.encode(&value)?)
	}

	/// Encodes a bare model, without an envelope.
	pub fn encode(&self, model: &dyn Model) -> Result<Vec<u8>> {
		let value = model.to_value()?;
		Ok(self.encoding.encode(&value)?)
	}
}
