use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::contract::Model;
use crate::hook::HookError;
use crate::merge::merge;
use crate::name::canonical_name;

/// Object-safe operations available on every `dyn Model`.
///
/// Implemented for all models through a blanket impl; never implement it by hand.
/// The codec works on [`serde_json::Value`] trees so every wire encoding shares a
/// single structural decode.
pub trait ErasedModel {
	/// Lowercased type name this model registers under.
	fn canonical_name(&self) -> String;

	/// Name the model reports when encoded: the resolving alias if one was
	/// recorded, otherwise the canonical name.
	fn reported_name(&self) -> String;

	/// Serializes the current state into a value tree.
	fn to_value(&self) -> Result<Value, serde_json::Error>;

	/// Decodes `payload` over the current state.
	///
	/// Object fields merge recursively; any other value replaces what was there.
	/// Fields absent from the payload keep their current (possibly defaulted)
	/// values. Fields serde skips are reset to their `Default`.
	fn decode_value(&mut self, payload: Value) -> Result<(), serde_json::Error>;

	/// Runs this model's own hooks in declared order, stopping at the first error.
	fn run_hooks(&mut self) -> Result<(), HookError>;
}

impl<T> ErasedModel for T
where
	T: Model + Serialize + DeserializeOwned,
{
	fn canonical_name(&self) -> String {
		canonical_name::<T>()
	}

	fn reported_name(&self) -> String {
		match self.as_aliased().and_then(|aliased| aliased.alias()) {
			Some(alias) if !alias.is_empty() => alias.to_owned(),
			_ => canonical_name::<T>(),
		}
	}

	fn to_value(&self) -> Result<Value, serde_json::Error> {
		serde_json::to_value(self)
	}

	fn decode_value(&mut self, payload: Value) -> Result<(), serde_json::Error> {
		let mut current = serde_json::to_value(&*self)?;
		merge(&mut current, payload);
		*self = serde_json::from_value(current)?;
		Ok(())
	}

	fn run_hooks(&mut self) -> Result<(), HookError> {
		for hook in self.hooks() {
			hook.call(self).map_err(|source| HookError {
				model: canonical_name::<T>(),
				hook: hook.description().to_owned(),
				source,
			})?;
		}
		Ok(())
	}
}
