//! Three-phase construction of a model tree.
//!
//! # Phases
//!
//! 1. Default: `defaulted()` on the root and then on every sub-entity, depth first.
//! 2. Decode: a single structural decode of the payload into the root.
//! 3. Hooks: the root's hooks in declared order, then every sub-entity's hooks,
//!    depth first. Sub-entities are rediscovered after decoding, so children the
//!    payload populated are included.
//!
//! Each phase finishes over the whole tree before the next starts. A hook therefore
//! never observes a node whose payload values have not been applied yet.
//!
//! # Failure
//!
//! A decode error aborts before any hook runs. The first hook error aborts the call
//! and leaves earlier hook mutations in place.

use std::convert::Infallible;

use armature_model::{ErasedModel, HookError, Model};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{CodecError, Result};

/// Visits `model` and then its sub-entities, pre-order.
fn walk<E, F>(model: &mut dyn Model, visit: &mut F) -> Result<(), E>
where
	F: FnMut(&mut dyn Model) -> Result<(), E>,
{
	visit(&mut *model)?;
	for child in model.submodels_mut() {
		walk(child, visit)?;
	}
	Ok(())
}

/// Runs `defaulted()` on `model` and every sub-entity, parents first.
pub fn apply_defaults(model: &mut dyn Model) {
	let Ok(()) = walk::<Infallible, _>(model, &mut |node: &mut dyn Model| {
		trace!(model = %node.canonical_name(), "defaulted");
		node.defaulted();
		Ok(())
	});
}

/// Runs the hooks of `model` and every sub-entity, parents first.
///
/// Stops at the first failing hook anywhere in the tree.
pub fn run_hooks(model: &mut dyn Model) -> Result<(), HookError> {
	walk(model, &mut |node: &mut dyn Model| node.run_hooks())
}

/// Applies all three phases to `model` with an already parsed payload.
///
/// A [`Value::Null`] payload skips the decode phase. A name recorded through
/// [`Aliased`](armature_model::Aliased) survives the decode.
///
/// Envelopes nested in the payload resolve against the active
/// [`DecodeContext`](crate::DecodeContext).
pub fn populate_value(model: &mut dyn Model, payload: Value) -> Result<()> {
	let name = model.canonical_name();
	let alias = model
		.as_aliased()
		.and_then(|aliased| aliased.alias())
		.map(str::to_owned);

	debug!(model = %name, "applying defaults");
	apply_defaults(model);

	if !payload.is_null() {
		debug!(model = %name, "decoding payload");
		model.decode_value(payload).map_err(CodecError::from)?;
		if let Some(alias) = alias
			&& let Some(aliased) = model.as_aliased_mut()
		{
			aliased.set_alias(&alias);
		}
	}

	debug!(model = %name, "running hooks");
	run_hooks(model)?;
	Ok(())
}

#[cfg(test)]
mod tests;
