//! Concrete type resolution for envelope payloads.
//!
//! First match wins:
//!
//! 1. a type name preset on the envelope
//! 2. the payload's `type` property
//! 3. the payload's identity key, `#<type>#<rest>`
//! 4. the same search inside a nested `model` object
//!
//! A null payload always means "no model", preset or not, as does a nested
//! `model` that is null or not an object. An empty object means "no model" only
//! when nothing is preset; with a preset it builds that type from defaults.

use armature_model::fold;
use serde_json::{Map, Value};

use crate::error::ResolutionError;

pub(crate) const TYPE: &str = "type";
pub(crate) const MODEL: &str = "model";
const KEY: &str = "key";

/// Outcome of resolving a payload.
#[derive(Debug, PartialEq)]
pub(crate) enum Resolution {
	/// Nothing to decode; the envelope becomes empty.
	Absent,
	/// `body` is to be decoded into a fresh instance of `name` (folded).
	Resolved { name: String, body: Value },
}

pub(crate) fn resolve(preset: &str, payload: Value) -> Result<Resolution, ResolutionError> {
	let mut outer = match payload {
		Value::Null => return Ok(Resolution::Absent),
		Value::Object(map) if map.is_empty() && preset.is_empty() => return Ok(Resolution::Absent),
		Value::Object(map) => map,
		_ => return Err(ResolutionError::Unresolved),
	};

	let nested = match outer.remove(MODEL) {
		None => None,
		Some(Value::Object(nested)) => Some(nested),
		// Malformed nested data is tolerated as absence.
		Some(_) => return Ok(Resolution::Absent),
	};

	let mut name = (!preset.is_empty()).then(|| preset.to_owned());
	if name.is_none() {
		name = declared_type(&outer)?;
	}
	if name.is_none()
		&& let Some(nested) = &nested
	{
		name = nested_type(nested)?;
	}

	let Some(name) = name else {
		return match nested {
			Some(nested) if nested.is_empty() => Ok(Resolution::Absent),
			_ => Err(ResolutionError::Unresolved),
		};
	};

	let body = Value::Object(nested.unwrap_or(outer));
	Ok(Resolution::Resolved { name: fold(&name), body })
}

/// Type named directly on `object`, by `type` or else by identity key.
fn declared_type(object: &Map<String, Value>) -> Result<Option<String>, ResolutionError> {
	if let Some(Value::String(name)) = object.get(TYPE)
		&& !name.is_empty()
	{
		return Ok(Some(name.clone()));
	}
	match object.get(KEY) {
		Some(Value::String(key)) if !key.is_empty() => type_from_key(key).map(|name| Some(name.to_owned())),
		_ => Ok(None),
	}
}

fn nested_type(object: &Map<String, Value>) -> Result<Option<String>, ResolutionError> {
	if let Some(name) = declared_type(object)? {
		return Ok(Some(name));
	}
	match object.get(MODEL) {
		Some(Value::Object(inner)) => nested_type(inner),
		_ => Ok(None),
	}
}

/// Extracts the type segment of an identity key.
///
/// Only the segment after the first `#` is used: `#widget#abc#def` names `widget`.
pub fn type_from_key(key: &str) -> Result<&str, ResolutionError> {
	match key.split('#').nth(1) {
		Some(segment) if !segment.is_empty() => Ok(segment),
		_ => Err(ResolutionError::MalformedKey { key: key.to_owned() }),
	}
}
