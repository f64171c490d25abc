//! Wire encodings.
//!
//! Both encodings decode into a [`serde_json::Value`] tree first, so type
//! resolution and structural decoding never depend on which one carried the bytes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CodecError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
	/// JSON, the interchange encoding.
	#[default]
	Json,
	/// MessagePack with named fields, the persistent-store encoding.
	MsgPack,
}

impl Encoding {
	/// Parses `bytes` into a value tree. Empty input is [`Value::Null`].
	pub fn decode(self, bytes: &[u8]) -> Result<Value, CodecError> {
		if bytes.is_empty() {
			return Ok(Value::Null);
		}
		Ok(match self {
			Self::Json => serde_json::from_slice(bytes)?,
			Self::MsgPack => rmp_serde::from_slice(bytes)?,
		})
	}

	pub fn encode(self, value: &Value) -> Result<Vec<u8>, CodecError> {
		Ok(match self {
			Self::Json => serde_json::to_vec(value)?,
			Self::MsgPack => rmp_serde::to_vec_named(value)?,
		})
	}
}

impl std::fmt::Display for Encoding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "json"),
			Self::MsgPack => write!(f, "msgpack"),
		}
	}
}
