//! Pipeline error taxonomy.
//!
//! Every failure aborts the whole pipeline call. A model handed back alongside an
//! error (through [`Pipeline::populate`](crate::Pipeline::populate)) is indeterminate
//! and should be discarded.

use armature_model::HookError;

/// Wire-level failures, propagated from the underlying codec unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	MsgPackDecode(#[from] rmp_serde::decode::Error),

	#[error(transparent)]
	MsgPackEncode(#[from] rmp_serde::encode::Error),
}

/// An envelope could not settle on a concrete type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
	/// The payload is not empty, yet names no type.
	#[error("cannot determine the type of a non-empty payload")]
	Unresolved,

	/// An identity key is present but has no `#<type>#` segment.
	#[error("identity key '{key}' has no type segment")]
	MalformedKey { key: String },

	#[error("type '{name}' is not registered")]
	Unregistered { name: String },

	/// The type exists but cannot be viewed as the requested capability.
	#[error("type '{name}' does not provide {capability}")]
	Unsatisfied {
		name: String,
		capability: &'static str,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Codec(#[from] CodecError),

	#[error(transparent)]
	Resolution(#[from] ResolutionError),

	#[error(transparent)]
	Hook(#[from] HookError),

	/// [`Pipeline::construct`](crate::Pipeline::construct) was given an unknown name.
	#[error("no registered type named '{0}'")]
	UnknownType(String),
}

impl From<serde_json::Error> for Error {
	fn from(error: serde_json::Error) -> Self {
		Self::Codec(CodecError::Json(error))
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
