//! Construction pipeline for registry-backed models.
//!
//! # Sub-modules
//!
//! - [`lifecycle`] - Three-phase construction: defaults, decode, hooks
//! - [`envelope`] - Fields whose concrete type is resolved at decode time
//! - [`pipeline`] - Byte-level entry points over a registry and an encoding
//! - [`encoding`] - JSON and MessagePack wire encodings
//! - [`context`] - Registry and options visible to nested envelope decodes
//! - [`error`] - Codec, resolution and hook failures
//!
//! ```rust,ignore
//! let pipeline = Pipeline::new(Arc::new(registry));
//! let asset = pipeline.construct("asset", br#"{"dns": "example.com"}"#)?;
//!
//! let envelope: Envelope<dyn Target> = pipeline.decode_envelope(br##"{"model": {"key": "#asset#example.com"}}"##)?;
//! assert_eq!(envelope.type_name(), "asset");
//! ```

pub mod context;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod lifecycle;
pub mod pipeline;

pub use armature_model as model;
pub use armature_registry as registry;
pub use context::{ContextGuard, DecodeContext, DecodeOptions};
pub use encoding::Encoding;
pub use envelope::Envelope;
pub use error::{CodecError, Error, ResolutionError, Result};
pub use pipeline::Pipeline;
