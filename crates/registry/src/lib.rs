//! Catalog of named, polymorphic model types.
//!
//! The registry maps case-insensitive names to [`TypeEntry`] descriptors and
//! factories, so calling code can build a model from a name rather than a type:
//!
//! ```rust,ignore
//! let mut registry = TypeRegistry::new();
//! registry.register::<Asset>(&["host"])?;
//!
//! let model = registry.make("HOST").expect("registered");
//! assert_eq!(model.canonical_name(), "asset");
//! ```
//!
//! # Sub-modules
//!
//! - [`registry`] - The [`TypeRegistry`] itself: registration, lookup, construction
//! - [`entry`] - Per-type descriptors and capability casts
//! - [`labels`] - Global case-folded label table
//! - [`config`] - Alias and label conflict policies
//! - [`registration`] - Load-time registration via `inventory`
//!
//! # Lifecycle
//!
//! A registry is built once, early, by repeated `register` calls and is read-only
//! afterward. Share it as `Arc<TypeRegistry>`. Models registered with
//! [`register_model!`] are collected into the process-wide [`global`] registry.

pub mod config;
pub mod entry;
pub mod error;
pub mod labels;
pub mod registration;
pub mod registry;

mod global;

pub use armature_model::{Capability, Model, fold};
pub use config::{AliasPolicy, ConfigError, RegistryConfig};
pub use entry::TypeEntry;
pub use error::RegistryError;
pub use global::global;
#[doc(hidden)]
pub use inventory;
pub use registration::ModelRegistration;
pub use registry::{NameKind, TypeRegistry};
