//! Model contract shared by every registry entry.
//!
//! This crate provides the leaf types the registry and the lifecycle engine build on:
//! - [`Model`]: the minimal capability set every catalog entry satisfies
//! - [`ErasedModel`]: object-safe codec and hook operations, implemented for every model
//! - [`Hook`]: an ordered post-decode callback bound to one instance
//! - [`Capability`] / [`Capabilities`]: opt-in trait-object views checked at runtime
//! - [`Labeled`] / [`Aliased`]: optional behaviors reached through [`Model`]
//!
//! Models are plain serde types with a `Default` zero value:
//!
//! ```rust,ignore
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Asset {
//!     key: String,
//!     dns: String,
//! }
//!
//! impl Model for Asset {
//!     fn description(&self) -> &str {
//!         "An externally reachable asset."
//!     }
//!
//!     fn key(&self) -> &str {
//!         &self.key
//!     }
//! }
//! ```

mod capability;
mod contract;
mod erased;
mod hook;
mod merge;
mod name;

pub use capability::{Aliased, Capabilities, Capability, CastSlot, Labeled};
pub use contract::Model;
pub use erased::ErasedModel;
pub use hook::{Hook, HookError};
pub use merge::merge;
pub use name::{canonical_name, fold, short_type_name};

#[cfg(test)]
mod tests;
