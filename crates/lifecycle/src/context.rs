//! Decode context.
//!
//! An [`Envelope`](crate::Envelope) nested inside a model is decoded by serde, which
//! cannot pass the registry down. The pipeline installs a [`DecodeContext`] for the
//! duration of a call and nested envelopes read it back with
//! [`DecodeContext::current`].
//!
//! # Invariants
//!
//! - Contexts are per thread and strictly nested; dropping a [`ContextGuard`]
//!   restores the previously active one.
//! - With no active context, decoding falls back to the process-wide
//!   [`global`](armature_registry::global) registry and default options.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use armature_registry::TypeRegistry;

/// Per-call decode flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
	/// Skip the single-node `defaulted()` call on instances an envelope constructs.
	pub skip_defaults: bool,
}

/// Registry and options used while decoding.
#[derive(Clone, Debug)]
pub struct DecodeContext {
	registry: Arc<TypeRegistry>,
	options: DecodeOptions,
}

thread_local! {
	static ACTIVE: RefCell<Vec<DecodeContext>> = const { RefCell::new(Vec::new()) };
}

impl DecodeContext {
	pub fn new(registry: Arc<TypeRegistry>) -> Self {
		Self {
			registry,
			options: DecodeOptions::default(),
		}
	}

	pub fn with_options(mut self, options: DecodeOptions) -> Self {
		self.options = options;
		self
	}

	pub fn registry(&self) -> &Arc<TypeRegistry> {
		&self.registry
	}

	pub fn options(&self) -> DecodeOptions {
		self.options
	}

	/// Returns the innermost active context, or a default one over the global registry.
	pub fn current() -> Self {
		ACTIVE
			.with(|stack| stack.borrow().last().cloned())
			.unwrap_or_else(|| Self::new(armature_registry::global()))
	}

	/// Makes this context the active one until the guard is dropped.
	#[must_use = "the context is only active while the guard is alive"]
	pub fn enter(&self) -> ContextGuard {
		ACTIVE.with(|stack| stack.borrow_mut().push(self.clone()));
		ContextGuard {
			_not_send: PhantomData,
		}
	}

	/// Runs `f` with this context active.
	pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
		let _guard = self.enter();
		f()
	}
}

/// Keeps a [`DecodeContext`] active on the current thread.
#[derive(Debug)]
pub struct ContextGuard {
	_not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
	fn drop(&mut self) {
		// Thread teardown may already have destroyed the stack.
		let _ = ACTIVE.try_with(|stack| stack.borrow_mut().pop());
	}
}

/// Number of contexts active on this thread.
#[cfg(test)]
pub(crate) fn depth() -> usize {
	ACTIVE.with(|stack| stack.borrow().len())
}
