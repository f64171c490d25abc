use std::borrow::Cow;
use std::fmt;

type HookFn<M> = dyn Fn(&mut M) -> anyhow::Result<()> + Send + Sync;

/// Deferred post-decode initialization bound to one instance.
///
/// Hooks run after the whole payload has been decoded, so a hook may derive
/// values (an identity key, say) from any combination of fields.
pub struct Hook<M> {
	description: Cow<'static, str>,
	callback: Box<HookFn<M>>,
}

impl<M> Hook<M> {
	pub fn new<F>(description: impl Into<Cow<'static, str>>, callback: F) -> Self
	where
		F: Fn(&mut M) -> anyhow::Result<()> + Send + Sync + 'static,
	{
		Self {
			description: description.into(),
			callback: Box::new(callback),
		}
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	/// Invokes the callback against `model`.
	pub fn call(&self, model: &mut M) -> anyhow::Result<()> {
		(self.callback)(model)
	}
}

impl<M> fmt::Debug for Hook<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hook")
			.field("description", &self.description)
			.finish_non_exhaustive()
	}
}

/// A hook callback returned an error.
#[derive(Debug, thiserror::Error)]
#[error("hook '{hook}' on '{model}' failed: {source}")]
pub struct HookError {
	/// Canonical name of the model whose hook failed.
	pub model: String,
	/// Description of the failing hook.
	pub hook: String,
	#[source]
	pub source: anyhow::Error,
}
