use crate::contract::Model;

/// Returns the last path segment of `T`'s type name, without generic arguments.
///
/// `crate::assets::Asset` becomes `Asset`; `Wrapper<Inner>` becomes `Wrapper`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
	let full = std::any::type_name::<T>();
	let base = full.split('<').next().unwrap_or(full);
	base.rsplit("::").next().unwrap_or(base)
}

/// Returns the canonical registry name of `T`.
pub fn canonical_name<T: Model>() -> String {
	fold(T::type_name())
}

/// Folds a registry name or label into its lookup form.
pub fn fold(name: &str) -> String {
	name.to_lowercase()
}
