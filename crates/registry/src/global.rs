use std::sync::{Arc, LazyLock};

use crate::registry::TypeRegistry;

static GLOBAL: LazyLock<Arc<TypeRegistry>> = LazyLock::new(|| Arc::new(TypeRegistry::from_submissions()));

/// Returns the process-wide registry built from [`register_model!`](crate::register_model!)
/// submissions.
///
/// Built on first use and never mutated afterward. Prefer threading an explicit
/// `Arc<TypeRegistry>` where one is available.
pub fn global() -> Arc<TypeRegistry> {
	Arc::clone(&GLOBAL)
}
