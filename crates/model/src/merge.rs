use serde_json::Value;

/// Applies `patch` over `target` the way a structural decode into an existing
/// value does.
///
/// Objects merge key by key, recursing into nested objects. Every other patch
/// value (arrays, scalars, null) replaces the target outright.
pub fn merge(target: &mut Value, patch: Value) {
	match (target, patch) {
		(Value::Object(fields), Value::Object(updates)) => {
			for (key, update) in updates {
				match fields.get_mut(&key) {
					Some(slot) => merge(slot, update),
					None => {
						fields.insert(key, update);
					}
				}
			}
		}
		(slot, patch) => *slot = patch,
	}
}
