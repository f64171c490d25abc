use std::cell::RefCell;
use std::sync::Arc;

use armature_model::{Hook, Model};
use armature_registry::TypeRegistry;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{apply_defaults, populate_value, run_hooks};
use crate::context::DecodeContext;
use crate::envelope::Envelope;
use crate::error::Error;

thread_local! {
	static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(event: impl Into<String>) {
	EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

fn take_events() -> Vec<String> {
	EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Inner {
	defaulted: bool,
	label: String,
}

impl Model for Inner {
	fn description(&self) -> &str {
		"Innermost node."
	}

	fn defaulted(&mut self) {
		self.defaulted = true;
		record("default inner");
	}

	fn hooks(&self) -> Vec<Hook<Self>> {
		vec![Hook::new("record inner", |inner: &mut Inner| {
			record(format!("hook inner {}", inner.label));
			Ok(())
		})]
	}
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Middle {
	defaulted: bool,
	label: String,
	fail: bool,
	inner: Inner,
}

impl Model for Middle {
	fn description(&self) -> &str {
		"Middle node."
	}

	fn defaulted(&mut self) {
		self.defaulted = true;
		record("default middle");
	}

	fn hooks(&self) -> Vec<Hook<Self>> {
		vec![Hook::new("check middle", |middle: &mut Middle| {
			record("hook middle");
			anyhow::ensure!(!middle.fail, "middle rejected");
			Ok(())
		})]
	}

	fn submodels_mut(&mut self) -> Vec<&mut dyn Model> {
		vec![&mut self.inner]
	}
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Outer {
	defaulted: bool,
	middle: Middle,
	extra: Option<Box<Inner>>,
	derived: String,
}

impl Model for Outer {
	fn description(&self) -> &str {
		"Root node."
	}

	fn defaulted(&mut self) {
		self.defaulted = true;
		record("default outer");
	}

	fn hooks(&self) -> Vec<Hook<Self>> {
		vec![Hook::new("derive", |outer: &mut Outer| {
			outer.derived = format!("{}/{}", outer.middle.label, outer.middle.inner.label);
			record("hook outer");
			Ok(())
		})]
	}

	fn submodels_mut(&mut self) -> Vec<&mut dyn Model> {
		let mut children: Vec<&mut dyn Model> = vec![&mut self.middle];
		if let Some(extra) = self.extra.as_deref_mut() {
			children.push(extra);
		}
		children
	}
}

#[test]
fn defaults_run_parents_first_and_skip_absent_children() {
	take_events();
	let mut outer = Outer::default();
	apply_defaults(&mut outer);
	assert!(outer.defaulted && outer.middle.defaulted && outer.middle.inner.defaulted);
	assert_eq!(take_events(), ["default outer", "default middle", "default inner"]);
}

#[test]
fn defaults_survive_empty_nested_payloads() {
	take_events();
	let mut outer = Outer::default();
	populate_value(&mut outer, json!({ "middle": { "inner": {} } })).expect("populate");
	assert!(outer.defaulted);
	assert!(outer.middle.defaulted);
	assert!(outer.middle.inner.defaulted);
}

#[test]
fn hooks_see_the_fully_decoded_tree() {
	take_events();
	let mut outer = Outer::default();
	populate_value(
		&mut outer,
		json!({
			"middle": { "label": "m", "inner": { "label": "i" } },
			"extra": { "label": "x" },
		}),
	)
	.expect("populate");

	assert_eq!(outer.derived, "m/i");
	// `extra` was absent while defaulting but is rediscovered for hooks.
	let extra = outer.extra.as_deref().expect("extra decoded");
	assert!(!extra.defaulted);
	assert_eq!(
		take_events(),
		[
			"default outer",
			"default middle",
			"default inner",
			"hook outer",
			"hook middle",
			"hook inner i",
			"hook inner x",
		]
	);
}

#[test]
fn hook_error_aborts_and_keeps_decoded_state() {
	take_events();
	let mut outer = Outer::default();
	let err = populate_value(
		&mut outer,
		json!({ "middle": { "label": "m", "fail": true, "inner": { "label": "i" } } }),
	)
	.expect_err("middle hook fails");

	let hook = match err {
		Error::Hook(hook) => hook,
		other => panic!("expected hook error, got {other:?}"),
	};
	assert_eq!(hook.model, "middle");
	assert_eq!(hook.hook, "check middle");
	assert_eq!(outer.middle.inner.label, "i");
	assert_eq!(outer.derived, "m/i");
	let events = take_events();
	assert_eq!(events.last().map(String::as_str), Some("hook middle"));
	assert!(!events.iter().any(|event| event.starts_with("hook inner")));
}

#[test]
fn decode_error_runs_no_hooks() {
	take_events();
	let mut outer = Outer::default();
	let err = populate_value(&mut outer, json!({ "middle": { "label": 5 } })).expect_err("bad label");
	assert!(matches!(err, Error::Codec(_)));
	assert!(!take_events().iter().any(|event| event.starts_with("hook")));
}

#[test]
fn null_payload_only_defaults_and_hooks() {
	take_events();
	let mut outer = Outer::default();
	populate_value(&mut outer, serde_json::Value::Null).expect("populate");
	assert!(outer.middle.inner.defaulted);
	assert_eq!(outer.derived, "/");
}

#[test]
fn run_hooks_alone_walks_the_tree() {
	take_events();
	let mut outer = Outer {
		extra: Some(Box::default()),
		..Outer::default()
	};
	run_hooks(&mut outer).expect("hooks");
	assert_eq!(take_events(), ["hook outer", "hook middle", "hook inner ", "hook inner "]);
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Holder {
	target: Envelope<dyn Model>,
}

impl Model for Holder {
	fn description(&self) -> &str {
		"Holds an envelope preset to `inner`."
	}

	fn defaulted(&mut self) {
		self.target = Envelope::with_type("inner");
	}
}

fn inner_context() -> DecodeContext {
	let mut registry = TypeRegistry::new();
	registry.register::<Inner>(&[]).expect("inner");
	DecodeContext::new(Arc::new(registry))
}

#[test]
fn preset_envelope_type_survives_the_decode_merge() {
	take_events();
	let mut holder = Holder::default();
	inner_context()
		.scope(|| populate_value(&mut holder, json!({ "target": { "model": { "label": "x" } } })))
		.expect("populate");

	assert_eq!(holder.target.type_name(), "inner");
	let inner = holder.target.downcast_ref::<Inner>().expect("inner built from the preset");
	assert_eq!(inner.label, "x");
	assert!(inner.defaulted);
}

#[test]
fn preset_envelope_without_payload_is_built_from_defaults() {
	take_events();
	let context = inner_context();

	let mut holder = Holder::default();
	context.scope(|| populate_value(&mut holder, json!({}))).expect("populate");
	let inner = holder.target.downcast_ref::<Inner>().expect("inner built from the preset");
	assert!(inner.defaulted);
	assert_eq!(inner.label, "");

	let mut holder = Holder::default();
	context
		.scope(|| populate_value(&mut holder, json!({ "target": null })))
		.expect("populate");
	assert!(holder.target.is_empty());
}
