use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
	Aliased, Capabilities, Capability, ErasedModel, Hook, Labeled, Model, canonical_name, merge,
	short_type_name,
};

trait Target: Model {
	fn group(&self) -> &str;
}

crate::capability!(Target);

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Sensor {
	key: String,
	group: String,
	host: String,
	port: u16,
	trail: Vec<String>,
	#[serde(skip)]
	alias: Option<String>,
}

impl Model for Sensor {
	fn description(&self) -> &str {
		"A network sensor."
	}

	fn hooks(&self) -> Vec<Hook<Self>> {
		vec![
			Hook::new("derive key", |sensor: &mut Sensor| {
				sensor.key = format!("#sensor#{}#{}", sensor.host, sensor.port);
				sensor.trail.push("key".into());
				Ok(())
			}),
			Hook::new("validate port", |sensor: &mut Sensor| {
				sensor.trail.push("port".into());
				anyhow::ensure!(sensor.port != 0, "port must be set");
				Ok(())
			}),
			Hook::new("unreachable", |sensor: &mut Sensor| {
				sensor.trail.push("after".into());
				Ok(())
			}),
		]
	}

	fn defaulted(&mut self) {
		self.group = "default".into();
	}

	fn key(&self) -> &str {
		&self.key
	}

	fn as_labeled(&self) -> Option<&dyn Labeled> {
		Some(self)
	}

	fn as_aliased(&self) -> Option<&dyn Aliased> {
		Some(self)
	}

	fn as_aliased_mut(&mut self) -> Option<&mut dyn Aliased> {
		Some(self)
	}

	fn capabilities(caps: &mut Capabilities<Self>) {
		caps.provide::<dyn Target>(|sensor| sensor);
	}
}

impl Labeled for Sensor {
	fn labels(&self) -> Vec<String> {
		vec!["Sensor".into()]
	}
}

impl Aliased for Sensor {
	fn set_alias(&mut self, alias: &str) {
		self.alias = Some(alias.to_owned());
	}

	fn alias(&self) -> Option<&str> {
		self.alias.as_deref()
	}
}

impl Target for Sensor {
	fn group(&self) -> &str {
		&self.group
	}
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Plain {
	value: i64,
}

impl Model for Plain {
	fn description(&self) -> &str {
		"Plain record."
	}
}

mod generic {
	#[allow(dead_code)]
	pub struct Wrapper<T>(pub T);
}

#[test]
fn short_type_name_strips_path_and_generics() {
	assert_eq!(short_type_name::<Sensor>(), "Sensor");
	assert_eq!(short_type_name::<generic::Wrapper<Sensor>>(), "Wrapper");
	assert_eq!(canonical_name::<Sensor>(), "sensor");
}

#[test]
fn merge_keeps_absent_fields_and_replaces_leaves() {
	let mut target = json!({
		"host": "a",
		"nested": { "x": 1, "y": 2 },
		"list": [1, 2, 3],
	});
	merge(
		&mut target,
		json!({
			"nested": { "y": 20, "z": 30 },
			"list": [9],
			"extra": null,
		}),
	);
	assert_eq!(
		target,
		json!({
			"host": "a",
			"nested": { "x": 1, "y": 20, "z": 30 },
			"list": [9],
			"extra": null,
		})
	);
}

#[test]
fn decode_value_preserves_defaults_for_absent_fields() {
	let mut sensor = Sensor::default();
	sensor.defaulted();
	sensor
		.decode_value(json!({ "host": "10.0.0.1", "port": 22 }))
		.expect("decode");
	assert_eq!(sensor.group, "default");
	assert_eq!(sensor.host, "10.0.0.1");
	assert_eq!(sensor.port, 22);
}

#[test]
fn decode_value_propagates_type_errors() {
	let mut sensor = Sensor::default();
	let err = sensor.decode_value(json!({ "port": "not a number" }));
	assert!(err.is_err());
}

#[test]
fn hooks_run_in_declared_order() {
	let mut sensor = Sensor {
		host: "db".into(),
		port: 5432,
		..Sensor::default()
	};
	sensor.run_hooks().expect("hooks");
	assert_eq!(sensor.key(), "#sensor#db#5432");
	assert_eq!(sensor.trail, ["key", "port", "after"]);
}

#[test]
fn first_hook_error_stops_remaining_hooks() {
	let mut sensor = Sensor {
		host: "db".into(),
		..Sensor::default()
	};
	let err = sensor.run_hooks().expect_err("port hook fails");
	assert_eq!(err.model, "sensor");
	assert_eq!(err.hook, "validate port");
	assert_eq!(err.source.to_string(), "port must be set");
	// The first hook's mutation is kept; the third never ran.
	assert_eq!(sensor.key, "#sensor#db#0");
	assert_eq!(sensor.trail, ["key", "port"]);
}

#[test]
fn reported_name_prefers_recorded_alias() {
	let mut sensor = Sensor::default();
	assert_eq!(sensor.reported_name(), "sensor");
	sensor.set_alias("sonar");
	assert_eq!(sensor.reported_name(), "sonar");
	assert_eq!(Plain::default().reported_name(), "plain");
}

#[test]
fn capability_slots_cast_only_declared_views() {
	let mut caps = Capabilities::<Sensor>::new();
	Sensor::capabilities(&mut caps);
	assert!(caps.provides::<Sensor>());
	assert!(caps.provides::<dyn Model>());
	assert!(caps.provides::<dyn Target>());
	assert!(!caps.provides::<Plain>());

	let slots = caps.into_slots();
	let target_slot = slots
		.iter()
		.find(|slot| slot.capability() == std::any::TypeId::of::<dyn Target>())
		.expect("target slot");

	let model: Box<dyn Model> = Box::new(Sensor::default());
	let target = target_slot.cast::<dyn Target>(model).expect("cast");
	assert_eq!(target.group(), "");
	assert_eq!(target.as_model().canonical_name(), "sensor");

	// A slot never casts a different concrete type.
	let plain: Box<dyn Model> = Box::new(Plain::default());
	assert!(target_slot.cast::<dyn Target>(plain).is_none());
	// Nor into a view it was not declared for.
	let sensor: Box<dyn Model> = Box::new(Sensor::default());
	assert!(target_slot.cast::<dyn Model>(sensor).is_none());
}

#[test]
fn dyn_model_downcasts() {
	let mut model: Box<dyn Model> = Box::new(Plain { value: 7 });
	assert!(model.is::<Plain>());
	assert!(!model.is::<Sensor>());
	assert_eq!(model.downcast_ref::<Plain>().map(|p| p.value), Some(7));
	if let Some(plain) = model.downcast_mut::<Plain>() {
		plain.value = 8;
	}
	let model = match model.downcast::<Sensor>() {
		Ok(_) => panic!("wrong type accepted"),
		Err(model) => model,
	};
	let plain = model.downcast::<Plain>().expect("plain");
	assert_eq!(plain.value, 8);
}
