//! Form property-based tests
//!
//! Filling a form from values and submitting the raw data back must yield
//! the same values, and validation must report one error per invalid field.

use indexmap::IndexMap;
use proptest::prelude::*;
use std::sync::Arc;
use trellis_forms::convs::{Char, Int};
use trellis_forms::{Field, Form, FormSchema, MultiDict, Value};

fn schema() -> Arc<FormSchema> {
	FormSchema::builder("p")
		.field(Field::new("title", Char::new().required()))
		.field(Field::new("count", Int::new()))
		.field(Field::list("scores", Field::new("", Int::new())))
		.build()
		.unwrap()
}

proptest! {
	/// Values filled into raw data convert back unchanged.
	#[test]
	fn prop_initial_values_round_trip(
		title in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,15}[a-zA-Z0-9]",
		count in any::<i64>(),
		scores in prop::collection::vec(any::<i64>(), 0..6),
	) {
		let mut initial = IndexMap::new();
		initial.insert("title".to_string(), Value::from(title));
		initial.insert("count".to_string(), Value::Int(count));
		initial.insert(
			"scores".to_string(),
			Value::List(scores.into_iter().map(Value::Int).collect()),
		);

		let filled = Form::new(schema()).with_initial(initial.clone()).unwrap();
		let clean = Form::new(schema()).validate(filled.raw().clone());

		prop_assert_eq!(clean, Ok(initial));
	}

	/// Every non-numeric count and list item is reported, none is dropped.
	#[test]
	fn prop_each_invalid_item_is_reported(
		items in prop::collection::vec(prop_oneof!["[0-9]{1,5}", "[a-z]{1,5}"], 1..8),
	) {
		let mut raw = MultiDict::from_pairs([("title", "t"), ("count", "x")]);
		for (position, item) in items.iter().enumerate() {
			let index = (position + 1).to_string();
			raw.add(format!("scores.{}", index), item.as_str());
			raw.add("scores-indices", index);
		}
		let invalid = items
			.iter()
			.filter(|item| item.parse::<i64>().is_err())
			.count();

		let errors = Form::new(schema()).validate(raw).unwrap_err();

		prop_assert_eq!(errors.len(), invalid + 1);
		prop_assert!(errors.contains("count"));
	}
}
