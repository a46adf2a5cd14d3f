//! Canonicalization of raw server payloads into [`PersonNode`] trees.
//!
//! The server is inconsistent about field naming: discrete name fields or a
//! combined `name`, dates either at the top level or inside an `attributes`
//! bag, camelCase or snake_case keys. Per field the precedence is
//! explicit top-level value, then the mapped `attributes` key, then a
//! computed default. Malformed input degrades to a fallback node instead of
//! erroring; this feeds a display widget, so a blank tree beats a crash.

use serde_json::{Map, Value};

use super::types::{Gender, PersonNode};

/// Normalize a raw tree payload into a fresh owned [`PersonNode`] tree.
///
/// The node whose id equals `current_user_id` is marked `is_current_user`;
/// at most one node per tree gets the mark. The input is never mutated or
/// aliased: every field of the output is newly constructed.
pub fn normalize(raw: &Value, current_user_id: &str) -> PersonNode {
	let mut user_marked = false;
	normalize_node(raw, current_user_id, &mut user_marked)
}

fn normalize_node(raw: &Value, current_user_id: &str, user_marked: &mut bool) -> PersonNode {
	let Some(obj) = raw.as_object() else {
		return PersonNode::fallback();
	};

	let id = text_value(obj.get("id")).unwrap_or_default();

	// Discrete name fields win; otherwise the combined `name` splits on the
	// first space and the remainder fills the last-name slot.
	let (split_first, split_last) = match field(obj, &["name"], "name") {
		Some(name) => match name.split_once(' ') {
			Some((first, rest)) => (Some(first.to_string()), Some(rest.trim().to_string())),
			None => (Some(name), None),
		},
		None => (None, None),
	};
	let first_name = field(obj, &["firstName", "first_name"], "first_name")
		.or(split_first)
		.unwrap_or_else(|| "?".into());
	let last_name = field(obj, &["lastName", "last_name"], "last_name")
		.or(split_last)
		.unwrap_or_default();

	let is_current_user = !*user_marked && !id.is_empty() && id == current_user_id;
	if is_current_user {
		*user_marked = true;
	}

	PersonNode {
		date_of_birth: field(obj, &["dateOfBirth", "date_of_birth"], "date_of_birth"),
		date_of_death: field(obj, &["dateOfDeath", "date_of_death"], "date_of_death"),
		gender: field(obj, &["gender"], "gender")
			.map(|raw| Gender::parse(&raw))
			.unwrap_or_default(),
		relationship_to_user: field(
			obj,
			&["relationshipToUser", "relationship_to_user", "relationship"],
			"relationship",
		)
		.unwrap_or_default(),
		is_current_user,
		is_partner: bool_field(obj, &["isPartner", "is_partner"]),
		partners: normalize_list(obj.get("partners"), current_user_id, user_marked),
		children: normalize_list(obj.get("children"), current_user_id, user_marked),
		id,
		first_name,
		last_name,
	}
}

/// Normalize every entry of a child/partner array, skipping null entries
/// (the server emits sparse arrays).
fn normalize_list(raw: Option<&Value>, current_user_id: &str, user_marked: &mut bool) -> Vec<PersonNode> {
	raw.and_then(Value::as_array)
		.map(|entries| {
			entries
				.iter()
				.filter(|entry| !entry.is_null())
				.map(|entry| normalize_node(entry, current_user_id, user_marked))
				.collect()
		})
		.unwrap_or_default()
}

/// Resolve a text field: top-level keys in order, then the `attributes` bag.
fn field(obj: &Map<String, Value>, top_level: &[&str], attribute: &str) -> Option<String> {
	for key in top_level {
		if let Some(text) = text_value(obj.get(*key)) {
			return Some(text);
		}
	}
	obj.get("attributes")
		.and_then(Value::as_object)
		.and_then(|attrs| text_value(attrs.get(attribute)))
}

fn bool_field(obj: &Map<String, Value>, keys: &[&str]) -> bool {
	keys.iter()
		.find_map(|key| obj.get(*key).and_then(Value::as_bool))
		.unwrap_or(false)
}

/// A non-empty textual value. Numeric ids are accepted and rendered as text.
fn text_value(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(text) => {
			let text = text.trim();
			(!text.is_empty()).then(|| text.to_string())
		}
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn missing_input_yields_fallback_node() {
		for raw in [Value::Null, json!("garbage"), json!(42), json!([1, 2])] {
			let node = normalize(&raw, "1");
			assert_eq!(node.first_name, "?");
			assert_eq!(node.last_name, "");
			assert!(node.children.is_empty());
			assert!(!node.is_current_user);
		}
	}

	#[test]
	fn splits_combined_name_on_first_space() {
		let node = normalize(&json!({ "name": "Jane Mary Doe" }), "1");
		assert_eq!(node.first_name, "Jane");
		assert_eq!(node.last_name, "Mary Doe");

		let single = normalize(&json!({ "name": "Cher" }), "1");
		assert_eq!(single.first_name, "Cher");
		assert_eq!(single.last_name, "");
	}

	#[test]
	fn discrete_name_fields_win_over_combined_name() {
		let node = normalize(
			&json!({ "name": "Wrong Name", "firstName": "Jane", "lastName": "Doe" }),
			"1",
		);
		assert_eq!(node.first_name, "Jane");
		assert_eq!(node.last_name, "Doe");
	}

	#[test]
	fn attributes_bag_fills_missing_fields() {
		let node = normalize(
			&json!({
				"id": 7,
				"name": "Ann Smith",
				"attributes": {
					"date_of_birth": "1950-06-01",
					"gender": "female",
					"relationship": "Grandmother"
				}
			}),
			"1",
		);
		assert_eq!(node.id, "7");
		assert_eq!(node.date_of_birth.as_deref(), Some("1950-06-01"));
		assert_eq!(node.gender, Gender::Female);
		assert_eq!(node.relationship_to_user, "Grandmother");
		assert_eq!(node.date_of_death, None);
	}

	#[test]
	fn top_level_field_wins_over_attributes() {
		let node = normalize(
			&json!({
				"dateOfBirth": "1960-01-01",
				"attributes": { "date_of_birth": "1900-01-01" }
			}),
			"1",
		);
		assert_eq!(node.date_of_birth.as_deref(), Some("1960-01-01"));
	}

	#[test]
	fn marks_exactly_one_current_user() {
		let raw = json!({
			"id": "1",
			"name": "Root Person",
			"children": [
				{ "id": "2", "name": "Child One" },
				{ "id": "3", "name": "Child Two", "children": [{ "id": "4", "name": "Grandchild" }] }
			]
		});
		let tree = normalize(&raw, "3");
		assert!(!tree.is_current_user);
		assert!(!tree.children[0].is_current_user);
		assert!(tree.children[1].is_current_user);
		assert!(!tree.children[1].children[0].is_current_user);
	}

	#[test]
	fn skips_null_entries_in_sparse_arrays() {
		let raw = json!({
			"name": "Root",
			"children": [null, { "name": "Kept" }, null],
			"partners": [null]
		});
		let tree = normalize(&raw, "1");
		assert_eq!(tree.children.len(), 1);
		assert_eq!(tree.children[0].first_name, "Kept");
		assert!(tree.partners.is_empty());
	}

	#[test]
	fn normalization_is_idempotent() {
		let raw = json!({
			"id": "1",
			"name": "Jane Mary Doe",
			"attributes": { "gender": "female", "date_of_birth": "1970-02-03" },
			"partners": [{ "id": "2", "name": "John Doe", "attributes": { "gender": "male" } }],
			"children": [
				{ "id": "3", "name": "Kid One", "children": [{ "id": "5", "name": "Grand Kid" }] },
				null,
				{ "id": "4", "firstName": "Kid", "lastName": "Two" }
			]
		});
		let once = normalize(&raw, "1");
		let round_trip = serde_json::to_value(&once).expect("serialize");
		let twice = normalize(&round_trip, "1");
		assert_eq!(once, twice);
	}
}
