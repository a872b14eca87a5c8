//! Recursive merging of JSON documents.
//!
//! Mappings are merged key by key, lists gain the incoming elements they do
//! not already hold and any other combination lets the incoming value
//! replace the existing one.

use serde_json::{Map, Value};

/// Merge `source` into `target`.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_core::merge::merge_maps;
/// use serde_json::json;
///
/// let mut target = json!({"id": 1, "tags": ["a"], "meta": {"x": 1}});
/// let source = json!({"id": "http://e/1", "tags": ["b"], "meta": {"y": 2}});
///
/// merge_maps(
/// 	target.as_object_mut().unwrap(),
/// 	source.as_object().unwrap().clone(),
/// );
/// assert_eq!(
/// 	target,
/// 	json!({"id": "http://e/1", "tags": ["a", "b"], "meta": {"x": 1, "y": 2}})
/// );
/// ```
pub fn merge_maps(target: &mut Map<String, Value>, source: Map<String, Value>) {
	for (key, value) in source {
		match target.get_mut(&key) {
			Some(existing) => merge_values(existing, value),
			None => {
				target.insert(key, value);
			}
		}
	}
}

/// Merge a single value into an existing slot.
pub fn merge_values(target: &mut Value, source: Value) {
	match (target, source) {
		(Value::Object(existing), Value::Object(incoming)) => merge_maps(existing, incoming),
		(Value::Array(existing), Value::Array(incoming)) => {
			for value in incoming {
				if !existing.contains(&value) {
					existing.push(value);
				}
			}
		}
		(slot, incoming) => *slot = incoming,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(1), json!("two"), json!("two"))]
	#[case(json!([1]), json!([2, 3]), json!([1, 2, 3]))]
	#[case(json!({"tags": ["a", "b"]}), json!({"tags": ["b", "c"]}), json!({"tags": ["a", "b", "c"]}))]
	#[case(json!([{"id": 1}]), json!([{"id": 1}, {"id": 2}]), json!([{"id": 1}, {"id": 2}]))]
	#[case(json!({"a": 1}), json!({"b": 2}), json!({"a": 1, "b": 2}))]
	#[case(json!([1]), json!({"b": 2}), json!({"b": 2}))]
	fn test_merge_values(#[case] mut target: Value, #[case] source: Value, #[case] expected: Value) {
		merge_values(&mut target, source);
		assert_eq!(target, expected);
	}

	#[rstest]
	fn test_merge_keeps_target_key_order() {
		let mut target = json!({"first": 1, "second": 2});
		let source = json!({"third": 3, "first": 10});

		merge_maps(target.as_object_mut().unwrap(), source.as_object().unwrap().clone());

		let keys: Vec<_> = target.as_object().unwrap().keys().cloned().collect();
		assert_eq!(keys, vec!["first", "second", "third"]);
		assert_eq!(target["first"], json!(10));
	}
}
