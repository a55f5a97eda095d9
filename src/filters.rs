//! Declarative filters and scopes
//!
//! [`FilterDef`] describes how one field can be filtered on index views; the
//! filter kind is derived from the field's resolved display type, so a
//! boolean column gets a yes/no filter and an enum column a choice filter
//! with its keys. [`Scope`] is a named, first-class records transform.
//! Query execution belongs to the controller/data layer.

use crate::fields::FieldType;
use crate::text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One selectable option of a choice-style filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterChoice {
	pub value: String,
	pub label: String,
}

impl FilterChoice {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// How a field is filtered on index views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterKind {
	/// Yes/no toggle
	Boolean,
	/// Preset date ranges
	DateRange { ranges: Vec<FilterChoice> },
	/// Preset number ranges
	NumberRange { ranges: Vec<FilterChoice> },
	/// Fixed choice list
	Choice { choices: Vec<FilterChoice> },
}

/// Filter declaration for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDef {
	pub field: String,
	pub label: String,
	pub kind: FilterKind,
}

impl FilterDef {
	/// Declare a filter whose kind is derived from the field's display type
	pub fn for_field(name: impl Into<String>, field_type: &FieldType) -> Self {
		let field = name.into();
		let label = text::humanize(&field);
		Self {
			field,
			label,
			kind: filter_kind_for(field_type),
		}
	}
}

/// Derive the filter kind appropriate for a display type.
///
/// Boolean fields get yes/no filters, date and datetime fields get date
/// ranges, numbers get number ranges, selects get their choices, and
/// everything else gets a presence filter.
pub fn filter_kind_for(field_type: &FieldType) -> FilterKind {
	match field_type {
		FieldType::Boolean => FilterKind::Boolean,

		FieldType::Date | FieldType::DateTime => FilterKind::DateRange {
			ranges: default_date_ranges(),
		},

		FieldType::Number => FilterKind::NumberRange {
			ranges: default_number_ranges(),
		},

		FieldType::Select { choices } => FilterKind::Choice {
			choices: choices
				.iter()
				.map(|value| FilterChoice::new(value.clone(), text::humanize(value)))
				.collect(),
		},

		_ => FilterKind::Choice {
			choices: vec![
				FilterChoice::new("all", "All"),
				FilterChoice::new("empty", "Empty"),
				FilterChoice::new("not_empty", "Not Empty"),
			],
		},
	}
}

fn default_date_ranges() -> Vec<FilterChoice> {
	vec![
		FilterChoice::new("today", "Today"),
		FilterChoice::new("past_7_days", "Past 7 days"),
		FilterChoice::new("this_month", "This month"),
		FilterChoice::new("this_year", "This year"),
	]
}

fn default_number_ranges() -> Vec<FilterChoice> {
	vec![
		FilterChoice::new("0", "Zero"),
		FilterChoice::new("positive", "Positive"),
		FilterChoice::new("negative", "Negative"),
	]
}

/// Records transform applied by a scope
pub type ScopeFn = Arc<dyn Fn(Vec<serde_json::Value>) -> Vec<serde_json::Value> + Send + Sync>;

/// A named records transform offered as an index-view tab
#[derive(Clone)]
pub struct Scope {
	name: String,
	label: String,
	default: bool,
	apply: ScopeFn,
}

impl Scope {
	pub fn new(
		name: impl Into<String>,
		apply: impl Fn(Vec<serde_json::Value>) -> Vec<serde_json::Value> + Send + Sync + 'static,
	) -> Self {
		let name = name.into();
		let label = text::humanize(&name);
		Self {
			name,
			label,
			default: false,
			apply: Arc::new(apply),
		}
	}

	/// Mark this scope as the one applied when none is selected
	pub fn as_default(mut self) -> Self {
		self.default = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn is_default(&self) -> bool {
		self.default
	}

	/// Apply the scope's transform to a record set
	pub fn apply(&self, records: Vec<serde_json::Value>) -> Vec<serde_json::Value> {
		(self.apply)(records)
	}
}

impl fmt::Debug for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Scope")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("default", &self.default)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_boolean_filter() {
		assert_eq!(filter_kind_for(&FieldType::Boolean), FilterKind::Boolean);
	}

	#[test]
	fn test_date_filter_ranges() {
		let FilterKind::DateRange { ranges } = filter_kind_for(&FieldType::DateTime) else {
			panic!("expected DateRange");
		};
		assert!(ranges.iter().any(|r| r.value == "today"));
		assert!(ranges.iter().any(|r| r.value == "this_year"));
	}

	#[test]
	fn test_number_filter_ranges() {
		let FilterKind::NumberRange { ranges } = filter_kind_for(&FieldType::Number) else {
			panic!("expected NumberRange");
		};
		assert_eq!(ranges.len(), 3);
	}

	#[test]
	fn test_select_filter_uses_choices() {
		let field_type = FieldType::Select {
			choices: vec!["active_user".to_string(), "banned".to_string()],
		};
		let FilterKind::Choice { choices } = filter_kind_for(&field_type) else {
			panic!("expected Choice");
		};
		assert_eq!(choices[0].value, "active_user");
		assert_eq!(choices[0].label, "Active User");
		assert_eq!(choices[1].label, "Banned");
	}

	#[test]
	fn test_text_filter_is_presence() {
		let FilterKind::Choice { choices } = filter_kind_for(&FieldType::Text) else {
			panic!("expected Choice");
		};
		let values: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
		assert_eq!(values, vec!["all", "empty", "not_empty"]);
	}

	#[test]
	fn test_filter_def_label() {
		let def = FilterDef::for_field("is_active", &FieldType::Boolean);
		assert_eq!(def.label, "Is Active");
		assert_eq!(def.kind, FilterKind::Boolean);
	}

	#[test]
	fn test_scope_applies_transform() {
		let scope = Scope::new("active", |records| {
			records
				.into_iter()
				.filter(|r| r["active"] == true)
				.collect()
		})
		.as_default();

		let records = vec![
			serde_json::json!({"id": 1, "active": true}),
			serde_json::json!({"id": 2, "active": false}),
		];
		let filtered = scope.apply(records);
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered[0]["id"], 1);
		assert!(scope.is_default());
		assert_eq!(scope.label(), "Active");
	}
}
