//! Field descriptors
//!
//! A [`Field`] describes one attribute of an entity as the admin panel sees
//! it: a display/edit type, visibility and readonly rules evaluated against
//! the current actor, and open-ended type-specific options. Fields are
//! transient read-only snapshots constructed fresh on every resolution pass;
//! they are never mutated after construction and never persisted.

use crate::text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque current-user value.
///
/// The engine never inspects its shape; visibility, readonly and policy
/// predicates downcast it as they see fit.
pub type Actor = dyn std::any::Any + Send + Sync;

/// Predicate evaluated against the current actor
pub type ActorPredicate = Arc<dyn Fn(&Actor) -> bool + Send + Sync>;

/// Semantic display/edit type of a field.
///
/// This is not a storage type: a `VARCHAR` column may resolve to `Text`,
/// `Url`, `Email` or `Select` depending on schema metadata and naming.
/// Types outside the built-in set are expressed as `Custom` and rendered
/// through the [`crate::field_types::FieldTypeRegistry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
	/// Single-line text input
	Text,
	/// Textarea for long text
	TextArea,
	Number,
	Boolean,
	Date,
	DateTime,
	Time,
	/// JSON editor
	Json,
	Url,
	Email,
	Password,
	Hidden,
	/// Status-style badge
	Badge,
	/// Single file attachment
	File,
	/// Multiple file attachments
	Files,
	RichText,
	/// Select dropdown backed by an enumerated-value constraint
	Select { choices: Vec<String> },
	/// Many-to-one association, displayed under the association name
	BelongsTo { target: String, foreign_key: String },
	/// Many-to-one association whose target type lives in a discriminator column
	PolymorphicBelongsTo {
		type_column: String,
		id_column: String,
	},
	/// One-to-many related list
	HasMany,
	/// One-to-one related record
	HasOne,
	/// A type registered via the field type registry
	Custom(String),
}

/// Visibility/readonly rule: a literal or a per-actor predicate.
///
/// Predicates are evaluated lazily per request; a panicking predicate
/// propagates — masking it could silently over- or under-expose fields.
#[derive(Clone)]
pub enum FieldRule {
	Literal(bool),
	Predicate(ActorPredicate),
}

impl FieldRule {
	/// Wrap a per-actor predicate
	pub fn when(predicate: impl Fn(&Actor) -> bool + Send + Sync + 'static) -> Self {
		Self::Predicate(Arc::new(predicate))
	}

	/// Evaluate the rule for the given actor
	pub fn evaluate(&self, actor: &Actor) -> bool {
		match self {
			Self::Literal(value) => *value,
			Self::Predicate(predicate) => predicate(actor),
		}
	}
}

impl From<bool> for FieldRule {
	fn from(value: bool) -> Self {
		Self::Literal(value)
	}
}

impl fmt::Debug for FieldRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Predicate(_) => f.write_str("Predicate(..)"),
		}
	}
}

impl PartialEq for FieldRule {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Literal(a), Self::Literal(b)) => a == b,
			(Self::Predicate(a), Self::Predicate(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

/// One displayable/editable attribute of an entity
#[derive(Clone, PartialEq)]
pub struct Field {
	name: String,
	field_type: FieldType,
	visible: FieldRule,
	readonly: FieldRule,
	options: HashMap<String, serde_json::Value>,
}

impl Field {
	/// Create a field that is visible and editable by default
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			visible: FieldRule::Literal(true),
			readonly: FieldRule::Literal(false),
			options: HashMap::new(),
		}
	}

	/// Set the visibility rule
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::fields::{Field, FieldRule, FieldType};
	///
	/// let field = Field::new("secret", FieldType::Text).with_visible(false);
	/// assert!(!field.visible(&()));
	///
	/// let field = Field::new("email", FieldType::Email)
	///     .with_visible(FieldRule::when(|actor| actor.downcast_ref::<bool>() == Some(&true)));
	/// assert!(field.visible(&true));
	/// assert!(!field.visible(&false));
	/// ```
	pub fn with_visible(mut self, rule: impl Into<FieldRule>) -> Self {
		self.visible = rule.into();
		self
	}

	/// Set the readonly rule
	pub fn with_readonly(mut self, rule: impl Into<FieldRule>) -> Self {
		self.readonly = rule.into();
		self
	}

	/// Set a type-specific option
	pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.options.insert(key.into(), value.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field_type(&self) -> &FieldType {
		&self.field_type
	}

	/// Human-readable label derived from the field name
	pub fn label(&self) -> String {
		text::humanize(&self.name)
	}

	/// Whether the field is visible to the given actor
	pub fn visible(&self, actor: &Actor) -> bool {
		self.visible.evaluate(actor)
	}

	/// Whether an edit form may not mutate the field for the given actor.
	///
	/// Independent of visibility.
	pub fn readonly(&self, actor: &Actor) -> bool {
		self.readonly.evaluate(actor)
	}

	pub fn options(&self) -> &HashMap<String, serde_json::Value> {
		&self.options
	}

	/// Look up a single type-specific option
	pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
		self.options.get(key)
	}

	pub(crate) fn visible_rule(&self) -> &FieldRule {
		&self.visible
	}

	pub(crate) fn readonly_rule(&self) -> &FieldRule {
		&self.readonly
	}
}

impl fmt::Debug for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("visible", &self.visible)
			.field("readonly", &self.readonly)
			.field("options", &self.options)
			.finish()
	}
}
