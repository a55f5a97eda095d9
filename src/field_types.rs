//! Custom field type registry
//!
//! Hosts can register novel field types (a gravatar, a progress bar, a money
//! amount) with custom rendering behavior without touching the inferrer or
//! the built-in component set. A registered type provides optional display
//! and index-display render hooks and an optional form component reference;
//! anything it does not provide falls back to built-in rendering for the
//! field's declared type category.

use crate::fields::Field;
use crate::{AdminError, AdminResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Render hook: record + field descriptor to a rendered value
pub type RenderFn = Arc<dyn Fn(&serde_json::Value, &Field) -> String + Send + Sync>;

/// Rendering configuration for one registered field type
#[derive(Clone, Default)]
pub struct FieldTypeConfig {
	display: Option<RenderFn>,
	index_display: Option<RenderFn>,
	form_component: Option<String>,
}

impl FieldTypeConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the general display hook (show pages, exports)
	pub fn with_display(
		mut self,
		render: impl Fn(&serde_json::Value, &Field) -> String + Send + Sync + 'static,
	) -> Self {
		self.display = Some(Arc::new(render));
		self
	}

	/// Set the index-view display hook.
	///
	/// Typically a truncated summary of the general display.
	pub fn with_index_display(
		mut self,
		render: impl Fn(&serde_json::Value, &Field) -> String + Send + Sync + 'static,
	) -> Self {
		self.index_display = Some(Arc::new(render));
		self
	}

	/// Reference the form component/partial used to edit the field
	pub fn with_form_component(mut self, component: impl Into<String>) -> Self {
		self.form_component = Some(component.into());
		self
	}

	/// Render the field for show pages; `None` means "no custom renderer",
	/// and the caller falls back to built-in type-based rendering.
	pub fn render_display(&self, record: &serde_json::Value, field: &Field) -> Option<String> {
		self.display.as_ref().map(|render| render(record, field))
	}

	/// Render the field for index views.
	///
	/// Prefers the index-display hook, falls back to the general display
	/// hook, then `None` for built-in rendering. The two-tier fallback is
	/// what lets a type show full detail on show pages and a summary on
	/// index without duplicating the hook.
	pub fn render_index_display(
		&self,
		record: &serde_json::Value,
		field: &Field,
	) -> Option<String> {
		match &self.index_display {
			Some(render) => Some(render(record, field)),
			None => self.render_display(record, field),
		}
	}

	pub fn form_component(&self) -> Option<&str> {
		self.form_component.as_deref()
	}
}

impl fmt::Debug for FieldTypeConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldTypeConfig")
			.field("display", &self.display.is_some())
			.field("index_display", &self.index_display.is_some())
			.field("form_component", &self.form_component)
			.finish()
	}
}

/// Registry mapping a field type name to its rendering configuration.
///
/// Registration happens during single-threaded application boot or
/// serialized test setup; concurrent registration during live traffic is
/// unsupported. Lookups are safe for concurrent reads.
///
/// # Examples
///
/// ```
/// use grappelli::field_types::{FieldTypeConfig, FieldTypeRegistry};
///
/// let registry = FieldTypeRegistry::new();
/// registry
///     .register(
///         "gravatar",
///         FieldTypeConfig::new().with_display(|record, field| {
///             format!("gravatar for {}", record[field.name()])
///         }),
///     )
///     .unwrap();
///
/// assert!(registry.find("gravatar").is_some());
/// assert!(registry.find("unknown").is_none());
/// assert!(registry.register("gravatar", FieldTypeConfig::new()).is_err());
/// ```
#[derive(Default)]
pub struct FieldTypeRegistry {
	entries: RwLock<HashMap<String, FieldTypeConfig>>,
}

impl FieldTypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a field type.
	///
	/// Re-registering an existing name is a programmer error and fails with
	/// [`AdminError::DuplicateFieldType`]; it is never silently overwritten.
	pub fn register(&self, name: impl Into<String>, config: FieldTypeConfig) -> AdminResult<()> {
		let name = name.into();
		let mut entries = self.entries.write();
		if entries.contains_key(&name) {
			return Err(AdminError::DuplicateFieldType(name));
		}
		tracing::debug!(field_type = %name, "registered custom field type");
		entries.insert(name, config);
		Ok(())
	}

	/// Register a field type built up by a configuration closure
	pub fn register_with(
		&self,
		name: impl Into<String>,
		configure: impl FnOnce(FieldTypeConfig) -> FieldTypeConfig,
	) -> AdminResult<()> {
		self.register(name, configure(FieldTypeConfig::new()))
	}

	/// Look up a type by name; `None` is a normal branch, not an error
	pub fn find(&self, name: &str) -> Option<FieldTypeConfig> {
		self.entries.read().get(name).cloned()
	}

	/// Clear the registry (test isolation)
	pub fn reset(&self) {
		self.entries.write().clear();
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

/// Process-wide field type registry.
///
/// Populated during application initialization; tests that touch it must
/// serialize and call [`FieldTypeRegistry::reset`] first.
pub fn global_field_types() -> &'static FieldTypeRegistry {
	static REGISTRY: Lazy<FieldTypeRegistry> = Lazy::new(FieldTypeRegistry::new);
	&REGISTRY
}
