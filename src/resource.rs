//! Per-entity resource configuration
//!
//! A [`Resource`] is the configuration root for one entity and the merge
//! point between inferred and declared field data. It is built once at
//! application load time via [`ResourceBuilder`] and read concurrently
//! afterwards; `resolved_fields` re-derives a fresh field list on every
//! call, so visibility and readonly predicates can depend on the current
//! actor and schema changes are picked up between test runs.
//!
//! Merge precedence, lowest to highest: inferred options, association
//! shorthand, explicit field override. Merging never reorders and never
//! introduces fields: the resolved list is always inference order, and an
//! association declared on the builder only supplies override data for the
//! inferred field of the same name.

use crate::actions::{Action, BulkAction};
use crate::fields::{Actor, Field, FieldRule, FieldType};
use crate::filters::{FilterDef, Scope};
use crate::inference::FieldInferrer;
use crate::policy::Policy;
use crate::schema::{AssociationKind, SchemaProvider, StorageType};
use crate::text;
use crate::{AdminError, AdminResult};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Attribute names probed, in order, for a record's human label
const DISPLAY_ATTRIBUTE_PRIORITY: [&str; 5] = ["name", "title", "email", "label", "slug"];

/// Timestamp columns excluded from default form fields
const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Partial per-field configuration layered onto an inferred field.
///
/// Only the parts that are set participate in the merge; everything else is
/// taken from the inferred field.
#[derive(Clone, Default)]
pub struct FieldOverride {
	field_type: Option<FieldType>,
	visible: Option<FieldRule>,
	readonly: Option<FieldRule>,
	options: HashMap<String, serde_json::Value>,
}

impl FieldOverride {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the inferred display type
	pub fn with_type(mut self, field_type: FieldType) -> Self {
		self.field_type = Some(field_type);
		self
	}

	pub fn with_visible(mut self, rule: impl Into<FieldRule>) -> Self {
		self.visible = Some(rule.into());
		self
	}

	pub fn with_readonly(mut self, rule: impl Into<FieldRule>) -> Self {
		self.readonly = Some(rule.into());
		self
	}

	pub fn with_option(
		mut self,
		key: impl Into<String>,
		value: impl Into<serde_json::Value>,
	) -> Self {
		self.options.insert(key.into(), value.into());
		self
	}

	fn apply_to(&self, base: Field) -> Field {
		let field_type = self
			.field_type
			.clone()
			.unwrap_or_else(|| base.field_type().clone());
		let mut field = Field::new(base.name().to_string(), field_type);
		for (key, value) in base.options() {
			field = field.with_option(key.clone(), value.clone());
		}
		for (key, value) in &self.options {
			field = field.with_option(key.clone(), value.clone());
		}
		field = field.with_visible(
			self.visible
				.clone()
				.unwrap_or_else(|| base.visible_rule().clone()),
		);
		field.with_readonly(
			self.readonly
				.clone()
				.unwrap_or_else(|| base.readonly_rule().clone()),
		)
	}
}

impl fmt::Debug for FieldOverride {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldOverride")
			.field("field_type", &self.field_type)
			.field("visible", &self.visible)
			.field("readonly", &self.readonly)
			.field("options", &self.options)
			.finish()
	}
}

/// Association shorthand declared on the builder.
///
/// Supplies override data to the merge (below explicit field overrides); it
/// never introduces a field of its own. Has-many/has-one declarations are
/// also exposed as metadata for related-list views.
#[derive(Debug, Clone)]
struct AssociationDecl {
	kind: AssociationKind,
	config: FieldOverride,
}

/// Configuration root for one entity
pub struct Resource {
	name: String,
	model: String,
	label: String,
	schema: Arc<dyn SchemaProvider>,
	menu_group: Option<String>,
	menu_priority: Option<u32>,
	field_overrides: Vec<(String, FieldOverride)>,
	associations: Vec<(String, AssociationDecl)>,
	filters: Vec<FilterDef>,
	filterable: Vec<String>,
	scopes: Vec<Scope>,
	actions: Vec<Action>,
	bulk_actions: Vec<BulkAction>,
	index_field_names: Option<Vec<String>>,
	form_field_names: Option<Vec<String>>,
	export_field_names: Option<Vec<String>>,
	searchable: Option<Vec<String>>,
	preload: Option<Vec<String>>,
	policy: Option<Policy>,
}

impl Resource {
	/// Start configuring a resource for `model`.
	///
	/// The resource name defaults to the pluralized, lowercased model name.
	pub fn builder(model: impl Into<String>, schema: Arc<dyn SchemaProvider>) -> ResourceBuilder {
		ResourceBuilder::new(model, schema)
	}

	/// Canonical plural name the resource is registered under
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Underlying entity name
	pub fn model(&self) -> &str {
		&self.model
	}

	/// Human-readable resource label
	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn menu_group(&self) -> Option<&str> {
		self.menu_group.as_deref()
	}

	pub fn menu_priority(&self) -> Option<u32> {
		self.menu_priority
	}

	/// The complete ordered field list: inference merged with association
	/// shorthand and explicit overrides.
	///
	/// Computed fresh on every call; schema failures propagate unchanged.
	pub fn resolved_fields(&self) -> AdminResult<Vec<Field>> {
		let inferred = FieldInferrer::infer(self.schema.as_ref(), &self.model)?;

		let fields: Vec<Field> = inferred
			.into_iter()
			.map(|field| self.merge_field(field))
			.collect();

		debug!(
			resource = %self.name,
			fields = fields.len(),
			"resolved field list"
		);
		Ok(fields)
	}

	fn merge_field(&self, field: Field) -> Field {
		let association = self
			.associations
			.iter()
			.find(|(name, _)| name == field.name())
			.map(|(_, decl)| &decl.config);
		let explicit = self
			.field_overrides
			.iter()
			.find(|(name, _)| name == field.name())
			.map(|(_, config)| config);

		let field = match association {
			Some(config) => config.apply_to(field),
			None => field,
		};
		match explicit {
			Some(config) => config.apply_to(field),
			None => field,
		}
	}

	/// Fields for the index (list) view.
	///
	/// Explicit name lists win and keep their own order; names that do not
	/// resolve are dropped. Without an explicit list, all resolved fields.
	pub fn index_fields(&self) -> AdminResult<Vec<Field>> {
		self.view_fields(&self.index_field_names, false)
	}

	/// Fields for the new/edit form.
	///
	/// Without an explicit list: all resolved fields except the primary key
	/// and the standard timestamp columns.
	pub fn form_fields(&self) -> AdminResult<Vec<Field>> {
		self.view_fields(&self.form_field_names, true)
	}

	/// Fields for export
	pub fn export_fields(&self) -> AdminResult<Vec<Field>> {
		self.view_fields(&self.export_field_names, false)
	}

	fn view_fields(
		&self,
		explicit: &Option<Vec<String>>,
		exclude_identity: bool,
	) -> AdminResult<Vec<Field>> {
		let resolved = self.resolved_fields()?;
		if let Some(names) = explicit {
			return Ok(names
				.iter()
				.filter_map(|name| resolved.iter().find(|f| f.name() == name).cloned())
				.collect());
		}
		if !exclude_identity {
			return Ok(resolved);
		}
		let primary_key = self.schema.primary_key(&self.model)?;
		Ok(resolved
			.into_iter()
			.filter(|f| f.name() != primary_key && !TIMESTAMP_COLUMNS.contains(&f.name()))
			.collect())
	}

	/// Index fields visible to the given actor
	pub fn index_fields_for(&self, actor: &Actor) -> AdminResult<Vec<Field>> {
		Ok(self
			.index_fields()?
			.into_iter()
			.filter(|f| f.visible(actor))
			.collect())
	}

	/// Form fields visible to the given actor
	pub fn form_fields_for(&self, actor: &Actor) -> AdminResult<Vec<Field>> {
		Ok(self
			.form_fields()?
			.into_iter()
			.filter(|f| f.visible(actor))
			.collect())
	}

	/// Columns included in free-text search.
	///
	/// Explicit list if declared; otherwise every short-string and text
	/// column except conventionally secret names (`*_digest`, `*_token`,
	/// `password*`).
	pub fn searchable_columns(&self) -> AdminResult<Vec<String>> {
		if let Some(columns) = &self.searchable {
			return Ok(columns.clone());
		}
		Ok(self
			.schema
			.columns(&self.model)?
			.into_iter()
			.filter(|c| matches!(c.storage_type, StorageType::String | StorageType::Text))
			.map(|c| c.name)
			.filter(|name| !is_secret_column(name))
			.collect())
	}

	/// Association names worth eager-loading: explicit list if declared,
	/// else every resolved belongs-to field.
	pub fn preload_associations(&self) -> AdminResult<Vec<String>> {
		if let Some(preload) = &self.preload {
			return Ok(preload.clone());
		}
		Ok(self
			.resolved_fields()?
			.into_iter()
			.filter(|f| matches!(f.field_type(), FieldType::BelongsTo { .. }))
			.map(|f| f.name().to_string())
			.collect())
	}

	/// Attribute used as a record's human label: the first of `name`,
	/// `title`, `email`, `label`, `slug` present as a column, else the
	/// primary key.
	pub fn display_attribute(&self) -> AdminResult<String> {
		let columns = self.schema.columns(&self.model)?;
		for candidate in DISPLAY_ATTRIBUTE_PRIORITY {
			if columns.iter().any(|c| c.name == candidate) {
				return Ok(candidate.to_string());
			}
		}
		self.schema.primary_key(&self.model)
	}

	/// Associations declared on the builder, in declaration order.
	///
	/// Related-list views for the has-many/has-one entries live outside the
	/// core; this is the metadata they consume.
	pub fn declared_associations(&self) -> Vec<(&str, AssociationKind)> {
		self.associations
			.iter()
			.map(|(name, decl)| (name.as_str(), decl.kind))
			.collect()
	}

	/// Explicitly declared filters, in declaration order
	pub fn filters(&self) -> &[FilterDef] {
		&self.filters
	}

	/// Declared filters plus one derived filter per field marked
	/// filterable, kinds derived from the resolved display types.
	pub fn all_filters(&self) -> AdminResult<Vec<FilterDef>> {
		let mut filters = self.filters.clone();
		if self.filterable.is_empty() {
			return Ok(filters);
		}
		let resolved = self.resolved_fields()?;
		for name in &self.filterable {
			if let Some(field) = resolved.iter().find(|f| f.name() == name) {
				filters.push(FilterDef::for_field(name.clone(), field.field_type()));
			}
		}
		Ok(filters)
	}

	pub fn scopes(&self) -> &[Scope] {
		&self.scopes
	}

	pub fn actions(&self) -> &[Action] {
		&self.actions
	}

	pub fn bulk_actions(&self) -> &[BulkAction] {
		&self.bulk_actions
	}

	pub fn policy(&self) -> Option<&Policy> {
		self.policy.as_ref()
	}

	/// Action-level authorization; a resource without a policy allows all
	pub fn allowed(&self, action: &str, actor: &Actor) -> bool {
		match &self.policy {
			Some(policy) => policy.allowed(action, actor),
			None => true,
		}
	}

	/// Record-level veto; a resource without a policy denies nothing
	pub fn denied(&self, action: &str, actor: &Actor, record: &serde_json::Value) -> bool {
		match &self.policy {
			Some(policy) => policy.denied(action, actor, record),
			None => false,
		}
	}
}

impl fmt::Debug for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Resource")
			.field("name", &self.name)
			.field("model", &self.model)
			.field("menu_group", &self.menu_group)
			.field("menu_priority", &self.menu_priority)
			.finish()
	}
}

fn is_secret_column(name: &str) -> bool {
	name.ends_with("_digest") || name.ends_with("_token") || name.starts_with("password")
}

/// Builder for [`Resource`]
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use grappelli::fields::FieldType;
/// use grappelli::resource::{FieldOverride, Resource};
/// use grappelli::schema::{Column, EntitySchema, MemorySchema, StorageType};
///
/// let schema = MemorySchema::new();
/// schema.define(
///     "User",
///     EntitySchema::new()
///         .with_column(Column::new("id", StorageType::Integer))
///         .with_column(Column::new("bio", StorageType::Text)),
/// );
///
/// let users = Resource::builder("User", Arc::new(schema))
///     .field("bio", FieldOverride::new().with_type(FieldType::RichText))
///     .index_fields(vec!["bio", "id"])
///     .build()
///     .unwrap();
///
/// let index = users.index_fields().unwrap();
/// assert_eq!(index[0].name(), "bio");
/// assert_eq!(index[0].field_type(), &FieldType::RichText);
/// ```
pub struct ResourceBuilder {
	name: Option<String>,
	model: String,
	label: Option<String>,
	schema: Arc<dyn SchemaProvider>,
	menu_group: Option<String>,
	menu_priority: Option<u32>,
	field_overrides: Vec<(String, FieldOverride)>,
	associations: Vec<(String, AssociationDecl)>,
	filters: Vec<FilterDef>,
	filterable: Vec<String>,
	scopes: Vec<Scope>,
	actions: Vec<Action>,
	bulk_actions: Vec<BulkAction>,
	index_field_names: Option<Vec<String>>,
	form_field_names: Option<Vec<String>>,
	export_field_names: Option<Vec<String>>,
	searchable: Option<Vec<String>>,
	preload: Option<Vec<String>>,
	policy: Option<Policy>,
}

impl ResourceBuilder {
	fn new(model: impl Into<String>, schema: Arc<dyn SchemaProvider>) -> Self {
		Self {
			name: None,
			model: model.into(),
			label: None,
			schema,
			menu_group: None,
			menu_priority: None,
			field_overrides: Vec::new(),
			associations: Vec::new(),
			filters: Vec::new(),
			filterable: Vec::new(),
			scopes: Vec::new(),
			actions: Vec::new(),
			bulk_actions: Vec::new(),
			index_field_names: None,
			form_field_names: None,
			export_field_names: None,
			searchable: None,
			preload: None,
			policy: None,
		}
	}

	/// Override the canonical plural name
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn menu_group(mut self, group: impl Into<String>) -> Self {
		self.menu_group = Some(group.into());
		self
	}

	pub fn menu_priority(mut self, priority: u32) -> Self {
		self.menu_priority = Some(priority);
		self
	}

	/// Declare an explicit field override; the highest merge layer.
	///
	/// Declaring the same field again replaces the previous override.
	pub fn field(mut self, name: impl Into<String>, config: FieldOverride) -> Self {
		let name = name.into();
		if let Some(entry) = self.field_overrides.iter_mut().find(|(n, _)| *n == name) {
			entry.1 = config;
		} else {
			self.field_overrides.push((name, config));
		}
		self
	}

	/// Declare a belongs-to association
	pub fn belongs_to(self, name: impl Into<String>) -> Self {
		self.belongs_to_with(name, FieldOverride::new())
	}

	/// Declare a belongs-to association with shorthand field config
	pub fn belongs_to_with(mut self, name: impl Into<String>, config: FieldOverride) -> Self {
		self.associations.push((
			name.into(),
			AssociationDecl {
				kind: AssociationKind::BelongsTo,
				config,
			},
		));
		self
	}

	/// Declare a has-many association
	pub fn has_many(self, name: impl Into<String>) -> Self {
		self.has_many_with(name, FieldOverride::new())
	}

	pub fn has_many_with(mut self, name: impl Into<String>, config: FieldOverride) -> Self {
		self.associations.push((
			name.into(),
			AssociationDecl {
				kind: AssociationKind::HasMany,
				config,
			},
		));
		self
	}

	/// Declare a has-one association
	pub fn has_one(self, name: impl Into<String>) -> Self {
		self.has_one_with(name, FieldOverride::new())
	}

	pub fn has_one_with(mut self, name: impl Into<String>, config: FieldOverride) -> Self {
		self.associations.push((
			name.into(),
			AssociationDecl {
				kind: AssociationKind::HasOne,
				config,
			},
		));
		self
	}

	/// Declare an explicit filter
	pub fn filter(mut self, filter: FilterDef) -> Self {
		self.filters.push(filter);
		self
	}

	/// Mark a field filterable; its filter kind is derived at resolution
	pub fn filterable(mut self, field: impl Into<String>) -> Self {
		self.filterable.push(field.into());
		self
	}

	pub fn scope(mut self, scope: Scope) -> Self {
		self.scopes.push(scope);
		self
	}

	pub fn action(mut self, action: Action) -> Self {
		self.actions.push(action);
		self
	}

	pub fn bulk_action(mut self, action: BulkAction) -> Self {
		self.bulk_actions.push(action);
		self
	}

	/// Explicit ordered field subset for the index view
	pub fn index_fields(mut self, names: Vec<impl Into<String>>) -> Self {
		self.index_field_names = Some(names.into_iter().map(Into::into).collect());
		self
	}

	/// Explicit ordered field subset for forms
	pub fn form_fields(mut self, names: Vec<impl Into<String>>) -> Self {
		self.form_field_names = Some(names.into_iter().map(Into::into).collect());
		self
	}

	/// Explicit ordered field subset for export
	pub fn export_fields(mut self, names: Vec<impl Into<String>>) -> Self {
		self.export_field_names = Some(names.into_iter().map(Into::into).collect());
		self
	}

	pub fn searchable_columns(mut self, names: Vec<impl Into<String>>) -> Self {
		self.searchable = Some(names.into_iter().map(Into::into).collect());
		self
	}

	pub fn preload_associations(mut self, names: Vec<impl Into<String>>) -> Self {
		self.preload = Some(names.into_iter().map(Into::into).collect());
		self
	}

	pub fn policy(mut self, policy: Policy) -> Self {
		self.policy = Some(policy);
		self
	}

	/// Build the resource.
	///
	/// Fails on duplicate action, bulk action or scope names — those are
	/// boot-time developer mistakes, surfaced immediately.
	pub fn build(self) -> AdminResult<Resource> {
		check_unique("action", self.actions.iter().map(|a| a.name()))?;
		check_unique("bulk action", self.bulk_actions.iter().map(|a| a.name()))?;
		check_unique("scope", self.scopes.iter().map(|s| s.name()))?;

		let name = self
			.name
			.unwrap_or_else(|| text::pluralize(&self.model.to_lowercase()));
		let label = self.label.unwrap_or_else(|| text::humanize(&name));

		Ok(Resource {
			name,
			model: self.model,
			label,
			schema: self.schema,
			menu_group: self.menu_group,
			menu_priority: self.menu_priority,
			field_overrides: self.field_overrides,
			associations: self.associations,
			filters: self.filters,
			filterable: self.filterable,
			scopes: self.scopes,
			actions: self.actions,
			bulk_actions: self.bulk_actions,
			index_field_names: self.index_field_names,
			form_field_names: self.form_field_names,
			export_field_names: self.export_field_names,
			searchable: self.searchable,
			preload: self.preload,
			policy: self.policy,
		})
	}
}

fn check_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> AdminResult<()> {
	let mut seen = HashSet::new();
	for name in names {
		if !seen.insert(name) {
			return Err(AdminError::Configuration(format!(
				"duplicate {kind} '{name}'"
			)));
		}
	}
	Ok(())
}
