//! Schema introspection contract
//!
//! The engine never talks to a database directly. It depends on a
//! [`SchemaProvider`] that can enumerate an entity's columns, associations,
//! enum constraints, attachment points and rich-text attributes. Hosts
//! implement the trait against their ORM; [`MemorySchema`] is a complete
//! in-memory implementation used in tests and by hosts that declare schemas
//! statically.

use crate::{AdminError, AdminResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Native storage type of a column as reported by the host data layer.
///
/// This is deliberately coarser than any one database's type system; the
/// provider maps its backend types onto these buckets and the inferrer maps
/// the buckets onto display types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
	/// Short string (VARCHAR/CHAR class)
	String,
	/// Long text (TEXT class)
	Text,
	Integer,
	Float,
	Decimal,
	Boolean,
	Date,
	DateTime,
	Time,
	Json,
	Uuid,
	/// Binary/blob column
	Binary,
	/// Backend-specific type with no bucket of its own
	Custom(String),
}

/// One raw column of an entity's schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
	/// Column name
	pub name: String,
	/// Native storage type
	pub storage_type: StorageType,
}

impl Column {
	pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
		Self {
			name: name.into(),
			storage_type,
		}
	}
}

/// Association kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociationKind {
	BelongsTo,
	HasMany,
	HasOne,
}

/// One association reported by the host data layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
	/// Association name (e.g. "organization", "posts")
	pub name: String,
	pub kind: AssociationKind,
	/// Target entity name, when the target is static
	pub target: Option<String>,
	/// Foreign key column backing a belongs-to association
	pub foreign_key: Option<String>,
	/// Whether the target entity type is stored in a discriminator column
	pub polymorphic: bool,
	/// Type-discriminator column of a polymorphic association
	pub type_column: Option<String>,
	/// Id column of a polymorphic association
	pub id_column: Option<String>,
}

impl Association {
	/// A non-polymorphic many-to-one association.
	///
	/// The foreign key defaults to `{name}_id`.
	pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
		let name = name.into();
		let foreign_key = format!("{name}_id");
		Self {
			name,
			kind: AssociationKind::BelongsTo,
			target: Some(target.into()),
			foreign_key: Some(foreign_key),
			polymorphic: false,
			type_column: None,
			id_column: None,
		}
	}

	/// A polymorphic many-to-one association.
	///
	/// Discriminator columns default to `{name}_type` and `{name}_id`.
	pub fn polymorphic_belongs_to(name: impl Into<String>) -> Self {
		let name = name.into();
		let type_column = format!("{name}_type");
		let id_column = format!("{name}_id");
		Self {
			name,
			kind: AssociationKind::BelongsTo,
			target: None,
			foreign_key: None,
			polymorphic: true,
			type_column: Some(type_column),
			id_column: Some(id_column),
		}
	}

	pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: AssociationKind::HasMany,
			target: Some(target.into()),
			foreign_key: None,
			polymorphic: false,
			type_column: None,
			id_column: None,
		}
	}

	pub fn has_one(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: AssociationKind::HasOne,
			target: None,
			foreign_key: None,
			polymorphic: false,
			type_column: None,
			id_column: None,
		}
		.with_target(target)
	}

	/// Override the foreign key column
	pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
		self.foreign_key = Some(foreign_key.into());
		self
	}

	/// Override the target entity
	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	/// Override the polymorphic discriminator columns
	pub fn with_discriminator_columns(
		mut self,
		type_column: impl Into<String>,
		id_column: impl Into<String>,
	) -> Self {
		self.type_column = Some(type_column.into());
		self.id_column = Some(id_column.into());
		self
	}
}

/// One file/blob attachment point on an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
	pub name: String,
	/// Whether the attachment point holds many files
	pub multiple: bool,
}

impl Attachment {
	pub fn single(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			multiple: false,
		}
	}

	pub fn many(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			multiple: true,
		}
	}
}

/// Schema introspection capability the engine depends on.
///
/// All methods are fallible so that a provider backed by a live store can
/// propagate "store unreachable" conditions; the engine forwards such
/// failures unchanged. Implementations must be safe for concurrent reads.
pub trait SchemaProvider: Send + Sync {
	/// Raw columns of the entity, in schema-declared order
	fn columns(&self, entity: &str) -> AdminResult<Vec<Column>>;

	/// All associations of the entity, in declaration order
	fn associations(&self, entity: &str) -> AdminResult<Vec<Association>>;

	/// Keys of the enumerated-value constraint on a column, if any
	fn enum_values(&self, entity: &str, column: &str) -> AdminResult<Option<Vec<String>>>;

	/// File/blob attachment points of the entity
	fn attachments(&self, entity: &str) -> AdminResult<Vec<Attachment>>;

	/// Rich-text attribute names, as stored (may carry a storage prefix)
	fn rich_text_fields(&self, entity: &str) -> AdminResult<Vec<String>>;

	/// Primary key attribute of the entity
	fn primary_key(&self, entity: &str) -> AdminResult<String> {
		let _ = entity;
		Ok("id".to_string())
	}
}

/// Declarative schema of one entity, consumed by [`MemorySchema`]
#[derive(Debug, Clone, Default)]
pub struct EntitySchema {
	columns: Vec<Column>,
	associations: Vec<Association>,
	enums: HashMap<String, Vec<String>>,
	attachments: Vec<Attachment>,
	rich_text: Vec<String>,
	primary_key: Option<String>,
}

impl EntitySchema {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_column(mut self, column: Column) -> Self {
		self.columns.push(column);
		self
	}

	pub fn with_association(mut self, association: Association) -> Self {
		self.associations.push(association);
		self
	}

	/// Attach an enumerated-value constraint to a column
	pub fn with_enum(mut self, column: impl Into<String>, values: Vec<&str>) -> Self {
		self.enums
			.insert(column.into(), values.into_iter().map(String::from).collect());
		self
	}

	pub fn with_attachment(mut self, attachment: Attachment) -> Self {
		self.attachments.push(attachment);
		self
	}

	pub fn with_rich_text(mut self, name: impl Into<String>) -> Self {
		self.rich_text.push(name.into());
		self
	}

	pub fn with_primary_key(mut self, name: impl Into<String>) -> Self {
		self.primary_key = Some(name.into());
		self
	}
}

/// In-memory [`SchemaProvider`]
///
/// Thread-safe; entities are defined once (typically at boot or test setup)
/// and read concurrently afterwards.
///
/// # Examples
///
/// ```
/// use grappelli::schema::{Column, EntitySchema, MemorySchema, SchemaProvider, StorageType};
///
/// let schema = MemorySchema::new();
/// schema.define(
///     "Post",
///     EntitySchema::new()
///         .with_column(Column::new("id", StorageType::Integer))
///         .with_column(Column::new("title", StorageType::String)),
/// );
///
/// let columns = schema.columns("Post").unwrap();
/// assert_eq!(columns.len(), 2);
/// assert!(schema.columns("Ghost").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemorySchema {
	entities: RwLock<HashMap<String, EntitySchema>>,
}

impl MemorySchema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Define (or redefine) an entity's schema
	pub fn define(&self, entity: impl Into<String>, schema: EntitySchema) {
		self.entities.write().insert(entity.into(), schema);
	}

	fn with_entity<T>(
		&self,
		entity: &str,
		f: impl FnOnce(&EntitySchema) -> T,
	) -> AdminResult<T> {
		let entities = self.entities.read();
		entities
			.get(entity)
			.map(f)
			.ok_or_else(|| AdminError::UnknownEntity(entity.to_string()))
	}
}

impl SchemaProvider for MemorySchema {
	fn columns(&self, entity: &str) -> AdminResult<Vec<Column>> {
		self.with_entity(entity, |e| e.columns.clone())
	}

	fn associations(&self, entity: &str) -> AdminResult<Vec<Association>> {
		self.with_entity(entity, |e| e.associations.clone())
	}

	fn enum_values(&self, entity: &str, column: &str) -> AdminResult<Option<Vec<String>>> {
		self.with_entity(entity, |e| e.enums.get(column).cloned())
	}

	fn attachments(&self, entity: &str) -> AdminResult<Vec<Attachment>> {
		self.with_entity(entity, |e| e.attachments.clone())
	}

	fn rich_text_fields(&self, entity: &str) -> AdminResult<Vec<String>> {
		self.with_entity(entity, |e| e.rich_text.clone())
	}

	fn primary_key(&self, entity: &str) -> AdminResult<String> {
		self.with_entity(entity, |e| {
			e.primary_key.clone().unwrap_or_else(|| "id".to_string())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_define_and_read_columns() {
		let schema = MemorySchema::new();
		schema.define(
			"User",
			EntitySchema::new()
				.with_column(Column::new("id", StorageType::Integer))
				.with_column(Column::new("email", StorageType::String)),
		);

		let columns = schema.columns("User").unwrap();
		assert_eq!(columns[0].name, "id");
		assert_eq!(columns[1].storage_type, StorageType::String);
	}

	#[test]
	fn test_unknown_entity_is_an_error() {
		let schema = MemorySchema::new();
		let err = schema.columns("Missing").unwrap_err();
		assert!(matches!(err, AdminError::UnknownEntity(name) if name == "Missing"));
	}

	#[test]
	fn test_redefine_replaces() {
		let schema = MemorySchema::new();
		schema.define(
			"User",
			EntitySchema::new().with_column(Column::new("id", StorageType::Integer)),
		);
		schema.define(
			"User",
			EntitySchema::new()
				.with_column(Column::new("id", StorageType::Integer))
				.with_column(Column::new("name", StorageType::String)),
		);

		assert_eq!(schema.columns("User").unwrap().len(), 2);
	}

	#[test]
	fn test_primary_key_defaults_to_id() {
		let schema = MemorySchema::new();
		schema.define("User", EntitySchema::new());
		assert_eq!(schema.primary_key("User").unwrap(), "id");

		schema.define("Legacy", EntitySchema::new().with_primary_key("legacy_id"));
		assert_eq!(schema.primary_key("Legacy").unwrap(), "legacy_id");
	}

	#[test]
	fn test_belongs_to_defaults() {
		let assoc = Association::belongs_to("organization", "Organization");
		assert_eq!(assoc.foreign_key.as_deref(), Some("organization_id"));
		assert_eq!(assoc.kind, AssociationKind::BelongsTo);
		assert!(!assoc.polymorphic);
	}

	#[test]
	fn test_polymorphic_defaults() {
		let assoc = Association::polymorphic_belongs_to("commentable");
		assert_eq!(assoc.type_column.as_deref(), Some("commentable_type"));
		assert_eq!(assoc.id_column.as_deref(), Some("commentable_id"));
		assert!(assoc.polymorphic);
	}

	#[test]
	fn test_enum_lookup() {
		let schema = MemorySchema::new();
		schema.define(
			"Subscription",
			EntitySchema::new()
				.with_column(Column::new("status", StorageType::String))
				.with_enum("status", vec!["active", "expired"]),
		);

		let values = schema.enum_values("Subscription", "status").unwrap();
		assert_eq!(values, Some(vec!["active".to_string(), "expired".to_string()]));
		assert_eq!(schema.enum_values("Subscription", "other").unwrap(), None);
	}
}
