//! # Grappelli
//!
//! Field resolution and resource configuration engine for auto-generated
//! admin panels.
//!
//! Grappelli introspects an entity's schema and derives a complete, typed,
//! ordered list of admin fields with zero configuration, then layers
//! developer-declared associations and per-field overrides on top. The
//! resolved field lists (per view: index, form, export) are what controller
//! and presentation layers consume; Grappelli itself renders nothing and
//! performs no queries.
//!
//! ## Overview
//!
//! - [`schema::SchemaProvider`] — the narrow contract to the host data layer
//!   (columns, associations, enums, attachments, rich text).
//! - [`inference::FieldInferrer`] — zero-configuration derivation of
//!   [`fields::Field`] descriptors from schema metadata.
//! - [`resource::Resource`] — per-entity configuration built once via
//!   [`resource::ResourceBuilder`]; merge point between inferred and
//!   declared field data.
//! - [`site::ResourceRegistry`] — process-wide resource lookup with menu
//!   grouping and ordering.
//! - [`field_types::FieldTypeRegistry`] — pluggable custom field types with
//!   display/index-display render hooks.
//! - [`policy::Policy`] — allow/deny rule evaluation for action-level and
//!   record-level authorization.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use grappelli::resource::Resource;
//! use grappelli::schema::{Column, EntitySchema, MemorySchema, StorageType};
//!
//! let schema = MemorySchema::new();
//! schema.define(
//!     "User",
//!     EntitySchema::new()
//!         .with_column(Column::new("id", StorageType::Integer))
//!         .with_column(Column::new("name", StorageType::String))
//!         .with_column(Column::new("email", StorageType::String)),
//! );
//!
//! let users = Resource::builder("User", Arc::new(schema)).build().unwrap();
//! let fields = users.resolved_fields().unwrap();
//! assert_eq!(fields.len(), 3);
//! ```

pub mod actions;
pub mod field_types;
pub mod fields;
pub mod filters;
pub mod inference;
pub mod policy;
pub mod resource;
pub mod schema;
pub mod site;
pub mod text;

pub use actions::{Action, BulkAction};
pub use field_types::{FieldTypeConfig, FieldTypeRegistry, global_field_types};
pub use fields::{Actor, Field, FieldRule, FieldType};
pub use filters::{FilterChoice, FilterDef, FilterKind, Scope};
pub use inference::FieldInferrer;
pub use policy::Policy;
pub use resource::{FieldOverride, Resource, ResourceBuilder};
pub use schema::{
	Association, AssociationKind, Attachment, Column, EntitySchema, MemorySchema, SchemaProvider,
	StorageType,
};
pub use site::{DEFAULT_MENU_GROUP, ResourceRegistry, global_resources};

/// Admin engine error type
///
/// Configuration errors and schema-introspection failures are explicit;
/// lookup misses (`find` on either registry) are represented as `Option`
/// and are never errors.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
	/// A field type name was registered twice
	#[error("Field type '{0}' is already registered")]
	DuplicateFieldType(String),

	/// Entity is not known to the schema provider
	#[error("Entity '{0}' is not known to the schema provider")]
	UnknownEntity(String),

	/// The underlying store could not be reached during introspection
	///
	/// Propagated unchanged through `resolved_fields()` and everything
	/// derived from it; the core adds no retry or cached fallback. Passive
	/// feature registration at boot is the only caller sanctioned to catch
	/// this variant and skip registration rather than crash.
	#[error("Schema introspection failed: {0}")]
	SchemaUnavailable(String),

	/// Invalid resource configuration (duplicate action names, etc.)
	#[error("Invalid resource configuration: {0}")]
	Configuration(String),
}

/// Result type for admin engine operations
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_admin_error_display() {
		let err = AdminError::DuplicateFieldType("gravatar".to_string());
		assert_eq!(err.to_string(), "Field type 'gravatar' is already registered");

		let err = AdminError::UnknownEntity("Ghost".to_string());
		assert_eq!(
			err.to_string(),
			"Entity 'Ghost' is not known to the schema provider"
		);
	}
}
