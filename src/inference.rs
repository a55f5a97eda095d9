//! Zero-configuration field inference
//!
//! [`FieldInferrer`] derives the default [`Field`] list for an entity purely
//! from schema metadata: columns map to display types through a fixed table,
//! foreign-key columns collapse into belongs-to fields named after their
//! association, polymorphic discriminator pairs collapse into one field, and
//! attachment/rich-text declarations are appended at the end. The pass is
//! idempotent and side-effect free: two runs over the same schema snapshot
//! produce field lists identical in name, type and options.

use crate::fields::{Field, FieldType};
use crate::schema::{Association, AssociationKind, Column, SchemaProvider, StorageType};
use crate::AdminResult;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Storage prefix carried by rich-text attribute names
const RICH_TEXT_PREFIX: &str = "rich_text_";

/// Derives the default field list for an entity from its schema metadata
pub struct FieldInferrer;

impl FieldInferrer {
	/// Infer the complete ordered field list for `entity`.
	///
	/// Order: plain/belongs-to/enum fields in schema-declared column order,
	/// then one field per polymorphic association, then attachments, then
	/// rich-text attributes.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::inference::FieldInferrer;
	/// use grappelli::fields::FieldType;
	/// use grappelli::schema::{Column, EntitySchema, MemorySchema, StorageType};
	///
	/// let schema = MemorySchema::new();
	/// schema.define(
	///     "Post",
	///     EntitySchema::new()
	///         .with_column(Column::new("title", StorageType::String))
	///         .with_column(Column::new("body", StorageType::Text)),
	/// );
	///
	/// let fields = FieldInferrer::infer(&schema, "Post").unwrap();
	/// assert_eq!(fields[0].field_type(), &FieldType::Text);
	/// assert_eq!(fields[1].field_type(), &FieldType::TextArea);
	/// ```
	pub fn infer(schema: &dyn SchemaProvider, entity: &str) -> AdminResult<Vec<Field>> {
		let columns = schema.columns(entity)?;
		let associations = schema.associations(entity)?;

		// Non-polymorphic belongs-to associations, keyed by foreign key column
		let belongs_to_by_fk: HashMap<&str, &Association> = associations
			.iter()
			.filter(|a| a.kind == AssociationKind::BelongsTo && !a.polymorphic)
			.filter_map(|a| a.foreign_key.as_deref().map(|fk| (fk, a)))
			.collect();

		let polymorphic: Vec<&Association> = associations
			.iter()
			.filter(|a| a.kind == AssociationKind::BelongsTo && a.polymorphic)
			.collect();

		// Discriminator pairs are synthesized once per association, never as
		// raw columns.
		let polymorphic_columns: HashSet<&str> = polymorphic
			.iter()
			.flat_map(|a| {
				a.type_column
					.as_deref()
					.into_iter()
					.chain(a.id_column.as_deref())
			})
			.collect();

		// Columns shadowed by a has-many/has-one association of the same
		// name. The association always wins; the column is excluded.
		let shadowed: HashSet<&str> = associations
			.iter()
			.filter(|a| matches!(a.kind, AssociationKind::HasMany | AssociationKind::HasOne))
			.map(|a| a.name.as_str())
			.collect();

		let mut fields = Vec::with_capacity(columns.len());

		for column in &columns {
			if shadowed.contains(column.name.as_str()) {
				trace!(entity, column = %column.name, "column shadowed by association");
				continue;
			}
			if polymorphic_columns.contains(column.name.as_str()) {
				continue;
			}

			if let Some(association) = belongs_to_by_fk.get(column.name.as_str()) {
				fields.push(Self::belongs_to_field(association, &column.name));
				continue;
			}

			if let Some(choices) = schema.enum_values(entity, &column.name)? {
				fields.push(Field::new(&column.name, FieldType::Select { choices }));
				continue;
			}

			fields.push(Field::new(&column.name, Self::column_field_type(column)));
		}

		for association in polymorphic {
			fields.push(Self::polymorphic_field(association));
		}

		for attachment in schema.attachments(entity)? {
			let field_type = if attachment.multiple {
				FieldType::Files
			} else {
				FieldType::File
			};
			fields.push(Field::new(attachment.name, field_type));
		}

		for attribute in schema.rich_text_fields(entity)? {
			let name = attribute
				.strip_prefix(RICH_TEXT_PREFIX)
				.unwrap_or(&attribute);
			fields.push(Field::new(name, FieldType::RichText));
		}

		Ok(fields)
	}

	fn belongs_to_field(association: &Association, foreign_key: &str) -> Field {
		let target = association
			.target
			.clone()
			.unwrap_or_else(|| association.name.clone());
		Field::new(
			&association.name,
			FieldType::BelongsTo {
				target,
				foreign_key: foreign_key.to_string(),
			},
		)
	}

	fn polymorphic_field(association: &Association) -> Field {
		let type_column = association
			.type_column
			.clone()
			.unwrap_or_else(|| format!("{}_type", association.name));
		let id_column = association
			.id_column
			.clone()
			.unwrap_or_else(|| format!("{}_id", association.name));
		Field::new(
			&association.name,
			FieldType::PolymorphicBelongsTo {
				type_column,
				id_column,
			},
		)
	}

	/// Map a column's native storage type to a semantic field type.
	///
	/// Short-string columns additionally go through name heuristics so that
	/// `website` or `contact_email` get URL/email inputs without
	/// configuration. Unrecognized storage types fall back to `Text`.
	fn column_field_type(column: &Column) -> FieldType {
		match &column.storage_type {
			StorageType::String => Self::text_field_type(&column.name),
			StorageType::Text => FieldType::TextArea,
			StorageType::Integer | StorageType::Float | StorageType::Decimal => FieldType::Number,
			StorageType::Boolean => FieldType::Boolean,
			StorageType::Date => FieldType::Date,
			StorageType::DateTime => FieldType::DateTime,
			StorageType::Time => FieldType::Time,
			StorageType::Json => FieldType::Json,
			StorageType::Uuid => FieldType::Text,
			StorageType::Binary => FieldType::File,
			StorageType::Custom(_) => FieldType::Text,
		}
	}

	fn text_field_type(name: &str) -> FieldType {
		if Self::is_url_name(name) {
			FieldType::Url
		} else if Self::is_email_name(name) {
			FieldType::Email
		} else {
			FieldType::Text
		}
	}

	fn is_url_name(name: &str) -> bool {
		name == "website" || name == "homepage" || name.ends_with("_url") || name.ends_with("_link")
	}

	fn is_email_name(name: &str) -> bool {
		name == "email" || name.ends_with("_email")
	}
}
