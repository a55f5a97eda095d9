//! End-to-end resolution tests against an in-memory schema.
//!
//! These exercise the full pipeline one layer at a time would miss:
//! schema metadata through inference, override merge, view selection,
//! visibility filtering and policy checks.

use std::sync::Arc;

use grappelli::fields::{FieldRule, FieldType};
use grappelli::policy::Policy;
use grappelli::resource::{FieldOverride, Resource};
use grappelli::schema::{
	Association, Attachment, Column, EntitySchema, MemorySchema, StorageType,
};
use grappelli::site::ResourceRegistry;
use serde_json::json;

/// A blog-shaped schema with every metadata source populated
fn blog_schema() -> Arc<MemorySchema> {
	let schema = MemorySchema::new();
	schema.define(
		"Post",
		EntitySchema::new()
			.with_column(Column::new("id", StorageType::Integer))
			.with_column(Column::new("title", StorageType::String))
			.with_column(Column::new("status", StorageType::String))
			.with_column(Column::new("author_id", StorageType::Integer))
			.with_column(Column::new("commentable_type", StorageType::String))
			.with_column(Column::new("commentable_id", StorageType::Integer))
			.with_column(Column::new("comments", StorageType::Integer))
			.with_column(Column::new("published_on", StorageType::Date))
			.with_enum("status", vec!["draft", "published", "archived"])
			.with_association(Association::belongs_to("author", "User"))
			.with_association(Association::polymorphic_belongs_to("commentable"))
			.with_association(Association::has_many("comments", "Comment"))
			.with_attachment(Attachment::single("cover_image"))
			.with_rich_text("rich_text_body"),
	);
	schema.define(
		"User",
		EntitySchema::new()
			.with_column(Column::new("id", StorageType::Integer))
			.with_column(Column::new("name", StorageType::String))
			.with_column(Column::new("email", StorageType::String))
			.with_column(Column::new("password_digest", StorageType::String)),
	);
	Arc::new(schema)
}

#[test]
fn test_zero_configuration_resolution() {
	let posts = Resource::builder("Post", blog_schema()).build().unwrap();
	let fields = posts.resolved_fields().unwrap();

	let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
	assert_eq!(
		names,
		vec![
			"id",
			"title",
			"status",
			"author",
			"published_on",
			"commentable",
			"cover_image",
			"body",
		]
	);

	let by_name = |n: &str| fields.iter().find(|f| f.name() == n).unwrap();
	assert_eq!(
		by_name("author").field_type(),
		&FieldType::BelongsTo {
			target: "User".to_string(),
			foreign_key: "author_id".to_string(),
		}
	);
	assert_eq!(
		by_name("commentable").field_type(),
		&FieldType::PolymorphicBelongsTo {
			type_column: "commentable_type".to_string(),
			id_column: "commentable_id".to_string(),
		}
	);
	assert_eq!(
		by_name("status").field_type(),
		&FieldType::Select {
			choices: vec![
				"draft".to_string(),
				"published".to_string(),
				"archived".to_string(),
			],
		}
	);
	assert_eq!(by_name("cover_image").field_type(), &FieldType::File);
	assert_eq!(by_name("body").field_type(), &FieldType::RichText);
}

#[test]
fn test_shadowed_column_never_resurfaces_through_views() {
	// `comments` exists both as a column and a has-many; the column must
	// not appear in any view either.
	let posts = Resource::builder("Post", blog_schema()).build().unwrap();

	for fields in [
		posts.index_fields().unwrap(),
		posts.form_fields().unwrap(),
		posts.export_fields().unwrap(),
	] {
		assert!(fields.iter().all(|f| f.name() != "comments"));
	}
}

#[test]
fn test_override_and_association_layering() {
	let posts = Resource::builder("Post", blog_schema())
		.belongs_to_with("author", FieldOverride::new().with_option("display", "name"))
		.field(
			"author",
			FieldOverride::new()
				.with_readonly(true)
				.with_option("searchable", true),
		)
		.build()
		.unwrap();

	let fields = posts.resolved_fields().unwrap();
	let author = fields.iter().find(|f| f.name() == "author").unwrap();

	// Inferred type survives both layers; options from both layers merge.
	assert!(matches!(author.field_type(), FieldType::BelongsTo { .. }));
	assert_eq!(author.option("display"), Some(&json!("name")));
	assert_eq!(author.option("searchable"), Some(&json!(true)));
	assert!(author.readonly(&()));
}

#[test]
fn test_form_view_defaults_and_explicit_index() {
	let posts = Resource::builder("Post", blog_schema())
		.index_fields(vec!["title", "status", "author"])
		.build()
		.unwrap();

	let index_fields = posts.index_fields().unwrap();
	let index: Vec<&str> = index_fields
		.iter()
		.map(|f| f.name())
		.collect::<Vec<_>>();
	assert_eq!(index, vec!["title", "status", "author"]);

	// Form stays on defaults: everything but the primary key.
	let form: Vec<String> = posts
		.form_fields()
		.unwrap()
		.iter()
		.map(|f| f.name().to_string())
		.collect();
	assert!(!form.contains(&"id".to_string()));
	assert!(form.contains(&"title".to_string()));
	assert!(form.contains(&"body".to_string()));
}

#[test]
fn test_actor_scoped_index() {
	struct Staff;

	let posts = Resource::builder("Post", blog_schema())
		.field(
			"status",
			FieldOverride::new()
				.with_visible(FieldRule::when(|actor| actor.downcast_ref::<Staff>().is_some())),
		)
		.build()
		.unwrap();

	let staff: Vec<String> = posts
		.index_fields_for(&Staff)
		.unwrap()
		.iter()
		.map(|f| f.name().to_string())
		.collect();
	let visitor: Vec<String> = posts
		.index_fields_for(&())
		.unwrap()
		.iter()
		.map(|f| f.name().to_string())
		.collect();

	assert!(staff.contains(&"status".to_string()));
	assert!(!visitor.contains(&"status".to_string()));
	assert_eq!(staff.len(), visitor.len() + 1);
}

#[test]
fn test_policy_gates_actions_and_records() {
	struct Admin;

	let posts = Resource::builder("Post", blog_schema())
		.policy(
			Policy::new()
				.allow("index")
				.allow_if("destroy", |actor| actor.downcast_ref::<Admin>().is_some())
				.deny_if("destroy", |record| record["status"] == json!("published")),
		)
		.build()
		.unwrap();

	assert!(posts.allowed("index", &()));
	assert!(!posts.allowed("edit", &()));
	assert!(posts.allowed("destroy", &Admin));
	assert!(!posts.allowed("destroy", &()));

	let draft = json!({"id": 1, "status": "draft"});
	let published = json!({"id": 2, "status": "published"});
	assert!(!posts.denied("destroy", &Admin, &draft));
	assert!(posts.denied("destroy", &Admin, &published));
}

#[test]
fn test_searchable_and_preload_defaults() {
	let schema = blog_schema();

	let posts = Resource::builder("Post", schema.clone()).build().unwrap();
	assert_eq!(
		posts.searchable_columns().unwrap(),
		vec!["title", "status", "commentable_type"]
	);
	assert_eq!(posts.preload_associations().unwrap(), vec!["author"]);

	let users = Resource::builder("User", schema).build().unwrap();
	// Secret columns stay out of search even though they are strings.
	assert_eq!(users.searchable_columns().unwrap(), vec!["name", "email"]);
	assert_eq!(users.display_attribute().unwrap(), "name");
}

#[test]
fn test_registry_navigation() {
	let schema = blog_schema();
	let registry = ResourceRegistry::new();
	registry.register(
		Resource::builder("Post", schema.clone())
			.menu_group("Content")
			.menu_priority(2)
			.build()
			.unwrap(),
	);
	registry.register(
		Resource::builder("User", schema)
			.menu_group("Accounts")
			.menu_priority(1)
			.build()
			.unwrap(),
	);

	let order: Vec<String> = registry
		.sorted()
		.iter()
		.map(|r| r.name().to_string())
		.collect();
	assert_eq!(order, vec!["users", "posts"]);

	let groups = registry.grouped();
	assert_eq!(groups.len(), 2);
	assert_eq!(groups["Content"][0].model(), "Post");

	let posts = registry.find("posts").unwrap();
	assert_eq!(posts.resolved_fields().unwrap().len(), 8);
}

#[test]
fn test_resolution_is_stable_across_calls() {
	let posts = Resource::builder("Post", blog_schema())
		.field("title", FieldOverride::new().with_option("link_to_record", true))
		.has_many("comments")
		.build()
		.unwrap();

	let first = posts.resolved_fields().unwrap();
	let second = posts.resolved_fields().unwrap();
	assert_eq!(first, second);
}
