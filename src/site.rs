//! Resource registration and navigation
//!
//! A [`ResourceRegistry`] holds every configured [`Resource`] for an admin
//! site, in registration order, and answers exact-name lookups from request
//! handling. Most applications use the process-wide registry returned by
//! [`global_resources`]; embedded or multi-tenant setups can hold their own.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use grappelli::resource::Resource;
//! use grappelli::schema::{Column, EntitySchema, MemorySchema, StorageType};
//! use grappelli::site::ResourceRegistry;
//!
//! let schema = MemorySchema::new();
//! schema.define(
//!     "User",
//!     EntitySchema::new().with_column(Column::new("id", StorageType::Integer)),
//! );
//! let users = Resource::builder("User", Arc::new(schema)).build().unwrap();
//!
//! let registry = ResourceRegistry::new();
//! registry.register(users);
//! assert!(registry.find("users").is_some());
//! assert!(registry.find("user").is_none());
//! ```

use crate::resource::Resource;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Menu group for resources that did not declare one
pub const DEFAULT_MENU_GROUP: &str = "Other";

/// Ordered collection of registered resources
#[derive(Default)]
pub struct ResourceRegistry {
	inner: RwLock<Vec<Arc<Resource>>>,
}

impl ResourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a resource under its canonical name.
	///
	/// Registering a name twice replaces the earlier resource in place and
	/// logs a warning; the common cause is a module loaded twice during
	/// development reloads.
	pub fn register(&self, resource: Resource) {
		let resource = Arc::new(resource);
		let mut inner = self.inner.write();
		if let Some(existing) = inner.iter_mut().find(|r| r.name() == resource.name()) {
			warn!(name = %resource.name(), "replacing already registered resource");
			*existing = resource;
		} else {
			inner.push(resource);
		}
	}

	/// Exact-name lookup; no pluralization or case folding is attempted
	pub fn find(&self, name: &str) -> Option<Arc<Resource>> {
		self.inner.read().iter().find(|r| r.name() == name).cloned()
	}

	/// All resources in registration order
	pub fn all(&self) -> Vec<Arc<Resource>> {
		self.inner.read().clone()
	}

	/// Resources ordered for navigation: ascending menu priority, with
	/// undeclared priorities last, ties in registration order.
	pub fn sorted(&self) -> Vec<Arc<Resource>> {
		let mut resources = self.all();
		resources.sort_by_key(|r| r.menu_priority().unwrap_or(u32::MAX));
		resources
	}

	/// Resources bucketed by menu group, each bucket in navigation order.
	/// Resources without a group land under [`DEFAULT_MENU_GROUP`].
	pub fn grouped(&self) -> HashMap<String, Vec<Arc<Resource>>> {
		let mut groups: HashMap<String, Vec<Arc<Resource>>> = HashMap::new();
		for resource in self.sorted() {
			let group = resource
				.menu_group()
				.unwrap_or(DEFAULT_MENU_GROUP)
				.to_string();
			groups.entry(group).or_default().push(resource);
		}
		groups
	}

	pub fn len(&self) -> usize {
		self.inner.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.read().is_empty()
	}

	/// Remove every registration; test isolation only
	pub fn reset(&self) {
		self.inner.write().clear();
	}
}

static GLOBAL_RESOURCES: Lazy<ResourceRegistry> = Lazy::new(ResourceRegistry::new);

/// The process-wide resource registry
pub fn global_resources() -> &'static ResourceRegistry {
	&GLOBAL_RESOURCES
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{Column, EntitySchema, MemorySchema, StorageType};
	use serial_test::serial;

	fn resource(model: &str) -> Resource {
		resource_with(model, |b| b)
	}

	fn resource_with(
		model: &str,
		configure: impl FnOnce(crate::resource::ResourceBuilder) -> crate::resource::ResourceBuilder,
	) -> Resource {
		let schema = MemorySchema::new();
		schema.define(
			model,
			EntitySchema::new().with_column(Column::new("id", StorageType::Integer)),
		);
		configure(Resource::builder(model, Arc::new(schema)))
			.build()
			.unwrap()
	}

	#[test]
	fn test_register_and_find() {
		let registry = ResourceRegistry::new();
		registry.register(resource("User"));

		assert!(registry.find("users").is_some());
		assert!(registry.find("Users").is_none());
		assert!(registry.find("user").is_none());
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_reregistration_replaces_in_place() {
		let registry = ResourceRegistry::new();
		registry.register(resource("User"));
		registry.register(resource("Post"));
		registry.register(resource_with("User", |b| b.label("People")));

		assert_eq!(registry.len(), 2);
		let order: Vec<String> = registry
			.all()
			.iter()
			.map(|r| r.name().to_string())
			.collect();
		assert_eq!(order, vec!["users", "posts"]);
		assert_eq!(registry.find("users").unwrap().label(), "People");
	}

	#[test]
	fn test_sorted_by_menu_priority() {
		let registry = ResourceRegistry::new();
		registry.register(resource_with("Report", |b| b));
		registry.register(resource_with("User", |b| b.menu_priority(1)));
		registry.register(resource_with("Post", |b| b.menu_priority(2)));
		registry.register(resource_with("Comment", |b| b.menu_priority(1)));

		let order: Vec<String> = registry
			.sorted()
			.iter()
			.map(|r| r.name().to_string())
			.collect();
		// Undeclared priority sorts last; equal priorities keep
		// registration order.
		assert_eq!(order, vec!["users", "comments", "posts", "reports"]);
	}

	#[test]
	fn test_grouped_uses_default_group() {
		let registry = ResourceRegistry::new();
		registry.register(resource_with("User", |b| b.menu_group("Accounts")));
		registry.register(resource("Report"));

		let groups = registry.grouped();
		assert_eq!(groups["Accounts"].len(), 1);
		assert_eq!(groups[DEFAULT_MENU_GROUP].len(), 1);
		assert_eq!(groups[DEFAULT_MENU_GROUP][0].name(), "reports");
	}

	#[test]
	#[serial]
	fn test_global_registry() {
		global_resources().reset();
		assert!(global_resources().is_empty());

		global_resources().register(resource("User"));
		assert!(global_resources().find("users").is_some());

		global_resources().reset();
	}
}
