//! Declarative actions
//!
//! Resources accumulate named actions (single-record) and bulk actions
//! (selection-wide) in declaration order. The definitions are purely
//! declarative state the controller layer consumes; execution, routing and
//! confirmation UI live outside the core.

use crate::text;
use serde::{Deserialize, Serialize};

/// A single-record action offered on show/edit pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
	name: String,
	label: String,
	confirmation: Option<String>,
	/// Policy action name gating this action; defaults to the action name
	policy_action: Option<String>,
}

impl Action {
	/// Create an action with a label humanized from its name
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let label = text::humanize(&name);
		Self {
			name,
			label,
			confirmation: None,
			policy_action: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// Require a confirmation prompt before the action runs
	pub fn with_confirmation(mut self, message: impl Into<String>) -> Self {
		self.confirmation = Some(message.into());
		self
	}

	/// Gate the action behind a different policy action name
	pub fn with_policy_action(mut self, action: impl Into<String>) -> Self {
		self.policy_action = Some(action.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn confirmation(&self) -> Option<&str> {
		self.confirmation.as_deref()
	}

	/// The policy action name this action is checked against
	pub fn policy_action(&self) -> &str {
		self.policy_action.as_deref().unwrap_or(&self.name)
	}
}

/// A selection-wide action offered on index views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAction {
	name: String,
	label: String,
	confirmation: Option<String>,
	policy_action: Option<String>,
}

impl BulkAction {
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let label = text::humanize(&name);
		Self {
			name,
			label,
			confirmation: None,
			policy_action: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_confirmation(mut self, message: impl Into<String>) -> Self {
		self.confirmation = Some(message.into());
		self
	}

	pub fn with_policy_action(mut self, action: impl Into<String>) -> Self {
		self.policy_action = Some(action.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn confirmation(&self) -> Option<&str> {
		self.confirmation.as_deref()
	}

	pub fn policy_action(&self) -> &str {
		self.policy_action.as_deref().unwrap_or(&self.name)
	}
}
