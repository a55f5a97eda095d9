//! Action authorization rules
//!
//! A [`Policy`] is a stateless allow/deny rule evaluator. Action-level
//! checks (`allowed`) run against the actor before an action is attempted;
//! record-level checks (`denied`) veto individual records after the
//! action-level gate passed.

use crate::fields::Actor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Condition evaluated against the actor for allow rules
pub type AllowCondition = Arc<dyn Fn(&Actor) -> bool + Send + Sync>;

/// Condition evaluated against a record for deny rules
pub type DenyCondition = Arc<dyn Fn(&serde_json::Value) -> bool + Send + Sync>;

/// Allow/deny rule evaluator for one resource.
///
/// An unconfigured policy (no rules at all) allows everything. Once any
/// rule exists the policy is default-deny: actions without an allow entry
/// are refused. Deny rules are independent of allow rules and are evaluated
/// against the record, not the actor.
///
/// # Examples
///
/// ```
/// use grappelli::policy::Policy;
///
/// let policy = Policy::new()
///     .allow("show")
///     .allow_if("destroy", |actor| actor.downcast_ref::<bool>() == Some(&true));
///
/// assert!(policy.allowed("show", &()));
/// assert!(!policy.allowed("edit", &()));
/// assert!(policy.allowed("destroy", &true));
/// assert!(!policy.allowed("destroy", &false));
/// ```
#[derive(Clone, Default)]
pub struct Policy {
	allow: HashMap<String, Option<AllowCondition>>,
	deny: HashMap<String, Option<DenyCondition>>,
	configured: bool,
}

impl Policy {
	/// An unconfigured policy; allows every action
	pub fn new() -> Self {
		Self::default()
	}

	/// Allow an action unconditionally.
	///
	/// The last declaration for a given action wins.
	pub fn allow(mut self, action: impl Into<String>) -> Self {
		self.allow.insert(action.into(), None);
		self.configured = true;
		self
	}

	/// Allow an action when the condition holds for the actor
	pub fn allow_if(
		mut self,
		action: impl Into<String>,
		condition: impl Fn(&Actor) -> bool + Send + Sync + 'static,
	) -> Self {
		self.allow.insert(action.into(), Some(Arc::new(condition)));
		self.configured = true;
		self
	}

	/// Deny an action for every record
	pub fn deny(mut self, action: impl Into<String>) -> Self {
		self.deny.insert(action.into(), None);
		self.configured = true;
		self
	}

	/// Deny an action for records matching the condition
	pub fn deny_if(
		mut self,
		action: impl Into<String>,
		condition: impl Fn(&serde_json::Value) -> bool + Send + Sync + 'static,
	) -> Self {
		self.deny.insert(action.into(), Some(Arc::new(condition)));
		self.configured = true;
		self
	}

	/// Whether any rule has been declared
	pub fn is_configured(&self) -> bool {
		self.configured
	}

	/// Action-level check against the actor.
	///
	/// Unconfigured policy: always true. Configured: false unless an allow
	/// entry exists, whose condition (if any) must hold for the actor.
	pub fn allowed(&self, action: &str, actor: &Actor) -> bool {
		if !self.configured {
			return true;
		}
		match self.allow.get(action) {
			None => false,
			Some(None) => true,
			Some(Some(condition)) => condition(actor),
		}
	}

	/// Record-level veto, independent of [`Policy::allowed`].
	///
	/// No deny entry for the action: never denied. An entry without a
	/// condition denies every record; with a condition, the record is denied
	/// when the condition holds.
	pub fn denied(&self, action: &str, _actor: &Actor, record: &serde_json::Value) -> bool {
		match self.deny.get(action) {
			None => false,
			Some(None) => true,
			Some(Some(condition)) => condition(record),
		}
	}
}

impl fmt::Debug for Policy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Policy")
			.field("allow", &self.allow.keys().collect::<Vec<_>>())
			.field("deny", &self.deny.keys().collect::<Vec<_>>())
			.field("configured", &self.configured)
			.finish()
	}
}
