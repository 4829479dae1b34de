//! Visibility policies.
//!
//! A [`Policy`] answers whether an attribute, link or embed may appear in
//! the rendered document. Policies themselves are stateless and shared by
//! the presenter; the serializer binds one to the viewer, subject and
//! options of each render through [`BoundPolicy`].
//!
//! [`PolicyRules`] builds the common case: a table of per-name rules with a
//! per-category fallback.

use crate::options::Options;
use crate::resource::{Resource, Subject};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// What a policy rule is evaluated against.
#[derive(Clone, Copy)]
pub struct PolicyContext<'a> {
	pub current_user: Option<&'a (dyn Any + Send + Sync)>,
	pub subject: Subject<'a>,
	pub options: &'a Options,
}

impl<'a> PolicyContext<'a> {
	pub fn new(subject: Subject<'a>, options: &'a Options) -> Self {
		Self {
			current_user: options.current_user_any(),
			subject,
			options,
		}
	}

	pub fn current_user<U: Any>(&self) -> Option<&'a U> {
		self.current_user?.downcast_ref::<U>()
	}

	pub fn resource(&self) -> Option<&'a dyn Resource> {
		self.subject.resource()
	}

	pub fn resource_as<T: Resource>(&self) -> Option<&'a T> {
		self.resource()?.as_any().downcast_ref::<T>()
	}
}

/// Visibility gate consulted for every declared attribute, link and embed.
///
/// Everything is hidden unless an implementation says otherwise.
pub trait Policy: Send + Sync {
	fn attribute(&self, _ctx: &PolicyContext<'_>, _name: &str) -> bool {
		false
	}

	fn link(&self, _ctx: &PolicyContext<'_>, _rel: &str) -> bool {
		false
	}

	fn embed(&self, _ctx: &PolicyContext<'_>, _name: &str) -> bool {
		false
	}
}

/// A policy bound to one render call.
pub struct BoundPolicy<'a> {
	policy: &'a dyn Policy,
	ctx: PolicyContext<'a>,
}

impl<'a> BoundPolicy<'a> {
	pub fn new(policy: &'a dyn Policy, subject: Subject<'a>, options: &'a Options) -> Self {
		Self {
			policy,
			ctx: PolicyContext::new(subject, options),
		}
	}

	pub fn attribute(&self, name: &str) -> bool {
		self.policy.attribute(&self.ctx, name)
	}

	/// `self` is always visible and never reaches the policy.
	pub fn link(&self, rel: &str) -> bool {
		rel == "self" || self.policy.link(&self.ctx, rel)
	}

	pub fn embed(&self, name: &str) -> bool {
		self.policy.embed(&self.ctx, name)
	}
}

/// Rule category for [`PolicyRules::allow_by_default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
	Attributes,
	Links,
	Embedded,
}

pub type PolicyRule = Arc<dyn Fn(&PolicyContext<'_>) -> bool + Send + Sync>;

/// Builder for a [`RulePolicy`].
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{Options, Policy, PolicyContext, PolicyRules, RuleCategory, Subject};
///
/// let policy = PolicyRules::new()
///     .attribute("title")
///     .link_if("edit", |ctx| ctx.current_user::<&'static str>() == Some(&"admin"))
///     .allow_by_default([RuleCategory::Embedded])
///     .build();
///
/// let admin = Options::new().with_current_user("admin");
/// let ctx = PolicyContext::new(Subject::Absent, &admin);
/// assert!(policy.attribute(&ctx, "title"));
/// assert!(!policy.attribute(&ctx, "body"));
/// assert!(policy.link(&ctx, "edit"));
/// assert!(policy.embed(&ctx, "author"));
/// ```
#[derive(Clone, Default)]
pub struct PolicyRules {
	rules: HashMap<(RuleCategory, String), PolicyRule>,
	defaults: HashSet<RuleCategory>,
}

impl PolicyRules {
	pub fn new() -> Self {
		Self::default()
	}

	fn rule<F>(mut self, category: RuleCategory, name: impl Into<String>, rule: F) -> Self
	where
		F: Fn(&PolicyContext<'_>) -> bool + Send + Sync + 'static,
	{
		self.rules.insert((category, name.into()), Arc::new(rule));
		self
	}

	/// Always shows attribute `name`.
	pub fn attribute(self, name: impl Into<String>) -> Self {
		self.rule(RuleCategory::Attributes, name, |_| true)
	}

	pub fn attribute_if<F>(self, name: impl Into<String>, rule: F) -> Self
	where
		F: Fn(&PolicyContext<'_>) -> bool + Send + Sync + 'static,
	{
		self.rule(RuleCategory::Attributes, name, rule)
	}

	pub fn link(self, rel: impl Into<String>) -> Self {
		self.rule(RuleCategory::Links, rel, |_| true)
	}

	pub fn link_if<F>(self, rel: impl Into<String>, rule: F) -> Self
	where
		F: Fn(&PolicyContext<'_>) -> bool + Send + Sync + 'static,
	{
		self.rule(RuleCategory::Links, rel, rule)
	}

	pub fn embed(self, name: impl Into<String>) -> Self {
		self.rule(RuleCategory::Embedded, name, |_| true)
	}

	pub fn embed_if<F>(self, name: impl Into<String>, rule: F) -> Self
	where
		F: Fn(&PolicyContext<'_>) -> bool + Send + Sync + 'static,
	{
		self.rule(RuleCategory::Embedded, name, rule)
	}

	/// Shows undeclared names in `categories` instead of hiding them.
	pub fn allow_by_default(mut self, categories: impl IntoIterator<Item = RuleCategory>) -> Self {
		self.defaults.extend(categories);
		self
	}

	pub fn build(self) -> RulePolicy {
		RulePolicy {
			rules: self.rules,
			defaults: self.defaults,
		}
	}
}

/// A rule-table policy built by [`PolicyRules`].
pub struct RulePolicy {
	rules: HashMap<(RuleCategory, String), PolicyRule>,
	defaults: HashSet<RuleCategory>,
}

impl RulePolicy {
	fn check(&self, category: RuleCategory, ctx: &PolicyContext<'_>, name: &str) -> bool {
		match self.rules.get(&(category, name.to_string())) {
			Some(rule) => rule(ctx),
			None => self.defaults.contains(&category),
		}
	}
}

impl Policy for RulePolicy {
	fn attribute(&self, ctx: &PolicyContext<'_>, name: &str) -> bool {
		self.check(RuleCategory::Attributes, ctx, name)
	}

	fn link(&self, ctx: &PolicyContext<'_>, rel: &str) -> bool {
		self.check(RuleCategory::Links, ctx, rel)
	}

	fn embed(&self, ctx: &PolicyContext<'_>, name: &str) -> bool {
		self.check(RuleCategory::Embedded, ctx, name)
	}
}

impl fmt::Debug for RulePolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<_> = self.rules.keys().collect();
		names.sort_by(|a, b| a.1.cmp(&b.1));
		f.debug_struct("RulePolicy")
			.field("rules", &names)
			.field("defaults", &self.defaults)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Debug, PartialEq)]
	struct User {
		admin: bool,
	}

	struct Post {
		published: bool,
	}

	impl Resource for Post {}

	fn rules() -> RulePolicy {
		PolicyRules::new()
			.attribute("title")
			.attribute_if("draft_notes", |ctx| {
				ctx.current_user::<User>().is_some_and(|user| user.admin)
			})
			.link_if("comments", |ctx| {
				ctx.resource_as::<Post>().is_some_and(|post| post.published)
			})
			.embed("author")
			.build()
	}

	#[rstest]
	#[case(true, true)]
	#[case(false, false)]
	fn test_rule_sees_viewer(#[case] admin: bool, #[case] visible: bool) {
		let policy = rules();
		let options = Options::new().with_current_user(User { admin });
		let ctx = PolicyContext::new(Subject::Absent, &options);
		assert!(policy.attribute(&ctx, "title"));
		assert_eq!(policy.attribute(&ctx, "draft_notes"), visible);
	}

	#[rstest]
	#[case(true)]
	#[case(false)]
	fn test_rule_sees_resource(#[case] published: bool) {
		let policy = rules();
		let options = Options::new();
		let post = Post { published };
		let ctx = PolicyContext::new(Subject::Resource(&post), &options);
		assert_eq!(policy.link(&ctx, "comments"), published);
	}

	#[rstest]
	fn test_undeclared_names_are_hidden() {
		let policy = rules();
		let options = Options::new();
		let ctx = PolicyContext::new(Subject::Absent, &options);
		assert!(!policy.attribute(&ctx, "body"));
		assert!(!policy.link(&ctx, "edit"));
		assert!(policy.embed(&ctx, "author"));
		assert!(!policy.embed(&ctx, "comments"));
	}

	#[rstest]
	fn test_allow_by_default_per_category() {
		let policy = PolicyRules::new()
			.attribute_if("secret", |_| false)
			.allow_by_default([RuleCategory::Attributes, RuleCategory::Links])
			.build();
		let options = Options::new();
		let ctx = PolicyContext::new(Subject::Absent, &options);
		assert!(policy.attribute(&ctx, "anything"));
		assert!(!policy.attribute(&ctx, "secret"));
		assert!(policy.link(&ctx, "edit"));
		assert!(!policy.embed(&ctx, "author"));
	}

	struct Counting {
		calls: AtomicUsize,
	}

	impl Policy for Counting {
		fn link(&self, _ctx: &PolicyContext<'_>, _rel: &str) -> bool {
			self.calls.fetch_add(1, Ordering::SeqCst);
			false
		}
	}

	#[rstest]
	fn test_self_link_never_consults_policy() {
		let policy = Counting {
			calls: AtomicUsize::new(0),
		};
		let options = Options::new();
		let bound = BoundPolicy::new(&policy, Subject::Absent, &options);

		assert!(bound.link("self"));
		assert_eq!(policy.calls.load(Ordering::SeqCst), 0);
		assert!(!bound.link("edit"));
		assert_eq!(policy.calls.load(Ordering::SeqCst), 1);
		assert!(!bound.attribute("title"));
	}
}
