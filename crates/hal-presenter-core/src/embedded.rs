//! Embedded resource declarations.

use crate::context::Context;
use crate::error::HalResult;
use crate::presenter::Presenter;
use crate::property::Property;
use crate::resource::{Embedded, Resource};
use std::fmt;
use std::sync::Arc;

/// A nested resource or resource sequence rendered under `_embedded`.
///
/// Without an explicit presenter, each embedded value is dispatched through
/// the registry by its concrete type.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{Embed, Options, Resource, Subject};
///
/// struct Author;
/// impl Resource for Author {}
///
/// let embed = Embed::new("author").resource(Author);
/// let value = embed.property().value(Subject::Absent, &Options::new()).unwrap();
/// assert!(matches!(value, Some(embedded) if !embedded.is_many()));
/// ```
#[derive(Clone)]
pub struct Embed {
	property: Property<Embedded>,
	presenter: Option<Arc<Presenter>>,
}

impl Embed {
	/// Declares an embed read through the subject's `name` relation accessor.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			property: Property::new(name),
			presenter: None,
		}
	}

	/// Fixed single resource.
	pub fn resource<R: Resource>(self, resource: R) -> Self {
		self.value(Embedded::one(resource))
	}

	/// Fixed resource sequence.
	pub fn resources<R, I>(self, resources: I) -> Self
	where
		R: Resource,
		I: IntoIterator<Item = R>,
	{
		self.value(Embedded::many(resources))
	}

	pub fn value(mut self, value: Embedded) -> Self {
		self.property = self.property.with_value(value);
		self
	}

	pub fn rule<F>(mut self, rule: F) -> Self
	where
		F: Fn(&Context<'_>) -> Option<Embedded> + Send + Sync + 'static,
	{
		self.property = self.property.with_rule(rule);
		self
	}

	/// Renders and parses the nested values with `presenter`.
	pub fn presenter(mut self, presenter: Arc<Presenter>) -> Self {
		self.presenter = Some(presenter);
		self
	}

	pub fn embed_depth(mut self, depth: usize) -> Self {
		self.property = self.property.embed_depth(depth);
		self
	}

	pub fn name(&self) -> &str {
		self.property.name()
	}

	pub fn property(&self) -> &Property<Embedded> {
		&self.property
	}

	pub fn nested_presenter(&self) -> Option<&Arc<Presenter>> {
		self.presenter.as_ref()
	}

	pub fn resolve(&self, ctx: &Context<'_>) -> HalResult<Option<Embedded>> {
		self.property.resolve(ctx)
	}
}

impl fmt::Debug for Embed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Embed")
			.field("name", &self.name())
			.field("source", self.property.source())
			.field("presenter", &self.presenter.as_ref().map(|p| p.name()))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::Options;
	use crate::resource::{Subject, type_id_of};
	use rstest::rstest;
	use std::any::TypeId;

	struct Comment;
	impl Resource for Comment {}

	struct Post {
		comments: usize,
	}

	impl Resource for Post {
		fn embedded(&self, name: &str) -> Option<Embedded> {
			(name == "comments").then(|| Embedded::many((0..self.comments).map(|_| Comment)))
		}
	}

	#[rstest]
	fn test_accessor_embed() {
		let embed = Embed::new("comments");
		let post = Post { comments: 3 };
		let options = Options::new();
		let value = embed
			.resolve(&Context::new(Subject::Resource(&post), &options))
			.unwrap();
		match value {
			Some(Embedded::Many(items)) => {
				assert_eq!(items.len(), 3);
				assert_eq!(type_id_of(items[0].as_ref()), TypeId::of::<Comment>());
			}
			other => panic!("unexpected embed value: {:?}", other),
		}
	}

	#[rstest]
	fn test_rule_embed_can_be_absent() {
		let embed = Embed::new("author").rule(|_| None);
		let options = Options::new();
		let value = embed
			.resolve(&Context::new(Subject::Resource(&Post { comments: 0 }), &options))
			.unwrap();
		assert!(value.is_none());
	}

	#[rstest]
	fn test_constant_sequence() {
		let embed = Embed::new("comments").resources(vec![Comment, Comment]).embed_depth(1);
		let value = embed.property().value(Subject::Absent, &Options::new()).unwrap();
		assert!(matches!(value, Some(Embedded::Many(items)) if items.len() == 2));
		assert_eq!(embed.property().depth_limit(), Some(1));
		assert!(embed.nested_presenter().is_none());
	}
}
