//! Presenters: the declarations that map a model type to a HAL document.
//!
//! A [`Presenter`] is an immutable value built once through
//! [`PresenterBuilder`]. A child presenter starts from a copy of its
//! parent's declarations and adds to them; parents are never mutated.

use crate::context::Context;
use crate::embedded::Embed;
use crate::error::{HalError, HalResult};
use crate::links::{Curie, Link};
use crate::options::Options;
use crate::policy::Policy;
use crate::property::Property;
use crate::resource::{Resource, Subject};
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Hook run on a rendered single-resource document after everything else.
pub type PostSerializeHook = Arc<dyn Fn(&Context<'_>, &mut Map<String, Value>) + Send + Sync>;

/// Ordered attribute, link, curie and embed declarations.
#[derive(Clone, Default)]
pub struct Properties {
	attributes: Vec<Property<Value>>,
	links: Vec<Link>,
	curies: Vec<Curie>,
	embedded: Vec<Embed>,
}

impl Properties {
	pub fn attributes(&self) -> &[Property<Value>] {
		&self.attributes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn curies(&self) -> &[Curie] {
		&self.curies
	}

	pub fn embedded(&self) -> &[Embed] {
		&self.embedded
	}

	fn add_attribute(&mut self, attribute: Property<Value>) {
		self.attributes.push(attribute);
	}

	/// `self` and replace-flagged links drop earlier links with the same
	/// relation; any other duplicate is kept and the last one rendered wins.
	fn add_link(&mut self, link: Link) {
		if link.overrides_earlier() {
			self.links.retain(|existing| existing.rel() != link.rel());
		}
		self.links.push(link);
	}

	fn add_curie(&mut self, curie: Curie) {
		self.curies.push(curie);
	}

	fn add_embed(&mut self, embed: Embed) {
		self.embedded.push(embed);
	}

	fn validate(&self, owner: &str) -> HalResult<()> {
		if let Some(link) = self.links.iter().find(|l| !l.property().has_explicit_value()) {
			return Err(HalError::InvalidDeclaration(format!(
				"link '{}' in {} needs an href or a rule",
				link.rel(),
				owner
			)));
		}
		if let Some(curie) = self.curies.iter().find(|c| !c.property().has_explicit_value()) {
			return Err(HalError::InvalidDeclaration(format!(
				"curie '{}' in {} needs an href or a rule",
				curie.name(),
				owner
			)));
		}
		Ok(())
	}
}

impl fmt::Debug for Properties {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Properties")
			.field(
				"attributes",
				&self.attributes.iter().map(|a| a.name()).collect::<Vec<_>>(),
			)
			.field("links", &self.links.iter().map(|l| l.rel()).collect::<Vec<_>>())
			.field("curies", &self.curies.iter().map(|c| c.name()).collect::<Vec<_>>())
			.field(
				"embedded",
				&self.embedded.iter().map(|e| e.name()).collect::<Vec<_>>(),
			)
			.finish()
	}
}

/// How a presenter renders a list of its model.
///
/// The declarations here apply to the collection as a whole; items are
/// rendered with the presenter's own declarations under
/// `_embedded[name]`.
#[derive(Clone, Debug)]
pub struct CollectionSpec {
	name: String,
	properties: Properties,
}

impl CollectionSpec {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			properties: Properties::default(),
		}
	}

	pub fn attribute(mut self, attribute: Property<Value>) -> Self {
		self.properties.add_attribute(attribute);
		self
	}

	pub fn link(mut self, link: Link) -> Self {
		self.properties.add_link(link);
		self
	}

	pub fn curie(mut self, curie: Curie) -> Self {
		self.properties.add_curie(curie);
		self
	}

	pub fn embed(mut self, embed: Embed) -> Self {
		self.properties.add_embed(embed);
		self
	}

	/// Key of the item array under `_embedded`.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn properties(&self) -> &Properties {
		&self.properties
	}
}

/// The model type a presenter is bound to.
#[derive(Clone, Copy)]
pub struct ModelBinding {
	type_id: TypeId,
	type_name: &'static str,
	construct: fn() -> Box<dyn Resource>,
}

fn construct_default<T: Resource + Default>() -> Box<dyn Resource> {
	Box::new(T::default())
}

impl ModelBinding {
	pub fn of<T: Resource + Default>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			construct: construct_default::<T>,
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// A fresh default instance of the model.
	pub fn instantiate(&self) -> Box<dyn Resource> {
		(self.construct)()
	}
}

impl fmt::Debug for ModelBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ModelBinding").field(&self.type_name).finish()
	}
}

/// A built presenter.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{CollectionSpec, Embed, Link, Presenter, Property, Resource};
/// use serde_json::Value;
///
/// #[derive(Default)]
/// struct Post;
/// impl Resource for Post {}
///
/// let base = Presenter::builder("PostPresenter")
///     .model::<Post>()
///     .attributes(["title", "body"])
///     .link(Link::new("self").rule(|_| Some("/posts/1".to_string())))
///     .embed(Embed::new("author"))
///     .collection(CollectionSpec::new("posts").link(Link::new("self").href("/posts")))
///     .build()
///     .unwrap();
///
/// let admin = Presenter::inherit("AdminPostPresenter", &base)
///     .attribute(Property::<Value>::new("draft_notes"))
///     .build()
///     .unwrap();
///
/// assert_eq!(admin.properties().attributes().len(), 3);
/// assert!(admin.can_serialize_collection());
/// assert_eq!(base.properties().attributes().len(), 2);
/// ```
pub struct Presenter {
	name: String,
	model: Option<ModelBinding>,
	properties: Properties,
	collection: Option<CollectionSpec>,
	policy: Option<Arc<dyn Policy>>,
	post_serialize: Option<PostSerializeHook>,
	profile: Option<Property<String>>,
	helpers: Option<Arc<dyn Any + Send + Sync>>,
}

impl Presenter {
	pub fn builder(name: impl Into<String>) -> PresenterBuilder {
		PresenterBuilder {
			name: name.into(),
			model: None,
			properties: Properties::default(),
			collection: None,
			policy: None,
			post_serialize: None,
			profile: None,
			helpers: None,
		}
	}

	/// Starts a child presenter from a copy of `parent`'s declarations.
	pub fn inherit(name: impl Into<String>, parent: &Presenter) -> PresenterBuilder {
		PresenterBuilder {
			name: name.into(),
			model: parent.model,
			properties: parent.properties.clone(),
			collection: parent.collection.clone(),
			policy: parent.policy.clone(),
			post_serialize: parent.post_serialize.clone(),
			profile: parent.profile.clone(),
			helpers: parent.helpers.clone(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn model(&self) -> Option<&ModelBinding> {
		self.model.as_ref()
	}

	pub fn properties(&self) -> &Properties {
		&self.properties
	}

	pub fn collection(&self) -> Option<&CollectionSpec> {
		self.collection.as_ref()
	}

	pub fn can_serialize_collection(&self) -> bool {
		self.collection.is_some()
	}

	pub fn policy(&self) -> Option<&dyn Policy> {
		self.policy.as_deref()
	}

	pub fn post_serialize_hook(&self) -> Option<&PostSerializeHook> {
		self.post_serialize.as_ref()
	}

	/// A rule context carrying this presenter's helpers.
	pub fn context<'a>(&'a self, subject: Subject<'a>, options: &'a Options) -> Context<'a> {
		Context::new(subject, options).with_helpers(self.helpers.as_deref())
	}

	/// The semantic profile URI, if one is declared.
	pub fn semantic_profile(&self, subject: Subject<'_>, options: &Options) -> HalResult<Option<String>> {
		match &self.profile {
			Some(profile) => profile.resolve(&self.context(subject, options)),
			None => Ok(None),
		}
	}
}

impl fmt::Debug for Presenter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Presenter")
			.field("name", &self.name)
			.field("model", &self.model)
			.field("properties", &self.properties)
			.field("collection", &self.collection.as_ref().map(|c| c.name()))
			.field("policy", &self.policy.is_some())
			.field("post_serialize", &self.post_serialize.is_some())
			.finish()
	}
}

/// Builder for [`Presenter`].
pub struct PresenterBuilder {
	name: String,
	model: Option<ModelBinding>,
	properties: Properties,
	collection: Option<CollectionSpec>,
	policy: Option<Arc<dyn Policy>>,
	post_serialize: Option<PostSerializeHook>,
	profile: Option<Property<String>>,
	helpers: Option<Arc<dyn Any + Send + Sync>>,
}

impl PresenterBuilder {
	/// Binds the presenter to model `T`, used for registry lookup and for
	/// constructing instances when parsing.
	pub fn model<T: Resource + Default>(mut self) -> Self {
		self.model = Some(ModelBinding::of::<T>());
		self
	}

	pub fn attribute(mut self, attribute: Property<Value>) -> Self {
		self.properties.add_attribute(attribute);
		self
	}

	/// Declares accessor attributes.
	pub fn attributes<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for name in names {
			self.properties.add_attribute(Property::new(name));
		}
		self
	}

	pub fn link(mut self, link: Link) -> Self {
		self.properties.add_link(link);
		self
	}

	pub fn curie(mut self, curie: Curie) -> Self {
		self.properties.add_curie(curie);
		self
	}

	pub fn embed(mut self, embed: Embed) -> Self {
		self.properties.add_embed(embed);
		self
	}

	pub fn collection(mut self, collection: CollectionSpec) -> Self {
		self.collection = Some(collection);
		self
	}

	pub fn policy<P: Policy + 'static>(mut self, policy: P) -> Self {
		self.policy = Some(Arc::new(policy));
		self
	}

	pub fn post_serialize<F>(mut self, hook: F) -> Self
	where
		F: Fn(&Context<'_>, &mut Map<String, Value>) + Send + Sync + 'static,
	{
		self.post_serialize = Some(Arc::new(hook));
		self
	}

	pub fn profile(mut self, profile: impl Into<String>) -> Self {
		self.profile = Some(Property::constant("profile", profile.into()));
		self
	}

	pub fn profile_rule<F>(mut self, rule: F) -> Self
	where
		F: Fn(&Context<'_>) -> Option<String> + Send + Sync + 'static,
	{
		self.profile = Some(Property::computed("profile", rule));
		self
	}

	/// A typed helper value rules can reach through [`Context::helpers`].
	pub fn helpers<H: Any + Send + Sync>(mut self, helpers: H) -> Self {
		self.helpers = Some(Arc::new(helpers));
		self
	}

	pub fn build(self) -> HalResult<Arc<Presenter>> {
		self.properties.validate(&self.name)?;
		if let Some(collection) = &self.collection {
			if collection.name.is_empty() {
				return Err(HalError::InvalidDeclaration(format!(
					"collection in {} needs a name",
					self.name
				)));
			}
			collection.properties.validate(&self.name)?;
		}

		Ok(Arc::new(Presenter {
			name: self.name,
			model: self.model,
			properties: self.properties,
			collection: self.collection,
			policy: self.policy,
			post_serialize: self.post_serialize,
			profile: self.profile,
			helpers: self.helpers,
		}))
	}
}
