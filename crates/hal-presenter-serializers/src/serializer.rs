//! Rendering resources and collections to HAL documents.
//!
//! A single resource renders as its attributes in declaration order,
//! followed by `_links` (with a `curies` array when any resolve) and
//! `_embedded`, then the presenter's post-serialize hook. A collection
//! renders its collection-level declarations against the collection as a
//! whole and lists each item's document under `_embedded[<name>]`.
//!
//! Embedding descends one depth level. A declaration whose embed depth
//! limit is `k` is rendered while the current depth is at most `k`.

use hal_presenter_core::{
	BoundPolicy, Context, Curie, Embed, Embedded, HalError, HalResult, HalSettings, Link, Options,
	Presenter, Property, Registry, Resource, ResourceCollection, Resources, Subject, type_id_of,
	type_name_of,
};
use hal_presenter_pagination::paginate;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Renders resources with presenters from a [`Registry`].
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{HalSettings, Link, Options, Presenter, Registry, Resource};
/// use hal_presenter_serializers::Serializer;
/// use serde_json::{Value, json};
///
/// #[derive(Default)]
/// struct Post {
///     title: String,
/// }
///
/// impl Resource for Post {
///     fn attribute(&self, name: &str) -> Option<Value> {
///         (name == "title").then(|| json!(self.title))
///     }
/// }
///
/// let registry = Registry::new();
/// registry
///     .register(
///         Presenter::builder("PostPresenter")
///             .model::<Post>()
///             .attributes(["title"])
///             .link(Link::new("self").href("/posts/1"))
///             .build()
///             .unwrap(),
///     )
///     .unwrap();
///
/// let settings = HalSettings::default().with_base_href("https://api.example.com");
/// let serializer = Serializer::new(&registry, &settings);
/// let post = Post { title: "Hello".to_string() };
///
/// assert_eq!(
///     serializer.render_one(&post, Options::new()).unwrap(),
///     r#"{"title":"Hello","_links":{"self":{"href":"https://api.example.com/posts/1"}}}"#
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
	registry: &'a Registry,
	settings: &'a HalSettings,
}

impl<'a> Serializer<'a> {
	pub fn new(registry: &'a Registry, settings: &'a HalSettings) -> Self {
		Self { registry, settings }
	}

	pub fn registry(&self) -> &'a Registry {
		self.registry
	}

	pub fn settings(&self) -> &'a HalSettings {
		self.settings
	}

	/// Renders `resource` to JSON text.
	pub fn render_one(&self, resource: &dyn Resource, options: Options) -> HalResult<String> {
		self.to_hal(Some(resource), options)
	}

	/// Renders a collection to JSON text.
	pub fn render_many(&self, resources: &dyn ResourceCollection, options: Options) -> HalResult<String> {
		self.to_collection(Some(resources), options)
	}

	pub fn to_hal(&self, resource: Option<&dyn Resource>, options: Options) -> HalResult<String> {
		Ok(serde_json::to_string(&self.to_value(resource, options)?)?)
	}

	pub fn to_collection(
		&self,
		resources: Option<&dyn ResourceCollection>,
		options: Options,
	) -> HalResult<String> {
		Ok(serde_json::to_string(&self.collection_to_value(resources, options)?)?)
	}

	/// Renders `resource` with the presenter override in `options`, or the
	/// most recently registered presenter for its type.
	pub fn to_value(&self, resource: Option<&dyn Resource>, mut options: Options) -> HalResult<Value> {
		let resource = resource.ok_or(HalError::MissingResource)?;
		let presenter = match options.take_presenter() {
			Some(presenter) => presenter,
			None => self.lookup(resource)?,
		};
		tracing::debug!(
			presenter = presenter.name(),
			resource = type_name_of(resource),
			"rendering resource"
		);
		Ok(Value::Object(self.render_resource(&presenter, resource, &options)?))
	}

	/// Renders a collection with the presenter override in `options`, or the
	/// most recent collection-capable presenter for the first item's type.
	pub fn collection_to_value(
		&self,
		resources: Option<&dyn ResourceCollection>,
		mut options: Options,
	) -> HalResult<Value> {
		let resources = resources.ok_or(HalError::MissingResource)?;
		let presenter = match options.take_presenter() {
			Some(presenter) => presenter,
			None => self.lookup_collection(resources)?,
		};
		let paginate = options.paginate().unwrap_or(self.settings.paginate);
		let options = options.with_paginate(paginate);
		tracing::debug!(
			presenter = presenter.name(),
			items = resources.resources().len(),
			paginate,
			"rendering collection"
		);
		Ok(Value::Object(self.render_collection(&presenter, resources, &options)?))
	}

	/// Renders one resource document.
	pub fn render_resource(
		&self,
		presenter: &Presenter,
		resource: &dyn Resource,
		options: &Options,
	) -> HalResult<Map<String, Value>> {
		let subject = Subject::Resource(resource);
		let ctx = presenter.context(subject, options);
		let policy = presenter
			.policy()
			.map(|policy| BoundPolicy::new(policy, subject, options));
		let properties = presenter.properties();

		let mut document = Map::new();
		self.render_attributes(properties.attributes(), &ctx, policy.as_ref(), &mut document)?;

		let links = self.render_links(properties.links(), properties.curies(), &ctx, policy.as_ref())?;
		if !links.is_empty() {
			document.insert("_links".to_string(), Value::Object(links));
		}

		let embedded = self.render_embedded(properties.embedded(), &ctx, policy.as_ref())?;
		if !embedded.is_empty() {
			document.insert("_embedded".to_string(), Value::Object(embedded));
		}

		if let Some(hook) = presenter.post_serialize_hook() {
			hook(&ctx, &mut document);
		}
		Ok(document)
	}

	/// Renders a collection document.
	///
	/// Links are paginated when the options ask for it and the collection
	/// exposes page metadata.
	pub fn render_collection(
		&self,
		presenter: &Presenter,
		resources: &dyn ResourceCollection,
		options: &Options,
	) -> HalResult<Map<String, Value>> {
		let spec = presenter
			.collection()
			.ok_or_else(|| HalError::CollectionNotSupported {
				presenter: presenter.name().to_string(),
			})?;
		let subject = Subject::Collection(resources);
		let ctx = presenter.context(subject, options);
		let policy = presenter
			.policy()
			.map(|policy| BoundPolicy::new(policy, subject, options));
		let properties = spec.properties();

		let mut document = Map::new();
		self.render_attributes(properties.attributes(), &ctx, policy.as_ref(), &mut document)?;

		let mut links = self.render_links(properties.links(), properties.curies(), &ctx, policy.as_ref())?;
		if options.paginate() == Some(true) {
			if let Some(page) = resources.pagination() {
				paginate(&mut links, page);
			}
		}
		if !links.is_empty() {
			document.insert("_links".to_string(), Value::Object(links));
		}

		let mut embedded = self.render_embedded(properties.embedded(), &ctx, policy.as_ref())?;
		let items = resources
			.resources()
			.into_iter()
			.map(|resource| self.render_resource(presenter, resource, options).map(Value::Object))
			.collect::<HalResult<Vec<_>>>()?;
		embedded.insert(spec.name().to_string(), Value::Array(items));
		document.insert("_embedded".to_string(), Value::Object(embedded));
		Ok(document)
	}

	fn render_attributes(
		&self,
		attributes: &[Property<Value>],
		ctx: &Context<'_>,
		policy: Option<&BoundPolicy<'_>>,
		document: &mut Map<String, Value>,
	) -> HalResult<()> {
		for attribute in attributes {
			if !attribute.visible_at(ctx.depth()) {
				tracing::trace!(attribute = attribute.name(), depth = ctx.depth(), "beyond embed depth");
				continue;
			}
			if policy.is_some_and(|policy| !policy.attribute(attribute.name())) {
				tracing::trace!(attribute = attribute.name(), "hidden by policy");
				continue;
			}
			let value = attribute.resolve(ctx)?.unwrap_or(Value::Null);
			document.insert(attribute.name().to_string(), value);
		}
		Ok(())
	}

	fn render_links(
		&self,
		links: &[Link],
		curies: &[Curie],
		ctx: &Context<'_>,
		policy: Option<&BoundPolicy<'_>>,
	) -> HalResult<Map<String, Value>> {
		let mut rendered = Map::new();
		for link in links {
			if !link.property().visible_at(ctx.depth()) {
				tracing::trace!(rel = link.rel(), depth = ctx.depth(), "beyond embed depth");
				continue;
			}
			if policy.is_some_and(|policy| !policy.link(link.rel())) {
				tracing::trace!(rel = link.rel(), "hidden by policy");
				continue;
			}
			if let Some(object) = link.render_in(ctx, self.settings)? {
				rendered.insert(link.rel().to_string(), Value::Object(object));
			}
		}

		let mut namespaces = Vec::new();
		for curie in curies {
			if !curie.property().visible_at(ctx.depth()) {
				continue;
			}
			if let Some(object) = curie.render_in(ctx, self.settings)? {
				namespaces.push(object);
			}
		}
		if !namespaces.is_empty() {
			rendered.insert("curies".to_string(), Value::Array(namespaces));
		}
		Ok(rendered)
	}

	fn render_embedded(
		&self,
		embeds: &[Embed],
		ctx: &Context<'_>,
		policy: Option<&BoundPolicy<'_>>,
	) -> HalResult<Map<String, Value>> {
		let mut rendered = Map::new();
		for embed in embeds {
			if !embed.property().visible_at(ctx.depth()) {
				tracing::trace!(embed = embed.name(), depth = ctx.depth(), "beyond embed depth");
				continue;
			}
			if policy.is_some_and(|policy| !policy.embed(embed.name())) {
				tracing::trace!(embed = embed.name(), "hidden by policy");
				continue;
			}
			let Some(value) = embed.resolve(ctx)? else {
				continue;
			};

			let nested = ctx.options().descend();
			tracing::trace!(embed = embed.name(), depth = nested.depth(), "descending");
			let document = match value {
				Embedded::One(resource) => {
					let presenter = self.nested_presenter(embed, resource.as_ref())?;
					Value::Object(self.render_resource(&presenter, resource.as_ref(), &nested)?)
				}
				Embedded::Many(resources) => self.render_embedded_many(embed, resources, &nested)?,
			};
			rendered.insert(embed.name().to_string(), document);
		}
		Ok(rendered)
	}

	/// A sequence goes through the collection renderer when its presenter
	/// declares a collection, and item by item otherwise.
	fn render_embedded_many(
		&self,
		embed: &Embed,
		resources: Vec<Arc<dyn Resource>>,
		options: &Options,
	) -> HalResult<Value> {
		let presenter = match (embed.nested_presenter(), resources.first()) {
			(Some(presenter), _) => Arc::clone(presenter),
			(None, Some(first)) => self.lookup(first.as_ref())?,
			(None, None) => return Ok(Value::Array(Vec::new())),
		};

		if presenter.can_serialize_collection() {
			let collection = Resources::from_shared(resources);
			return Ok(Value::Object(self.render_collection(&presenter, &collection, options)?));
		}

		let items = resources
			.iter()
			.map(|resource| {
				let presenter = self.nested_presenter(embed, resource.as_ref())?;
				self.render_resource(&presenter, resource.as_ref(), options)
					.map(Value::Object)
			})
			.collect::<HalResult<Vec<_>>>()?;
		Ok(Value::Array(items))
	}

	fn nested_presenter(&self, embed: &Embed, resource: &dyn Resource) -> HalResult<Arc<Presenter>> {
		match embed.nested_presenter() {
			Some(presenter) => Ok(Arc::clone(presenter)),
			None => self.lookup(resource),
		}
	}

	fn lookup(&self, resource: &dyn Resource) -> HalResult<Arc<Presenter>> {
		self.registry.lookup(resource).ok_or_else(|| {
			let type_name = type_name_of(resource);
			tracing::warn!(resource = type_name, "no presenter registered");
			HalError::no_presenter(type_name)
		})
	}

	fn lookup_collection(&self, resources: &dyn ResourceCollection) -> HalResult<Arc<Presenter>> {
		let items = resources.resources();
		let Some(first) = items.first() else {
			tracing::warn!("cannot look up a presenter for an empty collection");
			return Err(HalError::no_presenter("empty collection"));
		};
		let type_id = type_id_of(*first);
		if let Some(presenter) = self.registry.lookup_collection_capable(type_id) {
			return Ok(presenter);
		}
		match self.registry.lookup_type(type_id) {
			Some(presenter) => Err(HalError::CollectionNotSupported {
				presenter: presenter.name().to_string(),
			}),
			None => self.lookup(*first),
		}
	}
}
