//! # hal-presenter
//!
//! Declarative HAL+JSON presenters.
//!
//! A presenter declares, for one model type, the attributes, links, curies
//! and embedded resources of its HAL document, plus optional collection
//! rendering, a visibility policy and a post-serialize hook. The engine
//! renders models to documents with those declarations and parses
//! documents back into models.
//!
//! ## Crates
//!
//! - [`core`]: resources, properties, presenters, policies, registry, settings
//! - [`pagination`]: page cursors for collection links
//! - [`serializers`]: rendering and parsing
//!
//! ## Quick Example
//!
//! ```
//! use hal_presenter::prelude::*;
//! use serde_json::{Value, json};
//!
//! #[derive(Default)]
//! struct Post {
//!     id: u32,
//!     title: String,
//! }
//!
//! impl Resource for Post {
//!     fn attribute(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "title" => Some(json!(self.title)),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_attribute(&mut self, name: &str, value: Value) -> HalResult<()> {
//!         if name == "title" {
//!             self.title = serde_json::from_value(value)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let hal = Hal::new(HalSettings::default());
//! hal.register(
//!     Presenter::builder("PostPresenter")
//!         .model::<Post>()
//!         .attributes(["title"])
//!         .link(Link::new("self").rule(|ctx| {
//!             ctx.resource_as::<Post>().map(|post| format!("/posts/{}", post.id))
//!         }))
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let post = Post { id: 1, title: "Hello".to_string() };
//! let text = hal.render_one(&post, Options::new()).unwrap();
//! assert_eq!(text, r#"{"title":"Hello","_links":{"self":{"href":"/posts/1"}}}"#);
//!
//! let presenter = hal.registry().lookup(&post).unwrap();
//! let parsed: Post = hal.parse_one_as(&presenter, Some(text.as_str())).unwrap().unwrap();
//! assert_eq!(parsed.title, "Hello");
//! ```

pub use hal_presenter_core as core;
pub use hal_presenter_pagination as pagination;
pub use hal_presenter_serializers as serializers;

pub use hal_presenter_core::{
	CollectionSpec, Context, Curie, Embed, Embedded, HalError, HalResult, HalSettings, Link, Options,
	ParsedEmbed, Policy, PolicyContext, PolicyRules, Presenter, Property, Registry, Resource,
	ResourceCollection, Resources, RuleCategory, Subject,
};
pub use hal_presenter_pagination::{PageInfo, Paginated};
pub use hal_presenter_serializers::{Serializer, from_hal, from_hal_as, from_hal_into};

use std::sync::Arc;

/// A registry and settings pair, owning what a [`Serializer`] borrows.
///
/// Build one at startup, register presenters, then share it read-only.
#[derive(Debug, Default)]
pub struct Hal {
	registry: Registry,
	settings: HalSettings,
}

impl Hal {
	pub fn new(settings: HalSettings) -> Self {
		Self {
			registry: Registry::new(),
			settings,
		}
	}

	/// Settings from `HAL_BASE_HREF` and `HAL_PAGINATE`.
	pub fn from_env() -> HalResult<Self> {
		Ok(Self::new(HalSettings::from_env()?))
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	pub fn settings(&self) -> &HalSettings {
		&self.settings
	}

	pub fn register(&self, presenter: Arc<Presenter>) -> HalResult<()> {
		self.registry.register(presenter)
	}

	pub fn serializer(&self) -> Serializer<'_> {
		Serializer::new(&self.registry, &self.settings)
	}

	pub fn render_one(&self, resource: &dyn Resource, options: Options) -> HalResult<String> {
		self.serializer().render_one(resource, options)
	}

	pub fn render_many(&self, resources: &dyn ResourceCollection, options: Options) -> HalResult<String> {
		self.serializer().render_many(resources, options)
	}

	pub fn parse_one(
		&self,
		presenter: &Presenter,
		payload: Option<&str>,
	) -> HalResult<Option<Box<dyn Resource>>> {
		from_hal(presenter, payload)
	}

	pub fn parse_one_as<T: Resource>(&self, presenter: &Presenter, payload: Option<&str>) -> HalResult<Option<T>> {
		from_hal_as(presenter, payload)
	}

	/// Parses onto `target`; returns `false` for an empty payload.
	pub fn parse_into(
		&self,
		presenter: &Presenter,
		payload: Option<&str>,
		target: &mut dyn Resource,
	) -> HalResult<bool> {
		from_hal_into(presenter, payload, target)
	}
}

/// Everything needed to declare presenters and render with them.
pub mod prelude {
	pub use crate::Hal;
	pub use hal_presenter_core::{
		CollectionSpec, Context, Curie, Embed, Embedded, HalError, HalResult, HalSettings, Link,
		Options, ParsedEmbed, Policy, PolicyContext, PolicyRules, Presenter, Property, Registry,
		Resource, ResourceCollection, Resources, RuleCategory, Subject,
	};
	pub use hal_presenter_pagination::{PageInfo, Paginated};
	pub use hal_presenter_serializers::{Serializer, from_hal, from_hal_as, from_hal_into};
}
