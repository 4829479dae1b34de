//! Hyperlinks and curies.

use crate::context::Context;
use crate::error::HalResult;
use crate::property::Property;
use crate::settings::HalSettings;
use serde_json::{Map, Value, json};
use std::fmt;

/// Prefixes a root-relative href with `base`.
///
/// Absolute (`scheme://...`), scheme-relative (`//host/...`) and relative
/// hrefs pass through unchanged, as does everything when `base` is empty.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::links::rewrite_href;
///
/// assert_eq!(rewrite_href("https://api.example.com", "/posts/1"), "https://api.example.com/posts/1");
/// assert_eq!(rewrite_href("https://api.example.com", "http://other/x"), "http://other/x");
/// assert_eq!(rewrite_href("", "/posts/1"), "/posts/1");
/// ```
pub fn rewrite_href(base: &str, href: &str) -> String {
	if base.is_empty() || !href.starts_with('/') || href.starts_with("//") {
		return href.to_string();
	}
	format!("{}{}", base, href)
}

/// A hypermedia relation rendered under `_links`.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{HalSettings, Link, Options, Subject};
/// use serde_json::json;
///
/// let link = Link::new("comments")
///     .curie("blog")
///     .href("/posts/1/comments")
///     .title("Comments")
///     .templated(true);
///
/// assert_eq!(link.rel(), "blog:comments");
/// let rendered = link
///     .render(Subject::Absent, &Options::new(), &HalSettings::default())
///     .unwrap()
///     .unwrap();
/// assert_eq!(
///     serde_json::Value::Object(rendered),
///     json!({ "href": "/posts/1/comments", "title": "Comments", "templated": true })
/// );
/// ```
#[derive(Clone)]
pub struct Link {
	property: Property<String>,
	media_type: Option<String>,
	deprecation: Option<String>,
	profile: Option<String>,
	title: Option<String>,
	templated: bool,
	replace_parent: bool,
}

impl Link {
	pub fn new(rel: impl Into<String>) -> Self {
		Self {
			property: Property::new(rel),
			media_type: None,
			deprecation: None,
			profile: None,
			title: None,
			templated: false,
			replace_parent: false,
		}
	}

	/// Fixed href.
	pub fn href(mut self, href: impl Into<String>) -> Self {
		self.property = self.property.with_value(href.into());
		self
	}

	/// Computed href; returning `None` omits the link.
	pub fn rule<F>(mut self, rule: F) -> Self
	where
		F: Fn(&Context<'_>) -> Option<String> + Send + Sync + 'static,
	{
		self.property = self.property.with_rule(rule);
		self
	}

	/// Qualifies the relation with a curie prefix, giving `prefix:rel`.
	pub fn curie(mut self, prefix: impl AsRef<str>) -> Self {
		let prefix = prefix.as_ref();
		if !prefix.is_empty() {
			let rel = format!("{}:{}", prefix, self.property.name());
			self.property.rename(rel);
		}
		self
	}

	pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
		self.media_type = Some(media_type.into());
		self
	}

	pub fn deprecation(mut self, deprecation: impl Into<String>) -> Self {
		self.deprecation = Some(deprecation.into());
		self
	}

	pub fn profile(mut self, profile: impl Into<String>) -> Self {
		self.profile = Some(profile.into());
		self
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn templated(mut self, templated: bool) -> Self {
		self.templated = templated;
		self
	}

	/// Replaces a same-relation link inherited from a parent presenter.
	pub fn replace_parent(mut self) -> Self {
		self.replace_parent = true;
		self
	}

	pub fn embed_depth(mut self, depth: usize) -> Self {
		self.property = self.property.embed_depth(depth);
		self
	}

	pub fn rel(&self) -> &str {
		self.property.name()
	}

	pub fn property(&self) -> &Property<String> {
		&self.property
	}

	pub fn title_text(&self) -> Option<&str> {
		self.title.as_deref()
	}

	pub fn is_templated(&self) -> bool {
		self.templated
	}

	pub fn replaces_parent(&self) -> bool {
		self.replace_parent
	}

	/// Whether a declaration with this relation drops earlier same-relation links.
	pub fn overrides_earlier(&self) -> bool {
		self.replace_parent || self.rel() == "self"
	}

	/// Renders the link object, or `None` when the href resolves empty.
	pub fn render(
		&self,
		subject: crate::resource::Subject<'_>,
		options: &crate::options::Options,
		settings: &HalSettings,
	) -> HalResult<Option<Map<String, Value>>> {
		self.render_in(&Context::new(subject, options), settings)
	}

	pub fn render_in(
		&self,
		ctx: &Context<'_>,
		settings: &HalSettings,
	) -> HalResult<Option<Map<String, Value>>> {
		let Some(href) = self.property.resolve(ctx)?.filter(|href| !href.is_empty()) else {
			return Ok(None);
		};

		let mut link = Map::new();
		link.insert("href".to_string(), Value::String(settings.href(&href)));
		let extras = [
			("type", &self.media_type),
			("deprecation", &self.deprecation),
			("profile", &self.profile),
			("title", &self.title),
		];
		for (key, value) in extras {
			if let Some(value) = value {
				link.insert(key.to_string(), Value::String(value.clone()));
			}
		}
		if self.templated {
			link.insert("templated".to_string(), Value::Bool(true));
		}
		Ok(Some(link))
	}
}

impl fmt::Debug for Link {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Link")
			.field("rel", &self.rel())
			.field("source", self.property.source())
			.field("templated", &self.templated)
			.field("replace_parent", &self.replace_parent)
			.finish()
	}
}

/// A link-relation namespace prefix, rendered under `_links.curies`.
#[derive(Clone)]
pub struct Curie {
	property: Property<String>,
}

impl Curie {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			property: Property::new(name),
		}
	}

	pub fn href(mut self, href: impl Into<String>) -> Self {
		self.property = self.property.with_value(href.into());
		self
	}

	pub fn rule<F>(mut self, rule: F) -> Self
	where
		F: Fn(&Context<'_>) -> Option<String> + Send + Sync + 'static,
	{
		self.property = self.property.with_rule(rule);
		self
	}

	pub fn embed_depth(mut self, depth: usize) -> Self {
		self.property = self.property.embed_depth(depth);
		self
	}

	pub fn name(&self) -> &str {
		self.property.name()
	}

	pub fn property(&self) -> &Property<String> {
		&self.property
	}

	/// Renders `{name, href, templated: true}`, or `None` when the href is empty.
	pub fn render_in(&self, ctx: &Context<'_>, settings: &HalSettings) -> HalResult<Option<Value>> {
		let href = self.property.resolve(ctx)?.filter(|href| !href.is_empty());
		Ok(href.map(|href| {
			json!({
				"name": self.name(),
				"href": settings.href(&href),
				"templated": true,
			})
		}))
	}
}

impl fmt::Debug for Curie {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Curie")
			.field("name", &self.name())
			.field("source", self.property.source())
			.finish()
	}
}
