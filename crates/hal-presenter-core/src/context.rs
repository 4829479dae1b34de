//! Evaluation context handed to computed rules.

use crate::options::Options;
use crate::resource::{Resource, ResourceCollection, Subject};
use serde_json::Value;
use std::any::Any;

/// The bindings a computed rule can see: the current subject, the options
/// bag, and the helper value its presenter declared.
///
/// A context is built for one resolution and never reused, so nothing one
/// rule evaluation sees can leak into the next.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{Context, Options, Resource, Subject};
/// use serde_json::{Value, json};
///
/// struct Item;
/// impl Resource for Item {
///     fn attribute(&self, name: &str) -> Option<Value> {
///         (name == "color").then(|| json!("green"))
///     }
/// }
///
/// let options = Options::new().with("fallback", json!("blue"));
/// let ctx = Context::new(Subject::Resource(&Item), &options);
/// assert!(ctx.resource_as::<Item>().is_some());
/// assert_eq!(ctx.option("fallback"), Some(&json!("blue")));
/// ```
#[derive(Clone, Copy)]
pub struct Context<'a> {
	subject: Subject<'a>,
	options: &'a Options,
	helpers: Option<&'a (dyn Any + Send + Sync)>,
}

impl<'a> Context<'a> {
	pub fn new(subject: Subject<'a>, options: &'a Options) -> Self {
		Self {
			subject,
			options,
			helpers: None,
		}
	}

	pub fn with_helpers(mut self, helpers: Option<&'a (dyn Any + Send + Sync)>) -> Self {
		self.helpers = helpers;
		self
	}

	pub fn subject(&self) -> Subject<'a> {
		self.subject
	}

	pub fn resource(&self) -> Option<&'a dyn Resource> {
		self.subject.resource()
	}

	/// The current resource downcast to its model type.
	pub fn resource_as<T: Resource>(&self) -> Option<&'a T> {
		self.resource()?.as_any().downcast_ref::<T>()
	}

	/// The current collection, when rendering collection-level properties.
	pub fn resources(&self) -> Option<&'a dyn ResourceCollection> {
		self.subject.collection()
	}

	pub fn options(&self) -> &'a Options {
		self.options
	}

	pub fn option(&self, key: &str) -> Option<&'a Value> {
		self.options.get(key)
	}

	pub fn current_user<U: Any>(&self) -> Option<&'a U> {
		self.options.current_user::<U>()
	}

	/// The presenter's declared helper value, if it has the requested type.
	pub fn helpers<H: Any>(&self) -> Option<&'a H> {
		self.helpers?.downcast_ref::<H>()
	}

	pub fn depth(&self) -> usize {
		self.options.depth()
	}
}
