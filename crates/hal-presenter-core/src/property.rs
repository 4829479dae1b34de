//! Declared, resolvable values.
//!
//! A [`Property`] resolves its value from exactly one source, fixed when it
//! is declared: a constant, a computed rule, or the accessor on the subject
//! that carries the property's own name.

use crate::context::Context;
use crate::error::{HalError, HalResult};
use crate::options::Options;
use crate::resource::{Embedded, Subject};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A computed value rule.
pub type Rule<T> = Arc<dyn Fn(&Context<'_>) -> Option<T> + Send + Sync>;

/// Where a property gets its value.
#[derive(Clone)]
pub enum ValueSource<T> {
	Constant(T),
	Rule(Rule<T>),
	Accessor,
}

impl<T> fmt::Debug for ValueSource<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Constant(_) => f.write_str("Constant"),
			Self::Rule(_) => f.write_str("Rule"),
			Self::Accessor => f.write_str("Accessor"),
		}
	}
}

/// Values a property can read through a subject's accessor.
pub trait Resolvable: Clone + Send + Sync + 'static {
	fn from_subject(subject: Subject<'_>, name: &str) -> Option<Self>;
}

impl Resolvable for Value {
	fn from_subject(subject: Subject<'_>, name: &str) -> Option<Self> {
		subject.attribute(name)
	}
}

impl Resolvable for String {
	fn from_subject(subject: Subject<'_>, name: &str) -> Option<Self> {
		match subject.attribute(name)? {
			Value::Null => None,
			Value::String(s) => Some(s),
			other => Some(other.to_string()),
		}
	}
}

impl Resolvable for Embedded {
	fn from_subject(subject: Subject<'_>, name: &str) -> Option<Self> {
		subject.embedded(name)
	}
}

/// A named value with an optional embed depth limit.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{Options, Property, Resource, Subject};
/// use serde_json::{Value, json};
///
/// struct Item;
/// impl Resource for Item {
///     fn attribute(&self, name: &str) -> Option<Value> {
///         (name == "name").then(|| json!("car"))
///     }
/// }
///
/// let options = Options::new();
/// let from_object = Property::<Value>::new("name");
/// let constant = Property::constant("name", json!("bicycle"));
///
/// assert_eq!(from_object.value(Subject::Resource(&Item), &options).unwrap(), Some(json!("car")));
/// assert_eq!(constant.value(Subject::Absent, &options).unwrap(), Some(json!("bicycle")));
/// ```
#[derive(Clone)]
pub struct Property<T: Resolvable> {
	name: String,
	source: ValueSource<T>,
	embed_depth: Option<usize>,
}

impl<T: Resolvable> Property<T> {
	/// Declares a property read through the subject's `name` accessor.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			source: ValueSource::Accessor,
			embed_depth: None,
		}
	}

	pub fn constant(name: impl Into<String>, value: T) -> Self {
		Self::new(name).with_value(value)
	}

	pub fn computed<F>(name: impl Into<String>, rule: F) -> Self
	where
		F: Fn(&Context<'_>) -> Option<T> + Send + Sync + 'static,
	{
		Self::new(name).with_rule(rule)
	}

	pub fn with_value(mut self, value: T) -> Self {
		self.source = ValueSource::Constant(value);
		self
	}

	pub fn with_rule<F>(mut self, rule: F) -> Self
	where
		F: Fn(&Context<'_>) -> Option<T> + Send + Sync + 'static,
	{
		self.source = ValueSource::Rule(Arc::new(rule));
		self
	}

	/// Drops the property once the embed depth exceeds `depth`.
	pub fn embed_depth(mut self, depth: usize) -> Self {
		self.embed_depth = Some(depth);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn rename(&mut self, name: String) {
		self.name = name;
	}

	pub fn source(&self) -> &ValueSource<T> {
		&self.source
	}

	pub fn depth_limit(&self) -> Option<usize> {
		self.embed_depth
	}

	/// Whether the value comes from a constant or a rule rather than an accessor.
	pub fn has_explicit_value(&self) -> bool {
		!matches!(self.source, ValueSource::Accessor)
	}

	/// A property with depth limit `k` is visible while `depth <= k`.
	pub fn visible_at(&self, depth: usize) -> bool {
		self.embed_depth.is_none_or(|limit| depth <= limit)
	}

	/// Resolves against `subject` in a fresh context.
	pub fn value(&self, subject: Subject<'_>, options: &Options) -> HalResult<Option<T>> {
		self.resolve(&Context::new(subject, options))
	}

	pub fn resolve(&self, ctx: &Context<'_>) -> HalResult<Option<T>> {
		match &self.source {
			ValueSource::Constant(value) => Ok(Some(value.clone())),
			ValueSource::Rule(rule) => Ok(rule(ctx)),
			ValueSource::Accessor if ctx.subject().is_absent() => Err(HalError::NotResolvable {
				property: self.name.clone(),
			}),
			ValueSource::Accessor => Ok(T::from_subject(ctx.subject(), &self.name)),
		}
	}
}

impl<T: Resolvable> fmt::Debug for Property<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Property")
			.field("name", &self.name)
			.field("source", &self.source)
			.field("embed_depth", &self.embed_depth)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::Resource;
	use proptest::prelude::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	struct Item {
		name: String,
		color: String,
	}

	impl Resource for Item {
		fn attribute(&self, name: &str) -> Option<Value> {
			match name {
				"name" => Some(json!(self.name)),
				"color" => Some(json!(self.color)),
				_ => None,
			}
		}
	}

	#[fixture]
	fn item() -> Item {
		Item {
			name: "car".to_string(),
			color: "green".to_string(),
		}
	}

	fn color_of(ctx: &Context<'_>) -> Option<Value> {
		ctx.resource()?.attribute("color")
	}

	#[rstest]
	fn test_value_from_constant(item: Item) {
		let property = Property::constant("name", json!("bicycle"));
		let options = Options::new();
		assert_eq!(property.value(Subject::Absent, &options).unwrap(), Some(json!("bicycle")));
		assert_eq!(
			property.value(Subject::Resource(&item), &options).unwrap(),
			Some(json!("bicycle"))
		);
	}

	#[rstest]
	fn test_value_from_object(item: Item) {
		let property = Property::<Value>::new("name");
		let value = property.value(Subject::Resource(&item), &Options::new()).unwrap();
		assert_eq!(value, Some(json!("car")));
	}

	#[rstest]
	fn test_value_from_rule(item: Item) {
		let property = Property::computed("name", |_| Some(json!("bus")));
		let value = property.value(Subject::Resource(&item), &Options::new()).unwrap();
		assert_eq!(value, Some(json!("bus")));
	}

	#[rstest]
	fn test_rule_sees_resource(item: Item) {
		let property = Property::computed("name", color_of);
		let value = property.value(Subject::Resource(&item), &Options::new()).unwrap();
		assert_eq!(value, Some(json!("green")));
	}

	#[rstest]
	fn test_rule_sees_options(item: Item) {
		let property = Property::computed("name", |ctx| ctx.option("default_value").cloned());
		let options = Options::new().with("default_value", json!("blue"));
		let value = property.value(Subject::Resource(&item), &options).unwrap();
		assert_eq!(value, Some(json!("blue")));
	}

	#[rstest]
	fn test_resource_and_options_are_not_reused(item: Item) {
		let property = Property::computed("name", |ctx| {
			let name = ctx.resource().and_then(|r| r.attribute("name"));
			Some(json!([name, ctx.option("default_value")]))
		});
		let bus = Item {
			name: "bus".to_string(),
			color: "white".to_string(),
		};
		let blue = Options::new().with("default_value", json!("blue"));
		let black = Options::new().with("default_value", json!("black"));

		assert_eq!(
			property.value(Subject::Resource(&item), &blue).unwrap(),
			Some(json!(["car", "blue"]))
		);
		assert_eq!(
			property.value(Subject::Resource(&bus), &black).unwrap(),
			Some(json!(["bus", "black"]))
		);
		assert_eq!(
			property.value(Subject::Absent, &Options::new()).unwrap(),
			Some(json!([null, null]))
		);
	}

	#[rstest]
	fn test_accessor_without_subject_is_not_resolvable() {
		let property = Property::<Value>::new("name");
		let err = property.value(Subject::Absent, &Options::new()).unwrap_err();
		assert!(matches!(err, HalError::NotResolvable { property } if property == "name"));
	}

	#[rstest]
	fn test_string_accessor_skips_null() {
		struct Nullable;
		impl Resource for Nullable {
			fn attribute(&self, _name: &str) -> Option<Value> {
				Some(Value::Null)
			}
		}
		let property = Property::<String>::new("href");
		assert_eq!(property.value(Subject::Resource(&Nullable), &Options::new()).unwrap(), None);
	}

	#[rstest]
	#[case(None, 0, true)]
	#[case(None, 9, true)]
	#[case(Some(0), 0, true)]
	#[case(Some(0), 1, false)]
	#[case(Some(2), 2, true)]
	#[case(Some(2), 3, false)]
	fn test_visible_at(#[case] limit: Option<usize>, #[case] depth: usize, #[case] visible: bool) {
		let mut property = Property::<Value>::new("p");
		if let Some(limit) = limit {
			property = property.embed_depth(limit);
		}
		assert_eq!(property.visible_at(depth), visible);
	}

	proptest! {
		#[test]
		fn prop_constant_ignores_subject(constant in ".*", name in ".*", color in ".*") {
			let property = Property::constant("p", json!(constant));
			let item = Item { name, color };
			let options = Options::new().with("noise", json!(1));
			let value = property.value(Subject::Resource(&item), &options).unwrap();
			prop_assert_eq!(value, Some(json!(constant)));
		}

		#[test]
		fn prop_depth_limit(limit in 0usize..8, depth in 0usize..16) {
			let property = Property::<Value>::new("p").embed_depth(limit);
			prop_assert_eq!(property.visible_at(depth), depth <= limit);
		}

		#[test]
		fn prop_resolutions_do_not_leak(first in "[a-z]{1,8}", second in "[a-z]{1,8}") {
			let property = Property::computed("p", |ctx| {
				Some(json!([ctx.resource().and_then(|r| r.attribute("name")), ctx.option("tag")]))
			});
			let a = Item { name: first.clone(), color: String::new() };
			let b = Item { name: second.clone(), color: String::new() };
			let va = property.value(Subject::Resource(&a), &Options::new().with("tag", json!(first.clone()))).unwrap();
			let vb = property.value(Subject::Resource(&b), &Options::new()).unwrap();
			prop_assert_eq!(va, Some(json!([first.clone(), first])));
			prop_assert_eq!(vb, Some(json!([second, null])));
		}
	}
}
