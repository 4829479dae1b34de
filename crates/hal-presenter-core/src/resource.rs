//! Domain values as seen by presenters.
//!
//! A [`Resource`] exposes named attributes and embedded relations to the
//! serializer and accepts them back from the deserializer. A
//! [`ResourceCollection`] is a list rendered as a whole, optionally carrying
//! page metadata.

use crate::error::{HalError, HalResult};
use hal_presenter_pagination::{PageInfo, Paginated};
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erasure helpers implemented for every `Any + Send + Sync` type.
///
/// Call these through `&dyn Resource` (or `&**arc`), never on a smart
/// pointer directly, or the pointer type itself is what gets erased.
pub trait AsAny: Any + Send + Sync {
	fn as_any(&self) -> &dyn Any;

	fn into_any(self: Box<Self>) -> Box<dyn Any>;

	fn resource_type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}

	fn resource_type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}
}

/// A domain object that can be rendered to and parsed from HAL.
///
/// Every method has a default, so a read-only model only needs
/// [`attribute`](Resource::attribute) (and [`embedded`](Resource::embedded)
/// if it has relations).
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{HalResult, Resource};
/// use serde_json::{Value, json};
///
/// #[derive(Default)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Resource for Tag {
///     fn attribute(&self, name: &str) -> Option<Value> {
///         match name {
///             "label" => Some(json!(self.label)),
///             _ => None,
///         }
///     }
///
///     fn set_attribute(&mut self, name: &str, value: Value) -> HalResult<()> {
///         if name == "label" {
///             self.label = serde_json::from_value(value)?;
///         }
///         Ok(())
///     }
/// }
///
/// let mut tag = Tag::default();
/// tag.set_attribute("label", json!("rust")).unwrap();
/// assert_eq!(tag.attribute("label"), Some(json!("rust")));
/// ```
pub trait Resource: AsAny {
	/// Reads the attribute accessor `name`.
	fn attribute(&self, _name: &str) -> Option<Value> {
		None
	}

	/// Reads the embedded relation accessor `name`.
	fn embedded(&self, _name: &str) -> Option<Embedded> {
		None
	}

	/// Assigns a parsed attribute. Unknown names are ignored by default.
	fn set_attribute(&mut self, _name: &str, _value: Value) -> HalResult<()> {
		Ok(())
	}

	/// Existing nested value for `name`, mutated in place when parsing a
	/// single embedded object into an existing graph.
	fn embedded_mut(&mut self, _name: &str) -> Option<&mut dyn Resource> {
		None
	}

	/// Assigns freshly parsed embedded values.
	fn set_embedded(&mut self, _name: &str, _value: ParsedEmbed) -> HalResult<()> {
		Ok(())
	}
}

/// The concrete type id of a resource behind a trait object.
pub fn type_id_of(resource: &dyn Resource) -> TypeId {
	resource.as_any().type_id()
}

pub fn type_name_of(resource: &dyn Resource) -> &'static str {
	resource.resource_type_name()
}

/// Downcasts a boxed resource into its concrete model type.
pub fn downcast_resource<T: Resource>(resource: Box<dyn Resource>) -> HalResult<T> {
	resource
		.into_any()
		.downcast::<T>()
		.map(|boxed| *boxed)
		.map_err(|_| HalError::TypeMismatch {
			expected: std::any::type_name::<T>(),
		})
}

/// A resolved embedded value: one resource or an ordered sequence.
#[derive(Clone)]
pub enum Embedded {
	One(Arc<dyn Resource>),
	Many(Vec<Arc<dyn Resource>>),
}

impl Embedded {
	pub fn one<R: Resource>(resource: R) -> Self {
		Self::One(Arc::new(resource))
	}

	pub fn many<R, I>(resources: I) -> Self
	where
		R: Resource,
		I: IntoIterator<Item = R>,
	{
		Self::Many(
			resources
				.into_iter()
				.map(|resource| Arc::new(resource) as Arc<dyn Resource>)
				.collect(),
		)
	}

	pub fn is_many(&self) -> bool {
		matches!(self, Self::Many(_))
	}
}

impl fmt::Debug for Embedded {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::One(resource) => f
				.debug_tuple("One")
				.field(&type_name_of(resource.as_ref()))
				.finish(),
			Self::Many(resources) => f
				.debug_tuple("Many")
				.field(
					&resources
						.iter()
						.map(|resource| type_name_of(resource.as_ref()))
						.collect::<Vec<_>>(),
				)
				.finish(),
		}
	}
}

/// Freshly constructed nested instances produced while parsing.
pub enum ParsedEmbed {
	One(Box<dyn Resource>),
	Many(Vec<Box<dyn Resource>>),
}

impl ParsedEmbed {
	pub fn into_one<T: Resource>(self) -> HalResult<T> {
		match self {
			Self::One(resource) => downcast_resource(resource),
			Self::Many(_) => Err(HalError::TypeMismatch {
				expected: "a single embedded resource",
			}),
		}
	}

	pub fn into_many<T: Resource>(self) -> HalResult<Vec<T>> {
		match self {
			Self::Many(resources) => resources.into_iter().map(downcast_resource::<T>).collect(),
			Self::One(_) => Err(HalError::TypeMismatch {
				expected: "a sequence of embedded resources",
			}),
		}
	}

	pub fn len(&self) -> usize {
		match self {
			Self::One(_) => 1,
			Self::Many(resources) => resources.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Debug for ParsedEmbed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::One(resource) => f
				.debug_tuple("One")
				.field(&type_name_of(resource.as_ref()))
				.finish(),
			Self::Many(resources) => f.debug_tuple("Many").field(&resources.len()).finish(),
		}
	}
}

/// A list of resources rendered as one collection document.
pub trait ResourceCollection: Send + Sync {
	fn resources(&self) -> Vec<&dyn Resource>;

	/// Collection-level attribute accessor.
	fn attribute(&self, _name: &str) -> Option<Value> {
		None
	}

	/// Collection-level embedded accessor.
	fn embedded(&self, _name: &str) -> Option<Embedded> {
		None
	}

	/// Page metadata; `None` renders the collection unpaginated.
	fn pagination(&self) -> Option<&dyn Paginated> {
		None
	}
}

impl<T: Resource> ResourceCollection for Vec<T> {
	fn resources(&self) -> Vec<&dyn Resource> {
		self.iter().map(|resource| resource as &dyn Resource).collect()
	}
}

/// Shared resources with optional page metadata and collection-level
/// attributes.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{Resource, ResourceCollection, Resources};
/// use hal_presenter_pagination::PageInfo;
/// use serde_json::json;
///
/// struct Item;
/// impl Resource for Item {}
///
/// let page = Resources::new()
///     .push(Item)
///     .push(Item)
///     .with_attribute("total", json!(42))
///     .with_page(PageInfo::new(1, 2).with_next(2));
///
/// assert_eq!(page.resources().len(), 2);
/// assert_eq!(page.attribute("total"), Some(json!(42)));
/// assert!(page.pagination().is_some());
/// ```
#[derive(Clone, Default)]
pub struct Resources {
	items: Vec<Arc<dyn Resource>>,
	attributes: Map<String, Value>,
	page: Option<PageInfo>,
}

impl Resources {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_shared(items: Vec<Arc<dyn Resource>>) -> Self {
		Self {
			items,
			..Self::default()
		}
	}

	pub fn push<R: Resource>(mut self, resource: R) -> Self {
		self.items.push(Arc::new(resource));
		self
	}

	pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
		self.attributes.insert(name.into(), value);
		self
	}

	pub fn with_page(mut self, page: PageInfo) -> Self {
		self.page = Some(page);
		self
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

impl ResourceCollection for Resources {
	fn resources(&self) -> Vec<&dyn Resource> {
		self.items.iter().map(|resource| resource.as_ref()).collect()
	}

	fn attribute(&self, name: &str) -> Option<Value> {
		self.attributes.get(name).cloned()
	}

	fn pagination(&self) -> Option<&dyn Paginated> {
		self.page.as_ref().map(|page| page as &dyn Paginated)
	}
}

impl Paginated for Resources {
	fn current_page(&self) -> Option<u64> {
		self.page.as_ref()?.current_page()
	}

	fn prev_page(&self) -> Option<u64> {
		self.page.as_ref()?.prev_page()
	}

	fn next_page(&self) -> Option<u64> {
		self.page.as_ref()?.next_page()
	}

	fn per_page(&self) -> Option<u64> {
		self.page.as_ref()?.per_page()
	}
}

/// What a property is resolved against.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
	Absent,
	Resource(&'a dyn Resource),
	Collection(&'a dyn ResourceCollection),
}

impl<'a> Subject<'a> {
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::Absent)
	}

	pub fn resource(&self) -> Option<&'a dyn Resource> {
		match self {
			Self::Resource(resource) => Some(*resource),
			_ => None,
		}
	}

	pub fn collection(&self) -> Option<&'a dyn ResourceCollection> {
		match self {
			Self::Collection(collection) => Some(*collection),
			_ => None,
		}
	}

	pub fn attribute(&self, name: &str) -> Option<Value> {
		match self {
			Self::Absent => None,
			Self::Resource(resource) => resource.attribute(name),
			Self::Collection(collection) => collection.attribute(name),
		}
	}

	pub fn embedded(&self, name: &str) -> Option<Embedded> {
		match self {
			Self::Absent => None,
			Self::Resource(resource) => resource.embedded(name),
			Self::Collection(collection) => collection.embedded(name),
		}
	}
}

impl<'a> From<&'a dyn Resource> for Subject<'a> {
	fn from(resource: &'a dyn Resource) -> Self {
		Self::Resource(resource)
	}
}

impl<'a> From<&'a dyn ResourceCollection> for Subject<'a> {
	fn from(collection: &'a dyn ResourceCollection) -> Self {
		Self::Collection(collection)
	}
}

impl fmt::Debug for Subject<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Absent => f.write_str("Absent"),
			Self::Resource(resource) => f
				.debug_tuple("Resource")
				.field(&type_name_of(*resource))
				.finish(),
			Self::Collection(collection) => f
				.debug_tuple("Collection")
				.field(&collection.resources().len())
				.finish(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[derive(Debug, Default, PartialEq)]
	struct Item {
		name: String,
	}

	impl Resource for Item {
		fn attribute(&self, name: &str) -> Option<Value> {
			(name == "name").then(|| json!(self.name))
		}
	}

	#[derive(Default)]
	struct Other;

	impl Resource for Other {}

	#[rstest]
	fn test_type_id_through_trait_object() {
		let item = Item::default();
		let shared: Arc<dyn Resource> = Arc::new(Item::default());
		assert_eq!(type_id_of(&item), TypeId::of::<Item>());
		assert_eq!(type_id_of(shared.as_ref()), TypeId::of::<Item>());
		assert!(type_name_of(&item).ends_with("Item"));
	}

	#[rstest]
	fn test_parsed_embed_downcast() {
		let one = ParsedEmbed::One(Box::new(Item {
			name: "a".to_string(),
		}));
		assert_eq!(
			one.into_one::<Item>().unwrap(),
			Item {
				name: "a".to_string()
			}
		);

		let many = ParsedEmbed::Many(vec![Box::new(Item::default()), Box::new(Item::default())]);
		assert_eq!(many.into_many::<Item>().unwrap().len(), 2);
	}

	#[rstest]
	fn test_parsed_embed_mismatch() {
		let wrong = ParsedEmbed::One(Box::new(Other));
		assert!(matches!(
			wrong.into_one::<Item>(),
			Err(HalError::TypeMismatch { .. })
		));
		let shape = ParsedEmbed::Many(vec![]);
		assert!(shape.into_one::<Item>().is_err());
	}

	#[rstest]
	fn test_subject_dispatch() {
		let item = Item {
			name: "car".to_string(),
		};
		let items = vec![Item::default(), Item::default()];
		let collection = Resources::new().with_attribute("name", json!("list"));

		assert_eq!(Subject::from(&item as &dyn Resource).attribute("name"), Some(json!("car")));
		assert_eq!(
			Subject::Collection(&collection).attribute("name"),
			Some(json!("list"))
		);
		assert_eq!(Subject::Collection(&items).attribute("name"), None);
		assert_eq!(Subject::Absent.attribute("name"), None);
		assert!(Subject::Absent.is_absent());
	}

	#[rstest]
	fn test_vec_collection_is_unpaginated() {
		let items = vec![Item::default()];
		assert_eq!(items.resources().len(), 1);
		assert!(items.pagination().is_none());
	}
}
