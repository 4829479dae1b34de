//! Parsing HAL documents back into models.
//!
//! Only declared attributes and embeds are read. Links, curies and unknown
//! keys carry no meaning here and are ignored.

use hal_presenter_core::{
	HalError, HalResult, ParsedEmbed, Presenter, Resource, downcast_resource, type_name_of,
};
use serde_json::{Map, Value};

/// Parses `payload` into a fresh instance of `presenter`'s model.
///
/// Returns `None` for an absent, blank, `null` or `{}` payload.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{HalResult, Presenter, Resource, type_name_of};
/// use hal_presenter_serializers::from_hal;
/// use serde_json::Value;
///
/// #[derive(Default)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Resource for Tag {
///     fn set_attribute(&mut self, name: &str, value: Value) -> HalResult<()> {
///         if name == "label" {
///             self.label = serde_json::from_value(value)?;
///         }
///         Ok(())
///     }
/// }
///
/// let presenter = Presenter::builder("TagPresenter")
///     .model::<Tag>()
///     .attributes(["label"])
///     .build()
///     .unwrap();
///
/// let tag = from_hal(&presenter, Some(r#"{"label":"rust"}"#)).unwrap().unwrap();
/// assert!(type_name_of(tag.as_ref()).ends_with("Tag"));
/// assert!(from_hal(&presenter, Some("{}")).unwrap().is_none());
/// assert!(from_hal(&presenter, None).unwrap().is_none());
/// ```
pub fn from_hal(presenter: &Presenter, payload: Option<&str>) -> HalResult<Option<Box<dyn Resource>>> {
	let Some(document) = decode(payload)? else {
		return Ok(None);
	};
	tracing::debug!(presenter = presenter.name(), "parsing document");
	build(presenter, &document).map(Some)
}

/// Parses `payload` and downcasts the result to the model type `T`.
pub fn from_hal_as<T: Resource>(presenter: &Presenter, payload: Option<&str>) -> HalResult<Option<T>> {
	from_hal(presenter, payload)?
		.map(downcast_resource::<T>)
		.transpose()
}

/// Parses `payload` onto an existing `target`, leaving attributes absent
/// from the document untouched. Returns `false` when the payload is empty.
pub fn from_hal_into(
	presenter: &Presenter,
	payload: Option<&str>,
	target: &mut dyn Resource,
) -> HalResult<bool> {
	let Some(document) = decode(payload)? else {
		return Ok(false);
	};
	tracing::debug!(
		presenter = presenter.name(),
		target = type_name_of(&*target),
		"parsing document into existing resource"
	);
	parse_into(presenter, &document, target)?;
	Ok(true)
}

/// Constructs a model instance from an already decoded document.
pub fn build(presenter: &Presenter, document: &Map<String, Value>) -> HalResult<Box<dyn Resource>> {
	let model = presenter.model().ok_or_else(|| {
		HalError::InvalidDeclaration(format!(
			"presenter {} has no model to construct",
			presenter.name()
		))
	})?;
	let mut instance = model.instantiate();
	parse_into(presenter, document, instance.as_mut())?;
	Ok(instance)
}

/// Assigns the declared attributes and embeds found in `document`.
pub fn parse_into(
	presenter: &Presenter,
	document: &Map<String, Value>,
	target: &mut dyn Resource,
) -> HalResult<()> {
	let properties = presenter.properties();
	for attribute in properties.attributes() {
		if let Some(value) = document.get(attribute.name()) {
			target.set_attribute(attribute.name(), value.clone())?;
		}
	}

	let Some(embedded) = document.get("_embedded").and_then(Value::as_object) else {
		return Ok(());
	};
	for embed in properties.embedded() {
		let Some(value) = embedded.get(embed.name()) else {
			continue;
		};
		let Some(nested) = embed.nested_presenter() else {
			tracing::debug!(embed = embed.name(), "no nested presenter, skipping");
			continue;
		};
		match value {
			Value::Array(items) => {
				let parsed = items
					.iter()
					.map(|item| build(nested, as_object(item)?))
					.collect::<HalResult<Vec<_>>>()?;
				target.set_embedded(embed.name(), ParsedEmbed::Many(parsed))?;
			}
			Value::Object(object) => {
				if let Some(existing) = target.embedded_mut(embed.name()) {
					parse_into(nested, object, existing)?;
				} else {
					let parsed = build(nested, object)?;
					target.set_embedded(embed.name(), ParsedEmbed::One(parsed))?;
				}
			}
			_ => {
				tracing::trace!(embed = embed.name(), "embedded value is not a document");
			}
		}
	}
	Ok(())
}

fn decode(payload: Option<&str>) -> HalResult<Option<Map<String, Value>>> {
	let Some(payload) = payload.filter(|p| !p.trim().is_empty()) else {
		return Ok(None);
	};
	match serde_json::from_str::<Value>(payload)? {
		Value::Null => Ok(None),
		Value::Object(document) if document.is_empty() => Ok(None),
		Value::Object(document) => Ok(Some(document)),
		_ => Err(HalError::TypeMismatch {
			expected: "a JSON object",
		}),
	}
}

fn as_object(value: &Value) -> HalResult<&Map<String, Value>> {
	value.as_object().ok_or(HalError::TypeMismatch {
		expected: "an embedded JSON object",
	})
}
