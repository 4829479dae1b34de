//! # hal-presenter-serializers
//!
//! Renders resources to HAL documents and parses them back.
//!
//! [`Serializer`] borrows a [`Registry`](hal_presenter_core::Registry) and
//! [`HalSettings`](hal_presenter_core::HalSettings) and produces either JSON
//! text or a `serde_json::Value`. The parse functions work from a presenter
//! directly, constructing instances of its declared model.

pub mod deserializer;
pub mod serializer;

pub use deserializer::{build, from_hal, from_hal_as, from_hal_into, parse_into};
pub use serializer::Serializer;
