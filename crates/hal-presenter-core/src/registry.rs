//! Presenter registry.
//!
//! Maps model types to the presenters registered for them. A type may have
//! several presenters; lookups return the most recently registered first.

use crate::error::{HalError, HalResult};
use crate::presenter::Presenter;
use crate::resource::{Resource, type_id_of};
use parking_lot::RwLock;
use std::any::TypeId;
use std::sync::Arc;

struct RegistryEntry {
	type_id: TypeId,
	presenter: Arc<Presenter>,
}

/// Type to presenter mapping, populated at startup and read while rendering.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::{Presenter, Registry, Resource};
///
/// #[derive(Default)]
/// struct Post;
/// impl Resource for Post {}
///
/// let registry = Registry::new();
/// let presenter = Presenter::builder("PostPresenter").model::<Post>().build().unwrap();
/// registry.register(presenter).unwrap();
///
/// assert_eq!(registry.lookup(&Post).map(|p| p.name().to_string()), Some("PostPresenter".to_string()));
/// ```
#[derive(Default)]
pub struct Registry {
	entries: RwLock<Vec<RegistryEntry>>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `presenter` under its model type.
	pub fn register(&self, presenter: Arc<Presenter>) -> HalResult<()> {
		let model = presenter.model().copied().ok_or_else(|| {
			HalError::InvalidDeclaration(format!(
				"presenter {} has no model to register under",
				presenter.name()
			))
		})?;
		tracing::debug!(
			presenter = presenter.name(),
			model = model.type_name(),
			"registering presenter"
		);
		self.insert(model.type_id(), presenter);
		Ok(())
	}

	/// Registers `presenter` under `T`, whatever model it declares.
	pub fn register_for<T: Resource>(&self, presenter: Arc<Presenter>) {
		tracing::debug!(
			presenter = presenter.name(),
			model = std::any::type_name::<T>(),
			"registering presenter"
		);
		self.insert(TypeId::of::<T>(), presenter);
	}

	fn insert(&self, type_id: TypeId, presenter: Arc<Presenter>) {
		self.entries.write().push(RegistryEntry { type_id, presenter });
	}

	/// The most recently registered presenter for `resource`'s type.
	pub fn lookup(&self, resource: &dyn Resource) -> Option<Arc<Presenter>> {
		self.lookup_type(type_id_of(resource))
	}

	pub fn lookup_type(&self, type_id: TypeId) -> Option<Arc<Presenter>> {
		self.entries
			.read()
			.iter()
			.rev()
			.find(|entry| entry.type_id == type_id)
			.map(|entry| Arc::clone(&entry.presenter))
	}

	/// Every presenter for `type_id`, most recent first.
	pub fn lookup_all(&self, type_id: TypeId) -> Vec<Arc<Presenter>> {
		self.entries
			.read()
			.iter()
			.rev()
			.filter(|entry| entry.type_id == type_id)
			.map(|entry| Arc::clone(&entry.presenter))
			.collect()
	}

	/// The most recent presenter for `type_id` that declares a collection.
	pub fn lookup_collection_capable(&self, type_id: TypeId) -> Option<Arc<Presenter>> {
		self.entries
			.read()
			.iter()
			.rev()
			.find(|entry| entry.type_id == type_id && entry.presenter.can_serialize_collection())
			.map(|entry| Arc::clone(&entry.presenter))
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let entries = self.entries.read();
		f.debug_list()
			.entries(entries.iter().map(|entry| entry.presenter.name()))
			.finish()
	}
}
