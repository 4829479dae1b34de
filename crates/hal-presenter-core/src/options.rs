//! Per-call options bag.

use crate::presenter::Presenter;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Options passed through one render or parse call.
///
/// Recognized entries are typed fields: a presenter override, the viewer
/// handed to policies, and a pagination switch. Anything else goes into the
/// free-form extras, readable from computed rules. The embed depth is
/// managed by the serializer.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::Options;
/// use serde_json::json;
///
/// let options = Options::new()
///     .with("default_value", json!("blue"))
///     .with_paginate(true);
///
/// assert_eq!(options.get("default_value"), Some(&json!("blue")));
/// assert_eq!(options.paginate(), Some(true));
/// assert_eq!(options.depth(), 0);
/// ```
#[derive(Clone, Default)]
pub struct Options {
	presenter: Option<Arc<Presenter>>,
	current_user: Option<Arc<dyn Any + Send + Sync>>,
	paginate: Option<bool>,
	depth: usize,
	extras: Arc<Map<String, Value>>,
}

impl Options {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bypasses registry lookup for the top-level resource.
	pub fn with_presenter(mut self, presenter: Arc<Presenter>) -> Self {
		self.presenter = Some(presenter);
		self
	}

	/// Sets the viewer identity passed to policies.
	pub fn with_current_user<U: Any + Send + Sync>(mut self, user: U) -> Self {
		self.current_user = Some(Arc::new(user));
		self
	}

	pub fn with_paginate(mut self, paginate: bool) -> Self {
		self.paginate = Some(paginate);
		self
	}

	pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
		Arc::make_mut(&mut self.extras).insert(key.into(), value);
		self
	}

	pub fn presenter(&self) -> Option<&Arc<Presenter>> {
		self.presenter.as_ref()
	}

	/// Removes the presenter override so it does not leak into nested renders.
	pub fn take_presenter(&mut self) -> Option<Arc<Presenter>> {
		self.presenter.take()
	}

	pub fn current_user<U: Any>(&self) -> Option<&U> {
		self.current_user.as_deref()?.downcast_ref::<U>()
	}

	pub fn current_user_any(&self) -> Option<&(dyn Any + Send + Sync)> {
		self.current_user.as_deref()
	}

	pub fn paginate(&self) -> Option<bool> {
		self.paginate
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.extras.get(key)
	}

	pub fn extras(&self) -> &Map<String, Value> {
		&self.extras
	}

	/// Current embed depth; 0 for the top-level document.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Options for one embed level deeper.
	pub fn descend(&self) -> Self {
		let mut child = self.clone();
		child.depth += 1;
		child
	}
}

impl fmt::Debug for Options {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Options")
			.field("presenter", &self.presenter.as_ref().map(|p| p.name()))
			.field("current_user", &self.current_user.is_some())
			.field("paginate", &self.paginate)
			.field("depth", &self.depth)
			.field("extras", &self.extras)
			.finish()
	}
}
