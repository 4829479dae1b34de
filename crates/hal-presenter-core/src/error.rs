//! Error types shared by presenters, serializers and deserializers.

use thiserror::Error;

/// Errors raised while declaring, rendering or parsing HAL documents.
///
/// All of these are programmer or configuration errors: they abort the
/// current call and no partial document is returned.
#[derive(Debug, Error)]
pub enum HalError {
	/// Render was called without a resource.
	#[error("Resource is missing")]
	MissingResource,

	/// No presenter is registered for the value's type and none was supplied.
	#[error("No presenter found for {type_name}")]
	NoPresenterFound { type_name: String },

	/// A collection was rendered with a presenter that declares no collection.
	#[error(
		"Presenter '{presenter}' has no collection declaration; add a collection spec or use another presenter"
	)]
	CollectionNotSupported { presenter: String },

	/// A declaration is incomplete or inconsistent.
	#[error("Invalid declaration: {0}")]
	InvalidDeclaration(String),

	/// A property fell through to accessor lookup without a resource.
	#[error("Property '{property}' cannot be resolved without a resource")]
	NotResolvable { property: String },

	/// A parsed nested value does not have the type the model expects.
	#[error("Type mismatch: expected {expected}")]
	TypeMismatch { expected: &'static str },

	/// A model rejected a value assigned during parsing.
	#[error("Invalid value for attribute '{name}': {message}")]
	InvalidAttribute { name: String, message: String },

	/// Settings could not be loaded.
	#[error("Settings error: {0}")]
	Settings(String),

	/// JSON encoding or decoding failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl HalError {
	pub fn no_presenter(type_name: impl Into<String>) -> Self {
		Self::NoPresenterFound {
			type_name: type_name.into(),
		}
	}

	pub fn invalid_attribute(name: impl Into<String>, message: impl ToString) -> Self {
		Self::InvalidAttribute {
			name: name.into(),
			message: message.to_string(),
		}
	}
}

/// Result type alias for presenter operations.
pub type HalResult<T> = Result<T, HalError>;
