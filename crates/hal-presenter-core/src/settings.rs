//! Engine settings.
//!
//! Settings can be built in code, read from a TOML document, or loaded
//! from the environment:
//!
//! | Variable        | Field       |
//! |-----------------|-------------|
//! | `HAL_BASE_HREF` | `base_href` |
//! | `HAL_PAGINATE`  | `paginate`  |

use crate::error::{HalError, HalResult};
use crate::links::rewrite_href;
use serde::Deserialize;
use std::env;
use std::path::Path;

pub const BASE_HREF_ENV: &str = "HAL_BASE_HREF";
pub const PAGINATE_ENV: &str = "HAL_PAGINATE";

/// Settings shared by every render.
///
/// # Examples
///
/// ```
/// use hal_presenter_core::HalSettings;
///
/// let settings = HalSettings::from_toml_str(
///     r#"
///     base_href = "https://api.example.com/"
///     paginate = true
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(settings.base_href(), Some("https://api.example.com"));
/// assert_eq!(settings.href("/posts"), "https://api.example.com/posts");
/// assert!(settings.paginate);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HalSettings {
	base_href: Option<String>,
	/// Whether collections are paginated when the call does not say.
	pub paginate: bool,
}

impl HalSettings {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_base_href(mut self, base: impl Into<String>) -> Self {
		self.base_href = normalize_base(base.into());
		self
	}

	pub fn with_paginate(mut self, paginate: bool) -> Self {
		self.paginate = paginate;
		self
	}

	/// The base href without trailing slashes.
	pub fn base_href(&self) -> Option<&str> {
		self.base_href.as_deref()
	}

	/// Rewrites a root-relative `href` against the base href.
	pub fn href(&self, href: &str) -> String {
		rewrite_href(self.base_href().unwrap_or_default(), href)
	}

	pub fn from_toml_str(source: &str) -> HalResult<Self> {
		let settings: Self =
			toml::from_str(source).map_err(|e| HalError::Settings(e.to_string()))?;
		Ok(settings.normalized())
	}

	pub fn from_toml_file(path: impl AsRef<Path>) -> HalResult<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path)
			.map_err(|e| HalError::Settings(format!("{}: {}", path.display(), e)))?;
		Self::from_toml_str(&source)
	}

	/// Loads `HAL_BASE_HREF` and `HAL_PAGINATE`; unset variables keep defaults.
	pub fn from_env() -> HalResult<Self> {
		let mut settings = Self::default();
		if let Ok(base) = env::var(BASE_HREF_ENV) {
			settings = settings.with_base_href(base);
		}
		if let Ok(value) = env::var(PAGINATE_ENV) {
			settings.paginate = parse_bool(&value).ok_or_else(|| {
				HalError::Settings(format!("{} is not a boolean: {:?}", PAGINATE_ENV, value))
			})?;
		}
		tracing::debug!(
			base_href = settings.base_href(),
			paginate = settings.paginate,
			"loaded settings from environment"
		);
		Ok(settings)
	}

	fn normalized(mut self) -> Self {
		self.base_href = self.base_href.take().and_then(normalize_base);
		self
	}
}

fn normalize_base(base: String) -> Option<String> {
	let trimmed = base.trim_end_matches('/');
	(!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[rstest]
	#[case("https://api.example.com", Some("https://api.example.com"))]
	#[case("https://api.example.com///", Some("https://api.example.com"))]
	#[case("/", None)]
	#[case("", None)]
	fn test_base_href_normalized(#[case] base: &str, #[case] expected: Option<&str>) {
		assert_eq!(HalSettings::new().with_base_href(base).base_href(), expected);
	}

	#[rstest]
	fn test_href_without_base_is_unchanged() {
		assert_eq!(HalSettings::default().href("/posts"), "/posts");
	}

	#[rstest]
	fn test_toml_defaults() {
		let settings = HalSettings::from_toml_str("").unwrap();
		assert_eq!(settings, HalSettings::default());
	}

	#[rstest]
	fn test_toml_rejects_wrong_types() {
		let err = HalSettings::from_toml_str("paginate = \"sometimes\"").unwrap_err();
		assert!(matches!(err, HalError::Settings(_)));
	}

	#[rstest]
	fn test_toml_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "base_href = \"http://localhost:3000/\"").unwrap();
		writeln!(file, "paginate = true").unwrap();

		let settings = HalSettings::from_toml_file(file.path()).unwrap();
		assert_eq!(settings.base_href(), Some("http://localhost:3000"));
		assert!(settings.paginate);
	}

	#[rstest]
	fn test_missing_file() {
		let err = HalSettings::from_toml_file("/nonexistent/hal.toml").unwrap_err();
		assert!(matches!(err, HalError::Settings(_)));
	}

	#[rstest]
	#[case("true", true)]
	#[case("1", true)]
	#[case("Yes", true)]
	#[case("on", true)]
	#[case("false", false)]
	#[case("0", false)]
	#[case("no", false)]
	#[case("OFF", false)]
	#[serial(hal_env)]
	fn test_from_env(#[case] raw: &str, #[case] expected: bool) {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::set_var(BASE_HREF_ENV, "https://env.example.com/");
			env::set_var(PAGINATE_ENV, raw);
		}

		let settings = HalSettings::from_env().unwrap();
		assert_eq!(settings.base_href(), Some("https://env.example.com"));
		assert_eq!(settings.paginate, expected);

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::remove_var(BASE_HREF_ENV);
			env::remove_var(PAGINATE_ENV);
		}
	}

	#[rstest]
	#[serial(hal_env)]
	fn test_from_env_rejects_garbage() {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::remove_var(BASE_HREF_ENV);
			env::set_var(PAGINATE_ENV, "maybe");
		}

		assert!(matches!(HalSettings::from_env(), Err(HalError::Settings(_))));

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::remove_var(PAGINATE_ENV);
		}
	}
}
