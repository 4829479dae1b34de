//! Minimal href model for merging page parameters into a query string.

use std::fmt;

/// An href split into its path and ordered query parameters.
///
/// Only what the paginator needs: the fragment is dropped, keys keep their
/// first-seen position, and values are kept verbatim (no percent decoding).
///
/// # Examples
///
/// ```
/// use hal_presenter_pagination::PageUri;
///
/// let uri = PageUri::parse("/items?sort=name");
/// let merged = uri.merge([("page", "2".to_string()), ("per_page", "10".to_string())]);
/// assert_eq!(merged.to_string(), "/items?sort=name&page=2&per_page=10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageUri {
	path: Option<String>,
	query: Vec<(String, String)>,
}

impl PageUri {
	pub fn parse(href: &str) -> Self {
		let (path, rest) = match href.split_once('?') {
			Some((path, rest)) => (path, Some(rest)),
			None => (href, None),
		};
		if path.is_empty() {
			return Self::default();
		}
		let query = rest
			.map(|rest| rest.split('#').next().unwrap_or_default())
			.map(parse_query)
			.unwrap_or_default();
		Self {
			path: Some(path.to_string()),
			query,
		}
	}

	pub fn path(&self) -> Option<&str> {
		self.path.as_deref()
	}

	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// Returns the value for `key`, if present.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns a copy with `params` merged in. Existing keys are overwritten
	/// in place; unknown keys are appended in the given order.
	pub fn merge<K, I>(&self, params: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, String)>,
	{
		let mut merged = self.clone();
		for (key, value) in params {
			let key = key.into();
			match merged.query.iter_mut().find(|(k, _)| *k == key) {
				Some(entry) => entry.1 = value,
				None => merged.query.push((key, value)),
			}
		}
		merged
	}

	/// Renders the href, or `None` when there was no path to begin with.
	pub fn to_href(&self) -> Option<String> {
		self.path.as_ref().map(|_| self.to_string())
	}
}

impl fmt::Display for PageUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Some(path) = &self.path else {
			return Ok(());
		};
		f.write_str(path)?;
		if !self.query.is_empty() {
			let query = self
				.query
				.iter()
				.map(|(k, v)| format!("{}={}", k, v))
				.collect::<Vec<_>>()
				.join("&");
			write!(f, "?{}", query)?;
		}
		Ok(())
	}
}

/// Splits a query string on `&` and then `=`. The first occurrence of a
/// duplicated key wins.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
	let mut pairs: Vec<(String, String)> = Vec::new();
	for pair in query.split('&').filter(|pair| !pair.is_empty()) {
		let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
		if pairs.iter().any(|(k, _)| k == key) {
			continue;
		}
		pairs.push((key.to_string(), value.to_string()));
	}
	pairs
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("/items", "/items")]
	#[case("/items?sort=name", "/items?sort=name")]
	#[case("/items?sort=name#top", "/items?sort=name")]
	#[case("http://example.com/a?b=1", "http://example.com/a?b=1")]
	fn test_parse_and_render(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(PageUri::parse(input).to_string(), expected);
	}

	#[rstest]
	#[case("")]
	#[case("?page=1")]
	fn test_parse_without_path(#[case] input: &str) {
		let uri = PageUri::parse(input);
		assert_eq!(uri.path(), None);
		assert_eq!(uri.to_href(), None);
	}

	#[rstest]
	fn test_first_duplicate_wins() {
		let uri = PageUri::parse("/items?a=1&b=2&a=3");
		assert_eq!(uri.get("a"), Some("1"));
		assert_eq!(uri.to_string(), "/items?a=1&b=2");
	}

	#[rstest]
	fn test_key_without_value() {
		let uri = PageUri::parse("/items?flag&x=1");
		assert_eq!(uri.get("flag"), Some(""));
		assert_eq!(uri.to_string(), "/items?flag=&x=1");
	}

	#[rstest]
	fn test_values_are_not_reencoded() {
		let uri = PageUri::parse("/search?q=a%20b+c&tag=x/y");
		let merged = uri.merge([("page", "2".to_string())]);
		assert_eq!(merged.get("q"), Some("a%20b+c"));
		assert_eq!(merged.to_string(), "/search?q=a%20b+c&tag=x/y&page=2");
	}

	#[rstest]
	fn test_merge_overwrites_in_place() {
		let uri = PageUri::parse("/items?page=9&sort=name");
		let merged = uri.merge([("page", "2".to_string()), ("per_page", "10".to_string())]);
		assert_eq!(merged.to_string(), "/items?page=2&sort=name&per_page=10");
		// the original is untouched
		assert_eq!(uri.get("page"), Some("9"));
	}

	proptest! {
		#[test]
		fn prop_merge_preserves_unrelated_params(
			keys in proptest::collection::btree_set("[a-o]{1,6}", 0..6),
			page in 1u64..1000,
		) {
			let query = keys
				.iter()
				.enumerate()
				.map(|(i, k)| format!("{}={}", k, i))
				.collect::<Vec<_>>()
				.join("&");
			let href = if query.is_empty() { "/x".to_string() } else { format!("/x?{}", query) };
			let merged = PageUri::parse(&href).merge([("page", page.to_string())]);

			for (i, key) in keys.iter().enumerate() {
				let expected = i.to_string();
				prop_assert_eq!(merged.get(key), Some(expected.as_str()));
			}
			let expected_page = page.to_string();
			prop_assert_eq!(merged.get("page"), Some(expected_page.as_str()));
		}
	}
}
