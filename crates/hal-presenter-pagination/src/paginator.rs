//! Rewrites collection links with page cursors.

use crate::paginated::{Paginated, resolve_per_page, resolve_prev_page};
use crate::uri::PageUri;
use serde_json::{Map, Value, json};

pub const PAGE_PARAM: &str = "page";
pub const PER_PAGE_PARAM: &str = "per_page";

/// Applies page metadata to an assembled `_links` map.
///
/// When the collection reports a current page, the `self` href gets
/// `page`/`per_page` merged into its query, and `prev`/`next` links are
/// added when those pages exist and the links are not already declared.
/// Returns `false` when nothing was rewritten.
///
/// # Examples
///
/// ```
/// use hal_presenter_pagination::{PageInfo, paginate};
/// use serde_json::{json, Map, Value};
///
/// let mut links: Map<String, Value> = serde_json::from_value(json!({
///     "self": { "href": "/items?sort=name" }
/// })).unwrap();
///
/// let page = PageInfo::new(2, 10).with_next(3);
/// assert!(paginate(&mut links, &page));
/// assert_eq!(links["self"]["href"], "/items?sort=name&page=2&per_page=10");
/// assert_eq!(links["next"]["href"], "/items?sort=name&page=3&per_page=10");
/// assert!(links.get("prev").is_none());
/// ```
pub fn paginate(links: &mut Map<String, Value>, page: &dyn Paginated) -> bool {
	let Some(current) = page.current_page() else {
		return false;
	};
	let Some(self_href) = links
		.get("self")
		.and_then(|link| link.get("href"))
		.and_then(Value::as_str)
	else {
		tracing::debug!("collection is paginated but has no self link, skipping");
		return false;
	};

	let self_uri = PageUri::parse(self_href);
	let per_page = resolve_per_page(page);
	let href_for = |number: u64| self_uri.merge(page_params(number, per_page)).to_href();

	tracing::debug!(page = current, ?per_page, "paginating collection links");

	if let Some(Value::Object(self_link)) = links.get_mut("self") {
		let href = href_for(current).map_or(Value::Null, Value::String);
		self_link.insert("href".to_string(), href);
	}

	for (rel, number) in [("prev", resolve_prev_page(page)), ("next", page.next_page())] {
		if links.contains_key(rel) {
			continue;
		}
		if let Some(href) = number.and_then(&href_for) {
			links.insert(rel.to_string(), json!({ "href": href }));
		}
	}
	true
}

fn page_params(number: u64, per_page: Option<u64>) -> Vec<(&'static str, String)> {
	let mut params = vec![(PAGE_PARAM, number.to_string())];
	if let Some(per_page) = per_page {
		params.push((PER_PAGE_PARAM, per_page.to_string()));
	}
	params
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::PageInfo;
	use rstest::{fixture, rstest};

	#[fixture]
	fn links() -> Map<String, Value> {
		let mut links = Map::new();
		links.insert("self".to_string(), json!({ "href": "/items?sort=name" }));
		links
	}

	#[rstest]
	fn test_no_current_page_is_noop(mut links: Map<String, Value>) {
		let before = links.clone();
		assert!(!paginate(&mut links, &PageInfo::default()));
		assert_eq!(links, before);
	}

	#[rstest]
	fn test_self_next_prev(mut links: Map<String, Value>) {
		let page = PageInfo::new(2, 10).with_prev(1).with_next(3);
		assert!(paginate(&mut links, &page));
		assert_eq!(links["self"]["href"], "/items?sort=name&page=2&per_page=10");
		assert_eq!(links["prev"]["href"], "/items?sort=name&page=1&per_page=10");
		assert_eq!(links["next"]["href"], "/items?sort=name&page=3&per_page=10");
	}

	#[rstest]
	fn test_declared_next_is_kept(mut links: Map<String, Value>) {
		links.insert("next".to_string(), json!({ "href": "/custom" }));
		paginate(&mut links, &PageInfo::new(1, 5).with_next(2));
		assert_eq!(links["next"]["href"], "/custom");
	}

	#[rstest]
	fn test_paginator_value_overrides_existing_param() {
		let mut links = Map::new();
		links.insert("self".to_string(), json!({ "href": "/items?page=7&q=x" }));
		paginate(&mut links, &PageInfo::new(2, 10));
		assert_eq!(links["self"]["href"], "/items?page=2&q=x&per_page=10");
	}

	#[rstest]
	fn test_missing_per_page_is_omitted(mut links: Map<String, Value>) {
		let page = PageInfo {
			current: Some(4),
			..PageInfo::default()
		};
		paginate(&mut links, &page);
		assert_eq!(links["self"]["href"], "/items?sort=name&page=4");
	}

	#[rstest]
	fn test_missing_self_is_noop() {
		let mut links = Map::new();
		assert!(!paginate(&mut links, &PageInfo::new(1, 10).with_next(2)));
		assert!(links.is_empty());
	}

	#[rstest]
	fn test_link_keys_preserve_declaration_order(mut links: Map<String, Value>) {
		links.insert("up".to_string(), json!({ "href": "/" }));
		paginate(&mut links, &PageInfo::new(2, 10).with_prev(1).with_next(3));
		let keys: Vec<&str> = links.keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["self", "up", "prev", "next"]);
	}
}
