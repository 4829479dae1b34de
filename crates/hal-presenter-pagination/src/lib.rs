//! # hal-presenter-pagination
//!
//! Page cursor support for HAL collection documents.
//!
//! The serializer hands an assembled `_links` map and the collection's page
//! metadata to [`paginate`], which rewrites the `self` href and adds
//! `prev`/`next` relations. Collections opt in by implementing
//! [`Paginated`]; anything that does not is rendered unpaginated.

pub mod paginated;
pub mod paginator;
pub mod uri;

pub use paginated::{PageInfo, Paginated, resolve_per_page, resolve_prev_page};
pub use paginator::{PAGE_PARAM, PER_PAGE_PARAM, paginate};
pub use uri::{PageUri, parse_query};
