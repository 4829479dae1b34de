//! # hal-presenter-core
//!
//! Declarations for rendering domain values as HAL documents.
//!
//! A [`Presenter`] lists the attributes, links, curies and embeds of one
//! model type, plus an optional collection declaration, [`Policy`] and
//! post-serialize hook. Every declared value is a [`Property`] that
//! resolves from a constant, a computed rule or the model's own accessor.
//! Presenters are registered by model type in a [`Registry`] that the
//! serializer consults when no presenter is given explicitly.
//!
//! ## Modules
//!
//! - [`resource`]: the [`Resource`] and [`ResourceCollection`] traits models implement
//! - [`property`]: the value resolver shared by every declaration
//! - [`links`]: links, curies and base-href rewriting
//! - [`embedded`]: nested resource declarations
//! - [`policy`]: visibility policies and the rule-table policy
//! - [`presenter`]: presenters, their builder and inheritance
//! - [`registry`]: type to presenter lookup
//! - [`settings`]: base href and pagination defaults

pub mod context;
pub mod embedded;
pub mod error;
pub mod links;
pub mod options;
pub mod policy;
pub mod presenter;
pub mod property;
pub mod registry;
pub mod resource;
pub mod settings;

pub use context::Context;
pub use embedded::Embed;
pub use error::{HalError, HalResult};
pub use links::{Curie, Link, rewrite_href};
pub use options::Options;
pub use policy::{BoundPolicy, Policy, PolicyContext, PolicyRule, PolicyRules, RuleCategory, RulePolicy};
pub use presenter::{
	CollectionSpec, ModelBinding, PostSerializeHook, Presenter, PresenterBuilder, Properties,
};
pub use property::{Property, Resolvable, Rule, ValueSource};
pub use registry::Registry;
pub use resource::{
	AsAny, Embedded, ParsedEmbed, Resource, ResourceCollection, Resources, Subject, downcast_resource,
	type_id_of, type_name_of,
};
pub use settings::HalSettings;
