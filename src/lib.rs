//! Language-aware listing queries and fast-sync interception for a
//! point-of-sale REST API.
//!
//! The crate bridges a point-of-sale REST layer and a multilingual content
//! plugin inside a content-management host. It resolves an effective language
//! per request (store override, then site default), injects it into product
//! and variation listing queries, intercepts the narrow "fast sync" listing
//! shapes with a direct id query, and enriches store API responses with the
//! resolved language.
//!
//! The host itself (data store, REST dispatch, authorization, settings) is
//! reached through the traits in [`host`]; [`memory::MemoryHost`] is an
//! in-memory implementation used by the tests and the demo server.

pub mod bridge;
pub mod config;
pub mod fastsync;
pub mod hooks;
pub mod host;
pub mod memory;
pub mod query;
pub mod request;
pub mod server;
pub mod strings;
pub mod version;

pub use bridge::{FastSyncResponse, LanguageBridge, LanguageOption, StoreEditPayload};
pub use config::Config;
pub use fastsync::{classify, FastSyncContext, FastSyncRecord};
pub use hooks::Hooks;
pub use host::{ContentStore, HostError, LanguageInfo, MultilingualApi, PosSettings, StoreAuthorizer};
pub use memory::MemoryHost;
pub use query::{ContentType, ListingQuery, SortOrder};
pub use request::{ApiRequest, ParamValue};
