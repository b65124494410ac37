//! Typed extension points.
//!
//! The host pipeline exposes named filters a caller can attach callbacks to;
//! here those are explicit registration methods on a [`Hooks`] value handed
//! to the bridge at construction. Each extension point folds its callbacks
//! over the seed value in registration order, so the last registration has
//! the final word.

use std::fmt;

use crate::request::ApiRequest;

type LanguageFilter = Box<dyn Fn(String, &ApiRequest) -> String + Send + Sync>;
type StringFilter = Box<dyn Fn(String) -> String + Send + Sync>;
type BoolFilter = Box<dyn Fn(bool) -> bool + Send + Sync>;

#[derive(Default)]
pub struct Hooks {
    resolved_language: Vec<LanguageFilter>,
    default_language: Vec<StringFilter>,
    supported: Vec<BoolFilter>,
    min_core_version: Vec<StringFilter>,
    min_commerce_version: Vec<StringFilter>,
    detected_core_version: Vec<StringFilter>,
    detected_commerce_version: Vec<StringFilter>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the language resolved for a request.
    pub fn on_resolved_language<F>(&mut self, f: F)
    where
        F: Fn(String, &ApiRequest) -> String + Send + Sync + 'static,
    {
        self.resolved_language.push(Box::new(f));
    }

    /// Override the platform default language.
    pub fn on_default_language<F>(&mut self, f: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.default_language.push(Box::new(f));
    }

    /// Force or veto multilingual support.
    pub fn on_supported<F>(&mut self, f: F)
    where
        F: Fn(bool) -> bool + Send + Sync + 'static,
    {
        self.supported.push(Box::new(f));
    }

    /// Override the minimum required core plugin version.
    pub fn on_min_core_version<F>(&mut self, f: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.min_core_version.push(Box::new(f));
    }

    /// Override the minimum required commerce companion version.
    pub fn on_min_commerce_version<F>(&mut self, f: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.min_commerce_version.push(Box::new(f));
    }

    /// Override the detected core plugin version.
    pub fn on_detected_core_version<F>(&mut self, f: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.detected_core_version.push(Box::new(f));
    }

    /// Override the detected commerce companion version.
    pub fn on_detected_commerce_version<F>(&mut self, f: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.detected_commerce_version.push(Box::new(f));
    }

    pub(crate) fn apply_resolved_language(&self, seed: String, request: &ApiRequest) -> String {
        self.resolved_language
            .iter()
            .fold(seed, |value, f| f(value, request))
    }

    pub(crate) fn apply_default_language(&self, seed: String) -> String {
        fold(&self.default_language, seed)
    }

    pub(crate) fn apply_supported(&self, seed: bool) -> bool {
        self.supported.iter().fold(seed, |value, f| f(value))
    }

    pub(crate) fn apply_min_core_version(&self, seed: String) -> String {
        fold(&self.min_core_version, seed)
    }

    pub(crate) fn apply_min_commerce_version(&self, seed: String) -> String {
        fold(&self.min_commerce_version, seed)
    }

    pub(crate) fn apply_detected_core_version(&self, seed: String) -> String {
        fold(&self.detected_core_version, seed)
    }

    pub(crate) fn apply_detected_commerce_version(&self, seed: String) -> String {
        fold(&self.detected_commerce_version, seed)
    }
}

fn fold(filters: &[StringFilter], seed: String) -> String {
    filters.iter().fold(seed, |value, f| f(value))
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("resolved_language", &self.resolved_language.len())
            .field("default_language", &self.default_language.len())
            .field("supported", &self.supported.len())
            .field("min_core_version", &self.min_core_version.len())
            .field("min_commerce_version", &self.min_commerce_version.len())
            .field("detected_core_version", &self.detected_core_version.len())
            .field(
                "detected_commerce_version",
                &self.detected_commerce_version.len(),
            )
            .finish()
    }
}
