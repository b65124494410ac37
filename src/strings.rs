//! User-facing strings for the store-edit screen payload.

/// Strings shown by the admin store-editing screen's language section.
///
/// `default_option` carries a `{language}` placeholder for the platform
/// default language code.
#[derive(Debug, Clone)]
pub struct EditScreenStrings {
    /// Label of the settings section in the store-edit sidebar.
    pub section_label: &'static str,

    /// Title above the language selector.
    pub title: &'static str,

    /// Short description of what the selector does.
    pub description: &'static str,

    /// Help text under the selector.
    pub help: &'static str,

    /// Label of the "use the default" option.
    pub default_option: &'static str,

    /// Shown when the multilingual plugin reports no languages.
    pub no_languages: &'static str,
}

pub const ENGLISH_STRINGS: EditScreenStrings = EditScreenStrings {
    section_label: "Language",
    title: "Store language",
    description: "Choose which language this store should use at the point of sale.",
    help: "Products in this store are filtered to the selected language. Leave this as default to use your site default language.",
    default_option: "Default language ({language})",
    no_languages: "No languages found.",
};

/// Fallback label when the platform has no default language code.
pub const SITE_DEFAULT_LABEL: &str = "site default";
