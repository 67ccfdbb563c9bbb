use std::collections::HashMap;
use std::fmt::Display;

use serde::Deserialize;

use crate::error::ConfigError;

const ENGLISH: &str = include_str!("../translations/en.json");
const RIGHT_TO_LEFT: [&str; 7] = ["ar", "dv", "fa", "he", "ps", "ur", "yi"];

/// A normalized locale tag, such as `en` or `pt-br`.
///
/// Tags are lowercased and `_` separators become `-`, so `pt_BR` and `pt-br` are the same locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a tag.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().replace('_', "-").to_lowercase())
    }

    /// The normalized tag.
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// The language part of the tag (`pt` for `pt-br`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// Whether the language is written right to left.
    pub fn is_right_to_left(&self) -> bool {
        RIGHT_TO_LEFT.contains(&self.language())
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Locale::new(value)
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Locale::new(value)
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of user-facing strings.
pub trait TranslationsProvider: Send + Sync {
    /// The locale used when a string is missing for the requested one.
    fn default_locale(&self) -> &Locale;

    /// Look up `key` for exactly `locale`, without any fallback.
    fn get(&self, key: &str, locale: &Locale) -> Option<&str>;

    /// Translate `key` into `locale`, substituting `{0}`, `{1}`, ... with `replacements`.
    ///
    /// Lookup falls back from the exact locale, to its language, to the default locale.
    /// When all of these miss, the key itself is returned.
    fn translate(&self, key: &str, locale: &Locale, replacements: &[&dyn Display]) -> String {
        let template = self
            .get(key, locale)
            .or_else(|| self.get(key, &Locale::new(locale.language())))
            .or_else(|| self.get(key, self.default_locale()));

        match template {
            Some(template) => substitute(template, replacements),
            None => key.to_string(),
        }
    }
}

/// Translations held in memory, starting with the built-in English bundle.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// let translations = BundledTranslations::default()
///     .with_bundle("de", r#"{"commands.help.usage": "Verwendung"}"#)
///     .unwrap();
///
/// assert_eq!(translations.translate("commands.help.usage", &Locale::new("de-AT"), &[]), "Verwendung");
/// assert_eq!(translations.translate("commands.help.usage", &Locale::new("fr"), &[]), "Usage");
/// ```
#[derive(Debug, Clone)]
pub struct BundledTranslations {
    default_locale: Locale,
    bundles: HashMap<Locale, HashMap<String, String>>,
}

impl Default for BundledTranslations {
    fn default() -> Self {
        Self::new(Locale::new("en"))
    }
}

impl BundledTranslations {
    /// Create the built-in translations, falling back to `default_locale`.
    pub fn new(default_locale: Locale) -> Self {
        let english: HashMap<String, String> = serde_json::from_str(ENGLISH)
            .expect("internal error - the bundled translations must be valid");
        let mut bundles = HashMap::default();
        bundles.insert(Locale::new("en"), english);

        Self {
            default_locale,
            bundles,
        }
    }

    /// Merge a JSON object of `key: string` pairs into the bundle for `locale`.
    pub fn with_bundle(mut self, locale: impl Into<Locale>, json: &str) -> Result<Self, ConfigError> {
        let locale = locale.into();
        let strings: HashMap<String, String> = serde_json::from_str(json).map_err(|error| {
            ConfigError::new(format!("invalid translations for locale '{locale}': {error}"))
        })?;
        self.bundles.entry(locale).or_default().extend(strings);
        Ok(self)
    }

    /// Set a single string for `locale`.
    pub fn insert(&mut self, locale: impl Into<Locale>, key: impl Into<String>, value: impl Into<String>) {
        self.bundles
            .entry(locale.into())
            .or_default()
            .insert(key.into(), value.into());
    }
}

impl TranslationsProvider for BundledTranslations {
    fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    fn get(&self, key: &str, locale: &Locale) -> Option<&str> {
        self.bundles
            .get(locale)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
    }
}

// Single pass, so replacement text containing `{n}` is never substituted again.
fn substitute(template: &str, replacements: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) => {
                let index = &after[..close];

                match index.parse::<usize>().ok().and_then(|i| replacements.get(i)) {
                    Some(replacement) => out.push_str(&replacement.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(index);
                        out.push('}');
                    }
                }

                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use rstest::rstest;

    #[rstest]
    #[case("en", "en", "en")]
    #[case("pt_BR", "pt-br", "pt")]
    #[case(" EN-gb ", "en-gb", "en")]
    fn locale(#[case] tag: &str, #[case] expected: &str, #[case] language: &str) {
        let locale = Locale::new(tag);
        assert_eq!(locale.tag(), expected);
        assert_eq!(locale.language(), language);
    }

    #[rstest]
    #[case("ar", true)]
    #[case("he-il", true)]
    #[case("en", false)]
    #[case("fr-ca", false)]
    fn right_to_left(#[case] tag: &str, #[case] expected: bool) {
        assert_eq!(Locale::new(tag).is_right_to_left(), expected);
    }

    #[rstest]
    #[case("plain", vec![], "plain")]
    #[case("{0} and {1}", vec!["a", "b"], "a and b")]
    #[case("{1}{0}{1}", vec!["a", "b"], "bab")]
    #[case("{2} missing", vec!["a"], "{2} missing")]
    #[case("{x} {", vec![], "{x} {")]
    #[case("{0}", vec!["{0}"], "{0}")]
    fn substitution(#[case] template: &str, #[case] values: Vec<&str>, #[case] expected: &str) {
        let replacements: Vec<&dyn Display> = values.iter().map(|v| v as &dyn Display).collect();
        assert_eq!(substitute(template, &replacements), expected);
    }

    #[test]
    fn bundled_english() {
        let translations = BundledTranslations::default();
        assert_eq!(
            translations.translate("converters.number.error.invalid", &Locale::new("en"), &[&"abc"]),
            "Value `abc` is not a valid whole number."
        );
    }

    #[test]
    fn fallback_chain() {
        let mut translations = BundledTranslations::default();
        translations.insert("pt", "key.a", "language");
        translations.insert("pt-br", "key.b", "exact");
        translations.insert("en", "key.c", "default");
        let locale = Locale::new("pt-BR");

        assert_eq!(translations.translate("key.a", &locale, &[]), "language");
        assert_eq!(translations.translate("key.b", &locale, &[]), "exact");
        assert_eq!(translations.translate("key.c", &locale, &[]), "default");
        assert_eq!(translations.translate("key.d", &locale, &[]), "key.d");
    }

    #[test]
    fn invalid_bundle() {
        let error = BundledTranslations::default()
            .with_bundle("de", "[1, 2]")
            .unwrap_err();
        assert_contains!(error.to_string(), "invalid translations for locale 'de'");
    }

    #[test]
    fn locale_deserialize() {
        let locale: Locale = serde_json::from_str("\"en_US\"").unwrap();
        assert_eq!(locale, Locale::new("en-us"));
    }
}
