//! Localized user-facing messages.
//!
//! Tables are keyed by primary language subtag (`en`, `de`, ...). Lookups
//! fall back to English.

use phf::phf_map;

/// Fallback locale
pub const DEFAULT_LOCALE: &str = "en";

/// "Server endpoint deprecated" notification, per language
static ENDPOINT_DEPRECATED: phf::Map<&'static str, &'static str> = phf_map! {
    "en" => "The analysis service endpoint is deprecated and may stop working in a future release. Please update to the latest version of this tool.",
    "de" => "Der Endpunkt des Analysedienstes ist veraltet und funktioniert in einer zukünftigen Version möglicherweise nicht mehr. Bitte aktualisieren Sie auf die neueste Version dieses Tools.",
    "fr" => "Le point de terminaison du service d'analyse est obsolète et pourrait cesser de fonctionner dans une version future. Veuillez installer la dernière version de cet outil.",
    "es" => "El punto de conexión del servicio de análisis está obsoleto y podría dejar de funcionar en una versión futura. Actualice a la versión más reciente de esta herramienta.",
};

/// Reduce `en-US`, `de_DE.UTF-8`, `FR` to a table key.
fn language(locale: &str) -> String {
    locale
        .split(['-', '_', '.'])
        .next()
        .unwrap_or(DEFAULT_LOCALE)
        .trim()
        .to_ascii_lowercase()
}

fn lookup(table: &phf::Map<&'static str, &'static str>, locale: &str) -> &'static str {
    table
        .get(language(locale).as_str())
        .or_else(|| table.get(DEFAULT_LOCALE))
        .copied()
        .unwrap_or_default()
}

/// Message sent when the service flags its endpoint as deprecated.
pub fn endpoint_deprecated(locale: &str) -> &'static str {
    lookup(&ENDPOINT_DEPRECATED, locale)
}

/// Whether a message table exists for `locale` (without falling back).
pub fn is_supported(locale: &str) -> bool {
    ENDPOINT_DEPRECATED.contains_key(language(locale).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_normalization() {
        assert_eq!(language("en-US"), "en");
        assert_eq!(language("de_DE.UTF-8"), "de");
        assert_eq!(language("FR"), "fr");
    }

    #[test]
    fn test_fallback_to_english() {
        assert_eq!(endpoint_deprecated("xx"), endpoint_deprecated("en"));
        assert_eq!(endpoint_deprecated(""), endpoint_deprecated("en"));
        assert!(!is_supported("xx"));
    }

    #[test]
    fn test_translations_present() {
        assert!(endpoint_deprecated("en").contains("deprecated"));
        assert!(endpoint_deprecated("de-AT").contains("veraltet"));
        assert!(is_supported("es-MX"));
    }
}
