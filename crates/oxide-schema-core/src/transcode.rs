//! Semantic <-> native type translation.

use crate::dialect::DialectProfile;
use crate::error::{Result, SchemaError};
use crate::types::{NativeTypeSpec, SemanticType};

/// Converts between semantic types and one dialect's native types.
#[derive(Debug, Clone, Copy)]
pub struct Transcoder<'p> {
    profile: &'p DialectProfile,
}

impl<'p> Transcoder<'p> {
    /// Creates a transcoder over `profile`.
    #[must_use]
    pub fn new(profile: &'p DialectProfile) -> Self {
        Self { profile }
    }

    /// Returns the native type for a semantic type.
    pub fn to_native(&self, semantic: SemanticType) -> Result<NativeTypeSpec> {
        self.profile
            .types()
            .iter()
            .find(|(ty, _)| *ty == semantic)
            .map(|(_, native)| native.clone())
            .ok_or_else(|| SchemaError::UnknownSemanticType(semantic.to_string()))
    }

    /// Classifies an observed native type token.
    ///
    /// Any `(...)` suffix is dropped and the name compared case-insensitively
    /// against the profile, first match wins. Unknown tokens map to the
    /// profile's default semantic type, so this never fails.
    #[must_use]
    pub fn to_semantic(&self, token: &str) -> SemanticType {
        self.lookup(&base_type_name(token))
            .unwrap_or_else(|| self.profile.default_semantic())
    }

    /// Maps an observed native token onto the profile's own spelling.
    ///
    /// This is what the diff compares on the actual side. Native-only
    /// aliases keep their own name. If the profile has no entry for its own
    /// default semantic type, a bare `text` is used.
    #[must_use]
    pub fn normalize(&self, token: &str) -> NativeTypeSpec {
        let name = base_type_name(token);
        let semantic = match self.lookup(&name) {
            Some(semantic) => semantic,
            None => {
                if let Some(alias) = self
                    .profile
                    .native_aliases()
                    .iter()
                    .find(|alias| alias.name == name)
                {
                    return alias.clone();
                }
                self.profile.default_semantic()
            }
        };
        self.to_native(semantic)
            .unwrap_or_else(|_| NativeTypeSpec::new("text"))
    }

    fn lookup(&self, name: &str) -> Option<SemanticType> {
        self.profile
            .types()
            .iter()
            .find(|(_, native)| native.name == name)
            .map(|(ty, _)| *ty)
    }
}

/// Strips a parenthesised length/precision suffix and lowercases the rest.
#[must_use]
pub fn base_type_name(token: &str) -> String {
    token
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DdlStyle, DialectKind};
    use proptest::prelude::*;

    #[test]
    fn test_base_type_name() {
        assert_eq!(base_type_name("varchar(255)"), "varchar");
        assert_eq!(base_type_name("DECIMAL(18,6)"), "decimal");
        assert_eq!(base_type_name("int(10) unsigned"), "int");
        assert_eq!(base_type_name(" text "), "text");
        assert_eq!(base_type_name(""), "");
    }

    #[test]
    fn test_to_native_mysql() {
        let profile = DialectKind::MySql.profile();
        let t = Transcoder::new(&profile);
        assert_eq!(t.to_native(SemanticType::String).unwrap().to_string(), "varchar(255)");
        assert_eq!(t.to_native(SemanticType::Boolean).unwrap().to_string(), "tinyint(1)");
        assert_eq!(t.to_native(SemanticType::Double).unwrap().to_string(), "decimal(18,6)");
    }

    #[test]
    fn test_to_native_missing_mapping() {
        let profile = DialectProfile::new("bare", "id", '"', DdlStyle::Combined)
            .with_type(SemanticType::Text, NativeTypeSpec::new("text"));
        let t = Transcoder::new(&profile);
        assert!(matches!(
            t.to_native(SemanticType::Money),
            Err(SchemaError::UnknownSemanticType(name)) if name == "money"
        ));
    }

    #[test]
    fn test_to_semantic_first_match_wins() {
        let profile = DialectKind::Sqlite.profile();
        let t = Transcoder::new(&profile);
        // string and password share varchar; string is declared first.
        assert_eq!(t.to_semantic("varchar(255)"), SemanticType::String);
        assert_eq!(t.to_semantic("VARCHAR"), SemanticType::String);
        assert_eq!(t.to_semantic("float"), SemanticType::Float);
        assert_eq!(t.to_semantic("DATETIME"), SemanticType::DateTime);
    }

    #[test]
    fn test_to_semantic_fallback() {
        let profile = DialectKind::MySql.profile();
        let t = Transcoder::new(&profile);
        assert_eq!(t.to_semantic("longblob"), SemanticType::Text);
        assert_eq!(t.to_semantic(""), SemanticType::Text);
        assert_eq!(t.to_semantic("int(10) unsigned"), SemanticType::Integer);
        assert_eq!(t.normalize("enum('a','b')").to_string(), "text");
    }

    #[test]
    fn test_normalize_keeps_native_aliases() {
        let profile = DialectKind::MySql.profile();
        let t = Transcoder::new(&profile);
        assert_eq!(t.normalize("TIMESTAMP"), NativeTypeSpec::new("timestamp"));
        assert_eq!(t.normalize("blob"), NativeTypeSpec::new("blob"));
        assert_eq!(t.to_semantic("blob"), SemanticType::Text);
        assert_eq!(t.normalize("longblob"), NativeTypeSpec::new("text"));

        let sqlite = DialectKind::Sqlite.profile();
        assert_eq!(
            Transcoder::new(&sqlite).normalize("blob"),
            NativeTypeSpec::new("text")
        );
    }

    #[test]
    fn test_normalize_without_default_mapping() {
        let profile = DialectProfile::new("bare", "id", '"', DdlStyle::Combined)
            .with_default(SemanticType::Object);
        let t = Transcoder::new(&profile);
        assert_eq!(t.normalize("anything"), NativeTypeSpec::new("text"));
    }

    proptest! {
        #[test]
        fn to_semantic_is_total(token in ".*") {
            for kind in [DialectKind::Sqlite, DialectKind::MySql] {
                let profile = kind.profile();
                let t = Transcoder::new(&profile);
                let semantic = t.to_semantic(&token);
                prop_assert!(t.to_native(semantic).is_ok());
            }
        }
    }
}
