//! Language identification, parser construction, and profile lookup.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tree_sitter::Parser;

use crate::core::errors::{MentorError, Result};
use crate::lang::common::LanguageProfile;
use crate::lang::javascript::JavaScriptProfile;
use crate::lang::python::PythonProfile;
use crate::lang::rust_lang::RustProfile;

/// Languages with a compiled-in grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Rust,
}

/// Stability indicator used for documentation and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageStability {
    Stable,
    Beta,
}

/// Metadata describing one of the built-in languages.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// Language this entry describes
    pub language: Language,
    /// Human-friendly display name.
    pub name: &'static str,
    /// Supported file extensions (without leading dots).
    pub extensions: &'static [&'static str],
    /// Stability status.
    pub status: LanguageStability,
    /// Feature notes for documentation/UI.
    pub notes: &'static str,
}

const REGISTERED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        language: Language::Python,
        name: "Python",
        extensions: &["py", "pyw", "pyi"],
        status: LanguageStability::Stable,
        notes: "All debug checks, indentation repair, complexity estimation",
    },
    LanguageInfo {
        language: Language::JavaScript,
        name: "JavaScript",
        extensions: &["js", "jsx", "mjs", "cjs"],
        status: LanguageStability::Beta,
        notes: "Syntax, infinite-loop and unused-binding checks, complexity estimation",
    },
    LanguageInfo {
        language: Language::Rust,
        name: "Rust",
        extensions: &["rs"],
        status: LanguageStability::Beta,
        notes: "Syntax, infinite-loop and unused-binding checks, complexity estimation",
    },
];

/// Return the languages that are compiled into this build.
pub fn registered_languages() -> &'static [LanguageInfo] {
    REGISTERED_LANGUAGES
}

impl Language {
    /// Canonical lowercase name used in config and CLI flags.
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Rust => "rust",
        }
    }

    /// Registry entry for this language.
    pub fn info(self) -> &'static LanguageInfo {
        REGISTERED_LANGUAGES
            .iter()
            .find(|info| info.language == self)
            .unwrap_or(&REGISTERED_LANGUAGES[0])
    }

    /// File extensions (without the dot) analysed as this language.
    pub fn extensions(self) -> &'static [&'static str] {
        self.info().extensions
    }

    /// Resolve a language from its name or a common alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "javascript" | "js" => Some(Self::JavaScript),
            "rust" | "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Resolve a language from a bare file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        REGISTERED_LANGUAGES
            .iter()
            .find(|info| info.extensions.contains(&ext.as_str()))
            .map(|info| info.language)
    }

    /// Resolve a language from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Tree-sitter grammar for this language.
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = MentorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
            .or_else(|| Self::from_extension(s))
            .ok_or_else(|| {
                MentorError::unsupported(format!("No analyzer available for language '{s}'"))
            })
    }
}

/// Create a new parser for the given language
pub fn create_parser(language: Language) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| {
            MentorError::parse(language.name(), format!("Failed to set parser language: {e}"))
        })?;
    Ok(parser)
}

static PYTHON: PythonProfile = PythonProfile;
static JAVASCRIPT: JavaScriptProfile = JavaScriptProfile;
static RUST: RustProfile = RustProfile;

/// Profile describing the grammar of `language`.
pub fn profile_for(language: Language) -> &'static dyn LanguageProfile {
    match language {
        Language::Python => &PYTHON,
        Language::JavaScript => &JAVASCRIPT,
        Language::Rust => &RUST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension(".MJS"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("go"), None);
    }

    #[test]
    fn test_language_from_str_accepts_names_and_extensions() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("jsx".parse::<Language>().unwrap(), Language::JavaScript);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_from_name_and_extensions() {
        assert_eq!(Language::from_name("JS"), Some(Language::JavaScript));
        assert_eq!(Language::from_name("mjs"), None);
        assert!(Language::JavaScript.extensions().contains(&"mjs"));
        assert_eq!(Language::Rust.extensions(), &["rs"]);
    }

    #[test]
    fn test_parsers_build_for_every_language() {
        for info in registered_languages() {
            let mut parser = create_parser(info.language).unwrap();
            assert!(parser.parse("", None).is_some(), "{}", info.name);
        }
    }

    #[test]
    fn test_profiles_match_language() {
        for info in registered_languages() {
            assert_eq!(profile_for(info.language).language(), info.language);
        }
    }
}
