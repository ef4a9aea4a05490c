//! Central AST service shared by the debug and complexity analyzers.
//!
//! Trees are cached per file path. A cached entry is only reused while the
//! source hash matches, so an edited buffer is reparsed transparently.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use tree_sitter::{Node, Tree};
use xxhash_rust::xxh3::xxh3_64;

use crate::core::errors::{MentorError, Result};
use crate::lang::common::{node_text, LanguageProfile};
use crate::lang::registry::{create_parser, profile_for, Language};

/// Central AST service for parsing and caching
#[derive(Debug, Default)]
pub struct AstService {
    /// Cached parsed trees by file path
    tree_cache: DashMap<String, Arc<CachedTree>>,
}

/// Cached AST tree with metadata
#[derive(Debug)]
pub struct CachedTree {
    pub tree: Tree,
    pub source: String,
    pub language: Language,
    pub source_hash: u64,
}

/// AST analysis context for detectors
#[derive(Clone, Copy)]
pub struct AstContext<'a> {
    pub tree: &'a Tree,
    pub source: &'a str,
    pub language: Language,
    pub file_path: &'a str,
    pub profile: &'static dyn LanguageProfile,
}

impl std::fmt::Debug for AstContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstContext")
            .field("language", &self.language)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

/// A syntax error reported by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Python-flavoured message (`invalid syntax`, `missing ')'`)
    pub message: String,
}

/// Cache statistics for monitoring
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub cached_files: usize,
}

impl AstService {
    /// Create a new AST service
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or parse the AST for a file
    pub fn parse(&self, file_path: &str, source: &str, language: Language) -> Result<Arc<CachedTree>> {
        let source_hash = xxh3_64(source.as_bytes());

        if let Some(cached) = self.tree_cache.get(file_path) {
            if cached.source_hash == source_hash && cached.language == language {
                return Ok(cached.clone());
            }
            debug!("Source changed, reparsing {}", file_path);
        }

        let mut parser = create_parser(language)?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            MentorError::parse_with_location(
                language.name(),
                "Failed to parse source code",
                file_path,
                None,
            )
        })?;

        let cached = Arc::new(CachedTree {
            tree,
            source: source.to_string(),
            language,
            source_hash,
        });
        self.tree_cache
            .insert(file_path.to_string(), cached.clone());
        Ok(cached)
    }

    /// Create AST context for analysis
    pub fn create_context<'a>(&self, cached_tree: &'a CachedTree, file_path: &'a str) -> AstContext<'a> {
        AstContext {
            tree: &cached_tree.tree,
            source: &cached_tree.source,
            language: cached_tree.language,
            file_path,
            profile: profile_for(cached_tree.language),
        }
    }

    /// Clear cache for a specific file
    pub fn invalidate(&self, file_path: &str) {
        self.tree_cache.remove(file_path);
    }

    /// Clear entire cache
    pub fn clear(&self) {
        self.tree_cache.clear();
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            cached_files: self.tree_cache.len(),
        }
    }
}

impl AstContext<'_> {
    /// Whether the parser recovered from any error.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Text of a node in this context's source.
    pub fn text(&self, node: Node<'_>) -> &str {
        node_text(node, self.source)
    }
}

/// Topmost `ERROR` and `MISSING` nodes in document order, at most `limit`.
pub fn syntax_errors(context: &AstContext<'_>, limit: usize) -> Vec<SyntaxDiagnostic> {
    let mut diagnostics = Vec::new();
    if limit == 0 || !context.has_errors() {
        return diagnostics;
    }
    collect_errors(context.tree.root_node(), context, limit, &mut diagnostics);
    diagnostics
}

fn collect_errors(
    node: Node<'_>,
    context: &AstContext<'_>,
    limit: usize,
    out: &mut Vec<SyntaxDiagnostic>,
) {
    if out.len() >= limit {
        return;
    }

    if node.is_missing() {
        out.push(SyntaxDiagnostic {
            line: node.start_position().row + 1,
            column: node.start_position().column + 1,
            message: format!("missing '{}'", node.kind()),
        });
        return;
    }

    if node.is_error() {
        out.push(SyntaxDiagnostic {
            line: node.start_position().row + 1,
            column: node.start_position().column + 1,
            message: describe_error(node, context),
        });
        return;
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, context, limit, out);
    }
}

/// Message for an `ERROR` node, using the text it swallowed as a hint.
fn describe_error(node: Node<'_>, context: &AstContext<'_>) -> String {
    let text = context.text(node).trim_start();
    let unterminated = text.starts_with('"') || text.starts_with('\'') || text.starts_with('`');
    if unterminated && !text.lines().next().is_some_and(|line| line.len() > 1 && closes_quote(line)) {
        return "EOF while scanning string literal".to_string();
    }
    "invalid syntax".to_string()
}

fn closes_quote(line: &str) -> bool {
    let mut chars = line.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    chars.any(|c| c == quote)
}
