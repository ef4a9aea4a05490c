//! # mentor-rs: static debugging and complexity estimation
//!
//! Parses source code with tree-sitter and, without running it or calling any
//! model, produces:
//!
//! - **Debug reports**: syntax and indentation errors, literal identity
//!   comparisons, potential infinite loops, bare `except` clauses and unused
//!   bindings, plus the source with mechanical repairs applied
//! - **Complexity reports**: per-function Big-O time and space estimates with
//!   explanations and optimization suggestions
//! - **Reviews**: both of the above for files or whole directories, with the
//!   findings distilled into short suggestions
//!
//! Python, JavaScript and Rust are supported.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mentor_rs::{Language, MentorConfig, MentorEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = MentorEngine::new(MentorConfig::default())?;
//!     let report = engine.analyze_complexity(
//!         "def pairs(xs):\n    return [(a, b) for a in xs for b in xs]\n",
//!         Language::Python,
//!     );
//!     println!("{}", report.time_complexity.overall);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

// Parsing, configuration and shared infrastructure
pub mod core {
    //! Core services: parsing, configuration, errors and file handling.

    pub mod ast_service;
    pub mod config;
    pub mod errors;
    pub mod file_utils;
}

// Analyzers
pub mod detectors {
    //! Static analyzers that run over a parsed syntax tree.

    #![allow(missing_docs)]

    pub mod complexity;
    pub mod debug;
}

// Language profiles
pub mod lang {
    //! Language identification and per-grammar node knowledge.

    #![allow(missing_docs)]

    pub mod common;
    pub mod javascript;
    pub mod python;
    pub mod registry;
    pub mod rust_lang;
}

// Public API and engine interface
pub mod api {
    //! High-level engine and report types.

    #![allow(missing_docs)]

    pub mod engine;
    pub mod results;
}

pub use api::engine::MentorEngine;
pub use api::results::{BatchReport, BatchSummary, ReviewReport, ReviewSuggestions};
pub use core::config::MentorConfig;
pub use core::errors::{MentorError, Result, ResultExt};
pub use detectors::complexity::{ComplexityClass, ComplexityEstimator, ComplexityReport};
pub use detectors::debug::{DebugIssue, DebugReport, IssueType, Severity, StaticDebugger};
pub use lang::registry::Language;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
