//! enumgen-core: enumeration companion code generation for Go source trees
//!
//! Scans Go packages for constants whose type name matches a pattern
//! (`^.+Enum$` by default), collects every member of each such type across
//! all files, and writes a generated Go file per enumeration (or per
//! package) with its sorted member list and validation helpers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use enumgen_core::prelude::*;
//!
//! let report = Generator::new(["./internal"])
//!     .include_tests(false)
//!     .run()?;
//!
//! for e in &report.enums {
//!     println!("{} ({}): {:?}", e.name, e.base_type, e.members);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`syntax`]: Go lexer and top-level declaration parser
//! - [`constraint`]: `//go:build` and file-name build constraints
//! - [`scan`]: Parallel file discovery with `./...` pruning
//! - [`gomod`]: `go.mod` lookup and import path mapping
//! - [`loader`]: Compilation units and symbol table construction
//! - [`symbols`]: Type declarations, scopes and type resolution
//! - [`typegraph`]: Recursive type chain detection
//! - [`enums`]: Extraction and merging of enumeration members
//! - [`render`]: Go source generation
//! - [`write`]: Atomic file output
//! - [`generate`]: Fluent builder running the whole pipeline
//! - [`report`]: Plain and JSON run summaries
//! - [`error`]: Typed error handling

pub mod config;
pub mod constraint;
pub mod enums;
pub mod error;
pub mod generate;
pub mod gomod;
pub mod loader;
pub mod logging;
pub mod prelude;
pub mod render;
pub mod report;
pub mod scan;
pub mod symbols;
pub mod syntax;
pub mod typegraph;
pub mod write;

#[cfg(test)]
mod tests;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{EnumgenError, EnumgenResult, IoResultExt};

// Builder API
pub use generate::Generator;

// Configuration
pub use config::{
    load_config, load_config_file, parse_config, EnumgenConfig, OutputConfig, OutputFormat,
    CONFIG_FILE_NAME,
};

// Build constraints
pub use constraint::{parse_build_tags, parse_env_overrides, BuildContext};

// Loading
pub use loader::{load, CompilationUnit, LoadOptions, LoadedSources};
pub use scan::gather_go_files;
pub use symbols::{FileId, PackageKey, ResolvedType, SymbolTable, TypeResolver};

// Extraction and merging
pub use enums::{
    compile_pattern, extract, merge, CanonicalMapping, EnumDefinition, EnumKey, MergedEnum,
    NameMatcher, PackageGroup, DEFAULT_ENUM_PATTERN,
};

// Rendering and writing
pub use render::{render_enum, render_package, GeneratedFile, Granularity, GENERATED_HEADER};
pub use write::write_atomic;

// Logging
pub use logging::init_structured_logging;

// Reporting
pub use report::{format_plain, print_json, print_plain, GenerateReport, ReportEntry};
