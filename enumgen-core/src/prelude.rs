//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use enumgen_core::prelude::*;
//! ```

// Errors
pub use crate::error::{EnumgenError, EnumgenResult};

// Builder API
pub use crate::generate::Generator;
pub use crate::render::Granularity;

// Loading and resolution
pub use crate::loader::{load, CompilationUnit, LoadOptions, LoadedSources};
pub use crate::symbols::{ResolvedType, SymbolTable, TypeResolver};

// Extraction and merging
pub use crate::enums::{
    compile_pattern, extract, merge, CanonicalMapping, EnumDefinition, MergedEnum, NameMatcher,
    DEFAULT_ENUM_PATTERN,
};

// Configuration
pub use crate::config::{load_config, EnumgenConfig};

// Reporting
pub use crate::report::GenerateReport;
