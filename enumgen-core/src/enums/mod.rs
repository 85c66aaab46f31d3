//! Enumeration discovery.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │ enum_extractor.rs   │     │   pattern.rs        │
//! │  ─────────────────  │◄────│  ─────────────────  │
//! │  Walk const groups, │     │  Which type names   │
//! │  one pair per name  │     │  are enumerations   │
//! └──────────┬──────────┘     └─────────────────────┘
//!            │ (EnumDefinition, member) per unit
//!            ▼
//! ┌─────────────────────┐
//! │   enum_merge.rs     │
//! │  ─────────────────  │
//! │  Combine by key,    │
//! │  sort and dedup     │
//! └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use enumgen_core::enums::{extract, merge, compile_pattern, DEFAULT_ENUM_PATTERN};
//!
//! let matcher = compile_pattern(DEFAULT_ENUM_PATTERN)?;
//! let pairs = loaded
//!     .units
//!     .iter()
//!     .flat_map(|unit| extract(unit, &loaded.symbols, &matcher));
//! let mapping = merge(pairs);
//!
//! for (_, e) in mapping.iter() {
//!     println!("{} ({}): {:?}", e.definition.name, e.definition.base_type, e.members);
//! }
//! ```

pub mod enum_extractor;
pub mod enum_merge;
pub mod pattern;

pub use enum_extractor::{extract, EnumDefinition};
pub use enum_merge::{merge, CanonicalMapping, EnumKey, MergedEnum, PackageGroup};
pub use pattern::{compile_pattern, NameMatcher, DEFAULT_ENUM_PATTERN};
