//! Builder API for a generation run.
//!
//! ```rust,ignore
//! use enumgen_core::prelude::*;
//!
//! let report = Generator::new(["./internal"])
//!     .build_tags(["integration"])
//!     .env_vars(["GOOS=linux"])
//!     .include_tests(false)
//!     .enum_pattern("^.+Kind$")
//!     .granularity(Granularity::Package)
//!     .run()?;
//!
//! println!("Wrote {} files", report.files.len());
//! ```

use std::path::PathBuf;

use tracing::{debug, info};

use crate::enums::{
    compile_pattern, extract, merge, CanonicalMapping, EnumDefinition, DEFAULT_ENUM_PATTERN,
};
use crate::error::EnumgenResult;
use crate::loader::{load, LoadOptions};
use crate::render::{
    enum_file_name, package_file_name, render_enum, render_package, GeneratedFile, Granularity,
};
use crate::report::GenerateReport;
use crate::write::write_atomic;

/// Builder for configuring a generation run.
#[derive(Debug, Clone)]
pub struct Generator {
    /// Root directories, walked recursively
    dirs: Vec<PathBuf>,

    /// Build tags for constraint evaluation
    build_tags: Vec<String>,

    /// `KEY=VALUE` environment overrides
    env: Vec<String>,

    /// Whether `_test.go` files are scanned
    include_tests: bool,

    /// Regex selecting enumeration type names
    enum_pattern: String,

    /// One file per enumeration or per package
    granularity: Granularity,

    /// Render but write nothing
    dry_run: bool,
}

impl Generator {
    /// Create a new run over the given root directories.
    pub fn new(dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            build_tags: Vec::new(),
            env: Vec::new(),
            include_tests: true,
            enum_pattern: DEFAULT_ENUM_PATTERN.to_string(),
            granularity: Granularity::Enum,
            dry_run: false,
        }
    }

    /// Add build tags.
    pub fn build_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.build_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add `KEY=VALUE` environment overrides.
    pub fn env_vars(mut self, vars: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.env.extend(vars.into_iter().map(Into::into));
        self
    }

    /// Scan `_test.go` files too.
    pub fn include_tests(mut self, enabled: bool) -> Self {
        self.include_tests = enabled;
        self
    }

    /// Set the enumeration type name pattern.
    pub fn enum_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.enum_pattern = pattern.into();
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Enable dry-run mode (no files written).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Loads, extracts and merges, without rendering.
    pub fn discover(&self) -> EnumgenResult<CanonicalMapping> {
        let matcher = compile_pattern(&self.enum_pattern)?;

        let loaded = load(&LoadOptions {
            dirs: self.dirs.clone(),
            build_tags: self.build_tags.clone(),
            env: self.env.clone(),
            include_tests: self.include_tests,
        })?;

        let pairs = loaded
            .units
            .iter()
            .flat_map(|unit| extract(unit, &loaded.symbols, &matcher));
        let mapping = merge(pairs);

        info!(
            units = loaded.units.len(),
            enums = mapping.len(),
            "Discovered enumerations"
        );
        Ok(mapping)
    }

    /// Path of the generated file an enumeration ends up in.
    pub fn output_path(&self, definition: &EnumDefinition) -> PathBuf {
        match self.granularity {
            Granularity::Enum => definition.dir.join(enum_file_name(definition)),
            Granularity::Package => definition
                .dir
                .join(package_file_name(&definition.package, definition.is_test)),
        }
    }

    /// Renders every generated file, in mapping order.
    pub fn render(&self, mapping: &CanonicalMapping) -> EnumgenResult<Vec<GeneratedFile>> {
        match self.granularity {
            Granularity::Enum => mapping
                .iter()
                .map(|(_, merged)| {
                    debug!(
                        enum_name = %merged.definition.name,
                        values = ?merged.members,
                        "Generate"
                    );
                    render_enum(merged)
                })
                .collect(),
            Granularity::Package => mapping.packages().iter().map(render_package).collect(),
        }
    }

    /// Run the whole pipeline and report what was generated.
    pub fn run(&self) -> EnumgenResult<GenerateReport> {
        let mapping = self.discover()?;
        let files = self.render(&mapping)?;

        if !self.dry_run {
            for file in &files {
                write_atomic(&file.path, &file.content)?;
            }
        }

        info!(
            enums = mapping.len(),
            files = files.len(),
            dry_run = self.dry_run,
            "Generation complete"
        );

        Ok(GenerateReport::new(
            &mapping,
            |definition| self.output_path(definition),
            files.into_iter().map(|f| f.path).collect(),
            self.dry_run,
        ))
    }
}
