//! Go source loading.
//!
//! Turns root directories into parsed compilation units plus a
//! [`SymbolTable`] able to resolve every type they reference:
//!
//! 1. Discover `.go` files under each root (`./...` semantics)
//! 2. Drop test files if requested, and files excluded by build constraints
//! 3. Parse in parallel, then sort by path
//! 4. Declare types per package scope and bind imports; packages of the
//!    same Go module imported from outside the roots are loaded for their
//!    types only
//! 5. Reject invalid recursive type chains
//!
//! Any failure aborts the whole load. No partial results are returned.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::constraint::BuildContext;
use crate::error::{EnumgenError, EnumgenResult, IoResultExt};
use crate::gomod::{find_module, GoModule};
use crate::scan::{gather_go_files, gather_package_files, is_test_file};
use crate::symbols::{FileId, ImportTarget, PackageKey, SymbolTable};
use crate::syntax::{parse_file, SourceFile};
use crate::typegraph::check_cycles;

/// What to load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Root directories, each walked recursively
    pub dirs: Vec<PathBuf>,
    /// Build tags, comma or space separated
    pub build_tags: Vec<String>,
    /// `KEY=VALUE` overrides of the process environment
    pub env: Vec<String>,
    /// Whether `_test.go` files are loaded
    pub include_tests: bool,
}

/// One parsed source file under a root.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub path: PathBuf,
    /// Name from the package clause
    pub package: String,
    pub dir: PathBuf,
    /// File name ends in `_test.go`
    pub is_test: bool,
    pub file: SourceFile,
    /// Import scope in the symbol table
    pub file_id: FileId,
}

/// Result of a load.
#[derive(Debug)]
pub struct LoadedSources {
    /// Units under the roots, sorted by path
    pub units: Vec<CompilationUnit>,
    /// Types of the root packages and their same-module imports
    pub symbols: SymbolTable,
}

struct ParsedFile {
    path: PathBuf,
    file: SourceFile,
}

/// Loads every package under the option's roots.
pub fn load(options: &LoadOptions) -> EnumgenResult<LoadedSources> {
    if options.dirs.is_empty() {
        return Err(EnumgenError::invalid_argument("no directories to load"));
    }
    let ctx = BuildContext::from_args(&options.build_tags, &options.env)?;
    debug!(
        goos = %ctx.goos,
        goarch = %ctx.goarch,
        cgo = ctx.cgo,
        tags = ?ctx.tags,
        "Build context"
    );

    let mut paths = Vec::new();
    for dir in &options.dirs {
        let root = fs::canonicalize(dir)
            .map_err(|e| EnumgenError::load(dir, format!("cannot read directory: {}", e)))?;
        paths.extend(gather_go_files(&root)?);
    }
    paths.sort();
    paths.dedup();
    paths.retain(|p| options.include_tests || !is_test_file(p));

    let parsed = parse_files(&paths, &ctx)?;
    check_package_names(&parsed)?;

    let mut state = LoadState::new(ctx);
    let mut units = Vec::with_capacity(parsed.len());
    for parsed in parsed {
        let file_id = state.add(&parsed)?;
        let dir = parent_dir(&parsed.path);
        units.push(CompilationUnit {
            package: parsed.file.package.name.clone(),
            is_test: is_test_file(&parsed.path),
            path: parsed.path,
            dir,
            file: parsed.file,
            file_id,
        });
    }

    let mut queue: VecDeque<(FileId, PathBuf, SourceFile)> = units
        .iter()
        .map(|u| (u.file_id, u.path.clone(), u.file.clone()))
        .collect();
    state.bind_imports(&mut queue)?;

    check_cycles(&state.symbols)?;

    info!(
        files = units.len(),
        types = state.symbols.len(),
        "Loaded sources"
    );
    Ok(LoadedSources {
        units,
        symbols: state.symbols,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Reads, filters and parses files in parallel. Order follows `paths`.
fn parse_files(paths: &[PathBuf], ctx: &BuildContext) -> EnumgenResult<Vec<ParsedFile>> {
    let parsed = paths
        .par_iter()
        .map(|path| parse_one(path, ctx))
        .collect::<EnumgenResult<Vec<_>>>()?;
    Ok(parsed.into_iter().flatten().collect())
}

fn parse_one(path: &Path, ctx: &BuildContext) -> EnumgenResult<Option<ParsedFile>> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if !ctx.matches_file_name(name) {
        debug!(file = %path.display(), "Excluded by file name");
        return Ok(None);
    }

    let source = fs::read_to_string(path).with_path(path)?;
    let included = ctx
        .matches_source(&source)
        .map_err(|msg| EnumgenError::load(path, msg))?;
    if !included {
        debug!(file = %path.display(), "Excluded by build constraint");
        return Ok(None);
    }

    let file = parse_file(&source)
        .map_err(|e| EnumgenError::load_at(path, e.message, e.line, e.column))?;
    debug!(file = %path.display(), package = %file.package.name, "Parsed");
    Ok(Some(ParsedFile {
        path: path.to_path_buf(),
        file,
    }))
}

/// Checks that each directory holds one package, plus optionally its
/// external test package in `_test.go` files.
fn check_package_names(files: &[ParsedFile]) -> EnumgenResult<()> {
    let mut by_dir: BTreeMap<PathBuf, Vec<&ParsedFile>> = BTreeMap::new();
    for f in files {
        by_dir.entry(parent_dir(&f.path)).or_default().push(f);
    }

    for (dir, files) in by_dir {
        let base = files
            .iter()
            .find(|f| !is_test_file(&f.path))
            .or_else(|| {
                files
                    .iter()
                    .find(|f| !f.file.package.name.ends_with("_test"))
            })
            .or_else(|| files.first())
            .map(|f| {
                let name = &f.file.package.name;
                let base = if is_test_file(&f.path) {
                    name.strip_suffix("_test").unwrap_or(name)
                } else {
                    name.as_str()
                };
                (base.to_string(), f.path.clone())
            });
        let Some((base, first_path)) = base else {
            continue;
        };

        for f in files {
            let name = &f.file.package.name;
            let ok = if is_test_file(&f.path) {
                *name == base || name.strip_suffix("_test") == Some(base.as_str())
            } else {
                *name == base
            };
            if !ok {
                return Err(EnumgenError::load(
                    &dir,
                    format!(
                        "found packages {} ({}) and {} ({})",
                        base,
                        file_label(&first_path),
                        name,
                        file_label(&f.path)
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Last element of an import path, skipping major-version suffixes.
fn default_import_name(path: &str) -> String {
    let mut parts = path.rsplit('/');
    let mut last = parts.next().unwrap_or(path);
    let is_major = |s: &str| {
        s.strip_prefix('v')
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    };
    if is_major(last) {
        if let Some(prev) = parts.next() {
            last = prev;
        }
    }
    let last = match last.rsplit_once(".v") {
        Some((stem, n)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => stem,
        _ => last,
    };
    last.replace(['-', '.'], "_")
}

struct LoadState {
    ctx: BuildContext,
    symbols: SymbolTable,
    /// Non-test package name per directory with loaded sources
    dir_packages: HashMap<PathBuf, String>,
    /// Directories whose non-test files have been loaded
    loaded_dirs: HashSet<PathBuf>,
    modules: HashMap<PathBuf, Option<GoModule>>,
}

impl LoadState {
    fn new(ctx: BuildContext) -> Self {
        Self {
            ctx,
            symbols: SymbolTable::new(),
            dir_packages: HashMap::new(),
            loaded_dirs: HashSet::new(),
            modules: HashMap::new(),
        }
    }

    /// Registers a parsed file and declares its types.
    fn add(&mut self, parsed: &ParsedFile) -> EnumgenResult<FileId> {
        let dir = parent_dir(&parsed.path);
        let package = parsed.file.package.name.clone();
        if !is_test_file(&parsed.path) {
            self.dir_packages.insert(dir.clone(), package.clone());
        }
        self.loaded_dirs.insert(dir.clone());

        let file_id = self.symbols.add_file(PackageKey {
            dir,
            name: package,
        });
        for spec in parsed.file.type_specs() {
            if let Err(previous) = self.symbols.declare_type(file_id, &parsed.path, spec) {
                let previous = self.symbols.decl(previous);
                return Err(EnumgenError::load_at(
                    &parsed.path,
                    format!(
                        "{} redeclared in this block (previous declaration at {}:{}:{})",
                        spec.name.name,
                        previous.path.display(),
                        previous.span.line,
                        previous.span.column
                    ),
                    spec.name.span.line,
                    spec.name.span.column,
                ));
            }
        }
        Ok(file_id)
    }

    fn module_for(&mut self, dir: &Path) -> EnumgenResult<Option<GoModule>> {
        if let Some(cached) = self.modules.get(dir) {
            return Ok(cached.clone());
        }
        let module = find_module(dir)?;
        self.modules.insert(dir.to_path_buf(), module.clone());
        Ok(module)
    }

    /// Loads the non-test files of an imported directory, once.
    fn load_dependency(
        &mut self,
        dir: &Path,
        queue: &mut VecDeque<(FileId, PathBuf, SourceFile)>,
    ) -> EnumgenResult<()> {
        if !self.loaded_dirs.insert(dir.to_path_buf()) || !dir.is_dir() {
            return Ok(());
        }
        let paths: Vec<PathBuf> = gather_package_files(dir)?
            .into_iter()
            .filter(|p| !is_test_file(p))
            .collect();
        let parsed = parse_files(&paths, &self.ctx)?;
        check_package_names(&parsed)?;
        debug!(dir = %dir.display(), files = parsed.len(), "Loaded imported package");

        for parsed in parsed {
            let file_id = self.add(&parsed)?;
            queue.push_back((file_id, parsed.path, parsed.file));
        }
        Ok(())
    }

    /// Binds the imports of every queued file, loading same-module
    /// packages as they are discovered.
    fn bind_imports(
        &mut self,
        queue: &mut VecDeque<(FileId, PathBuf, SourceFile)>,
    ) -> EnumgenResult<()> {
        while let Some((file_id, path, file)) = queue.pop_front() {
            let dir = parent_dir(&path);
            let module = self.module_for(&dir)?;

            for import in &file.imports {
                let target_dir = module.as_ref().and_then(|m| m.dir_for_import(&import.path));
                if let Some(target_dir) = &target_dir {
                    self.load_dependency(target_dir, queue)?;
                }

                let target = target_dir.and_then(|d| {
                    self.dir_packages
                        .get(&d)
                        .map(|name| PackageKey {
                            dir: d,
                            name: name.clone(),
                        })
                });
                let (name, target) = match target {
                    Some(key) => (
                        import.name.clone().unwrap_or_else(|| key.name.clone()),
                        ImportTarget::Package(key),
                    ),
                    None => (
                        import
                            .name
                            .clone()
                            .unwrap_or_else(|| default_import_name(&import.path)),
                        ImportTarget::External(import.path.clone()),
                    ),
                };
                self.symbols.bind_import(file_id, &name, target);
            }
        }
        Ok(())
    }
}
