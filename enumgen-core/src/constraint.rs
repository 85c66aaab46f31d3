//! Build constraint evaluation.
//!
//! Decides whether a Go file takes part in the build for the requested
//! tags and target platform:
//! - `//go:build` expressions (`linux && (amd64 || arm64) && !cgo`)
//! - legacy `// +build` lines, used only when no `//go:build` line exists
//! - `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` file-name suffixes
//!
//! GOOS, GOARCH and CGO_ENABLED come from the effective environment: the
//! process environment overlaid with the caller's overrides.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{EnumgenError, EnumgenResult};

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Parses `KEY=VALUE` overrides. A missing `=` or an empty key is an error.
pub fn parse_env_overrides(entries: &[String]) -> EnumgenResult<BTreeMap<String, String>> {
    let mut env = BTreeMap::new();
    for entry in entries {
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                env.insert(key.trim().to_string(), value.to_string());
            }
            _ => {
                return Err(EnumgenError::invalid_argument(format!(
                    "environment override {:?} is not of the form KEY=VALUE",
                    entry
                )))
            }
        }
    }
    Ok(env)
}

/// Splits build-tag arguments. Each value may contain several tags separated
/// by commas or whitespace, optionally prefixed with `-tags=`.
pub fn parse_build_tags(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim())
        .map(|v| v.strip_prefix("-tags=").unwrap_or(v))
        .flat_map(|v| v.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn host_goos() -> String {
    match std::env::consts::OS {
        "macos" => "darwin".to_string(),
        other => other.to_string(),
    }
}

fn host_goarch() -> String {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "wasm32" => "wasm",
        "loongarch64" => "loong64",
        other => other,
    }
    .to_string()
}

/// The target a build is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub cgo: bool,
    pub tags: BTreeSet<String>,
}

impl BuildContext {
    /// Builds the context from tag arguments and `KEY=VALUE` overrides laid
    /// over the process environment.
    pub fn from_args(build_tags: &[String], env_overrides: &[String]) -> EnumgenResult<Self> {
        let overrides = parse_env_overrides(env_overrides)?;
        let lookup = |key: &str| {
            overrides
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
                .filter(|v| !v.is_empty())
        };
        Ok(Self::new(
            parse_build_tags(build_tags),
            lookup("GOOS"),
            lookup("GOARCH"),
            lookup("CGO_ENABLED"),
        ))
    }

    /// Builds a context; absent values default to the host platform, with
    /// cgo enabled only for native builds.
    pub fn new(
        tags: BTreeSet<String>,
        goos: Option<String>,
        goarch: Option<String>,
        cgo_enabled: Option<String>,
    ) -> Self {
        let goos = goos.unwrap_or_else(host_goos);
        let goarch = goarch.unwrap_or_else(host_goarch);
        let cgo = match cgo_enabled.as_deref() {
            Some(v) => v == "1",
            None => goos == host_goos() && goarch == host_goarch(),
        };
        Self {
            goos,
            goarch,
            cgo,
            tags,
        }
    }

    fn matches_os(&self, os: &str) -> bool {
        self.goos == os
            || (os == "linux" && self.goos == "android")
            || (os == "solaris" && self.goos == "illumos")
            || (os == "darwin" && self.goos == "ios")
    }

    /// Whether a single build tag is satisfied.
    pub fn matches_tag(&self, tag: &str) -> bool {
        if self.tags.contains(tag) || self.matches_os(tag) || self.goarch == tag {
            return true;
        }
        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "cgo" => self.cgo,
            "gc" => true,
            _ => is_release_tag(tag),
        }
    }

    /// Applies the `_GOOS` / `_GOARCH` / `_GOOS_GOARCH` file-name rules.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let stem = stem.strip_suffix("_test").unwrap_or(stem);
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 2 {
            return true;
        }
        let last = parts[parts.len() - 1];
        let prev = parts[parts.len() - 2];
        if parts.len() >= 3 && KNOWN_OS.contains(&prev) && KNOWN_ARCH.contains(&last) {
            return self.matches_os(prev) && self.goarch == last;
        }
        if KNOWN_OS.contains(&last) {
            return self.matches_os(last);
        }
        if KNOWN_ARCH.contains(&last) {
            return self.goarch == last;
        }
        true
    }

    /// Evaluates the constraint lines in the file header.
    pub fn matches_source(&self, source: &str) -> Result<bool, String> {
        match header_constraint(source)? {
            Some(constraint) => Ok(constraint.eval(self)),
            None => Ok(true),
        }
    }
}

/// `go1.N` release tags are all satisfied.
fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .is_some_and(|minor| !minor.is_empty() && minor.chars().all(|c| c.is_ascii_digit()))
}

/// A parsed build constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Tag(String),
    Not(Box<Constraint>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    pub fn eval(&self, ctx: &BuildContext) -> bool {
        match self {
            Constraint::Tag(tag) => ctx.matches_tag(tag),
            Constraint::Not(inner) => !inner.eval(ctx),
            Constraint::And(a, b) => a.eval(ctx) && b.eval(ctx),
            Constraint::Or(a, b) => a.eval(ctx) || b.eval(ctx),
        }
    }

    fn and(self, other: Constraint) -> Constraint {
        Constraint::And(Box::new(self), Box::new(other))
    }

    fn or(self, other: Constraint) -> Constraint {
        Constraint::Or(Box::new(self), Box::new(other))
    }
}

/// Finds the constraint of a file: the `//go:build` line if present,
/// otherwise the conjunction of its `// +build` lines.
///
/// Only the header is searched: blank lines and comments before the first
/// line of code.
pub fn header_constraint(source: &str) -> Result<Option<Constraint>, String> {
    let mut go_build: Option<Constraint> = None;
    let mut plus_build: Option<Constraint> = None;
    let mut in_block = false;

    for line in source.lines() {
        let line = line.trim();
        if in_block {
            if let Some(idx) = line.find("*/") {
                in_block = false;
                if !line[idx + 2..].trim().is_empty() {
                    break;
                }
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        if line.starts_with("/*") {
            in_block = !line[2..].contains("*/");
            continue;
        }
        let Some(comment) = line.strip_prefix("//") else {
            break;
        };

        if let Some(expr) = comment.strip_prefix("go:build") {
            if !expr.is_empty() && !expr.starts_with(char::is_whitespace) {
                continue;
            }
            if go_build.is_some() {
                return Err("multiple //go:build comments".to_string());
            }
            go_build = Some(parse_go_build(expr)?);
        } else if let Some(expr) = comment.trim_start().strip_prefix("+build") {
            if !expr.is_empty() && !expr.starts_with(char::is_whitespace) {
                continue;
            }
            let line_constraint = parse_plus_build(expr)?;
            plus_build = Some(match plus_build {
                Some(prev) => prev.and(line_constraint),
                None => line_constraint,
            });
        }
    }

    Ok(go_build.or(plus_build))
}

/// Parses a `// +build` line: space-separated options are OR'd, each option's
/// comma-separated terms are AND'd.
fn parse_plus_build(expr: &str) -> Result<Constraint, String> {
    let mut result: Option<Constraint> = None;
    for option in expr.split_whitespace() {
        let mut clause: Option<Constraint> = None;
        for term in option.split(',') {
            let (negated, name) = match term.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, term),
            };
            if !is_tag_name(name) {
                return Err(format!("invalid +build term {:?}", term));
            }
            let mut atom = Constraint::Tag(name.to_string());
            if negated {
                atom = Constraint::Not(Box::new(atom));
            }
            clause = Some(match clause {
                Some(prev) => prev.and(atom),
                None => atom,
            });
        }
        if let Some(clause) = clause {
            result = Some(match result {
                Some(prev) => prev.or(clause),
                None => clause,
            });
        }
    }
    result.ok_or_else(|| "empty +build line".to_string())
}

fn is_tag_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

/// Parses a `//go:build` expression.
pub fn parse_go_build(expr: &str) -> Result<Constraint, String> {
    let tokens = tokenize_expr(expr)?;
    if tokens.is_empty() {
        return Err("empty //go:build expression".to_string());
    }
    let mut parser = ExprParser { tokens, pos: 0 };
    let constraint = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!(
            "unexpected {:?} in //go:build expression",
            parser.tokens[parser.pos]
        ));
    }
    Ok(constraint)
}

fn tokenize_expr(expr: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '(' || c == ')' || c == '!' {
            tokens.push(c.to_string());
            chars.next();
        } else if c == '&' || c == '|' {
            chars.next();
            if chars.next() != Some(c) {
                return Err(format!("invalid operator {:?} in //go:build expression", c));
            }
            tokens.push(format!("{}{}", c, c));
        } else if c.is_alphanumeric() || c == '_' || c == '.' {
            let mut tag = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_alphanumeric() || c == '_' || c == '.' {
                    tag.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(tag);
        } else {
            return Err(format!("invalid character {:?} in //go:build expression", c));
        }
    }
    Ok(tokens)
}

struct ExprParser {
    tokens: Vec<String>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn parse_or(&mut self) -> Result<Constraint, String> {
        let mut left = self.parse_and()?;
        while self.peek() == Some("||") {
            self.pos += 1;
            left = left.or(self.parse_and()?);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Constraint, String> {
        let mut left = self.parse_not()?;
        while self.peek() == Some("&&") {
            self.pos += 1;
            left = left.and(self.parse_not()?);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Constraint, String> {
        match self.peek() {
            Some("!") => {
                self.pos += 1;
                Ok(Constraint::Not(Box::new(self.parse_not()?)))
            }
            Some("(") => {
                self.pos += 1;
                let inner = self.parse_or()?;
                if self.peek() != Some(")") {
                    return Err("missing ')' in //go:build expression".to_string());
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(tok) if is_tag_name(tok) => {
                let tag = tok.to_string();
                self.pos += 1;
                Ok(Constraint::Tag(tag))
            }
            Some(tok) => Err(format!("unexpected {:?} in //go:build expression", tok)),
            None => Err("unexpected end of //go:build expression".to_string()),
        }
    }
}
