//! enumgen CLI: generates helper methods for enumeration-like Go constants.
//!
//! Scans the given directories (recursively, like `./...`) for constants
//! whose type name matches `--enum-name`, and writes one generated Go file
//! per enumeration (or per package with `--granularity package`).
//!
//! Exit codes: 0 on success (including when nothing matched), 2 on error.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use enumgen_core::{
    init_structured_logging, load_config, load_config_file, print_json, print_plain,
    EnumgenConfig, Generator, Granularity, OutputFormat,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Enumeration helper generator for Go packages")]
pub struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./enumgen.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan directories and write enumeration helpers
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directories to scan, each including its subdirectories
    #[arg(required = true, value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Build tags, comma or space separated (repeatable)
    #[arg(long = "build-tags", value_name = "TAGS")]
    pub build_tags: Vec<String>,

    /// Environment overrides such as GOOS=linux (repeatable)
    #[arg(long = "env-vars", value_name = "KEY=VALUE")]
    pub env_vars: Vec<String>,

    /// Skip _test.go files
    #[arg(long = "exclude-tests")]
    pub exclude_tests: bool,

    /// Regex selecting enumeration type names [default: ^.+Enum$]
    #[arg(long = "enum-name", value_name = "REGEX", value_parser = parse_regex)]
    pub enum_name: Option<String>,

    /// One generated file per enumeration or per package [default: enum]
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Report what would be written without touching the filesystem
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GranularityArg {
    Enum,
    Package,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Enum => Granularity::Enum,
            GranularityArg::Package => Granularity::Package,
        }
    }
}

fn parse_regex(s: &str) -> std::result::Result<String, String> {
    regex::Regex::new(s)
        .map(|_| s.to_string())
        .map_err(|e| format!("invalid regex: {}", e))
}

/// Settings after combining command-line flags with the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    dirs: Vec<PathBuf>,
    build_tags: Vec<String>,
    env_vars: Vec<String>,
    include_tests: bool,
    enum_name: Option<String>,
    granularity: Granularity,
    dry_run: bool,
    json: bool,
}

/// Flags win over config values; list options are concatenated, config first.
fn merge_settings(args: GenerateArgs, config: EnumgenConfig) -> Settings {
    let mut build_tags = config.build_tags.unwrap_or_default();
    build_tags.extend(args.build_tags);
    let mut env_vars = config.env_vars.unwrap_or_default();
    env_vars.extend(args.env_vars);

    let config_json = config
        .output
        .and_then(|o| o.format)
        .map(|f| f == OutputFormat::Json)
        .unwrap_or(false);

    Settings {
        dirs: args.dirs,
        build_tags,
        env_vars,
        include_tests: !(args.exclude_tests || config.exclude_tests.unwrap_or(false)),
        enum_name: args.enum_name.or(config.enum_name),
        granularity: args
            .granularity
            .map(Granularity::from)
            .or(config.granularity)
            .unwrap_or_default(),
        dry_run: args.dry_run,
        json: args.json || config_json,
    }
}

fn read_config(explicit: Option<&Path>) -> Result<EnumgenConfig> {
    match explicit {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(load_config(Path::new("."))
            .context("Failed to load enumgen.toml")?
            .unwrap_or_default()),
    }
}

fn generate(settings: Settings) -> Result<()> {
    let mut generator = Generator::new(settings.dirs)
        .build_tags(settings.build_tags)
        .env_vars(settings.env_vars)
        .include_tests(settings.include_tests)
        .granularity(settings.granularity)
        .dry_run(settings.dry_run);
    if let Some(pattern) = settings.enum_name {
        generator = generator.enum_pattern(pattern);
    }

    let report = generator.run().context("Generation failed")?;

    if settings.json {
        print_json(&report);
    } else {
        print_plain(&report);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = read_config(cli.config.as_deref())?;
    debug!(config = ?config, "Configuration loaded");
    match cli.command {
        Command::Generate(args) => generate(merge_settings(args, config)),
    }
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] enumgen internal error: {}", info);
        std::process::exit(2);
    }));

    let cli = Cli::parse();
    init_structured_logging(cli.verbose);

    if let Err(e) = run(cli) {
        error!(error = %format!("{:#}", e), "enumgen failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumgen_core::{parse_config, OutputConfig};

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["enumgen"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Generate(args) => args,
        }
    }

    #[test]
    fn test_parse_generate_minimal() {
        let args = generate_args(&["generate", "./pkg"]);
        assert_eq!(args.dirs, vec![PathBuf::from("./pkg")]);
        assert!(!args.exclude_tests);
        assert!(args.enum_name.is_none());
        assert!(args.granularity.is_none());
    }

    #[test]
    fn test_parse_generate_all_flags() {
        let args = generate_args(&[
            "generate",
            "a",
            "b",
            "--build-tags",
            "integration",
            "--build-tags=e2e",
            "--env-vars",
            "GOOS=linux",
            "--exclude-tests",
            "--enum-name",
            "^.+Kind$",
            "--granularity",
            "package",
            "--dry-run",
            "--json",
        ]);
        assert_eq!(args.dirs.len(), 2);
        assert_eq!(args.build_tags, vec!["integration", "e2e"]);
        assert_eq!(args.env_vars, vec!["GOOS=linux"]);
        assert!(args.exclude_tests);
        assert_eq!(args.enum_name.as_deref(), Some("^.+Kind$"));
        assert_eq!(args.granularity, Some(GranularityArg::Package));
        assert!(args.dry_run);
        assert!(args.json);
    }

    #[test]
    fn test_parse_requires_dir() {
        assert!(Cli::try_parse_from(["enumgen", "generate"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_regex() {
        assert!(Cli::try_parse_from(["enumgen", "generate", ".", "--enum-name", "(["]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["enumgen", "generate", ".", "--verbose", "--config", "x.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_merge_defaults() {
        let settings = merge_settings(generate_args(&["generate", "."]), EnumgenConfig::default());
        assert!(settings.include_tests);
        assert_eq!(settings.granularity, Granularity::Enum);
        assert!(settings.build_tags.is_empty());
        assert!(!settings.json);
    }

    #[test]
    fn test_merge_config_and_flags() {
        let config = parse_config(
            Path::new("enumgen.toml"),
            r#"
enum_name = "^.+Config$"
build_tags = ["linux"]
env_vars = ["GOARCH=arm64"]
exclude_tests = true
granularity = "package"

[output]
format = "json"
"#,
        )
        .unwrap();
        let args = generate_args(&[
            "generate",
            ".",
            "--build-tags",
            "e2e",
            "--enum-name",
            "^.+Enum$",
            "--granularity",
            "enum",
        ]);
        let settings = merge_settings(args, config);
        assert_eq!(settings.build_tags, vec!["linux", "e2e"]);
        assert_eq!(settings.env_vars, vec!["GOARCH=arm64"]);
        assert!(!settings.include_tests);
        assert_eq!(settings.enum_name.as_deref(), Some("^.+Enum$"));
        assert_eq!(settings.granularity, Granularity::Enum);
        assert!(settings.json);
    }

    #[test]
    fn test_merge_plain_output_config() {
        let config = EnumgenConfig {
            output: Some(OutputConfig {
                format: Some(OutputFormat::Plain),
            }),
            ..Default::default()
        };
        let settings = merge_settings(generate_args(&["generate", "."]), config);
        assert!(!settings.json);
    }

    #[test]
    fn test_read_missing_explicit_config_fails() {
        assert!(read_config(Some(Path::new("/nonexistent/enumgen.toml"))).is_err());
    }
}
