//! Output formatting - plaintext and JSON.

use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

use crate::enums::{CanonicalMapping, EnumDefinition};

/// One enumeration in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub base_type: String,
    pub package: String,
    pub dir: PathBuf,
    pub is_test: bool,
    pub members: Vec<String>,
    /// Generated file holding this enumeration
    pub file: PathBuf,
}

/// Summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    pub enums: Vec<ReportEntry>,
    /// Files written, or that would be written in a dry run
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

impl GenerateReport {
    pub fn new(
        mapping: &CanonicalMapping,
        output_path: impl Fn(&EnumDefinition) -> PathBuf,
        files: Vec<PathBuf>,
        dry_run: bool,
    ) -> Self {
        let enums = mapping
            .iter()
            .map(|(_, merged)| {
                let def = &merged.definition;
                ReportEntry {
                    name: def.name.clone(),
                    base_type: def.base_type.clone(),
                    package: def.package.clone(),
                    dir: def.dir.clone(),
                    is_test: def.is_test,
                    members: merged.members.clone(),
                    file: output_path(def),
                }
            })
            .collect();
        Self {
            enums,
            files,
            dry_run,
        }
    }
}

/// Formats a report as plain text.
pub fn format_plain(report: &GenerateReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_plain(&mut out, report);
    out
}

fn write_plain(out: &mut String, report: &GenerateReport) -> std::fmt::Result {
    if report.enums.is_empty() {
        writeln!(out, "No enumerations found.")?;
        return Ok(());
    }

    writeln!(out, "ENUMERATIONS ({}):", report.enums.len())?;
    for entry in &report.enums {
        let test = if entry.is_test { " [test]" } else { "" };
        writeln!(
            out,
            "- {}.{} ({}){} in {}",
            entry.package,
            entry.name,
            entry.base_type,
            test,
            entry.dir.display()
        )?;
        writeln!(out, "    {}", entry.members.join(", "))?;
    }

    let verb = if report.dry_run { "WOULD WRITE" } else { "WROTE" };
    writeln!(out, "{} ({}):", verb, report.files.len())?;
    for file in &report.files {
        writeln!(out, "- {}", file.display())?;
    }
    Ok(())
}

/// Prints a report in plain text format.
pub fn print_plain(report: &GenerateReport) {
    print!("{}", format_plain(report));
}

/// Prints a report in JSON format.
pub fn print_json(report: &GenerateReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"enums\": {}, \"files\": {}}}", report.enums.len(), report.files.len());
        }
    }
}
