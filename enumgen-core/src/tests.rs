//! End-to-end test suite for enumgen-core.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_tree() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("enumgen_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).unwrap();
    dir.canonicalize().unwrap()
}

fn generated_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("enumgen"))
        .collect();
    names.sort();
    names
}

fn members<'a>(mapping: &'a CanonicalMapping, name: &str) -> Vec<&'a str> {
    mapping
        .find(name)
        .unwrap_or_else(|| panic!("{} not found", name))
        .members
        .iter()
        .map(String::as_str)
        .collect()
}

const PKG1: &str = r#"package pkg1

const (
	TestVal01 = iota
	TestVal02
	TestVal03
)

type Test1Enum uint8

const (
	TestVal11 Test1Enum = iota
	TestVal12 Test1Enum = iota
	TestVal13 Test1Enum = iota
)

type Test2Enum uint8

const (
	TestVal21 Test2Enum = 0
	TestVal22 Test2Enum = 1
	TestVal23 Test2Enum = 2
)

const (
	TestVal24 Test2Enum = 3
)

type Test3Enum Test1Enum

const (
	TestVal31 Test3Enum = 0
	TestVal32 Test3Enum = 1
	TestVal33 Test3Enum = 2
)
"#;

const PKG1_TEST: &str = r#"package pkg1_test

import (
	"testing"

	"example.com/silly/pkg1"
)

type Test1Enum uint8

const (
	TestVal11 Test1Enum = iota
	TestVal12 Test1Enum = iota
)

func TestTest1Enum(t *testing.T) {
	t.Logf("%T %v %#+v", pkg1.TestVal11, pkg1.TestVal11, pkg1.TestVal11)
}
"#;

// Core Test 1: mixed package with an external test package
#[test]
fn test_pkg1_generation() {
    let root = setup_temp_tree();
    let pkg = root.join("pkg1");
    write_file(&pkg.join("testdata.go"), PKG1);
    write_file(&pkg.join("testdata_test.go"), PKG1_TEST);

    let report = Generator::new([&root]).run().unwrap();

    assert_eq!(
        generated_files(&pkg),
        vec![
            "enumgen_Test1Enum.go",
            "enumgen_Test1Enum_x_test.go",
            "enumgen_Test2Enum.go",
            "enumgen_Test3Enum.go",
        ]
    );
    assert_eq!(report.enums.len(), 4);
    assert_eq!(report.files.len(), 4);
    assert!(!report.dry_run);

    let test2 = report.enums.iter().find(|e| e.name == "Test2Enum").unwrap();
    assert_eq!(
        test2.members,
        vec!["TestVal21", "TestVal22", "TestVal23", "TestVal24"]
    );
    let test3 = report.enums.iter().find(|e| e.name == "Test3Enum").unwrap();
    assert_eq!(test3.base_type, "uint8");

    let external = fs::read_to_string(pkg.join("enumgen_Test1Enum_x_test.go")).unwrap();
    assert!(external.contains("package pkg1_test"));
    assert!(external.contains("\tTestVal11,\n\tTestVal12,\n}"));

    fs::remove_dir_all(&root).ok();
}

// Core Test 2: test files skipped on request
#[test]
fn test_exclude_tests() {
    let root = setup_temp_tree();
    write_file(&root.join("pkg1/testdata.go"), PKG1);
    write_file(&root.join("pkg1/testdata_test.go"), PKG1_TEST);

    let mapping = Generator::new([&root])
        .include_tests(false)
        .discover()
        .unwrap();
    assert_eq!(mapping.len(), 3);
    assert!(mapping.iter().all(|(k, _)| !k.is_test));

    fs::remove_dir_all(&root).ok();
}

// Core Test 3: members spread over files are merged
#[test]
fn test_members_across_files() {
    let root = setup_temp_tree();
    write_file(
        &root.join("status.go"),
        r#"package account

type StatusEnum string

const (
	Active    StatusEnum = "active"
	Inactive  StatusEnum = "inactive"
	Suspended StatusEnum = "suspended"
)
"#,
    );

    let mapping = Generator::new([&root]).discover().unwrap();
    assert_eq!(
        members(&mapping, "StatusEnum"),
        vec!["Active", "Inactive", "Suspended"]
    );

    write_file(
        &root.join("status_archived.go"),
        "package account\n\nconst Archived StatusEnum = \"archived\"\n",
    );
    let mapping = Generator::new([&root]).discover().unwrap();
    assert_eq!(
        members(&mapping, "StatusEnum"),
        vec!["Active", "Archived", "Inactive", "Suspended"]
    );
    assert_eq!(mapping.find("StatusEnum").unwrap().definition.base_type, "string");

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_untyped_member_dropped_across_files() {
    let root = setup_temp_tree();
    write_file(
        &root.join("a.go"),
        r#"package account

type StatusEnum int

const (
	Active StatusEnum = 0
	Inactive
	Suspended = 2
)
"#,
    );

    let mapping = Generator::new([&root]).discover().unwrap();
    assert_eq!(members(&mapping, "StatusEnum"), vec!["Active", "Inactive"]);

    write_file(
        &root.join("b.go"),
        "package account\n\nconst Archived StatusEnum = 3\n",
    );
    let mapping = Generator::new([&root]).discover().unwrap();
    assert_eq!(
        members(&mapping, "StatusEnum"),
        vec!["Active", "Archived", "Inactive"]
    );
    assert_eq!(mapping.find("StatusEnum").unwrap().definition.base_type, "int");

    fs::remove_dir_all(&root).ok();
}

// Core Test 4: iota with carried type
#[test]
fn test_carried_type_iota() {
    let root = setup_temp_tree();
    write_file(
        &root.join("color.go"),
        r#"package paint

type ColorEnum int

const (
	Red ColorEnum = iota
	Green
	Blue
)

type SomeOtherType struct{}

const X = SomeOtherType{}
"#,
    );

    let mapping = Generator::new([&root]).discover().unwrap();
    assert_eq!(mapping.len(), 1);
    let color = mapping.find("ColorEnum").unwrap();
    assert_eq!(color.definition.base_type, "int");
    assert_eq!(color.members, vec!["Blue", "Green", "Red"]);

    fs::remove_dir_all(&root).ok();
}

// Core Test 5: dry run writes nothing
#[test]
fn test_dry_run() {
    let root = setup_temp_tree();
    write_file(&root.join("pkg1/testdata.go"), PKG1);

    let report = Generator::new([&root]).dry_run(true).run().unwrap();
    assert!(report.dry_run);
    assert_eq!(report.files.len(), 3);
    assert!(generated_files(&root.join("pkg1")).is_empty());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_in_package_test_members_get_own_file() {
    let root = setup_temp_tree();
    write_file(
        &root.join("status.go"),
        "package account\n\ntype StatusEnum int\n\nconst Active StatusEnum = 1\n",
    );
    write_file(
        &root.join("status_test.go"),
        "package account\n\nconst Pending StatusEnum = 9\n",
    );

    let report = Generator::new([&root]).dry_run(true).run().unwrap();
    let names: Vec<String> = report
        .files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["enumgen_StatusEnum.go", "enumgen_StatusEnum_test.go"]);
    assert!(report.enums.iter().all(|e| e.package == "account"));
    assert_eq!(report.enums[1].members, vec!["Pending"]);

    fs::remove_dir_all(&root).ok();
}

// Core Test 6: one file per package
#[test]
fn test_package_granularity() {
    let root = setup_temp_tree();
    let pkg = root.join("pkg1");
    write_file(&pkg.join("testdata.go"), PKG1);
    write_file(&pkg.join("testdata_test.go"), PKG1_TEST);

    let report = Generator::new([&root])
        .granularity(Granularity::Package)
        .run()
        .unwrap();

    assert_eq!(
        generated_files(&pkg),
        vec!["enumgen.go", "enumgen_x_test.go"]
    );
    assert!(report
        .enums
        .iter()
        .filter(|e| !e.is_test)
        .all(|e| e.file == pkg.join("enumgen.go")));

    let content = fs::read_to_string(pkg.join("enumgen.go")).unwrap();
    assert_eq!(content.matches("package pkg1\n").count(), 1);
    assert!(content.contains("func Test1EnumValues()"));
    assert!(content.contains("func Test2EnumValues()"));
    assert!(content.contains("func Test3EnumValues()"));

    fs::remove_dir_all(&root).ok();
}

// Core Test 7: generated output is stable across runs
#[test]
fn test_rerun_is_stable() {
    let root = setup_temp_tree();
    write_file(&root.join("pkg1/testdata.go"), PKG1);

    Generator::new([&root]).run().unwrap();
    let first = fs::read_to_string(root.join("pkg1/enumgen_Test2Enum.go")).unwrap();

    let report = Generator::new([&root]).run().unwrap();
    let second = fs::read_to_string(root.join("pkg1/enumgen_Test2Enum.go")).unwrap();

    assert_eq!(first, second);
    assert_eq!(report.enums.len(), 3);

    fs::remove_dir_all(&root).ok();
}

// Core Test 8: custom name pattern
#[test]
fn test_custom_pattern() {
    let root = setup_temp_tree();
    write_file(
        &root.join("kinds.go"),
        "package k\n\ntype NodeKind int\ntype ModeEnum int\n\nconst (\n\tLeaf NodeKind = iota\n\tBranch\n)\n\nconst Fast ModeEnum = 1\n",
    );

    let mapping = Generator::new([&root])
        .enum_pattern("^.+Kind$")
        .discover()
        .unwrap();
    assert_eq!(mapping.len(), 1);
    assert_eq!(members(&mapping, "NodeKind"), vec!["Branch", "Leaf"]);

    fs::remove_dir_all(&root).ok();
}

// Core Test 9: load failures write nothing
#[test]
fn test_syntax_error_aborts_run() {
    let root = setup_temp_tree();
    write_file(&root.join("a/ok.go"), PKG1.replace("pkg1", "a").as_str());
    write_file(&root.join("b/broken.go"), "package b\n\nconst (\n\tX BrokenEnum = \n");

    let err = Generator::new([&root]).run().unwrap_err();
    assert!(matches!(err, EnumgenError::Load { .. }));
    assert!(generated_files(&root.join("a")).is_empty());

    fs::remove_dir_all(&root).ok();
}

// Core Test 10: same type name in different packages stays separate
#[test]
fn test_same_name_in_two_packages() {
    let root = setup_temp_tree();
    write_file(
        &root.join("one/a.go"),
        "package one\n\ntype LevelEnum int\n\nconst Low LevelEnum = 1\n",
    );
    write_file(
        &root.join("two/a.go"),
        "package two\n\ntype LevelEnum string\n\nconst High LevelEnum = \"h\"\n",
    );

    let report = Generator::new([&root]).run().unwrap();
    assert_eq!(report.enums.len(), 2);
    assert_eq!(report.enums[0].members, vec!["Low"]);
    assert_eq!(report.enums[1].members, vec!["High"]);
    assert!(root.join("one/enumgen_LevelEnum.go").exists());
    assert!(root.join("two/enumgen_LevelEnum.go").exists());

    fs::remove_dir_all(&root).ok();
}

// Core Test 11: build constraints select files
#[test]
fn test_build_tags_select_members() {
    let root = setup_temp_tree();
    write_file(
        &root.join("mode.go"),
        "package m\n\ntype ModeEnum int\n\nconst Normal ModeEnum = 0\n",
    );
    write_file(
        &root.join("mode_debug.go"),
        "//go:build debug\n\npackage m\n\nconst Debug ModeEnum = 1\n",
    );
    write_file(
        &root.join("mode_windows.go"),
        "package m\n\nconst Service ModeEnum = 2\n",
    );

    let mapping = Generator::new([&root])
        .env_vars(["GOOS=linux"])
        .discover()
        .unwrap();
    assert_eq!(members(&mapping, "ModeEnum"), vec!["Normal"]);

    let mapping = Generator::new([&root])
        .build_tags(["debug"])
        .env_vars(["GOOS=windows"])
        .discover()
        .unwrap();
    assert_eq!(
        members(&mapping, "ModeEnum"),
        vec!["Debug", "Normal", "Service"]
    );

    fs::remove_dir_all(&root).ok();
}

// Core Test 12: underlying type through another package of the module
#[test]
fn test_cross_package_base_type() {
    let root = setup_temp_tree();
    write_file(&root.join("go.mod"), "module example.com/shop\n\ngo 1.22\n");
    write_file(
        &root.join("internal/codes/code.go"),
        "package codes\n\ntype Code uint16\n",
    );
    write_file(
        &root.join("orders/state.go"),
        r#"package orders

import (
	"time"

	"example.com/shop/internal/codes"
)

type StateEnum codes.Code

type DelayEnum time.Duration

const (
	Pending StateEnum = iota
	Shipped
)

const Short DelayEnum = 1
"#,
    );

    let mapping = Generator::new([root.join("orders")]).discover().unwrap();
    assert_eq!(mapping.find("StateEnum").unwrap().definition.base_type, "uint16");
    assert_eq!(
        mapping.find("DelayEnum").unwrap().definition.base_type,
        "time.Duration"
    );
    assert_eq!(members(&mapping, "StateEnum"), vec!["Pending", "Shipped"]);

    fs::remove_dir_all(&root).ok();
}

// Core Test 13: no matches is a successful, empty run
#[test]
fn test_nothing_found() {
    let root = setup_temp_tree();
    write_file(&root.join("a.go"), "package a\n\nconst X = 1\n");

    let report = Generator::new([&root]).run().unwrap();
    assert!(report.enums.is_empty());
    assert!(report.files.is_empty());
    assert_eq!(format_plain(&report), "No enumerations found.\n");

    fs::remove_dir_all(&root).ok();
}
