use assert_fs::prelude::*;
use clap::Parser;
use kmparse::cli::{Cli, Commands};
use predicates::prelude::*;

mod util;
use util::{CLASS_REPORT, class_smali, facade_smali, kmparse, make_apk_fixture};

#[test]
fn default_command_flag_parsing()
{
    let cli = Cli::parse_from(["kmparse", "--all", "--force", "in", "out"]);

    assert!(cli.command.is_none());
    assert!(cli.parse.all);
    assert!(cli.parse.force);
    assert!(
        cli.parse
            .source
            .is_some_and(|p| p.ends_with("in"))
    );
}

#[test]
fn init_subcommand_parsing()
{
    let cli = Cli::parse_from(["kmparse", "init", "cfg"]);
    match cli.command
    {
        Some(Commands::Init(args)) =>
        {
            assert!(
                args.path
                    .ends_with("cfg")
            );
            assert!(!args.force);
        }
        _ => panic!("expected Init command"),
    }
}

#[test]
fn multi_root_output_is_merged()
{
    let tmp = make_apk_fixture();
    let dest = tmp.child("dest");

    kmparse()
        .current_dir(tmp.path())
        .arg("apk")
        .arg(dest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished"));

    let out = dest.child("KotlinClassMetadata/smali/com/example");
    out.child("App.txt")
        .assert(CLASS_REPORT);
    out.child("Utils.txt")
        .assert(predicate::str::starts_with("Type: Multi-File Class Facade"));
    out.child("Plain.txt")
        .assert(predicate::path::missing());
    dest.child("KotlinClassMetadata/smali_classes2")
        .assert(predicate::path::missing());
}

#[test]
fn all_flag_keeps_roots_separate()
{
    let tmp = make_apk_fixture();
    let dest = tmp.child("dest");

    kmparse()
        .current_dir(tmp.path())
        .args(["--all", "apk"])
        .arg(dest.path())
        .assert()
        .success();

    let out = dest.child("KotlinClassMetadata/apk");
    out.child("smali/com/example/App.txt")
        .assert(predicate::path::is_file());
    out.child("smali_classes2/com/example/Utils.txt")
        .assert(predicate::path::is_file());
}

#[test]
fn existing_output_requires_force()
{
    let tmp = make_apk_fixture();
    let dest = tmp.child("dest");
    dest.child("KotlinClassMetadata/stale.txt")
        .write_str("old")
        .expect("write stale");

    kmparse()
        .current_dir(tmp.path())
        .arg("apk")
        .arg(dest.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    dest.child("KotlinClassMetadata/smali")
        .assert(predicate::path::missing());

    kmparse()
        .current_dir(tmp.path())
        .args(["-f", "apk"])
        .arg(dest.path())
        .assert()
        .success();
    dest.child("KotlinClassMetadata/stale.txt")
        .assert(predicate::path::missing());
    dest.child("KotlinClassMetadata/smali/com/example/App.txt")
        .assert(predicate::path::is_file());
}

#[test]
fn existing_destination_without_output_requires_force()
{
    let tmp = make_apk_fixture();
    let dest = tmp.child("dest");
    dest.create_dir_all()
        .expect("create dest");

    kmparse()
        .current_dir(tmp.path())
        .arg("apk")
        .arg(dest.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Destination directory already exists"));
    dest.child("KotlinClassMetadata")
        .assert(predicate::path::missing());
}

#[test]
fn destination_defaults_to_working_directory()
{
    let tmp = make_apk_fixture();

    kmparse()
        .current_dir(tmp.path())
        .arg("apk")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    kmparse()
        .current_dir(tmp.path())
        .args(["-f", "apk"])
        .assert()
        .success();
    tmp.child("KotlinClassMetadata/smali/com/example/App.txt")
        .assert(CLASS_REPORT);
}

#[test]
fn missing_source_is_an_error()
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    kmparse()
        .current_dir(tmp.path())
        .arg("does-not-exist")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn nothing_found_is_not_an_error()
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("input/readme.md")
        .write_str("no smali here")
        .expect("write");
    tmp.child("input/Plain.smali")
        .write_str(".class public LPlain;\n")
        .expect("write");

    kmparse()
        .current_dir(tmp.path())
        .args(["input", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No Kotlin annotated smali files found"));

    tmp.child("out")
        .assert(predicate::path::missing());
}

#[test]
fn single_file_source_writes_one_report()
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("App.smali")
        .write_str(&class_smali())
        .expect("write");

    kmparse()
        .current_dir(tmp.path())
        .args(["App.smali", "out"])
        .assert()
        .success();

    tmp.child("out/KotlinClassMetadata/App.txt")
        .assert(CLASS_REPORT);
}

#[test]
fn dry_run_writes_nothing()
{
    let tmp = make_apk_fixture();

    kmparse()
        .current_dir(tmp.path())
        .args(["--dry-run", "--no-color", "apk", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("App.txt"));

    tmp.child("out")
        .assert(predicate::path::missing());
}

#[test]
fn config_supplies_default_destination()
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("kmparse.toml")
        .write_str("default_destination = \"reports\"\n")
        .expect("write config");
    tmp.child("src/com/Utils.smali")
        .write_str(&facade_smali("com/Utils"))
        .expect("write");

    kmparse()
        .current_dir(tmp.path())
        .arg("src")
        .assert()
        .success();

    tmp.child("reports/KotlinClassMetadata/src/com/Utils.txt")
        .assert(predicate::str::contains("Class: com/Utils"));
}

#[test]
fn init_refuses_to_overwrite()
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    kmparse()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp.child("kmparse.toml")
        .assert(predicate::str::contains("log_level"));

    kmparse()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    kmparse()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn completions_to_stdout()
{
    kmparse()
        .args(["completions", "bash", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kmparse"));
}
