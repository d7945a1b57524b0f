//! Shared test utilities for integration tests
//!
//! Smali fixture text and helpers to lay it out on disk the way apktool
//! does (`smali`, `smali_classes2`, ...).

#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::prelude::*;

/// Class `com/example/App` with one function `run(): Unit`.
///
/// `d1` is in UTF-8 mode: an empty string table followed by a `Class`
/// message naming d2[0] and holding one function.
pub fn class_smali() -> String
{
    String::from(
        r#".class public final Lcom/example/App;
.super Ljava/lang/Object;
.source "App.kt"


# annotations
.annotation runtime Lkotlin/Metadata;
    d1 = {
        "\u0000\u0000\u0018\u0000J\u0006\u0010\u0001\u001a\u00020\u0002"
    }
    d2 = {
        "com/example/App",
        "run",
        "kotlin/Unit"
    }
    k = 0x1
    mv = {
        0x1,
        0x6,
        0x0
    }
    xi = 0x30
.end annotation


# direct methods
.method public constructor <init>()V
    .registers 1

    invoke-direct {p0}, Ljava/lang/Object;-><init>()V

    return-void
.end method
"#,
    )
}

/// Report the crate writes for [`class_smali`].
pub const CLASS_REPORT: &str = "Type: Class\n\
    Class Info:\n    \
    Name: com/example/App\n    \
    Supertypes: \n    \
    Module Name: main\n    \
    Type Aliases: \n    \
    Companion Object: \n    \
    Nested Classes:  \n    \
    Enum Entries: \n\n\
    Constructors:\n    \n\n\
    Functions:\n    run()V, Arguments: \n\n\
    Properties:\n    ";

/// Multi-file facade listing `part`; needs no binary payload.
pub fn facade_smali(part: &str) -> String
{
    format!(
        ".class public final L{part}Kt;\n\
         .super Ljava/lang/Object;\n\n\
         .annotation runtime Lkotlin/Metadata;\n    \
         d1 = {{\n        \"{part}\"\n    }}\n    \
         k = 0x4\n    \
         mv = {{\n        0x1,\n        0x6,\n        0x0\n    }}\n\
         .end annotation\n"
    )
}

/// Plain Java class without Kotlin metadata.
pub fn plain_smali(class: &str) -> String
{
    format!(".class public L{class};\n.super Ljava/lang/Object;\n")
}

/// Decoder-style output: `smali/com/example/App.smali` and
/// `smali_classes2/com/example/Utils.smali`, plus noise that must be ignored.
pub fn make_apk_fixture() -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("apk/smali/com/example/App.smali")
        .write_str(&class_smali())
        .expect("write App");
    tmp.child("apk/smali/com/example/Plain.smali")
        .write_str(&plain_smali("com/example/Plain"))
        .expect("write Plain");
    tmp.child("apk/smali_classes2/com/example/Utils.smali")
        .write_str(&facade_smali("com/example/Utils"))
        .expect("write Utils");
    tmp.child("apk/AndroidManifest.xml")
        .write_str("<manifest/>\n")
        .expect("write manifest");

    tmp
}

pub fn kmparse() -> Command
{
    let mut cmd = Command::cargo_bin("kmparse").expect("bin");
    cmd.env_remove("RUST_LOG");
    cmd
}
