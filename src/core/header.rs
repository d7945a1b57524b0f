//! Filepath: src/core/header.rs
//! Header record assembly from a scanned annotation region.

use crate::core::annotation::{
    array_or, parse_hex, scan_annotation, single_int_or, single_value, unescape_java,
};

/// Kind used when `k` is missing or not a hex literal
pub const DEFAULT_KIND: i32 = 1;

/// Extra int used when `xi` is missing or not a hex literal
pub const DEFAULT_EXTRA_INT: i32 = 0;

/// Bytecode version used when `bv` is missing or empty
pub const DEFAULT_BYTECODE_VERSION: [&str; 3] = ["0x1", "0x1", "0x3"];

/// Metadata version used when `mv` is missing or empty
pub const DEFAULT_METADATA_VERSION: [&str; 3] = ["0x1", "0x1", "0xd"];

/// Pre-decode view of one `kotlin.Metadata` annotation.
///
/// `data1` is never empty: constructors return `None` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord
{
    kind: i32,
    extra_int: i32,
    extra_string: String,
    package_name: String,
    bytecode_version: Vec<i32>,
    metadata_version: Vec<i32>,
    data1: Vec<String>,
    data2: Vec<String>,
}

impl HeaderRecord
{
    /// Record with every optional field at its default.
    pub fn new(data1: Vec<String>) -> Option<Self>
    {
        if data1.is_empty()
        {
            return None;
        }

        Some(Self {
            kind: DEFAULT_KIND,
            extra_int: DEFAULT_EXTRA_INT,
            extra_string: String::new(),
            package_name: String::new(),
            bytecode_version: vec![1, 1, 3],
            metadata_version: vec![1, 1, 13],
            data1,
            data2: Vec::new(),
        })
    }

    /// Assemble a record from the lines of an annotation region.
    pub fn from_region(region: &[&str]) -> Option<Self>
    {
        if region.is_empty()
        {
            return None;
        }

        let data1: Vec<String> =
            array_or(region, "d1", &[], |s| Some(unescape_java(s).into_owned()));

        let mut record = Self::new(data1)?;
        record.kind = single_int_or(region, "k", DEFAULT_KIND);
        record.extra_int = single_int_or(region, "xi", DEFAULT_EXTRA_INT);
        record.extra_string = single_value(region, "xs").to_string();
        record.package_name = single_value(region, "pn").to_string();
        record.bytecode_version = array_or(region, "bv", &DEFAULT_BYTECODE_VERSION, parse_hex);
        record.metadata_version = array_or(region, "mv", &DEFAULT_METADATA_VERSION, parse_hex);
        record.data2 = array_or(region, "d2", &[], |s| Some(s.to_string()));

        Some(record)
    }

    /// Scan a whole smali file and assemble its record, if any.
    pub fn from_smali(text: &str) -> Option<Self>
    {
        Self::from_region(&scan_annotation(text))
    }

    pub fn with_kind(
        mut self,
        kind: i32,
    ) -> Self
    {
        self.kind = kind;
        self
    }

    pub fn with_extra_string(
        mut self,
        extra_string: impl Into<String>,
    ) -> Self
    {
        self.extra_string = extra_string.into();
        self
    }

    pub fn with_metadata_version(
        mut self,
        version: Vec<i32>,
    ) -> Self
    {
        self.metadata_version = version;
        self
    }

    pub fn with_data2(
        mut self,
        data2: Vec<String>,
    ) -> Self
    {
        self.data2 = data2;
        self
    }

    pub fn kind(&self) -> i32
    {
        self.kind
    }

    pub fn extra_int(&self) -> i32
    {
        self.extra_int
    }

    pub fn extra_string(&self) -> &str
    {
        &self.extra_string
    }

    pub fn package_name(&self) -> &str
    {
        &self.package_name
    }

    pub fn bytecode_version(&self) -> &[i32]
    {
        &self.bytecode_version
    }

    pub fn metadata_version(&self) -> &[i32]
    {
        &self.metadata_version
    }

    pub fn data1(&self) -> &[String]
    {
        &self.data1
    }

    pub fn data2(&self) -> &[String]
    {
        &self.data2
    }
}
