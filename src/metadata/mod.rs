//! Filepath: src/metadata/mod.rs
//! Header record to class description.
//!
//! [`MetadataDecoder`] is the seam the tree builder calls for every parsed
//! header. [`KotlinMetadataDecoder`] reads the binary payload carried in
//! `d1`/`d2` the way the Kotlin compiler writes it.

pub mod encoding;
pub mod model;
mod names;
mod proto;
mod report;

use prost::Message;
use thiserror::Error;
use tracing::trace;

use crate::core::header::HeaderRecord;
use model::ReadContext;
use names::NameResolver;
use proto::{ClassProto, FunctionProto, PackageProto, StringTableTypesProto};

pub use model::{
    ClassDescription, ClassInfo, Classifier, FieldSignature, FunctionInfo, MethodSignature, PackageInfo, PropertyInfo,
};

/// Metadata kinds as stored in the `k` field
pub const KIND_CLASS: i32 = 1;
pub const KIND_FILE_FACADE: i32 = 2;
pub const KIND_SYNTHETIC_CLASS: i32 = 3;
pub const KIND_MULTI_FILE_CLASS_FACADE: i32 = 4;
pub const KIND_MULTI_FILE_CLASS_PART: i32 = 5;

/// Metadata major versions this decoder understands
const SUPPORTED_MAJOR_VERSIONS: std::ops::RangeInclusive<i32> = 1..=2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError
{
    #[error("malformed metadata message: {0}")]
    Protobuf(String),

    #[error("string table covers {covered} strings but d2 holds {available}")]
    StringTableRange
    {
        covered: u64, available: usize
    },

    #[error("unsupported metadata version {0:?}")]
    UnsupportedVersion(Vec<i32>),

    #[error("required field {0} is missing")]
    MissingField(&'static str),

    #[error("string index {0} is out of range")]
    NameIndex(i32),

    #[error("type index {0} is out of range")]
    TypeIndex(i32),
}

impl From<prost::DecodeError> for DecodeError
{
    fn from(err: prost::DecodeError) -> Self
    {
        DecodeError::Protobuf(err.to_string())
    }
}

/// Turns a header record into a class description.
pub trait MetadataDecoder
{
    fn decode(
        &self,
        header: &HeaderRecord,
    ) -> Result<ClassDescription, DecodeError>;
}

/// Decoder for the metadata written by the Kotlin JVM compiler.
#[derive(Debug, Default, Clone, Copy)]
pub struct KotlinMetadataDecoder;

impl MetadataDecoder for KotlinMetadataDecoder
{
    fn decode(
        &self,
        header: &HeaderRecord,
    ) -> Result<ClassDescription, DecodeError>
    {
        let version = header.metadata_version();
        let major = version
            .first()
            .copied()
            .unwrap_or_default();
        if !SUPPORTED_MAJOR_VERSIONS.contains(&major)
        {
            return Err(DecodeError::UnsupportedVersion(version.to_vec()));
        }

        trace!(kind = header.kind(), "decoding header");

        match header.kind()
        {
            KIND_CLASS =>
            {
                let payload = Payload::<ClassProto>::read(header)?;
                let names = payload.names(header)?;
                let ctx = ReadContext::new(
                    &names,
                    payload
                        .message
                        .type_table
                        .as_ref(),
                );
                Ok(ClassDescription::Class(ctx.class(&payload.message)?))
            }
            KIND_FILE_FACADE =>
            {
                let payload = Payload::<PackageProto>::read(header)?;
                let names = payload.names(header)?;
                let ctx = ReadContext::new(
                    &names,
                    payload
                        .message
                        .type_table
                        .as_ref(),
                );
                Ok(ClassDescription::FileFacade(ctx.package(&payload.message)?))
            }
            KIND_SYNTHETIC_CLASS =>
            {
                let is_lambda = header
                    .data1()
                    .iter()
                    .any(|s| !s.is_empty());
                if !is_lambda
                {
                    return Ok(ClassDescription::SyntheticClass { lambda: None });
                }

                let payload = Payload::<FunctionProto>::read(header)?;
                let names = payload.names(header)?;
                let ctx = ReadContext::new(&names, None);
                let lambda = ctx.function(&payload.message)?;
                Ok(ClassDescription::SyntheticClass { lambda: Some(lambda) })
            }
            KIND_MULTI_FILE_CLASS_FACADE => Ok(ClassDescription::MultiFileClassFacade {
                part_class_names: header
                    .data1()
                    .to_vec(),
            }),
            KIND_MULTI_FILE_CLASS_PART =>
            {
                let payload = Payload::<PackageProto>::read(header)?;
                let names = payload.names(header)?;
                let ctx = ReadContext::new(
                    &names,
                    payload
                        .message
                        .type_table
                        .as_ref(),
                );
                Ok(ClassDescription::MultiFileClassPart {
                    facade_class_name: header
                        .extra_string()
                        .to_string(),
                    package: ctx.package(&payload.message)?,
                })
            }
            _ => Ok(ClassDescription::Unknown),
        }
    }
}

/// String table plus the kind-specific message that follows it.
struct Payload<T>
{
    types: StringTableTypesProto,
    message: T,
}

impl<T: Message + Default> Payload<T>
{
    fn read(header: &HeaderRecord) -> Result<Self, DecodeError>
    {
        let bytes = encoding::decode_bytes(header.data1());
        let mut buf = bytes.as_slice();
        let types = StringTableTypesProto::decode_length_delimited(&mut buf)?;
        let message = T::decode(buf)?;

        Ok(Self { types, message })
    }

    fn names<'a>(
        &'a self,
        header: &'a HeaderRecord,
    ) -> Result<NameResolver<'a>, DecodeError>
    {
        NameResolver::new(&self.types, header.data2())
    }
}
