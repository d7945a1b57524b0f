//! The subset of the Kotlin metadata protobuf schema the report needs.
//!
//! Field tags follow `metadata.proto` and `jvm_metadata.proto`; the JVM
//! extensions (100..=104) are declared as plain fields on the extended
//! message. Fields a message does not declare are skipped by `prost`.

/// `JvmProtoBuf.StringTableTypes.Record`
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct RecordProto
{
    #[prost(int32, optional, tag = "1")]
    pub range: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub predefined_index: Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub operation: Option<i32>,
    #[prost(int32, repeated, tag = "4")]
    pub substring_index: Vec<i32>,
    #[prost(int32, repeated, tag = "5")]
    pub replace_char: Vec<i32>,
    #[prost(string, optional, tag = "6")]
    pub string: Option<String>,
}

/// `JvmProtoBuf.StringTableTypes`
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct StringTableTypesProto
{
    #[prost(message, repeated, tag = "1")]
    pub records: Vec<RecordProto>,
    #[prost(int32, repeated, tag = "5")]
    pub local_names: Vec<i32>,
}

/// `ProtoBuf.Type`, classifier fields only
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct TypeProto
{
    #[prost(int32, optional, tag = "6")]
    pub class_name: Option<i32>,
    #[prost(int32, optional, tag = "7")]
    pub type_parameter: Option<i32>,
    #[prost(int32, optional, tag = "9")]
    pub type_parameter_name: Option<i32>,
    #[prost(int32, optional, tag = "12")]
    pub type_alias_name: Option<i32>,
}

/// `ProtoBuf.TypeTable`
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct TypeTableProto
{
    #[prost(message, repeated, tag = "1")]
    pub types: Vec<TypeProto>,
}

/// `JvmProtoBuf.JvmMethodSignature` and `JvmFieldSignature` share a layout.
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct JvmSignatureProto
{
    #[prost(int32, optional, tag = "1")]
    pub name: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub desc: Option<i32>,
}

/// `JvmProtoBuf.JvmPropertySignature`, backing field only
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct JvmPropertySignatureProto
{
    #[prost(message, optional, tag = "1")]
    pub field: Option<JvmSignatureProto>,
}

/// `ProtoBuf.ValueParameter`
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ValueParameterProto
{
    #[prost(int32, optional, tag = "2")]
    pub name: Option<i32>,
    #[prost(message, optional, tag = "3")]
    pub type_: Option<TypeProto>,
    #[prost(int32, optional, tag = "5")]
    pub type_id: Option<i32>,
}

/// `ProtoBuf.Constructor` with the JVM signature extension
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ConstructorProto
{
    #[prost(message, repeated, tag = "2")]
    pub value_parameters: Vec<ValueParameterProto>,
    #[prost(message, optional, tag = "100")]
    pub signature: Option<JvmSignatureProto>,
}

/// `ProtoBuf.Function` with the JVM signature extension
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct FunctionProto
{
    #[prost(int32, optional, tag = "2")]
    pub name: Option<i32>,
    #[prost(message, optional, tag = "3")]
    pub return_type: Option<TypeProto>,
    #[prost(message, optional, tag = "5")]
    pub receiver_type: Option<TypeProto>,
    #[prost(message, repeated, tag = "6")]
    pub value_parameters: Vec<ValueParameterProto>,
    #[prost(int32, optional, tag = "7")]
    pub return_type_id: Option<i32>,
    #[prost(int32, optional, tag = "8")]
    pub receiver_type_id: Option<i32>,
    #[prost(message, optional, tag = "30")]
    pub type_table: Option<TypeTableProto>,
    #[prost(message, optional, tag = "100")]
    pub signature: Option<JvmSignatureProto>,
}

/// `ProtoBuf.Property` with the JVM property signature extension
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct PropertyProto
{
    #[prost(int32, optional, tag = "2")]
    pub name: Option<i32>,
    #[prost(message, optional, tag = "3")]
    pub return_type: Option<TypeProto>,
    #[prost(int32, optional, tag = "9")]
    pub return_type_id: Option<i32>,
    #[prost(message, optional, tag = "100")]
    pub signature: Option<JvmPropertySignatureProto>,
}

/// `ProtoBuf.TypeAlias`, name only
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct TypeAliasProto
{
    #[prost(int32, optional, tag = "2")]
    pub name: Option<i32>,
}

/// `ProtoBuf.EnumEntry`
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct EnumEntryProto
{
    #[prost(int32, optional, tag = "1")]
    pub name: Option<i32>,
}

/// `ProtoBuf.Class` with the JVM module name extension
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ClassProto
{
    #[prost(int32, repeated, tag = "2")]
    pub supertype_ids: Vec<i32>,
    #[prost(int32, optional, tag = "3")]
    pub fq_name: Option<i32>,
    #[prost(int32, optional, tag = "4")]
    pub companion_object_name: Option<i32>,
    #[prost(message, repeated, tag = "6")]
    pub supertypes: Vec<TypeProto>,
    #[prost(int32, repeated, tag = "7")]
    pub nested_class_names: Vec<i32>,
    #[prost(message, repeated, tag = "8")]
    pub constructors: Vec<ConstructorProto>,
    #[prost(message, repeated, tag = "9")]
    pub functions: Vec<FunctionProto>,
    #[prost(message, repeated, tag = "10")]
    pub properties: Vec<PropertyProto>,
    #[prost(message, repeated, tag = "11")]
    pub type_aliases: Vec<TypeAliasProto>,
    #[prost(message, repeated, tag = "13")]
    pub enum_entries: Vec<EnumEntryProto>,
    #[prost(message, optional, tag = "30")]
    pub type_table: Option<TypeTableProto>,
    #[prost(int32, optional, tag = "101")]
    pub module_name: Option<i32>,
}

/// `ProtoBuf.Package` with the JVM module name extension
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct PackageProto
{
    #[prost(message, repeated, tag = "3")]
    pub functions: Vec<FunctionProto>,
    #[prost(message, repeated, tag = "4")]
    pub properties: Vec<PropertyProto>,
    #[prost(message, repeated, tag = "5")]
    pub type_aliases: Vec<TypeAliasProto>,
    #[prost(message, optional, tag = "30")]
    pub type_table: Option<TypeTableProto>,
    #[prost(int32, optional, tag = "101")]
    pub module_name: Option<i32>,
}
