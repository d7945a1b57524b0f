//! Decoded class descriptions and their construction from protobuf messages.

use std::fmt;

use super::DecodeError;
use super::names::{NameResolver, jvm_descriptor};
use super::proto::{
    ClassProto, ConstructorProto, FunctionProto, PackageProto, PropertyProto, TypeProto,
    TypeTableProto, ValueParameterProto,
};

/// Module name used when a class does not record one
pub const DEFAULT_MODULE_NAME: &str = "main";

/// What a type reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classifier
{
    Class(String),
    TypeAlias(String),
    TypeParameter(i32),
    NamedTypeParameter(String),
}

impl fmt::Display for Classifier
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        match self
        {
            Classifier::Class(name) => write!(f, "Class(name={name})"),
            Classifier::TypeAlias(name) => write!(f, "TypeAlias(name={name})"),
            Classifier::TypeParameter(id) => write!(f, "TypeParameter(id={id})"),
            Classifier::NamedTypeParameter(name) => write!(f, "TypeParameter(name={name})"),
        }
    }
}

/// JVM method signature, rendered as `name(params)ret`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature
{
    pub name: String,
    pub desc: String,
}

impl fmt::Display for MethodSignature
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        write!(f, "{}{}", self.name, self.desc)
    }
}

/// JVM field signature, rendered as `name:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSignature
{
    pub name: String,
    pub desc: String,
}

impl fmt::Display for FieldSignature
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        write!(f, "{}:{}", self.name, self.desc)
    }
}

/// A function or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo
{
    pub name: String,
    /// `None` when the JVM descriptor cannot be derived (e.g. generic parameters)
    pub signature: Option<MethodSignature>,
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo
{
    pub name: String,
    /// `None` for properties without a backing field
    pub field_signature: Option<FieldSignature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo
{
    pub functions: Vec<FunctionInfo>,
    pub properties: Vec<PropertyInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo
{
    pub name: String,
    pub supertypes: Vec<Classifier>,
    pub module_name: String,
    pub type_aliases: Vec<String>,
    pub companion_object: Option<String>,
    pub nested_classes: Vec<String>,
    pub enum_entries: Vec<String>,
    pub constructors: Vec<FunctionInfo>,
    pub functions: Vec<FunctionInfo>,
    pub properties: Vec<PropertyInfo>,
}

/// Result of decoding one header, by metadata kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassDescription
{
    Class(ClassInfo),
    FileFacade(PackageInfo),
    /// `lambda` is set when the synthetic class is a compiled lambda
    SyntheticClass
    {
        lambda: Option<FunctionInfo>,
    },
    MultiFileClassFacade
    {
        part_class_names: Vec<String>,
    },
    MultiFileClassPart
    {
        facade_class_name: String,
        package: PackageInfo,
    },
    Unknown,
}

/// Name resolver plus the type table in scope.
#[derive(Clone, Copy)]
pub(crate) struct ReadContext<'n, 't>
{
    names: &'n NameResolver<'n>,
    types: &'t [TypeProto],
}

fn required(
    value: Option<i32>,
    field: &'static str,
) -> Result<i32, DecodeError>
{
    value.ok_or(DecodeError::MissingField(field))
}

impl<'n, 't> ReadContext<'n, 't>
{
    pub(crate) fn new(
        names: &'n NameResolver<'n>,
        table: Option<&'t TypeTableProto>,
    ) -> Self
    {
        Self { names, types: table.map_or(&[][..], |t| t.types.as_slice()) }
    }

    /// Narrow to a member's own type table when it carries one.
    fn scoped<'p>(
        &self,
        table: Option<&'p TypeTableProto>,
    ) -> ReadContext<'n, 'p>
    where
        't: 'p,
    {
        match table
        {
            Some(table) if !table.types.is_empty() => ReadContext { names: self.names, types: &table.types },
            _ => ReadContext { names: self.names, types: self.types },
        }
    }

    fn resolve_type(
        &self,
        inline: Option<&TypeProto>,
        id: Option<i32>,
    ) -> Result<Option<TypeProto>, DecodeError>
    {
        if let Some(inline) = inline
        {
            return Ok(Some(inline.clone()));
        }

        match id
        {
            Some(id) => usize::try_from(id)
                .ok()
                .and_then(|slot| self.types.get(slot))
                .cloned()
                .map(Some)
                .ok_or(DecodeError::TypeIndex(id)),
            None => Ok(None),
        }
    }

    /// Descriptor of a type, `None` when it is not a plain class type.
    fn descriptor(
        &self,
        ty: Option<&TypeProto>,
    ) -> Result<Option<String>, DecodeError>
    {
        match ty.and_then(|t| t.class_name)
        {
            Some(id) => Ok(Some(jvm_descriptor(&self.names.string(id)?))),
            None => Ok(None),
        }
    }

    fn method_descriptor(
        &self,
        parameters: &[Option<TypeProto>],
        return_desc: Option<String>,
    ) -> Result<Option<String>, DecodeError>
    {
        let Some(return_desc) = return_desc
        else
        {
            return Ok(None);
        };

        let mut desc = String::from("(");
        for parameter in parameters
        {
            match self.descriptor(parameter.as_ref())?
            {
                Some(param_desc) => desc.push_str(&param_desc),
                None => return Ok(None),
            }
        }
        desc.push(')');
        desc.push_str(&return_desc);

        Ok(Some(desc))
    }

    fn classifier(
        &self,
        ty: &TypeProto,
    ) -> Result<Classifier, DecodeError>
    {
        if let Some(id) = ty.class_name
        {
            Ok(Classifier::Class(self.names.class_name(id)?))
        }
        else if let Some(id) = ty.type_parameter
        {
            Ok(Classifier::TypeParameter(id))
        }
        else if let Some(id) = ty.type_parameter_name
        {
            Ok(Classifier::NamedTypeParameter(self.names.string(id)?))
        }
        else if let Some(id) = ty.type_alias_name
        {
            Ok(Classifier::TypeAlias(self.names.class_name(id)?))
        }
        else
        {
            Err(DecodeError::MissingField("Type.classifier"))
        }
    }

    fn strings(
        &self,
        ids: impl IntoIterator<Item = Result<i32, DecodeError>>,
    ) -> Result<Vec<String>, DecodeError>
    {
        ids.into_iter()
            .map(|id| id.and_then(|id| self.names.string(id)))
            .collect()
    }

    fn argument_names(
        &self,
        parameters: &[ValueParameterProto],
    ) -> Result<Vec<String>, DecodeError>
    {
        parameters
            .iter()
            .map(|p| {
                self.names
                    .string(required(p.name, "ValueParameter.name")?)
            })
            .collect()
    }

    fn parameter_types(
        &self,
        parameters: &[ValueParameterProto],
    ) -> Result<Vec<Option<TypeProto>>, DecodeError>
    {
        parameters
            .iter()
            .map(|p| self.resolve_type(p.type_.as_ref(), p.type_id))
            .collect()
    }

    pub(crate) fn function(
        &self,
        proto: &FunctionProto,
    ) -> Result<FunctionInfo, DecodeError>
    {
        let ctx = self.scoped(proto.type_table.as_ref());
        let name_id = required(proto.name, "Function.name")?;
        let name = ctx
            .names
            .string(name_id)?;

        let jvm_name = match proto
            .signature
            .as_ref()
            .and_then(|s| s.name)
        {
            Some(id) => ctx
                .names
                .string(id)?,
            None => name.clone(),
        };

        let desc = match proto
            .signature
            .as_ref()
            .and_then(|s| s.desc)
        {
            Some(id) => Some(
                ctx.names
                    .string(id)?,
            ),
            None =>
            {
                let mut parameters = Vec::new();
                if let Some(receiver) =
                    ctx.resolve_type(proto.receiver_type.as_ref(), proto.receiver_type_id)?
                {
                    parameters.push(Some(receiver));
                }
                parameters.extend(ctx.parameter_types(&proto.value_parameters)?);

                let return_type =
                    ctx.resolve_type(proto.return_type.as_ref(), proto.return_type_id)?;
                let return_desc = ctx.descriptor(return_type.as_ref())?;
                ctx.method_descriptor(&parameters, return_desc)?
            }
        };

        Ok(FunctionInfo {
            name,
            signature: desc.map(|desc| MethodSignature { name: jvm_name, desc }),
            arguments: ctx.argument_names(&proto.value_parameters)?,
        })
    }

    pub(crate) fn constructor(
        &self,
        proto: &ConstructorProto,
    ) -> Result<FunctionInfo, DecodeError>
    {
        let name = match proto
            .signature
            .as_ref()
            .and_then(|s| s.name)
        {
            Some(id) => self
                .names
                .string(id)?,
            None => "<init>".to_string(),
        };

        let desc = match proto
            .signature
            .as_ref()
            .and_then(|s| s.desc)
        {
            Some(id) => Some(
                self.names
                    .string(id)?,
            ),
            None =>
            {
                let parameters = self.parameter_types(&proto.value_parameters)?;
                self.method_descriptor(&parameters, Some("V".to_string()))?
            }
        };

        Ok(FunctionInfo {
            name: name.clone(),
            signature: desc.map(|desc| MethodSignature { name, desc }),
            arguments: self.argument_names(&proto.value_parameters)?,
        })
    }

    pub(crate) fn property(
        &self,
        proto: &PropertyProto,
    ) -> Result<PropertyInfo, DecodeError>
    {
        let name = self
            .names
            .string(required(proto.name, "Property.name")?)?;

        let field = proto
            .signature
            .as_ref()
            .and_then(|s| s.field.as_ref());

        let field_signature = match field
        {
            None => None,
            Some(field) =>
            {
                let field_name = match field.name
                {
                    Some(id) => self
                        .names
                        .string(id)?,
                    None => name.clone(),
                };
                let desc = match field.desc
                {
                    Some(id) => Some(
                        self.names
                            .string(id)?,
                    ),
                    None =>
                    {
                        let return_type =
                            self.resolve_type(proto.return_type.as_ref(), proto.return_type_id)?;
                        self.descriptor(return_type.as_ref())?
                    }
                };
                desc.map(|desc| FieldSignature { name: field_name, desc })
            }
        };

        Ok(PropertyInfo { name, field_signature })
    }

    pub(crate) fn package(
        &self,
        proto: &PackageProto,
    ) -> Result<PackageInfo, DecodeError>
    {
        Ok(PackageInfo {
            functions: proto
                .functions
                .iter()
                .map(|f| self.function(f))
                .collect::<Result<_, _>>()?,
            properties: proto
                .properties
                .iter()
                .map(|p| self.property(p))
                .collect::<Result<_, _>>()?,
        })
    }

    pub(crate) fn class(
        &self,
        proto: &ClassProto,
    ) -> Result<ClassInfo, DecodeError>
    {
        let name = self
            .names
            .class_name(required(proto.fq_name, "Class.fq_name")?)?;

        // Inline supertypes win; ids refer to the class type table
        let supertypes = if proto
            .supertypes
            .is_empty()
        {
            proto
                .supertype_ids
                .iter()
                .map(|id| {
                    self.resolve_type(None, Some(*id))?
                        .ok_or(DecodeError::TypeIndex(*id))
                        .and_then(|ty| self.classifier(&ty))
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        else
        {
            proto
                .supertypes
                .iter()
                .map(|ty| self.classifier(ty))
                .collect::<Result<Vec<_>, _>>()?
        };

        let module_name = match proto.module_name
        {
            Some(id) => self
                .names
                .string(id)?,
            None => DEFAULT_MODULE_NAME.to_string(),
        };

        let companion_object = proto
            .companion_object_name
            .map(|id| self.names.string(id))
            .transpose()?;

        Ok(ClassInfo {
            name,
            supertypes,
            module_name,
            type_aliases: self.strings(
                proto
                    .type_aliases
                    .iter()
                    .map(|a| required(a.name, "TypeAlias.name")),
            )?,
            companion_object,
            nested_classes: self.strings(
                proto
                    .nested_class_names
                    .iter()
                    .map(|id| Ok(*id)),
            )?,
            enum_entries: self.strings(
                proto
                    .enum_entries
                    .iter()
                    .map(|e| required(e.name, "EnumEntry.name")),
            )?,
            constructors: proto
                .constructors
                .iter()
                .map(|c| self.constructor(c))
                .collect::<Result<_, _>>()?,
            functions: proto
                .functions
                .iter()
                .map(|f| self.function(f))
                .collect::<Result<_, _>>()?,
            properties: proto
                .properties
                .iter()
                .map(|p| self.property(p))
                .collect::<Result<_, _>>()?,
        })
    }
}
