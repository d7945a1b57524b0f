//! Fixed text report for a decoded class description.

use std::fmt;

use itertools::Itertools;

use super::model::{ClassDescription, ClassInfo, FunctionInfo, PackageInfo, PropertyInfo};

/// Separator placed before every section entry
const ENTRY_INDENT: &str = "\n    ";

/// Entries as `prefix + e1 + sep + e2 ...`; the prefix is written even for
/// an empty section.
fn section<T>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    entries: &[T],
    entry: impl Fn(&T) -> String,
) -> fmt::Result
{
    f.write_str(title)?;
    f.write_str(ENTRY_INDENT)?;
    f.write_str(
        &entries
            .iter()
            .map(entry)
            .join(ENTRY_INDENT),
    )
}

fn function_entry(function: &FunctionInfo) -> String
{
    let head = match &function.signature
    {
        Some(signature) => signature.to_string(),
        None => function
            .name
            .clone(),
    };
    format!("{head}, Arguments: {}", function.arguments.join(", "))
}

fn property_entry(property: &PropertyInfo) -> String
{
    match &property.field_signature
    {
        Some(signature) => signature.to_string(),
        None => property
            .name
            .clone(),
    }
}

fn members(
    f: &mut fmt::Formatter<'_>,
    functions: &[FunctionInfo],
    properties: &[PropertyInfo],
) -> fmt::Result
{
    section(f, "\n\nFunctions:", functions, function_entry)?;
    section(f, "\n\nProperties:", properties, property_entry)
}

fn class(
    f: &mut fmt::Formatter<'_>,
    info: &ClassInfo,
) -> fmt::Result
{
    writeln!(f, "Type: Class")?;
    writeln!(f, "Class Info:")?;
    writeln!(f, "    Name: {}", info.name)?;
    writeln!(f, "    Supertypes: {}", info.supertypes.iter().join(", "))?;
    writeln!(f, "    Module Name: {}", info.module_name)?;
    writeln!(f, "    Type Aliases: {}", info.type_aliases.join(", "))?;
    writeln!(f, "    Companion Object: {}", info.companion_object.as_deref().unwrap_or_default())?;
    writeln!(f, "    Nested Classes:  {}", info.nested_classes.join(", "))?;
    write!(f, "    Enum Entries: {}", info.enum_entries.join(", "))?;

    section(f, "\n\nConstructors:", &info.constructors, function_entry)?;
    members(f, &info.functions, &info.properties)
}

fn package(
    f: &mut fmt::Formatter<'_>,
    package: &PackageInfo,
) -> fmt::Result
{
    members(f, &package.functions, &package.properties)
}

impl fmt::Display for ClassDescription
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        match self
        {
            ClassDescription::Class(info) => class(f, info),
            ClassDescription::FileFacade(info) =>
            {
                f.write_str("Type: File Facade")?;
                package(f, info)
            }
            ClassDescription::SyntheticClass { lambda: Some(function) } =>
            {
                write!(
                    f,
                    "Type: Synthetic Class\nIs Kotlin Lambda: True\n\nFunctions:{ENTRY_INDENT}{}",
                    function_entry(function)
                )
            }
            ClassDescription::SyntheticClass { lambda: None } =>
            {
                f.write_str("Type: Synthetic Class\nIs Kotlin Lambda: False")
            }
            ClassDescription::MultiFileClassFacade { part_class_names } => section(
                f,
                "Type: Multi-File Class Facade\nThis multi-file class combines:\n",
                part_class_names,
                |part| format!("Class: {part}"),
            ),
            ClassDescription::MultiFileClassPart { facade_class_name, package: info } =>
            {
                write!(f, "Type: Multi-File Class Part\nName: {facade_class_name}")?;
                package(f, info)
            }
            ClassDescription::Unknown => f.write_str("Type: Unknown"),
        }
    }
}

impl ClassDescription
{
    /// The report written to a leaf's output file.
    pub fn render(&self) -> String
    {
        self.to_string()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::metadata::model::{Classifier, FieldSignature, MethodSignature};

    fn function(
        name: &str,
        desc: Option<&str>,
        arguments: &[&str],
    ) -> FunctionInfo
    {
        FunctionInfo {
            name: name.to_string(),
            signature: desc.map(|desc| MethodSignature { name: name.to_string(), desc: desc.to_string() }),
            arguments: arguments
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }

    #[test]
    fn class_report_layout()
    {
        let info = ClassInfo {
            name: "com/example/App".into(),
            supertypes: vec![Classifier::Class("kotlin/Any".into()), Classifier::TypeParameter(0)],
            module_name: "main".into(),
            type_aliases: vec![],
            companion_object: None,
            nested_classes: vec!["Inner".into(), "Other".into()],
            enum_entries: vec![],
            constructors: vec![function("<init>", Some("()V"), &[])],
            functions: vec![
                function("greet", Some("(Ljava/lang/String;)V"), &["name"]),
                function("pair", Some("(II)V"), &["a", "b"]),
            ],
            properties: vec![
                PropertyInfo {
                    name: "count".into(),
                    field_signature: Some(FieldSignature { name: "count".into(), desc: "I".into() }),
                },
                PropertyInfo { name: "computed".into(), field_signature: None },
            ],
        };

        let expected = "Type: Class\n\
            Class Info:\n    \
            Name: com/example/App\n    \
            Supertypes: Class(name=kotlin/Any), TypeParameter(id=0)\n    \
            Module Name: main\n    \
            Type Aliases: \n    \
            Companion Object: \n    \
            Nested Classes:  Inner, Other\n    \
            Enum Entries: \n\n\
            Constructors:\n    <init>()V, Arguments: \n\n\
            Functions:\n    greet(Ljava/lang/String;)V, Arguments: name\n    pair(II)V, Arguments: a, b\n\n\
            Properties:\n    count:I\n    computed";

        assert_eq!(ClassDescription::Class(info).render(), expected);
    }

    #[test]
    fn empty_sections_keep_their_indent()
    {
        let report = ClassDescription::FileFacade(PackageInfo::default()).render();
        assert_eq!(report, "Type: File Facade\n\nFunctions:\n    \n\nProperties:\n    ");
    }

    #[test]
    fn missing_signature_renders_the_name()
    {
        let report = ClassDescription::MultiFileClassPart {
            facade_class_name: "com/UtilsKt".into(),
            package: PackageInfo { functions: vec![function("map", None, &["xs"])], properties: vec![] },
        }
        .render();

        assert_eq!(
            report,
            "Type: Multi-File Class Part\nName: com/UtilsKt\n\nFunctions:\n    map, Arguments: xs\n\nProperties:\n    "
        );
    }

    #[test]
    fn synthetic_and_unknown()
    {
        let lambda = ClassDescription::SyntheticClass {
            lambda: Some(function("invoke", Some("(I)V"), &["it"])),
        };
        assert_eq!(
            lambda.render(),
            "Type: Synthetic Class\nIs Kotlin Lambda: True\n\nFunctions:\n    invoke(I)V, Arguments: it"
        );
        assert_eq!(
            ClassDescription::SyntheticClass { lambda: None }.render(),
            "Type: Synthetic Class\nIs Kotlin Lambda: False"
        );
        assert_eq!(ClassDescription::Unknown.render(), "Type: Unknown");
    }

    #[test]
    fn facade_lists_each_part()
    {
        let report = ClassDescription::MultiFileClassFacade {
            part_class_names: vec!["a/UtilsKt__AKt".into(), "a/UtilsKt__BKt".into()],
        }
        .render();

        assert_eq!(
            report,
            "Type: Multi-File Class Facade\nThis multi-file class combines:\n\n    Class: a/UtilsKt__AKt\n    Class: a/UtilsKt__BKt"
        );
    }
}
