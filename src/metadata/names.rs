//! Name resolution over the `d2` string table, and the mapping from
//! Kotlin builtin class names to JVM descriptors.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::DecodeError;
use super::proto::{RecordProto, StringTableTypesProto};

/// Strings a record may reference by `predefined_index` instead of `d2`.
const PREDEFINED_STRINGS: [&str; 44] = [
    "kotlin/Any",
    "kotlin/Nothing",
    "kotlin/Unit",
    "kotlin/Throwable",
    "kotlin/Number",
    "kotlin/Byte",
    "kotlin/Double",
    "kotlin/Float",
    "kotlin/Int",
    "kotlin/Long",
    "kotlin/Short",
    "kotlin/Boolean",
    "kotlin/Char",
    "kotlin/CharSequence",
    "kotlin/String",
    "kotlin/Comparable",
    "kotlin/Enum",
    "kotlin/Array",
    "kotlin/ByteArray",
    "kotlin/DoubleArray",
    "kotlin/FloatArray",
    "kotlin/IntArray",
    "kotlin/LongArray",
    "kotlin/ShortArray",
    "kotlin/BooleanArray",
    "kotlin/CharArray",
    "kotlin/Cloneable",
    "kotlin/Annotation",
    "kotlin/collections/Iterable",
    "kotlin/collections/MutableIterable",
    "kotlin/collections/Collection",
    "kotlin/collections/MutableCollection",
    "kotlin/collections/List",
    "kotlin/collections/MutableList",
    "kotlin/collections/Set",
    "kotlin/collections/MutableSet",
    "kotlin/collections/Map",
    "kotlin/collections/MutableMap",
    "kotlin/collections/Map.Entry",
    "kotlin/collections/MutableMap.MutableEntry",
    "kotlin/collections/Iterator",
    "kotlin/collections/MutableIterator",
    "kotlin/collections/ListIterator",
    "kotlin/collections/MutableListIterator",
];

const OPERATION_INTERNAL_TO_CLASS_ID: i32 = 1;
const OPERATION_DESC_TO_CLASS_ID: i32 = 2;

/// Resolves string and class-name indices of a metadata message.
pub(crate) struct NameResolver<'a>
{
    strings: &'a [String],
    records: Vec<&'a RecordProto>,
    local_names: &'a [i32],
}

impl<'a> NameResolver<'a>
{
    /// Each record covers `range` consecutive strings; together they may not
    /// cover more strings than `d2` holds.
    pub(crate) fn new(
        types: &'a StringTableTypesProto,
        strings: &'a [String],
    ) -> Result<Self, DecodeError>
    {
        let covered: u64 = types
            .records
            .iter()
            .map(record_range)
            .sum();
        if covered > strings.len() as u64
        {
            return Err(DecodeError::StringTableRange { covered, available: strings.len() });
        }

        let records = types
            .records
            .iter()
            .flat_map(|record| std::iter::repeat_n(record, record_range(record) as usize))
            .collect();

        Ok(Self { strings, records, local_names: &types.local_names })
    }

    pub(crate) fn string(
        &self,
        index: i32,
    ) -> Result<String, DecodeError>
    {
        let slot = usize::try_from(index).map_err(|_| DecodeError::NameIndex(index))?;
        let record = self
            .records
            .get(slot)
            .copied();

        let predefined = record
            .and_then(|r| r.predefined_index)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| PREDEFINED_STRINGS.get(i));

        let mut value = match (record.and_then(|r| r.string.as_ref()), predefined)
        {
            (Some(literal), _) => literal.clone(),
            (None, Some(predefined)) => (*predefined).to_string(),
            (None, None) => self
                .strings
                .get(slot)
                .cloned()
                .ok_or(DecodeError::NameIndex(index))?,
        };

        let Some(record) = record
        else
        {
            return Ok(value);
        };

        if let [begin, end, ..] = record.substring_index[..]
        {
            let chars: Vec<char> = value
                .chars()
                .collect();
            if let (Ok(begin), Ok(end)) = (usize::try_from(begin), usize::try_from(end))
                && begin <= end
                && end <= chars.len()
            {
                value = chars[begin..end]
                    .iter()
                    .collect();
            }
        }

        if let [from, to, ..] = record.replace_char[..]
            && let (Some(from), Some(to)) = (char_from_i32(from), char_from_i32(to))
        {
            value = value.replace(from, &to.to_string());
        }

        match record.operation
        {
            Some(OPERATION_INTERNAL_TO_CLASS_ID) =>
            {
                value = value.replace('$', ".");
            }
            Some(OPERATION_DESC_TO_CLASS_ID) =>
            {
                let mut chars: Vec<char> = value
                    .chars()
                    .collect();
                if chars.len() >= 2
                {
                    chars.pop();
                    chars.remove(0);
                }
                value = chars
                    .into_iter()
                    .collect::<String>()
                    .replace('$', ".");
            }
            _ =>
            {}
        }

        Ok(value)
    }

    /// Class name as written in reports; local classes get a leading dot.
    pub(crate) fn class_name(
        &self,
        index: i32,
    ) -> Result<String, DecodeError>
    {
        let name = self.string(index)?;
        if self
            .local_names
            .contains(&index)
        {
            Ok(format!(".{name}"))
        }
        else
        {
            Ok(name)
        }
    }
}

fn record_range(record: &RecordProto) -> u64
{
    u64::try_from(record.range.unwrap_or(1)).unwrap_or(0)
}

fn char_from_i32(value: i32) -> Option<char>
{
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
}

static BUILTIN_DESCRIPTORS: LazyLock<HashMap<String, String>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    let primitives = [
        ("Boolean", "Z"),
        ("Char", "C"),
        ("Byte", "B"),
        ("Short", "S"),
        ("Int", "I"),
        ("Float", "F"),
        ("Long", "J"),
        ("Double", "D"),
    ];
    for (name, desc) in primitives
    {
        map.insert(format!("kotlin/{name}"), desc.to_string());
        map.insert(format!("kotlin/{name}Array"), format!("[{desc}"));
    }
    map.insert("kotlin/Unit".to_string(), "V".to_string());

    let mut add = |kotlin: &str, java: &str| {
        map.insert(format!("kotlin/{kotlin}"), format!("L{java};"));
    };

    add("Any", "java/lang/Object");
    add("Nothing", "java/lang/Void");
    add("Annotation", "java/lang/annotation/Annotation");
    for name in ["String", "CharSequence", "Throwable", "Cloneable", "Number", "Comparable", "Enum"]
    {
        add(name, &format!("java/lang/{name}"));
    }
    for name in ["Iterator", "Collection", "List", "Set", "Map", "ListIterator"]
    {
        add(&format!("collections/{name}"), &format!("java/util/{name}"));
        add(&format!("collections/Mutable{name}"), &format!("java/util/{name}"));
    }
    add("collections/Iterable", "java/lang/Iterable");
    add("collections/MutableIterable", "java/lang/Iterable");
    add("collections/Map.Entry", "java/util/Map$Entry");
    add("collections/MutableMap.MutableEntry", "java/util/Map$Entry");
    for arity in 0..=22
    {
        add(&format!("Function{arity}"), &format!("kotlin/jvm/functions/Function{arity}"));
        add(&format!("reflect/KFunction{arity}"), "kotlin/reflect/KFunction");
    }
    for name in ["Char", "Byte", "Short", "Int", "Float", "Long", "Double", "String", "Enum"]
    {
        add(&format!("{name}.Companion"), &format!("kotlin/jvm/internal/{name}CompanionObject"));
    }

    map
});

/// JVM descriptor for a Kotlin class id such as `kotlin/Int` or `com/App.Inner`.
pub(crate) fn jvm_descriptor(class_id: &str) -> String
{
    BUILTIN_DESCRIPTORS
        .get(class_id)
        .cloned()
        .unwrap_or_else(|| format!("L{};", class_id.replace('.', "$")))
}
