//! Filepath: src/core/annotation.rs
//! Annotation region scanning and header field extraction.
//!
//! A smali file carries Kotlin metadata as a runtime annotation:
//!
//! ```text
//! .annotation runtime Lkotlin/Metadata;
//!     k = 0x1
//!     mv = {
//!         0x1,
//!         0x5,
//!         0x1
//!     }
//!     d1 = {
//!         "\u0000\u0018\n..."
//!     }
//! .end annotation
//! ```
//!
//! Scanning is line-oriented. Values are cleaned (trim, one trailing comma,
//! one pair of quotes) before any numeric or escape decoding.

use std::borrow::Cow;

use memchr::memmem::Finder;

/// First line of a Kotlin metadata annotation block
pub const ANNOTATION_START: &str = ".annotation runtime Lkotlin";

/// Terminator of any smali annotation block
pub const ANNOTATION_END: &str = ".end annotation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState
{
    Outside,
    Inside,
}

/// Collect the lines strictly between the first line containing `start`
/// and the next line containing `end`.
///
/// No start marker yields an empty region. A missing end marker lets the
/// region run to the last line.
pub fn region_between<'a, I>(
    lines: I,
    start: &str,
    end: &str,
) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let start = Finder::new(start);
    let end = Finder::new(end);

    let mut state = ScanState::Outside;
    let mut region = Vec::new();

    for line in lines
    {
        match state
        {
            ScanState::Outside =>
            {
                if start
                    .find(line.as_bytes())
                    .is_some()
                {
                    state = ScanState::Inside;
                }
            }
            ScanState::Inside =>
            {
                if end
                    .find(line.as_bytes())
                    .is_some()
                {
                    break;
                }
                region.push(line);
            }
        }
    }

    region
}

/// Extract the Kotlin metadata annotation region from a whole smali file.
pub fn scan_annotation(text: &str) -> Vec<&str>
{
    region_between(text.lines(), ANNOTATION_START, ANNOTATION_END)
}

/// Trim, drop one trailing comma, then strip one pair of surrounding quotes.
pub fn clean_value(raw: &str) -> &str
{
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_suffix(',')
        .unwrap_or(trimmed);

    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}

/// Value of `key = value` from the first matching line, cleaned.
/// Missing keys read as the empty string.
pub fn single_value<'a>(
    region: &[&'a str],
    key: &str,
) -> &'a str
{
    let prefix = format!("{key} =");

    region
        .iter()
        .find(|line| {
            line.trim()
                .starts_with(&prefix)
        })
        .and_then(|line| line.split_once('='))
        .map(|(_, value)| clean_value(value))
        .unwrap_or("")
}

/// Parse a smali hex literal (`0x1f`). Anything else is `None`.
pub fn parse_hex(value: &str) -> Option<i32>
{
    let digits = value
        .trim()
        .strip_prefix("0x")?;

    if digits.is_empty()
        || !digits
            .bytes()
            .all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }

    i32::from_str_radix(digits, 16).ok()
}

/// Read an integer field, substituting `default` when absent or not hex.
pub fn single_int_or(
    region: &[&str],
    key: &str,
    default: i32,
) -> i32
{
    parse_hex(single_value(region, key)).unwrap_or(default)
}

/// Elements of a `key = { ... }` array, cleaned and passed through
/// `transform`. Elements the transform rejects are dropped.
///
/// The body ends at the first line containing `}`, so nested braces
/// inside the array are not supported. An empty body falls back to
/// `default`, which goes through the same cleaning and transform.
pub fn array_or<T, F>(
    region: &[&str],
    key: &str,
    default: &[&str],
    transform: F,
) -> Vec<T>
where
    F: Fn(&str) -> Option<T>,
{
    let opener = format!("{key} = {{");
    let body = region_between(region.iter().copied(), &opener, "}");

    let elements: Vec<&str> = if body.is_empty()
    {
        default.to_vec()
    }
    else
    {
        body
    };

    elements
        .into_iter()
        .map(clean_value)
        .filter_map(transform)
        .collect()
}

/// Decode Java string escapes as they appear in smali string literals.
///
/// Handles `\b \t \n \f \r \" \' \\`, octal escapes up to `\377`, and
/// `\uXXXX` with any number of `u`. A backslash before anything else is
/// dropped and the following character kept.
pub fn unescape_java(input: &str) -> Cow<'_, str>
{
    if !input.contains('\\')
    {
        return Cow::Borrowed(input);
    }

    let chars: Vec<char> = input
        .chars()
        .collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len()
    {
        let c = chars[i];
        if c != '\\'
        {
            out.push(c);
            i += 1;
            continue;
        }

        let Some(&next) = chars.get(i + 1)
        else
        {
            // Lone trailing backslash
            break;
        };

        match next
        {
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{c}'),
            'r' => out.push('\r'),
            '"' | '\'' | '\\' => out.push(next),
            'u' =>
            {
                let mut j = i + 1;
                while chars.get(j) == Some(&'u')
                {
                    j += 1;
                }

                match decode_unicode_escape(&chars, j)
                {
                    Some(decoded) =>
                    {
                        out.push(decoded);
                        i = j + 4;
                    }
                    None =>
                    {
                        // Malformed: keep the text as written
                        out.push('\\');
                        i += 1;
                    }
                }
                continue;
            }
            '0'..='7' =>
            {
                let max_len = if next <= '3' { 3 } else { 2 };
                let mut value = 0u32;
                let mut len = 0;
                while len < max_len
                {
                    match chars
                        .get(i + 1 + len)
                        .and_then(|d| d.to_digit(8))
                    {
                        Some(digit) =>
                        {
                            value = value * 8 + digit;
                            len += 1;
                        }
                        None => break,
                    }
                }

                // value <= 0o377, always a valid scalar
                out.push(char::from_u32(value).unwrap_or('\u{fffd}'));
                i += 1 + len;
                continue;
            }
            other => out.push(other),
        }

        i += 2;
    }

    Cow::Owned(out)
}

fn decode_unicode_escape(
    chars: &[char],
    at: usize,
) -> Option<char>
{
    let hex: String = chars
        .get(at..at + 4)?
        .iter()
        .collect();
    if !hex
        .bytes()
        .all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }

    let code = u32::from_str_radix(&hex, 16).ok()?;

    // Lone surrogates have no scalar value
    Some(char::from_u32(code).unwrap_or('\u{fffd}'))
}

#[cfg(test)]
mod tests
{
    use super::*;

    const SAMPLE: &str = r#".class public final Lcom/example/App;
.super Ljava/lang/Object;

# annotations
.annotation runtime Lkotlin/Metadata;
    bv = {
        0x1,
        0x0,
        0x3
    }
    d1 = {
        "\u0000\u0008\n\u0002",
    }
    d2 = {
        "Lcom/example/App;",
        "",
    }
    k = 0x1
    xs = "facade"
.end annotation

.method public constructor <init>()V
.end method
"#;

    #[test]
    fn region_excludes_markers()
    {
        let region = scan_annotation(SAMPLE);

        assert_eq!(region.first(), Some(&"    bv = {"));
        assert_eq!(region.last(), Some(&"    xs = \"facade\""));
        assert!(
            !region
                .iter()
                .any(|l| l.contains(ANNOTATION_END))
        );
    }

    #[test]
    fn region_is_empty_without_start_marker()
    {
        let text = "k = 0x2\n.end annotation\n";
        assert!(scan_annotation(text).is_empty());
    }

    #[test]
    fn first_start_marker_wins()
    {
        let lines = ["a", "START", "one", "START", "two", "END", "three"];
        assert_eq!(region_between(lines, "START", "END"), vec!["one", "START", "two"]);
    }

    #[test]
    fn region_runs_to_end_without_end_marker()
    {
        let lines = ["START", "one", "two"];
        assert_eq!(region_between(lines, "START", "END"), vec!["one", "two"]);
    }

    #[test]
    fn clean_value_strips_one_layer()
    {
        assert_eq!(clean_value("  \"abc\",  "), "abc");
        assert_eq!(clean_value("0x1,,"), "0x1,");
        assert_eq!(clean_value("\"\"quoted\"\""), "\"quoted\"");
        assert_eq!(clean_value("\""), "\"");
        assert_eq!(clean_value("plain"), "plain");
    }

    #[test]
    fn single_value_reads_first_matching_key()
    {
        let region = scan_annotation(SAMPLE);

        assert_eq!(single_value(&region, "k"), "0x1");
        assert_eq!(single_value(&region, "xs"), "facade");
        assert_eq!(single_value(&region, "pn"), "");
    }

    #[test]
    fn hex_parsing_requires_prefix()
    {
        assert_eq!(parse_hex("0x7"), Some(7));
        assert_eq!(parse_hex(" 0x1f "), Some(31));
        assert_eq!(parse_hex("7"), None);
        assert_eq!(parse_hex("0x"), None);
        assert_eq!(parse_hex("0xzz"), None);
        assert_eq!(parse_hex("0x-1"), None);
        assert_eq!(parse_hex("0xffffffff"), None);
    }

    #[test]
    fn int_fields_fall_back_to_default()
    {
        let region = vec!["    k = 7", "    xi = 0x10,"];

        assert_eq!(single_int_or(&region, "k", 1), 1);
        assert_eq!(single_int_or(&region, "xi", 0), 16);
        assert_eq!(single_int_or(&region, "missing", 42), 42);
    }

    #[test]
    fn array_values_are_cleaned_and_filtered()
    {
        let region = scan_annotation(SAMPLE);

        let bv = array_or(&region, "bv", &[], parse_hex);
        assert_eq!(bv, vec![1, 0, 3]);

        let d2 = array_or(&region, "d2", &[], |s| Some(s.to_string()));
        assert_eq!(d2, vec!["Lcom/example/App;".to_string(), String::new()]);
    }

    #[test]
    fn empty_array_body_uses_cleaned_default()
    {
        let region = vec!["    mv = {", "    }"];
        let mv = array_or(&region, "mv", &["0x1,", " 0x1", "\"0xd\""], parse_hex);

        assert_eq!(mv, vec![1, 1, 13]);
    }

    #[test]
    fn missing_array_uses_default()
    {
        let region = vec!["    k = 0x1"];
        let d1: Vec<String> = array_or(&region, "d1", &[], |s| Some(s.to_string()));

        assert!(d1.is_empty());
    }

    #[test]
    fn array_stops_at_first_closing_brace()
    {
        let region = vec!["    d2 = {", "        \"a\",", "        \"}\",", "        \"b\"", "    }"];
        let d2 = array_or(&region, "d2", &[], |s| Some(s.to_string()));

        assert_eq!(d2, vec!["a".to_string()]);
    }

    #[test]
    fn unescape_handles_java_escapes()
    {
        assert_eq!(unescape_java("plain"), "plain");
        assert_eq!(unescape_java(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape_java(r#"\"q\" \'s\' \\"#), "\"q\" 's' \\");
        assert_eq!(unescape_java(r"\u0000\u0018"), "\u{0}\u{18}");
        assert_eq!(unescape_java(r"\uuu0041"), "A");
        assert_eq!(unescape_java(r"\101\7\400"), "A\u{7}\u{20}0");
        assert_eq!(unescape_java(r"\q"), "q");
        assert_eq!(unescape_java(r"\u12"), r"\u12");
        assert_eq!(unescape_java("end\\"), "end");
    }
}
