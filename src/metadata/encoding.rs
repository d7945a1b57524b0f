//! `d1` string array to protobuf bytes.
//!
//! Two layouts exist. Current compilers prefix the first string with
//! `\u0000` and store one byte per char. Older compilers pack 7-bit groups
//! (optionally behind a `\u0001` marker) after adding 1 modulo 128 to each
//! byte.

const UTF8_MODE_MARKER: char = '\u{0}';
const EIGHT_TO_SEVEN_MODE_MARKER: char = '\u{1}';

/// Turn the `d1` strings of a header into the raw metadata bytes.
pub fn decode_bytes(data: &[String]) -> Vec<u8>
{
    let marker = data
        .first()
        .and_then(|first| {
            first
                .chars()
                .next()
        });

    match marker
    {
        Some(UTF8_MODE_MARKER) => chars_to_bytes(data, true),
        Some(EIGHT_TO_SEVEN_MODE_MARKER) => decode_7_to_8(&subtract_one(chars_to_bytes(data, true))),
        _ => decode_7_to_8(&subtract_one(chars_to_bytes(data, false))),
    }
}

/// One byte per char, low 8 bits, optionally skipping the mode marker.
fn chars_to_bytes(
    data: &[String],
    drop_marker: bool,
) -> Vec<u8>
{
    let capacity = data
        .iter()
        .map(String::len)
        .sum();
    let mut bytes = Vec::with_capacity(capacity);

    for (index, string) in data
        .iter()
        .enumerate()
    {
        let skip = usize::from(drop_marker && index == 0);
        bytes.extend(
            string
                .chars()
                .skip(skip)
                .map(|c| c as u32 as u8),
        );
    }

    bytes
}

/// Adding 0x7f modulo 128 undoes the +1 applied by the encoder.
fn subtract_one(mut bytes: Vec<u8>) -> Vec<u8>
{
    for byte in &mut bytes
    {
        *byte = byte.wrapping_add(0x7f) & 0x7f;
    }
    bytes
}

/// Repack a stream of 7-bit groups into whole bytes.
fn decode_7_to_8(data: &[u8]) -> Vec<u8>
{
    let result_len = 7 * data.len() / 8;
    let mut result = Vec::with_capacity(result_len);

    let mut byte_index = 0;
    let mut bit = 0u32;

    for _ in 0..result_len
    {
        let first = u32::from(data[byte_index]) >> bit;
        byte_index += 1;
        let second = (u32::from(data[byte_index]) & ((1 << (bit + 1)) - 1)) << (7 - bit);
        result.push((first + second) as u8);

        if bit == 6
        {
            byte_index += 1;
            bit = 0;
        }
        else
        {
            bit += 1;
        }
    }

    result
}
