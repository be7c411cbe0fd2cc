//! Line-oriented `key=value` reader for TeamCity properties files.
//!
//! The file is read whole into an owned buffer and scanned once per query;
//! there is no persistent parsed mapping. Values use a limited escape
//! scheme: `\\` decodes to a backslash and `\:` to a colon, while any other
//! backslash passes through literally. This is the TeamCity agent's own
//! two-sequence encoding, not full Java-properties escaping.

/// Looks up `key` in raw properties-file contents.
///
/// Lines are delimited by `\n` or `\r`; the key is everything before the
/// first `=` and is compared exactly, case-sensitively. Lines without `=`
/// are skipped. The first matching line wins and its value is returned
/// decoded, as an owned string independent of `contents`.
pub fn lookup(contents: &[u8], key: &str) -> Option<String> {
    contents
        .split(|&b| b == b'\n' || b == b'\r')
        .find_map(|line| {
            let eq = line.iter().position(|&b| b == b'=')?;
            if &line[..eq] == key.as_bytes() {
                Some(decode_value(&line[eq + 1..]))
            } else {
                None
            }
        })
}

/// Decodes the value side of a matched line.
///
/// Consumes two bytes and emits one for `\\` and `\:`; every other byte,
/// including a lone or trailing backslash, is copied unchanged.
fn decode_value(raw: &[u8]) -> String {
    let mut decoded = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' && matches!(raw.get(i + 1), Some(&(b'\\' | b':'))) {
            decoded.push(raw[i + 1]);
            i += 2;
        } else {
            decoded.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
