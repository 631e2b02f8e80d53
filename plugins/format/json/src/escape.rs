//! JSON string escaping.
//!
//! Output is HTML/JS-safe on top of being valid JSON:
//! - `"` and `\` → backslash-escaped
//! - `\n`, `\r`, `\t` → `\n`, `\r`, `\t`
//! - other bytes below 0x20, and `<`, `>`, `&` → `\u00XX`
//! - U+2028 / U+2029 → `\u2028` / `\u2029`

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Append `s` to `out` as a quoted JSON string.
pub fn write_escaped(out: &mut String, s: &str) {
    out.push('"');
    write_escaped_body(out, s);
    out.push('"');
}

pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_escaped(&mut out, s);
    out
}

fn write_escaped_body(out: &mut String, s: &str) {
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' | '\\' => {
                out.push_str(&s[start..i]);
                out.push('\\');
                out.push(c);
            }
            '\n' => {
                out.push_str(&s[start..i]);
                out.push_str("\\n");
            }
            '\r' => {
                out.push_str(&s[start..i]);
                out.push_str("\\r");
            }
            '\t' => {
                out.push_str(&s[start..i]);
                out.push_str("\\t");
            }
            '\u{2028}' | '\u{2029}' => {
                out.push_str(&s[start..i]);
                out.push_str("\\u202");
                out.push(HEX[(c as usize) & 0xF] as char);
            }
            c if (c as u32) < 0x20 || c == '<' || c == '>' || c == '&' => {
                let b = c as usize;
                out.push_str(&s[start..i]);
                out.push_str("\\u00");
                out.push(HEX[b >> 4] as char);
                out.push(HEX[b & 0xF] as char);
            }
            _ => continue,
        }
        start = i + c.len_utf8();
    }
    out.push_str(&s[start..]);
}
