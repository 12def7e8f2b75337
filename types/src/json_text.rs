//! JSON text as a browser writes it.
//!
//! A page that parses a body and stringifies it again does not get the body
//! back verbatim. The object model puts array-index keys first in ascending
//! order, and every number is a double printed in its shortest form, so `1.0`
//! and `1e2` come out as `1` and `100`. [`to_json_text`] reproduces that
//! output from a parsed [`Value`].

use serde_json::{Map, Number, Value};

/// Compact JSON text of `value`, matching `JSON.stringify(value)`.
#[must_use]
pub fn to_json_text(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(out, map),
    }
}

fn write_object(out: &mut String, map: &Map<String, Value>) {
    let mut indexed: Vec<(u32, &String, &Value)> = Vec::new();
    let mut named: Vec<(&String, &Value)> = Vec::new();
    for (key, value) in map {
        match array_index(key) {
            Some(index) => indexed.push((index, key, value)),
            None => named.push((key, value)),
        }
    }
    indexed.sort_by_key(|(index, _, _)| *index);

    out.push('{');
    let entries = indexed
        .into_iter()
        .map(|(_, key, value)| (key, value))
        .chain(named);
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push(':');
        write_value(out, value);
    }
    out.push('}');
}

/// `key` as an array index: canonical decimal, below `2^32 - 1`.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

fn write_number(out: &mut String, n: &Number) {
    match n.as_f64() {
        Some(f) => write_double(out, f),
        None => out.push_str(&n.to_string()),
    }
}

/// Number-to-string for a double: shortest round-trip digits, plain notation
/// for exponents in `-7..21`, `d.ddde+x` otherwise.
fn write_double(out: &mut String, f: f64) {
    if !f.is_finite() {
        out.push_str("null");
        return;
    }
    if f == 0.0 {
        out.push('0');
        return;
    }
    if f < 0.0 {
        out.push('-');
    }

    // `{:e}` gives the shortest round-trip digits, e.g. `1.2345e-7`.
    let sci = format!("{:e}", f.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;
    let zeros = |count: i32| std::iter::repeat_n('0', usize::try_from(count).unwrap_or(0));

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(zeros(n - k));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(usize::try_from(n).unwrap_or(0));
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(zeros(-n));
        out.push_str(&digits);
    } else {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let e = n - 1;
        out.push('e');
        out.push(if e < 0 { '-' } else { '+' });
        out.push_str(&e.abs().to_string());
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reparse(body: &str) -> String {
        let value: Value = serde_json::from_str(body).unwrap();
        to_json_text(&value)
    }

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(reparse("[1.0,1e2,-3.0,0.5,-0]"), "[1,100,-3,0.5,0]");
    }

    #[test]
    fn exponent_form_follows_magnitude() {
        assert_eq!(
            reparse("[1e21,1e20,1.5e-7,0.000001,123.456]"),
            "[1e+21,100000000000000000000,1.5e-7,0.000001,123.456]"
        );
        assert_eq!(reparse("[-2.5e-10,6.02e23]"), "[-2.5e-10,6.02e+23]");
    }

    #[test]
    fn integers_beyond_double_precision_round() {
        assert_eq!(reparse("12345678901234567890"), "12345678901234567000");
        assert_eq!(reparse("9007199254740993"), "9007199254740992");
    }

    #[test]
    fn index_keys_sort_first() {
        assert_eq!(
            reparse(r#"{"b":1,"10":2,"a":3,"2":4,"0":5}"#),
            r#"{"0":5,"2":4,"10":2,"b":1,"a":3}"#
        );
    }

    #[test]
    fn non_canonical_numeric_keys_keep_insertion_order() {
        assert_eq!(
            reparse(r#"{"z":0,"01":1,"4294967295":2,"-1":3,"4294967294":4}"#),
            r#"{"4294967294":4,"z":0,"01":1,"4294967295":2,"-1":3}"#
        );
    }

    #[test]
    fn nested_objects_are_reordered_too() {
        assert_eq!(
            reparse(r#"{"outer":{"x":1,"3":[{"k":1,"1":2}]}}"#),
            r#"{"outer":{"3":[{"1":2,"k":1}],"x":1}}"#
        );
    }

    #[test]
    fn strings_escape_like_the_browser() {
        let value = json!("q\"b\\\n\t\u{1}\u{7f}é</");
        assert_eq!(to_json_text(&value), "\"q\\\"b\\\\\\n\\t\\u0001\u{7f}é</\"");
    }

    #[test]
    fn plain_documents_are_unchanged() {
        let body = r#"{"zeta":1,"alpha":[true,null,"s"],"n":-42}"#;
        assert_eq!(reparse(body), body);
    }
}
