// ABOUTME: MySQL value to SQL literal rendering for dump scripts
// ABOUTME: Escapes strings, hex-encodes binary data and formats temporal values

use mysql_async::Value;

/// Render a MySQL value as a literal that can be replayed inside an INSERT.
///
/// Conversion rules:
/// - NULL → `NULL`
/// - Integers → bare numbers
/// - Floats/Doubles → bare numbers (non-finite as `NULL`, MySQL has no such values)
/// - Bytes → quoted, escaped string when valid UTF-8, `0x` hex otherwise
/// - Dates/Times → quoted MySQL literal (`'2024-01-15 10:30:45'`, `'-34:30:45'`)
///
/// The output never contains a raw line break, so one row always stays on one
/// line of the dump script.
///
/// # Examples
///
/// ```
/// # use mysql_async::Value;
/// # use seren_mysqldump::mysql::converter::value_to_sql_literal;
/// assert_eq!(value_to_sql_literal(&Value::Int(42)), "42");
/// assert_eq!(value_to_sql_literal(&Value::Bytes(b"it's".to_vec())), "'it\\'s'");
/// assert_eq!(value_to_sql_literal(&Value::NULL), "NULL");
/// ```
pub fn value_to_sql_literal(value: &Value) -> String {
    match value {
        Value::NULL => "NULL".to_string(),

        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),

        Value::Float(f) => {
            if f.is_finite() {
                f.to_string()
            } else {
                "NULL".to_string()
            }
        }

        Value::Double(d) => {
            if d.is_finite() {
                d.to_string()
            } else {
                "NULL".to_string()
            }
        }

        Value::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => format!("'{}'", escape_string(s)),
            Err(_) => hex_literal(b),
        },

        Value::Date(..) | Value::Time(..) => {
            // value_as_text always yields Some for temporal values
            format!("'{}'", value_as_text(value).unwrap_or_default())
        }
    }
}

/// Plain text form of a value, without quoting or escaping.
///
/// Returns `None` for NULL. Used for single-value introspection results such
/// as `SELECT VERSION()` or the DDL column of `SHOW CREATE TABLE`.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::NULL => None,
        Value::Int(i) => Some(i.to_string()),
        Value::UInt(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Double(d) => Some(d.to_string()),
        Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        Value::Date(year, month, day, hour, minute, second, micro) => {
            let mut text = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            if *micro > 0 {
                text.push_str(&format!(".{:06}", micro));
            }
            Some(text)
        }
        Value::Time(is_negative, days, hours, minutes, seconds, micro) => {
            // MySQL TIME literals express days as extra hours
            let sign = if *is_negative { "-" } else { "" };
            let total_hours = u64::from(*days) * 24 + u64::from(*hours);
            let mut text = format!(
                "{}{:02}:{:02}:{:02}",
                sign, total_hours, minutes, seconds
            );
            if *micro > 0 {
                text.push_str(&format!(".{:06}", micro));
            }
            Some(text)
        }
    }
}

/// Escape a string the way `mysql_real_escape_string` does.
pub fn escape_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    for c in input.chars() {
        match c {
            '\0' => escaped.push_str("\\0"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\x1a' => escaped.push_str("\\Z"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn hex_literal(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "''".to_string();
    }
    let mut hex = String::with_capacity(2 + bytes.len() * 2);
    hex.push_str("0x");
    for b in bytes {
        hex.push_str(&format!("{:02X}", b));
    }
    hex
}

/// Render one row as a parenthesised value tuple: `(1,'Alice',NULL)`.
pub fn row_to_tuple(row: &[Value]) -> String {
    let values: Vec<String> = row.iter().map(value_to_sql_literal).collect();
    format!("({})", values.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_null() {
        assert_eq!(value_to_sql_literal(&Value::NULL), "NULL");
        assert_eq!(value_as_text(&Value::NULL), None);
    }

    #[test]
    fn test_convert_numbers() {
        assert_eq!(value_to_sql_literal(&Value::Int(-7)), "-7");
        assert_eq!(value_to_sql_literal(&Value::UInt(42)), "42");
        assert_eq!(value_to_sql_literal(&Value::Double(123.456)), "123.456");
    }

    #[test]
    fn test_convert_non_finite_double() {
        assert_eq!(value_to_sql_literal(&Value::Double(f64::NAN)), "NULL");
        assert_eq!(value_to_sql_literal(&Value::Float(f32::INFINITY)), "NULL");
    }

    #[test]
    fn test_convert_string_bytes_escapes_specials() {
        let value = Value::Bytes(b"line1\nline2 'q' \\ \"d\"".to_vec());
        let literal = value_to_sql_literal(&value);
        assert_eq!(literal, r#"'line1\nline2 \'q\' \\ \"d\"'"#);
        assert!(!literal.contains('\n'));
    }

    #[test]
    fn test_convert_binary_bytes() {
        let value = Value::Bytes(vec![0xFF, 0xFE, 0x00]);
        assert_eq!(value_to_sql_literal(&value), "0xFFFE00");
    }

    #[test]
    fn test_convert_datetime() {
        let value = Value::Date(2024, 1, 15, 10, 30, 45, 0);
        assert_eq!(value_to_sql_literal(&value), "'2024-01-15 10:30:45'");

        let value = Value::Date(2024, 1, 15, 10, 30, 45, 123456);
        assert_eq!(value_to_sql_literal(&value), "'2024-01-15 10:30:45.123456'");
    }

    #[test]
    fn test_convert_time() {
        let value = Value::Time(true, 1, 10, 30, 45, 0);
        assert_eq!(value_to_sql_literal(&value), "'-34:30:45'");
    }

    #[test]
    fn test_row_to_tuple() {
        let row = vec![
            Value::Int(1),
            Value::Bytes(b"Alice".to_vec()),
            Value::NULL,
        ];
        assert_eq!(row_to_tuple(&row), "(1,'Alice',NULL)");
    }
}
