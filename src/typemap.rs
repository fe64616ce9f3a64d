use crate::error::PgrecError;

/// The seven primitive kinds a recognized PostgreSQL column type maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Text,
    Boolean,
    Integer,
    Float,
    Date,
    Time,
    Timestamp,
}

/// The resolved target type of a column: a primitive kind plus whether the
/// generated field is wrapped in `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub kind: PrimitiveKind,
    pub nullable: bool,
}

/// A column default parsed into its column's primitive kind. Temporal
/// defaults are kept as the cleaned literal text.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Literal(String),
}

/// Map a PostgreSQL type name to a target field type.
///
/// A column with a server-side default never surfaces as nullable: the
/// default supplies a value whenever one is omitted, so `Option` would only
/// get in the caller's way.
pub fn map_type(
    native: &str,
    is_nullable: bool,
    has_default: bool,
) -> Result<FieldType, PgrecError> {
    let kind = match native {
        "character varying" | "text" => PrimitiveKind::Text,
        "boolean" => PrimitiveKind::Boolean,
        "smallint" | "integer" | "bigint" => PrimitiveKind::Integer,
        "real" | "double precision" => PrimitiveKind::Float,
        "date" => PrimitiveKind::Date,
        "time" | "time with time zone" | "time without time zone" => PrimitiveKind::Time,
        "timestamp" | "timestamp with time zone" | "timestamp without time zone" => {
            PrimitiveKind::Timestamp
        }
        other => return Err(PgrecError::UnrecognizedType(other.to_string())),
    };

    Ok(FieldType {
        kind,
        nullable: is_nullable && !has_default,
    })
}

/// Parse a catalog default expression into the column's primitive kind.
///
/// PostgreSQL reports defaults as SQL expressions (`0`, `'x'::text`,
/// `now()`, `nextval('seq'::regclass)`). Function-call expressions are not
/// literals and yield `None`; the column still counts as having a default
/// for nullability purposes.
pub fn parse_default(kind: PrimitiveKind, raw: &str) -> Option<DefaultValue> {
    let cleaned = strip_typecast(raw);
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("null") {
        return None;
    }

    let quoted = unquote(cleaned);
    if quoted.is_none() && cleaned.contains('(') {
        return None;
    }

    // Non-text defaults may still be quoted in the catalog expression,
    // e.g. DEFAULT -1 on an integer column surfaces as '-1'::integer.
    let literal = quoted.as_deref().unwrap_or(cleaned);

    match kind {
        PrimitiveKind::Text => quoted.map(DefaultValue::Text),
        PrimitiveKind::Boolean => match literal.to_ascii_lowercase().as_str() {
            "true" => Some(DefaultValue::Bool(true)),
            "false" => Some(DefaultValue::Bool(false)),
            _ => None,
        },
        PrimitiveKind::Integer => literal.parse::<i64>().ok().map(DefaultValue::Int),
        PrimitiveKind::Float => literal.parse::<f64>().ok().map(DefaultValue::Float),
        PrimitiveKind::Date | PrimitiveKind::Time | PrimitiveKind::Timestamp => {
            Some(DefaultValue::Literal(quoted.unwrap_or_else(|| cleaned.to_string())))
        }
    }
}

/// Strip a trailing PostgreSQL type cast from a default expression.
/// e.g. "'hello'::character varying" -> "'hello'"
/// e.g. "0::integer" -> "0"
fn strip_typecast(expr: &str) -> &str {
    if let Some(pos) = find_typecast_pos(expr) {
        expr[..pos].trim()
    } else {
        expr.trim()
    }
}

fn find_typecast_pos(expr: &str) -> Option<usize> {
    let bytes = expr.as_bytes();
    let mut in_quotes = false;
    let mut in_parens = 0u32;
    let mut i = 0;
    let mut last_cast_pos = None;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_quotes = !in_quotes,
            b'(' if !in_quotes => in_parens += 1,
            b')' if !in_quotes => in_parens = in_parens.saturating_sub(1),
            b':' if !in_quotes && in_parens == 0 && i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                last_cast_pos = Some(i);
                i += 1; // skip second ':'
            }
            _ => {}
        }
        i += 1;
    }

    last_cast_pos
}

/// Unwrap a single-quoted SQL literal, undoing doubled-quote escapes.
fn unquote(expr: &str) -> Option<String> {
    let inner = expr.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECOGNIZED: &[(&str, PrimitiveKind)] = &[
        ("character varying", PrimitiveKind::Text),
        ("text", PrimitiveKind::Text),
        ("boolean", PrimitiveKind::Boolean),
        ("smallint", PrimitiveKind::Integer),
        ("integer", PrimitiveKind::Integer),
        ("bigint", PrimitiveKind::Integer),
        ("real", PrimitiveKind::Float),
        ("double precision", PrimitiveKind::Float),
        ("date", PrimitiveKind::Date),
        ("time", PrimitiveKind::Time),
        ("time with time zone", PrimitiveKind::Time),
        ("time without time zone", PrimitiveKind::Time),
        ("timestamp", PrimitiveKind::Timestamp),
        ("timestamp with time zone", PrimitiveKind::Timestamp),
        ("timestamp without time zone", PrimitiveKind::Timestamp),
    ];

    #[test]
    fn test_recognized_types_total() {
        for &(native, kind) in RECOGNIZED {
            for is_nullable in [false, true] {
                for has_default in [false, true] {
                    let t = map_type(native, is_nullable, has_default).unwrap();
                    assert_eq!(t.kind, kind, "{native}");
                    assert_eq!(t.nullable, is_nullable && !has_default, "{native}");
                }
            }
        }
    }

    #[test]
    fn test_default_suppresses_nullable() {
        let t = map_type("integer", true, true).unwrap();
        assert!(!t.nullable);
        let t = map_type("integer", true, false).unwrap();
        assert!(t.nullable);
    }

    #[test]
    fn test_unrecognized_type_fails() {
        let err = map_type("jsonb", false, false).unwrap_err();
        assert!(matches!(err, PgrecError::UnrecognizedType(ref t) if t == "jsonb"));
    }

    #[test]
    fn test_parse_default_int() {
        assert_eq!(
            parse_default(PrimitiveKind::Integer, "0"),
            Some(DefaultValue::Int(0))
        );
        assert_eq!(
            parse_default(PrimitiveKind::Integer, "42::bigint"),
            Some(DefaultValue::Int(42))
        );
    }

    #[test]
    fn test_parse_default_text() {
        assert_eq!(
            parse_default(PrimitiveKind::Text, "'hello'::character varying"),
            Some(DefaultValue::Text("hello".to_string()))
        );
        assert_eq!(
            parse_default(PrimitiveKind::Text, "'it''s'::text"),
            Some(DefaultValue::Text("it's".to_string()))
        );
    }

    #[test]
    fn test_parse_default_quoted_numeric() {
        assert_eq!(
            parse_default(PrimitiveKind::Integer, "'-1'::integer"),
            Some(DefaultValue::Int(-1))
        );
        assert_eq!(
            parse_default(PrimitiveKind::Float, "'1.5'::double precision"),
            Some(DefaultValue::Float(1.5))
        );
        assert_eq!(
            parse_default(PrimitiveKind::Boolean, "'false'::boolean"),
            Some(DefaultValue::Bool(false))
        );
    }

    #[test]
    fn test_parse_default_bool_and_float() {
        assert_eq!(
            parse_default(PrimitiveKind::Boolean, "true"),
            Some(DefaultValue::Bool(true))
        );
        assert_eq!(
            parse_default(PrimitiveKind::Float, "1.5"),
            Some(DefaultValue::Float(1.5))
        );
    }

    #[test]
    fn test_parse_default_expressions_skipped() {
        assert_eq!(parse_default(PrimitiveKind::Timestamp, "now()"), None);
        assert_eq!(
            parse_default(PrimitiveKind::Integer, "nextval('users_id_seq'::regclass)"),
            None
        );
        assert_eq!(parse_default(PrimitiveKind::Text, "NULL"), None);
    }

    #[test]
    fn test_parse_default_temporal_literal() {
        assert_eq!(
            parse_default(PrimitiveKind::Date, "'2020-01-01'::date"),
            Some(DefaultValue::Literal("2020-01-01".to_string()))
        );
    }
}
