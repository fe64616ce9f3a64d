use crate::schema::ColumnSchema;
use crate::typemap::{FieldType, PrimitiveKind};

/// Create a ColumnSchema with sensible defaults for testing.
/// Returns a non-nullable integer column with no default, comment, or key.
pub fn test_column(name: &str) -> ColumnSchema {
    ColumnSchema {
        name: name.to_string(),
        field_type: test_type(PrimitiveKind::Integer, false),
        default: None,
        comment: None,
        character_maximum_length: None,
        is_identity: false,
        foreign_key: None,
    }
}

pub fn test_type(kind: PrimitiveKind, nullable: bool) -> FieldType {
    FieldType { kind, nullable }
}
