use crate::typemap::{DefaultValue, FieldType};

/// The introspected model of one database schema (namespace), with tables
/// stored in foreign-key dependency order.
#[derive(Debug, Clone)]
pub struct CatalogSchema {
    pub name: String,
    pub tables: Vec<TableSchema>,
}

/// Metadata for a single table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub comment: Option<String>,
    /// Columns in catalog ordinal order.
    pub columns: Vec<ColumnSchema>,
    pub primary_key: Option<PrimaryKey>,
}

/// Metadata for a single column.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ColumnSchema {
    pub name: String,
    pub field_type: FieldType,
    /// Default literal parsed into the column's primitive kind, when the
    /// catalog default is a literal rather than a server-side expression.
    pub default: Option<DefaultValue>,
    pub comment: Option<String>,
    pub character_maximum_length: Option<i32>,
    pub is_identity: bool,
    pub foreign_key: Option<ForeignKey>,
}

/// A table's primary key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub name: String,
    pub columns: PrimaryKeyColumns,
}

/// Single-column keys keep the scalar shape; the list form is reserved for
/// composite keys, in catalog ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKeyColumns {
    Single(String),
    Composite(Vec<String>),
}

/// A foreign key constraint attached to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub references: Reference,
}

/// The primary-key column a foreign key points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub table: String,
    pub column: String,
}
