use sqlx::PgPool;

use crate::error::PgrecError;
use crate::schema::ColumnSchema;
use crate::typemap::{map_type, parse_default};

/// Fetch the table-level comment, if any.
pub async fn query_table_comment(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Option<String>, PgrecError> {
    let comment = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT obj_description(
            (quote_ident($1) || '.' || quote_ident($2))::regclass
        )
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Fetch a table's columns in ordinal order and resolve each one's target
/// type and default. Constraint metadata is attached by a later pass.
pub async fn query_columns(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<ColumnSchema>, PgrecError> {
    let rows = sqlx::query_as::<_, ColumnRow>(
        r#"
        SELECT c.column_name, c.is_nullable = 'YES' AS is_nullable, c.data_type,
               c.column_default, c.character_maximum_length::int4,
               c.is_identity = 'YES' AS is_identity,
               col_description(
                   (quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass,
                   c.ordinal_position
               ) AS comment
        FROM information_schema.columns c
        WHERE c.table_catalog = CURRENT_CATALOG
            AND c.table_schema = $1 AND c.table_name = $2
        ORDER BY c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(build_column).collect()
}

/// Resolve one catalog row into a column descriptor. Fails on an
/// unrecognized native type; no partial table survives that.
pub fn build_column(row: ColumnRow) -> Result<ColumnSchema, PgrecError> {
    let field_type = map_type(&row.data_type, row.is_nullable, row.column_default.is_some())?;
    let default = row
        .column_default
        .as_deref()
        .and_then(|raw| parse_default(field_type.kind, raw));

    Ok(ColumnSchema {
        name: row.column_name,
        field_type,
        default,
        comment: row.comment,
        character_maximum_length: row.character_maximum_length,
        is_identity: row.is_identity,
        foreign_key: None,
    })
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ColumnRow {
    pub column_name: String,
    pub is_nullable: bool,
    pub data_type: String,
    pub column_default: Option<String>,
    pub character_maximum_length: Option<i32>,
    pub is_identity: bool,
    pub comment: Option<String>,
}
