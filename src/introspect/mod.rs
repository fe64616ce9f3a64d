mod columns;
mod constraints;
mod order;

use sqlx::PgPool;

use crate::error::PgrecError;
use crate::schema::{CatalogSchema, TableSchema};

/// Introspect one schema of the connected database and return its catalog
/// model, tables in dependency order.
///
/// All-or-nothing: the first failing table aborts the build, and a schema
/// with no tables is an error rather than an empty model.
pub async fn build_catalog(pool: &PgPool, schema: &str) -> Result<CatalogSchema, PgrecError> {
    let table_names = order::order_tables(pool, schema).await?;
    ensure_not_empty(schema, &table_names)?;

    let mut tables = Vec::with_capacity(table_names.len());
    for table_name in &table_names {
        tracing::debug!("Loading table {schema}.{table_name}");
        tables.push(load_table(pool, schema, table_name).await?);
    }

    Ok(CatalogSchema {
        name: schema.to_string(),
        tables,
    })
}

/// A schema with no tables is a distinguishable fatal state, not a valid
/// empty model.
fn ensure_not_empty(schema: &str, table_names: &[String]) -> Result<(), PgrecError> {
    if table_names.is_empty() {
        return Err(PgrecError::EmptySchema(schema.to_string()));
    }
    Ok(())
}

/// Load one table: comment, typed columns, then key metadata.
async fn load_table(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<TableSchema, PgrecError> {
    let comment = columns::query_table_comment(pool, schema, table_name).await?;
    let columns = columns::query_columns(pool, schema, table_name).await?;

    let pk_rows = constraints::query_primary_key(pool, schema, table_name).await?;
    let primary_key = constraints::resolve_primary_key(&pk_rows);

    let fk_rows = constraints::query_foreign_keys(pool, schema, table_name).await?;
    let columns = constraints::attach_foreign_keys(table_name, columns, &fk_rows)?;

    Ok(TableSchema {
        name: table_name.to_string(),
        comment,
        columns,
        primary_key,
    })
}
