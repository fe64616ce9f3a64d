use sqlx::PgPool;

use crate::error::PgrecError;
use crate::schema::{ColumnSchema, ForeignKey, PrimaryKey, PrimaryKeyColumns, Reference};

/// Query the primary-key rows for a table, in key ordinal order.
pub async fn query_primary_key(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<PkRow>, PgrecError> {
    let rows = sqlx::query_as::<_, PkRow>(
        r#"
        SELECT kcu.constraint_name, kcu.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            USING (constraint_name, table_schema, table_name)
        WHERE kcu.table_catalog = CURRENT_CATALOG
            AND tc.table_schema = $1 AND tc.table_name = $2
            AND tc.constraint_type = 'PRIMARY KEY'
        ORDER BY kcu.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Query the foreign-key rows for a table: each referencing column joined to
/// the primary-key column it points at.
pub async fn query_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<FkRow>, PgrecError> {
    let rows = sqlx::query_as::<_, FkRow>(
        r#"
        SELECT fkey.constraint_name, fkey.table_schema AS fk_schema,
               fkey.column_name AS fk_column,
               pkey.table_schema AS ref_schema, pkey.table_name AS ref_table,
               pkey.column_name AS ref_column
        FROM information_schema.referential_constraints rc
        JOIN information_schema.key_column_usage pkey
            ON rc.unique_constraint_catalog = pkey.constraint_catalog
            AND rc.unique_constraint_schema = pkey.constraint_schema
            AND rc.unique_constraint_name = pkey.constraint_name
        JOIN information_schema.key_column_usage fkey
            ON rc.constraint_catalog = fkey.constraint_catalog
            AND rc.constraint_schema = fkey.constraint_schema
            AND rc.constraint_name = fkey.constraint_name
        WHERE fkey.table_catalog = CURRENT_CATALOG
            AND fkey.table_schema = $1 AND fkey.table_name = $2
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Build a table's primary key from its key-column-usage rows.
///
/// All rows of a composite key share one constraint name; the scalar shape is
/// kept for single-column keys.
pub fn resolve_primary_key(rows: &[PkRow]) -> Option<PrimaryKey> {
    match rows {
        [] => None,
        [row] => Some(PrimaryKey {
            name: row.constraint_name.clone(),
            columns: PrimaryKeyColumns::Single(row.column_name.clone()),
        }),
        [first, ..] => Some(PrimaryKey {
            name: first.constraint_name.clone(),
            columns: PrimaryKeyColumns::Composite(
                rows.iter().map(|r| r.column_name.clone()).collect(),
            ),
        }),
    }
}

/// Attach foreign-key references to columns, returning the rebuilt column
/// list. Cross-schema references and a second constraint on one column are
/// both unsupported and fail the run.
pub fn attach_foreign_keys(
    table_name: &str,
    mut columns: Vec<ColumnSchema>,
    rows: &[FkRow],
) -> Result<Vec<ColumnSchema>, PgrecError> {
    for row in rows {
        if row.fk_schema != row.ref_schema {
            return Err(PgrecError::CrossSchemaReference {
                constraint: row.constraint_name.clone(),
                schema: row.fk_schema.clone(),
                table: table_name.to_string(),
                column: row.fk_column.clone(),
                ref_schema: row.ref_schema.clone(),
            });
        }

        let column = columns
            .iter_mut()
            .find(|c| c.name == row.fk_column)
            .ok_or_else(|| PgrecError::UnknownColumn {
                constraint: row.constraint_name.clone(),
                table: table_name.to_string(),
                column: row.fk_column.clone(),
            })?;

        if column.foreign_key.is_some() {
            return Err(PgrecError::DuplicateForeignKey {
                table: table_name.to_string(),
                column: row.fk_column.clone(),
            });
        }

        column.foreign_key = Some(ForeignKey {
            name: row.constraint_name.clone(),
            references: Reference {
                table: row.ref_table.clone(),
                column: row.ref_column.clone(),
            },
        });
    }

    Ok(columns)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PkRow {
    pub constraint_name: String,
    pub column_name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FkRow {
    pub constraint_name: String,
    pub fk_schema: String,
    pub fk_column: String,
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_column: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_column;

    fn pk_row(constraint: &str, column: &str) -> PkRow {
        PkRow {
            constraint_name: constraint.to_string(),
            column_name: column.to_string(),
        }
    }

    fn fk_row(constraint: &str, column: &str, ref_table: &str, ref_column: &str) -> FkRow {
        FkRow {
            constraint_name: constraint.to_string(),
            fk_schema: "public".to_string(),
            fk_column: column.to_string(),
            ref_schema: "public".to_string(),
            ref_table: ref_table.to_string(),
            ref_column: ref_column.to_string(),
        }
    }

    #[test]
    fn test_no_primary_key() {
        assert_eq!(resolve_primary_key(&[]), None);
    }

    #[test]
    fn test_single_column_primary_key() {
        let pk = resolve_primary_key(&[pk_row("users_pkey", "id")]).unwrap();
        assert_eq!(pk.name, "users_pkey");
        assert_eq!(pk.columns, PrimaryKeyColumns::Single("id".to_string()));
    }

    #[test]
    fn test_composite_primary_key_preserves_order() {
        let pk = resolve_primary_key(&[
            pk_row("order_items_pkey", "order_id"),
            pk_row("order_items_pkey", "product_id"),
        ])
        .unwrap();
        assert_eq!(pk.name, "order_items_pkey");
        assert_eq!(
            pk.columns,
            PrimaryKeyColumns::Composite(vec![
                "order_id".to_string(),
                "product_id".to_string()
            ])
        );
    }

    #[test]
    fn test_attach_foreign_key() {
        let columns = vec![test_column("id"), test_column("customer_id")];
        let rows = [fk_row("orders_customer_id_fkey", "customer_id", "customers", "id")];
        let columns = attach_foreign_keys("orders", columns, &rows).unwrap();

        assert_eq!(columns[0].foreign_key, None);
        let fk = columns[1].foreign_key.as_ref().unwrap();
        assert_eq!(fk.name, "orders_customer_id_fkey");
        assert_eq!(fk.references.table, "customers");
        assert_eq!(fk.references.column, "id");
    }

    #[test]
    fn test_duplicate_foreign_key_rejected() {
        let columns = vec![test_column("customer_id")];
        let rows = [
            fk_row("fk_one", "customer_id", "customers", "id"),
            fk_row("fk_two", "customer_id", "accounts", "id"),
        ];
        let err = attach_foreign_keys("orders", columns, &rows).unwrap_err();
        assert!(matches!(
            err,
            PgrecError::DuplicateForeignKey { ref column, .. } if column == "customer_id"
        ));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let columns = vec![test_column("id")];
        let rows = [fk_row("orders_customer_id_fkey", "customer_id", "customers", "id")];
        let err = attach_foreign_keys("orders", columns, &rows).unwrap_err();
        assert!(matches!(
            err,
            PgrecError::UnknownColumn { ref column, .. } if column == "customer_id"
        ));
    }

    #[test]
    fn test_cross_schema_reference_rejected() {
        let columns = vec![test_column("customer_id")];
        let mut row = fk_row("fk_one", "customer_id", "customers", "id");
        row.ref_schema = "archive".to_string();
        let err = attach_foreign_keys("orders", columns, &[row]).unwrap_err();
        assert!(matches!(err, PgrecError::CrossSchemaReference { .. }));
    }
}
