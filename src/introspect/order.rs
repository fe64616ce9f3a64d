use std::collections::{BTreeMap, BTreeSet};

use sqlx::PgPool;

use crate::error::PgrecError;

/// Compute the order tables must be declared in so that every table appears
/// after the tables its foreign keys reference.
pub async fn order_tables(pool: &PgPool, schema: &str) -> Result<Vec<String>, PgrecError> {
    let tables = query_table_names(pool, schema).await?;
    let edges = query_foreign_key_edges(pool, schema).await?;
    order_by_dependency(&tables, &edges)
}

async fn query_table_names(pool: &PgPool, schema: &str) -> Result<Vec<String>, PgrecError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT t.table_name
        FROM information_schema.tables t
        WHERE t.table_catalog = CURRENT_CATALOG
            AND t.table_schema = $1
            AND t.table_type = 'BASE TABLE'
        ORDER BY t.table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await?;

    Ok(names)
}

/// One row per referencing column: the table that carries the foreign key and
/// the table its key points at.
async fn query_foreign_key_edges(
    pool: &PgPool,
    schema: &str,
) -> Result<Vec<EdgeRow>, PgrecError> {
    let rows = sqlx::query_as::<_, EdgeRow>(
        r#"
        SELECT fkey.table_name, pkey.table_name AS ref_table
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
            AND fkey.table_schema = $1
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Depth-label the foreign-key graph and return tables sorted by depth, then
/// name.
///
/// Depth 1 holds every table with no outbound foreign keys. Each later round
/// labels the tables whose dependencies are all labeled already, so a table
/// reachable over paths of different length lands at the depth its longest
/// required chain dictates, and appears exactly once. Self-references do not
/// count as dependencies; tables left unlabeled once the rounds stop form a
/// cycle, which is an error rather than a silent omission.
pub fn order_by_dependency(
    tables: &[String],
    edges: &[EdgeRow],
) -> Result<Vec<String>, PgrecError> {
    let known: BTreeSet<&str> = tables.iter().map(String::as_str).collect();

    let mut deps: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for table in tables {
        deps.insert(table, BTreeSet::new());
    }
    for edge in edges {
        if edge.table_name == edge.ref_table {
            continue;
        }
        // Referenced tables outside the schema's table set are resolved (and
        // rejected) by the constraint pass, not by the orderer.
        if !known.contains(edge.ref_table.as_str()) {
            continue;
        }
        if let Some(set) = deps.get_mut(edge.table_name.as_str()) {
            set.insert(&edge.ref_table);
        }
    }

    let mut depth: BTreeMap<&str, u32> = BTreeMap::new();
    let mut current = 1u32;
    loop {
        let ready: Vec<&str> = deps
            .iter()
            .filter(|(table, _)| !depth.contains_key(*table))
            .filter(|(_, d)| d.iter().all(|dep| depth.contains_key(dep)))
            .map(|(table, _)| *table)
            .collect();
        if ready.is_empty() {
            break;
        }
        for table in ready {
            depth.insert(table, current);
        }
        current += 1;
    }

    if depth.len() != tables.len() {
        let cyclic: Vec<String> = tables
            .iter()
            .filter(|t| !depth.contains_key(t.as_str()))
            .cloned()
            .collect();
        return Err(PgrecError::CyclicDependency(cyclic));
    }

    let mut ordered: Vec<&str> = depth.keys().copied().collect();
    ordered.sort_by_key(|t| (depth[t], *t));
    Ok(ordered.into_iter().map(str::to_string).collect())
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EdgeRow {
    pub table_name: String,
    pub ref_table: String,
}
