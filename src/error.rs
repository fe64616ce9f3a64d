use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgrecError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unrecognized database type: {0}")]
    UnrecognizedType(String),

    #[error("Foreign key {constraint} on {table}.{column} references schema {ref_schema}, which is not the table's schema {schema}")]
    CrossSchemaReference {
        constraint: String,
        schema: String,
        table: String,
        column: String,
        ref_schema: String,
    },

    #[error("Column {table}.{column} already has a foreign key constraint")]
    DuplicateForeignKey { table: String, column: String },

    #[error("Constraint {constraint} names unknown column {table}.{column}")]
    UnknownColumn {
        constraint: String,
        table: String,
        column: String,
    },

    #[error("Schema {0} contains no tables")]
    EmptySchema(String),

    #[error("Tables form a foreign-key cycle and cannot be ordered: {}", .0.join(", "))]
    CyclicDependency(Vec<String>),
}
