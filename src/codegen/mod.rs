use heck::ToUpperCamelCase;

use crate::schema::{CatalogSchema, ColumnSchema, PrimaryKeyColumns, TableSchema};
use crate::typemap::{DefaultValue, FieldType, PrimitiveKind};

/// Render a catalog model as Rust source: one struct per table, in the
/// model's stored (dependency) order.
pub fn generate(catalog: &CatalogSchema) -> String {
    let mut output = String::new();
    output.push_str("// This source file has been generated by pgrec, do not edit\n");
    output.push_str("#![allow(dead_code)]\n");

    for table in &catalog.tables {
        output.push('\n');
        output.push_str(&generate_table(table));
    }

    output
}

fn generate_table(table: &TableSchema) -> String {
    let struct_name = struct_name(&table.name);
    let mut lines: Vec<String> = Vec::new();

    if let Some(ref comment) = table.comment {
        lines.push(format!("/// {comment}"));
    }
    lines.push("#[derive(Debug, Clone, PartialEq)]".to_string());
    lines.push(format!("pub struct {struct_name} {{"));
    for col in &table.columns {
        lines.extend(generate_field(col));
    }
    lines.push("}".to_string());

    if let Some(ref pk) = table.primary_key {
        let columns = match pk.columns {
            PrimaryKeyColumns::Single(ref col) => format!("&[{:?}]", col),
            PrimaryKeyColumns::Composite(ref cols) => {
                let quoted: Vec<String> = cols.iter().map(|c| format!("{c:?}")).collect();
                format!("&[{}]", quoted.join(", "))
            }
        };
        lines.push(String::new());
        lines.push(format!("impl {struct_name} {{"));
        lines.push(format!("    /// Constraint {}", pk.name));
        lines.push(format!(
            "    pub const PRIMARY_KEY: &'static [&'static str] = {columns};"
        ));
        lines.push("}".to_string());
    }

    lines.push(String::new());
    lines.join("\n")
}

fn generate_field(col: &ColumnSchema) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if let Some(ref comment) = col.comment {
        lines.push(format!("    /// {comment}"));
    }
    if let Some(ref default) = col.default {
        lines.push(format!("    /// Default: {}", render_default(default)));
    }
    if let Some(ref fk) = col.foreign_key {
        lines.push(format!(
            "    /// References {}.{} ({})",
            fk.references.table, fk.references.column, fk.name
        ));
    }
    lines.push(format!(
        "    pub {}: {},",
        field_name(&col.name),
        rust_type(col.field_type)
    ));
    lines
}

fn rust_type(field_type: FieldType) -> String {
    let base = match field_type.kind {
        PrimitiveKind::Text => "String",
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Integer => "i64",
        PrimitiveKind::Float => "f64",
        PrimitiveKind::Date => "chrono::NaiveDate",
        PrimitiveKind::Time => "chrono::NaiveTime",
        PrimitiveKind::Timestamp => "chrono::NaiveDateTime",
    };
    if field_type.nullable {
        format!("Option<{base}>")
    } else {
        base.to_string()
    }
}

fn render_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Text(s) => format!("{s:?}"),
        DefaultValue::Bool(b) => b.to_string(),
        DefaultValue::Int(i) => i.to_string(),
        DefaultValue::Float(f) => f.to_string(),
        DefaultValue::Literal(s) => s.clone(),
    }
}

fn struct_name(table_name: &str) -> String {
    table_name.to_upper_camel_case()
}

/// Column names keep their database spelling; names that collide with a
/// Rust keyword become raw identifiers.
fn field_name(column_name: &str) -> String {
    if is_rust_keyword(column_name) {
        format!("r#{column_name}")
    } else {
        column_name.to_string()
    }
}

fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "async" | "await" | "break" | "const" | "continue" | "crate" | "dyn" | "else"
            | "enum" | "extern" | "false" | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop"
            | "match" | "mod" | "move" | "mut" | "pub" | "ref" | "return" | "static" | "struct"
            | "trait" | "true" | "type" | "unsafe" | "use" | "where" | "while"
    )
}
