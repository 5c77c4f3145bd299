//! PostgreSQL DDL rendering
//!
//! Output is deterministic: tables in catalog order, columns in
//! declaration order.

use super::catalog::Catalog;
use super::types::{ColumnDef, ColumnDefault, TableDef};

/// Renders a `CREATE TABLE` statement for one table.
pub fn create_table_sql(table: &TableDef) -> String {
    let columns: Vec<String> = table.columns.iter().map(column_sql).collect();
    format!(
        "CREATE TABLE \"{}\" (\n    {}\n);",
        table.name,
        columns.join(",\n    ")
    )
}

/// Renders every table of the catalog, separated by blank lines.
pub fn catalog_ddl(catalog: &Catalog) -> String {
    catalog
        .tables()
        .map(create_table_sql)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn column_sql(col: &ColumnDef) -> String {
    let mut sql = format!("\"{}\" {}", col.column, col.column_type.sql_type());

    if col.primary_key {
        sql.push_str(" PRIMARY KEY");
    } else if col.not_null {
        sql.push_str(" NOT NULL");
    }
    if col.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(default) = &col.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&default_sql(default));
    }
    if let Some(fk) = &col.references {
        sql.push_str(&format!(" REFERENCES \"{}\"(\"{}\")", fk.table, fk.column));
    }

    sql
}

fn default_sql(default: &ColumnDefault) -> String {
    match default {
        ColumnDefault::Bool(b) => b.to_string(),
        ColumnDefault::Int(n) => n.to_string(),
        ColumnDefault::Text(s) => format!("'{}'", s.replace('\'', "''")),
        ColumnDefault::Now => "now()".into(),
        ColumnDefault::EmptyList => "'[]'::jsonb".into(),
    }
}
