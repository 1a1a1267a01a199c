// Copyright 2020 - 2021 Alex Dukhno
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use types::{ScalarValue, SqlType};

/// A stored row: every schema column maps to a value, possibly `Null`.
pub type TableRow = BTreeMap<String, ScalarValue>;

/// All rows of a table in insertion order. The order is observable
/// through SELECT and DELETE.
pub type TableData = Vec<TableRow>;

#[derive(Debug, PartialEq, Clone)]
pub struct ColumnDef {
    name: String,
    sql_type: SqlType,
    not_null: bool,
}

impl ColumnDef {
    pub fn new(name: String, sql_type: SqlType, not_null: bool) -> ColumnDef {
        ColumnDef {
            name,
            sql_type,
            not_null,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn not_null(&self) -> bool {
        self.not_null
    }
}

/// Schema of a single table: columns in declaration order, the primary
/// key member set and foreign keys decomposed into per-column arrows
/// `referencing column -> (referenced table, referenced column)`.
#[derive(Debug, PartialEq, Clone)]
pub struct TableSchema {
    columns: Vec<ColumnDef>,
    primary_key: Vec<String>,
    foreign_keys: BTreeMap<String, (String, String)>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnDef>) -> TableSchema {
        TableSchema {
            columns,
            primary_key: vec![],
            foreign_keys: BTreeMap::new(),
        }
    }

    /// Reassembles a schema from its persisted parts.
    pub fn restore(
        columns: Vec<ColumnDef>,
        primary_key: Vec<String>,
        foreign_keys: BTreeMap<String, (String, String)>,
    ) -> TableSchema {
        TableSchema {
            columns,
            primary_key,
            foreign_keys,
        }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.has_name(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn is_primary_key(&self, column_name: &str) -> bool {
        self.primary_key.iter().any(|member| member == column_name)
    }

    /// Installs the primary key and forces its members to be non-nullable.
    pub fn set_primary_key(&mut self, members: Vec<String>) {
        for column in self.columns.iter_mut() {
            if members.iter().any(|member| column.has_name(member)) {
                column.not_null = true;
            }
        }
        self.primary_key = members;
    }

    pub fn foreign_keys(&self) -> &BTreeMap<String, (String, String)> {
        &self.foreign_keys
    }

    pub fn foreign_key(&self, column_name: &str) -> Option<&(String, String)> {
        self.foreign_keys.get(column_name)
    }

    pub fn add_foreign_key(&mut self, column: String, referenced_table: String, referenced_column: String) {
        self.foreign_keys.insert(column, (referenced_table, referenced_column));
    }

    /// The row's values under the primary key columns, in member order.
    /// Empty when the table has no primary key.
    pub fn primary_key_projection(&self, row: &TableRow) -> Vec<ScalarValue> {
        self.primary_key
            .iter()
            .map(|member| row.get(member).cloned().unwrap_or(ScalarValue::Null))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> TableSchema {
        TableSchema::new(vec![
            ColumnDef::new("id".to_owned(), SqlType::Int, false),
            ColumnDef::new("name".to_owned(), SqlType::Char(20), false),
        ])
    }

    #[test]
    fn primary_key_members_become_non_nullable() {
        let mut schema = people();
        assert!(!schema.column("id").unwrap().not_null());

        schema.set_primary_key(vec!["id".to_owned()]);

        assert!(schema.column("id").unwrap().not_null());
        assert!(!schema.column("name").unwrap().not_null());
        assert!(schema.is_primary_key("id"));
        assert!(!schema.is_primary_key("name"));
    }

    #[test]
    fn primary_key_projection_follows_member_order() {
        let mut schema = people();
        schema.set_primary_key(vec!["name".to_owned(), "id".to_owned()]);

        let mut row = TableRow::new();
        row.insert("id".to_owned(), ScalarValue::Int(1));
        row.insert("name".to_owned(), ScalarValue::String("ann".to_owned()));

        assert_eq!(
            schema.primary_key_projection(&row),
            vec![ScalarValue::String("ann".to_owned()), ScalarValue::Int(1)]
        );
    }

    #[test]
    fn columns_keep_declaration_order() {
        let schema = people();
        let names: Vec<&str> = schema.columns().iter().map(ColumnDef::name).collect();
        assert_eq!(names, vec!["id", "name"]);
    }
}
