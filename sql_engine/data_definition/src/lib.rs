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

//! Schema-changing executors: CREATE TABLE, DROP TABLE and the read-only
//! catalog prints DESC and SHOW TABLES. Validation runs to completion
//! before anything is mutated, so a failed statement leaves both the
//! catalog and the store untouched.

use catalog::Catalog;
use definition::{ColumnDef, TableSchema};
use itertools::Itertools;
use query_ast::{CreateTableQuery, DataType, ForeignKeyConstraint, TableElement};
use query_response::{QueryError, QueryEvent};
use std::collections::BTreeSet;
use storage::KvStore;
use types::SqlType;

pub fn create_table(catalog: &mut Catalog, store: &KvStore, query: CreateTableQuery) -> Result<QueryEvent, QueryError> {
    let CreateTableQuery { table_name, elements } = query;
    if catalog.contains_table(&table_name) {
        return Err(QueryError::TableAlreadyExists);
    }

    let mut column_definitions = vec![];
    let mut primary_key_constraints = vec![];
    let mut referential_constraints = vec![];
    for element in elements {
        match element {
            TableElement::Column(definition) => column_definitions.push(definition),
            TableElement::PrimaryKey(members) => primary_key_constraints.push(members),
            TableElement::ForeignKey(constraint) => referential_constraints.push(constraint),
        }
    }

    let mut column_names = BTreeSet::new();
    for definition in &column_definitions {
        if !column_names.insert(definition.name.clone()) {
            return Err(QueryError::DuplicateColumnDef);
        }
    }

    let mut columns = vec![];
    for definition in column_definitions {
        let sql_type = match definition.data_type {
            DataType::Int => SqlType::Int,
            DataType::Date => SqlType::Date,
            DataType::Char(len) => {
                if len <= 0 {
                    return Err(QueryError::CharLength);
                }
                SqlType::Char(len as usize)
            }
        };
        columns.push(ColumnDef::new(definition.name, sql_type, definition.not_null));
    }
    let mut schema = TableSchema::new(columns);

    if primary_key_constraints.len() > 1 {
        return Err(QueryError::DuplicatePrimaryKeyDef);
    }
    if let Some(members) = primary_key_constraints.pop() {
        let members: Vec<String> = members.into_iter().unique().collect();
        for member in &members {
            if !schema.has_column(member) {
                return Err(QueryError::NonExistingColumnDef(member.clone()));
            }
        }
        schema.set_primary_key(members);
    }

    for constraint in referential_constraints {
        validate_foreign_key(catalog, &mut schema, constraint)?;
    }

    log::debug!("creating table '{}'", table_name);
    catalog.create_table(table_name.clone(), schema);
    catalog.persist_schema(store, &table_name);
    catalog.persist_data(store, &table_name);
    Ok(QueryEvent::TableCreated(table_name))
}

/// Checks one FOREIGN KEY clause and, when it holds, decomposes it into
/// per-column arrows by zipping the referencing columns with the
/// referenced ones in declaration order.
fn validate_foreign_key(
    catalog: &Catalog,
    schema: &mut TableSchema,
    constraint: ForeignKeyConstraint,
) -> Result<(), QueryError> {
    let ForeignKeyConstraint {
        columns,
        referenced_table,
        referenced_columns,
    } = constraint;

    let referenced_schema = match catalog.schema(&referenced_table) {
        None => return Err(QueryError::ReferenceTableExistence),
        Some(referenced_schema) => referenced_schema,
    };
    for column in &columns {
        if !schema.has_column(column) {
            return Err(QueryError::NonExistingColumnDef(column.clone()));
        }
    }
    for column in &referenced_columns {
        if !referenced_schema.has_column(column) {
            return Err(QueryError::ReferenceColumnExistence);
        }
    }

    let referenced_set: BTreeSet<&String> = referenced_columns.iter().collect();
    let primary_key_set: BTreeSet<&String> = referenced_schema.primary_key().iter().collect();
    if referenced_set != primary_key_set {
        return Err(QueryError::ReferenceNonPrimaryKey);
    }

    if columns.len() != referenced_columns.len() {
        return Err(QueryError::ReferenceType);
    }
    for (column, referenced_column) in columns.iter().zip(referenced_columns.iter()) {
        let local = schema.column(column).map(ColumnDef::sql_type);
        let remote = referenced_schema.column(referenced_column).map(ColumnDef::sql_type);
        if local != remote {
            return Err(QueryError::ReferenceType);
        }
    }

    for (column, referenced_column) in columns.into_iter().zip(referenced_columns.into_iter()) {
        schema.add_foreign_key(column, referenced_table.clone(), referenced_column);
    }
    Ok(())
}

pub fn drop_table(catalog: &mut Catalog, store: &KvStore, table_name: &str) -> Result<QueryEvent, QueryError> {
    if !catalog.contains_table(table_name) {
        return Err(QueryError::NoSuchTable);
    }
    for (other_name, other_schema) in catalog.schemas() {
        if other_name == table_name {
            continue;
        }
        if other_schema
            .foreign_keys()
            .values()
            .any(|(referenced_table, _)| referenced_table == table_name)
        {
            return Err(QueryError::DropReferencedTable(table_name.to_owned()));
        }
    }

    log::debug!("dropping table '{}'", table_name);
    catalog.remove_table(table_name);
    store.delete(&storage::schema_key(table_name));
    store.delete(&storage::data_key(table_name));
    Ok(QueryEvent::TableDropped(table_name.to_owned()))
}

const DESC_FRAME: &str = "-------------------------------------------------";
const SHOW_FRAME: &str = "----------------";

/// Lines of the DESC print, columns listed in declaration order.
pub fn desc_table(catalog: &Catalog, table_name: &str) -> Result<Vec<String>, QueryError> {
    let schema = match catalog.schema(table_name) {
        None => return Err(QueryError::NoSuchTable),
        Some(schema) => schema,
    };
    let mut lines = vec![
        DESC_FRAME.to_owned(),
        format!("table_name [{}]", table_name),
        format!("{:<20}  {:<10}  {:<10}  {:<10}", "column_name", "type", "null", "key"),
    ];
    for column in schema.columns() {
        let null = if column.not_null() { "N" } else { "Y" };
        let is_primary = schema.is_primary_key(column.name());
        let is_foreign = schema.foreign_key(column.name()).is_some();
        let key = match (is_primary, is_foreign) {
            (true, true) => "PRI/FOR",
            (true, false) => "PRI",
            (false, true) => "FOR",
            (false, false) => "",
        };
        lines.push(format!(
            "{:<20}  {:<10}  {:<10}  {:<10}",
            column.name(),
            column.sql_type().to_string(),
            null,
            key
        ));
    }
    lines.push(DESC_FRAME.to_owned());
    Ok(lines)
}

pub fn show_tables(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![SHOW_FRAME.to_owned()];
    lines.extend(catalog.table_names().cloned());
    lines.push(SHOW_FRAME.to_owned());
    lines
}
