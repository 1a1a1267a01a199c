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

use crate::predicate::{self, RowEnvironment};
use catalog::Catalog;
use definition::{TableRow, TableSchema};
use query_ast::UpdateQuery;
use query_response::{QueryError, QueryEvent};
use storage::KvStore;
use types::ScalarValue;

/// Single-column UPDATE. The loop runs against a working copy of the row
/// list which is committed only when every row went through, so any
/// failure rolls the statement back wholesale.
pub fn update(catalog: &mut Catalog, store: &KvStore, query: UpdateQuery) -> Result<QueryEvent, QueryError> {
    let UpdateQuery {
        table_name,
        column,
        value,
        where_clause,
    } = query;
    let schema = match catalog.schema(&table_name) {
        None => return Err(QueryError::NoSuchTable),
        Some(schema) => schema.clone(),
    };
    let column_def = match schema.column(&column) {
        None => return Err(QueryError::UpdateColumnExistence(column)),
        Some(column_def) => column_def,
    };
    let value = crate::scalar_value(value);
    if !column_def.sql_type().type_check(&value) {
        return Err(QueryError::UpdateTypeMismatch);
    }
    if value.is_null() && column_def.not_null() {
        return Err(QueryError::UpdateColumnNonNullable(column));
    }
    let value = column_def.sql_type().coerce(value);

    let is_primary_key = schema.is_primary_key(&column);
    let mut referenced_by: Vec<(String, String)> = vec![];
    if is_primary_key {
        for (other_name, other_schema) in catalog.schemas() {
            for (referencing_column, (referenced_table, referenced_column)) in other_schema.foreign_keys() {
                if referenced_table == &table_name && referenced_column == &column {
                    referenced_by.push((other_name.clone(), referencing_column.clone()));
                }
            }
        }
    }

    // decided once: does the new value exist in the referenced column
    let foreign_key_ok = match schema.foreign_key(&column) {
        None => true,
        Some((referenced_table, referenced_column)) => catalog
            .rows(referenced_table)
            .iter()
            .any(|referenced_row| referenced_row.get(referenced_column) == Some(&value)),
    };

    let mut rows = catalog.rows(&table_name).to_vec();
    let mut updated = 0;
    for row in rows.iter_mut() {
        if row.get(&column) == Some(&value) {
            continue;
        }
        let env = RowEnvironment::with_table(&table_name, row);
        if !predicate::selects(&where_clause, &env)? {
            continue;
        }
        if !foreign_key_ok {
            return Err(QueryError::UpdateReferentialIntegrity);
        }
        if is_primary_key {
            let old_value = row.get(&column).cloned().unwrap_or(ScalarValue::Null);
            for (referencing_table, referencing_column) in &referenced_by {
                let referenced = catalog
                    .rows(referencing_table)
                    .iter()
                    .any(|referencing_row| referencing_row.get(referencing_column) == Some(&old_value));
                if referenced {
                    return Err(QueryError::UpdateReferentialIntegrity);
                }
            }
        }
        row.insert(column.clone(), value.clone());
        updated += 1;
    }

    if is_primary_key && !primary_key_unique(&schema, &rows) {
        return Err(QueryError::UpdateDuplicatePrimaryKey);
    }

    catalog.replace_rows(&table_name, rows);
    catalog.persist_data(store, &table_name);
    log::debug!("updated {} row(s) in '{}'", updated, table_name);
    Ok(QueryEvent::RecordsUpdated(updated))
}

fn primary_key_unique(schema: &TableSchema, rows: &[TableRow]) -> bool {
    let mut seen: Vec<Vec<ScalarValue>> = Vec::with_capacity(rows.len());
    for row in rows {
        let key = schema.primary_key_projection(row);
        if seen.contains(&key) {
            return false;
        }
        seen.push(key);
    }
    true
}
