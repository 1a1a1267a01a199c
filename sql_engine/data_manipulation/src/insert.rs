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

use catalog::Catalog;
use definition::TableRow;
use query_ast::InsertQuery;
use query_response::{QueryError, QueryEvent};
use storage::KvStore;

pub fn insert(catalog: &mut Catalog, store: &KvStore, query: InsertQuery) -> Result<QueryEvent, QueryError> {
    let InsertQuery {
        table_name,
        columns,
        values,
    } = query;
    let schema = match catalog.schema(&table_name) {
        None => return Err(QueryError::NoSuchTable),
        Some(schema) => schema.clone(),
    };

    let column_names: Vec<String> = match columns {
        Some(columns) => columns,
        None => schema.columns().iter().map(|column| column.name().to_owned()).collect(),
    };
    let column_count = schema.columns().len();
    if column_names.len() != column_count || values.len() != column_count {
        return Err(QueryError::InsertTypeMismatch);
    }

    let mut row = TableRow::new();
    for (column_name, value) in column_names.into_iter().zip(values.into_iter()) {
        let column = match schema.column(&column_name) {
            None => return Err(QueryError::InsertColumnExistence(column_name)),
            Some(column) => column,
        };
        let value = crate::scalar_value(value);
        if column.not_null() && value.is_null() {
            return Err(QueryError::InsertColumnNonNullable(column_name));
        }
        if !column.sql_type().type_check(&value) {
            return Err(QueryError::InsertTypeMismatch);
        }
        let value = column.sql_type().coerce(value);
        if !value.is_null() {
            if let Some((referenced_table, referenced_column)) = schema.foreign_key(&column_name) {
                let present = catalog
                    .rows(referenced_table)
                    .iter()
                    .any(|referenced_row| referenced_row.get(referenced_column) == Some(&value));
                if !present {
                    return Err(QueryError::InsertReferentialIntegrity);
                }
            }
        }
        row.insert(column_name, value);
    }
    if row.len() != column_count {
        // a repeated column in the list leaves some other column unset
        return Err(QueryError::InsertTypeMismatch);
    }

    if !schema.primary_key().is_empty() {
        let key = schema.primary_key_projection(&row);
        let duplicate = catalog
            .rows(&table_name)
            .iter()
            .any(|existing| schema.primary_key_projection(existing) == key);
        if duplicate {
            return Err(QueryError::InsertDuplicatePrimaryKey);
        }
    }

    catalog.rows_mut(&table_name).push(row);
    catalog.persist_data(store, &table_name);
    log::debug!("row appended to '{}'", table_name);
    Ok(QueryEvent::RowInserted)
}
