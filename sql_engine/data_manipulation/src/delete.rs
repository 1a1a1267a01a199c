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
use definition::TableRow;
use query_ast::DeleteQuery;
use query_response::{QueryError, QueryEvent};
use std::collections::{BTreeMap, BTreeSet};
use storage::KvStore;
use types::ScalarValue;

/// DELETE with ON DELETE SET NULL semantics, in two passes: every row is
/// classified first (kept by WHERE, blocked by a non-nullable referrer,
/// or deletable together with the null-outs it implies) and only then is
/// anything applied, so a WHERE fault aborts with no changes.
pub fn delete(catalog: &mut Catalog, store: &KvStore, query: DeleteQuery) -> Result<Vec<QueryEvent>, QueryError> {
    let DeleteQuery {
        table_name,
        where_clause,
    } = query;
    if !catalog.contains_table(&table_name) {
        return Err(QueryError::NoSuchTable);
    }

    // arrows pointing into the target: referenced column -> referrers
    let mut referenced_by: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for (other_name, other_schema) in catalog.schemas() {
        for (column, (referenced_table, referenced_column)) in other_schema.foreign_keys() {
            if referenced_table == &table_name {
                referenced_by
                    .entry(referenced_column.clone())
                    .or_default()
                    .push((other_name.clone(), column.clone()));
            }
        }
    }

    let mut deleted = 0;
    let mut skipped = 0;
    let mut remaining: Vec<TableRow> = vec![];
    let mut set_null: Vec<(String, String, usize)> = vec![];

    for row in catalog.rows(&table_name) {
        let env = RowEnvironment::with_table(&table_name, row);
        if !predicate::selects(&where_clause, &env)? {
            remaining.push(row.clone());
            continue;
        }

        let mut blocked = false;
        let mut null_outs = vec![];
        for (referenced_column, referrers) in &referenced_by {
            let target_value = match row.get(referenced_column) {
                None => continue,
                Some(value) => value,
            };
            for (referencing_table, referencing_column) in referrers {
                let not_null = catalog
                    .schema(referencing_table)
                    .and_then(|schema| schema.column(referencing_column))
                    .map(|column| column.not_null())
                    .unwrap_or(false);
                for (index, referencing_row) in catalog.rows(referencing_table).iter().enumerate() {
                    if referencing_row.get(referencing_column) == Some(target_value) {
                        if not_null {
                            blocked = true;
                        } else {
                            null_outs.push((referencing_table.clone(), referencing_column.clone(), index));
                        }
                    }
                }
            }
        }

        if blocked {
            skipped += 1;
            remaining.push(row.clone());
        } else {
            deleted += 1;
            set_null.extend(null_outs);
        }
    }

    let mut modified_tables = BTreeSet::new();
    for (referencing_table, referencing_column, index) in set_null {
        if let Some(referencing_row) = catalog.rows_mut(&referencing_table).get_mut(index) {
            referencing_row.insert(referencing_column, ScalarValue::Null);
        }
        modified_tables.insert(referencing_table);
    }
    catalog.replace_rows(&table_name, remaining);
    modified_tables.insert(table_name);

    for modified in &modified_tables {
        catalog.persist_data(store, modified);
    }
    log::debug!("deleted {} row(s), kept {} referenced row(s)", deleted, skipped);

    let mut events = vec![QueryEvent::RecordsDeleted(deleted)];
    if skipped > 0 {
        events.push(QueryEvent::RecordsNotDeleted(skipped));
    }
    Ok(events)
}
