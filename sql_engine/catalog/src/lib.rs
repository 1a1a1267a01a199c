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

use definition::{TableData, TableRow, TableSchema};
use std::collections::BTreeMap;
use storage::{codec, KvStore};

/// In-memory image of the database: every table's schema and rows. The
/// executors mutate it first and then write the affected tables back
/// through the [`KvStore`], one put per table, so both sides always
/// agree after a successful statement.
#[derive(Debug, Default, PartialEq)]
pub struct Catalog {
    table_schemas: BTreeMap<String, TableSchema>,
    table_data: BTreeMap<String, TableData>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    /// Rebuilds the catalog by scanning every key in the store. Keys
    /// ending in `.schema` carry schemas, keys ending in `.data` carry
    /// row lists; anything else is ignored.
    pub fn load(store: &KvStore) -> Catalog {
        let mut catalog = Catalog::new();
        for (key, value) in store.scan() {
            if let Some(table_name) = storage::table_of_schema_key(&key) {
                catalog
                    .table_schemas
                    .insert(table_name.to_owned(), codec::decode_schema(&value));
            } else if let Some(table_name) = storage::table_of_data_key(&key) {
                catalog
                    .table_data
                    .insert(table_name.to_owned(), codec::decode_table_data(&value));
            }
        }
        log::info!("loaded {} table(s) from the key-value store", catalog.table_schemas.len());
        catalog
    }

    pub fn contains_table(&self, table_name: &str) -> bool {
        self.table_schemas.contains_key(table_name)
    }

    pub fn schema(&self, table_name: &str) -> Option<&TableSchema> {
        self.table_schemas.get(table_name)
    }

    pub fn schemas(&self) -> impl Iterator<Item = (&String, &TableSchema)> {
        self.table_schemas.iter()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &String> {
        self.table_schemas.keys()
    }

    pub fn rows(&self, table_name: &str) -> &[TableRow] {
        self.table_data.get(table_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows_mut(&mut self, table_name: &str) -> &mut TableData {
        self.table_data.entry(table_name.to_owned()).or_default()
    }

    pub fn replace_rows(&mut self, table_name: &str, rows: TableData) {
        self.table_data.insert(table_name.to_owned(), rows);
    }

    /// Installs a freshly created table with no rows.
    pub fn create_table(&mut self, table_name: String, schema: TableSchema) {
        self.table_schemas.insert(table_name.clone(), schema);
        self.table_data.insert(table_name, vec![]);
    }

    /// Removes schema and rows together.
    pub fn remove_table(&mut self, table_name: &str) {
        self.table_schemas.remove(table_name);
        self.table_data.remove(table_name);
    }

    pub fn persist_schema(&self, store: &KvStore, table_name: &str) {
        if let Some(schema) = self.table_schemas.get(table_name) {
            store.put(&storage::schema_key(table_name), codec::encode_schema(schema));
        }
    }

    pub fn persist_data(&self, store: &KvStore, table_name: &str) {
        store.put(
            &storage::data_key(table_name),
            codec::encode_table_data(self.rows(table_name)),
        );
    }
}
