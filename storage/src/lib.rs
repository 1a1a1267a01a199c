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

pub mod codec;

const SCHEMA_SUFFIX: &str = ".schema";
const DATA_SUFFIX: &str = ".data";

pub fn schema_key(table_name: &str) -> String {
    format!("{}{}", table_name, SCHEMA_SUFFIX)
}

pub fn data_key(table_name: &str) -> String {
    format!("{}{}", table_name, DATA_SUFFIX)
}

/// Strips the `.schema` suffix, returning the table name.
pub fn table_of_schema_key(key: &str) -> Option<&str> {
    key.strip_suffix(SCHEMA_SUFFIX)
}

/// Strips the `.data` suffix, returning the table name.
pub fn table_of_data_key(key: &str) -> Option<&str> {
    key.strip_suffix(DATA_SUFFIX)
}

/// Persistent byte-keyed map backed by a single sled database. Keys are
/// `<table>.schema` and `<table>.data`; values are codec-encoded schemas
/// and row lists. Every write is flushed before returning so that the
/// store never lags behind the in-memory catalog.
pub struct KvStore {
    sled_db: sled::Db,
}

impl KvStore {
    pub fn open(path: &str) -> KvStore {
        let sled_db = sled::open(path).expect("failed to open key-value store");
        if sled_db.was_recovered() {
            log::info!("key-value store recovered from {:?}", path);
        } else {
            log::info!("key-value store initialized at {:?}", path);
        }
        KvStore { sled_db }
    }

    /// All key/value pairs currently in the store.
    pub fn scan(&self) -> Vec<(String, Vec<u8>)> {
        self.sled_db
            .iter()
            .map(|entry| entry.expect("failed to iterate over key-value store"))
            .map(|(key, value)| (String::from_utf8_lossy(&key).into_owned(), value.to_vec()))
            .collect()
    }

    pub fn put(&self, key: &str, value: Vec<u8>) {
        self.sled_db
            .insert(key.as_bytes(), value)
            .expect("failed to write to key-value store");
        self.flush();
    }

    pub fn delete(&self, key: &str) {
        self.sled_db
            .remove(key.as_bytes())
            .expect("failed to remove from key-value store");
        self.flush();
    }

    pub fn flush(&self) {
        self.sled_db.flush().expect("failed to flush key-value store");
    }
}

#[cfg(test)]
mod tests;
