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

use super::*;
use chrono::NaiveDate;
use definition::{ColumnDef, TableRow, TableSchema};
use std::collections::BTreeMap;
use types::{ScalarValue, SqlType};

fn orders_schema() -> TableSchema {
    let mut schema = TableSchema::new(vec![
        ColumnDef::new("customer".to_owned(), SqlType::Int, false),
        ColumnDef::new("item".to_owned(), SqlType::Char(16), false),
        ColumnDef::new("ordered_on".to_owned(), SqlType::Date, false),
    ]);
    schema.set_primary_key(vec!["customer".to_owned(), "item".to_owned()]);
    schema.add_foreign_key("customer".to_owned(), "customers".to_owned(), "id".to_owned());
    schema
}

fn sample_row() -> TableRow {
    let mut row = BTreeMap::new();
    row.insert("customer".to_owned(), ScalarValue::Int(7));
    row.insert("item".to_owned(), ScalarValue::String("lamp".to_owned()));
    row.insert(
        "ordered_on".to_owned(),
        ScalarValue::Date(NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()),
    );
    row
}

#[test]
fn schema_survives_a_round_trip() {
    let schema = orders_schema();
    assert_eq!(codec::decode_schema(&codec::encode_schema(&schema)), schema);
}

#[test]
fn schema_round_trip_keeps_column_order() {
    let decoded = codec::decode_schema(&codec::encode_schema(&orders_schema()));
    let names: Vec<&str> = decoded.columns().iter().map(ColumnDef::name).collect();
    assert_eq!(names, vec!["customer", "item", "ordered_on"]);
}

#[test]
fn rows_survive_a_round_trip() {
    let mut with_null = sample_row();
    with_null.insert("item".to_owned(), ScalarValue::Null);
    let rows = vec![sample_row(), with_null];

    assert_eq!(codec::decode_table_data(&codec::encode_table_data(&rows)), rows);
}

#[test]
fn empty_row_list_round_trip() {
    assert_eq!(codec::decode_table_data(&codec::encode_table_data(&[])), vec![]);
}

#[test]
fn envelopes_are_self_describing() {
    let schema_text = String::from_utf8(codec::encode_schema(&orders_schema())).unwrap();
    assert!(schema_text.contains("\"__tuple__\":true"));
    assert!(schema_text.contains("\"_set\""));

    let data_text = String::from_utf8(codec::encode_table_data(&[sample_row()])).unwrap();
    assert!(data_text.contains("{\"_date\":\"2021-03-14\"}"));
}

#[test]
fn key_suffixes() {
    assert_eq!(schema_key("orders"), "orders.schema");
    assert_eq!(data_key("orders"), "orders.data");
    assert_eq!(table_of_schema_key("orders.schema"), Some("orders"));
    assert_eq!(table_of_data_key("orders.data"), Some("orders"));
    assert_eq!(table_of_schema_key("orders.data"), None);
}

#[test]
fn store_survives_reopen() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().to_str().unwrap().to_owned();

    {
        let store = KvStore::open(&path);
        store.put(&schema_key("orders"), codec::encode_schema(&orders_schema()));
        store.put(&data_key("orders"), codec::encode_table_data(&[sample_row()]));
    }

    let store = KvStore::open(&path);
    let entries = store.scan();
    assert_eq!(entries.len(), 2);

    let (_, schema_bytes) = entries.iter().find(|(key, _)| key == "orders.schema").unwrap();
    assert_eq!(codec::decode_schema(schema_bytes), orders_schema());

    let (_, data_bytes) = entries.iter().find(|(key, _)| key == "orders.data").unwrap();
    assert_eq!(codec::decode_table_data(data_bytes), vec![sample_row()]);
}

#[test]
fn deleted_keys_disappear() {
    let directory = tempfile::tempdir().unwrap();
    let store = KvStore::open(directory.path().to_str().unwrap());

    store.put(&schema_key("orders"), codec::encode_schema(&orders_schema()));
    store.put(&data_key("orders"), codec::encode_table_data(&[]));
    store.delete(&schema_key("orders"));
    store.delete(&data_key("orders"));

    assert_eq!(store.scan(), vec![]);
}
