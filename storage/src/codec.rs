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

//! Self-describing text codec for schemas and row lists. Plain JSON
//! cannot tell a tuple from a list, a set from a list or a date from a
//! string, so those are wrapped in envelopes:
//!
//! - tuples:  `{"__tuple__": true, "items": [...]}`
//! - sets:    `{"_set": [...]}`
//! - dates:   `{"_date": "YYYY-MM-DD"}`
//!
//! Schema documents keep their column object in declaration order, which
//! `serde_json`'s `preserve_order` feature maintains across round-trips.

use chrono::NaiveDate;
use definition::{ColumnDef, TableData, TableRow, TableSchema};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use types::{ScalarValue, SqlType};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_schema(schema: &TableSchema) -> Vec<u8> {
    let mut columns = Map::new();
    for column in schema.columns() {
        let (data_type, char_len) = match column.sql_type() {
            SqlType::Int => ("int", Json::Null),
            SqlType::Char(len) => ("char", Json::from(len as u64)),
            SqlType::Date => ("date", Json::Null),
        };
        let mut meta = Map::new();
        meta.insert("data_type".to_owned(), Json::from(data_type));
        meta.insert("char_len".to_owned(), char_len);
        meta.insert("not_null".to_owned(), Json::from(column.not_null()));
        columns.insert(column.name().to_owned(), Json::Object(meta));
    }

    let mut foreign_keys = Map::new();
    for (column, (referenced_table, referenced_column)) in schema.foreign_keys() {
        foreign_keys.insert(
            column.clone(),
            tuple_of(vec![
                Json::from(referenced_table.as_str()),
                Json::from(referenced_column.as_str()),
            ]),
        );
    }

    let mut document = Map::new();
    document.insert("columns".to_owned(), Json::Object(columns));
    document.insert(
        "primary_key".to_owned(),
        set_of(schema.primary_key().iter().map(|member| Json::from(member.as_str())).collect()),
    );
    document.insert("foreign_keys".to_owned(), Json::Object(foreign_keys));

    serde_json::to_vec(&Json::Object(document)).expect("schema document is always serializable")
}

pub fn decode_schema(bytes: &[u8]) -> TableSchema {
    let document: Json = serde_json::from_slice(bytes).expect("malformed schema document in the key-value store");

    let mut columns = vec![];
    for (name, meta) in as_object(&document["columns"]) {
        let char_len = meta["char_len"].as_u64();
        let sql_type = match meta["data_type"].as_str() {
            Some("int") => SqlType::Int,
            Some("char") => SqlType::Char(char_len.expect("char column carries its length") as usize),
            Some("date") => SqlType::Date,
            _ => panic!("unknown data type in schema document"),
        };
        let not_null = meta["not_null"].as_bool().unwrap_or(false);
        columns.push(ColumnDef::new(name.clone(), sql_type, not_null));
    }

    let primary_key = set_items(&document["primary_key"])
        .iter()
        .map(|member| decode_name(member))
        .collect();

    let mut foreign_keys = BTreeMap::new();
    for (column, arrow) in as_object(&document["foreign_keys"]) {
        let items = tuple_items(arrow);
        foreign_keys.insert(column.clone(), (decode_name(&items[0]), decode_name(&items[1])));
    }

    TableSchema::restore(columns, primary_key, foreign_keys)
}

pub fn encode_table_data(rows: &[TableRow]) -> Vec<u8> {
    let rows: Vec<Json> = rows
        .iter()
        .map(|row| {
            Json::Object(
                row.iter()
                    .map(|(column, value)| (column.clone(), scalar_to_json(value)))
                    .collect(),
            )
        })
        .collect();
    serde_json::to_vec(&Json::Array(rows)).expect("row list is always serializable")
}

pub fn decode_table_data(bytes: &[u8]) -> TableData {
    let document: Json = serde_json::from_slice(bytes).expect("malformed row list in the key-value store");
    document
        .as_array()
        .expect("row list is a JSON array")
        .iter()
        .map(|row| {
            as_object(row)
                .iter()
                .map(|(column, value)| (column.clone(), json_to_scalar(value)))
                .collect()
        })
        .collect()
}

fn scalar_to_json(value: &ScalarValue) -> Json {
    match value {
        ScalarValue::Int(value) => Json::from(*value),
        ScalarValue::String(value) => Json::from(value.as_str()),
        ScalarValue::Date(value) => {
            let mut envelope = Map::new();
            envelope.insert("_date".to_owned(), Json::from(value.format(DATE_FORMAT).to_string()));
            Json::Object(envelope)
        }
        ScalarValue::Null => Json::Null,
    }
}

fn json_to_scalar(value: &Json) -> ScalarValue {
    match value {
        Json::Null => ScalarValue::Null,
        Json::Number(value) => ScalarValue::Int(value.as_i64().expect("integer values fit in 64 bits")),
        Json::String(value) => ScalarValue::String(value.clone()),
        Json::Object(envelope) => {
            let date = envelope
                .get("_date")
                .and_then(Json::as_str)
                .expect("only date envelopes appear in row values");
            ScalarValue::Date(NaiveDate::parse_from_str(date, DATE_FORMAT).expect("valid date in envelope"))
        }
        _ => panic!("unsupported value in row document"),
    }
}

fn tuple_of(items: Vec<Json>) -> Json {
    let mut envelope = Map::new();
    envelope.insert("__tuple__".to_owned(), Json::from(true));
    envelope.insert("items".to_owned(), Json::Array(items));
    Json::Object(envelope)
}

fn tuple_items(value: &Json) -> &Vec<Json> {
    let envelope = as_object(value);
    assert!(envelope.get("__tuple__").and_then(Json::as_bool).unwrap_or(false));
    envelope
        .get("items")
        .and_then(Json::as_array)
        .expect("tuple envelope carries its items")
}

fn set_of(items: Vec<Json>) -> Json {
    let mut envelope = Map::new();
    envelope.insert("_set".to_owned(), Json::Array(items));
    Json::Object(envelope)
}

fn set_items(value: &Json) -> &[Json] {
    match value {
        // plain lists are accepted for compatibility with older stores
        Json::Array(items) => items,
        Json::Object(envelope) => envelope
            .get("_set")
            .and_then(Json::as_array)
            .map(Vec::as_slice)
            .expect("set envelope carries its items"),
        _ => panic!("expected a set in schema document"),
    }
}

fn as_object(value: &Json) -> &Map<String, Json> {
    value.as_object().expect("expected a JSON object")
}

fn decode_name(value: &Json) -> String {
    value.as_str().expect("identifiers are strings").to_owned()
}
