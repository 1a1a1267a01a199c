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
use catalog::Catalog;
use query_ast::Query;
use query_response::{QueryError, QueryEvent};
use storage::KvStore;
use types::ScalarValue;

mod predicates;

struct TestDb {
    _directory: tempfile::TempDir,
    store: KvStore,
    catalog: Catalog,
}

impl TestDb {
    /// The value stored under `column` in the `index`-th row.
    fn value(&self, table: &str, index: usize, column: &str) -> ScalarValue {
        self.catalog.rows(table)[index][column].clone()
    }
}

#[rstest::fixture]
fn db() -> TestDb {
    let directory = tempfile::tempdir().unwrap();
    let store = KvStore::open(directory.path().to_str().unwrap());
    TestDb {
        _directory: directory,
        store,
        catalog: Catalog::new(),
    }
}

/// `t(a int primary key, b char(3))` with no rows.
#[rstest::fixture]
fn db_with_t(db: TestDb) -> TestDb {
    let mut db = db;
    run(&mut db, "create table t (a int, b char(3), primary key (a));").unwrap();
    db
}

/// `t` as above plus `u(c int references t(a))`.
#[rstest::fixture]
fn db_with_t_u(db_with_t: TestDb) -> TestDb {
    let mut db_with_t = db_with_t;
    run(
        &mut db_with_t,
        "create table u (c int, foreign key (c) references t (a));",
    )
    .unwrap();
    db_with_t
}

fn run(db: &mut TestDb, sql: &str) -> Result<Vec<QueryEvent>, QueryError> {
    match query_parser::parse(sql).expect("valid sql") {
        Query::CreateTable(create) => {
            data_definition::create_table(&mut db.catalog, &db.store, create).map(|event| vec![event])
        }
        Query::Insert(query) => insert(&mut db.catalog, &db.store, query).map(|event| vec![event]),
        Query::Delete(query) => delete(&mut db.catalog, &db.store, query),
        Query::Update(query) => update(&mut db.catalog, &db.store, query).map(|event| vec![event]),
        query => panic!("not an executable statement in tests: {:?}", query),
    }
}

fn run_select(db: &TestDb, sql: &str) -> Result<Vec<String>, QueryError> {
    match query_parser::parse(sql).expect("valid sql") {
        Query::Select(query) => select(&db.catalog, query),
        query => panic!("not a select statement: {:?}", query),
    }
}

/// The persisted image must match the in-memory one after any statement.
fn assert_store_in_sync(db: &TestDb) {
    assert_eq!(Catalog::load(&db.store), db.catalog);
}
