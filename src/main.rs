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

//! Line-oriented REPL around the engine. A command buffer is read until
//! it ends with `;`, split into statements and each statement is parsed
//! and dispatched in order. `exit;` or end of input closes the store and
//! ends the session.

use catalog::Catalog;
use query_ast::Query;
use query_response::{QueryError, QueryEvent};
use std::io::{self, BufRead, Write};
use storage::KvStore;

const PROMPT: &str = "minidb>";
const DEFAULT_STORE_PATH: &str = "minidb_data";

fn main() {
    simple_logger::init_with_level(log::Level::Debug).expect("logger is initialized once");

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_STORE_PATH.to_owned());
    let store = KvStore::open(&path);
    let mut catalog = Catalog::load(&store);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    'session: loop {
        let buffer = match read_command(&mut input) {
            None => break,
            Some(buffer) => buffer,
        };
        for statement in split_statements(&buffer) {
            match query_parser::parse(&statement) {
                Err(_) => print_prompted("Syntax error"),
                Ok(Query::Exit) => break 'session,
                Ok(query) => execute(&mut catalog, &store, query),
            }
        }
    }
    store.flush();
}

/// Reads lines until the buffer, with trailing whitespace stripped, ends
/// with a semicolon. Lines are joined with single spaces. `None` on end
/// of input.
fn read_command(input: &mut impl BufRead) -> Option<String> {
    print!("{} ", PROMPT);
    io::stdout().flush().expect("stdout is writable");

    let mut buffer = String::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line).ok()? == 0 {
            return None;
        }
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(line.trim_end());
        if buffer.trim_end().ends_with(';') {
            return Some(buffer);
        }
    }
}

/// Splits a buffer on `;`, dropping the text after the final one and
/// re-appending the terminator to each statement.
fn split_statements(buffer: &str) -> Vec<String> {
    let mut statements: Vec<&str> = buffer.split(';').collect();
    statements.pop();
    statements
        .into_iter()
        .map(|statement| format!("{};", statement))
        .collect()
}

fn execute(catalog: &mut Catalog, store: &KvStore, query: Query) {
    match query {
        Query::CreateTable(create) => report(data_definition::create_table(catalog, store, create)),
        Query::DropTable(table_name) => report(data_definition::drop_table(catalog, store, &table_name)),
        Query::DescTable(table_name) => print_table(data_definition::desc_table(catalog, &table_name)),
        Query::ShowTables => {
            for line in data_definition::show_tables(catalog) {
                println!("{}", line);
            }
        }
        Query::Insert(insert) => report(data_manipulation::insert(catalog, store, insert)),
        Query::Update(update) => report(data_manipulation::update(catalog, store, update)),
        Query::Delete(delete) => match data_manipulation::delete(catalog, store, delete) {
            Ok(events) => {
                for event in events {
                    print_prompted(&event.to_string());
                }
            }
            Err(error) => print_prompted(&error.to_string()),
        },
        Query::Select(select) => print_table(data_manipulation::select(catalog, select)),
        Query::Exit => unreachable!("exit is handled by the session loop"),
    }
}

fn report(result: Result<QueryEvent, QueryError>) {
    match result {
        Ok(event) => print_prompted(&event.to_string()),
        Err(error) => print_prompted(&error.to_string()),
    }
}

fn print_table(result: Result<Vec<String>, QueryError>) {
    match result {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(error) => print_prompted(&error.to_string()),
    }
}

fn print_prompted(message: &str) {
    println!("{} {}", PROMPT, message);
}
