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


fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn column(table: Option<&str>, name: &str) -> Expr {
    Expr::Column {
        table: table.map(str::to_owned),
        name: name.to_owned(),
    }
}

fn comparison(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

#[test]
fn empty_input() {
    assert_eq!(parse(""), Err(SyntaxError));
}

#[test]
fn missing_semicolon() {
    assert_eq!(parse("show tables"), Err(SyntaxError));
}

#[test]
fn trailing_garbage() {
    assert_eq!(parse("show tables; what"), Err(SyntaxError));
}

#[test]
fn unknown_leading_keyword() {
    assert_eq!(parse("alter table t;"), Err(SyntaxError));
}

#[test]
fn exit_statement() {
    assert_eq!(parse("exit;"), Ok(Query::Exit));
    assert_eq!(parse("EXIT;"), Ok(Query::Exit));
}
