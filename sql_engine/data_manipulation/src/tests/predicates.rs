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
use crate::predicate::{eval, RowEnvironment};
use definition::TableRow;
use query_ast::{BinaryOperator, Expr, UnaryOperator, Value};
use types::TriBool;

fn row() -> TableRow {
    let mut row = TableRow::new();
    row.insert("n".to_owned(), ScalarValue::Int(5));
    row.insert("s".to_owned(), ScalarValue::String("Ann".to_owned()));
    row.insert("missing".to_owned(), ScalarValue::Null);
    row
}

fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        name: name.to_owned(),
    }
}

fn int(value: i64) -> Expr {
    Expr::Value(Value::Int(value))
}

fn text(value: &str) -> Expr {
    Expr::Value(Value::String(value.to_owned()))
}

fn cmp(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn eval_against_row(expr: &Expr) -> Result<TriBool, QueryError> {
    let row = row();
    let env = RowEnvironment::with_table("t", &row);
    eval(expr, &env)
}

#[test]
fn integer_comparisons() {
    assert_eq!(eval_against_row(&cmp(col("n"), BinaryOperator::Lt, int(6))), Ok(TriBool::True));
    assert_eq!(eval_against_row(&cmp(col("n"), BinaryOperator::GtEq, int(6))), Ok(TriBool::False));
    assert_eq!(eval_against_row(&cmp(col("n"), BinaryOperator::NotEq, int(5))), Ok(TriBool::False));
}

#[test]
fn string_comparison_is_case_insensitive() {
    assert_eq!(
        eval_against_row(&cmp(col("s"), BinaryOperator::Eq, text("ANN"))),
        Ok(TriBool::True)
    );
    assert_eq!(
        eval_against_row(&cmp(col("s"), BinaryOperator::Lt, text("b"))),
        Ok(TriBool::True)
    );
}

#[test]
fn null_operand_makes_a_comparison_unknown() {
    assert_eq!(
        eval_against_row(&cmp(col("missing"), BinaryOperator::Eq, int(1))),
        Ok(TriBool::Unknown)
    );
    assert_eq!(
        eval_against_row(&cmp(int(1), BinaryOperator::Eq, Expr::Value(Value::Null))),
        Ok(TriBool::Unknown)
    );
}

#[test]
fn unknown_propagates_through_not_but_is_absorbed_by_and_or() {
    let unknown = cmp(col("missing"), BinaryOperator::Eq, int(1));
    let fails = cmp(col("n"), BinaryOperator::Eq, int(0));
    let holds = cmp(col("n"), BinaryOperator::Eq, int(5));

    assert_eq!(
        eval_against_row(&Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(unknown.clone()),
        }),
        Ok(TriBool::Unknown)
    );
    assert_eq!(
        eval_against_row(&cmp(unknown.clone(), BinaryOperator::And, fails.clone())),
        Ok(TriBool::False)
    );
    assert_eq!(
        eval_against_row(&cmp(unknown.clone(), BinaryOperator::And, holds.clone())),
        Ok(TriBool::Unknown)
    );
    assert_eq!(
        eval_against_row(&cmp(unknown.clone(), BinaryOperator::Or, holds)),
        Ok(TriBool::True)
    );
    assert_eq!(
        eval_against_row(&cmp(unknown, BinaryOperator::Or, fails)),
        Ok(TriBool::Unknown)
    );
}

#[test]
fn null_test_is_never_unknown() {
    assert_eq!(
        eval_against_row(&Expr::IsNull {
            table: None,
            column: "missing".to_owned(),
            negated: false,
        }),
        Ok(TriBool::True)
    );
    assert_eq!(
        eval_against_row(&Expr::IsNull {
            table: Some("t".to_owned()),
            column: "n".to_owned(),
            negated: true,
        }),
        Ok(TriBool::True)
    );
}

#[test]
fn mixed_types_are_incomparable() {
    assert_eq!(
        eval_against_row(&cmp(col("n"), BinaryOperator::Eq, text("5"))),
        Err(QueryError::WhereIncomparable)
    );
}

#[test]
fn column_resolution_faults() {
    let first = row();
    let second = row();
    let mut env = RowEnvironment::with_table("a", &first);
    env.add("b", &second);

    assert_eq!(
        eval(&cmp(col("n"), BinaryOperator::Eq, int(5)), &env),
        Err(QueryError::WhereAmbiguousReference)
    );
    assert_eq!(
        eval(&cmp(col("ghost"), BinaryOperator::Eq, int(5)), &env),
        Err(QueryError::WhereColumnNotExist)
    );

    let qualified = Expr::BinaryOp {
        left: Box::new(Expr::Column {
            table: Some("z".to_owned()),
            name: "n".to_owned(),
        }),
        op: BinaryOperator::Eq,
        right: Box::new(int(5)),
    };
    assert_eq!(eval(&qualified, &env), Err(QueryError::WhereTableNotSpecified));

    let in_scope = Expr::BinaryOp {
        left: Box::new(Expr::Column {
            table: Some("b".to_owned()),
            name: "n".to_owned(),
        }),
        op: BinaryOperator::Eq,
        right: Box::new(int(5)),
    };
    assert_eq!(eval(&in_scope, &env), Ok(TriBool::True));
}

#[test]
fn date_comparisons() {
    let mut dated = TableRow::new();
    dated.insert(
        "d".to_owned(),
        ScalarValue::Date(chrono::NaiveDate::from_ymd_opt(2021, 1, 2).unwrap()),
    );
    let env = RowEnvironment::with_table("t", &dated);

    let later = Expr::Value(Value::Date(chrono::NaiveDate::from_ymd_opt(2021, 3, 4).unwrap()));
    assert_eq!(
        eval(&cmp(col("d"), BinaryOperator::Lt, later), &env),
        Ok(TriBool::True)
    );
    assert_eq!(
        eval(&cmp(col("d"), BinaryOperator::Eq, int(20210102)), &env),
        Err(QueryError::WhereIncomparable)
    );
}
