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

//! WHERE evaluation under SQL three-valued logic. A comparison with a
//! NULL operand yields `Unknown`, string comparisons are
//! case-insensitive, and comparing values of different non-null cases
//! aborts the whole statement with the incomparability fault.

use definition::TableRow;
use query_ast::{BinaryOperator, Expr, UnaryOperator};
use query_response::QueryError;
use std::cmp::Ordering;
use types::{ScalarValue, TriBool};

/// The rows a predicate is evaluated against, keyed by table alias.
pub struct RowEnvironment<'a> {
    tables: Vec<(&'a str, &'a TableRow)>,
}

impl<'a> RowEnvironment<'a> {
    pub fn new() -> RowEnvironment<'a> {
        RowEnvironment { tables: vec![] }
    }

    pub fn with_table(alias: &'a str, row: &'a TableRow) -> RowEnvironment<'a> {
        RowEnvironment {
            tables: vec![(alias, row)],
        }
    }

    pub fn add(&mut self, alias: &'a str, row: &'a TableRow) {
        self.tables.push((alias, row));
    }

    /// Resolves a possibly qualified column reference. An unqualified
    /// name must occur in exactly one table of the environment.
    fn lookup(&self, table: Option<&str>, column: &str) -> Result<&'a ScalarValue, QueryError> {
        match table {
            Some(alias) => {
                let row = self
                    .tables
                    .iter()
                    .find(|(candidate, _)| *candidate == alias)
                    .map(|(_, row)| *row)
                    .ok_or(QueryError::WhereTableNotSpecified)?;
                row.get(column).ok_or(QueryError::WhereColumnNotExist)
            }
            None => {
                let mut found = None;
                for (_, row) in &self.tables {
                    if let Some(value) = row.get(column) {
                        if found.is_some() {
                            return Err(QueryError::WhereAmbiguousReference);
                        }
                        found = Some(value);
                    }
                }
                found.ok_or(QueryError::WhereColumnNotExist)
            }
        }
    }
}

impl<'a> Default for RowEnvironment<'a> {
    fn default() -> RowEnvironment<'a> {
        RowEnvironment::new()
    }
}

pub fn eval(expr: &Expr, env: &RowEnvironment) -> Result<TriBool, QueryError> {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => Ok(eval(left, env)?.and(eval(right, env)?)),
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Or,
            right,
        } => Ok(eval(left, env)?.or(eval(right, env)?)),
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr,
        } => Ok(eval(expr, env)?.negate()),
        Expr::IsNull { table, column, negated } => {
            let value = env.lookup(table.as_deref(), column)?;
            Ok(TriBool::from(value.is_null() != *negated))
        }
        Expr::BinaryOp { left, op, right } => compare(left, *op, right, env),
        // a lone literal or column is never a boolean; the grammar does
        // not produce it, but the tree type allows it
        Expr::Value(_) | Expr::Column { .. } => Err(QueryError::WhereIncomparable),
    }
}

fn operand(expr: &Expr, env: &RowEnvironment) -> Result<ScalarValue, QueryError> {
    match expr {
        Expr::Value(value) => Ok(crate::scalar_value(value.clone())),
        Expr::Column { table, name } => env.lookup(table.as_deref(), name).map(Clone::clone),
        _ => Err(QueryError::WhereIncomparable),
    }
}

fn compare(left: &Expr, op: BinaryOperator, right: &Expr, env: &RowEnvironment) -> Result<TriBool, QueryError> {
    let left = operand(left, env)?;
    let right = operand(right, env)?;
    if left.is_null() || right.is_null() {
        return Ok(TriBool::Unknown);
    }
    let ordering = match (&left, &right) {
        (ScalarValue::Int(left), ScalarValue::Int(right)) => left.cmp(right),
        (ScalarValue::String(left), ScalarValue::String(right)) => left.to_lowercase().cmp(&right.to_lowercase()),
        (ScalarValue::Date(left), ScalarValue::Date(right)) => left.cmp(right),
        _ => {
            log::debug!("incomparable operands {:?} and {:?}", left, right);
            return Err(QueryError::WhereIncomparable);
        }
    };
    let holds = match op {
        BinaryOperator::Lt => ordering == Ordering::Less,
        BinaryOperator::Gt => ordering == Ordering::Greater,
        BinaryOperator::LtEq => ordering != Ordering::Greater,
        BinaryOperator::GtEq => ordering != Ordering::Less,
        BinaryOperator::Eq => ordering == Ordering::Equal,
        BinaryOperator::NotEq => ordering != Ordering::Equal,
        BinaryOperator::And | BinaryOperator::Or => unreachable!("handled by eval"),
    };
    Ok(TriBool::from(holds))
}

/// `true` only when the predicate evaluates to `True`; `Unknown` does
/// not select the row.
pub fn selects(predicate: &Option<Expr>, env: &RowEnvironment) -> Result<bool, QueryError> {
    match predicate {
        None => Ok(true),
        Some(expr) => Ok(eval(expr, env)?.is_true()),
    }
}
