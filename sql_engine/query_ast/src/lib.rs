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

//! The query tree handed from the parser to the executors. Identifiers
//! inside it are already folded to lowercase.

use chrono::NaiveDate;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, PartialEq, Clone)]
pub enum Query {
    CreateTable(CreateTableQuery),
    DropTable(String),
    DescTable(String),
    ShowTables,
    Insert(InsertQuery),
    Delete(DeleteQuery),
    Update(UpdateQuery),
    Select(SelectQuery),
    Exit,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CreateTableQuery {
    pub table_name: String,
    pub elements: Vec<TableElement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TableElement {
    Column(ColumnDefinition),
    PrimaryKey(Vec<String>),
    ForeignKey(ForeignKeyConstraint),
}

#[derive(Debug, PartialEq, Clone)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub not_null: bool,
}

/// Declared column type. The char length is kept signed so that the
/// executor, not the parser, rejects non-positive lengths.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DataType {
    Int,
    Char(i64),
    Date,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ForeignKeyConstraint {
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct InsertQuery {
    pub table_name: String,
    pub columns: Option<Vec<String>>,
    pub values: Vec<Value>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct DeleteQuery {
    pub table_name: String,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct UpdateQuery {
    pub table_name: String,
    pub column: String,
    pub value: Value,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SelectQuery {
    /// Empty for `SELECT *`; the executor expands it to every column of
    /// every table in the from list.
    pub select_items: Vec<SelectItem>,
    pub from: Vec<TableReference>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SelectItem {
    pub table: Option<String>,
    pub column: String,
    pub alias: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TableReference {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Value(Value),
    Column {
        table: Option<String>,
        name: String,
    },
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    IsNull {
        table: Option<String>,
        column: String,
        negated: bool,
    },
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Gt,
    Lt,
    GtEq,
    LtEq,
    Eq,
    NotEq,
    And,
    Or,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Gt => write!(f, ">"),
            BinaryOperator::Lt => write!(f, "<"),
            BinaryOperator::GtEq => write!(f, ">="),
            BinaryOperator::LtEq => write!(f, "<="),
            BinaryOperator::Eq => write!(f, "="),
            BinaryOperator::NotEq => write!(f, "!="),
            BinaryOperator::And => write!(f, "AND"),
            BinaryOperator::Or => write!(f, "OR"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Not,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Int(i64),
    String(String),
    Date(NaiveDate),
    Null,
}
