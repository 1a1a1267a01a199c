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

//! User-facing responses of the engine. Every variant renders as exactly
//! one line; the REPL prefixes it with the prompt.

use std::fmt::{self, Display, Formatter};

/// Successful outcomes of executed statements.
#[derive(Debug, PartialEq, Clone)]
pub enum QueryEvent {
    /// Table successfully created
    TableCreated(String),
    /// Table successfully dropped
    TableDropped(String),
    /// A row was appended to a table
    RowInserted,
    /// Number of rows removed by DELETE
    RecordsDeleted(usize),
    /// Number of rows DELETE had to keep because a non-nullable column
    /// references them
    RecordsNotDeleted(usize),
    /// Number of rows rewritten by UPDATE
    RecordsUpdated(usize),
}

impl Display for QueryEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QueryEvent::TableCreated(table_name) => write!(f, "'{}' table is created", table_name),
            QueryEvent::TableDropped(table_name) => write!(f, "'{}' table is dropped", table_name),
            QueryEvent::RowInserted => write!(f, "The row is inserted"),
            QueryEvent::RecordsDeleted(count) => write!(f, "{} row(s) are deleted", count),
            QueryEvent::RecordsNotDeleted(count) => {
                write!(f, "{} row(s) are not deleted due to referential integrity", count)
            }
            QueryEvent::RecordsUpdated(count) => write!(f, "{} row(s) are updated", count),
        }
    }
}

/// Everything that can go wrong while executing a single statement.
/// An error aborts the statement with no changes persisted; the session
/// itself continues.
#[derive(Debug, PartialEq, Clone)]
pub enum QueryError {
    /// CREATE used a name that already exists in the catalog
    TableAlreadyExists,
    /// Two column definitions share a name
    DuplicateColumnDef,
    /// More than one PRIMARY KEY clause
    DuplicatePrimaryKeyDef,
    /// A constraint names a column the table does not define
    NonExistingColumnDef(String),
    /// `char(N)` declared with N < 1
    CharLength,
    /// FOREIGN KEY references a table that does not exist
    ReferenceTableExistence,
    /// FOREIGN KEY references a column the referenced table lacks
    ReferenceColumnExistence,
    /// The referenced columns are not the referenced table's primary key
    ReferenceNonPrimaryKey,
    /// FOREIGN KEY arity or column types do not line up
    ReferenceType,
    /// The statement names an unknown table
    NoSuchTable,
    /// DROP target is referenced by another table's foreign key
    DropReferencedTable(String),
    /// INSERT arity or a value's type does not match the schema
    InsertTypeMismatch,
    /// INSERT column list names an unknown column
    InsertColumnExistence(String),
    /// INSERT puts NULL into a non-nullable column
    InsertColumnNonNullable(String),
    /// INSERT value missing from the referenced column
    InsertReferentialIntegrity,
    /// INSERT would duplicate an existing primary key
    InsertDuplicatePrimaryKey,
    /// UPDATE names an unknown column
    UpdateColumnExistence(String),
    /// UPDATE value's type does not match the column
    UpdateTypeMismatch,
    /// UPDATE puts NULL into a non-nullable column
    UpdateColumnNonNullable(String),
    /// UPDATE breaks a foreign-key relationship
    UpdateReferentialIntegrity,
    /// UPDATE would duplicate an existing primary key
    UpdateDuplicatePrimaryKey,
    /// SELECT FROM names an unknown table
    SelectTableExistence(String),
    /// A select-list entry cannot be resolved to a single column
    SelectColumnResolve(String),
    /// Two FROM entries share a table name or alias
    NotUniqueTableAlias(String),
    /// WHERE compares values of different types
    WhereIncomparable,
    /// WHERE qualifies a column with a table outside the from list
    WhereTableNotSpecified,
    /// WHERE references a column no table in scope defines
    WhereColumnNotExist,
    /// WHERE references an unqualified column that several tables define
    WhereAmbiguousReference,
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::TableAlreadyExists => {
                write!(f, "Create table has failed: table with the same name already exists")
            }
            QueryError::DuplicateColumnDef => {
                write!(f, "Create table has failed: column definition is duplicated")
            }
            QueryError::DuplicatePrimaryKeyDef => {
                write!(f, "Create table has failed: primary key definition is duplicated")
            }
            QueryError::NonExistingColumnDef(column_name) => write!(
                f,
                "Create table has failed: '{}' does not exists in column definition",
                column_name
            ),
            QueryError::CharLength => write!(f, "Char length should be over 0"),
            QueryError::ReferenceTableExistence => {
                write!(f, "Create table has failed: foreign key references non existing table")
            }
            QueryError::ReferenceColumnExistence => {
                write!(f, "Create table has failed: foreign key references non existing column")
            }
            QueryError::ReferenceNonPrimaryKey => write!(
                f,
                "Create table has failed: foreign key references non primary key column"
            ),
            QueryError::ReferenceType => {
                write!(f, "Create table has failed: foreign key references wrong type")
            }
            QueryError::NoSuchTable => write!(f, "No such table"),
            QueryError::DropReferencedTable(table_name) => {
                write!(f, "Drop table has failed: '{}' is referenced by other table", table_name)
            }
            QueryError::InsertTypeMismatch => write!(f, "Insertion has failed: Types are not matched"),
            QueryError::InsertColumnExistence(column_name) => {
                write!(f, "Insertion has failed: '{}' does not exist", column_name)
            }
            QueryError::InsertColumnNonNullable(column_name) => {
                write!(f, "Insertion has failed: '{}' is not nullable", column_name)
            }
            QueryError::InsertReferentialIntegrity => {
                write!(f, "Insertion has failed: Referential integrity violation")
            }
            QueryError::InsertDuplicatePrimaryKey => {
                write!(f, "Insertion has failed: Primary key duplication")
            }
            QueryError::UpdateColumnExistence(column_name) => {
                write!(f, "Update has failed: '{}' does not exist", column_name)
            }
            QueryError::UpdateTypeMismatch => write!(f, "Update has failed: Types are not matched"),
            QueryError::UpdateColumnNonNullable(column_name) => {
                write!(f, "Update has failed: '{}' is not nullable", column_name)
            }
            QueryError::UpdateReferentialIntegrity => {
                write!(f, "Update has failed: Referential integrity violation")
            }
            QueryError::UpdateDuplicatePrimaryKey => write!(f, "Update has failed: Primary key duplication"),
            QueryError::SelectTableExistence(table_name) => {
                write!(f, "Selection has failed: '{}' does not exist", table_name)
            }
            QueryError::SelectColumnResolve(column_name) => {
                write!(f, "Selection has failed: failed to resolve '{}'", column_name)
            }
            QueryError::NotUniqueTableAlias(table_name) => {
                write!(f, "Not unique table/alias: '{}'", table_name)
            }
            QueryError::WhereIncomparable => {
                write!(f, "Where clause try to compare incomparable values")
            }
            QueryError::WhereTableNotSpecified => {
                write!(f, "Where clause try to reference tables which are not specified")
            }
            QueryError::WhereColumnNotExist => {
                write!(f, "Where clause try to reference non existing column")
            }
            QueryError::WhereAmbiguousReference => {
                write!(f, "Where clause contains ambiguous reference")
            }
        }
    }
}
