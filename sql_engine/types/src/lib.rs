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

use chrono::NaiveDate;
use std::fmt::{self, Display, Formatter};

/// SQL data types a column can be declared with.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SqlType {
    Int,
    Char(usize),
    Date,
}

impl SqlType {
    pub fn chars_len(&self) -> Option<usize> {
        match self {
            SqlType::Char(len) => Some(*len),
            _ => None,
        }
    }

    /// Whether `value` can be stored in a column of this type. `Null`
    /// passes every type. Strings of any length pass `char(N)`; over-long
    /// ones are shortened on store, not rejected.
    pub fn type_check(&self, value: &ScalarValue) -> bool {
        match (self, value) {
            (_, ScalarValue::Null) => true,
            (SqlType::Int, ScalarValue::Int(_)) => true,
            (SqlType::Char(_), ScalarValue::String(_)) => true,
            (SqlType::Date, ScalarValue::Date(_)) => true,
            _ => false,
        }
    }

    /// Shortens a string value to the column's char length, counted in
    /// code points. Every other value passes through untouched.
    pub fn coerce(&self, value: ScalarValue) -> ScalarValue {
        match (self, value) {
            (SqlType::Char(len), ScalarValue::String(value)) => {
                if value.chars().count() > *len {
                    ScalarValue::String(value.chars().take(*len).collect())
                } else {
                    ScalarValue::String(value)
                }
            }
            (_, value) => value,
        }
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Int => write!(f, "int"),
            SqlType::Char(len) => write!(f, "char({})", len),
            SqlType::Date => write!(f, "date"),
        }
    }
}

/// A single typed value stored in a row or produced by a literal.
///
/// The derived `PartialEq` is the storage-level equality used by primary
/// key and referential checks: `Null == Null`, values of different cases
/// never compare equal and strings compare case-sensitively. The WHERE
/// evaluator layers its own case-insensitive three-valued comparison on
/// top of this.
#[derive(Debug, PartialEq, Clone)]
pub enum ScalarValue {
    Int(i64),
    String(String),
    Date(NaiveDate),
    Null,
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        self == &ScalarValue::Null
    }

    pub fn as_text(&self) -> String {
        match self {
            ScalarValue::Int(value) => value.to_string(),
            ScalarValue::String(value) => value.clone(),
            ScalarValue::Date(value) => value.format("%Y-%m-%d").to_string(),
            ScalarValue::Null => "NULL".to_owned(),
        }
    }
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Result of a predicate under SQL three-valued logic. `Unknown` arises
/// from comparisons involving `NULL` and never selects a row.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum TriBool {
    True,
    False,
    Unknown,
}

impl TriBool {
    pub fn and(self, other: TriBool) -> TriBool {
        match (self, other) {
            (TriBool::False, _) | (_, TriBool::False) => TriBool::False,
            (TriBool::Unknown, _) | (_, TriBool::Unknown) => TriBool::Unknown,
            _ => TriBool::True,
        }
    }

    pub fn or(self, other: TriBool) -> TriBool {
        match (self, other) {
            (TriBool::True, _) | (_, TriBool::True) => TriBool::True,
            (TriBool::Unknown, _) | (_, TriBool::Unknown) => TriBool::Unknown,
            _ => TriBool::False,
        }
    }

    pub fn negate(self) -> TriBool {
        match self {
            TriBool::True => TriBool::False,
            TriBool::False => TriBool::True,
            TriBool::Unknown => TriBool::Unknown,
        }
    }

    pub fn is_true(self) -> bool {
        self == TriBool::True
    }
}

impl From<bool> for TriBool {
    fn from(value: bool) -> TriBool {
        if value {
            TriBool::True
        } else {
            TriBool::False
        }
    }
}

#[cfg(test)]
mod tests;
