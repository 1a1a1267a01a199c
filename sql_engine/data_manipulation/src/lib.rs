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

//! Row-changing executors (INSERT, DELETE, UPDATE), the read-only SELECT
//! and the three-valued WHERE evaluator. Every mutating executor
//! validates against the in-memory catalog first, applies its changes
//! there and then writes each affected table back to the store with a
//! single put; a failed statement changes nothing.

use query_ast::Value;
use types::ScalarValue;

mod delete;
mod insert;
pub mod predicate;
mod select;
mod update;
#[cfg(test)]
mod tests;

pub use delete::delete;
pub use insert::insert;
pub use select::select;
pub use update::update;

/// Lowers a parsed literal into its runtime value.
fn scalar_value(value: Value) -> ScalarValue {
    match value {
        Value::Int(value) => ScalarValue::Int(value),
        Value::String(value) => ScalarValue::String(value),
        Value::Date(value) => ScalarValue::Date(value),
        Value::Null => ScalarValue::Null,
    }
}
