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

use crate::predicate::{self, RowEnvironment};
use catalog::Catalog;
use itertools::Itertools;
use query_ast::{SelectItem, SelectQuery};
use query_response::QueryError;
use std::fmt::Write;

/// Read-only SELECT over the cross product of the FROM tables. Returns
/// the rendered output table, one line per element; nothing is written
/// to the store.
pub fn select(catalog: &Catalog, query: SelectQuery) -> Result<Vec<String>, QueryError> {
    let SelectQuery {
        mut select_items,
        from,
        where_clause,
    } = query;

    // bind the from list: alias -> table, aliases must be unique
    let mut bound: Vec<(String, String)> = vec![];
    for reference in from {
        if !catalog.contains_table(&reference.name) {
            return Err(QueryError::SelectTableExistence(reference.name));
        }
        let alias = reference.alias.clone().unwrap_or_else(|| reference.name.clone());
        if bound.iter().any(|(known, _)| *known == alias) {
            return Err(QueryError::NotUniqueTableAlias(alias));
        }
        bound.push((alias, reference.name));
    }

    // an empty select list means `*`: every column of every table
    if select_items.is_empty() {
        for (alias, table_name) in &bound {
            for column in catalog.schema(table_name).map(|schema| schema.columns()).unwrap_or(&[]) {
                select_items.push(SelectItem {
                    table: Some(alias.clone()),
                    column: column.name().to_owned(),
                    alias: None,
                });
            }
        }
    }

    // resolve each select item to a bound table
    let mut resolved: Vec<(usize, String, String)> = vec![];
    for item in select_items {
        let SelectItem { table, column, alias } = item;
        match table {
            None => {
                let mut owner = None;
                for (index, (_, table_name)) in bound.iter().enumerate() {
                    let has_column = catalog
                        .schema(table_name)
                        .map(|schema| schema.has_column(&column))
                        .unwrap_or(false);
                    if has_column {
                        if owner.is_some() {
                            return Err(QueryError::SelectColumnResolve(column));
                        }
                        owner = Some(index);
                    }
                }
                match owner {
                    None => return Err(QueryError::SelectColumnResolve(column)),
                    Some(index) => {
                        let header = alias.unwrap_or_else(|| column.clone());
                        resolved.push((index, column, header));
                    }
                }
            }
            Some(qualifier) => {
                let index = bound.iter().position(|(known, _)| *known == qualifier);
                let index = match index {
                    None => return Err(QueryError::SelectColumnResolve(format!("{}.{}", qualifier, column))),
                    Some(index) => index,
                };
                let (_, table_name) = &bound[index];
                let has_column = catalog
                    .schema(table_name)
                    .map(|schema| schema.has_column(&column))
                    .unwrap_or(false);
                if !has_column {
                    return Err(QueryError::SelectColumnResolve(format!("{}.{}", qualifier, column)));
                }
                let header = alias.unwrap_or_else(|| column.clone());
                resolved.push((index, column, header));
            }
        }
    }

    // enumerate the cross product in odometer order: reversing the table
    // list makes the first from entry the fastest-advancing one
    let mut output_rows: Vec<Vec<String>> = vec![];
    let row_sets: Vec<_> = bound.iter().map(|(_, table_name)| catalog.rows(table_name)).collect();
    for reversed in row_sets.iter().rev().map(|rows| rows.iter()).multi_cartesian_product() {
        let combination: Vec<_> = reversed.into_iter().rev().collect();
        let mut env = RowEnvironment::new();
        for ((alias, _), row) in bound.iter().zip(combination.iter()) {
            env.add(alias, *row);
        }
        if !predicate::selects(&where_clause, &env)? {
            continue;
        }
        let rendered = resolved
            .iter()
            .map(|(index, column, _)| {
                combination[*index]
                    .get(column)
                    .map(|value| value.as_text())
                    .unwrap_or_else(|| "NULL".to_owned())
            })
            .collect();
        output_rows.push(rendered);
    }

    Ok(render(&resolved, &output_rows))
}

/// Bordered grid: rules above the header, below it and below the body;
/// one space of padding per side; values left-aligned in columns as wide
/// as their widest cell or header.
fn render(resolved: &[(usize, String, String)], output_rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = resolved.iter().map(|(_, _, header)| header.chars().count()).collect();
    for row in output_rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut rule = String::from("+");
    for width in &widths {
        rule.push_str(&"-".repeat(width + 2));
        rule.push('+');
    }

    let headers: Vec<&str> = resolved.iter().map(|(_, _, header)| header.as_str()).collect();
    let mut lines = vec![rule.clone(), format_row(&headers, &widths), rule.clone()];
    for row in output_rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(&cells, &widths));
    }
    lines.push(rule);
    lines
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths.iter()) {
        let padding = width - cell.chars().count();
        write!(line, " {}{} |", cell, " ".repeat(padding)).expect("writing to a string never fails");
    }
    line
}
