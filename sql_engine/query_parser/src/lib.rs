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

//! Recursive-descent parser for the engine's command language. One call
//! parses one `;`-terminated statement into a [`query_ast::Query`];
//! splitting a multi-statement buffer is the caller's job.

use lexer::{Keyword, Lexer, Token};
use query_ast::{
    BinaryOperator, ColumnDefinition, CreateTableQuery, DataType, DeleteQuery, Expr, ForeignKeyConstraint,
    InsertQuery, Query, SelectItem, SelectQuery, TableElement, TableReference, UnaryOperator, UpdateQuery, Value,
};

mod lexer;
#[cfg(test)]
mod tests;

/// Every way a statement can fail to parse collapses into this; the REPL
/// renders it as the single line `Syntax error`.
#[derive(Debug, PartialEq)]
pub struct SyntaxError;

pub fn parse(input: &str) -> Result<Query, SyntaxError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let query = parser.parse_query()?;
    parser.expect(Token::Semicolon)?;
    if parser.peek().is_some() {
        log::debug!("trailing tokens after statement");
        return Err(SyntaxError);
    }
    Ok(query)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn accept(&mut self, token: Token) -> bool {
        if self.peek() == Some(&token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn accept_keyword(&mut self, keyword: Keyword) -> bool {
        self.accept(Token::Keyword(keyword))
    }

    fn expect(&mut self, token: Token) -> Result<(), SyntaxError> {
        if self.accept(token) {
            Ok(())
        } else {
            Err(SyntaxError)
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), SyntaxError> {
        self.expect(Token::Keyword(keyword))
    }

    fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        match self.advance() {
            Some(Token::Ident(ident)) => Ok(ident),
            _ => Err(SyntaxError),
        }
    }

    fn parse_query(&mut self) -> Result<Query, SyntaxError> {
        match self.peek() {
            Some(Token::Keyword(Keyword::Create)) => self.parse_create_table(),
            Some(Token::Keyword(Keyword::Drop)) => self.parse_drop_table(),
            Some(Token::Keyword(Keyword::Desc))
            | Some(Token::Keyword(Keyword::Describe))
            | Some(Token::Keyword(Keyword::Explain)) => self.parse_desc_table(),
            Some(Token::Keyword(Keyword::Show)) => self.parse_show_tables(),
            Some(Token::Keyword(Keyword::Insert)) => self.parse_insert(),
            Some(Token::Keyword(Keyword::Delete)) => self.parse_delete(),
            Some(Token::Keyword(Keyword::Update)) => self.parse_update(),
            Some(Token::Keyword(Keyword::Select)) => self.parse_select(),
            Some(Token::Keyword(Keyword::Exit)) => {
                self.advance();
                Ok(Query::Exit)
            }
            _ => Err(SyntaxError),
        }
    }

    fn parse_create_table(&mut self) -> Result<Query, SyntaxError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table_name = self.expect_ident()?;
        self.expect(Token::LeftParen)?;
        let mut elements = vec![self.parse_table_element()?];
        while self.accept(Token::Comma) {
            elements.push(self.parse_table_element()?);
        }
        self.expect(Token::RightParen)?;
        Ok(Query::CreateTable(CreateTableQuery { table_name, elements }))
    }

    fn parse_table_element(&mut self) -> Result<TableElement, SyntaxError> {
        match self.peek() {
            Some(Token::Keyword(Keyword::Primary)) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                Ok(TableElement::PrimaryKey(self.parse_column_name_list()?))
            }
            Some(Token::Keyword(Keyword::Foreign)) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let columns = self.parse_column_name_list()?;
                self.expect_keyword(Keyword::References)?;
                let referenced_table = self.expect_ident()?;
                let referenced_columns = self.parse_column_name_list()?;
                Ok(TableElement::ForeignKey(ForeignKeyConstraint {
                    columns,
                    referenced_table,
                    referenced_columns,
                }))
            }
            _ => {
                let name = self.expect_ident()?;
                let data_type = self.parse_data_type()?;
                let not_null = if self.accept_keyword(Keyword::Not) {
                    self.expect_keyword(Keyword::Null)?;
                    true
                } else {
                    false
                };
                Ok(TableElement::Column(ColumnDefinition {
                    name,
                    data_type,
                    not_null,
                }))
            }
        }
    }

    fn parse_data_type(&mut self) -> Result<DataType, SyntaxError> {
        match self.advance() {
            Some(Token::Keyword(Keyword::Int)) => Ok(DataType::Int),
            Some(Token::Keyword(Keyword::Date)) => Ok(DataType::Date),
            Some(Token::Keyword(Keyword::Char)) => {
                self.expect(Token::LeftParen)?;
                let len = match self.advance() {
                    Some(Token::Int(len)) => len,
                    _ => return Err(SyntaxError),
                };
                self.expect(Token::RightParen)?;
                Ok(DataType::Char(len))
            }
            _ => Err(SyntaxError),
        }
    }

    fn parse_column_name_list(&mut self) -> Result<Vec<String>, SyntaxError> {
        self.expect(Token::LeftParen)?;
        let mut columns = vec![self.expect_ident()?];
        while self.accept(Token::Comma) {
            columns.push(self.expect_ident()?);
        }
        self.expect(Token::RightParen)?;
        Ok(columns)
    }

    fn parse_drop_table(&mut self) -> Result<Query, SyntaxError> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        Ok(Query::DropTable(self.expect_ident()?))
    }

    fn parse_desc_table(&mut self) -> Result<Query, SyntaxError> {
        self.advance();
        Ok(Query::DescTable(self.expect_ident()?))
    }

    fn parse_show_tables(&mut self) -> Result<Query, SyntaxError> {
        self.expect_keyword(Keyword::Show)?;
        self.expect_keyword(Keyword::Tables)?;
        Ok(Query::ShowTables)
    }

    fn parse_insert(&mut self) -> Result<Query, SyntaxError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table_name = self.expect_ident()?;
        let columns = if self.peek() == Some(&Token::LeftParen) {
            Some(self.parse_column_name_list()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::Values)?;
        self.expect(Token::LeftParen)?;
        let mut values = vec![self.parse_value()?];
        while self.accept(Token::Comma) {
            values.push(self.parse_value()?);
        }
        self.expect(Token::RightParen)?;
        Ok(Query::Insert(InsertQuery {
            table_name,
            columns,
            values,
        }))
    }

    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        match self.advance() {
            Some(Token::Int(value)) => Ok(Value::Int(value)),
            Some(Token::StringLiteral(value)) => Ok(Value::String(value)),
            Some(Token::DateLiteral(value)) => Ok(Value::Date(value)),
            Some(Token::Keyword(Keyword::Null)) => Ok(Value::Null),
            _ => Err(SyntaxError),
        }
    }

    fn parse_delete(&mut self) -> Result<Query, SyntaxError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table_name = self.expect_ident()?;
        let where_clause = self.parse_where_clause()?;
        Ok(Query::Delete(DeleteQuery {
            table_name,
            where_clause,
        }))
    }

    fn parse_update(&mut self) -> Result<Query, SyntaxError> {
        self.expect_keyword(Keyword::Update)?;
        let table_name = self.expect_ident()?;
        self.expect_keyword(Keyword::Set)?;
        let column = self.expect_ident()?;
        self.expect(Token::Eq)?;
        let value = self.parse_value()?;
        let where_clause = self.parse_where_clause()?;
        Ok(Query::Update(UpdateQuery {
            table_name,
            column,
            value,
            where_clause,
        }))
    }

    fn parse_select(&mut self) -> Result<Query, SyntaxError> {
        self.expect_keyword(Keyword::Select)?;
        let select_items = if self.accept(Token::Asterisk) {
            vec![]
        } else {
            let mut items = vec![self.parse_select_item()?];
            while self.accept(Token::Comma) {
                items.push(self.parse_select_item()?);
            }
            items
        };
        self.expect_keyword(Keyword::From)?;
        let mut from = vec![self.parse_table_reference()?];
        while self.accept(Token::Comma) {
            from.push(self.parse_table_reference()?);
        }
        let where_clause = self.parse_where_clause()?;
        Ok(Query::Select(SelectQuery {
            select_items,
            from,
            where_clause,
        }))
    }

    fn parse_select_item(&mut self) -> Result<SelectItem, SyntaxError> {
        let first = self.expect_ident()?;
        let (table, column) = if self.accept(Token::Period) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };
        let alias = self.parse_alias()?;
        Ok(SelectItem { table, column, alias })
    }

    fn parse_table_reference(&mut self) -> Result<TableReference, SyntaxError> {
        let name = self.expect_ident()?;
        let alias = self.parse_alias()?;
        Ok(TableReference { name, alias })
    }

    /// `AS alias`, a bare alias, or nothing.
    fn parse_alias(&mut self) -> Result<Option<String>, SyntaxError> {
        if self.accept_keyword(Keyword::As) {
            return Ok(Some(self.expect_ident()?));
        }
        match self.peek() {
            Some(Token::Ident(_)) => Ok(Some(self.expect_ident()?)),
            _ => Ok(None),
        }
    }

    fn parse_where_clause(&mut self) -> Result<Option<Expr>, SyntaxError> {
        if self.accept_keyword(Keyword::Where) {
            Ok(Some(self.parse_boolean_expr()?))
        } else {
            Ok(None)
        }
    }

    fn parse_boolean_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_boolean_term()?;
        while self.accept_keyword(Keyword::Or) {
            let right = self.parse_boolean_term()?;
            expr = Expr::BinaryOp {
                left: Box::new(expr),
                op: BinaryOperator::Or,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_boolean_term(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_boolean_factor()?;
        while self.accept_keyword(Keyword::And) {
            let right = self.parse_boolean_factor()?;
            expr = Expr::BinaryOp {
                left: Box::new(expr),
                op: BinaryOperator::And,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_boolean_factor(&mut self) -> Result<Expr, SyntaxError> {
        if self.accept_keyword(Keyword::Not) {
            Ok(Expr::UnaryOp {
                op: UnaryOperator::Not,
                expr: Box::new(self.parse_boolean_test()?),
            })
        } else {
            self.parse_boolean_test()
        }
    }

    fn parse_boolean_test(&mut self) -> Result<Expr, SyntaxError> {
        if self.accept(Token::LeftParen) {
            let expr = self.parse_boolean_expr()?;
            self.expect(Token::RightParen)?;
            Ok(expr)
        } else {
            self.parse_predicate()
        }
    }

    fn parse_predicate(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.parse_operand()?;
        if self.accept_keyword(Keyword::Is) {
            let negated = self.accept_keyword(Keyword::Not);
            self.expect_keyword(Keyword::Null)?;
            return match left {
                Expr::Column { table, name } => Ok(Expr::IsNull {
                    table,
                    column: name,
                    negated,
                }),
                _ => Err(SyntaxError),
            };
        }
        let op = self.parse_comparison_op()?;
        let right = self.parse_operand()?;
        Ok(Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_operand(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek() {
            Some(Token::Ident(_)) => {
                let first = self.expect_ident()?;
                if self.accept(Token::Period) {
                    Ok(Expr::Column {
                        table: Some(first),
                        name: self.expect_ident()?,
                    })
                } else {
                    Ok(Expr::Column {
                        table: None,
                        name: first,
                    })
                }
            }
            _ => Ok(Expr::Value(self.parse_value()?)),
        }
    }

    fn parse_comparison_op(&mut self) -> Result<BinaryOperator, SyntaxError> {
        match self.advance() {
            Some(Token::Lt) => Ok(BinaryOperator::Lt),
            Some(Token::Gt) => Ok(BinaryOperator::Gt),
            Some(Token::LtEq) => Ok(BinaryOperator::LtEq),
            Some(Token::GtEq) => Ok(BinaryOperator::GtEq),
            Some(Token::Eq) => Ok(BinaryOperator::Eq),
            Some(Token::NotEq) => Ok(BinaryOperator::NotEq),
            _ => Err(SyntaxError),
        }
    }
}
