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

use crate::SyntaxError;
use chrono::NaiveDate;

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Token {
    Ident(String),
    Keyword(Keyword),
    Int(i64),
    StringLiteral(String),
    DateLiteral(NaiveDate),
    LeftParen,
    RightParen,
    Comma,
    Period,
    Semicolon,
    Asterisk,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Keyword {
    Create,
    Table,
    Tables,
    Drop,
    Desc,
    Describe,
    Explain,
    Show,
    Insert,
    Into,
    Values,
    Delete,
    From,
    Update,
    Set,
    Select,
    Where,
    Primary,
    Foreign,
    Key,
    References,
    Not,
    Null,
    And,
    Or,
    Is,
    As,
    Int,
    Char,
    Date,
    Exit,
}

impl Keyword {
    fn from_ident(ident: &str) -> Option<Keyword> {
        Some(match ident {
            "create" => Keyword::Create,
            "table" => Keyword::Table,
            "tables" => Keyword::Tables,
            "drop" => Keyword::Drop,
            "desc" => Keyword::Desc,
            "describe" => Keyword::Describe,
            "explain" => Keyword::Explain,
            "show" => Keyword::Show,
            "insert" => Keyword::Insert,
            "into" => Keyword::Into,
            "values" => Keyword::Values,
            "delete" => Keyword::Delete,
            "from" => Keyword::From,
            "update" => Keyword::Update,
            "set" => Keyword::Set,
            "select" => Keyword::Select,
            "where" => Keyword::Where,
            "primary" => Keyword::Primary,
            "foreign" => Keyword::Foreign,
            "key" => Keyword::Key,
            "references" => Keyword::References,
            "not" => Keyword::Not,
            "null" => Keyword::Null,
            "and" => Keyword::And,
            "or" => Keyword::Or,
            "is" => Keyword::Is,
            "as" => Keyword::As,
            "int" => Keyword::Int,
            "char" => Keyword::Char,
            "date" => Keyword::Date,
            "exit" => Keyword::Exit,
            _ => return None,
        })
    }
}

/// Splits raw statement text into tokens. Identifiers and keywords are
/// case-insensitive; identifiers come out lowercased so that later
/// lookups compare byte-equal. A single-quoted literal whose body is a
/// valid `YYYY-MM-DD` calendar date becomes a date token.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Lexer<'a> {
        Lexer { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.peek()?;
        self.pos += next.len_utf8();
        Some(next)
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = vec![];
        loop {
            while self.peek().map(char::is_whitespace).unwrap_or(false) {
                self.advance();
            }
            let next = match self.peek() {
                None => return Ok(tokens),
                Some(next) => next,
            };
            let token = match next {
                '(' => self.symbol(Token::LeftParen),
                ')' => self.symbol(Token::RightParen),
                ',' => self.symbol(Token::Comma),
                '.' => self.symbol(Token::Period),
                ';' => self.symbol(Token::Semicolon),
                '*' => self.symbol(Token::Asterisk),
                '=' => self.symbol(Token::Eq),
                '<' => {
                    self.advance();
                    if self.advance_if('=') {
                        Token::LtEq
                    } else if self.advance_if('>') {
                        Token::NotEq
                    } else {
                        Token::Lt
                    }
                }
                '>' => {
                    self.advance();
                    if self.advance_if('=') {
                        Token::GtEq
                    } else {
                        Token::Gt
                    }
                }
                '!' => {
                    self.advance();
                    if self.advance_if('=') {
                        Token::NotEq
                    } else {
                        return Err(SyntaxError);
                    }
                }
                '\'' => self.scan_quoted()?,
                '-' => self.scan_int()?,
                _ if next.is_ascii_digit() => self.scan_int()?,
                _ if next.is_alphabetic() || next == '_' => self.scan_ident(),
                _ => return Err(SyntaxError),
            };
            tokens.push(token);
        }
    }

    fn symbol(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn scan_ident(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .map(|next| next.is_alphanumeric() || next == '_')
            .unwrap_or(false)
        {
            self.advance();
        }
        let ident = self.input[start..self.pos].to_lowercase();
        match Keyword::from_ident(&ident) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Ident(ident),
        }
    }

    fn scan_int(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
            if !self.peek().map(|next| next.is_ascii_digit()).unwrap_or(false) {
                return Err(SyntaxError);
            }
        }
        while self.peek().map(|next| next.is_ascii_digit()).unwrap_or(false) {
            self.advance();
        }
        self.input[start..self.pos]
            .parse()
            .map(Token::Int)
            .map_err(|_| SyntaxError)
    }

    fn scan_quoted(&mut self) -> Result<Token, SyntaxError> {
        self.advance();
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(SyntaxError),
                Some('\'') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let body = &self.input[start..self.pos];
        self.advance();
        match parse_date(body) {
            Some(date) => Ok(Token::DateLiteral(date)),
            None => Ok(Token::StringLiteral(body.to_owned())),
        }
    }
}

/// `YYYY-MM-DD` with a valid calendar day; anything else stays a string.
fn parse_date(body: &str) -> Option<NaiveDate> {
    let bytes = body.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits = bytes
        .iter()
        .enumerate()
        .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    if !digits {
        return None;
    }
    NaiveDate::parse_from_str(body, "%Y-%m-%d").ok()
}
