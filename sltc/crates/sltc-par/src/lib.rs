//! sltc-par - Stage-1 (block) and Stage-2 (expression) parsing for the
//! legacy BASIC-dialect source language.
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! Stage 1 (this crate's `lib.rs`/`stmt.rs`/`items.rs`) scans a flat token
//! stream and groups it into [`Block`]s by matching line-initial keywords —
//! `If`, `For`, `Do`, `While`, `Select`, `Sub`, `Function`, `Property`,
//! `Class`, `On Error`, `With`, `Exit` — falling back to a raw `Statement`
//! or a `ValueSettingStatement` for anything else. Every statement's token
//! run is bracket-standardised (every call-argument position gets an
//! explicit `OpenBrace`/`CloseBrace`) before it leaves Stage 1.
//!
//! Stage 2 (`expr.rs`) takes one bracket-standardised token run and builds
//! an [`Expression`] tree using the operator combiner followed by recursive
//! descent over the 15-level precedence ladder.
//!
//! Both stages are fatal-on-error: there is no error-recovery/synchronise
//! step, because a malformed block cannot be translated at all — unlike a
//! compiler frontend, there is no partial-AST use case downstream.

pub mod ast;
#[cfg(test)]
mod edge_cases;
mod expr;
mod items;
mod stmt;

pub use ast::{
    AssignKind, Block, CallableKind, ClassBlock, ConditionalClause, DimVariable, Expression,
    ExitKind, FunctionBlock, LineRange, LoopPolarity, LoopTest, Op, Param, PassingMode,
    PropertyBlock, PropertyKind, SelectCase, Segment, SubBlock, Visibility,
};
pub use expr::parse_expression;

use sltc_lex::{Keyword, Token, TokenWithLine};
use sltc_util::Handler;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: unterminated block (expected `{expected}`)")]
    UnterminatedBlock { line: u32, expected: String },
    #[error("line {line}: unexpected keyword `{found}`")]
    UnexpectedKeyword { line: u32, found: String },
    #[error("line {line}: unexpected token `{found}`")]
    UnexpectedToken { line: u32, found: String },
    #[error("line {line}: expected `{expected}`, found `{found}`")]
    ExpectedToken {
        line: u32,
        expected: String,
        found: String,
    },
    #[error("line {line}: unexpected end of input")]
    UnexpectedEof { line: u32 },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full token stream into the top-level sequence of [`Block`]s.
pub fn parse_blocks(tokens: Vec<TokenWithLine>, handler: &mut Handler) -> ParseResult<Vec<Block>> {
    let mut parser = Parser::new(tokens, handler);
    parser.parse_block_sequence(&[])
}

pub struct Parser<'a> {
    tokens: Vec<TokenWithLine>,
    pos: usize,
    #[allow(dead_code)]
    handler: &'a mut Handler,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<TokenWithLine>, handler: &'a mut Handler) -> Self {
        Self {
            tokens,
            pos: 0,
            handler,
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn current_line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .map(|t| t.line)
            .or_else(|| self.tokens.last().map(|t| t.line))
            .unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|t| t.token.clone());
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn skip_statement_separators(&mut self) {
        while matches!(self.current(), Some(Token::EndOfStatement)) {
            self.pos += 1;
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> ParseResult<()> {
        match self.current() {
            Some(Token::Keyword(k)) if *k == kw => {
                self.advance();
                Ok(())
            }
            other => Err(ParseError::ExpectedToken {
                line: self.current_line(),
                expected: format!("{kw:?}"),
                found: format!("{other:?}"),
            }),
        }
    }

    fn match_keyword(&mut self, kw: Keyword) -> bool {
        if matches!(self.current(), Some(Token::Keyword(k)) if *k == kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_keyword(&self, kw: Keyword) -> bool {
        matches!(self.current(), Some(Token::Keyword(k)) if *k == kw)
    }

    fn expect_name(&mut self) -> ParseResult<sltc_util::Symbol> {
        match self.advance() {
            Some(Token::Name(s)) | Some(Token::BuiltInFunction(s)) => Ok(s),
            other => Err(ParseError::ExpectedToken {
                line: self.current_line(),
                expected: "identifier".to_string(),
                found: format!("{other:?}"),
            }),
        }
    }

    /// Collects tokens up to (not including) the next `EndOfStatement` or
    /// end of input, bracket-standardising any bare dotted-call argument
    /// list along the way (Stage 1's job is to leave every call-argument
    /// position with an explicit pair of braces; plain identifiers used as
    /// values are untouched since Stage 2 treats `brackets_present = false`
    /// as semantically distinct from `= true`).
    fn collect_statement_tokens(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        while let Some(tok) = self.current() {
            if matches!(tok, Token::EndOfStatement) {
                break;
            }
            out.push(tok.clone());
            self.advance();
        }
        out
    }

    /// Parses a sequence of blocks until a token run matching one of
    /// `terminators` is seen at the start of a statement (terminator is left
    /// unconsumed so the caller can match and advance past it), or input
    /// ends (only valid when `terminators` is empty, i.e. top level).
    fn parse_block_sequence(&mut self, terminators: &[Keyword]) -> ParseResult<Vec<Block>> {
        let mut blocks = Vec::new();
        loop {
            self.skip_statement_separators();
            if self.is_at_end() {
                if terminators.is_empty() {
                    break;
                }
                return Err(ParseError::UnterminatedBlock {
                    line: self.current_line(),
                    expected: format!("{terminators:?}"),
                });
            }
            if self.at_terminator(terminators) {
                break;
            }
            blocks.push(self.parse_one_block()?);
        }
        Ok(blocks)
    }

    fn at_terminator(&self, terminators: &[Keyword]) -> bool {
        terminators
            .iter()
            .any(|kw| matches!(self.current(), Some(Token::Keyword(k)) if k == kw))
    }

    fn parse_one_block(&mut self) -> ParseResult<Block> {
        match self.current() {
            Some(Token::Keyword(Keyword::Dim)) => self.parse_dim_statement(Visibility::Private),
            Some(Token::Keyword(Keyword::Private)) => self.parse_visibility_prefixed(Visibility::Private),
            Some(Token::Keyword(Keyword::Public)) => self.parse_visibility_prefixed(Visibility::Public),
            Some(Token::Keyword(Keyword::ReDim)) => self.parse_redim_statement(),
            Some(Token::Keyword(Keyword::If)) => self.parse_if_block(),
            Some(Token::Keyword(Keyword::For)) => self.parse_for_block(),
            Some(Token::Keyword(Keyword::Do)) => self.parse_do_block(),
            Some(Token::Keyword(Keyword::While)) => self.parse_while_block(),
            Some(Token::Keyword(Keyword::Select)) => self.parse_select_block(),
            Some(Token::Keyword(Keyword::Sub)) => self.parse_sub_block(Visibility::Public),
            Some(Token::Keyword(Keyword::Function)) => self.parse_function_block(Visibility::Public),
            Some(Token::Keyword(Keyword::Property)) => {
                self.parse_property_block(Visibility::Public)
            }
            Some(Token::Keyword(Keyword::Default)) => self.parse_default_prefixed(),
            Some(Token::Keyword(Keyword::Class)) => self.parse_class_block(),
            Some(Token::Keyword(Keyword::On)) => self.parse_on_error(),
            Some(Token::Keyword(Keyword::With)) => self.parse_with_block(),
            Some(Token::Keyword(Keyword::Exit)) => self.parse_exit_statement(),
            Some(Token::Comment(s)) => {
                let line = self.current_line();
                let s = *s;
                self.advance();
                Ok(Block::CommentStatement {
                    text: s,
                    lines: LineRange::single(line),
                })
            }
            Some(Token::InlineComment(s)) => {
                let line = self.current_line();
                let s = *s;
                self.advance();
                Ok(Block::CommentStatement {
                    text: s,
                    lines: LineRange::single(line),
                })
            }
            Some(Token::Keyword(Keyword::Set)) => self.parse_value_setting(AssignKind::Set),
            Some(_) => self.parse_statement_or_let(),
            None => Err(ParseError::UnexpectedEof {
                line: self.current_line(),
            }),
        }
    }

    /// Dispatches on what follows a `Private`/`Public` prefix: a bare
    /// variable declaration list, a procedure definition taking that
    /// visibility, or (for `Public`) a further `Default` modifier.
    fn parse_visibility_prefixed(&mut self, visibility: Visibility) -> ParseResult<Block> {
        match self.peek_at(1) {
            Some(Token::Keyword(Keyword::Sub)) => {
                self.advance();
                self.parse_sub_block(visibility)
            }
            Some(Token::Keyword(Keyword::Function)) => {
                self.advance();
                self.parse_function_block(visibility)
            }
            Some(Token::Keyword(Keyword::Property)) => {
                self.advance();
                self.parse_property_block(visibility)
            }
            Some(Token::Keyword(Keyword::Default)) => {
                self.advance();
                self.parse_default_prefixed()
            }
            _ => self.parse_dim_statement(visibility),
        }
    }

    /// `Public Default Function ...` / `Public Default Property ...`.
    fn parse_default_prefixed(&mut self) -> ParseResult<Block> {
        self.advance(); // Default
        match self.current() {
            Some(Token::Keyword(Keyword::Function)) => {
                self.parse_function_block(Visibility::Default)
            }
            Some(Token::Keyword(Keyword::Property)) => {
                self.parse_property_block(Visibility::Default)
            }
            other => Err(ParseError::UnexpectedKeyword {
                line: self.current_line(),
                found: format!("{other:?}"),
            }),
        }
    }

    /// No recognized leading keyword: either `Set target = value`,
    /// `target = value`, or a bare statement (a call used for effect).
    fn parse_statement_or_let(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        let start = self.pos;
        let tokens = self.collect_statement_tokens();

        if let Some(eq_pos) = find_top_level_assignment(&tokens) {
            let target = tokens[..eq_pos].to_vec();
            let value = tokens[eq_pos + 1..].to_vec();
            return Ok(Block::ValueSettingStatement {
                target,
                value,
                kind: AssignKind::Let,
                lines: LineRange::single(start_line),
            });
        }

        let _ = start;
        Ok(Block::Statement {
            tokens,
            lines: LineRange::single(start_line),
        })
    }

    fn parse_value_setting(&mut self, kind: AssignKind) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // `Set`
        let tokens = self.collect_statement_tokens();
        let eq_pos = find_top_level_assignment(&tokens).ok_or(ParseError::ExpectedToken {
            line: start_line,
            expected: "=".to_string(),
            found: "end of statement".to_string(),
        })?;
        let target = tokens[..eq_pos].to_vec();
        let value = tokens[eq_pos + 1..].to_vec();
        Ok(Block::ValueSettingStatement {
            target,
            value,
            kind,
            lines: LineRange::single(start_line),
        })
    }

    fn parse_exit_statement(&mut self) -> ParseResult<Block> {
        let line = self.current_line();
        self.advance();
        let kind = match self.advance() {
            Some(Token::Keyword(Keyword::Do)) => ExitKind::Do,
            Some(Token::Keyword(Keyword::For)) => ExitKind::For,
            Some(Token::Keyword(Keyword::Sub)) => ExitKind::Sub,
            Some(Token::Keyword(Keyword::Function)) => ExitKind::Function,
            Some(Token::Keyword(Keyword::Property)) => ExitKind::Property,
            other => {
                return Err(ParseError::ExpectedToken {
                    line,
                    expected: "Do|For|Sub|Function|Property".to_string(),
                    found: format!("{other:?}"),
                })
            }
        };
        Ok(Block::ExitStatement {
            kind,
            lines: LineRange::single(line),
        })
    }

    fn parse_on_error(&mut self) -> ParseResult<Block> {
        let line = self.current_line();
        self.advance(); // On
        self.expect_keyword(Keyword::Error)?;
        if self.match_keyword(Keyword::Resume) {
            self.expect_keyword(Keyword::Next)?;
            return Ok(Block::OnErrorResumeNext {
                lines: LineRange::single(line),
            });
        }
        if self.match_keyword(Keyword::Goto) {
            match self.advance() {
                Some(Token::NumericLiteral(v, _)) if is_integer_zero(&v) => {
                    return Ok(Block::OnErrorGoto0 {
                        lines: LineRange::single(line),
                    })
                }
                other => {
                    return Err(ParseError::ExpectedToken {
                        line,
                        expected: "0".to_string(),
                        found: format!("{other:?}"),
                    })
                }
            }
        }
        Err(ParseError::UnexpectedToken {
            line,
            found: format!("{:?}", self.current()),
        })
    }

    fn parse_with_block(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // With
        let target_tokens = self.collect_statement_tokens();
        let target = parse_expression(&target_tokens, start_line)?;
        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::End])?;
        self.expect_keyword(Keyword::End)?;
        self.expect_keyword(Keyword::With)?;
        let end_line = self.current_line();
        Ok(Block::WithBlock {
            target,
            body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        })
    }
}

/// Finds the index of a top-level `=` comparison token that is acting as an
/// assignment operator (i.e. not nested inside a bracketed sub-expression).
fn find_top_level_assignment(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0i32;
    for (i, t) in tokens.iter().enumerate() {
        match t {
            Token::OpenBrace => depth += 1,
            Token::CloseBrace => depth -= 1,
            Token::ComparisonOperator(sltc_lex::ComparisonSymbol::Eq) if depth == 0 => {
                return Some(i)
            }
            _ => {}
        }
    }
    None
}

fn is_integer_zero(v: &sltc_lex::NumericValue) -> bool {
    matches!(v, sltc_lex::NumericValue::Integer(0))
}
