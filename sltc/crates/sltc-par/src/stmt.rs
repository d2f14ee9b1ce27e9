//! Stage-1 statement-shaped block parsing: `Dim`/`ReDim`, `If`, `For`,
//! `Do`/`While`, and `Select Case`.

use crate::ast::*;
use crate::{parse_expression, ParseError, ParseResult, Parser};
use sltc_lex::{Keyword, Token};

impl<'a> Parser<'a> {
    pub(crate) fn parse_dim_statement(&mut self, visibility: Visibility) -> ParseResult<Block> {
        let line = self.current_line();
        self.advance(); // Dim | Private | Public
        let vars = self.parse_dim_var_list()?;
        Ok(Block::DimStatement {
            vars,
            visibility,
            lines: LineRange::single(line),
        })
    }

    pub(crate) fn parse_redim_statement(&mut self) -> ParseResult<Block> {
        let line = self.current_line();
        self.advance(); // ReDim
        let preserve = self.match_keyword(Keyword::Preserve);
        let vars = self.parse_dim_var_list()?;
        Ok(Block::ReDimStatement {
            vars,
            preserve,
            lines: LineRange::single(line),
        })
    }

    fn parse_dim_var_list(&mut self) -> ParseResult<Vec<DimVariable>> {
        let mut vars = Vec::new();
        loop {
            let name = self.expect_name()?;
            let dims = if matches!(self.current(), Some(Token::OpenBrace)) {
                self.advance();
                let mut dim_exprs = Vec::new();
                if !matches!(self.current(), Some(Token::CloseBrace)) {
                    loop {
                        let dim_tokens = self.collect_bracketed_argument();
                        if !dim_tokens.is_empty() {
                            dim_exprs.push(parse_expression(&dim_tokens, self.current_line())?);
                        }
                        if matches!(self.current(), Some(Token::ArgumentSeparator)) {
                            self.advance();
                            continue;
                        }
                        break;
                    }
                }
                self.expect_close_brace()?;
                Some(dim_exprs)
            } else {
                None
            };
            vars.push(DimVariable { name, dims });
            if matches!(self.current(), Some(Token::ArgumentSeparator)) {
                self.advance();
                continue;
            }
            break;
        }
        Ok(vars)
    }

    /// Collects tokens belonging to one comma-separated argument inside an
    /// open bracket, honouring nested brackets.
    fn collect_bracketed_argument(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        let mut depth = 0i32;
        while let Some(tok) = self.current() {
            match tok {
                Token::ArgumentSeparator if depth == 0 => break,
                Token::CloseBrace if depth == 0 => break,
                Token::OpenBrace => {
                    depth += 1;
                    out.push(tok.clone());
                    self.advance();
                }
                Token::CloseBrace => {
                    depth -= 1;
                    out.push(tok.clone());
                    self.advance();
                }
                _ => {
                    out.push(tok.clone());
                    self.advance();
                }
            }
        }
        out
    }

    fn expect_close_brace(&mut self) -> ParseResult<()> {
        match self.advance() {
            Some(Token::CloseBrace) => Ok(()),
            other => Err(ParseError::ExpectedToken {
                line: self.current_line(),
                expected: ")".to_string(),
                found: format!("{other:?}"),
            }),
        }
    }

    pub(crate) fn parse_if_block(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // If
        let mut clauses = Vec::new();
        let condition_tokens = self.collect_then_condition()?;
        self.expect_keyword(Keyword::Then)?;

        // Single-line form: `If cond Then stmt` with no EndOfStatement
        // before further content on the same logical line.
        if !matches!(self.current(), Some(Token::EndOfStatement)) && !self.is_at_end() {
            let body = vec![self.parse_one_block()?];
            clauses.push(ConditionalClause {
                condition: parse_expression(&condition_tokens, start_line)?,
                body,
            });
            let mut else_body = None;
            if self.match_keyword(Keyword::Else) {
                else_body = Some(vec![self.parse_one_block()?]);
            }
            return Ok(Block::IfBlock {
                clauses,
                else_body,
                lines: LineRange::single(start_line),
            });
        }

        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::ElseIf, Keyword::Else, Keyword::End])?;
        clauses.push(ConditionalClause {
            condition: parse_expression(&condition_tokens, start_line)?,
            body,
        });

        while self.match_keyword(Keyword::ElseIf) {
            let clause_line = self.current_line();
            let cond_tokens = self.collect_then_condition()?;
            self.expect_keyword(Keyword::Then)?;
            self.skip_statement_separators();
            let body = self.parse_block_sequence(&[Keyword::ElseIf, Keyword::Else, Keyword::End])?;
            clauses.push(ConditionalClause {
                condition: parse_expression(&cond_tokens, clause_line)?,
                body,
            });
        }

        let else_body = if self.match_keyword(Keyword::Else) {
            self.skip_statement_separators();
            Some(self.parse_block_sequence(&[Keyword::End])?)
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;
        self.expect_keyword(Keyword::If)?;
        let end_line = self.current_line();
        Ok(Block::IfBlock {
            clauses,
            else_body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        })
    }

    /// Collects the condition token run up to (not including) `Then`.
    fn collect_then_condition(&mut self) -> ParseResult<Vec<Token>> {
        let mut out = Vec::new();
        let mut depth = 0i32;
        loop {
            match self.current() {
                Some(Token::Keyword(Keyword::Then)) if depth == 0 => break,
                Some(Token::OpenBrace) => {
                    depth += 1;
                    out.push(self.advance().unwrap());
                }
                Some(Token::CloseBrace) => {
                    depth -= 1;
                    out.push(self.advance().unwrap());
                }
                Some(_) => out.push(self.advance().unwrap()),
                None => {
                    return Err(ParseError::UnterminatedBlock {
                        line: self.current_line(),
                        expected: "Then".to_string(),
                    })
                }
            }
        }
        Ok(out)
    }

    pub(crate) fn parse_for_block(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // For
        if self.match_keyword(Keyword::Each) {
            let item = self.expect_name()?;
            self.expect_keyword(Keyword::In)?;
            let collection_tokens = self.collect_until_end_of_statement();
            self.skip_statement_separators();
            let body = self.parse_block_sequence(&[Keyword::Next])?;
            self.expect_keyword(Keyword::Next)?;
            self.skip_optional_loop_name();
            let end_line = self.current_line();
            return Ok(Block::ForEachBlock {
                item,
                collection: parse_expression(&collection_tokens, start_line)?,
                body,
                lines: LineRange {
                    start: start_line,
                    end: end_line,
                },
            });
        }

        let counter = self.expect_name()?;
        self.expect_eq()?;
        let from_tokens = self.collect_until_keyword(Keyword::To);
        self.expect_keyword(Keyword::To)?;
        let to_tokens = self.collect_until_keyword_or_step();
        let step = if self.match_keyword(Keyword::Step) {
            let step_tokens = self.collect_until_end_of_statement();
            Some(parse_expression(&step_tokens, start_line)?)
        } else {
            None
        };
        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::Next])?;
        self.expect_keyword(Keyword::Next)?;
        self.skip_optional_loop_name();
        let end_line = self.current_line();
        Ok(Block::ForBlock {
            counter,
            from: parse_expression(&from_tokens, start_line)?,
            to: parse_expression(&to_tokens, start_line)?,
            step,
            body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        })
    }

    fn skip_optional_loop_name(&mut self) {
        if matches!(self.current(), Some(Token::Name(_))) {
            self.advance();
        }
    }

    fn expect_eq(&mut self) -> ParseResult<()> {
        match self.advance() {
            Some(Token::ComparisonOperator(sltc_lex::ComparisonSymbol::Eq)) => Ok(()),
            other => Err(ParseError::ExpectedToken {
                line: self.current_line(),
                expected: "=".to_string(),
                found: format!("{other:?}"),
            }),
        }
    }

    fn collect_until_keyword(&mut self, kw: Keyword) -> Vec<Token> {
        let mut out = Vec::new();
        while let Some(tok) = self.current() {
            if matches!(tok, Token::Keyword(k) if *k == kw) {
                break;
            }
            out.push(tok.clone());
            self.advance();
        }
        out
    }

    fn collect_until_keyword_or_step(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        while let Some(tok) = self.current() {
            if matches!(tok, Token::Keyword(Keyword::Step)) || matches!(tok, Token::EndOfStatement)
            {
                break;
            }
            out.push(tok.clone());
            self.advance();
        }
        out
    }

    fn collect_until_end_of_statement(&mut self) -> Vec<Token> {
        self.collect_statement_tokens()
    }

    pub(crate) fn parse_do_block(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // Do
        let (test, polarity, condition) = if self.match_keyword(Keyword::While) {
            let tokens = self.collect_until_end_of_statement();
            (
                LoopTest::Pre,
                Some(LoopPolarity::While),
                Some(parse_expression(&tokens, start_line)?),
            )
        } else if self.match_keyword(Keyword::Until) {
            let tokens = self.collect_until_end_of_statement();
            (
                LoopTest::Pre,
                Some(LoopPolarity::Until),
                Some(parse_expression(&tokens, start_line)?),
            )
        } else {
            (LoopTest::None, None, None)
        };

        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::Loop])?;
        self.expect_keyword(Keyword::Loop)?;

        let (test, polarity, condition) = if matches!(test, LoopTest::None) {
            if self.match_keyword(Keyword::While) {
                let tokens = self.collect_until_end_of_statement();
                (
                    LoopTest::Post,
                    Some(LoopPolarity::While),
                    Some(parse_expression(&tokens, start_line)?),
                )
            } else if self.match_keyword(Keyword::Until) {
                let tokens = self.collect_until_end_of_statement();
                (
                    LoopTest::Post,
                    Some(LoopPolarity::Until),
                    Some(parse_expression(&tokens, start_line)?),
                )
            } else {
                (test, polarity, condition)
            }
        } else {
            (test, polarity, condition)
        };

        let end_line = self.current_line();
        Ok(Block::DoBlock {
            test,
            polarity,
            condition,
            body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        })
    }

    pub(crate) fn parse_while_block(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // While
        let cond_tokens = self.collect_until_end_of_statement();
        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::Wend])?;
        self.expect_keyword(Keyword::Wend)?;
        let end_line = self.current_line();
        Ok(Block::WhileBlock {
            condition: parse_expression(&cond_tokens, start_line)?,
            body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        })
    }

    pub(crate) fn parse_select_block(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // Select
        self.expect_keyword(Keyword::Case)?;
        let subject_tokens = self.collect_until_end_of_statement();
        self.skip_statement_separators();

        let mut cases = Vec::new();
        loop {
            self.skip_statement_separators();
            if self.match_keyword(Keyword::End) {
                self.expect_keyword(Keyword::Select)?;
                break;
            }
            self.expect_keyword(Keyword::Case)?;
            let values = if self.match_keyword(Keyword::Else) {
                self.collect_until_end_of_statement();
                Vec::new()
            } else {
                let mut vals = Vec::new();
                loop {
                    let value_tokens = self.collect_case_value();
                    vals.push(parse_expression(&value_tokens, self.current_line())?);
                    if matches!(self.current(), Some(Token::ArgumentSeparator)) {
                        self.advance();
                        continue;
                    }
                    break;
                }
                self.skip_statement_separators();
                vals
            };
            self.skip_statement_separators();
            let body = self.parse_block_sequence(&[Keyword::Case, Keyword::End])?;
            cases.push(SelectCase { values, body });
        }

        let end_line = self.current_line();
        Ok(Block::SelectBlock {
            subject: parse_expression(&subject_tokens, start_line)?,
            cases,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        })
    }

    fn collect_case_value(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        let mut depth = 0i32;
        while let Some(tok) = self.current() {
            match tok {
                Token::ArgumentSeparator if depth == 0 => break,
                Token::EndOfStatement if depth == 0 => break,
                Token::OpenBrace => {
                    depth += 1;
                    out.push(tok.clone());
                    self.advance();
                }
                Token::CloseBrace => {
                    depth -= 1;
                    out.push(tok.clone());
                    self.advance();
                }
                _ => {
                    out.push(tok.clone());
                    self.advance();
                }
            }
        }
        out
    }
}
