//! Stage-1 parsing of callable and class definitions: `Sub`, `Function`,
//! `Property Get|Let|Set`, and `Class`.

use crate::ast::*;
use crate::{ParseError, ParseResult, Parser};
use sltc_lex::{Keyword, Token};

impl<'a> Parser<'a> {
    pub(crate) fn parse_sub_block(&mut self, visibility: Visibility) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // Sub
        let name = self.expect_name()?;
        let params = self.parse_param_list()?;
        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::End])?;
        self.expect_keyword(Keyword::End)?;
        self.expect_keyword(Keyword::Sub)?;
        let end_line = self.current_line();
        Ok(Block::SubBlock(SubBlock {
            visibility,
            name,
            params,
            body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        }))
    }

    pub(crate) fn parse_function_block(&mut self, visibility: Visibility) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // Function
        let name = self.expect_name()?;
        let params = self.parse_param_list()?;
        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::End])?;
        self.expect_keyword(Keyword::End)?;
        self.expect_keyword(Keyword::Function)?;
        let end_line = self.current_line();
        Ok(Block::FunctionBlock(FunctionBlock {
            visibility,
            name,
            params,
            body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        }))
    }

    pub(crate) fn parse_property_block(&mut self, visibility: Visibility) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // Property
        let kind = match self.advance() {
            Some(Token::Keyword(Keyword::Get)) => PropertyKind::Get,
            Some(Token::Keyword(Keyword::Let)) => PropertyKind::Let,
            Some(Token::Keyword(Keyword::Set)) => PropertyKind::Set,
            other => {
                return Err(ParseError::ExpectedToken {
                    line: start_line,
                    expected: "Get|Let|Set".to_string(),
                    found: format!("{other:?}"),
                })
            }
        };
        let name = self.expect_name()?;
        let params = self.parse_param_list()?;
        self.skip_statement_separators();
        let body = self.parse_block_sequence(&[Keyword::End])?;
        self.expect_keyword(Keyword::End)?;
        self.expect_keyword(Keyword::Property)?;
        let end_line = self.current_line();
        Ok(Block::PropertyBlock(PropertyBlock {
            visibility,
            kind,
            name,
            params,
            body,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        }))
    }

    pub(crate) fn parse_class_block(&mut self) -> ParseResult<Block> {
        let start_line = self.current_line();
        self.advance(); // Class
        let name = self.expect_name()?;
        self.skip_statement_separators();
        let members = self.parse_block_sequence(&[Keyword::End])?;
        self.expect_keyword(Keyword::End)?;
        self.expect_keyword(Keyword::Class)?;
        let end_line = self.current_line();
        Ok(Block::ClassBlock(ClassBlock {
            name,
            members,
            lines: LineRange {
                start: start_line,
                end: end_line,
            },
        }))
    }

    /// `( [ByRef|ByVal] name [, ...] )`. A parameter with neither modifier
    /// defaults to by-ref, matching the source language's calling
    /// convention.
    fn parse_param_list(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if !matches!(self.current(), Some(Token::OpenBrace)) {
            return Ok(params);
        }
        self.advance(); // (
        if matches!(self.current(), Some(Token::CloseBrace)) {
            self.advance();
            return Ok(params);
        }
        loop {
            let mode = if self.match_keyword(Keyword::ByRef) {
                PassingMode::ByRef
            } else if self.match_keyword(Keyword::ByVal) {
                PassingMode::ByVal
            } else {
                PassingMode::ByRef
            };
            let name = self.expect_name()?;
            params.push(Param { name, mode });
            if matches!(self.current(), Some(Token::ArgumentSeparator)) {
                self.advance();
                continue;
            }
            break;
        }
        match self.advance() {
            Some(Token::CloseBrace) => Ok(params),
            other => Err(ParseError::ExpectedToken {
                line: self.current_line(),
                expected: ")".to_string(),
                found: format!("{other:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sltc_lex::lex;
    use sltc_util::Handler;

    fn parse(src: &str) -> Vec<Block> {
        let mut h = Handler::new();
        let tokens = lex(src, &mut h).expect("lex ok");
        crate::parse_blocks(tokens, &mut h).expect("parse ok")
    }

    #[test]
    fn sub_with_byref_and_byval_params() {
        let blocks = parse("Sub DoThing(ByRef a, ByVal b, c)\nEnd Sub");
        match &blocks[0] {
            Block::SubBlock(s) => {
                assert_eq!(s.params.len(), 3);
                assert_eq!(s.params[0].mode, PassingMode::ByRef);
                assert_eq!(s.params[1].mode, PassingMode::ByVal);
                assert_eq!(s.params[2].mode, PassingMode::ByRef);
            }
            other => panic!("expected sub block, got {other:?}"),
        }
    }

    #[test]
    fn function_with_no_params() {
        let blocks = parse("Function GetIt\nEnd Function");
        assert!(matches!(blocks[0], Block::FunctionBlock(_)));
    }

    #[test]
    fn property_get_let_set() {
        let blocks = parse(
            "Property Get Foo\nEnd Property\nProperty Let Foo(v)\nEnd Property\nProperty Set Foo(v)\nEnd Property",
        );
        assert_eq!(blocks.len(), 3);
        match &blocks[0] {
            Block::PropertyBlock(p) => assert_eq!(p.kind, PropertyKind::Get),
            other => panic!("expected property block, got {other:?}"),
        }
    }

    #[test]
    fn class_with_nested_sub() {
        let blocks = parse("Class Foo\nPublic Sub Bar\nEnd Sub\nEnd Class");
        match &blocks[0] {
            Block::ClassBlock(c) => {
                assert_eq!(c.members.len(), 1);
                assert!(matches!(c.members[0], Block::SubBlock(_)));
            }
            other => panic!("expected class block, got {other:?}"),
        }
    }

    #[test]
    fn public_default_function() {
        let blocks = parse("Public Default Function Foo\nEnd Function");
        match &blocks[0] {
            Block::FunctionBlock(f) => assert_eq!(f.visibility, Visibility::Default),
            other => panic!("expected function block, got {other:?}"),
        }
    }
}
