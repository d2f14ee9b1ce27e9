//! sltc-lex - Lexical analysis for the legacy BASIC-dialect source language.
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate turns raw source characters into a flat stream of [`Token`]s.
//! The source language (SL) is dynamically typed and case-insensitive: every
//! identifier keeps its original spelling in the token stream, but keyword
//! and built-in recognition always folds case first.
//!
//! TOKEN CATEGORIES
//! ----------------
//! 1. KEYWORDS     - reserved block/statement words (`If`, `Dim`, `Sub`, ...)
//! 2. OPERATORS    - both symbolic (`+ - * /`) and keyword (`Mod And Or`) forms
//! 3. NAMES        - identifiers, with original casing preserved
//! 4. LITERALS     - numeric, string, and the built-in value literals
//! 5. STRUCTURE    - braces, argument separators, statement/line boundaries
//!
//! LEXICAL QUIRKS OF THE SOURCE LANGUAGE
//! --------------------------------------
//! - A `"` doubled inside a string (`""`) is an escaped literal quote, not the
//!   end of the string.
//! - A trailing `_` immediately before a line break continues the logical
//!   line; no `EndOfStatement` token is produced for that break.
//! - `'` and leading `REM` (case-insensitive) both start a comment that runs
//!   to end of line. If there was other content earlier on the line, the
//!   comment is tagged `InlineComment` rather than `Comment` so a
//!   pretty-printer can choose to keep it attached to the statement above it.
//! - A lone `.` between two identifier-ish characters is ambiguous between a
//!   member accessor and a decimal point; the lexer emits the neutral
//!   `MemberAccessorOrDecimalPoint` token and leaves disambiguation to the
//!   parser, which has the surrounding token context to decide.

mod cursor;

pub use cursor::{Cursor, CursorSnapshot};

use sltc_util::diagnostic::E_LEXER_UNEXPECTED_CHAR;
use sltc_util::{Handler, Span, Symbol};
use thiserror::Error;

/// A single lexical token together with the 1-based source line it started on.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenWithLine {
    pub token: Token,
    pub line: u32,
}

/// Lexical tokens produced by [`Lexer`].
///
/// Names are stored with their original casing (`Symbol` preserves spelling);
/// every comparison for identity happens downstream against a rewritten
/// (case-folded) form, never here.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// An identifier, keeping its original casing.
    Name(Symbol),
    /// A recognized built-in function name (`Len`, `Mid`, `UCase`, ...).
    BuiltInFunction(Symbol),
    /// A recognized built-in value literal keyword (`Nothing`, `Null`, `Empty`, `True`, `False`).
    BuiltInValue(BuiltInValue),
    /// A block/statement reserved word (`If`, `Dim`, `Sub`, ...).
    Keyword(Keyword),
    /// A numeric literal and the line it was parsed on.
    NumericLiteral(NumericValue, u32),
    /// A string literal with escapes already resolved.
    StringLiteral(Symbol),
    /// A symbolic or keyword operator.
    Operator(OperatorSymbol),
    /// `= <> < > <= >=`, kept distinct from other operators because the
    /// parser's condition-emission logic dispatches on this variant.
    ComparisonOperator(ComparisonSymbol),
    /// An un-disambiguated `.` — either a member accessor or a decimal point.
    MemberAccessorOrDecimalPoint,
    /// A `.` the lexer could tell, from surrounding whitespace, must be a
    /// member accessor (e.g. immediately after a `)` or another name).
    MemberAccessor,
    OpenBrace,
    CloseBrace,
    /// `,` inside a call argument list.
    ArgumentSeparator,
    /// A newline or `:` that ends one statement and starts the next.
    EndOfStatement,
    /// A comment that follows other content on the same line.
    InlineComment(Symbol),
    /// A comment that is the only content on its line.
    Comment(Symbol),
    Whitespace,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltInValue {
    Nothing,
    Null,
    Empty,
    True,
    False,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Dim,
    ReDim,
    Private,
    Public,
    Default,
    Preserve,
    If,
    Then,
    ElseIf,
    Else,
    /// `End` — the Stage-1 parser combines this with the following keyword
    /// (`If`, `Sub`, `Function`, `Property`, `Select`, `Class`, `With`) to
    /// recognize a block terminator; the lexer never fuses the two tokens.
    End,
    For,
    Each,
    In,
    To,
    Step,
    Next,
    Do,
    Loop,
    While,
    Until,
    Wend,
    Select,
    Case,
    Sub,
    Function,
    Property,
    Get,
    Let,
    Set,
    Class,
    With,
    On,
    Error,
    Resume,
    Goto,
    Exit,
    Call,
    New,
    ByRef,
    ByVal,
    Option,
    Explicit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorSymbol {
    Plus,
    Minus,
    Star,
    Slash,
    Backslash,
    Caret,
    Ampersand,
    Mod,
    And,
    Or,
    Xor,
    Not,
    Eqv,
    Imp,
    Is,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonSymbol {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

/// Fatal lexical error. SL has no error recovery at this stage: the first bad
/// character or malformed literal aborts the whole lex.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: u32 },
    #[error("line {line}: invalid numeric literal {text:?}")]
    InvalidNumericLiteral { line: u32, text: String },
    #[error("line {line}: unexpected character {ch:?}")]
    UnexpectedCharacter { line: u32, ch: char },
}

pub type LexResult<T> = Result<T, LexError>;

/// Tokenizes `source`, reporting non-fatal observations (currently none) to
/// `handler` and returning the flat token stream or the first fatal
/// [`LexError`] encountered.
pub fn lex(source: &str, handler: &mut Handler) -> LexResult<Vec<TokenWithLine>> {
    Lexer::new(source, handler).tokenize()
}

pub struct Lexer<'a, 'h> {
    cursor: Cursor<'a>,
    handler: &'h mut Handler,
    /// true while scanning inside a `(...)` expression: a newline there does
    /// not terminate the statement.
    paren_depth: u32,
}

impl<'a, 'h> Lexer<'a, 'h> {
    pub fn new(source: &'a str, handler: &'h mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            paren_depth: 0,
        }
    }

    pub fn tokenize(mut self) -> LexResult<Vec<TokenWithLine>> {
        let mut out = Vec::new();
        loop {
            self.skip_non_newline_whitespace();
            if self.cursor.is_at_end() {
                break;
            }
            let line = self.cursor.line();
            if let Some(tok) = self.next_token(line)? {
                out.push(TokenWithLine { token: tok, line });
            }
        }
        Ok(out)
    }

    fn skip_non_newline_whitespace(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\r') {
            self.cursor.advance();
        }
    }

    fn next_token(&mut self, line: u32) -> LexResult<Option<Token>> {
        let c = self.cursor.current_char();
        match c {
            '\n' => {
                self.cursor.advance();
                if self.paren_depth > 0 {
                    Ok(None)
                } else {
                    Ok(Some(Token::EndOfStatement))
                }
            }
            ':' => {
                self.cursor.advance();
                Ok(Some(Token::EndOfStatement))
            }
            '_' if self.is_line_continuation() => {
                self.cursor.advance(); // '_'
                self.skip_non_newline_whitespace();
                if self.cursor.current_char() == '\n' {
                    self.cursor.advance();
                }
                Ok(None)
            }
            '"' => self.lex_string(line).map(Some),
            '\'' => Ok(Some(self.lex_comment(true))),
            '(' => {
                self.cursor.advance();
                self.paren_depth += 1;
                Ok(Some(Token::OpenBrace))
            }
            ')' => {
                self.cursor.advance();
                self.paren_depth = self.paren_depth.saturating_sub(1);
                Ok(Some(Token::CloseBrace))
            }
            ',' => {
                self.cursor.advance();
                Ok(Some(Token::ArgumentSeparator))
            }
            '=' => {
                self.cursor.advance();
                Ok(Some(Token::ComparisonOperator(ComparisonSymbol::Eq)))
            }
            '<' => {
                self.cursor.advance();
                match self.cursor.current_char() {
                    '=' => {
                        self.cursor.advance();
                        Ok(Some(Token::ComparisonOperator(ComparisonSymbol::LtEq)))
                    }
                    '>' => {
                        self.cursor.advance();
                        Ok(Some(Token::ComparisonOperator(ComparisonSymbol::NotEq)))
                    }
                    _ => Ok(Some(Token::ComparisonOperator(ComparisonSymbol::Lt))),
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    Ok(Some(Token::ComparisonOperator(ComparisonSymbol::GtEq)))
                } else {
                    Ok(Some(Token::ComparisonOperator(ComparisonSymbol::Gt)))
                }
            }
            '+' => {
                self.cursor.advance();
                Ok(Some(Token::Operator(OperatorSymbol::Plus)))
            }
            '-' => {
                self.cursor.advance();
                Ok(Some(Token::Operator(OperatorSymbol::Minus)))
            }
            '*' => {
                self.cursor.advance();
                Ok(Some(Token::Operator(OperatorSymbol::Star)))
            }
            '/' => {
                self.cursor.advance();
                Ok(Some(Token::Operator(OperatorSymbol::Slash)))
            }
            '\\' => {
                self.cursor.advance();
                Ok(Some(Token::Operator(OperatorSymbol::Backslash)))
            }
            '^' => {
                self.cursor.advance();
                Ok(Some(Token::Operator(OperatorSymbol::Caret)))
            }
            '&' => {
                if self.cursor.peek_char(1).to_ascii_uppercase() == 'H' {
                    self.lex_radix_literal(line, 16).map(Some)
                } else if self.cursor.peek_char(1).to_ascii_uppercase() == 'O' {
                    self.lex_radix_literal(line, 8).map(Some)
                } else {
                    self.cursor.advance();
                    Ok(Some(Token::Operator(OperatorSymbol::Ampersand)))
                }
            }
            '.' => {
                if self.cursor.peek_char(1).is_ascii_digit() {
                    self.lex_number_from_dot(line).map(Some)
                } else {
                    self.cursor.advance();
                    Ok(Some(Token::MemberAccessorOrDecimalPoint))
                }
            }
            c if c.is_ascii_digit() => self.lex_number(line).map(Some),
            c if is_name_start(c) => Ok(Some(self.lex_name())),
            c => {
                self.cursor.advance();
                self.handler
                    .build_error(Span::DUMMY, format!("unexpected character {c:?}"))
                    .code(E_LEXER_UNEXPECTED_CHAR)
                    .emit(self.handler);
                Err(LexError::UnexpectedCharacter { line, ch: c })
            }
        }
    }

    fn is_line_continuation(&self) -> bool {
        let mut i = 1;
        loop {
            match self.cursor.peek_char(i) {
                ' ' | '\t' | '\r' => i += 1,
                '\n' => return true,
                _ => return false,
            }
        }
    }

    fn lex_string(&mut self, line: u32) -> LexResult<Token> {
        self.cursor.advance(); // opening quote
        let mut s = String::new();
        loop {
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    if self.cursor.current_char() == '"' {
                        s.push('"');
                        self.cursor.advance();
                    } else {
                        return Ok(Token::StringLiteral(Symbol::intern(&s)));
                    }
                }
                '\0' if self.cursor.is_at_end() => {
                    return Err(LexError::UnterminatedString { line });
                }
                '\n' => return Err(LexError::UnterminatedString { line }),
                c => {
                    s.push(c);
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_comment(&mut self, inline_from_apostrophe: bool) -> Token {
        let had_preceding_content = inline_from_apostrophe && self.line_has_preceding_content();
        self.cursor.advance(); // consume the leading `'`
        let start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
        let text = Symbol::intern(self.cursor.slice_from(start).trim_end_matches('\r'));
        if had_preceding_content {
            Token::InlineComment(text)
        } else {
            Token::Comment(text)
        }
    }

    fn line_has_preceding_content(&self) -> bool {
        // column() is 1-based and counts characters consumed on this line so
        // far; more than 1 means something other than leading whitespace ran
        // before the comment marker.
        self.cursor.column() > 1
    }

    fn lex_radix_literal(&mut self, line: u32, radix: u32) -> LexResult<Token> {
        let start = self.cursor.position();
        self.cursor.advance(); // '&'
        self.cursor.advance(); // 'H' or 'O'
        let digits_start = self.cursor.position();
        while self.cursor.current_char().is_digit(radix) {
            self.cursor.advance();
        }
        let digits = self.cursor.slice_from(digits_start);
        if digits.is_empty() {
            let text = self.cursor.slice_from(start).to_string();
            return Err(LexError::InvalidNumericLiteral { line, text });
        }
        match i64::from_str_radix(digits, radix) {
            Ok(v) => Ok(Token::NumericLiteral(NumericValue::Integer(v), line)),
            Err(_) => Err(LexError::InvalidNumericLiteral {
                line,
                text: self.cursor.slice_from(start).to_string(),
            }),
        }
    }

    fn lex_number(&mut self, line: u32) -> LexResult<Token> {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        let mut is_float = false;
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        if matches!(self.cursor.current_char(), 'e' | 'E') {
            let save = self.cursor.snapshot();
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            if self.cursor.current_char().is_ascii_digit() {
                is_float = true;
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
            } else {
                self.cursor.restore(save);
            }
        }
        let text = self.cursor.slice_from(start);
        self.finish_number(text, line, is_float)
    }

    fn lex_number_from_dot(&mut self, line: u32) -> LexResult<Token> {
        let dot_start = self.cursor.position();
        self.cursor.advance(); // '.'
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        let digits = self.cursor.slice_from(dot_start);
        self.finish_number(&format!("0{digits}"), line, true)
    }

    fn finish_number(&mut self, text: &str, line: u32, is_float: bool) -> LexResult<Token> {
        if is_float {
            text.parse::<f64>()
                .map(|v| Token::NumericLiteral(NumericValue::Float(v), line))
                .map_err(|_| LexError::InvalidNumericLiteral {
                    line,
                    text: text.to_string(),
                })
        } else {
            text.parse::<i64>()
                .map(|v| Token::NumericLiteral(NumericValue::Integer(v), line))
                .or_else(|_| {
                    text.parse::<f64>()
                        .map(|v| Token::NumericLiteral(NumericValue::Float(v), line))
                })
                .map_err(|_| LexError::InvalidNumericLiteral {
                    line,
                    text: text.to_string(),
                })
        }
    }

    fn lex_name(&mut self) -> Token {
        let had_preceding_content = self.line_has_preceding_content();
        let start = self.cursor.position();
        self.cursor.advance();
        while is_name_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        if text.eq_ignore_ascii_case("REM") {
            let comment_start = self.cursor.position();
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
            let body = Symbol::intern(self.cursor.slice_from(comment_start).trim_end_matches('\r'));
            return if had_preceding_content {
                Token::InlineComment(body)
            } else {
                Token::Comment(body)
            };
        }
        classify_name(text)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Resolves an identifier's spelling against the fixed keyword / operator /
/// built-in tables, case-insensitively, falling back to `Name`.
fn classify_name(text: &str) -> Token {
    let upper = text.to_ascii_uppercase();
    if let Some(op) = match upper.as_str() {
        "MOD" => Some(OperatorSymbol::Mod),
        "AND" => Some(OperatorSymbol::And),
        "OR" => Some(OperatorSymbol::Or),
        "XOR" => Some(OperatorSymbol::Xor),
        "NOT" => Some(OperatorSymbol::Not),
        "EQV" => Some(OperatorSymbol::Eqv),
        "IMP" => Some(OperatorSymbol::Imp),
        "IS" => Some(OperatorSymbol::Is),
        _ => None,
    } {
        return Token::Operator(op);
    }
    if let Some(v) = match upper.as_str() {
        "NOTHING" => Some(BuiltInValue::Nothing),
        "NULL" => Some(BuiltInValue::Null),
        "EMPTY" => Some(BuiltInValue::Empty),
        "TRUE" => Some(BuiltInValue::True),
        "FALSE" => Some(BuiltInValue::False),
        _ => None,
    } {
        return Token::BuiltInValue(v);
    }
    if let Some(kw) = match upper.as_str() {
        "DIM" => Some(Keyword::Dim),
        "REDIM" => Some(Keyword::ReDim),
        "PRIVATE" => Some(Keyword::Private),
        "PUBLIC" => Some(Keyword::Public),
        "DEFAULT" => Some(Keyword::Default),
        "PRESERVE" => Some(Keyword::Preserve),
        "IF" => Some(Keyword::If),
        "THEN" => Some(Keyword::Then),
        "ELSEIF" => Some(Keyword::ElseIf),
        "ELSE" => Some(Keyword::Else),
        "END" => Some(Keyword::End),
        "FOR" => Some(Keyword::For),
        "EACH" => Some(Keyword::Each),
        "IN" => Some(Keyword::In),
        "TO" => Some(Keyword::To),
        "STEP" => Some(Keyword::Step),
        "NEXT" => Some(Keyword::Next),
        "DO" => Some(Keyword::Do),
        "LOOP" => Some(Keyword::Loop),
        "WHILE" => Some(Keyword::While),
        "UNTIL" => Some(Keyword::Until),
        "WEND" => Some(Keyword::Wend),
        "SELECT" => Some(Keyword::Select),
        "CASE" => Some(Keyword::Case),
        "SUB" => Some(Keyword::Sub),
        "FUNCTION" => Some(Keyword::Function),
        "PROPERTY" => Some(Keyword::Property),
        "GET" => Some(Keyword::Get),
        "LET" => Some(Keyword::Let),
        "SET" => Some(Keyword::Set),
        "CLASS" => Some(Keyword::Class),
        "WITH" => Some(Keyword::With),
        "ON" => Some(Keyword::On),
        "ERROR" => Some(Keyword::Error),
        "RESUME" => Some(Keyword::Resume),
        "GOTO" => Some(Keyword::Goto),
        "EXIT" => Some(Keyword::Exit),
        "CALL" => Some(Keyword::Call),
        "NEW" => Some(Keyword::New),
        "BYREF" => Some(Keyword::ByRef),
        "BYVAL" => Some(Keyword::ByVal),
        "OPTION" => Some(Keyword::Option),
        "EXPLICIT" => Some(Keyword::Explicit),
        _ => None,
    } {
        return Token::Keyword(kw);
    }
    if let Some(f) = BUILTIN_FUNCTIONS.iter().find(|f| f.eq_ignore_ascii_case(text)) {
        return Token::BuiltInFunction(Symbol::intern(f));
    }
    Token::Name(Symbol::intern(text))
}

/// Built-in function names recognized at the lexical level; the runtime
/// façade only implements a subset of these (see `sltc-rt`), the rest are
/// recognized here so the parser can still build a `Call` segment for them.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "Len", "Mid", "Trim", "LTrim", "RTrim", "Left", "Right", "UCase", "LCase", "StrComp",
    "CByte", "CInt", "CLng", "CSng", "CDbl", "CCur", "CBool", "CDate", "CStr", "TypeName",
    "Now", "Date", "Time", "IsNull", "IsEmpty", "IsObject", "IsArray",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ok(src: &str) -> Vec<Token> {
        let mut h = Handler::new();
        lex(src, &mut h)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn lexes_simple_assignment() {
        let toks = lex_ok("x = 1 + 2");
        assert_eq!(
            toks,
            vec![
                Token::Name(Symbol::intern("x")),
                Token::ComparisonOperator(ComparisonSymbol::Eq),
                Token::NumericLiteral(NumericValue::Integer(1), 1),
                Token::Operator(OperatorSymbol::Plus),
                Token::NumericLiteral(NumericValue::Integer(2), 1),
            ]
        );
    }

    #[test]
    fn string_literal_with_doubled_quote() {
        let toks = lex_ok(r#"s = "a""b""#);
        assert_eq!(
            toks[2],
            Token::StringLiteral(Symbol::intern("a\"b"))
        );
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut h = Handler::new();
        assert!(matches!(
            lex(r#"s = "a"#, &mut h),
            Err(LexError::UnterminatedString { line: 1 })
        ));
    }

    #[test]
    fn newline_is_end_of_statement_but_not_inside_parens() {
        let toks = lex_ok("f(1,\n2)\nx");
        assert_eq!(
            toks,
            vec![
                Token::Name(Symbol::intern("f")),
                Token::OpenBrace,
                Token::NumericLiteral(NumericValue::Integer(1), 1),
                Token::ArgumentSeparator,
                Token::NumericLiteral(NumericValue::Integer(2), 2),
                Token::CloseBrace,
                Token::EndOfStatement,
                Token::Name(Symbol::intern("x")),
            ]
        );
    }

    #[test]
    fn line_continuation_elides_break() {
        let toks = lex_ok("x = 1 + _\n2");
        assert_eq!(
            toks,
            vec![
                Token::Name(Symbol::intern("x")),
                Token::ComparisonOperator(ComparisonSymbol::Eq),
                Token::NumericLiteral(NumericValue::Integer(1), 1),
                Token::Operator(OperatorSymbol::Plus),
                Token::NumericLiteral(NumericValue::Integer(2), 2),
            ]
        );
    }

    #[test]
    fn apostrophe_comment_is_inline_after_content() {
        let toks = lex_ok("x = 1 ' trailing note");
        assert_eq!(
            toks.last().unwrap(),
            &Token::InlineComment(Symbol::intern(" trailing note"))
        );
    }

    #[test]
    fn apostrophe_comment_alone_on_line_is_not_inline() {
        let toks = lex_ok("' a whole-line note");
        assert_eq!(toks, vec![Token::Comment(Symbol::intern(" a whole-line note"))]);
    }

    #[test]
    fn hex_and_octal_literals() {
        let toks = lex_ok("&HFF\n&O17");
        assert_eq!(
            toks,
            vec![
                Token::NumericLiteral(NumericValue::Integer(255), 1),
                Token::EndOfStatement,
                Token::NumericLiteral(NumericValue::Integer(15), 2),
            ]
        );
    }

    #[test]
    fn comparison_operators_lex_individually_before_combining() {
        // The lexer has no knowledge of adjacency rules; ">" and "=" come out
        // as two separate tokens here because they are separated by
        // whitespace the operator combiner (sltc-par) will later merge when
        // unspaced. Unspaced ">=" lexes directly to GtEq.
        let toks = lex_ok(">=");
        assert_eq!(toks, vec![Token::ComparisonOperator(ComparisonSymbol::GtEq)]);
    }

    #[test]
    fn keyword_operators_are_case_insensitive() {
        let toks = lex_ok("a aNd b Or c");
        assert_eq!(
            toks,
            vec![
                Token::Name(Symbol::intern("a")),
                Token::Operator(OperatorSymbol::And),
                Token::Name(Symbol::intern("b")),
                Token::Operator(OperatorSymbol::Or),
                Token::Name(Symbol::intern("c")),
            ]
        );
    }

    #[test]
    fn builtin_function_recognized_case_insensitively() {
        let toks = lex_ok("uCase(x)");
        assert_eq!(toks[0], Token::BuiltInFunction(Symbol::intern("UCase")));
    }

    #[test]
    fn leading_dot_followed_by_digit_is_a_float() {
        let toks = lex_ok("x = .5");
        assert_eq!(toks[2], Token::NumericLiteral(NumericValue::Float(0.5), 1));
    }

    #[test]
    fn unexpected_character_is_fatal() {
        let mut h = Handler::new();
        assert!(matches!(
            lex("x = @", &mut h),
            Err(LexError::UnexpectedCharacter { line: 1, ch: '@' })
        ));
    }
}
