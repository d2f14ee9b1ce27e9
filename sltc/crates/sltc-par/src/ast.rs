//! sltc-par - AST node definitions: the code-block and expression-segment
//! data model produced by the two parser stages.

use sltc_lex::{ComparisonSymbol, NumericValue, OperatorSymbol, Token};
use sltc_util::Symbol;

/// The operator carried by an [`Segment::Operation`] segment. The lexer
/// keeps symbolic/keyword operators and comparisons as distinct token
/// variants (the parser's condition-emission logic dispatches on the
/// comparison variant); an expression segment needs to carry either kind
/// uniformly, so this wraps both without merging their identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Symbol(OperatorSymbol),
    Comparison(ComparisonSymbol),
}

/// Source lines (1-based, inclusive) a block was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn single(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn join(self, other: LineRange) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// How a target was assigned: `x = ...` vs `Set x = ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignKind {
    Let,
    Set,
}

/// A parameter's passing mode. Absence of an explicit modifier defaults to
/// `ByRef` in the source language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassingMode {
    ByRef,
    ByVal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub mode: PassingMode,
}

/// A single `Dim`/`ReDim`/`Private`/`Public` declared name, with optional
/// array dimensions. `None` means a scalar; `Some(vec![])` an uninitialised
/// array; `Some(dims)` a sized array.
#[derive(Clone, Debug, PartialEq)]
pub struct DimVariable {
    pub name: Symbol,
    pub dims: Option<Vec<Expression>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallableKind {
    Sub,
    Function,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Get,
    Let,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopTest {
    /// No condition (`Do ... Loop`).
    None,
    /// Condition evaluated before the body runs.
    Pre,
    /// Condition evaluated after the body runs.
    Post,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopPolarity {
    While,
    Until,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalClause {
    pub condition: Expression,
    pub body: Vec<Block>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitKind {
    Do,
    For,
    Sub,
    Function,
    Property,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectCase {
    /// Empty means `Case Else`.
    pub values: Vec<Expression>,
    pub body: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubBlock {
    pub visibility: Visibility,
    pub name: Symbol,
    pub params: Vec<Param>,
    pub body: Vec<Block>,
    pub lines: LineRange,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionBlock {
    pub visibility: Visibility,
    pub name: Symbol,
    pub params: Vec<Param>,
    pub body: Vec<Block>,
    pub lines: LineRange,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyBlock {
    pub visibility: Visibility,
    pub kind: PropertyKind,
    pub name: Symbol,
    pub params: Vec<Param>,
    pub body: Vec<Block>,
    pub lines: LineRange,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassBlock {
    pub name: Symbol,
    pub members: Vec<Block>,
    pub lines: LineRange,
}

/// A Stage-1 code block. Raw statements carry their bracket-standardised
/// token run; every other variant has already been shaped into structure.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Statement {
        tokens: Vec<Token>,
        lines: LineRange,
    },
    ValueSettingStatement {
        target: Vec<Token>,
        value: Vec<Token>,
        kind: AssignKind,
        lines: LineRange,
    },
    IfBlock {
        clauses: Vec<ConditionalClause>,
        else_body: Option<Vec<Block>>,
        lines: LineRange,
    },
    ForBlock {
        counter: Symbol,
        from: Expression,
        to: Expression,
        step: Option<Expression>,
        body: Vec<Block>,
        lines: LineRange,
    },
    ForEachBlock {
        item: Symbol,
        collection: Expression,
        body: Vec<Block>,
        lines: LineRange,
    },
    DoBlock {
        test: LoopTest,
        polarity: Option<LoopPolarity>,
        condition: Option<Expression>,
        body: Vec<Block>,
        lines: LineRange,
    },
    WhileBlock {
        condition: Expression,
        body: Vec<Block>,
        lines: LineRange,
    },
    SelectBlock {
        subject: Expression,
        cases: Vec<SelectCase>,
        lines: LineRange,
    },
    SubBlock(SubBlock),
    FunctionBlock(FunctionBlock),
    PropertyBlock(PropertyBlock),
    DimStatement {
        vars: Vec<DimVariable>,
        visibility: Visibility,
        lines: LineRange,
    },
    ReDimStatement {
        vars: Vec<DimVariable>,
        preserve: bool,
        lines: LineRange,
    },
    OnErrorResumeNext {
        lines: LineRange,
    },
    OnErrorGoto0 {
        lines: LineRange,
    },
    CommentStatement {
        text: Symbol,
        lines: LineRange,
    },
    ExitStatement {
        kind: ExitKind,
        lines: LineRange,
    },
    ClassBlock(ClassBlock),
    WithBlock {
        target: Expression,
        body: Vec<Block>,
        lines: LineRange,
    },
}

impl Block {
    pub fn lines(&self) -> LineRange {
        match self {
            Block::Statement { lines, .. }
            | Block::ValueSettingStatement { lines, .. }
            | Block::IfBlock { lines, .. }
            | Block::ForBlock { lines, .. }
            | Block::ForEachBlock { lines, .. }
            | Block::DoBlock { lines, .. }
            | Block::WhileBlock { lines, .. }
            | Block::SelectBlock { lines, .. }
            | Block::DimStatement { lines, .. }
            | Block::ReDimStatement { lines, .. }
            | Block::OnErrorResumeNext { lines }
            | Block::OnErrorGoto0 { lines }
            | Block::CommentStatement { lines, .. }
            | Block::ExitStatement { lines, .. }
            | Block::WithBlock { lines, .. } => *lines,
            Block::SubBlock(b) => b.lines,
            Block::FunctionBlock(b) => b.lines,
            Block::PropertyBlock(b) => b.lines,
            Block::ClassBlock(b) => b.lines,
        }
    }
}

/// One segment of an [`Expression`]. Segments are produced by Stage 2 and
/// are never a conventional binary tree: a well-formed expression has one
/// segment (an atom), two (a leading unary operation), or three (a binary
/// operation), with deeper nesting pushed into [`Segment::Bracketed`].
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    NumericValue(NumericValue),
    StringValue(Symbol),
    BuiltinValue(sltc_lex::BuiltInValue),
    /// A dotted member-access chain (one or more names) plus call
    /// arguments. `brackets_present` distinguishes `Foo` from `Foo()` when
    /// `args` is empty — they translate differently.
    Call {
        path: Vec<Symbol>,
        args: Vec<Expression>,
        brackets_present: bool,
    },
    Bracketed(Box<Expression>),
    Operation(Op),
}

/// An ordered sequence of [`Segment`]s. See the invariants on [`Segment`]
/// for the only well-formed shapes: one, two (unary), or three (binary)
/// segments.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Expression {
    pub segments: Vec<Segment>,
}

impl Expression {
    pub fn atom(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    pub fn unary(op: OperatorSymbol, operand: Expression) -> Self {
        Self {
            segments: vec![
                Segment::Operation(Op::Symbol(op)),
                Segment::Bracketed(Box::new(operand)),
            ],
        }
    }

    pub fn binary(left: Expression, op: Op, right: Expression) -> Self {
        Self {
            segments: vec![
                Segment::Bracketed(Box::new(left)),
                Segment::Operation(op),
                Segment::Bracketed(Box::new(right)),
            ],
        }
    }

    /// Number of non-bracket "real" segments; used by well-formedness checks
    /// and by callers that need to know whether an expression is a bare
    /// atom without unwrapping it.
    pub fn is_atom(&self) -> bool {
        self.segments.len() == 1 && !matches!(self.segments[0], Segment::Operation(_))
    }
}
