//! By-reference argument mapping: identifies expressions that pass a
//! caller's own by-ref parameter into a callee that also wants it by-ref,
//! and computes the Open/Evaluate/Close alias rewrite described for such
//! call sites.

use crate::scope::ScopeInfo;
use sltc_par::{Block, Expression, Param, PassingMode, Segment};
use sltc_util::{FxHashMap, Symbol};

/// Which parameter positions of a callable are by-ref.
#[derive(Clone, Debug, Default)]
pub struct CallableSignature {
    pub byref_positions: Vec<bool>,
}

impl CallableSignature {
    fn from_params(params: &[Param]) -> Self {
        Self {
            byref_positions: params
                .iter()
                .map(|p| matches!(p.mode, PassingMode::ByRef))
                .collect(),
        }
    }

    pub fn is_byref(&self, position: usize) -> bool {
        self.byref_positions.get(position).copied().unwrap_or(false)
    }
}

/// A name table of every `Sub`/`Function`/`Property` signature visible in a
/// translation unit, keyed by the host's case-folded identity.
#[derive(Default)]
pub struct CallableSignatures {
    table: FxHashMap<String, CallableSignature>,
}

impl CallableSignatures {
    pub fn collect(blocks: &[Block], rewrite: &dyn Fn(&str) -> String) -> Self {
        let mut table = FxHashMap::default();
        collect_into(blocks, rewrite, &mut table);
        Self { table }
    }

    pub fn lookup(&self, name: &str) -> Option<&CallableSignature> {
        self.table.get(name)
    }

    /// Registers a signature under an already-rewritten key, overwriting any
    /// prior entry. Used to seed host-provided callables ahead of a
    /// translation unit's own `Sub`/`Function`/`Property` blocks.
    pub fn insert(&mut self, rewritten_name: impl Into<String>, signature: CallableSignature) {
        self.table.insert(rewritten_name.into(), signature);
    }
}

fn collect_into(
    blocks: &[Block],
    rewrite: &dyn Fn(&str) -> String,
    table: &mut FxHashMap<String, CallableSignature>,
) {
    for block in blocks {
        match block {
            Block::SubBlock(sub) => {
                table.insert(rewrite(sub.name.as_str()), CallableSignature::from_params(&sub.params));
            }
            Block::FunctionBlock(func) => {
                table.insert(
                    rewrite(func.name.as_str()),
                    CallableSignature::from_params(&func.params),
                );
            }
            Block::PropertyBlock(prop) => {
                table.insert(
                    rewrite(prop.name.as_str()),
                    CallableSignature::from_params(&prop.params),
                );
            }
            Block::ClassBlock(class) => collect_into(&class.members, rewrite, table),
            _ => {}
        }
    }
}

/// A single `{from -> to}` alias rewrite: `to` is a fresh local that
/// shadows `from` for the duration of one expression's evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByRefMapping {
    pub from: Symbol,
    pub to: Symbol,
}

/// Deterministic alias name for a by-ref parameter, stable within one
/// expression so repeated occurrences reuse the same temporary.
pub fn alias_name(from: Symbol) -> Symbol {
    Symbol::intern(&format!("__byref_{}", from.as_str()))
}

/// Walks `expr`, recording one [`ByRefMapping`] per distinct by-ref
/// parameter name of the enclosing scope that is passed, unwrapped by any
/// bracket, into a call-segment whose resolved callee wants that
/// position by-ref too.
pub fn compute_byref_mappings(
    expr: &Expression,
    scope: &ScopeInfo,
    signatures: &CallableSignatures,
    rewrite: &dyn Fn(&str) -> String,
) -> Vec<ByRefMapping> {
    let mut found = Vec::new();
    walk_expr(expr, scope, signatures, rewrite, &mut found);
    found
}

fn walk_expr(
    expr: &Expression,
    scope: &ScopeInfo,
    signatures: &CallableSignatures,
    rewrite: &dyn Fn(&str) -> String,
    out: &mut Vec<ByRefMapping>,
) {
    for segment in &expr.segments {
        walk_segment(segment, scope, signatures, rewrite, out);
    }
}

fn walk_segment(
    segment: &Segment,
    scope: &ScopeInfo,
    signatures: &CallableSignatures,
    rewrite: &dyn Fn(&str) -> String,
    out: &mut Vec<ByRefMapping>,
) {
    match segment {
        Segment::Call { path, args, .. } => {
            let signature = path
                .last()
                .and_then(|name| signatures.lookup(&rewrite(name.as_str())));

            for (position, arg) in args.iter().enumerate() {
                let wants_byref = signature.map(|sig| sig.is_byref(position)).unwrap_or(false);
                if wants_byref {
                    if let Some(name) = bare_byref_name(arg, scope, rewrite) {
                        let mapping = ByRefMapping {
                            from: name,
                            to: alias_name(name),
                        };
                        if !out.contains(&mapping) {
                            out.push(mapping);
                        }
                    }
                }
                walk_expr(arg, scope, signatures, rewrite, out);
            }
        }
        Segment::Bracketed(inner) => walk_expr(inner, scope, signatures, rewrite, out),
        Segment::Operation(_) | Segment::NumericValue(_) | Segment::StringValue(_) | Segment::BuiltinValue(_) => {}
    }
}

/// An expression counts as a bare by-ref-eligible name only when it is a
/// single `Call` segment with no arguments and no explicit call
/// parentheses — `f(x)` passes `x` by-ref, `f((x))` forces by-value.
fn bare_byref_name(
    expr: &Expression,
    scope: &ScopeInfo,
    rewrite: &dyn Fn(&str) -> String,
) -> Option<Symbol> {
    if expr.segments.len() != 1 {
        return None;
    }
    match &expr.segments[0] {
        Segment::Call {
            path,
            args,
            brackets_present: false,
        } if args.is_empty() && path.len() == 1 => {
            let name = path[0];
            if scope.is_byref_param(name, rewrite) {
                Some(name)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Produces `E'`: a copy of `expr` in which every bare occurrence of a
/// mapped `from` name is replaced by its `to` alias.
pub fn substitute(expr: &Expression, mappings: &[ByRefMapping]) -> Expression {
    Expression {
        segments: expr
            .segments
            .iter()
            .map(|segment| substitute_segment(segment, mappings))
            .collect(),
    }
}

fn substitute_segment(segment: &Segment, mappings: &[ByRefMapping]) -> Segment {
    match segment {
        Segment::Call {
            path,
            args,
            brackets_present,
        } => {
            let new_path = if path.len() == 1 && args.is_empty() && !*brackets_present {
                let renamed = mappings
                    .iter()
                    .find(|m| m.from == path[0])
                    .map(|m| m.to)
                    .unwrap_or(path[0]);
                vec![renamed]
            } else {
                path.clone()
            };
            Segment::Call {
                path: new_path,
                args: args.iter().map(|a| substitute(a, mappings)).collect(),
                brackets_present: *brackets_present,
            }
        }
        Segment::Bracketed(inner) => Segment::Bracketed(Box::new(substitute(inner, mappings))),
        other => other.clone(),
    }
}
