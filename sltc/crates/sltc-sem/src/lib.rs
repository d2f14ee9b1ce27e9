//! sltc-sem - scope analysis and by-reference argument mapping.
//!
//! This crate sits between the Stage-2 expression parser (`sltc-par`) and
//! the translator (`sltc-gen`). It does not type-check or resolve names to
//! definitions in the usual compiler sense — the source language is
//! dynamically typed, so there is nothing to unify. What it tracks instead
//! is purely structural: which names are declared in the current scope,
//! which of them are the enclosing callable's by-ref parameters, and
//! whether an error trap is active, so the translator can decide how to
//! emit a condition or a call without re-walking the block tree itself.
//!
//! The other half of this crate resolves the aliasing hazard described in
//! [`analysis`]: a by-ref parameter of the enclosing function passed
//! unwrapped into a nested call that also wants it by-ref needs a local
//! alias rather than a captured reference, because translated languages
//! with strict aliasing rules forbid capturing `&mut` bindings in a
//! closure.

mod analysis;
mod scope;

#[cfg(test)]
mod edge_cases;

pub use analysis::{alias_name, compute_byref_mappings, substitute, ByRefMapping, CallableSignature, CallableSignatures};
pub use scope::{ErrorToken, ScopeInfo, ScopeStack};

use sltc_par::Block;

/// Builds the callable signature table and a fresh top-level [`ScopeStack`]
/// for a translation unit. Callers walk `blocks` themselves, pushing and
/// popping scopes as they descend into `Sub`/`Function`/`Property`/`Class`
/// bodies, consulting `signatures` at each call site.
pub fn prepare<'a>(
    blocks: &[Block],
    rewrite: &'a dyn Fn(&str) -> String,
) -> (CallableSignatures, ScopeStack<'a>) {
    let signatures = CallableSignatures::collect(blocks, rewrite);
    let stack = ScopeStack::new(rewrite);
    (signatures, stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sltc_lex::lex;
    use sltc_par::parse_blocks;
    use sltc_util::Handler;

    fn lower(s: &str) -> String {
        s.to_ascii_lowercase()
    }

    #[test]
    fn prepare_collects_signatures_for_whole_unit() {
        let mut handler = Handler::new();
        let tokens = lex("Sub A(ByRef x)\nEnd Sub\nFunction B(ByVal y)\nEnd Function", &mut handler)
            .expect("lex ok");
        let blocks = parse_blocks(tokens, &mut handler).expect("parse ok");

        let (signatures, stack) = prepare(&blocks, &lower);
        assert!(signatures.lookup("a").is_some());
        assert!(signatures.lookup("b").is_some());
        assert!(stack.current().declared_names.is_empty());
    }
}
