//! Scope analysis: a stack of frames describing what is visible and active
//! at each point while walking a block tree, mirroring the structure a
//! translator walks statement-by-statement.

use sltc_util::{FxHashSet, Symbol};

/// An opaque error-trapping token identifier. `None` means no trap is
/// active at this point.
pub type ErrorToken = u32;

/// Everything the translator needs to know about its current position:
/// the enclosing class/callable (if any), the set of names declared in the
/// current scope, the active error-trap token (if any), and the enclosing
/// callable's by-ref parameter names.
#[derive(Clone, Debug, Default)]
pub struct ScopeInfo {
    pub enclosing_class: Option<Symbol>,
    pub enclosing_callable: Option<Symbol>,
    pub declared_names: FxHashSet<String>,
    pub error_token: Option<ErrorToken>,
    pub byref_params: FxHashSet<String>,
}

impl ScopeInfo {
    /// True if `name`, compared under `rewrite`'s case-folded identity, has
    /// been declared in the current scope.
    pub fn is_declared(&self, name: Symbol, rewrite: &dyn Fn(&str) -> String) -> bool {
        self.declared_names.contains(&rewrite(name.as_str()))
    }

    /// True if `name` is one of the enclosing callable's by-ref parameters.
    pub fn is_byref_param(&self, name: Symbol, rewrite: &dyn Fn(&str) -> String) -> bool {
        self.byref_params.contains(&rewrite(name.as_str()))
    }
}

/// A stack of [`ScopeInfo`] frames, one per enclosing block the walker has
/// descended into. Pushing/popping mirrors entering/leaving a `Sub`,
/// `Function`, `Property`, `Class`, `With`, or loop/conditional body.
pub struct ScopeStack<'a> {
    frames: Vec<ScopeInfo>,
    rewrite: &'a dyn Fn(&str) -> String,
}

impl<'a> ScopeStack<'a> {
    pub fn new(rewrite: &'a dyn Fn(&str) -> String) -> Self {
        Self {
            frames: vec![ScopeInfo::default()],
            rewrite,
        }
    }

    pub fn current(&self) -> &ScopeInfo {
        self.frames.last().expect("scope stack is never empty")
    }

    fn current_mut(&mut self) -> &mut ScopeInfo {
        self.frames.last_mut().expect("scope stack is never empty")
    }

    /// Enters a nested scope, inheriting the enclosing class/callable and
    /// error-trap token from the current frame but starting with an empty
    /// declared-name set (SL scoping is per-procedure, not per-block, but
    /// nested `With`/loop bodies never introduce new declarations that
    /// shadow an outer one, so inheriting the parent's names keeps lookups
    /// correct without re-declaring them).
    pub fn push_inherited(&mut self) {
        let parent = self.current().clone();
        self.frames.push(parent);
    }

    /// Enters a new callable's scope: resets declared names and by-ref
    /// parameters, clears any error-trap token (each procedure starts
    /// without an active trap), and records the enclosing callable name.
    pub fn push_callable(&mut self, name: Symbol, byref_params: FxHashSet<String>) {
        let enclosing_class = self.current().enclosing_class;
        self.frames.push(ScopeInfo {
            enclosing_class,
            enclosing_callable: Some(name),
            declared_names: FxHashSet::default(),
            error_token: None,
            byref_params,
        });
    }

    /// Enters a new class's scope: resets everything class-local, records
    /// the class name.
    pub fn push_class(&mut self, name: Symbol) {
        self.frames.push(ScopeInfo {
            enclosing_class: Some(name),
            enclosing_callable: None,
            declared_names: FxHashSet::default(),
            error_token: None,
            byref_params: FxHashSet::default(),
        });
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn declare(&mut self, name: Symbol) {
        let key = (self.rewrite)(name.as_str());
        self.current_mut().declared_names.insert(key);
    }

    pub fn set_error_token(&mut self, token: Option<ErrorToken>) {
        self.current_mut().error_token = token;
    }

    pub fn rewrite(&self, name: Symbol) -> String {
        (self.rewrite)(name.as_str())
    }
}
