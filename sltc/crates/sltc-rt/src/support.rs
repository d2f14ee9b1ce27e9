//! `Support`: the per-request runtime façade a translated unit calls
//! through (`support.ADD(...)`, `support.CALL(...)`, `support.IF(...)`, ...).
//!
//! One instance backs exactly one translated request. It is deliberately
//! **not** `Sync`/shared — the trapped-error slot, the active-error-token
//! table, and the disposables registry all assume single-threaded,
//! synchronous access, matching how the translated code itself runs.

use crate::error::{Result, RuntimeError};
use crate::object::{HostObject, ObjectId, ObjectTable};
use crate::ops::{self, StringCompareMode};
use crate::value::Value;
use std::collections::HashMap;

pub type ErrorToken = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorAction {
    ResumeNext,
    Goto0,
}

#[derive(Default)]
struct ErrorTrapState {
    next_token: ErrorToken,
    actions: HashMap<ErrorToken, ErrorAction>,
    trapped: Option<String>,
}

/// Configuration the façade is constructed with — the one piece the host
/// application supplies per deployment, not per request.
pub struct Support {
    support_class_name: String,
    name_rewriter: Box<dyn Fn(&str) -> String>,
    string_compare_mode: StringCompareMode,
    pub(crate) objects: ObjectTable,
    error_trap: ErrorTrapState,
}

impl std::fmt::Debug for Support {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Support")
            .field("support_class_name", &self.support_class_name)
            .field("string_compare_mode", &self.string_compare_mode)
            .finish()
    }
}

impl Support {
    pub fn new(support_class_name: impl Into<String>, name_rewriter: impl Fn(&str) -> String + 'static) -> Self {
        Self {
            support_class_name: support_class_name.into(),
            name_rewriter: Box::new(name_rewriter),
            string_compare_mode: StringCompareMode::Binary,
            objects: ObjectTable::new(),
            error_trap: ErrorTrapState::default(),
        }
    }

    pub fn with_string_compare_mode(mut self, mode: StringCompareMode) -> Self {
        self.string_compare_mode = mode;
        self
    }

    pub fn support_class_name(&self) -> &str {
        &self.support_class_name
    }

    pub fn rewrite(&self, name: &str) -> String {
        (self.name_rewriter)(name)
    }

    // -- VAL / reads -----------------------------------------------------

    /// `VAL`: reads a host object down to its default-member primitive.
    /// Any non-object value is already a primitive and passes through
    /// unchanged.
    pub fn val(&self, v: &Value) -> Result<Value> {
        match v {
            Value::Object(id) => self
                .objects
                .get(*id)
                .ok_or(RuntimeError::ObjectRequired)?
                .default_value(),
            other => Ok(other.clone()),
        }
    }

    // -- arithmetic / comparison / logical --------------------------------

    pub fn add(&self, a: &Value, b: &Value) -> Result<Value> {
        tracing::trace!(?a, ?b, "support.ADD");
        ops::add(&self.val(a)?, &self.val(b)?)
    }
    pub fn subt(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::subt(&self.val(a)?, &self.val(b)?)
    }
    pub fn mult(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::mult(&self.val(a)?, &self.val(b)?)
    }
    pub fn div(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::div(&self.val(a)?, &self.val(b)?)
    }
    pub fn int_div(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::int_div(&self.val(a)?, &self.val(b)?)
    }
    pub fn modulo(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::modulo(&self.val(a)?, &self.val(b)?)
    }
    pub fn pow(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::pow(&self.val(a)?, &self.val(b)?)
    }
    pub fn concat(&self, a: &Value, b: &Value) -> Result<Value> {
        Ok(ops::concat(&self.val(a)?, &self.val(b)?))
    }
    pub fn eq(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::eq(&self.val(a)?, &self.val(b)?)
    }
    pub fn not_eq(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::not_eq(&self.val(a)?, &self.val(b)?)
    }
    pub fn lt(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::lt(&self.val(a)?, &self.val(b)?, self.string_compare_mode)
    }
    pub fn lte(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::lte(&self.val(a)?, &self.val(b)?, self.string_compare_mode)
    }
    pub fn gt(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::gt(&self.val(a)?, &self.val(b)?, self.string_compare_mode)
    }
    pub fn gte(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::gte(&self.val(a)?, &self.val(b)?, self.string_compare_mode)
    }
    pub fn and(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::and(&self.val(a)?, &self.val(b)?)
    }
    pub fn or(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::or(&self.val(a)?, &self.val(b)?)
    }
    pub fn xor(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::xor(&self.val(a)?, &self.val(b)?)
    }
    pub fn eqv(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::eqv(&self.val(a)?, &self.val(b)?)
    }
    pub fn imp(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::imp(&self.val(a)?, &self.val(b)?)
    }
    pub fn not(&self, a: &Value) -> Result<Value> {
        ops::not(&self.val(a)?)
    }
    pub fn is(&self, a: &Value, b: &Value) -> Result<Value> {
        ops::is(a, b)
    }

    // -- conditionals / calls ---------------------------------------------

    /// `IF(value)`: a bare condition coerces through `CBOOL`; `Null`
    /// reaching a condition is a use-of-Null error, not a silent `false`.
    pub fn if_value(&self, v: &Value) -> Result<bool> {
        match crate::value::cbool(&self.val(v)?)? {
            Value::Bool(b) => Ok(b),
            _ => unreachable!("cbool only ever returns Value::Bool or an error"),
        }
    }

    /// `IF(evaluator, token)`: runs a by-ref-aliasing condition closure
    /// under the given error-trapping token, so a trapped failure inside
    /// the closure still yields a boolean rather than propagating.
    pub fn if_guarded(&mut self, token: ErrorToken, evaluator: impl FnOnce(&Self) -> Result<Value>) -> Result<bool> {
        match evaluator(self) {
            Ok(v) => match crate::value::cbool(&v)? {
                Value::Bool(b) => Ok(b),
                _ => unreachable!(),
            },
            Err(e) => {
                self.handle_error(token, e)?;
                Ok(false)
            }
        }
    }

    /// `CALL(target, members, args)`: a dotted-path or unresolved-name
    /// call, routed to the target object's member dispatch.
    pub fn call(&mut self, target: &Value, members: &[&str], args: &[Value]) -> Result<Value> {
        tracing::debug!(?members, arg_count = args.len(), "support.CALL");
        let id = self.require_object(target)?;
        let member = members.last().copied();
        let object = self
            .objects
            .get_mut(id)
            .ok_or(RuntimeError::ObjectRequired)?;
        object.call(member, args)
    }

    /// `SET(value, target, member, args)`: assigns into a host object's
    /// default or named member.
    pub fn set(&mut self, target: &Value, member: Option<&str>, args: &[Value], value: Value) -> Result<()> {
        let id = self.require_object(target)?;
        let object = self
            .objects
            .get_mut(id)
            .ok_or(RuntimeError::ObjectRequired)?;
        object.set(member, args, value)
    }

    fn require_object(&self, v: &Value) -> Result<ObjectId> {
        match v {
            Value::Object(id) => Ok(*id),
            _ => Err(RuntimeError::ObjectRequired),
        }
    }

    // -- object lifetime ----------------------------------------------------

    /// `NEW`: constructs, registers for end-of-request disposal, and
    /// returns the handle — registration happens before the caller
    /// performs any by-ref write-back with the returned value (see the
    /// Open Question decision in DESIGN.md).
    pub fn new_object(&mut self, object: Box<dyn HostObject>) -> ObjectId {
        self.objects.register(object)
    }

    pub fn new_value(&mut self, object: Box<dyn HostObject>) -> Value {
        Value::Object(self.new_object(object))
    }

    /// Runs every registered object's cleanup in reverse registration
    /// order, swallowing individual failures; called once at the end of
    /// the request.
    pub fn dispose_all(&mut self) -> Vec<RuntimeError> {
        self.objects.dispose_all()
    }

    pub fn new_array(&self, dims: &[usize]) -> Vec<Value> {
        let len = dims.iter().product::<usize>().max(1);
        vec![Value::Empty; len]
    }

    pub fn resize_array(&self, existing: &[Value], dims: &[usize], preserve: bool) -> Vec<Value> {
        let len = dims.iter().product::<usize>().max(1);
        let mut out = vec![Value::Empty; len];
        if preserve {
            for (slot, v) in out.iter_mut().zip(existing.iter()) {
                *slot = v.clone();
            }
        }
        out
    }

    // -- TYPENAME ------------------------------------------------------------

    /// `TYPENAME`: SL-style primitive names, the object's recorded source
    /// class name for an object reference, or `"Nothing"` — never walks an
    /// inheritance chain (see the Open Question decision in DESIGN.md).
    pub fn type_name(&self, v: &Value) -> String {
        match v {
            Value::Object(id) => self
                .objects
                .get(*id)
                .map(|o| o.class_name().to_string())
                .unwrap_or_else(|| "Object".to_string()),
            other => crate::value::builtin_type_name(other).to_string(),
        }
    }

    // -- error trapping --------------------------------------------------

    pub fn get_error_trapping_token(&mut self) -> ErrorToken {
        let token = self.error_trap.next_token;
        self.error_trap.next_token += 1;
        token
    }

    pub fn release_error_trapping_token(&mut self, token: ErrorToken) {
        self.error_trap.actions.remove(&token);
    }

    pub fn start_error_trapping_and_clear_any_error(&mut self, token: ErrorToken, action: ErrorAction) {
        self.error_trap.actions.insert(token, action);
        self.error_trap.trapped = None;
    }

    pub fn stop_error_trapping_and_clear_any_error(&mut self, token: ErrorToken) {
        self.error_trap.actions.remove(&token);
        self.error_trap.trapped = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_trap.trapped = Some(message.into());
    }

    pub fn clear_any_error(&mut self) {
        self.error_trap.trapped = None;
    }

    pub fn has_trapped_error(&self) -> bool {
        self.error_trap.trapped.is_some()
    }

    /// `HANDLEERROR`: records the failure in the trapped-error slot and
    /// reports what the caller's control flow should do next. `ResumeNext`
    /// swallows the error and lets the caller keep going; `Goto0` is
    /// reported back so the caller's own emitted control flow can jump.
    pub fn handle_error(&mut self, token: ErrorToken, error: RuntimeError) -> Result<()> {
        tracing::debug!(token, %error, "support.HANDLEERROR");
        self.error_trap.trapped = Some(error.to_string());
        match self.error_trap.actions.get(&token) {
            Some(ErrorAction::ResumeNext) => Ok(()),
            Some(ErrorAction::Goto0) | None => {
                self.error_trap.actions.remove(&token);
                Err(error)
            }
        }
    }

    // -- string builtins --------------------------------------------------

    pub fn strcomp(&self, a: &str, b: &str) -> i32 {
        match self.string_compare_mode {
            StringCompareMode::Binary => a.cmp(b) as i32,
            StringCompareMode::Text => a.to_lowercase().cmp(&b.to_lowercase()) as i32,
        }
    }

    pub fn len(&self, s: &str) -> usize {
        s.chars().count()
    }

    pub fn mid(&self, s: &str, start: usize, length: Option<usize>) -> String {
        let chars: Vec<char> = s.chars().collect();
        let from = start.saturating_sub(1).min(chars.len());
        let to = match length {
            Some(len) => (from + len).min(chars.len()),
            None => chars.len(),
        };
        chars[from..to].iter().collect()
    }

    pub fn left(&self, s: &str, length: usize) -> String {
        s.chars().take(length).collect()
    }

    pub fn right(&self, s: &str, length: usize) -> String {
        let chars: Vec<char> = s.chars().collect();
        let from = chars.len().saturating_sub(length);
        chars[from..].iter().collect()
    }

    pub fn trim(&self, s: &str) -> String {
        s.trim().to_string()
    }
    pub fn ltrim(&self, s: &str) -> String {
        s.trim_start().to_string()
    }
    pub fn rtrim(&self, s: &str) -> String {
        s.trim_end().to_string()
    }
    pub fn ucase(&self, s: &str) -> String {
        s.to_uppercase()
    }
    pub fn lcase(&self, s: &str) -> String {
        s.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_trapping_token_pool_starts_at_zero_and_increments() {
        let mut rt = Support::new("support", |s| s.to_ascii_lowercase());
        let a = rt.get_error_trapping_token();
        let b = rt.get_error_trapping_token();
        assert_eq!(a, 0);
        assert_eq!(b, 1);
    }

    #[test]
    fn resume_next_swallows_a_handled_error() {
        let mut rt = Support::new("support", |s| s.to_ascii_lowercase());
        let token = rt.get_error_trapping_token();
        rt.start_error_trapping_and_clear_any_error(token, ErrorAction::ResumeNext);
        let outcome = rt.handle_error(token, RuntimeError::DivisionByZero);
        assert!(outcome.is_ok());
        assert!(rt.has_trapped_error());
    }

    #[test]
    fn goto0_without_a_resume_next_trap_propagates() {
        let mut rt = Support::new("support", |s| s.to_ascii_lowercase());
        let token = rt.get_error_trapping_token();
        rt.start_error_trapping_and_clear_any_error(token, ErrorAction::Goto0);
        let outcome = rt.handle_error(token, RuntimeError::Overflow);
        assert_eq!(outcome, Err(RuntimeError::Overflow));
        assert!(!rt.error_trap.actions.contains_key(&token));
    }

    #[test]
    fn stop_error_trapping_clears_the_trapped_slot() {
        let mut rt = Support::new("support", |s| s.to_ascii_lowercase());
        let token = rt.get_error_trapping_token();
        rt.start_error_trapping_and_clear_any_error(token, ErrorAction::ResumeNext);
        rt.handle_error(token, RuntimeError::Overflow).unwrap();
        rt.stop_error_trapping_and_clear_any_error(token);
        assert!(!rt.has_trapped_error());
    }

    #[test]
    fn mid_and_left_and_right_are_one_indexed_and_utf8_safe() {
        let rt = Support::new("support", |s| s.to_ascii_lowercase());
        assert_eq!(rt.mid("hello", 2, Some(3)), "ell");
        assert_eq!(rt.left("hello", 2), "he");
        assert_eq!(rt.right("hello", 2), "lo");
    }

    #[test]
    fn typename_reports_object_class_name_without_walking_inheritance() {
        #[derive(Debug)]
        struct Leaf;
        impl HostObject for Leaf {
            fn class_name(&self) -> &str {
                "Leaf"
            }
            fn call(&mut self, _m: Option<&str>, _a: &[Value]) -> Result<Value> {
                Ok(Value::Empty)
            }
            fn set(&mut self, _m: Option<&str>, _a: &[Value], _v: Value) -> Result<()> {
                Ok(())
            }
        }
        let mut rt = Support::new("support", |s| s.to_ascii_lowercase());
        let v = rt.new_value(Box::new(Leaf));
        assert_eq!(rt.type_name(&v), "Leaf");
        assert_eq!(rt.type_name(&Value::Int16(1)), "Integer");
        assert_eq!(rt.type_name(&Value::Nothing), "Nothing");
    }

    #[test]
    fn new_array_and_resize_array_preserve_on_request() {
        let rt = Support::new("support", |s| s.to_ascii_lowercase());
        let arr = rt.new_array(&[3]);
        assert_eq!(arr.len(), 3);
        let mut existing = arr;
        existing[0] = Value::Int16(9);
        let resized = rt.resize_array(&existing, &[5], true);
        assert_eq!(resized.len(), 5);
        assert_eq!(resized[0], Value::Int16(9));
        let cleared = rt.resize_array(&existing, &[5], false);
        assert_eq!(cleared[0], Value::Empty);
    }
}
