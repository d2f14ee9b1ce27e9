//! Host object registry backing `Value::Object` handles.
//!
//! A translated program never touches a host object directly — it only
//! carries an opaque [`ObjectId`] around inside a [`crate::Value::Object`].
//! Dereferencing, calling a member, or disposing of one always goes through
//! the table here, which is exactly how [`crate::support::Support`] (the
//! per-request façade) keeps object lifetime and disposal order in one
//! place instead of scattered across call sites.

use crate::error::{Result, RuntimeError};
use crate::value::Value;
use std::collections::HashMap;

pub type ObjectId = u64;

/// A value-level stand-in for a CLASS instance or host-supplied object.
///
/// Real TL objects are opaque to this crate — it never needs to know what
/// a `Widget` or a `FileSystemObject` actually is, only how to route a
/// default-value read, a member call, a member set, and an end-of-request
/// cleanup to it.
pub trait HostObject: std::fmt::Debug {
    /// The SL-visible class name, used by `TYPENAME` when no chain-walking
    /// is available.
    fn class_name(&self) -> &str;

    /// VAL's default-member read (e.g. a SL default property getter).
    /// Most host objects have no default member, hence `TypeMismatch`.
    fn default_value(&self) -> Result<Value> {
        Err(RuntimeError::TypeMismatch)
    }

    fn call(&mut self, member: Option<&str>, args: &[Value]) -> Result<Value>;

    fn set(&mut self, member: Option<&str>, args: &[Value], value: Value) -> Result<()>;

    /// Deterministic cleanup run at end-of-request, in reverse registration
    /// order. A failure here is swallowed by the caller — it must not stop
    /// the rest of the disposal sweep.
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct ObjectTable {
    objects: HashMap<ObjectId, Box<dyn HostObject>>,
    next_id: ObjectId,
    disposal_order: Vec<ObjectId>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly constructed host object and returns the handle
    /// a `Value::Object` should carry. Registration for disposal happens
    /// immediately — before any by-ref write-back the caller still has to
    /// perform with the returned value, per the construct-then-register-
    /// then-write-back ordering decided for `NEW` (see DESIGN.md).
    pub fn register(&mut self, object: Box<dyn HostObject>) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(id, object);
        self.disposal_order.push(id);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&dyn HostObject> {
        self.objects.get(&id).map(|b| b.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn HostObject> {
        self.objects.get_mut(&id).map(|b| b.as_mut())
    }

    pub fn is_registered(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Runs `cleanup` on every still-registered object in reverse
    /// registration order, removing each as it's disposed, and returns the
    /// cleanup failures that were swallowed (for test observability — the
    /// façade itself never propagates them).
    pub fn dispose_all(&mut self) -> Vec<RuntimeError> {
        let mut swallowed = Vec::new();
        for id in self.disposal_order.drain(..).rev() {
            if let Some(mut object) = self.objects.remove(&id) {
                if let Err(e) = object.cleanup() {
                    swallowed.push(e);
                }
            }
        }
        swallowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Recorder {
        name: String,
        log: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl HostObject for Recorder {
        fn class_name(&self) -> &str {
            &self.name
        }

        fn call(&mut self, _member: Option<&str>, _args: &[Value]) -> Result<Value> {
            Ok(Value::Empty)
        }

        fn set(&mut self, _member: Option<&str>, _args: &[Value], _value: Value) -> Result<()> {
            Ok(())
        }

        fn cleanup(&mut self) -> Result<()> {
            self.log.borrow_mut().push(self.name.clone());
            Ok(())
        }
    }

    #[test]
    fn dispose_all_runs_in_reverse_registration_order() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut table = ObjectTable::new();
        table.register(Box::new(Recorder {
            name: "first".into(),
            log: log.clone(),
        }));
        table.register(Box::new(Recorder {
            name: "second".into(),
            log: log.clone(),
        }));
        table.dispose_all();
        assert_eq!(*log.borrow(), vec!["second".to_string(), "first".to_string()]);
    }

    #[test]
    fn disposed_objects_are_no_longer_registered() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut table = ObjectTable::new();
        let id = table.register(Box::new(Recorder {
            name: "only".into(),
            log,
        }));
        table.dispose_all();
        assert!(!table.is_registered(id));
    }
}
