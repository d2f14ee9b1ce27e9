//! Runtime operator support façade.
//!
//! Translated output never inlines comparison, arithmetic, or coercion
//! logic — it calls out to a `support` object (`support.ADD(...)`,
//! `support.EQ(...)`, `support.CALL(...)`, ...) whose contract is defined
//! here. This crate is a genuine, directly unit-testable reference
//! implementation of that contract, not just a trait declaration: the
//! target language's own compiler and runtime are out of scope, but the
//! operator semantics it must reproduce are tested exactly as described
//! here.

mod error;
mod object;
mod ops;
mod support;
mod value;

pub use error::{Result, RuntimeError};
pub use object::{HostObject, ObjectId, ObjectTable};
pub use ops::StringCompareMode;
pub use support::{ErrorAction, ErrorToken, Support};
pub use value::{
    builtin_type_name, cbool, cbyte, ccur, cdate, cdbl, cint, clng, cstr, csng, is_numeric, Value,
};
