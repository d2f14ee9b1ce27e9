//! sltc-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This module provides fundamental utilities and types that form the foundation
//! of the entire sltc translator infrastructure. These utilities are designed to be
//! zero-cost abstractions that improve code clarity, type safety, and performance
//! without runtime overhead.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. ZERO-COST ABSTRACTIONS
//!    All utilities compile down to efficient code with no runtime penalty
//!    compared to hand-written implementations.
//!
//! 2. TYPE SAFETY
//!    Leverage Rust's type system to prevent bugs at compile time.
//!    Examples: Typed indices prevent mixing up different ID spaces.
//
// 3. PERFORMANCE
//    Optimize for the common case while maintaining correctness.
//    Examples: Efficient string interning, lock-free data structures.
//
// 4. ERGONOMICS
//    APIs should be intuitive and easy to use correctly.
//    Examples: Builder patterns, type inference-friendly interfaces.
//
// ============================================================================
// STRING INTERNING (SYMBOL)
// ============================================================================
//
// THEORY OF STRING INTERNING:
// ---------------------------
//
// String interning is a technique for storing only one copy of each distinct
// string value, which must be immutable. All occurrences of the same string
// point to the same memory location, enabling fast equality comparisons and
// reducing memory usage.
//
// Source identifiers in the translated language are case-insensitive: `Foo`,
// `FOO` and `foo` name the same variable. The symbol table interns under a
// normalized key (produced by a host-supplied name rewriter) while retaining
// the original casing for the text that gets emitted, so identifier identity
// and identifier spelling never have to be reconciled by hand at every call
// site.
//
// MATHEMATICAL BASIS:
// -------------------
// Let S be the set of all strings in a program.
// Let I: S → ℕ be the interning function that maps each string to a unique ID.
//
// Properties:
// - ∀s₁, s₂ ∈ S: I(s₁) = I(s₂) ⟺ s₁ = s₂  (injective mapping)
// - |Range(I)| ≤ |S|  (compression through deduplication)
//
// TIME COMPLEXITY:
// ----------------
// Without interning:
// - Comparison: O(n) where n is string length
// - Hash computation: O(n)
// - Memory: O(total length of all strings)
//
// With interning:
// - Comparison: O(1) (integer comparison)
// - Hash computation: O(1) (precomputed)
// - Memory: O(unique strings × avg length) + O(|S| × sizeof(ID))
//
// THREAD-SAFE IMPLEMENTATION:
// ---------------------------
// The global string table is a lock-free hash table (DashMap) backed by a
// bump allocator, so interning never blocks across threads and interned
// strings live for the remainder of the process.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{
    Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level, SourceSnippet,
};
pub use error::{DiagnosticError, IndexVecError, SourceMapError, SymbolError};
pub use index_vec::{define_idx, Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
