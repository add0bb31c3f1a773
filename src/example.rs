//! `ExampleClass`: the value type whose C++ counterpart in
//! `test_data/example.cpp` shows each documentation comment style.

use libc::c_void;

/// Value stored when no argument is given at construction.
pub const DEFAULT_X: i32 = 42;

/// The answer returned by [`ExampleClass::returns_the_truth`].
pub const THE_TRUTH: i32 = 42;

/// A value with a single, immutable state.
///
/// Every query is a constant. No query reads the stored `x`, so instances are
/// `Send + Sync` and can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExampleClass {
    #[allow(dead_code)] // kept for the object's lifetime, never read
    x: i32,
}

impl Default for ExampleClass {
    fn default() -> Self {
        ExampleClass::new(DEFAULT_X)
    }
}

impl ExampleClass {
    /// Constructs an instance. Accepts any `x` without validation.
    pub const fn new(x: i32) -> Self {
        ExampleClass { x }
    }

    /// Always `true`. `data` is opaque: it may be null and is never dereferenced.
    pub fn returns_true(&self, _data: *const c_void) -> bool {
        true
    }

    /// Always `false`.
    pub fn returns_false(&self) -> bool {
        false
    }

    /// Always [`THE_TRUTH`], whatever the instance was constructed with.
    pub fn returns_the_truth(&self) -> i32 {
        THE_TRUTH
    }
}
