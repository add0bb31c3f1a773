// Module for result and report data structures
pub mod structs;

// Module for utility functions
pub mod utils;

// Module for grammar selection and comment marker tables
pub mod config;

// Module for flattening syntax trees into token streams
pub mod tokens;

// Module for grouping comments into documentation blocks
pub mod comments;

// Module for finding documentable elements and attaching their comments
pub mod elements;

// Module for per-file extraction
pub mod parsing;

// Module for directory scanning
pub mod scanner;

// Module for the ExampleClass value type
pub mod example;

// Module for FFI functions
mod ffi;
pub use ffi::*; // Re-export all FFI functions

pub use example::ExampleClass;
pub use parsing::{extract_files, parse_file, parse_source};
pub use scanner::perform_scan;
pub use structs::{Access, CommentBlock, Element, ElementKind, FileDocumentation, Location, ScanResult};
