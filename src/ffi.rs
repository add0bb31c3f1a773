use crate::example::ExampleClass;
use crate::parsing;
use crate::scanner;
use crate::structs::ScanResult;
use crate::utils;

use libc::{c_char, c_int, c_void};
use serde::Serialize;
use std::ffi::{CStr, CString};
use std::path::Path;

/// Borrows a C string argument. Null, empty and non-UTF-8 strings yield `None`.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().filter(|s| !s.is_empty())
}

fn into_c_string(json: String) -> *mut c_char {
    CString::new(json).map_or(std::ptr::null_mut(), |s| s.into_raw())
}

fn to_c_json<T: Serialize>(value: &T) -> *mut c_char {
    let json = serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("Failed to serialize result to JSON: {}", e) })
            .to_string()
    });
    into_c_string(json)
}

fn error_json(message: String) -> *mut c_char {
    into_c_string(serde_json::json!({ "error": message }).to_string())
}

fn scan_error(message: &str, debug: bool) -> *mut c_char {
    to_c_json(&ScanResult::empty(debug.then(|| vec![message.to_string()])))
}

/// # Safety
///
/// This function is unsafe because it dereferences raw pointers passed from C.
/// `root_path_c` and `extensions_c` must each be null or a valid, null-terminated
/// string that stays alive for the duration of this call. `extensions_c` is a
/// comma separated list such as `"cpp,hpp"`.
/// The returned `*mut c_char` must be deallocated by the C caller using `free_string`.
#[no_mangle]
pub unsafe extern "C" fn scan_and_extract(
    root_path_c: *const c_char,
    extensions_c: *const c_char,
    timeout_milliseconds: u32,
    debug_c: bool,
) -> *mut c_char {
    if timeout_milliseconds == 0 {
        let result = ScanResult {
            timed_out_internally: true,
            ..ScanResult::empty(debug_c.then(|| vec!["Error: timeout_milliseconds cannot be 0.".to_string()]))
        };
        return to_c_json(&result);
    }

    let Some(root_path) = str_arg(root_path_c) else {
        return scan_error("Error: root_path_c is null, empty, or invalid UTF-8.", debug_c);
    };
    let extensions = str_arg(extensions_c)
        .map(utils::split_extensions)
        .unwrap_or_default();
    if extensions.is_empty() {
        return scan_error(
            "Error: extensions_c is null, empty, or resulted in no valid extensions.",
            debug_c,
        );
    }

    let result = scanner::perform_scan(root_path, extensions, timeout_milliseconds, debug_c);
    to_c_json(&result)
}

/// # Safety
///
/// This function is unsafe because it dereferences a raw pointer passed from C.
/// `path_c` must be null or a valid, null-terminated string that stays alive for
/// the duration of this call.
/// The returned `*mut c_char` must be deallocated by the C caller using `free_string`.
#[no_mangle]
pub unsafe extern "C" fn extract_file_comments(path_c: *const c_char) -> *mut c_char {
    let Some(path) = str_arg(path_c) else {
        return error_json("Error: path_c is null, empty, or invalid UTF-8.".to_string());
    };
    match parsing::parse_file(Path::new(path)) {
        Ok(documentation) => to_c_json(&documentation),
        Err(e) => error_json(format!("{:#}", e)),
    }
}

/// # Safety
///
/// `s` must be null or a pointer returned by `scan_and_extract` or
/// `extract_file_comments` that has not been freed yet. This function takes
/// ownership of the memory and deallocates it.
#[no_mangle]
pub unsafe extern "C" fn free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Allocates an `ExampleClass` holding `x`. Release it with `example_class_free`.
#[no_mangle]
pub extern "C" fn example_class_new(x: c_int) -> *mut ExampleClass {
    Box::into_raw(Box::new(ExampleClass::new(x)))
}

/// Allocates an `ExampleClass` with the default value.
#[no_mangle]
pub extern "C" fn example_class_new_default() -> *mut ExampleClass {
    Box::into_raw(Box::default())
}

/// # Safety
///
/// `handle` must be null or a pointer returned by `example_class_new` or
/// `example_class_new_default` that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn example_class_free(handle: *mut ExampleClass) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

// The query entry points never dereference their arguments: every answer is a
// constant, so any handle (including null) is accepted.

#[no_mangle]
pub extern "C" fn example_class_returns_true(
    _handle: *const ExampleClass,
    data: *const c_void,
) -> bool {
    ExampleClass::default().returns_true(data)
}

#[no_mangle]
pub extern "C" fn example_class_returns_false(_handle: *const ExampleClass) -> bool {
    ExampleClass::default().returns_false()
}

#[no_mangle]
pub extern "C" fn example_class_returns_the_truth(_handle: *const ExampleClass) -> c_int {
    ExampleClass::default().returns_the_truth()
}
