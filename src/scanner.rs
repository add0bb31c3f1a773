use crate::config::MAX_FILE_SIZE_BYTES;
use crate::parsing;
use crate::structs::{FileDocumentation, ScanResult};
use crate::utils;

use ignore::{WalkBuilder, WalkState};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

type DebugLog = Arc<Mutex<Option<Vec<String>>>>;

fn push_log(log: &DebugLog, message: String) {
    if let Some(lines) = &mut *log.lock().unwrap_or_else(PoisonError::into_inner) {
        lines.push(message);
    }
}

/// Extracts documentation from every matching file under `root_path_str`.
///
/// The walk runs in parallel and honours `.gitignore`. Files whose extension is
/// not in `extensions` or that exceed `MAX_FILE_SIZE_BYTES` are skipped. A
/// `timeout_milliseconds` of 0 disables the internal timeout.
///
/// Documents come back sorted by path. Files with nothing to report are left out.
pub fn perform_scan(
    root_path_str: &str,
    extensions: Vec<String>,
    timeout_milliseconds: u32,
    debug: bool,
) -> ScanResult {
    let start_time = Instant::now();
    let mut debug_log: Option<Vec<String>> = if debug { Some(Vec::new()) } else { None };

    if let Some(log) = &mut debug_log {
        log.push(format!("[Scanner] Scanning root path: {}", root_path_str));
        log.push(format!("[Scanner] Extensions: {:?}", extensions));
        log.push(format!("[Scanner] Timeout (ms): {}", timeout_milliseconds));
    }

    let root_path = Path::new(root_path_str);
    if !root_path.is_dir() {
        let reason = if root_path.exists() {
            "is not a directory"
        } else {
            "does not exist"
        };
        warn!(root = root_path_str, "scan root {}", reason);
        if let Some(log) = &mut debug_log {
            log.push(format!(
                "[Scanner] Error: Root path {}: {}",
                reason, root_path_str
            ));
        }
        return ScanResult::empty(debug_log);
    }

    let walker = WalkBuilder::new(root_path)
        .git_ignore(true)
        .git_global(true)
        // Honour `.gitignore` files even outside a git checkout.
        .require_git(false)
        .build_parallel();

    let documents = Arc::new(Mutex::new(Vec::<FileDocumentation>::new()));
    let debug_log: DebugLog = Arc::new(Mutex::new(debug_log));
    let timed_out = Arc::new(AtomicBool::new(false));
    let files_processed = Arc::new(AtomicUsize::new(0));
    let extensions = Arc::new(extensions);

    walker.run(|| {
        let documents = Arc::clone(&documents);
        let debug_log = Arc::clone(&debug_log);
        let timed_out = Arc::clone(&timed_out);
        let files_processed = Arc::clone(&files_processed);
        let extensions = Arc::clone(&extensions);

        Box::new(move |entry_result| {
            if timed_out.load(Ordering::Relaxed) {
                return WalkState::Quit;
            }
            if timeout_milliseconds > 0
                && start_time.elapsed().as_millis() > u128::from(timeout_milliseconds)
            {
                // Only the first thread to notice reports it.
                if !timed_out.swap(true, Ordering::Relaxed) {
                    let processed = files_processed.load(Ordering::Relaxed);
                    warn!(timeout_ms = timeout_milliseconds, processed, "scan timed out");
                    push_log(
                        &debug_log,
                        format!(
                            "[Scanner] Timeout of {}ms reached. Processed approx. {} files before stopping.",
                            timeout_milliseconds, processed
                        ),
                    );
                }
                return WalkState::Quit;
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    push_log(&debug_log, format!("[Scanner] Error walking directory entry: {}", err));
                    return WalkState::Continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return WalkState::Continue;
            }

            let path = entry.path();
            if !utils::has_extension(path, &extensions) {
                return WalkState::Continue;
            }
            if entry.metadata().map_or(true, |m| m.len() > MAX_FILE_SIZE_BYTES) {
                push_log(&debug_log, format!("[Scanner] Skipping (large file >1MB): {:?}", path));
                return WalkState::Continue;
            }

            let count = files_processed.fetch_add(1, Ordering::Relaxed) + 1;
            push_log(&debug_log, format!("[Scanner] ({}) Processing: {:?}", count, path));

            match parsing::parse_file(path) {
                Ok(doc) if doc.is_empty() => {
                    debug!(path = %path.display(), "nothing documentable");
                }
                Ok(doc) => {
                    debug!(path = %path.display(), elements = doc.elements.len(), "extracted");
                    documents
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(doc);
                }
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping file");
                    push_log(&debug_log, format!("[Scanner] Skipping {:?}: {:#}", path, err));
                }
            }
            WalkState::Continue
        })
    });

    let mut documents = std::mem::take(&mut *documents.lock().unwrap_or_else(PoisonError::into_inner));
    documents.sort_by(|a, b| a.path.cmp(&b.path));
    let debug_log = debug_log
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    let files_processed = files_processed.load(Ordering::Relaxed);

    info!(
        files = files_processed,
        documents = documents.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "scan finished"
    );

    ScanResult {
        documents,
        debug_log,
        timed_out_internally: timed_out.load(Ordering::Relaxed),
        files_processed_before_timeout: files_processed,
    }
}
