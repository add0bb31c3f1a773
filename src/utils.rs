use std::fs;
use std::path::Path;

/// Checks if a file is likely binary by looking for null bytes.
pub fn is_binary(path: &Path) -> bool {
    fs::read(path)
        .map(|bytes| bytes.iter().any(|&b| b == 0))
        .unwrap_or(true) // Unreadable files are treated as binary.
}

/// Splits a comma separated extension list, dropping blanks and leading dots.
pub fn split_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().trim_start_matches('.'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns true if `path` has one of `extensions`, compared case-insensitively.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_extension_lists() {
        assert_eq!(split_extensions("cpp, .hpp,,h "), vec!["cpp", "hpp", "h"]);
        assert!(split_extensions(" , ").is_empty());
    }

    #[test]
    fn matches_extensions() {
        let exts = vec!["cpp".to_string(), ".h".to_string()];
        assert!(has_extension(Path::new("a/b.cpp"), &exts));
        assert!(has_extension(Path::new("a/b.H"), &exts));
        assert!(!has_extension(Path::new("a/b.hpp"), &exts));
        assert!(!has_extension(Path::new("Makefile"), &exts));
    }

    #[test]
    fn missing_file_counts_as_binary() {
        assert!(is_binary(Path::new("/definitely/not/here.cpp")));
    }
}
