use tree_sitter::Parser;

/// Extensions treated as C++ sources or headers.
pub const CPP_EXTENSIONS: [&str; 9] = ["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h", "ipp"];

/// Extensions scanned when the caller does not name any.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["cpp", "cc", "hpp", "h"];

/// Files larger than this are skipped during a directory scan.
pub const MAX_FILE_SIZE_BYTES: u64 = 1_000_000;

/// Prefixes that open a documentation block.
pub const BLOCK_START_MARKERS: [&str; 6] = ["/**", "/*!", "/*<", "///", "//!", "//<"];

/// Prefixes of blocks that document the code before them rather than after.
pub const BACK_REFERENCE_MARKERS: [&str; 2] = ["/*<", "//<"];

pub fn is_supported_extension(extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    CPP_EXTENSIONS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(extension))
}

/// Retrieves a tree-sitter parser for a given file extension.
pub fn get_parser(extension: &str) -> Option<Parser> {
    if !is_supported_extension(extension) {
        return None;
    }
    let mut parser = Parser::new();
    if parser.set_language(tree_sitter_cpp::language()).is_err() {
        // Grammar built against an incompatible tree-sitter ABI.
        return None;
    }
    Some(parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_for_cpp_family_only() {
        assert!(get_parser("cpp").is_some());
        assert!(get_parser("HPP").is_some());
        assert!(get_parser(".h").is_some());
        assert!(get_parser("py").is_none());
        assert!(get_parser("").is_none());
    }

    #[test]
    fn default_extensions_are_supported() {
        assert!(DEFAULT_EXTENSIONS.iter().all(|e| is_supported_extension(e)));
    }
}
