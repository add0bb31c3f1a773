use crate::comments;
use crate::config;
use crate::elements;
use crate::structs::FileDocumentation;
use crate::tokens;
use crate::utils;
use anyhow::{anyhow, bail, Context};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extracts the documented elements of a C++ source held in memory.
///
/// `extension` selects the grammar, as it would for a file on disk. The
/// returned value has an empty `path`.
pub fn parse_source(code: &str, extension: &str) -> anyhow::Result<FileDocumentation> {
    let mut parser = config::get_parser(extension)
        .ok_or_else(|| anyhow!("unsupported source extension '{}'", extension))?;
    let tree = parser
        .parse(code, None)
        .ok_or_else(|| anyhow!("tree-sitter returned no syntax tree"))?;

    let tokens = tokens::tokenize(&tree, code);
    let extraction = comments::extract_comments(&tokens);
    let (elements, unattached) =
        elements::collect_elements(&tree, code, &tokens, extraction.blocks);

    debug!(
        tokens = tokens.len(),
        elements = elements.len(),
        unattached = unattached.len(),
        "parsed source"
    );

    Ok(FileDocumentation {
        path: String::new(),
        elements,
        unattached,
        warnings: extraction.warnings,
    })
}

/// Parses a single file and extracts its documentation.
///
/// Fails for binary or unreadable files and for extensions without a grammar.
pub fn parse_file(path: &Path) -> anyhow::Result<FileDocumentation> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| anyhow!("{} has no file extension", path.display()))?;
    if !config::is_supported_extension(extension) {
        bail!("{} is not a C++ source file", path.display());
    }
    if utils::is_binary(path) {
        bail!("{} looks like a binary file", path.display());
    }

    let code = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut documentation = parse_source(&code, extension)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    documentation.path = path.to_string_lossy().into_owned();

    for warning in &documentation.warnings {
        warn!(path = %path.display(), "{}", warning);
    }
    Ok(documentation)
}

/// Parses `paths` in parallel. Results keep the order of `paths`.
pub fn extract_files(paths: &[PathBuf]) -> Vec<anyhow::Result<FileDocumentation>> {
    paths.par_iter().map(|path| parse_file(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{Access, ElementKind};
    use std::io::Write;

    const EXAMPLE: &str = include_str!("../test_data/example.cpp");
    const NAMESPACED: &str = include_str!("../test_data/namespaced.hpp");

    #[test]
    fn example_fixture_elements() {
        let doc = parse_source(EXAMPLE, "cpp").unwrap();
        let summary: Vec<_> = doc
            .elements
            .iter()
            .map(|e| (e.kind, e.qualified_name.as_str(), e.access))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ElementKind::Class, "ExampleClass", None),
                (ElementKind::Constructor, "ExampleClass::ExampleClass", Some(Access::Public)),
                (ElementKind::Method, "ExampleClass::returnsTrue", Some(Access::Public)),
                (ElementKind::Method, "ExampleClass::returnsFalse", Some(Access::Public)),
                (ElementKind::Method, "ExampleClass::returnsTheTruth", Some(Access::Public)),
                (ElementKind::Method, "ExampleClass::returnsTrue", Some(Access::Public)),
            ]
        );
        assert!(doc.unattached.is_empty());
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn example_fixture_comments() {
        let doc = parse_source(EXAMPLE, "cpp").unwrap();
        let content: Vec<Option<String>> = doc
            .elements
            .iter()
            .map(|e| e.comment.as_ref().map(|c| c.content()))
            .collect();
        assert_eq!(
            content,
            vec![
                Some("This is a\nmultiline\ncomment".to_string()),
                // `//*` does not open a documentation block.
                None,
                Some("Multiple\nSingle\nLine\nComments".to_string()),
                Some("End of line comment".to_string()),
                None,
                None,
            ]
        );
        assert!(doc.elements[3].comment.as_ref().unwrap().back_reference);
    }

    #[test]
    fn example_fixture_report() {
        let doc = parse_source(EXAMPLE, "cpp").unwrap();
        let report = doc.elements[0].to_string();
        assert!(report.starts_with("class ExampleClass:\n\n/** \n * This is a"));
        assert!(report.ends_with("\n\nclass ExampleClass\n\n---\n"));
        assert!(doc.elements[2]
            .to_string()
            .starts_with("method ExampleClass::returnsTrue (public):\n\n//! Multiple\n//  Single"));
    }

    #[test]
    fn namespaced_fixture() {
        let doc = parse_source(NAMESPACED, "hpp").unwrap();
        let find = |name: &str| {
            doc.elements
                .iter()
                .find(|e| e.qualified_name == name)
                .unwrap_or_else(|| panic!("missing {name}"))
        };

        assert_eq!(find("geometry::Point").kind, ElementKind::Struct);
        assert_eq!(find("geometry::Point").comment.as_ref().unwrap().content(), "A point on the plane.");
        assert_eq!(find("geometry::Point::norm").access, Some(Access::Public));
        assert_eq!(find("geometry::Shape").comment.as_ref().unwrap().content(), "Shapes own their vertices.");
        assert_eq!(find("geometry::Shape::update").access, Some(Access::Protected));
        assert_eq!(find("geometry::Shape::update").comment.as_ref().unwrap().content(), "Called once per frame.");
        assert_eq!(find("geometry::Shape::Shape").kind, ElementKind::Constructor);
        assert_eq!(find("geometry::Shape::~Shape").kind, ElementKind::Destructor);

        let unattached: Vec<String> = doc.unattached.iter().map(|b| b.content()).collect();
        assert_eq!(unattached, vec!["horizontal", "Orphaned at the end of the file."]);
        assert_eq!(doc.warnings.len(), 1);
        assert!(doc.warnings[0].contains("reference forward to"));
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        assert!(parse_source("int x;", "py").is_err());
    }

    #[test]
    fn parse_file_sets_path_and_rejects_binaries() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("widget.hpp");
        fs::write(&source, "/// A widget.\nclass Widget {};\n").unwrap();
        let doc = parse_file(&source).unwrap();
        assert_eq!(doc.path, source.to_string_lossy());
        assert_eq!(doc.elements.len(), 1);

        let binary = dir.path().join("blob.cpp");
        fs::File::create(&binary).unwrap().write_all(&[0, 1, 2, 0]).unwrap();
        assert!(parse_file(&binary).is_err());

        assert!(parse_file(&dir.path().join("missing.cpp")).is_err());
        assert!(parse_file(&dir.path().join("notes.txt")).is_err());
    }

    #[test]
    fn extract_files_keeps_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..4)
            .map(|i| {
                let path = dir.path().join(format!("c{i}.cpp"));
                fs::write(&path, format!("class C{i} {{}};\n")).unwrap();
                path
            })
            .collect();

        let results = extract_files(&paths);
        for (i, result) in results.iter().enumerate() {
            let doc = result.as_ref().unwrap();
            assert_eq!(doc.elements[0].qualified_name, format!("C{i}"));
        }
    }
}
