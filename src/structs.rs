use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based position in a source file. Ordered by line, then column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl From<tree_sitter::Point> for Location {
    fn from(point: tree_sitter::Point) -> Self {
        Location {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A run of consecutive comments opened by a documentation marker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// Raw comment text, one source comment per line.
    pub text: String,
    /// Where the first comment of the block starts.
    pub start: Location,
    /// The token this block documents. `None` for freestanding blocks.
    pub anchor: Option<Location>,
    pub back_reference: bool,
}

impl CommentBlock {
    /// The block text with comment syntax removed.
    pub fn content(&self) -> String {
        let mut in_block = false;
        let lines: Vec<String> = self
            .text
            .lines()
            .map(|line| strip_comment_syntax(line, &mut in_block))
            .collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => lines[first..=last].join("\n"),
            _ => String::new(),
        }
    }
}

/// Strips one line of comment syntax. `in_block` tracks whether the line
/// continues a `/* ... */` comment opened on an earlier line.
fn strip_comment_syntax(line: &str, in_block: &mut bool) -> String {
    const LINE_PREFIXES: [&str; 4] = ["///", "//!", "//<", "//"];
    const BLOCK_PREFIXES: [&str; 4] = ["/**", "/*!", "/*<", "/*"];

    let continuation = *in_block;
    let mut rest = line.trim();
    if !continuation {
        if let Some(prefix) = LINE_PREFIXES.iter().find(|p| rest.starts_with(*p)) {
            return rest[prefix.len()..].trim().to_string();
        }
        if let Some(prefix) = BLOCK_PREFIXES.iter().find(|p| rest.starts_with(*p)) {
            rest = &rest[prefix.len()..];
            *in_block = true;
        }
    }
    if *in_block {
        if let Some(stripped) = rest.strip_suffix("*/") {
            rest = stripped;
            *in_block = false;
        }
    }
    let rest = rest.trim();
    // Gutter of a `/* ... */` continuation line.
    let rest = if continuation {
        rest.strip_prefix('*').unwrap_or(rest)
    } else {
        rest
    };
    rest.trim().to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Struct,
    Constructor,
    Destructor,
    Method,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Class => "class",
            ElementKind::Struct => "struct",
            ElementKind::Constructor => "constructor",
            ElementKind::Destructor => "destructor",
            ElementKind::Method => "method",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn from_keyword(keyword: &str) -> Option<Access> {
        match keyword.trim().trim_end_matches(':').trim() {
            "public" => Some(Access::Public),
            "protected" => Some(Access::Protected),
            "private" => Some(Access::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        };
        f.write_str(name)
    }
}

/// A documentable declaration together with the comment block describing it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub qualified_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    pub signature: String,
    pub location: Location,
    pub comment: Option<CommentBlock>,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.qualified_name)?;
        if let Some(access) = self.access {
            write!(f, " ({})", access)?;
        }
        let comment = self
            .comment
            .as_ref()
            .map_or("(undocumented)", |c| c.text.as_str());
        write!(f, ":\n\n{}\n\n{}\n\n---\n", comment, self.signature)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FileDocumentation {
    pub path: String,
    pub elements: Vec<Element>,
    /// Blocks no element claimed, including freestanding ones.
    pub unattached: Vec<CommentBlock>,
    pub warnings: Vec<String>,
}

impl FileDocumentation {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.unattached.is_empty()
    }
}

impl fmt::Display for FileDocumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            writeln!(f, "{}", element)?;
        }
        for block in &self.unattached {
            write!(f, "unattached comment at {}:\n\n{}\n\n---\n\n", block.start, block.text)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ScanResult {
    pub documents: Vec<FileDocumentation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log: Option<Vec<String>>,
    pub timed_out_internally: bool,
    pub files_processed_before_timeout: usize,
}

impl ScanResult {
    pub(crate) fn empty(debug_log: Option<Vec<String>>) -> Self {
        ScanResult {
            documents: Vec::new(),
            debug_log,
            timed_out_internally: false,
            files_processed_before_timeout: 0,
        }
    }
}
