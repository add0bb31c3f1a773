use crate::structs::Location;
use tree_sitter::{Node, Tree};

/// Nodes whose children are not tokens of their own.
const ATOMIC_KINDS: [&str; 4] = [
    "string_literal",
    "raw_string_literal",
    "char_literal",
    "system_lib_string",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    Code,
}

/// A lexical token of the source, recovered from the leaves of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Location,
    pub end: Location,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

/// Flattens `tree` into the token stream of `code`, in document order.
pub fn tokenize(tree: &Tree, code: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    collect(tree.root_node(), code, &mut tokens);
    tokens
}

fn collect(node: Node, code: &str, out: &mut Vec<Token>) {
    if node.child_count() == 0 || ATOMIC_KINDS.contains(&node.kind()) {
        // Zero-width leaves are error-recovery placeholders.
        if node.start_byte() == node.end_byte() {
            return;
        }
        let kind = if node.kind() == "comment" {
            TokenKind::Comment
        } else {
            TokenKind::Code
        };
        out.push(Token {
            kind,
            text: node.utf8_text(code.as_bytes()).unwrap_or("").to_string(),
            start: node.start_position().into(),
            end: node.end_position().into(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
        });
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, code, out);
    }
}
