use crate::structs::{Access, CommentBlock, Element, ElementKind, Location};
use crate::tokens::Token;
use tree_sitter::{Node, Tree};

/// Declarator kinds that name a function rather than a function pointer.
const FUNCTION_NAME_KINDS: [&str; 7] = [
    "identifier",
    "field_identifier",
    "destructor_name",
    "qualified_identifier",
    "operator_name",
    "template_function",
    "template_method",
];

#[derive(Clone, Default)]
struct Context {
    path: Vec<String>,
    class: Option<String>,
    access: Option<Access>,
}

struct Found {
    kind: ElementKind,
    qualified_name: String,
    access: Option<Access>,
    head_start: Location,
    head_end: Location,
    head_start_byte: usize,
    head_end_byte: usize,
    end_byte: usize,
}

struct Walker<'a> {
    code: &'a str,
    found: Vec<Found>,
}

/// Collects the classes, constructors, destructors and methods of `tree` and
/// pairs each with the earliest comment block anchored inside its head. A
/// back-reference block may also anchor on the element's final token.
///
/// Returns the elements in document order and the blocks no element claimed.
pub fn collect_elements(
    tree: &Tree,
    code: &str,
    tokens: &[Token],
    blocks: Vec<CommentBlock>,
) -> (Vec<Element>, Vec<CommentBlock>) {
    let mut walker = Walker {
        code,
        found: Vec::new(),
    };
    walker.visit(tree.root_node(), &Context::default());

    let mut claimed = vec![false; blocks.len()];
    let mut elements: Vec<Element> = walker
        .found
        .into_iter()
        .map(|found| {
            let tail = trailing_anchor(tokens, found.head_start_byte, found.end_byte);
            let comment = comment_for(&blocks, &found, tail).map(|i| {
                claimed[i] = true;
                blocks[i].clone()
            });
            Element {
                kind: found.kind,
                qualified_name: found.qualified_name,
                access: found.access,
                signature: signature(tokens, found.head_start_byte, found.head_end_byte),
                location: found.head_start,
                comment,
            }
        })
        .collect();

    inherit_access(&mut elements);

    let unattached = blocks
        .into_iter()
        .zip(claimed)
        .filter_map(|(block, used)| (!used).then_some(block))
        .collect();

    (elements, unattached)
}

impl<'a> Walker<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.code.as_bytes()).unwrap_or("")
    }

    fn visit(&mut self, node: Node, ctx: &Context) {
        match node.kind() {
            "namespace_definition" => {
                let mut inner = Context {
                    path: ctx.path.clone(),
                    ..Context::default()
                };
                if let Some(name) = node.child_by_field_name("name") {
                    inner.path.push(self.text(name).to_string());
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_children(body, &inner);
                }
            }
            "class_specifier" | "struct_specifier" => self.visit_class(node, ctx),
            "function_definition" | "field_declaration" | "declaration" => {
                self.visit_function(node, ctx);
                // Nested class definitions sit in the type position.
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit(ty, ctx);
                }
            }
            "compound_statement" => {}
            _ => self.visit_children(node, ctx),
        }
    }

    fn visit_children(&mut self, node: Node, ctx: &Context) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, ctx);
        }
    }

    fn visit_class(&mut self, node: Node, ctx: &Context) {
        let (Some(name_node), Some(body)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("body"),
        ) else {
            return;
        };
        let name = self.text(name_node).to_string();
        let (kind, default_access) = if node.kind() == "struct_specifier" {
            (ElementKind::Struct, Access::Public)
        } else {
            (ElementKind::Class, Access::Private)
        };

        let mut path = ctx.path.clone();
        path.push(name.clone());
        self.record(node, Some(body), kind, path.join("::"), ctx.access);

        let mut inner = Context {
            path,
            class: Some(name),
            access: Some(default_access),
        };
        let mut cursor = body.walk();
        let members: Vec<Node> = body.named_children(&mut cursor).collect();
        for member in members {
            if member.kind() == "access_specifier" {
                if let Some(access) = Access::from_keyword(self.text(member)) {
                    inner.access = Some(access);
                }
                continue;
            }
            self.visit(member, &inner);
        }
    }

    fn visit_function(&mut self, node: Node, ctx: &Context) {
        let Some(segments) = self.function_segments(node) else {
            return;
        };
        let Some((name, scope)) = segments.split_last() else {
            return;
        };
        // Out-of-line definitions name their owner; in-class ones inherit it.
        let (owner, access) = match scope.last() {
            Some(owner) => (owner.as_str(), None),
            None => match ctx.class.as_deref() {
                Some(owner) => (owner, ctx.access),
                None => return,
            },
        };

        let owner = owner.split('<').next().unwrap_or(owner).trim();
        let kind = if name.starts_with('~') {
            ElementKind::Destructor
        } else if name == owner {
            ElementKind::Constructor
        } else {
            ElementKind::Method
        };

        let mut path = ctx.path.clone();
        path.extend(segments.iter().cloned());
        let body = node.child_by_field_name("body");
        self.record(node, body, kind, path.join("::"), access);
    }

    /// Name segments of the function `node` declares, if it declares one.
    fn function_segments(&self, node: Node) -> Option<Vec<String>> {
        let declarator = node.child_by_field_name("declarator")?;
        if let Some(function) = find_function_declarator(declarator) {
            let name_node = function.child_by_field_name("declarator")?;
            if !FUNCTION_NAME_KINDS.contains(&name_node.kind()) {
                return None;
            }
            return Some(split_qualified(self.text(name_node)));
        }

        // Conversion operators, possibly qualified as `A::operator T`.
        let mut segments = Vec::new();
        let mut current = declarator;
        while current.kind() == "qualified_identifier" {
            if let Some(scope) = current.child_by_field_name("scope") {
                segments.extend(split_qualified(self.text(scope)));
            }
            current = current.child_by_field_name("name")?;
        }
        if current.kind() != "operator_cast" {
            return None;
        }
        segments.push(operator_cast_name(self.text(current)));
        Some(segments)
    }

    fn record(
        &mut self,
        node: Node,
        body: Option<Node>,
        kind: ElementKind,
        qualified_name: String,
        access: Option<Access>,
    ) {
        // A leading `template <...>` belongs to the head of what it declares.
        let start = match node.parent() {
            Some(parent) if parent.kind() == "template_declaration" => parent,
            _ => node,
        };
        let (head_end, head_end_byte) = match body {
            Some(body) => (body.start_position(), body.start_byte()),
            None => (node.end_position(), node.end_byte()),
        };
        self.found.push(Found {
            kind,
            qualified_name,
            access,
            head_start: start.start_position().into(),
            head_end: head_end.into(),
            head_start_byte: start.start_byte(),
            head_end_byte,
            end_byte: node.end_byte(),
        });
    }
}

/// Unwraps pointer and reference declarators down to a function declarator.
fn find_function_declarator(mut node: Node) -> Option<Node> {
    loop {
        match node.kind() {
            "function_declarator" => return Some(node),
            "pointer_declarator" | "reference_declarator" => {
                node = match node.child_by_field_name("declarator") {
                    Some(inner) => inner,
                    None => node.named_child(node.named_child_count().checked_sub(1)?)?,
                };
            }
            _ => return None,
        }
    }
}

fn split_qualified(name: &str) -> Vec<String> {
    name.split("::")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `operator bool() const` is named `operator bool`.
fn operator_cast_name(text: &str) -> String {
    let head = text.split('(').next().unwrap_or(text);
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Start of the element's final token: the `;` right after it, if any,
/// otherwise its last code token.
fn trailing_anchor(tokens: &[Token], start_byte: usize, end_byte: usize) -> Option<Location> {
    let last = tokens
        .iter()
        .rposition(|t| !t.is_comment() && t.start_byte >= start_byte && t.end_byte <= end_byte)?;
    let next = tokens[last + 1..].iter().find(|t| !t.is_comment());
    match next {
        Some(t) if t.text == ";" => Some(t.start),
        _ => Some(tokens[last].start),
    }
}

/// Index of the earliest block anchored inside the head of `found`, or of a
/// back-reference block anchored on its final token.
fn comment_for(blocks: &[CommentBlock], found: &Found, tail: Option<Location>) -> Option<usize> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(i, block)| block.anchor.map(|anchor| (i, block, anchor)))
        .filter(|(_, block, anchor)| {
            let in_head = *anchor >= found.head_start && *anchor < found.head_end;
            in_head || (block.back_reference && Some(*anchor) == tail)
        })
        .min_by_key(|(_, _, anchor)| *anchor)
        .map(|(i, _, _)| i)
}

fn signature(tokens: &[Token], start_byte: usize, end_byte: usize) -> String {
    let mut parts: Vec<&str> = tokens
        .iter()
        .filter(|t| !t.is_comment() && t.start_byte >= start_byte && t.end_byte <= end_byte)
        .map(|t| t.text.as_str())
        .collect();
    if parts.last() == Some(&";") {
        parts.pop();
    }
    parts.join(" ")
}

/// Out-of-line definitions take the access of their in-class declaration.
fn inherit_access(elements: &mut [Element]) {
    let inherited: Vec<Option<Access>> = elements
        .iter()
        .map(|element| match element.access {
            Some(_) => None,
            None if matches!(element.kind, ElementKind::Class | ElementKind::Struct) => None,
            None => elements
                .iter()
                .find(|other| other.qualified_name == element.qualified_name && other.access.is_some())
                .and_then(|other| other.access),
        })
        .collect();

    for (element, access) in elements.iter_mut().zip(inherited) {
        if access.is_some() {
            element.access = access;
        }
    }
}
