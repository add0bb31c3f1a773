use crate::config::{BACK_REFERENCE_MARKERS, BLOCK_START_MARKERS};
use crate::structs::{CommentBlock, Location};
use crate::tokens::{Token, TokenKind};

/// Returns true if `comment` opens a documentation block.
pub fn is_start_of_comment_block(comment: &str) -> bool {
    let comment = comment.trim();
    BLOCK_START_MARKERS.iter().any(|m| comment.starts_with(m))
}

/// Returns true if `comment` documents the token before it.
pub fn is_back_reference_comment(comment: &str) -> bool {
    let comment = comment.trim();
    BACK_REFERENCE_MARKERS.iter().any(|m| comment.starts_with(m))
}

#[derive(Debug, Default)]
pub struct CommentExtraction {
    pub blocks: Vec<CommentBlock>,
    pub warnings: Vec<String>,
}

struct OpenBlock {
    text: String,
    start: Location,
    last_line: usize,
    back_reference: bool,
}

impl OpenBlock {
    fn new(token: &Token) -> Self {
        OpenBlock {
            text: token.text.clone(),
            start: token.start,
            last_line: token.end.line,
            back_reference: is_back_reference_comment(&token.text),
        }
    }

    fn append(&mut self, token: &Token) {
        self.text.push('\n');
        self.text.push_str(&token.text);
        self.last_line = token.end.line;
    }

    fn finish(self, anchor: Option<Location>) -> CommentBlock {
        CommentBlock {
            text: self.text,
            start: self.start,
            anchor,
            back_reference: self.back_reference,
        }
    }
}

/// Groups the comments of `tokens` into documentation blocks and anchors each
/// block to the token it describes.
pub fn extract_comments(tokens: &[Token]) -> CommentExtraction {
    let mut out = CommentExtraction::default();
    let mut open: Option<OpenBlock> = None;
    let mut previous: Option<&Token> = None;

    for token in tokens {
        match token.kind {
            TokenKind::Comment => {
                if let Some(mut block) = open.take() {
                    let detached = token.start.line > block.last_line + 1;
                    let starts_forward_block = block.back_reference
                        && is_start_of_comment_block(&token.text)
                        && !is_back_reference_comment(&token.text);

                    if !detached && !starts_forward_block {
                        block.append(token);
                        open = Some(block);
                        continue;
                    }
                    if block.back_reference {
                        close_back_reference(block, previous, &mut out);
                    } else {
                        out.warnings.push(format!(
                            "comment '{}' is separated from the code that follows it.",
                            block.text
                        ));
                        out.blocks.push(block.finish(None));
                    }
                }
                if is_start_of_comment_block(&token.text) {
                    open = Some(OpenBlock::new(token));
                }
            }
            TokenKind::Code => {
                if let Some(block) = open.take() {
                    if block.back_reference {
                        close_back_reference(block, previous, &mut out);
                    } else {
                        out.blocks.push(block.finish(Some(token.start)));
                    }
                }
                previous = Some(token);
            }
        }
    }

    if let Some(block) = open {
        if block.back_reference {
            close_back_reference(block, previous, &mut out);
        } else {
            out.warnings.push(format!(
                "comment '{}' does not have anything to reference forward to.",
                block.text
            ));
            out.blocks.push(block.finish(None));
        }
    }

    out
}

fn close_back_reference(block: OpenBlock, previous: Option<&Token>, out: &mut CommentExtraction) {
    if previous.is_none() {
        out.warnings.push(format!(
            "comment '{}' does not have anything to reference back to.",
            block.text
        ));
    }
    out.blocks.push(block.finish(previous.map(|t| t.start)));
}
