// Line classification, block splitting and layer line tokenizing.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{trace, warn};

use crate::arguments::ArgumentBundle;
use crate::diagnostics::{ErrorKind, RhythmError};
use crate::dimension::ScaleContext;
use crate::registry::LayerConfig;
use crate::variables::VariableScope;

pub const COMMENT_MARKER: &str = "//";

lazy_static! {
    static ref ARGUMENT: Regex = Regex::new(r"^([A-Za-z0-9_\-]+)(?:=(\S+))?$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Variable,
    Title,
    Layer,
}

impl LineKind {
    pub fn is_content(self) -> bool {
        !matches!(self, LineKind::Blank | LineKind::Comment)
    }
}

pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with(COMMENT_MARKER) {
        LineKind::Comment
    } else if trimmed.starts_with('@') {
        LineKind::Variable
    } else if trimmed.starts_with('#') {
        LineKind::Title
    } else {
        LineKind::Layer
    }
}

/// Title text of a `#` line, `None` when it is empty.
pub fn parse_title(line: &str) -> Option<String> {
    let title = line.trim().trim_start_matches('#').trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// A run of non-blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// 1-based document line of `lines[0]`.
    pub start: usize,
    pub lines: Vec<&'a str>,
}

impl Block<'_> {
    pub fn has_content(&self) -> bool {
        self.lines.iter().any(|line| classify(line).is_content())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub globals: VariableScope,
    pub blocks: Vec<Block<'a>>,
}

/// Split a document into its global variables and its blocks.
///
/// Blocks holding nothing but comments are dropped.
pub fn split_document<S: AsRef<str>>(lines: &[S]) -> Result<Document<'_>, RhythmError> {
    let mut globals = VariableScope::new();
    let mut body_start = lines.len();
    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        match classify(line) {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Variable => globals.declare_line(line, index + 1)?,
            LineKind::Title | LineKind::Layer => {
                body_start = index;
                break;
            }
        }
    }

    let mut blocks = Vec::new();
    let mut current: Option<Block<'_>> = None;
    for (index, line) in lines.iter().enumerate().skip(body_start) {
        let line = line.as_ref();
        if classify(line) == LineKind::Blank {
            blocks.extend(current.take());
            continue;
        }
        current
            .get_or_insert_with(|| Block {
                start: index + 1,
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }
    blocks.extend(current);
    blocks.retain(|block| block.has_content());

    Ok(Document { globals, blocks })
}

fn malformed(token: &str, line_no: usize) -> RhythmError {
    RhythmError::new(ErrorKind::MalformedLayerDeclaration {
        token: token.to_string(),
    })
    .at_line(line_no)
}

/// Tokenize one layer line into a config, resolving `@name` values in `scope`.
///
/// The indent is the number of leading space characters.
pub fn parse_layer_line(
    line: &str,
    line_no: usize,
    scope: &VariableScope,
    scale: &ScaleContext,
) -> Result<LayerConfig, RhythmError> {
    let indent = line.chars().take_while(|c| *c == ' ').count();
    let mut tokens = line.split_whitespace();
    let layer_type = tokens.next().ok_or_else(|| malformed(line.trim(), line_no))?;

    let mut arguments = ArgumentBundle::new(*scale);
    for token in tokens {
        let captures = ARGUMENT
            .captures(token)
            .ok_or_else(|| malformed(token, line_no))?;
        let key = &captures[1];
        let value = match captures.get(2) {
            Some(raw) => Some(scope.resolve(raw.as_str(), line_no)?.to_string()),
            None => None,
        };
        if arguments.insert(key.to_string(), value).is_some() {
            warn!(line = line_no, key, "argument given twice, keeping the last value");
        }
    }

    trace!(line = line_no, layer_type, indent, arguments = arguments.len(), "parsed layer line");
    Ok(LayerConfig::new(layer_type, indent, arguments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_lines() {
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("  // note"), LineKind::Comment);
        assert_eq!(classify("@a=1"), LineKind::Variable);
        assert_eq!(classify("#Title"), LineKind::Title);
        assert_eq!(classify("  fill"), LineKind::Layer);
    }

    #[test]
    fn empty_title_is_anonymous() {
        assert_eq!(parse_title("#  My Grid "), Some("My Grid".to_string()));
        assert_eq!(parse_title("#   "), None);
    }

    #[test]
    fn splits_globals_and_blocks() {
        let lines = [
            "// globals",
            "@c=#FF0000",
            "",
            "#First",
            "fill color=@c",
            "",
            "",
            "// trailing comment block",
            "",
            "grid-lines from=top step=8dp",
            "// inside",
            " fill",
        ];
        let document = split_document(&lines).unwrap();
        assert_eq!(document.globals.get("c"), Some("#FF0000"));
        assert_eq!(document.blocks.len(), 2);
        assert_eq!(document.blocks[0].start, 4);
        assert_eq!(document.blocks[0].lines, vec!["#First", "fill color=@c"]);
        assert_eq!(document.blocks[1].start, 10);
        assert_eq!(document.blocks[1].lines.len(), 3);
    }

    #[test]
    fn malformed_global_fails_with_its_line() {
        let err = split_document(&["// head", "@bad-name=1", "fill"]).unwrap_err();
        assert_eq!(err.code(), 100);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn layer_line_tokens() {
        let mut scope = VariableScope::new();
        scope.declare("step", "8dp", 1).unwrap();
        let config =
            parse_layer_line("  grid-lines from=top step=@step outside", 3, &scope, &ScaleContext::default())
                .unwrap();
        assert_eq!(config.layer_type, "grid-lines");
        assert_eq!(config.indent, 2);
        assert_eq!(config.arguments.get_string("step"), Some("8dp"));
        assert!(config.arguments.has("outside"));
        assert_eq!(config.arguments.len(), 3);
    }

    #[test]
    fn bad_argument_token() {
        let scope = VariableScope::new();
        let err = parse_layer_line("fill color=", 5, &scope, &ScaleContext::default()).unwrap_err();
        assert_eq!(err.code(), 101);
        assert_eq!(err.args(), vec!["color="]);
        assert_eq!(err.line(), Some(5));
    }

    #[test]
    fn unresolved_reference() {
        let scope = VariableScope::new();
        let err = parse_layer_line("fill color=@nope", 7, &scope, &ScaleContext::default()).unwrap_err();
        assert_eq!(err.code(), 120);
        assert_eq!(err.line(), Some(7));
    }
}
