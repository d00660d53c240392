use thiserror::Error;

/// Failure raised while inflating a Rhythm document.
///
/// The line is 1-based and counted over the whole document. Helpers and
/// factories leave it unset; the inflater attaches it once the failing line
/// is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", line_suffix(.line))]
pub struct RhythmError {
    kind: ErrorKind,
    line: Option<usize>,
}

impl RhythmError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, line: None }
    }

    /// Attach a document line. An already attached line is kept.
    pub fn at_line(mut self, line: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }

    /// Attach `line`, replacing any line set earlier.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    pub fn args(&self) -> Vec<String> {
        self.kind.args()
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {line})"),
        None => String::new(),
    }
}

impl From<ErrorKind> for RhythmError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("malformed variable declaration `{declaration}`, expected `@name=value`")]
    MalformedVariableSyntax { declaration: String },
    #[error("malformed layer declaration near `{token}`, expected `key` or `key=value`")]
    MalformedLayerDeclaration { token: String },
    #[error("variable declarations must precede layers and cannot form a block of their own")]
    UnexpectedVariableDeclaration,
    #[error("a title must be the first line of its block and appear once")]
    UnexpectedTitleDeclaration,
    #[error("variable `{name}` is not declared")]
    VariableNotFound { name: String },
    #[error("unknown layer type `{layer_type}`{}; known types: {}", suggest(.suggestions), .known.join(", "))]
    UnknownLayerType {
        layer_type: String,
        known: Vec<String>,
        suggestions: Vec<String>,
    },
    #[error("failed to inflate `{layer_type}`: {message}")]
    InflatingLayerGeneric { layer_type: String, message: String },
    #[error("`{layer_type}` requires argument `{argument}`")]
    ArgumentMissing { layer_type: String, argument: String },
    #[error("`{layer_type}` requires argument `{argument}` to be one of: {}", .accepted.join(", "))]
    ArgumentMissingOrNotOneOf {
        layer_type: String,
        argument: String,
        accepted: Vec<String>,
    },
    #[error("`{layer_type}` requires a positive `{argument}`, e.g. `{argument}={example}`")]
    ArgumentMissingOrNotPositive {
        layer_type: String,
        argument: String,
        example: String,
    },
    #[error("`{layer_type}` requires `{argument}` of the form `{argument}={example}`")]
    ArgumentMissingOrWrongType {
        layer_type: String,
        argument: String,
        example: String,
    },
    #[error("cannot read `{argument}={value}` as {expected}")]
    MalformedArgumentValue {
        argument: String,
        value: String,
        expected: &'static str,
    },
}

fn suggest(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean `{}`?)", suggestions.join("`, `"))
    }
}

impl ErrorKind {
    pub fn code(&self) -> u16 {
        match self {
            ErrorKind::MalformedVariableSyntax { .. } => 100,
            ErrorKind::MalformedLayerDeclaration { .. } => 101,
            ErrorKind::UnexpectedVariableDeclaration => 110,
            ErrorKind::UnexpectedTitleDeclaration => 111,
            ErrorKind::VariableNotFound { .. } => 120,
            ErrorKind::UnknownLayerType { .. } => 130,
            ErrorKind::InflatingLayerGeneric { .. } => 140,
            ErrorKind::ArgumentMissing { .. } => 150,
            ErrorKind::ArgumentMissingOrNotOneOf { .. } => 151,
            ErrorKind::ArgumentMissingOrNotPositive { .. } => 152,
            ErrorKind::ArgumentMissingOrWrongType { .. } => 153,
            ErrorKind::MalformedArgumentValue { .. } => 154,
        }
    }

    /// Positional arguments for message assembly, in declaration order.
    pub fn args(&self) -> Vec<String> {
        match self {
            ErrorKind::MalformedVariableSyntax { declaration } => vec![declaration.clone()],
            ErrorKind::MalformedLayerDeclaration { token } => vec![token.clone()],
            ErrorKind::UnexpectedVariableDeclaration | ErrorKind::UnexpectedTitleDeclaration => {
                Vec::new()
            }
            ErrorKind::VariableNotFound { name } => vec![name.clone()],
            ErrorKind::UnknownLayerType {
                layer_type, known, ..
            } => vec![layer_type.clone(), known.join(", ")],
            ErrorKind::InflatingLayerGeneric {
                layer_type,
                message,
            } => vec![layer_type.clone(), message.clone()],
            ErrorKind::ArgumentMissing {
                layer_type,
                argument,
            } => vec![layer_type.clone(), argument.clone()],
            ErrorKind::ArgumentMissingOrNotOneOf {
                layer_type,
                argument,
                accepted,
            } => vec![layer_type.clone(), argument.clone(), accepted.join(", ")],
            ErrorKind::ArgumentMissingOrNotPositive {
                layer_type,
                argument,
                example,
            }
            | ErrorKind::ArgumentMissingOrWrongType {
                layer_type,
                argument,
                example,
            } => vec![layer_type.clone(), argument.clone(), example.clone()],
            ErrorKind::MalformedArgumentValue {
                argument,
                value,
                expected,
            } => vec![argument.clone(), value.clone(), (*expected).to_string()],
        }
    }
}

pub fn missing(layer_type: &str, argument: &str) -> RhythmError {
    RhythmError::new(ErrorKind::ArgumentMissing {
        layer_type: layer_type.to_string(),
        argument: argument.to_string(),
    })
}

pub fn missing_or_not_one_of(layer_type: &str, argument: &str, accepted: &[&str]) -> RhythmError {
    RhythmError::new(ErrorKind::ArgumentMissingOrNotOneOf {
        layer_type: layer_type.to_string(),
        argument: argument.to_string(),
        accepted: accepted.iter().map(|s| (*s).to_string()).collect(),
    })
}

pub fn missing_or_not_positive(layer_type: &str, argument: &str, example: &str) -> RhythmError {
    RhythmError::new(ErrorKind::ArgumentMissingOrNotPositive {
        layer_type: layer_type.to_string(),
        argument: argument.to_string(),
        example: example.to_string(),
    })
}

pub fn missing_or_wrong_type(layer_type: &str, argument: &str, example: &str) -> RhythmError {
    RhythmError::new(ErrorKind::ArgumentMissingOrWrongType {
        layer_type: layer_type.to_string(),
        argument: argument.to_string(),
        example: example.to_string(),
    })
}

/// Render an error together with the document line it points at.
pub fn format_error(source: &str, error: &RhythmError) -> String {
    let message = format!("error[R{}]: {}", error.code(), error.kind());
    match error.line() {
        Some(line) => {
            let line_str = line_at(source, line);
            let caret_offset = line_str.len() - line_str.trim_start().len();
            let caret = format!(
                "{}{}",
                " ".repeat(caret_offset),
                "^".repeat(line_str.trim().len().max(1))
            );
            format!("{message}\n --> line {line}\n{line:>4} | {line_str}\n     | {caret}\n")
        }
        None => message,
    }
}

fn line_at(source: &str, line: usize) -> String {
    source
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .to_string()
}
