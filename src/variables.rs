use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::diagnostics::{ErrorKind, RhythmError};

lazy_static! {
    static ref DECLARATION: Regex = Regex::new(r"^@([A-Za-z0-9_]+)=(.+)$").unwrap();
}

/// `@name` to value bindings visible to one block.
///
/// Values are stored fully resolved, so a reference never chains. Blocks
/// work on a `Cow` over the global scope and only clone it on their first
/// local declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableScope {
    values: HashMap<String, String>,
}

impl VariableScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bind `name`. A value starting with `@` is looked up in this scope first.
    pub fn declare(&mut self, name: &str, value: &str, line: usize) -> Result<(), RhythmError> {
        let resolved = self.resolve(value, line)?.to_string();
        self.values.insert(name.to_string(), resolved);
        Ok(())
    }

    /// Substitute a `@name` token; any other token is returned unchanged.
    pub fn resolve<'a>(&'a self, token: &'a str, line: usize) -> Result<&'a str, RhythmError> {
        match token.strip_prefix('@') {
            Some(name) => self.get(name).ok_or_else(|| {
                RhythmError::new(ErrorKind::VariableNotFound {
                    name: name.to_string(),
                })
                .at_line(line)
            }),
            None => Ok(token),
        }
    }

    /// Parse and bind a whole `@name=value` declaration line.
    pub fn declare_line(&mut self, line_text: &str, line: usize) -> Result<(), RhythmError> {
        let (name, value) = parse_declaration(line_text).map_err(|err| err.at_line(line))?;
        self.declare(name, value, line)
    }
}

/// Split `@name=value` into its parts.
pub fn parse_declaration(line_text: &str) -> Result<(&str, &str), RhythmError> {
    let trimmed = line_text.trim();
    let malformed = || {
        RhythmError::new(ErrorKind::MalformedVariableSyntax {
            declaration: trimmed.to_string(),
        })
    };
    let captures = DECLARATION.captures(trimmed).ok_or_else(malformed)?;
    let name = captures.get(1).map(|m| m.as_str()).ok_or_else(malformed)?;
    let value = captures
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(malformed)?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_resolves_through_scope() {
        let mut scope = VariableScope::new();
        scope.declare_line("@primary=#FF0000", 1).unwrap();
        scope.declare_line("@accent=@primary", 2).unwrap();
        assert_eq!(scope.get("accent"), Some("#FF0000"));
        assert_eq!(scope.resolve("@accent", 3).unwrap(), "#FF0000");
        assert_eq!(scope.resolve("@accent", 4).unwrap(), "#FF0000");
        assert_eq!(scope.resolve("8dp", 3).unwrap(), "8dp");
    }

    #[test]
    fn redeclaration_overrides() {
        let mut scope = VariableScope::new();
        scope.declare("step", "4dp", 1).unwrap();
        scope.declare("step", "8dp", 2).unwrap();
        assert_eq!(scope.get("step"), Some("8dp"));
    }

    #[test]
    fn undeclared_reference_cites_line() {
        let scope = VariableScope::new();
        let err = scope.resolve("@missing", 12).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::VariableNotFound { name: "missing".into() });
        assert_eq!(err.line(), Some(12));

        let mut scope = VariableScope::new();
        let err = scope.declare_line("@a=@b", 3).unwrap_err();
        assert_eq!(err.code(), 120);
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn malformed_declarations() {
        for bad in ["@=x", "@na-me=x", "@name", "@name=   ", "name=x"] {
            let err = parse_declaration(bad).unwrap_err();
            assert_eq!(err.code(), 100, "{bad}");
        }
        assert_eq!(parse_declaration(" @step_2=8dp ").unwrap(), ("step_2", "8dp"));
    }

    #[test]
    fn value_may_contain_spaces() {
        assert_eq!(parse_declaration("@label=Main grid").unwrap(), ("label", "Main grid"));
    }
}
