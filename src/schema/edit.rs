//! Edit kind tags and parsing of edit-kind specification strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Granularity (or custom class) of an edit.
///
/// The engine treats edits as opaque tokens; the kind only tells the bound
/// program representation which family of edit to synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    /// Line-level edits (delete, copy, replace, swap lines).
    Line,
    /// Statement-level edits on the parsed syntax tree.
    Statement,
    /// Statement edits restricted to matching statement types.
    MatchedStatement,
    /// In-place statement modifications (operator replacement etc).
    ModifyStatement,
    /// A custom edit class named by its path.
    Custom(String),
}

impl EditKind {
    /// Built-in kinds, in declaration order.
    pub const BUILTIN: [EditKind; 4] = [
        EditKind::Line,
        EditKind::Statement,
        EditKind::MatchedStatement,
        EditKind::ModifyStatement,
    ];
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::Line => f.write_str("LINE"),
            EditKind::Statement => f.write_str("STATEMENT"),
            EditKind::MatchedStatement => f.write_str("MATCHED_STATEMENT"),
            EditKind::ModifyStatement => f.write_str("MODIFY_STATEMENT"),
            EditKind::Custom(name) => f.write_str(name),
        }
    }
}

impl FromStr for EditKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.to_ascii_uppercase().as_str() {
            "LINE" => Ok(EditKind::Line),
            "STATEMENT" => Ok(EditKind::Statement),
            "MATCHED_STATEMENT" => Ok(EditKind::MatchedStatement),
            "MODIFY_STATEMENT" => Ok(EditKind::ModifyStatement),
            _ if token.contains('.') || token.contains("::") => {
                Ok(EditKind::Custom(token.to_string()))
            }
            _ => Err(ConfigError::UnknownEditKind(token.to_string())),
        }
    }
}

/// Parse a comma separated edit-kind specification.
///
/// Duplicates collapse onto their first occurrence so the returned list
/// behaves as an ordered set. Empty tokens are skipped; a specification with
/// no kinds at all is rejected.
pub fn parse_edit_kinds(spec: &str) -> Result<Vec<EditKind>, ConfigError> {
    let mut kinds: Vec<EditKind> = Vec::new();
    for token in spec.split(',').filter(|t| !t.trim().is_empty()) {
        let kind: EditKind = token.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.is_empty() {
        return Err(ConfigError::EmptyEditKinds);
    }
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_kinds() {
        let kinds = parse_edit_kinds("LINE,statement, MATCHED_STATEMENT").unwrap();
        assert_eq!(
            kinds,
            vec![
                EditKind::Line,
                EditKind::Statement,
                EditKind::MatchedStatement
            ]
        );
    }

    #[test]
    fn test_parse_custom_kind() {
        let kinds = parse_edit_kinds("gin.edit.statement.SwapStatement,LINE").unwrap();
        assert_eq!(kinds[0], EditKind::Custom("gin.edit.statement.SwapStatement".into()));
        assert_eq!(kinds[1], EditKind::Line);
    }

    #[test]
    fn test_duplicates_collapse() {
        let kinds = parse_edit_kinds("STATEMENT,LINE,statement").unwrap();
        assert_eq!(kinds, vec![EditKind::Statement, EditKind::Line]);
    }

    #[test]
    fn test_rejects_unknown_and_empty() {
        assert!(matches!(
            parse_edit_kinds("STATEMENT,BOGUS"),
            Err(ConfigError::UnknownEditKind(k)) if k == "BOGUS"
        ));
        assert!(matches!(
            parse_edit_kinds(" , "),
            Err(ConfigError::EmptyEditKinds)
        ));
    }

    #[test]
    fn test_display_round_trips_builtin() {
        for kind in EditKind::BUILTIN {
            assert_eq!(kind.to_string().parse::<EditKind>().unwrap(), kind);
        }
    }
}
