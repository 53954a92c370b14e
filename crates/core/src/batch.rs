//! Ordered batch of statements parsed from a SQL script.

use crate::split::{is_blank, split_statements, Boundary};

/// Number of characters shown by [`Statement::preview`].
pub const PREVIEW_CHARS: usize = 50;

/// A single statement ready to be sent to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based position among the statements of the batch.
    pub ordinal: usize,
    /// 1-based line of the script on which the statement starts.
    pub line: usize,
    /// Statement text, trimmed, without its terminator.
    pub sql: String,
}

impl Statement {
    /// Single-line summary for progress logs: the first
    /// [`PREVIEW_CHARS`] characters with whitespace runs collapsed,
    /// followed by `...`.
    pub fn preview(&self) -> String {
        let mut preview: String = self
            .sql
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(PREVIEW_CHARS)
            .collect();
        preview.push_str("...");
        preview
    }
}

/// Statements of a script, in file order.
#[derive(Debug, Clone, Default)]
pub struct StatementBatch {
    statements: Vec<Statement>,
    skipped: usize,
}

impl StatementBatch {
    /// Split `sql` and keep every fragment that contains something other
    /// than whitespace and comments.
    pub fn parse(sql: &str, boundary: Boundary) -> Self {
        let mut statements = Vec::new();
        let mut skipped = 0;

        for fragment in split_statements(sql, boundary) {
            let text = fragment.text.trim();
            if is_blank(text) {
                // Trailing whitespace after the final terminator is not
                // worth reporting.
                if !text.is_empty() {
                    skipped += 1;
                }
                continue;
            }

            let leading = fragment.text.len() - fragment.text.trim_start().len();
            let start = fragment.offset + leading;
            let line = sql[..start].matches('\n').count() + 1;

            statements.push(Statement {
                ordinal: statements.len() + 1,
                line,
                sql: text.to_string(),
            });
        }

        Self {
            statements,
            skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Number of comment-only fragments that were dropped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for &'a StatementBatch {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
