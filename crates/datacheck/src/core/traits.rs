//! The dialect capability.
//!
//! # Design Pattern
//!
//! [`Dialect`] is a **Strategy**: each database engine supplies its own
//! identifier quoting and predicate rewriting. Callers hold a
//! [`DialectImpl`](crate::drivers::DialectImpl) chosen once per extraction
//! context and never branch on the database type themselves.

/// SQL text strategy for different database engines.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "mysql", "opengauss").
    fn name(&self) -> &str;

    /// Quote an identifier (table name, column name, etc.).
    ///
    /// - MySQL: `` `identifier` ``
    /// - openGauss: `"identifier"`
    /// - MSSQL: `[identifier]`
    fn quote_ident(&self, name: &str) -> String;

    /// Rewrite a predicate written with backtick-quoted identifiers into
    /// this dialect's quoting. Single-quoted string literals are left alone.
    fn convert_condition(&self, condition: &str) -> String;

    /// Qualify a table name with its schema.
    fn qualify(&self, schema: &str, table: &str) -> String {
        format!("{}.{}", self.quote_ident(schema), self.quote_ident(table))
    }
}

/// Rewrite backtick-quoted identifiers in `condition` using `open`/`close`
/// delimiters, escaping any delimiter already present inside an identifier.
///
/// Text inside single-quoted literals (with `''` escapes) is copied verbatim.
pub fn rewrite_backtick_quotes(condition: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(condition.len() + 8);
    let mut chars = condition.chars().peekable();
    let mut in_literal = false;
    let mut in_ident = false;

    while let Some(c) = chars.next() {
        if in_literal {
            out.push(c);
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    out.push('\'');
                    chars.next();
                } else {
                    in_literal = false;
                }
            }
            continue;
        }

        if in_ident {
            if c == '`' {
                if chars.peek() == Some(&'`') {
                    // Doubled backtick is a literal backtick in the name.
                    out.push('`');
                    chars.next();
                } else {
                    out.push(close);
                    in_ident = false;
                }
            } else if c == close {
                out.push(close);
                out.push(close);
            } else {
                out.push(c);
            }
            continue;
        }

        match c {
            '\'' => {
                in_literal = true;
                out.push(c);
            }
            '`' => {
                in_ident = true;
                out.push(open);
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_simple() {
        assert_eq!(
            rewrite_backtick_quotes("`id` > 10 AND `name` = 'x'", '"', '"'),
            r#""id" > 10 AND "name" = 'x'"#
        );
    }

    #[test]
    fn test_rewrite_leaves_literals_alone() {
        assert_eq!(
            rewrite_backtick_quotes("`note` = 'it''s `raw`'", '[', ']'),
            "[note] = 'it''s `raw`'"
        );
    }

    #[test]
    fn test_rewrite_escapes_close_delimiter() {
        assert_eq!(
            rewrite_backtick_quotes("`a\"b` = 1", '"', '"'),
            r#""a""b" = 1"#
        );
        assert_eq!(rewrite_backtick_quotes("`a]b` = 1", '[', ']'), "[a]]b] = 1");
    }

    #[test]
    fn test_rewrite_doubled_backtick() {
        assert_eq!(rewrite_backtick_quotes("`a``b` = 1", '"', '"'), "\"a`b\" = 1");
    }

    #[test]
    fn test_rewrite_without_identifiers() {
        assert_eq!(rewrite_backtick_quotes("1 = 1", '"', '"'), "1 = 1");
        assert_eq!(rewrite_backtick_quotes("", '"', '"'), "");
    }
}
