//! Ordered substitution rules for each supported dialect.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::patterns::*;
use super::Dialect;

/// Token substituted for every redacted literal or parameter.
pub const PLACEHOLDER: &str = "?";

/// What a rule puts in place of each match.
#[derive(Debug)]
pub(crate) enum Replacement {
    /// Fixed text. `$1`-style group references are expanded.
    Fixed(&'static str),
    /// `with`, unless the named group took part in the match, in which case
    /// the match is kept verbatim.
    Unless { group: &'static str, with: &'static str },
    /// Applies `inner` to the matched text only, leaving the rest untouched.
    Scoped {
        inner: &'static Lazy<Regex>,
        with: &'static str,
    },
}

#[derive(Debug)]
pub(crate) struct Rule {
    pattern: &'static Lazy<Regex>,
    replacement: Replacement,
}

impl Rule {
    const fn new(pattern: &'static Lazy<Regex>, replacement: Replacement) -> Self {
        Self {
            pattern,
            replacement,
        }
    }

    /// Compile every pattern the rule touches.
    pub(crate) fn compile(&self) {
        Lazy::force(self.pattern);
        if let Replacement::Scoped { inner, .. } = self.replacement {
            Lazy::force(inner);
        }
    }

    /// Replace every non-overlapping match in `sql`.
    pub(crate) fn apply<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self.replacement {
            Replacement::Fixed(with) => self.pattern.replace_all(sql, with),
            Replacement::Unless { group, with } => {
                self.pattern.replace_all(sql, |caps: &Captures<'_>| {
                    if caps.name(group).is_some() {
                        caps[0].to_string()
                    } else {
                        with.to_string()
                    }
                })
            }
            Replacement::Scoped { inner, with } => {
                self.pattern.replace_all(sql, |caps: &Captures<'_>| {
                    inner.replace_all(&caps[0], with).into_owned()
                })
            }
        }
    }
}

const STRIP_INTEGERS: Replacement = Replacement::Unless {
    group: "limit",
    with: PLACEHOLDER,
};

static MYSQL: [Rule; 6] = [
    Rule::new(&BIND_ECHO, Replacement::Fixed("")),
    Rule::new(&SINGLE_QUOTED_BACKSLASH, Replacement::Fixed(PLACEHOLDER)),
    Rule::new(&DOUBLE_QUOTED_BACKSLASH, Replacement::Fixed(PLACEHOLDER)),
    Rule::new(&INTEGER_UNLESS_LIMIT, STRIP_INTEGERS),
    Rule::new(&IN_LIST, Replacement::Fixed("IN (?)")),
    Rule::new(&PLACEHOLDER_RUN, Replacement::Fixed(PLACEHOLDER)),
];

static POSTGRES: [Rule; 6] = [
    Rule::new(&DOLLAR_PARAM, Replacement::Fixed(PLACEHOLDER)),
    Rule::new(&BIND_ECHO, Replacement::Fixed("")),
    Rule::new(
        &AFTER_WHERE,
        Replacement::Scoped {
            inner: &SINGLE_QUOTED,
            with: PLACEHOLDER,
        },
    ),
    Rule::new(&INTEGER_UNLESS_LIMIT, STRIP_INTEGERS),
    Rule::new(&IN_LIST, Replacement::Fixed("IN (?)")),
    Rule::new(&WHITESPACE_RUN, Replacement::Fixed(" ")),
];

static SQL_SERVER: [Rule; 3] = [
    Rule::new(&EXECUTESQL, Replacement::Fixed("${1}")),
    Rule::new(&INTEGER, Replacement::Fixed(PLACEHOLDER)),
    Rule::new(&IN_LIST_NAMED, Replacement::Fixed("IN (?)")),
];

static SQLITE: [Rule; 4] = [
    Rule::new(&BIND_ECHO, Replacement::Fixed("")),
    Rule::new(&SINGLE_QUOTED, Replacement::Fixed(PLACEHOLDER)),
    Rule::new(&INTEGER_UNLESS_LIMIT, STRIP_INTEGERS),
    Rule::new(&WHITESPACE_RUN, Replacement::Fixed(" ")),
];

/// The rule set for `dialect`, in application order.
pub(crate) fn rules_for(dialect: Dialect) -> &'static [Rule] {
    match dialect {
        Dialect::Mysql => &MYSQL,
        Dialect::Postgres => &POSTGRES,
        Dialect::SqlServer => &SQL_SERVER,
        Dialect::Sqlite => &SQLITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(dialect: Dialect, sql: &str) -> String {
        rules_for(dialect)
            .iter()
            .fold(sql.to_string(), |acc, rule| rule.apply(&acc).into_owned())
    }

    #[test]
    fn test_rule_counts_per_dialect() {
        assert_eq!(rules_for(Dialect::Mysql).len(), 6);
        assert_eq!(rules_for(Dialect::Postgres).len(), 6);
        assert_eq!(rules_for(Dialect::SqlServer).len(), 3);
        assert_eq!(rules_for(Dialect::Sqlite).len(), 4);
    }

    #[test]
    fn test_unmatched_rule_borrows_input() {
        let rule = &rules_for(Dialect::Mysql)[0];
        assert!(matches!(rule.apply("SELECT 1"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_scoped_rule_leaves_prefix_alone() {
        let rule = &rules_for(Dialect::Postgres)[2];
        let out = rule.apply("SELECT 'a' FROM t WHERE b = 'c'");
        assert_eq!(out, "SELECT 'a' FROM t WHERE b = ?");
    }

    #[test]
    fn test_unless_rule_keeps_limit() {
        let rule = &rules_for(Dialect::Sqlite)[2];
        assert_eq!(rule.apply("WHERE id = 4 LIMIT 10"), "WHERE id = ? LIMIT 10");
    }

    #[test]
    fn test_later_rules_see_earlier_output() {
        // Integer stripping runs before the IN collapse, so literal lists collapse too.
        assert_eq!(
            fold(Dialect::Mysql, "WHERE id IN (1, 2, 3)"),
            "WHERE id IN (?)"
        );
    }

    #[test]
    fn test_mysql_placeholder_runs_collapse() {
        assert_eq!(fold(Dialect::Mysql, "VALUES (?,?,?)"), "VALUES (?)");
    }

    #[test]
    fn test_sql_server_unwraps_executesql() {
        let sql = "EXEC sp_executesql N'SELECT TOP (1) [users].* FROM [users] WHERE [users].[id] = @P1', N'@P1 bigint', 42";
        assert_eq!(
            fold(Dialect::SqlServer, sql),
            "SELECT TOP (?) [users].* FROM [users] WHERE [users].[id] = @P1"
        );
    }

    #[test]
    fn test_sql_server_collapses_named_parameter_lists() {
        let sql = "SELECT [t].* FROM [t] WHERE [t].[id] IN (@P1, @P2, @P3)";
        assert_eq!(
            fold(Dialect::SqlServer, sql),
            "SELECT [t].* FROM [t] WHERE [t].[id] IN (?)"
        );
    }
}
