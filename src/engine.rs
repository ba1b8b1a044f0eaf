//! The patch engine: ordered textual rules folded over a source text.
//!
//! All transformations compile down to two primitives: literal substring
//! replacement and regex replacement, both with standard non-overlapping
//! global semantics. The engine is a pure function over text; file I/O
//! lives in [`crate::source`].

use regex::Regex;
use thiserror::Error;

/// One ordered transformation step.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Replace every non-overlapping occurrence of `find` with `replace`,
    /// left to right.
    Literal {
        id: String,
        find: String,
        replace: String,
    },
    /// Replace every non-overlapping match of `pattern` with the template
    /// `replace`. The template may reference capture groups (`$1`,
    /// `${name}`); a literal dollar is written `$$`.
    Pattern {
        id: String,
        pattern: Regex,
        replace: String,
    },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("rule '{id}' has an empty find string")]
    EmptyFind { id: String },

    #[error("rule '{id}' has an invalid pattern")]
    BadPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("rules matched nothing: {}", ids.join(", "))]
    UnmatchedRules { ids: Vec<String> },
}

impl Rule {
    /// Create a literal rule. Fails if `find` is empty, since an empty
    /// needle would match at every position.
    pub fn literal(
        id: impl Into<String>,
        find: impl Into<String>,
        replace: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        let find = find.into();
        if find.is_empty() {
            return Err(EngineError::EmptyFind { id });
        }
        Ok(Rule::Literal {
            id,
            find,
            replace: replace.into(),
        })
    }

    /// Create a pattern rule, compiling `pattern` eagerly so a malformed
    /// regex fails at authoring time rather than mid-run.
    pub fn pattern(
        id: impl Into<String>,
        pattern: &str,
        replace: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        let pattern = Regex::new(pattern).map_err(|source| EngineError::BadPattern {
            id: id.clone(),
            source,
        })?;
        Ok(Rule::Pattern {
            id,
            pattern,
            replace: replace.into(),
        })
    }

    pub fn id(&self) -> &str {
        match self {
            Rule::Literal { id, .. } | Rule::Pattern { id, .. } => id,
        }
    }

    /// Apply this rule to `text`, returning the new text and how many
    /// replacements occurred. Zero matches returns the input unchanged.
    fn apply(&self, text: &str) -> (String, usize) {
        match self {
            Rule::Literal { find, replace, .. } => {
                let count = text.matches(find.as_str()).count();
                if count == 0 {
                    (text.to_string(), 0)
                } else {
                    (text.replace(find.as_str(), replace), count)
                }
            }
            Rule::Pattern {
                pattern, replace, ..
            } => {
                let count = pattern.find_iter(text).count();
                if count == 0 {
                    (text.to_string(), 0)
                } else {
                    (pattern.replace_all(text, replace.as_str()).into_owned(), count)
                }
            }
        }
    }

    /// Best-effort check that the rule's effect is already present in `text`.
    ///
    /// Used to tell "already patched" apart from "target pattern changed and
    /// the rule is now broken" when a rule matches nothing. Only meaningful
    /// for replacements without capture references, so templates containing
    /// `$` are never considered already applied.
    fn already_applied(&self, text: &str) -> bool {
        match self {
            Rule::Literal { replace, .. } => !replace.is_empty() && text.contains(replace.as_str()),
            Rule::Pattern { replace, .. } => {
                !replace.is_empty() && !replace.contains('$') && text.contains(replace.as_str())
            }
        }
    }
}

/// An ordered rule list. Order is significant: later rules run against the
/// text shape produced by earlier rules and are never reordered.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Result of applying a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RuleOutcome should be checked for applied/no-match"]
pub enum RuleOutcome {
    /// At least one replacement occurred.
    Applied { replacements: usize },
    /// Zero matches, but the rule's replacement text is already present.
    AlreadyApplied,
    /// Zero matches and no evidence the rule's effect is present.
    NoMatch,
}

/// Per-rule record in an [`Applied`] report, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub id: String,
    pub outcome: RuleOutcome,
}

/// The outcome of a full engine pass: final text plus one report per rule.
#[derive(Debug, Clone)]
#[must_use = "Applied carries the transformed text"]
pub struct Applied {
    pub text: String,
    pub reports: Vec<RuleReport>,
}

impl Applied {
    /// Ids of rules that matched nothing and show no sign of a prior apply.
    pub fn unmatched(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| r.outcome == RuleOutcome::NoMatch)
            .map(|r| r.id.as_str())
            .collect()
    }

    /// True when no rule changed the text.
    pub fn is_noop(&self) -> bool {
        self.reports
            .iter()
            .all(|r| !matches!(r.outcome, RuleOutcome::Applied { .. }))
    }
}

/// Apply `rules` to `text` in order.
///
/// Pure and deterministic: repeated calls with the same inputs yield the same
/// output. A rule that matches nothing leaves the text unchanged for that
/// step; this is not an error (best-effort patching of partially-applied
/// batches is the point). Strict callers use [`require_all_applied`].
pub fn apply(text: &str, rules: &RuleSet) -> Applied {
    let mut current = text.to_string();
    let mut reports = Vec::with_capacity(rules.len());

    for rule in rules.iter() {
        let (next, replacements) = rule.apply(&current);
        let outcome = if replacements > 0 {
            RuleOutcome::Applied { replacements }
        } else if rule.already_applied(&current) {
            RuleOutcome::AlreadyApplied
        } else {
            RuleOutcome::NoMatch
        };
        reports.push(RuleReport {
            id: rule.id().to_string(),
            outcome,
        });
        current = next;
    }

    Applied {
        text: current,
        reports,
    }
}

/// Opt-in strict mode: fail if any rule reported [`RuleOutcome::NoMatch`].
///
/// `AlreadyApplied` passes, so re-running over an already-patched file is
/// still accepted under `--strict`.
pub fn require_all_applied(reports: &[RuleReport]) -> Result<(), EngineError> {
    let ids: Vec<String> = reports
        .iter()
        .filter(|r| r.outcome == RuleOutcome::NoMatch)
        .map(|r| r.id.clone())
        .collect();

    if ids.is_empty() {
        Ok(())
    } else {
        Err(EngineError::UnmatchedRules { ids })
    }
}
