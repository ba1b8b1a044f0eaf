//! Webhook Patcher: one-shot textual patcher for `server/webhook.ts`.
//!
//! # Architecture
//!
//! The whole system is a pure patch engine plus glue. [`engine::apply`]
//! folds an ordered [`RuleSet`] over a source text; each [`Rule`] is either
//! a literal substring replacement or a regex replacement with standard
//! non-overlapping global semantics. File I/O lives in [`source`], the fixed
//! rule list for webhook.ts in [`rules`].
//!
//! # Leniency
//!
//! A rule that matches nothing is not an error: the engine reports it as
//! [`RuleOutcome::NoMatch`] (or [`RuleOutcome::AlreadyApplied`] when the
//! rule's effect is already present) and moves on. Strict callers turn
//! `NoMatch` into a failure with [`require_all_applied`].
//!
//! # Example
//!
//! ```
//! use webhook_patcher::{apply, Rule, RuleSet};
//!
//! let rules = RuleSet::new(vec![
//!     Rule::literal("rename", "foo()", "bar()").unwrap(),
//! ]);
//! let result = apply("call foo();", &rules);
//! assert_eq!(result.text, "call bar();");
//! ```

pub mod engine;
pub mod rules;
pub mod source;

// Re-exports
pub use engine::{
    apply, require_all_applied, Applied, EngineError, Rule, RuleOutcome, RuleReport, RuleSet,
};
pub use rules::{webhook_rules, DEFAULT_TARGET};
pub use source::SourceError;
