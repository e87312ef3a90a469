pub mod classifier;
mod matcher;
mod merge;
mod schema;

pub use matcher::{compile, MatcherSet, RuleMatcher};
pub use merge::{merge, MergeOutcome};
pub use schema::{Category, Platform, PlatformRules, RemotePayload, RuleSet, StoredRules};
