use crate::rules::{Category, MatcherSet, Platform, RuleSet};
use arc_swap::ArcSwap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Shared read side of the service.
///
/// The sync loop is the single writer: after a successful sync it swaps in a
/// freshly compiled `MatcherSet` and replaces the rule snapshot. Readers (the
/// API, the filtering path) only ever see complete states.
#[derive(Clone)]
pub struct FilterState {
    matchers: Arc<ArcSwap<MatcherSet>>,
    rules: Arc<RwLock<RuleSet>>,
    // If Some(Instant), filtering is paused until that instant.
    paused_until: Arc<RwLock<Option<Instant>>>,
}

impl FilterState {
    pub fn new(rules: RuleSet, matchers: MatcherSet) -> Self {
        Self {
            matchers: Arc::new(ArcSwap::from_pointee(matchers)),
            rules: Arc::new(RwLock::new(rules)),
            paused_until: Arc::new(RwLock::new(None)),
        }
    }

    pub fn update(&self, rules: RuleSet, matchers: MatcherSet) {
        self.matchers.store(Arc::new(matchers));
        *self.rules.write().unwrap() = rules;
    }

    pub fn rules_snapshot(&self) -> RuleSet {
        self.rules.read().unwrap().clone()
    }

    pub fn matchers(&self) -> Arc<MatcherSet> {
        self.matchers.load_full()
    }

    /// Honors the pause window: while paused nothing matches.
    pub fn check(&self, platform: Platform, category: Category, text: &str) -> bool {
        if !self.is_filtering_active() {
            return false;
        }
        self.matchers.load().is_match(platform, category, text)
    }

    /// Legacy flat-field entry point for the same check.
    pub fn check_field(&self, field: &str, text: &str) -> bool {
        if !self.is_filtering_active() {
            return false;
        }
        self.matchers
            .load()
            .for_field(field)
            .map(|matcher| matcher.is_match(text))
            .unwrap_or(false)
    }

    pub fn is_filtering_active(&self) -> bool {
        let guard = self.paused_until.read().unwrap();
        if let Some(until) = *guard {
            if Instant::now() < until {
                return false;
            }
        }
        true
    }

    pub fn pause_filtering(&self, duration: std::time::Duration) {
        let mut guard = self.paused_until.write().unwrap();
        *guard = Some(Instant::now() + duration);
    }

    pub fn resume_filtering(&self) {
        let mut guard = self.paused_until.write().unwrap();
        *guard = None;
    }

    pub fn get_pause_remaining_secs(&self) -> Option<u64> {
        let guard = self.paused_until.read().unwrap();
        if let Some(until) = *guard {
            let now = Instant::now();
            if until > now {
                return Some(until.duration_since(now).as_secs());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_state() -> FilterState {
        let mut rules = RuleSet::new();
        rules.normalize();
        rules
            .platform_mut(Platform::Twitter)
            .blacklist
            .push("spambot".to_string());
        let matchers = MatcherSet::build(&rules).unwrap();
        FilterState::new(rules, matchers)
    }

    #[test]
    fn test_check_and_pause_window() {
        let state = sample_state();
        assert!(state.check(Platform::Twitter, Category::Blacklist, "SpamBot99"));

        state.pause_filtering(Duration::from_secs(60));
        assert!(!state.is_filtering_active());
        assert!(!state.check(Platform::Twitter, Category::Blacklist, "SpamBot99"));
        assert!(state.get_pause_remaining_secs().is_some());

        state.resume_filtering();
        assert!(state.is_filtering_active());
        assert!(state.check_field("TwitterUsersList", "SpamBot99"));
    }

    #[test]
    fn test_update_swaps_matchers() {
        let state = sample_state();

        let mut rules = RuleSet::new();
        rules.normalize();
        rules
            .platform_mut(Platform::Bilibili)
            .keywords
            .push("gacha".to_string());
        let matchers = MatcherSet::build(&rules).unwrap();
        state.update(rules, matchers);

        assert!(!state.check(Platform::Twitter, Category::Blacklist, "spambot"));
        assert!(state.check(Platform::Bilibili, Category::Keywords, "gacha stream"));
    }
}
