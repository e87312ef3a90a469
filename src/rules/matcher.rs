use super::classifier;
use super::schema::{Category, Platform, RuleSet};
use crate::error::SyncResult;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashMap;

/// Compiled case-insensitive alternation over one rule list. Matches when any
/// entry occurs as a substring of the candidate text.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    pattern: Regex,
}

impl RuleMatcher {
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Compiles a rule list into a matcher.
///
/// Empty and whitespace-only entries are dropped first; an empty result means
/// "no matcher" and callers must treat that as "do not filter on this list".
/// Every entry is escaped, so rule text is always matched literally.
pub fn compile(rules: &[String]) -> SyncResult<Option<RuleMatcher>> {
    let escaped: Vec<String> = rules
        .iter()
        .map(|rule| rule.trim())
        .filter(|rule| !rule.is_empty())
        .map(regex::escape)
        .collect();

    if escaped.is_empty() {
        return Ok(None);
    }

    let pattern = RegexBuilder::new(&escaped.join("|"))
        .case_insensitive(true)
        .build()?;
    Ok(Some(RuleMatcher { pattern }))
}

/// All nine platform/category matchers compiled from one rule set.
///
/// Built once after every successful sync and swapped into the running
/// service; lookups on the filtering path are map reads only.
#[derive(Debug, Default)]
pub struct MatcherSet {
    matchers: FxHashMap<(Platform, Category), RuleMatcher>,
}

impl MatcherSet {
    pub fn build(rules: &RuleSet) -> SyncResult<Self> {
        let mut matchers = FxHashMap::default();
        for platform in Platform::ALL {
            for category in Category::ALL {
                if let Some(matcher) = compile(rules.rules(platform, category))? {
                    matchers.insert((platform, category), matcher);
                }
            }
        }
        Ok(Self { matchers })
    }

    pub fn get(&self, platform: Platform, category: Category) -> Option<&RuleMatcher> {
        self.matchers.get(&(platform, category))
    }

    /// Absent matcher means the list is empty: nothing to filter.
    pub fn is_match(&self, platform: Platform, category: Category, text: &str) -> bool {
        self.get(platform, category)
            .map(|matcher| matcher.is_match(text))
            .unwrap_or(false)
    }

    /// Resolves a legacy flat field name and returns its matcher, if the name
    /// is recognized and the list compiled to one.
    pub fn for_field(&self, field: &str) -> Option<&RuleMatcher> {
        let (platform, category) = classifier::classify(field)?;
        self.get(platform, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_compile_escapes_metacharacters() {
        let matcher = compile(&list(&["a.b", ""])).unwrap().expect("matcher");
        assert!(matcher.is_match("xx a.b yy"));
        assert!(!matcher.is_match("aXb"));
    }

    #[test]
    fn test_compile_empty_list_yields_no_matcher() {
        assert!(compile(&[]).unwrap().is_none());
        assert!(compile(&list(&["", "   "])).unwrap().is_none());
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let matcher = compile(&list(&["SpOiLeR"])).unwrap().expect("matcher");
        assert!(matcher.is_match("huge spoiler inside"));
        assert!(matcher.is_match("SPOILERS AHEAD"));
        assert!(!matcher.is_match("spoil"));
    }

    #[test]
    fn test_matcher_set_lookup_and_field_path() {
        let mut rules = RuleSet::new();
        rules.normalize();
        rules
            .platform_mut(Platform::Bilibili)
            .keywords
            .push("gacha".to_string());

        let set = MatcherSet::build(&rules).unwrap();
        assert!(set.is_match(Platform::Bilibili, Category::Keywords, "Gacha pull video"));
        assert!(!set.is_match(Platform::Youtube, Category::Keywords, "Gacha pull video"));

        assert!(set.for_field("BiliRoomTitle").is_some());
        // Recognized name, empty list: no matcher, caller must not filter.
        assert!(set.for_field("BiliUsersList").is_none());
        assert!(set.for_field("SomethingElse").is_none());
    }
}
