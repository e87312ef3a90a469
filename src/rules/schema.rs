use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Supported content sources. Closed set; extending it is a coordinated
/// schema change across merge, matcher and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Bilibili,
    Youtube,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Bilibili, Platform::Youtube, Platform::Twitter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Bilibili => "bilibili",
            Platform::Youtube => "youtube",
            Platform::Twitter => "twitter",
        }
    }
}

/// The role a rule list plays: keyword filter on title/body text, author
/// blacklist, or whitelist exceptions that override the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Keywords,
    Blacklist,
    Whitelist,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Keywords, Category::Blacklist, Category::Whitelist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Keywords => "keywords",
            Category::Blacklist => "blacklist",
            Category::Whitelist => "whitelist",
        }
    }
}

/// The three rule lists for one platform.
///
/// Remote documents are untrusted: a category value that is not an array of
/// strings deserializes as an empty list instead of failing the whole
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformRules {
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub blacklist: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub whitelist: Vec<String>,
}

impl PlatformRules {
    pub fn category(&self, category: Category) -> &Vec<String> {
        match category {
            Category::Keywords => &self.keywords,
            Category::Blacklist => &self.blacklist,
            Category::Whitelist => &self.whitelist,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Keywords => &mut self.keywords,
            Category::Blacklist => &mut self.blacklist,
            Category::Whitelist => &mut self.whitelist,
        }
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// The full nested rule collection across all platforms and categories.
///
/// Invariant after `normalize`: every platform key is present and every
/// category holds a list (possibly empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(BTreeMap<Platform, PlatformRules>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills any missing platform branch with empty lists. Idempotent and
    /// infallible.
    pub fn normalize(&mut self) {
        for platform in Platform::ALL {
            self.0.entry(platform).or_default();
        }
    }

    pub fn platform(&self, platform: Platform) -> Option<&PlatformRules> {
        self.0.get(&platform)
    }

    pub fn platform_mut(&mut self, platform: Platform) -> &mut PlatformRules {
        self.0.entry(platform).or_default()
    }

    pub fn rules(&self, platform: Platform, category: Category) -> &[String] {
        self.0
            .get(&platform)
            .map(|rules| rules.category(category).as_slice())
            .unwrap_or(&[])
    }
}

/// Externally published rule document. `block_rules` stays raw JSON until
/// merge time so one malformed platform branch cannot poison the rest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePayload {
    #[serde(default)]
    pub block_rules: Option<serde_json::Value>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Persisted rule document. Mirrors the wire shape so version metadata
/// survives the round trip through storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRules {
    #[serde(default)]
    pub block_rules: RuleSet,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fills_all_branches() {
        let mut rules = RuleSet::new();
        rules.normalize();

        for platform in Platform::ALL {
            let branch = rules.platform(platform).expect("platform branch missing");
            for category in Category::ALL {
                assert!(branch.category(category).is_empty());
            }
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut rules = RuleSet::new();
        rules
            .platform_mut(Platform::Bilibili)
            .keywords
            .push("spoiler".to_string());
        rules.normalize();

        let once = rules.clone();
        rules.normalize();
        assert_eq!(once, rules);
        assert_eq!(rules.rules(Platform::Bilibili, Category::Keywords), ["spoiler"]);
    }

    #[test]
    fn test_lenient_category_decoding() {
        let json = r#"{"keywords": ["a", 42, "b"], "blacklist": "oops"}"#;
        let rules: PlatformRules = serde_json::from_str(json).unwrap();
        assert_eq!(rules.keywords, vec!["a", "b"]);
        assert!(rules.blacklist.is_empty());
        assert!(rules.whitelist.is_empty());
    }

    #[test]
    fn test_stored_rules_round_trip() {
        let mut rules = RuleSet::new();
        rules.normalize();
        rules
            .platform_mut(Platform::Twitter)
            .blacklist
            .push("spam_account".to_string());

        let stored = StoredRules {
            block_rules: rules.clone(),
            version: Some("3".to_string()),
            last_updated: Some("2024-11-02".to_string()),
        };

        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains("blockRules"));
        assert!(json.contains("lastUpdated"));

        let back: StoredRules = serde_json::from_str(&json).unwrap();
        assert_eq!(back.block_rules, rules);
        assert_eq!(back.version.as_deref(), Some("3"));
    }
}
