//! Legacy flat-field name classification.
//!
//! The old single-field configuration surface addresses rule lists with names
//! like `BiliTitleKeywords` or `YtbUsersWhiteList`. This shim resolves such a
//! name into a typed (platform, category) pair at the legacy boundary; new
//! code routes through `Platform`/`Category` directly.

use super::schema::{Category, Platform};

pub fn platform_of(field: &str) -> Option<Platform> {
    if field.contains("Bili") {
        Some(Platform::Bilibili)
    } else if field.contains("Ytb") {
        Some(Platform::Youtube)
    } else if field.contains("Twitter") {
        Some(Platform::Twitter)
    } else {
        None
    }
}

pub fn category_of(field: &str) -> Option<Category> {
    if field.contains("Title") {
        Some(Category::Keywords)
    } else if field.contains("UsersWhite") {
        Some(Category::Whitelist)
    } else if field.contains("Users") && !field.contains("White") {
        // Whitelist fields also contain "Users"; they must never land here.
        Some(Category::Blacklist)
    } else {
        None
    }
}

pub fn classify(field: &str) -> Option<(Platform, Category)> {
    Some((platform_of(field)?, category_of(field)?))
}
