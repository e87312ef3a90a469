use super::schema::{Category, Platform, PlatformRules, RemotePayload, RuleSet};
use crate::error::{SyncError, SyncResult};

/// Counts for one merge pass. Entries replaced in place under overwrite mode
/// are deliberately counted in neither bucket; the totals here match what the
/// published rule feed has always reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: usize,
    pub skipped: usize,
}

/// Merges a fetched rule document into the local rule set.
///
/// Fails with `InvalidRemoteFormat` before touching `local` when the payload
/// has no `blockRules` field. Otherwise normalizes `local` and walks every
/// known platform present in the remote document:
///
/// - remote entries are trimmed; empty ones are dropped
/// - an entry with no case-insensitive local counterpart is appended
/// - a duplicate is skipped, keeping the user's original casing, unless
///   `overwrite_existing` replaces the local text with the remote one
///
/// Platforms absent from the remote document are left untouched, and a
/// malformed single platform branch is skipped rather than failing the pass.
pub fn merge(
    local: &mut RuleSet,
    remote: &RemotePayload,
    overwrite_existing: bool,
) -> SyncResult<MergeOutcome> {
    let block_rules = remote
        .block_rules
        .as_ref()
        .ok_or(SyncError::InvalidRemoteFormat)?;

    local.normalize();

    let mut outcome = MergeOutcome::default();
    let Some(platforms) = block_rules.as_object() else {
        return Ok(outcome);
    };

    for platform in Platform::ALL {
        let Some(value) = platforms.get(platform.as_str()) else {
            continue;
        };
        let Ok(remote_rules) = serde_json::from_value::<PlatformRules>(value.clone()) else {
            continue;
        };

        let local_rules = local.platform_mut(platform);
        for category in Category::ALL {
            merge_list(
                local_rules.category_mut(category),
                remote_rules.category(category),
                overwrite_existing,
                &mut outcome,
            );
        }
    }

    Ok(outcome)
}

fn merge_list(
    local: &mut Vec<String>,
    remote: &[String],
    overwrite_existing: bool,
    outcome: &mut MergeOutcome,
) {
    for entry in remote {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }

        let folded = trimmed.to_lowercase();
        let existing = local
            .iter()
            .position(|rule| rule.trim().to_lowercase() == folded);

        match existing {
            None => {
                local.push(trimmed.to_string());
                outcome.merged += 1;
            }
            Some(idx) if overwrite_existing => {
                // Remote casing wins; intentionally not counted as merged or
                // skipped.
                local[idx] = trimmed.to_string();
            }
            Some(_) => {
                outcome.skipped += 1;
            }
        }
    }
}
