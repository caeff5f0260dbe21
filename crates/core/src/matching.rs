//! Entry matcher
//!
//! Decides which button, if any, claims the running entry. A button claims
//! an entry when the workspace/project/task triple is equal (structural
//! match) and either the description equals the button's activity or the
//! button is in fallback mode. A fallback button also claims any entry no
//! other button matches structurally, which makes it the catch-all for
//! work started outside the deck.

use toggldeck_domain::{Button, MatchResult, RemoteEntry};

/// Workspace, project and task are all equal. Absent project or task
/// compare as `0`.
pub fn structural_match(entry: &RemoteEntry, button: &Button) -> bool {
    entry.scope() == button.scope()
}

/// Structural match plus description (or fallback mode).
pub fn exact_match(entry: &RemoteEntry, button: &Button) -> bool {
    structural_match(entry, button) && (button.is_fallback() || entry.description == button.activity)
}

/// How `button` relates to `entry` given every registered button.
///
/// `all_buttons` may include `button` itself; it is skipped when looking
/// for structural claims by other buttons.
pub fn classify<'a, I>(entry: Option<&RemoteEntry>, button: &Button, all_buttons: I) -> MatchResult
where
    I: IntoIterator<Item = &'a Button>,
{
    let Some(entry) = entry else {
        return MatchResult::None;
    };

    if exact_match(entry, button) {
        return MatchResult::Exact;
    }

    if !button.is_fallback() {
        return MatchResult::None;
    }

    let claimed_elsewhere = all_buttons
        .into_iter()
        .any(|other| other.id != button.id && structural_match(entry, other));

    if claimed_elsewhere {
        MatchResult::None
    } else {
        MatchResult::Fallback
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use toggldeck_domain::{ApiToken, ButtonId, TrackingMode};

    use super::*;

    fn button(id: &str, project: Option<u64>, activity: &str, mode: TrackingMode) -> Button {
        Button {
            id: ButtonId::from(id),
            credential: ApiToken::new("tok").unwrap(),
            workspace_id: Some(5),
            project_id: project,
            task_id: None,
            activity: activity.to_string(),
            label: String::new(),
            billable: false,
            tracking_mode: mode,
            poll_frequency: Duration::from_secs(600),
        }
    }

    fn entry(project: Option<u64>, description: &str) -> RemoteEntry {
        RemoteEntry {
            id: 1,
            workspace_id: 5,
            project_id: project,
            task_id: None,
            description: description.to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            stop: None,
            billable: false,
        }
    }

    #[test]
    fn no_entry_never_matches() {
        let a = button("a", Some(10), "Coding", TrackingMode::Fallback);
        assert_eq!(classify(None, &a, [&a]), MatchResult::None);
    }

    #[test]
    fn scope_and_description_give_exact() {
        let a = button("a", Some(10), "Coding", TrackingMode::Exact);
        let e = entry(Some(10), "Coding");
        assert_eq!(classify(Some(&e), &a, [&a]), MatchResult::Exact);
    }

    #[test]
    fn description_mismatch_is_none_in_exact_mode() {
        let a = button("a", Some(10), "Coding", TrackingMode::Exact);
        let e = entry(Some(10), "Review");
        assert_eq!(classify(Some(&e), &a, [&a]), MatchResult::None);
    }

    #[test]
    fn fallback_ignores_description_when_scope_matches() {
        let a = button("a", Some(10), "Coding", TrackingMode::Fallback);
        let e = entry(Some(10), "Review");
        assert_eq!(classify(Some(&e), &a, [&a]), MatchResult::Exact);
    }

    #[test]
    fn absent_project_equals_zero() {
        let a = button("a", None, "", TrackingMode::Exact);
        let e = entry(Some(0), "");
        assert!(structural_match(&e, &a));
    }

    #[test]
    fn fallback_claims_unclaimed_entries() {
        let fallback = button("f", Some(77), "Misc", TrackingMode::Fallback);
        let exact = button("a", Some(10), "Coding", TrackingMode::Exact);
        let e = entry(Some(42), "Something else");

        assert_eq!(classify(Some(&e), &fallback, [&fallback, &exact]), MatchResult::Fallback);
        assert_eq!(classify(Some(&e), &exact, [&fallback, &exact]), MatchResult::None);
    }

    #[test]
    fn structural_claim_by_another_button_blocks_fallback() {
        let fallback = button("f", Some(77), "Misc", TrackingMode::Fallback);
        let exact = button("a", Some(10), "Coding", TrackingMode::Exact);
        // Same scope as `exact` but a different description: nobody matches
        // exactly, yet the fallback must stay out of it.
        let e = entry(Some(10), "Review");

        assert_eq!(classify(Some(&e), &exact, [&fallback, &exact]), MatchResult::None);
        assert_eq!(classify(Some(&e), &fallback, [&fallback, &exact]), MatchResult::None);
    }
}
