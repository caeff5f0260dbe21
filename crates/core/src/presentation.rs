//! What a button shows for a match outcome

use chrono::{DateTime, Utc};
use toggldeck_domain::constants::{TITLE_SEPARATOR, UNNAMED_ENTRY_LABEL};
use toggldeck_domain::{Button, ButtonState, ButtonVisual, MatchResult, RemoteEntry};

/// `MM:SS` below an hour, `HH:MM:SS` from an hour on, every field padded
/// to two digits.
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours == 0 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Visual for `button` given how it relates to `entry`.
///
/// An exact match shows the button's own label, a fallback match shows the
/// entry description. Both prefix the elapsed time.
pub fn render(
    result: MatchResult,
    entry: Option<&RemoteEntry>,
    button: &Button,
    now: DateTime<Utc>,
) -> ButtonVisual {
    let Some(entry) = entry.filter(|_| result.is_match()) else {
        return ButtonVisual {
            state: ButtonState::Inactive,
            title: button.display_label().to_string(),
        };
    };

    let elapsed = format_elapsed(entry.elapsed_secs(now));
    let label = match result {
        MatchResult::Fallback if entry.description.is_empty() => UNNAMED_ENTRY_LABEL,
        MatchResult::Fallback => entry.description.as_str(),
        _ => button.display_label(),
    };

    ButtonVisual { state: ButtonState::Active, title: format!("{elapsed}{TITLE_SEPARATOR}{label}") }
}
