use chrono::{DateTime, Utc};

use crate::{
    i18n::LanguageTexts,
    settings::Settings,
    timer::{ReminderKind, TimerSnapshot},
};

const MINUTE_MS: i64 = 60_000;

/// Whole minutes left before a reminder armed at `armed_at` fires. Elapsed time is floored, so
/// a timer armed 14.5 minutes ago counts 14 minutes as elapsed.
pub fn remaining_minutes(interval_minutes: i64, armed_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - armed_at).num_milliseconds().div_euclid(MINUTE_MS);
    interval_minutes.saturating_sub(elapsed)
}

fn status_line(
    kind: ReminderKind,
    settings: &Settings,
    texts: &LanguageTexts,
    snapshot: &TimerSnapshot,
    now: DateTime<Utc>,
) -> String {
    let label = match kind {
        ReminderKind::Sit => texts.sit_status,
        ReminderKind::Drink => texts.drink_status,
    };
    if settings.interval_for(kind).is_none() {
        return format!("{label}: {}", texts.disabled);
    }

    let remaining = remaining_minutes(
        settings.interval_minutes(kind),
        snapshot.armed_at(kind),
        now,
    );
    if remaining > 0 {
        format!("{label}: {}", texts.minutes_until(remaining))
    } else {
        format!("{label}: {}", texts.coming_soon)
    }
}

/// Text shown by the status action: a title, a blank line and one line per reminder.
pub fn render_status(
    settings: &Settings,
    texts: &LanguageTexts,
    snapshot: &TimerSnapshot,
    now: DateTime<Utc>,
) -> String {
    format!(
        "{}\n\n{}\n{}",
        texts.status_title,
        status_line(ReminderKind::Sit, settings, texts, snapshot, now),
        status_line(ReminderKind::Drink, settings, texts, snapshot, now),
    )
}
