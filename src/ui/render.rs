//! Text rendering of store state for the terminal.

use crate::models::User;
use crate::utils::colors::{dim, flag_marker, presence_label};
use crate::utils::date::{clock_label, day_label};
use crate::utils::formatting::{NOTE_PREVIEW_CHARS, bold, single_line, truncate_note};
use crate::utils::table::{Column, Table};
use crate::utils::time::{elapsed_since, format_duration};

/// Headline block: presence, name, session or total time.
pub fn render_status(user: &User, others: &[&User], now: i64) -> String {
    let mut out = String::new();
    out.push_str(&presence_label(user.signed_in));
    out.push('\n');
    out.push_str(&format!("Name:         {}\n", bold(&user.name)));

    if let Some(elapsed) = user.open_session_elapsed(now) {
        out.push_str(&format!("Session Time: {}\n", format_duration(elapsed)));
    }
    out.push_str(&format!(
        "Total Time:   {}\n",
        format_duration(user.total_time_seconds)
    ));

    out.push('\n');
    out.push_str(&render_active_members(others, now));
    out
}

/// Single line used by `watch`.
pub fn status_line(user: &User, others_in: usize, now: i64) -> String {
    let time = match user.open_session_elapsed(now) {
        Some(elapsed) => format!("session {}", format_duration(elapsed)),
        None => format!("total {}", format_duration(user.total_time_seconds)),
    };
    format!(
        "{} | {} | {} | {} other(s) in",
        user.name,
        user.presence().as_str(),
        time,
        others_in
    )
}

/// Who else is signed in and for how long.
pub fn render_active_members(others: &[&User], now: i64) -> String {
    if others.is_empty() {
        return format!("{}\n", dim("Nobody else is signed in."));
    }

    let mut table = Table::new(vec![Column::new("Also signed in"), Column::new("For")]);
    for u in others {
        table.add_row(vec![
            u.name.clone(),
            format_duration(elapsed_since(u.last_transition_time, now)),
        ]);
    }
    table.render()
}

/// Past sessions, newest first.
pub fn render_sessions(user: &User, full_notes: bool) -> String {
    if user.sessions.is_empty() {
        return format!("{}\n", dim("No sessions yet."));
    }

    let mut table = Table::new(vec![
        Column::new("Date"),
        Column::new("Time"),
        Column::new("Length"),
        Column::new("Flag"),
        Column::new("What you did"),
    ]);

    for s in user.sessions_newest_first() {
        let start = s.start_timestamp();
        let note = single_line(&s.note);
        let note = if full_notes {
            note
        } else {
            truncate_note(&note, NOTE_PREVIEW_CHARS)
        };
        table.add_row(vec![
            day_label(start),
            format!("{} - {}", clock_label(start), clock_label(s.end_timestamp)),
            format_duration(s.duration_seconds),
            flag_marker(s.flagged),
            note,
        ]);
    }
    table.render()
}

/// Administrator overview of every record.
pub fn render_roster(roster: &[User], flagged_only: bool) -> String {
    let mut out = String::new();

    for user in roster {
        let sessions: Vec<_> = user
            .sessions_newest_first()
            .filter(|s| !flagged_only || s.flagged)
            .collect();
        if flagged_only && sessions.is_empty() {
            continue;
        }

        out.push_str(&format!(
            "{} ({}) total {}\n",
            bold(&user.name),
            user.presence().as_str(),
            format_duration(user.total_time_seconds)
        ));

        let mut table = Table::new(vec![
            Column::new("End"),
            Column::new("Start"),
            Column::new("Length"),
            Column::new("Flag"),
            Column::new("Note"),
        ]);
        for s in sessions {
            table.add_row(vec![
                s.end_timestamp.to_string(),
                format!("{} {}", day_label(s.start_timestamp()), clock_label(s.start_timestamp())),
                format_duration(s.duration_seconds),
                flag_marker(s.flagged),
                truncate_note(&single_line(&s.note), 60),
            ]);
        }
        out.push_str(&table.render());
        out.push('\n');
    }

    if out.is_empty() {
        out.push_str(&format!("{}\n", dim("No matching records.")));
    }
    out
}
