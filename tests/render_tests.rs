use rhourtracker::models::{Session, User};
use rhourtracker::ui::render::{render_roster, render_sessions, render_status, status_line};
use rhourtracker::utils::date::ordinal;
use rhourtracker::utils::formatting::{mask_identity, single_line, truncate_note};
use rhourtracker::utils::table::visible_width;

mod common;
use common::T0;

fn ada_with(sessions: Vec<Session>) -> User {
    let mut ada = User::new("Ada", "ada-pw");
    ada.sessions = sessions;
    ada.total_time_seconds = ada.computed_total();
    ada
}

#[test]
fn test_truncate_note_at_preview_length() {
    let long = "x".repeat(300);
    let cut = truncate_note(&long, 250);
    assert_eq!(cut.chars().count(), 253);
    assert!(cut.ends_with("..."));

    let exact = "y".repeat(250);
    assert_eq!(truncate_note(&exact, 250), exact);

    // multi-byte characters are never split
    let accents = "é".repeat(260);
    assert_eq!(truncate_note(&accents, 250).chars().count(), 253);
}

#[test]
fn test_single_line_and_mask() {
    assert_eq!(single_line("wired\nthe   drivetrain\n"), "wired the drivetrain");
    assert_eq!(mask_identity("ada-pw"), "****pw");
    assert_eq!(mask_identity("ab"), "**");
}

#[test]
fn test_ordinals() {
    let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 31]
        .into_iter()
        .map(ordinal)
        .collect();
    assert_eq!(
        got,
        vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd", "31st"]
    );
}

#[test]
fn test_sessions_render_newest_first_with_preview() {
    let long_note = "z".repeat(400);
    let ada = ada_with(vec![
        Session::new(T0 - 86_400, 1800, "older work"),
        Session::new(T0 - 3600, 5400, long_note.clone()),
    ]);

    let out = render_sessions(&ada, false);
    let newer = out.find("01:30:00").unwrap();
    let older = out.find("00:30:00").unwrap();
    assert!(newer < older);
    assert!(out.contains(&format!("{}...", "z".repeat(250))));
    assert!(!out.contains(&long_note));

    let full = render_sessions(&ada, true);
    assert!(full.contains(&long_note));
}

#[test]
fn test_sessions_render_empty() {
    let out = render_sessions(&User::new("Ada", "ada-pw"), false);
    assert!(out.contains("No sessions yet."));
}

#[test]
fn test_status_shows_session_time_only_when_open() {
    let mut ada = ada_with(vec![Session::new(T0 - 3600, 3600, "work")]);

    let closed = render_status(&ada, &[], T0);
    assert!(closed.contains("Not Signed In"));
    assert!(closed.contains("Total Time:   01:00:00"));
    assert!(!closed.contains("Session Time"));
    assert!(closed.contains("Nobody else is signed in."));

    ada.signed_in = true;
    ada.last_transition_time = T0;
    let mut grace = User::new("Grace", "grace-pw");
    grace.signed_in = true;
    grace.last_transition_time = T0 - 120;

    let open = render_status(&ada, &[&grace], T0 + 65);
    assert!(open.contains("Session Time: 00:01:05"));
    assert!(open.contains("Grace"));
    assert!(open.contains("00:03:05"));
}

#[test]
fn test_status_line_clamps_clock_skew() {
    let mut ada = User::new("Ada", "ada-pw");
    ada.signed_in = true;
    ada.last_transition_time = T0 + 30;

    assert_eq!(
        status_line(&ada, 2, T0),
        "Ada | signed in | session 00:00:00 | 2 other(s) in"
    );
}

#[test]
fn test_roster_flagged_filter() {
    let mut flagged = Session::new(T0 - 3600, 600, "suspicious");
    flagged.flagged = true;
    let ada = ada_with(vec![Session::new(T0 - 86_400, 1800, "fine"), flagged]);
    let grace = User::new("Grace", "grace-pw");

    let all = render_roster(&[ada.clone(), grace.clone()], false);
    assert!(all.contains("Grace"));
    assert!(all.contains("fine"));

    let only = render_roster(&[ada, grace], true);
    assert!(only.contains("suspicious"));
    assert!(!only.contains("fine"));
    assert!(!only.contains("Grace"));
}

#[test]
fn test_visible_width_ignores_ansi() {
    assert_eq!(visible_width("\x1b[1mAda\x1b[0m"), 3);
}
