//! Filtering and text rendering of the matched dataset.
//!
//! Both filters run over the already-fetched match list from one sync; no
//! request leaves the process here.

use chrono::{NaiveDate, TimeZone, Utc};
use chronosnap_core::{ItemKind, ItemTime, Match};
use std::fmt::Write as _;

/// Keeps matches whose item text contains the term, case-insensitively.
///
/// The term is checked against the summary, description, category label,
/// task list title, and task status.
pub fn filter_by_search(matches: &[Match], term: &str) -> Vec<Match> {
    let needle = term.to_lowercase();
    matches
        .iter()
        .filter(|m| {
            let item = &m.item;
            item.summary.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
                || item.kind_label().contains(&needle)
                || item
                    .list_title()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
                || item
                    .status()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Keeps matches whose item starts within [from, to], inclusive of the
/// whole end day. Items whose start never resolves are excluded.
pub fn filter_by_date_range(matches: &[Match], from: NaiveDate, to: NaiveDate) -> Vec<Match> {
    let Some(start_bound) = from
        .and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
    else {
        return Vec::new();
    };
    let Some(end_bound) = to
        .and_hms_opt(23, 59, 59)
        .map(|naive| Utc.from_utc_datetime(&naive))
    else {
        return Vec::new();
    };

    matches
        .iter()
        .filter(|m| {
            m.item
                .start
                .instant()
                .is_some_and(|t| t >= start_bound && t <= end_bound)
        })
        .cloned()
        .collect()
}

fn format_time(time: &ItemTime) -> String {
    match time {
        ItemTime::Timestamp(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        ItemTime::Date(date) => date.format("%Y-%m-%d").to_string(),
        ItemTime::Raw(s) if s.is_empty() => "unknown time".to_string(),
        ItemTime::Raw(s) => s.clone(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max_chars).collect();
        format!("{}...", prefix)
    }
}

fn section_title(kind: &str, count: usize) -> String {
    match kind {
        "event" => format!("Events ({})", count),
        "task" => format!("Tasks ({})", count),
        _ => format!("Appointments ({})", count),
    }
}

fn render_item(out: &mut String, m: &Match) {
    let item = &m.item;

    let file_note = match m.files.len() {
        0 => String::new(),
        1 => " (1 file)".to_string(),
        n => format!(" ({} files)", n),
    };
    let _ = writeln!(
        out,
        "  {} - {}{}",
        item.summary,
        format_time(&item.start),
        file_note
    );

    if let ItemKind::Task {
        status,
        list_title,
        completed,
        ..
    } = &item.kind
    {
        let _ = writeln!(out, "    status: {} | list: {}", status, list_title);
        if let Some(completed) = completed {
            let _ = writeln!(out, "    completed: {}", completed);
        }
    }

    if let Some(location) = item.location()
        && !location.is_empty()
    {
        let _ = writeln!(out, "    location: {}", location);
    }

    let attendees = item.attendees();
    if !attendees.is_empty() {
        let _ = writeln!(out, "    {} attendee(s)", attendees.len());
    }

    if !item.description.is_empty() {
        let _ = writeln!(out, "    {}", truncate(&item.description, 100));
    }

    if m.files.is_empty() {
        let _ = writeln!(out, "    no files found for this {}", item.kind_label());
    } else {
        for file in &m.files {
            let name = if file.name.is_empty() {
                "(unnamed file)"
            } else {
                &file.name
            };
            let _ = writeln!(out, "    * {} [{}]", name, file.mime_type);
            let _ = writeln!(
                out,
                "      modified {}, created {}",
                format_time(&file.modified_time),
                format_time(&file.created_time)
            );
        }
    }
}

/// Renders matches grouped by category, closing with a summary line.
pub fn render_matches(matches: &[Match], title: &str) -> String {
    let mut out = String::new();

    if matches.is_empty() {
        let _ = writeln!(out, "{}: no matching items found.", title);
        return out;
    }

    let _ = writeln!(out, "{}", title);

    for kind in ["event", "task", "appointment"] {
        let group: Vec<&Match> = matches.iter().filter(|m| m.item.kind_label() == kind).collect();
        if group.is_empty() {
            continue;
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section_title(kind, group.len()));
        for m in group {
            render_item(&mut out, m);
        }
    }

    let events = matches.iter().filter(|m| m.item.is_event()).count();
    let tasks = matches.iter().filter(|m| m.item.is_task()).count();
    let appointments = matches.iter().filter(|m| m.item.is_appointment()).count();
    let with_files = matches.iter().filter(|m| !m.files.is_empty()).count();
    let total_files: usize = matches.iter().map(|m| m.files.len()).sum();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Summary: {} item(s) ({} events, {} tasks, {} appointments) | {} with files | {} file(s)",
        matches.len(),
        events,
        tasks,
        appointments,
        with_files,
        total_files
    );

    out
}
