use crate::shell::{content_fn, Module, RenderState, Region, Result, Widget};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::process::Command;
use std::time::Duration;

pub const ID: &str = "session";

/// Login name from the environment, if any.
pub fn system_user() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}

/// Login time from one line of `who` output, e.g.
/// `ada      pts/0        2026-02-11 10:30 (:0)`.
pub fn parse_who_line(line: &str, user: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 || parts[0] != user {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{} {}", parts[2], parts[3]), "%Y-%m-%d %H:%M").ok()
}

/// First login of `user` found in `who` output.
pub fn login_from_who(output: &str, user: &str) -> Option<DateTime<Local>> {
    output
        .lines()
        .filter_map(|line| parse_who_line(line, user))
        .find_map(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Session start reported by the system for `user`.
pub fn system_login_time(user: &str) -> Option<DateTime<Local>> {
    let output = match Command::new("who").output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::debug!(status = %output.status, "who exited with an error");
            return None;
        }
        Err(e) => {
            tracing::debug!(error = %e, "who is not available");
            return None;
        }
    };
    login_from_who(&String::from_utf8_lossy(&output.stdout), user)
}

/// `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

pub fn module(user: String, login: DateTime<Local>) -> Result<Module> {
    let second = Duration::from_secs(1);
    Module::builder(ID, "Session", Region::Left)
        .widget(Widget::label("user", "User", [user]))
        .widget(Widget::label(
            "login",
            "Logged in",
            [login.format("%Y-%m-%d %H:%M:%S").to_string()],
        ))
        .widget(Widget::new_timed(
            "duration",
            "Session",
            second,
            content_fn(move |ctx| {
                let elapsed = (ctx.wall - login).to_std().unwrap_or_default();
                Ok(RenderState::text(format_elapsed(elapsed)))
            }),
        )?)
        .widget(Widget::new_timed(
            "clock",
            "Now",
            second,
            content_fn(|ctx| {
                Ok(RenderState::lines([
                    ctx.wall.format("%H:%M:%S").to_string(),
                    ctx.wall.format("%A, %d %B %Y").to_string(),
                ]))
            }),
        )?)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn elapsed_is_zero_padded() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "01:02:05");
    }

    #[test]
    fn hours_keep_counting_past_a_day() {
        assert_eq!(format_elapsed(Duration::from_secs(90_000)), "25:00:00");
    }

    #[test]
    fn who_line_for_the_user_gives_login_time() {
        let login = parse_who_line("ada      pts/0        2026-02-11 10:30 (:0)", "ada").unwrap();
        assert_eq!((login.year(), login.month(), login.day()), (2026, 2, 11));
        assert_eq!((login.hour(), login.minute()), (10, 30));
    }

    #[test]
    fn who_lines_for_other_users_or_formats_are_skipped() {
        assert!(parse_who_line("bob pts/1 2026-02-11 09:00", "ada").is_none());
        assert!(parse_who_line("ada console Feb 11 10:30", "ada").is_none());
        assert!(parse_who_line("ada", "ada").is_none());
        let output = "bob pts/1 2026-02-11 09:00\nada tty2 2026-02-10 08:15\nada pts/0 2026-02-11 10:30\n";
        let login = login_from_who(output, "ada").unwrap();
        assert_eq!(login.format("%Y-%m-%d %H:%M").to_string(), "2026-02-10 08:15");
    }

    #[test]
    fn session_has_two_timed_widgets() {
        let module = module("ada".into(), Local::now()).unwrap();
        let timed: Vec<&str> = module
            .widgets()
            .iter()
            .filter(|w| w.is_timed())
            .map(|w| w.id().as_str())
            .collect();
        assert_eq!(timed, vec!["duration", "clock"]);
    }
}
