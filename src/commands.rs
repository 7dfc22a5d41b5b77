// Command layer: resolves what the user asked for and drives the service,
// the stopwatch and the confirmation flow. Service failures end here as a
// message; only a cancelled capture travels back up to `main`.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::IssueService;
use crate::config::Config;
use crate::duration::format_clock;
use crate::issue::Issue;
use crate::stopwatch::{self, Capture, Clock};
use crate::submit::{confirm_and_submit, Submission};
use crate::terminal::{Style, Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// A capture ran to the confirmation step.
    Tracked(Submission),
    /// The user cancelled the stopwatch; the process should exit now.
    Cancelled,
}

/// Spinner shown while a blocking request is in flight. It draws to stderr
/// and stays hidden when stderr is not a terminal.
fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_issue<T: Terminal + ?Sized>(term: &mut T, issue: &Issue) -> Result<()> {
    term.write_line("", Style::Plain)?;
    term.write(&format!("[{}] ", issue.id), Style::Id)?;
    term.write_line(&issue.summary, Style::Plain)?;

    let spent = issue.spent_time.as_ref().map(|s| s.presentation.as_str());
    for (label, value) in [
        ("State: ", Some(issue.state.as_str())),
        ("Sizing: ", issue.sizing.as_deref()),
        ("Spent time: ", spent),
    ] {
        term.write(label, Style::Label)?;
        term.write_line(value.unwrap_or("-"), Style::Plain)?;
    }

    term.write_line("", Style::Plain)?;
    term.write_line(&"=".repeat(50), Style::Plain)
}

/// Prints the issues assigned to the configured user, or every issue when
/// no user is configured.
pub fn list_issues<T, S>(term: &mut T, service: &S, config: &Config) -> Result<Outcome>
where
    T: Terminal + ?Sized,
    S: IssueService + ?Sized,
{
    let pb = spinner("Fetching issues...");
    let result = service.list_issues();
    pb.finish_and_clear();

    let issues = match result {
        Ok(issues) => issues,
        Err(e) => {
            tracing::warn!(error = %e, "listing issues failed");
            term.write_line(&format!("-> Could not list issues: {e}"), Style::Error)?;
            return Ok(Outcome::Done);
        }
    };

    let user = config.user.as_deref();
    if user.is_none() {
        tracing::warn!("YOUTRACK_USER is not set, listing all issues");
    }
    let mut shown = 0;
    for issue in issues.iter().filter(|i| user.map_or(true, |u| i.is_assigned_to(u))) {
        print_issue(term, issue)?;
        shown += 1;
    }
    tracing::debug!(total = issues.len(), shown, "listed issues");
    Ok(Outcome::Done)
}

/// Prints one issue and, when `capture` is set, times work on it and
/// offers to book the result.
pub fn show_issue<T, S, C>(
    term: &mut T,
    service: &S,
    config: &Config,
    clock: &C,
    issue_id: &str,
    capture: bool,
) -> Result<Outcome>
where
    T: Terminal + ?Sized,
    S: IssueService + ?Sized,
    C: Clock,
{
    let pb = spinner("Fetching issue...");
    let result = service.get_issue(issue_id);
    pb.finish_and_clear();

    let issue = match result {
        Ok(issue) => issue,
        Err(e) if e.is_not_found() => {
            term.write_line("-> Issue not found", Style::Error)?;
            return Ok(Outcome::Done);
        }
        Err(e) => {
            tracing::warn!(error = %e, issue = issue_id, "fetching issue failed");
            term.write_line(&format!("-> Could not fetch issue: {e}"), Style::Error)?;
            return Ok(Outcome::Done);
        }
    };
    print_issue(term, &issue)?;

    if !capture {
        return Ok(Outcome::Done);
    }

    let elapsed = match stopwatch::run(term, clock, stopwatch::TICK)? {
        Capture::Stopped(secs) => secs,
        Capture::Cancelled => return Ok(Outcome::Cancelled),
    };
    term.write_line(&format_clock(elapsed), Style::Success)?;

    let submission = confirm_and_submit(
        term,
        service,
        &issue.id,
        elapsed,
        config.min_duration_in_sec,
        Utc::now(),
    )?;
    tracing::debug!(?submission, issue = %issue.id, "capture finished");
    Ok(Outcome::Tracked(submission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeService;
    use crate::issue::SpentTime;
    use crate::stopwatch::testing::{ManualClock, ScriptedTerminal};
    use crate::terminal::Key;

    fn issue(id: &str, assignees: &[&str]) -> Issue {
        Issue {
            id: id.into(),
            summary: format!("summary of {id}"),
            description: None,
            assignees: assignees.iter().map(|a| a.to_string()).collect(),
            state: "Open".into(),
            sizing: None,
            spent_time: Some(SpentTime {
                minutes: 45,
                presentation: "45m".into(),
            }),
            created: 0,
            updated: 0,
        }
    }

    fn service() -> FakeService {
        FakeService {
            issues: vec![issue("CLI-1", &["ada"]), issue("CLI-2", &["bob"]), issue("CLI-3", &["bob", "ada"])],
            ..FakeService::default()
        }
    }

    fn config(min: u64) -> Config {
        Config {
            user: Some("ada".into()),
            min_duration_in_sec: min,
            ..Config::default()
        }
    }

    #[test]
    fn printed_issue_uses_dash_for_missing_values() {
        let mut term = ScriptedTerminal::new(ManualClock::new());
        print_issue(&mut term, &issue("CLI-1", &[])).unwrap();

        let out = term.output();
        assert!(out.contains("[CLI-1] summary of CLI-1"));
        assert!(out.contains("State: Open"));
        assert!(out.contains("Sizing: -"));
        assert!(out.contains("Spent time: 45m"));
        assert!(out.contains(&"=".repeat(50)));
    }

    #[test]
    fn list_shows_only_issues_assigned_to_user() {
        let mut term = ScriptedTerminal::new(ManualClock::new());
        list_issues(&mut term, &service(), &config(0)).unwrap();

        let out = term.output();
        assert!(out.contains("[CLI-1]"));
        assert!(!out.contains("[CLI-2]"));
        assert!(out.contains("[CLI-3]"));
    }

    #[test]
    fn list_without_user_shows_everything() {
        let mut term = ScriptedTerminal::new(ManualClock::new());
        list_issues(&mut term, &service(), &Config::default()).unwrap();

        assert!(term.output().contains("[CLI-2]"));
    }

    #[test]
    fn list_failure_is_reported() {
        let failing = FakeService {
            fail_list: true,
            ..service()
        };
        let mut term = ScriptedTerminal::new(ManualClock::new());

        let outcome = list_issues(&mut term, &failing, &config(0)).unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert!(term.output().contains("Could not list issues"));
    }

    #[test]
    fn unknown_issue_reports_not_found_without_capture() {
        let clock = ManualClock::new();
        let mut term = ScriptedTerminal::new(clock.clone());

        let outcome = show_issue(&mut term, &service(), &config(0), &*clock, "X-1", true).unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert!(term.output().contains("-> Issue not found"));
        assert!(term.raw_transitions.is_empty(), "stopwatch never started");
    }

    #[test]
    fn show_without_capture_only_prints() {
        let clock = ManualClock::new();
        let mut term = ScriptedTerminal::new(clock.clone());

        show_issue(&mut term, &service(), &config(0), &*clock, "CLI-2", false).unwrap();

        assert!(term.output().contains("[CLI-2]"));
        assert!(term.prompts.is_empty());
    }

    #[test]
    fn stopped_capture_is_submitted_with_minimum() {
        let service = service();
        let clock = ManualClock::new();
        let mut term = ScriptedTerminal::new(clock.clone())
            .key_at(65, Key::Stop)
            .answer("standup notes")
            .answer("y");

        let outcome = show_issue(&mut term, &service, &config(900), &*clock, "CLI-1", true).unwrap();

        assert_eq!(outcome, Outcome::Tracked(Submission::Saved));
        assert!(term.output().contains("00:01:05"));
        let submitted = service.submitted.borrow();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].issue_id, "CLI-1");
        assert_eq!(submitted[0].duration_secs, 900);
        assert_eq!(submitted[0].description, "standup notes");
    }

    #[test]
    fn declined_capture_reports_the_decline() {
        let service = service();
        let clock = ManualClock::new();
        let mut term = ScriptedTerminal::new(clock.clone())
            .key_at(30, Key::Stop)
            .answer("")
            .answer("n");

        let outcome = show_issue(&mut term, &service, &config(0), &*clock, "CLI-1", true).unwrap();

        assert_eq!(outcome, Outcome::Tracked(Submission::Declined));
        assert!(service.submitted.borrow().is_empty());
    }

    #[test]
    fn cancelled_capture_skips_prompts_and_submission() {
        let service = service();
        let clock = ManualClock::new();
        let mut term = ScriptedTerminal::new(clock.clone()).key_at(10, Key::Cancel);

        let outcome = show_issue(&mut term, &service, &config(900), &*clock, "CLI-1", true).unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(term.prompts.is_empty());
        assert!(service.submitted.borrow().is_empty());
        assert!(!term.raw);
    }
}
