// Confirmation flow that turns a stopped capture into a work item.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::api::IssueService;
use crate::duration::{apply_minimum, format_clock, presentation};
use crate::terminal::{Style, Terminal};

pub const AFFIRMATIVE: &str = "y";

/// A time entry ready to be sent. Only built after the user confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub issue_id: String,
    /// Tracked seconds, already raised to the configured minimum.
    pub duration_secs: u64,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Saved,
    Declined,
    Failed,
}

/// Case-insensitive match against the affirmative token; anything else,
/// including an empty answer, declines.
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(AFFIRMATIVE)
}

pub fn confirm_and_submit<T, S>(
    term: &mut T,
    service: &S,
    issue_id: &str,
    elapsed_secs: u64,
    min_duration_secs: u64,
    now: DateTime<Utc>,
) -> Result<Submission>
where
    T: Terminal + ?Sized,
    S: IssueService + ?Sized,
{
    let tracked = apply_minimum(elapsed_secs, min_duration_secs);
    if tracked > elapsed_secs {
        tracing::debug!(elapsed_secs, tracked, "raised to minimum duration");
    }

    term.write("Duration: ", Style::Label)?;
    term.write_line(
        &format!("{} ({})", presentation(tracked), format_clock(tracked)),
        Style::Plain,
    )?;

    let description = term.read_line("Description")?;
    let answer = term.read_line("Can I save this? (y/n)")?;
    if !is_confirmed(&answer) {
        term.write_line("-> Canceled", Style::Error)?;
        return Ok(Submission::Declined);
    }

    let item = WorkItem {
        issue_id: issue_id.to_string(),
        duration_secs: tracked,
        description,
        date: now,
    };
    match service.submit_work_item(&item) {
        Ok(()) => {
            term.write_line(&format!("-> Saved {} on {}", presentation(tracked), issue_id), Style::Success)?;
            Ok(Submission::Saved)
        }
        Err(e) => {
            tracing::warn!(error = %e, issue = issue_id, "work item not saved");
            term.write_line(&format!("-> Could not save the work item: {e}"), Style::Error)?;
            Ok(Submission::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeService;
    use crate::stopwatch::testing::{ManualClock, ScriptedTerminal};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn confirmation_token_is_case_insensitive() {
        assert!(is_confirmed("y"));
        assert!(is_confirmed("Y"));
        assert!(is_confirmed("  y \n"));
        assert!(!is_confirmed(""));
        assert!(!is_confirmed("n"));
        assert!(!is_confirmed("yes"));
    }

    #[test]
    fn short_capture_is_raised_to_minimum() {
        let service = FakeService::default();
        let mut term = ScriptedTerminal::new(ManualClock::new())
            .answer("pairing on the parser")
            .answer("y");

        let outcome = confirm_and_submit(&mut term, &service, "CLI-7", 65, 900, now()).unwrap();

        assert_eq!(outcome, Submission::Saved);
        let submitted = service.submitted.borrow();
        assert_eq!(
            submitted.as_slice(),
            [WorkItem {
                issue_id: "CLI-7".into(),
                duration_secs: 900,
                description: "pairing on the parser".into(),
                date: now(),
            }]
        );
        assert!(term.output().contains("Duration: 15m (00:15:00)"));
    }

    #[test]
    fn uppercase_confirmation_submits_exact_values() {
        let service = FakeService::default();
        let mut term = ScriptedTerminal::new(ManualClock::new()).answer("").answer("Y");

        let outcome = confirm_and_submit(&mut term, &service, "CLI-7", 1_234, 0, now()).unwrap();

        assert_eq!(outcome, Submission::Saved);
        let submitted = service.submitted.borrow();
        assert_eq!(submitted[0].duration_secs, 1_234);
        assert_eq!(submitted[0].description, "");
    }

    #[test]
    fn decline_skips_submission() {
        let service = FakeService::default();
        let mut term = ScriptedTerminal::new(ManualClock::new()).answer("notes").answer("n");

        let outcome = confirm_and_submit(&mut term, &service, "CLI-7", 600, 0, now()).unwrap();

        assert_eq!(outcome, Submission::Declined);
        assert!(service.submitted.borrow().is_empty());
        assert!(term.output().contains("-> Canceled"));
        assert_eq!(term.prompts.len(), 2);
    }

    #[test]
    fn failed_submission_is_reported_not_raised() {
        let service = FakeService {
            fail_submit: true,
            ..FakeService::default()
        };
        let mut term = ScriptedTerminal::new(ManualClock::new()).answer("x").answer("y");

        let outcome = confirm_and_submit(&mut term, &service, "CLI-7", 600, 0, now()).unwrap();

        assert_eq!(outcome, Submission::Failed);
        assert!(term.output().contains("Could not save"));
    }
}
