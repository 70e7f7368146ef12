//! The interactive revision loop.
//!
//! Collects a project name and an idea, asks the designer for a schema, then
//! alternates between showing the schema and applying feedback until the
//! user approves. Invalid input is re-prompted; designer failures end the
//! session.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::architect::SchemaDesigner;
use crate::error::BlueprintError;
use crate::interaction::Prompter;
use crate::schema::{AbstractSchema, render};

/// Feedback phrases that end the loop (compared trimmed, case-insensitively).
pub const APPROVAL_PHRASES: &[&str] = &["looks good", "yes", "y", "approve", "ok"];

/// The outcome of a completed session, ready for scaffolding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovedDesign {
    #[serde(rename = "project")]
    pub project_name: String,
    pub schema: AbstractSchema,
    /// Number of revisions applied before approval.
    #[serde(skip)]
    pub revisions: usize,
}

/// Whether `feedback` approves the current schema.
///
/// ## Examples
///
/// ```
/// use blueprint_lib::session::is_approval;
///
/// assert!(is_approval(" Yes "));
/// assert!(is_approval("OK"));
/// assert!(!is_approval("Looks okay"));
/// ```
pub fn is_approval(feedback: &str) -> bool {
    let normalized = feedback.trim().to_lowercase();
    APPROVAL_PHRASES.contains(&normalized.as_str())
}

/// Checks a project name: non-empty, ASCII letters, digits, `-` and `_` only.
///
/// ## Errors
///
/// Returns a message suitable for showing to the user.
pub fn validate_project_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Project name cannot be empty.".to_string());
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!(
            "Project name may only contain letters, digits, '-' and '_' (found {bad:?})."
        ));
    }
    Ok(())
}

/// Runs the whole loop and returns the approved design.
///
/// ## Errors
///
/// Propagates designer failures from the generate and revise steps and
/// aborted prompts. Nothing is retried.
pub async fn run_session<P, D>(prompter: &mut P, designer: &D) -> Result<ApprovedDesign, BlueprintError>
where
    P: Prompter,
    D: SchemaDesigner,
{
    let project_name = collect_project_name(prompter)?;
    let idea = collect_idea(prompter)?;

    prompter.show("Designing your schema...");
    info!(project = %project_name, "generating schema");
    let mut schema = designer.generate_schema(&idea).await?;
    let mut revisions = 0;

    loop {
        prompter.show(&render(&schema));
        let feedback = collect_feedback(prompter)?;

        if is_approval(&feedback) {
            info!(project = %project_name, revisions, "schema approved");
            return Ok(ApprovedDesign {
                project_name,
                schema,
                revisions,
            });
        }

        prompter.show("Revising your schema...");
        debug!(revision = revisions + 1, "revising schema");
        schema = designer.revise_schema(&schema, &feedback).await?;
        revisions += 1;
    }
}

fn collect_project_name<P: Prompter>(prompter: &mut P) -> Result<String, BlueprintError> {
    loop {
        let name = prompter.text(
            "Project name:",
            Some("letters, digits, '-' and '_' only"),
        )?;
        let name = name.trim();
        match validate_project_name(name) {
            Ok(()) => return Ok(name.to_string()),
            Err(message) => {
                warn!(input = name, "rejected project name");
                prompter.show(&message);
            }
        }
    }
}

fn collect_idea<P: Prompter>(prompter: &mut P) -> Result<String, BlueprintError> {
    loop {
        let idea = prompter.text(
            "Describe your application idea:",
            Some("e.g. A todo app for teams with projects and due dates"),
        )?;
        if !idea.trim().is_empty() {
            return Ok(idea);
        }
        prompter.show("Please describe your idea.");
    }
}

fn collect_feedback<P: Prompter>(prompter: &mut P) -> Result<String, BlueprintError> {
    loop {
        let feedback = prompter.text(
            "Feedback (or 'looks good' to approve):",
            Some("describe a change, e.g. Add a due_date to tasks"),
        )?;
        if !feedback.trim().is_empty() {
            return Ok(feedback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tracing_test::traced_test;

    struct Answers {
        lines: VecDeque<&'static str>,
        shown: Vec<String>,
    }

    impl Answers {
        fn new(lines: &[&'static str]) -> Self {
            Self {
                lines: lines.iter().copied().collect(),
                shown: Vec::new(),
            }
        }
    }

    impl Prompter for Answers {
        fn text(&mut self, _message: &str, _help: Option<&str>) -> Result<String, BlueprintError> {
            self.lines
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| BlueprintError::Interaction("no more input".to_string()))
        }

        fn secret(&mut self, message: &str) -> Result<String, BlueprintError> {
            self.text(message, None)
        }

        fn select(&mut self, _message: &str, _options: &[String]) -> Result<usize, BlueprintError> {
            Ok(0)
        }

        fn show(&mut self, text: &str) {
            self.shown.push(text.to_string());
        }
    }

    #[test]
    #[traced_test]
    fn project_name_is_reprompted_until_valid() {
        let mut prompter = Answers::new(&["", "my app!", "  my-app_2  "]);
        assert_eq!(collect_project_name(&mut prompter).unwrap(), "my-app_2");
        assert_eq!(prompter.shown.len(), 2);
        assert!(logs_contain("rejected project name"));
    }

    #[test]
    fn blank_feedback_is_reprompted_and_kept_verbatim() {
        let mut prompter = Answers::new(&["", "  ", " Add tags "]);
        assert_eq!(collect_feedback(&mut prompter).unwrap(), " Add tags ");
    }

    #[test]
    fn idea_is_passed_on_verbatim() {
        let mut prompter = Answers::new(&["   ", "  A todo app\nfor teams  "]);
        assert_eq!(collect_idea(&mut prompter).unwrap(), "  A todo app\nfor teams  ");
        assert_eq!(prompter.shown, vec!["Please describe your idea."]);
    }

    #[test]
    fn aborted_prompt_propagates() {
        let mut prompter = Answers::new(&[]);
        assert!(matches!(
            collect_idea(&mut prompter),
            Err(BlueprintError::Interaction(_))
        ));
    }

    #[test]
    fn approval_is_trim_and_case_insensitive() {
        for input in [" Yes ", "YES", "y", "OK", "Looks Good", "approve\n"] {
            assert!(is_approval(input), "{input:?} should approve");
        }
    }

    #[test]
    fn other_feedback_is_a_revision_request() {
        for input in ["Looks okay", "yes please", "no", "Add 'dueDate:date' to tasks"] {
            assert!(!is_approval(input), "{input:?} should not approve");
        }
    }

    #[test]
    fn project_names_with_hyphen_underscore_digits_are_accepted() {
        assert!(validate_project_name("my-app_2").is_ok());
        assert!(validate_project_name("App").is_ok());
    }

    #[test]
    fn empty_and_punctuated_project_names_are_rejected() {
        assert!(validate_project_name("").is_err());
        let err = validate_project_name("my app!").unwrap_err();
        assert!(err.contains("' '"));
        assert!(validate_project_name("café").is_err());
    }
}
