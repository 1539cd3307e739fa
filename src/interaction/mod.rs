//! User interaction handling for workflow runs
//!
//! The executor never renders anything itself. Every prompt and status line
//! goes through [`UserInteraction`], so runs can be driven by a scripted fake
//! in tests and by the terminal in production.

pub mod display;
pub mod prompts;

pub use display::{StatusDisplay, StatusKind};
pub use prompts::{UserPrompter, UserPrompterImpl};

use anyhow::Result;
use async_trait::async_trait;
use std::io;

/// What the user did with a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome<T> {
    Answered(T),
    /// Explicit abort (Esc, Ctrl-C, end of input)
    Cancelled,
}

impl<T> PromptOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromptOutcome::Cancelled)
    }
}

/// Trait for user interaction
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Prompt user for a single line of free text
    async fn prompt_text(
        &self,
        message: &str,
        help: Option<&str>,
    ) -> Result<PromptOutcome<String>>;

    /// Prompt user to pick one of `choices`, returning its index
    async fn prompt_choice(
        &self,
        message: &str,
        choices: &[String],
    ) -> Result<PromptOutcome<usize>>;

    /// Prompt user for yes/no confirmation
    async fn prompt_yes_no(&self, message: &str) -> Result<PromptOutcome<bool>>;

    /// Display information message
    fn display_info(&self, message: &str);

    /// Display warning message
    fn display_warning(&self, message: &str);

    /// Display error message
    fn display_error(&self, message: &str);

    /// Display progress
    fn display_progress(&self, message: &str);

    /// Display success message
    fn display_success(&self, message: &str);
}

/// Default implementation of user interaction
pub struct DefaultUserInteraction {
    prompter: UserPrompterImpl,
    display: StatusDisplay<io::Stdout, io::Stderr>,
}

impl Default for DefaultUserInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultUserInteraction {
    pub fn new() -> Self {
        Self {
            prompter: UserPrompterImpl::new(),
            display: StatusDisplay::terminal(),
        }
    }
}

#[async_trait]
impl UserInteraction for DefaultUserInteraction {
    async fn prompt_text(
        &self,
        message: &str,
        help: Option<&str>,
    ) -> Result<PromptOutcome<String>> {
        self.prompter.prompt_text(message, help).await
    }

    async fn prompt_choice(
        &self,
        message: &str,
        choices: &[String],
    ) -> Result<PromptOutcome<usize>> {
        self.prompter.prompt_choice(message, choices).await
    }

    async fn prompt_yes_no(&self, message: &str) -> Result<PromptOutcome<bool>> {
        self.prompter.prompt_yes_no(message).await
    }

    fn display_info(&self, message: &str) {
        self.display.show(StatusKind::Info, message);
    }

    fn display_warning(&self, message: &str) {
        self.display.show(StatusKind::Warning, message);
    }

    fn display_error(&self, message: &str) {
        self.display.show(StatusKind::Error, message);
    }

    fn display_progress(&self, message: &str) {
        self.display.show(StatusKind::Progress, message);
    }

    fn display_success(&self, message: &str) {
        self.display.show(StatusKind::Success, message);
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted interaction: answers are consumed in the order they were added
    pub struct MockUserInteraction {
        pub text_responses: Mutex<VecDeque<PromptOutcome<String>>>,
        pub choice_responses: Mutex<VecDeque<PromptOutcome<usize>>>,
        pub yes_no_responses: Mutex<VecDeque<PromptOutcome<bool>>>,
        pub messages: Mutex<Vec<String>>,
    }

    impl Default for MockUserInteraction {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockUserInteraction {
        pub fn new() -> Self {
            Self {
                text_responses: Mutex::new(VecDeque::new()),
                choice_responses: Mutex::new(VecDeque::new()),
                yes_no_responses: Mutex::new(VecDeque::new()),
                messages: Mutex::new(Vec::new()),
            }
        }

        pub fn add_text_response(&self, response: &str) {
            self.text_responses
                .lock()
                .unwrap()
                .push_back(PromptOutcome::Answered(response.to_string()));
        }

        pub fn add_text_cancel(&self) {
            self.text_responses
                .lock()
                .unwrap()
                .push_back(PromptOutcome::Cancelled);
        }

        pub fn add_choice_response(&self, index: usize) {
            self.choice_responses
                .lock()
                .unwrap()
                .push_back(PromptOutcome::Answered(index));
        }

        pub fn add_choice_cancel(&self) {
            self.choice_responses
                .lock()
                .unwrap()
                .push_back(PromptOutcome::Cancelled);
        }

        pub fn add_yes_no_response(&self, response: bool) {
            self.yes_no_responses
                .lock()
                .unwrap()
                .push_back(PromptOutcome::Answered(response));
        }

        pub fn add_yes_no_cancel(&self) {
            self.yes_no_responses
                .lock()
                .unwrap()
                .push_back(PromptOutcome::Cancelled);
        }

        pub fn get_messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }

        /// Number of prompts shown so far
        pub fn prompt_count(&self) -> usize {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| {
                    m.starts_with("TEXT: ")
                        || m.starts_with("CHOICE: ")
                        || m.starts_with("PROMPT: ")
                })
                .count()
        }

        fn record(&self, message: String) {
            self.messages.lock().unwrap().push(message);
        }
    }

    #[async_trait]
    impl UserInteraction for MockUserInteraction {
        async fn prompt_text(
            &self,
            message: &str,
            _help: Option<&str>,
        ) -> Result<PromptOutcome<String>> {
            self.record(format!("TEXT: {message}"));
            self.text_responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("No mock response configured"))
        }

        async fn prompt_choice(
            &self,
            message: &str,
            choices: &[String],
        ) -> Result<PromptOutcome<usize>> {
            self.record(format!("CHOICE: {message} [{}]", choices.join(", ")));
            self.choice_responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("No mock response configured"))
        }

        async fn prompt_yes_no(&self, message: &str) -> Result<PromptOutcome<bool>> {
            self.record(format!("PROMPT: {message}"));
            self.yes_no_responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("No mock response configured"))
        }

        fn display_info(&self, message: &str) {
            self.record(format!("INFO: {message}"));
        }

        fn display_warning(&self, message: &str) {
            self.record(format!("WARN: {message}"));
        }

        fn display_error(&self, message: &str) {
            self.record(format!("ERROR: {message}"));
        }

        fn display_progress(&self, message: &str) {
            self.record(format!("PROGRESS: {message}"));
        }

        fn display_success(&self, message: &str) {
            self.record(format!("SUCCESS: {message}"));
        }
    }

    #[tokio::test]
    async fn test_mock_answers_in_order() {
        let mock = MockUserInteraction::new();
        mock.add_text_response("first");
        mock.add_text_cancel();

        assert_eq!(
            mock.prompt_text("One", None).await.unwrap(),
            PromptOutcome::Answered("first".to_string())
        );
        assert!(mock.prompt_text("Two", None).await.unwrap().is_cancelled());
        assert!(mock.prompt_text("Three", None).await.is_err());
        assert_eq!(mock.prompt_count(), 3);
    }
}
