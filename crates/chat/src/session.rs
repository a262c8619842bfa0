//! Turn-based conversation that never lets an agent failure escape.

use crate::agent::{Agent, Message};
use crate::dataset::Dataset;

/// Shown to the user in place of an answer when the agent fails.
pub const APOLOGY: &str =
    "Oops! Sorry, there's been some error. Checking the logs might be helpful!";

/// What the user sees after a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// True when `text` is the apology rather than an answer
    pub failed: bool,
}

/// A conversation with one agent over a fixed set of datasets.
pub struct Session<A: Agent> {
    agent: A,
    datasets: Vec<Dataset>,
    history: Vec<Message>,
}

impl<A: Agent> Session<A> {
    pub fn new(agent: A, datasets: Vec<Dataset>) -> Self {
        Self {
            agent,
            datasets,
            history: Vec::new(),
        }
    }

    /// Ask a question. The first question goes out alone, later ones carry
    /// the earlier turns. Any agent error is logged, the history is cleared
    /// and the apology is returned instead.
    pub async fn ask(&mut self, prompt: &str) -> Reply {
        let turn = self.history.len() / 2 + 1;
        tracing::info!(turn, "Asking agent");

        match self.agent.chat(&self.datasets, &self.history, prompt).await {
            Ok(answer) => {
                self.history.push(Message::user(prompt));
                self.history.push(Message::assistant(answer.clone()));
                Reply {
                    text: answer,
                    failed: false,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, turn, "Agent failed to answer");
                self.reset();
                Reply {
                    text: APOLOGY.to_string(),
                    failed: true,
                }
            }
        }
    }

    /// Forget every earlier turn.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    #[must_use]
    pub fn agent(&self) -> &A {
        &self.agent
    }

    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    #[must_use]
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }
}
