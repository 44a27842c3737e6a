//! Deterministic stand-ins for the oracle and the validator.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use modernizer::sandbox::{CodeValidator, ExecutionOutcome};
use modernizer::{OracleError, TransformationOracle};

/// A reply the scripted oracle will give.
#[derive(Clone, Debug)]
pub enum Reply {
    Text(String),
    Fail(String),
}

/// Replies in order. Once the script runs out the last reply repeats, so a
/// script like `[plan, code]` answers every later repair with `code`.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Convenience for all-success scripts.
    pub fn texts(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Reply::Text(r.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl TransformationOracle for ScriptedOracle {
    fn invoke(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };

        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(OracleError::Request(message)),
            None => Err(OracleError::EmptyResponse),
        }
    }
}

/// Returns outcomes in order; once exhausted keeps returning `fallback`.
pub struct ScriptedValidator {
    outcomes: Mutex<VecDeque<ExecutionOutcome>>,
    fallback: ExecutionOutcome,
    seen: Mutex<Vec<String>>,
}

impl ScriptedValidator {
    pub fn new(outcomes: Vec<ExecutionOutcome>) -> Arc<Self> {
        Self::with_fallback(outcomes, ExecutionOutcome::failure("scripted failure"))
    }

    pub fn with_fallback(outcomes: Vec<ExecutionOutcome>, fallback: ExecutionOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            fallback,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn always_failing(diagnostic: &str) -> Arc<Self> {
        Self::with_fallback(vec![], ExecutionOutcome::failure(diagnostic))
    }

    /// Code passed to every validation, in order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl CodeValidator for ScriptedValidator {
    fn validate(&self, code: &str, _language: &str, _framework: Option<&str>) -> ExecutionOutcome {
        self.seen.lock().unwrap().push(code.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
