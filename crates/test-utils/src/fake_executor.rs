use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskwave::dag::Task;
use taskwave::exec::{ExecFuture, TaskExecutor};

/// Scripted behaviour for a single task id.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Succeed on the first attempt.
    Succeed,
    /// Fail the first `n` attempts, then succeed.
    FailTimes(u32),
    /// Fail every attempt with the given message.
    AlwaysFail(String),
    /// Never complete.
    Hang,
    /// Sleep, then succeed.
    Delay(Duration),
}

/// A fake executor that:
/// - looks up a scripted [`Behaviour`] per task id (default: succeed)
/// - records every attempt in call order
/// - returns the task id as its value on success.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    behaviours: HashMap<String, Behaviour>,
    attempts: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, behaviour: Behaviour) -> Self {
        self.behaviours.insert(id.to_string(), behaviour);
        self
    }

    /// Every attempt, in the order the executor was called.
    pub fn calls(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// Number of attempts made for `id`.
    pub fn attempts_for(&self, id: &str) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.as_str() == id)
            .count()
    }

    /// Distinct task ids in the order they were first started.
    pub fn started(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for id in self.attempts.lock().unwrap().iter() {
            if !seen.contains(id) {
                seen.push(id.clone());
            }
        }
        seen
    }
}

impl TaskExecutor<(), String> for FakeExecutor {
    fn execute(&self, task: &Task) -> ExecFuture<String> {
        let id = task.id.clone();
        let attempt = {
            let mut guard = self.attempts.lock().unwrap();
            guard.push(id.clone());
            guard.iter().filter(|t| **t == id).count() as u32
        };
        let behaviour = self
            .behaviours
            .get(&id)
            .cloned()
            .unwrap_or(Behaviour::Succeed);

        Box::pin(async move {
            match behaviour {
                Behaviour::Succeed => Ok(id),
                Behaviour::FailTimes(n) if attempt <= n => {
                    anyhow::bail!("{id} failed on attempt {attempt}")
                }
                Behaviour::FailTimes(_) => Ok(id),
                Behaviour::AlwaysFail(msg) => Err(anyhow::anyhow!(msg)),
                Behaviour::Hang => {
                    std::future::pending::<()>().await;
                    Ok(id)
                }
                Behaviour::Delay(d) => {
                    tokio::time::sleep(d).await;
                    Ok(id)
                }
            }
        })
    }
}
