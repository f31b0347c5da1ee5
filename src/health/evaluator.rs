//! Check evaluation.
//!
//! # Responsibilities
//! - Run every configured command in order against a fresh connection
//! - Compare each scalar result to its expectation
//! - Reduce the outcomes to one availability flag (logical AND)
//!
//! # Design Decisions
//! - No early exit: every command runs so every failure gets logged
//! - A connect, query or timeout error fails its command and nothing else
//! - A failed command never borrows the value of an earlier one

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time;

use crate::config::Command;
use crate::connector::{Connector, ConnectorError};
use crate::observability::metrics;

/// How a single command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// The query ran but returned something other than `expect`.
    Mismatch { actual: String },
    /// Connect, query or timeout error.
    Errored { reason: String },
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Mismatch { .. } => "mismatch",
            Outcome::Errored { .. } => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub name: String,
    pub outcome: Outcome,
}

/// Result of one full evaluation cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub available: bool,
    pub results: Vec<CommandResult>,
    pub duration: Duration,
}

impl CycleReport {
    pub fn new(results: Vec<CommandResult>, duration: Duration) -> Self {
        Self {
            available: results.iter().all(|r| r.outcome.passed()),
            results,
            duration,
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &CommandResult> {
        self.results.iter().filter(|r| !r.outcome.passed())
    }
}

/// Runs the configured commands and folds them into a [`CycleReport`].
pub struct CheckEvaluator<C> {
    connector: C,
    commands: Arc<[Command]>,
    query_timeout: Duration,
}

impl<C: Connector> CheckEvaluator<C> {
    pub fn new(connector: C, commands: impl Into<Arc<[Command]>>, query_timeout: Duration) -> Self {
        Self {
            connector,
            commands: commands.into(),
            query_timeout,
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Run every command once. Never fails; errors become failed commands.
    pub async fn evaluate(&self) -> CycleReport {
        tracing::debug!(commands = self.commands.len(), "Running checks");
        let start = Instant::now();
        let mut results = Vec::with_capacity(self.commands.len());

        for command in self.commands.iter() {
            let outcome = match time::timeout(self.query_timeout, self.run_command(command)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let e = ConnectorError::Timeout(self.query_timeout);
                    tracing::error!(command = %command.name, error = %e, "Check aborted");
                    Outcome::Errored { reason: e.to_string() }
                }
            };

            metrics::record_check(outcome.label());
            results.push(CommandResult {
                name: command.name.clone(),
                outcome,
            });
        }

        CycleReport::new(results, start.elapsed())
    }

    async fn run_command(&self, command: &Command) -> Outcome {
        let mut conn = match self.connector.connect().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(command = %command.name, error = %e, "Can't connect to backend");
                return Outcome::Errored { reason: e.to_string() };
            }
        };

        tracing::debug!(command = %command.name, query = %command.query, "Running query");

        // Ping failures are reported but only the query decides the outcome.
        if let Err(e) = self.connector.ping(&mut conn).await {
            tracing::error!(command = %command.name, error = %e, "Ping failed");
        }

        let result = self.connector.run_scalar(&mut conn, &command.query).await;
        self.connector.close(conn).await;

        match result {
            Ok(actual) => {
                tracing::debug!(
                    command = %command.name,
                    result = %actual,
                    expect = %command.expect,
                    "Query finished"
                );
                if actual == command.expect {
                    Outcome::Passed
                } else {
                    tracing::warn!(
                        command = %command.name,
                        result = %actual,
                        expect = %command.expect,
                        "Unexpected query result"
                    );
                    Outcome::Mismatch { actual }
                }
            }
            Err(e) => {
                tracing::error!(command = %command.name, error = %e, "Query failed");
                Outcome::Errored { reason: e.to_string() }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// What the fake database does for a given query.
    #[derive(Clone)]
    pub(crate) enum Reply {
        Value(&'static str),
        QueryError,
        Hang,
    }

    /// Connector answering from a query → reply table.
    #[derive(Default)]
    pub(crate) struct FakeConnector {
        pub replies: HashMap<&'static str, Reply>,
        pub refuse_connect: bool,
        pub fail_ping: bool,
        pub executed: Mutex<Vec<String>>,
    }

    impl FakeConnector {
        pub fn with(replies: &[(&'static str, Reply)]) -> Self {
            Self {
                replies: replies.iter().cloned().collect(),
                ..Default::default()
            }
        }

        pub fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Connector for FakeConnector {
        type Connection = ();

        async fn connect(&self) -> Result<(), ConnectorError> {
            if self.refuse_connect {
                Err(ConnectorError::Connect("connection refused".into()))
            } else {
                Ok(())
            }
        }

        async fn ping(&self, _conn: &mut ()) -> Result<(), ConnectorError> {
            if self.fail_ping {
                Err(ConnectorError::Ping("server has gone away".into()))
            } else {
                Ok(())
            }
        }

        async fn run_scalar(&self, _conn: &mut (), query: &str) -> Result<String, ConnectorError> {
            self.executed.lock().unwrap().push(query.to_string());
            match self.replies.get(query).cloned() {
                Some(Reply::Value(v)) => Ok(v.to_string()),
                Some(Reply::Hang) => {
                    time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
                Some(Reply::QueryError) | None => {
                    Err(ConnectorError::Query(format!("bad query: {query}").into()))
                }
            }
        }
    }

    fn evaluator(
        connector: FakeConnector,
        commands: Vec<Command>,
    ) -> CheckEvaluator<FakeConnector> {
        CheckEvaluator::new(connector, commands, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_empty_command_list_is_available() {
        let report = evaluator(FakeConnector::default(), vec![]).evaluate().await;
        assert!(report.available);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_all_passing_is_available() {
        let connector = FakeConnector::with(&[
            ("SELECT 1", Reply::Value("1")),
            ("SELECT 'ok'", Reply::Value("ok")),
        ]);
        let commands = vec![
            Command::new("one", "SELECT 1", "1"),
            Command::new("two", "SELECT 'ok'", "ok"),
        ];

        let report = evaluator(connector, commands).evaluate().await;
        assert!(report.available);
        assert_eq!(report.failed().count(), 0);
    }

    #[tokio::test]
    async fn test_mismatch_makes_backend_unavailable() {
        let connector = FakeConnector::with(&[("SELECT 1", Reply::Value("0"))]);
        let report = evaluator(connector, vec![Command::new("one", "SELECT 1", "1")])
            .evaluate()
            .await;

        assert!(!report.available);
        assert_eq!(
            report.results[0].outcome,
            Outcome::Mismatch { actual: "0".into() }
        );
    }

    #[tokio::test]
    async fn test_comparison_is_exact() {
        let connector = FakeConnector::with(&[("SELECT 'OK '", Reply::Value("OK "))]);
        let report = evaluator(connector, vec![Command::new("c", "SELECT 'OK '", "OK")])
            .evaluate()
            .await;
        assert!(!report.available);
    }

    #[tokio::test]
    async fn test_every_command_runs_in_order_despite_failures() {
        let connector = FakeConnector::with(&[
            ("q1", Reply::Value("x")),
            ("q2", Reply::QueryError),
            ("q3", Reply::Value("3")),
        ]);
        let commands = vec![
            Command::new("first", "q1", "1"),
            Command::new("second", "q2", "2"),
            Command::new("third", "q3", "3"),
        ];
        let evaluator = evaluator(connector, commands);

        let report = evaluator.evaluate().await;

        assert!(!report.available);
        assert_eq!(evaluator.connector.executed(), vec!["q1", "q2", "q3"]);
        let names: Vec<_> = report.failed().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(report.results[2].outcome.passed());
    }

    #[tokio::test]
    async fn test_query_error_never_reuses_previous_value() {
        // The second command expects the value the first one returned; its
        // own query errors. That must count as a failure.
        let connector = FakeConnector::with(&[
            ("SELECT 1", Reply::Value("1")),
            ("SELECT broken", Reply::QueryError),
        ]);
        let commands = vec![
            Command::new("good", "SELECT 1", "1"),
            Command::new("bad", "SELECT broken", "1"),
        ];

        let report = evaluator(connector, commands).evaluate().await;

        assert!(!report.available);
        assert!(matches!(report.results[1].outcome, Outcome::Errored { .. }));
    }

    #[tokio::test]
    async fn test_connect_failure_fails_every_command() {
        let connector = FakeConnector {
            refuse_connect: true,
            ..FakeConnector::with(&[("SELECT 1", Reply::Value("1"))])
        };
        let evaluator = evaluator(
            connector,
            vec![
                Command::new("a", "SELECT 1", "1"),
                Command::new("b", "SELECT 1", "1"),
            ],
        );

        let report = evaluator.evaluate().await;

        assert!(!report.available);
        assert_eq!(report.failed().count(), 2);
        assert!(evaluator.connector.executed().is_empty());
    }

    #[tokio::test]
    async fn test_ping_failure_alone_does_not_fail_command() {
        let connector = FakeConnector {
            fail_ping: true,
            ..FakeConnector::with(&[("SELECT 1", Reply::Value("1"))])
        };
        let report = evaluator(connector, vec![Command::new("a", "SELECT 1", "1")])
            .evaluate()
            .await;
        assert!(report.available);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_query_times_out_and_later_commands_still_run() {
        let connector = FakeConnector::with(&[
            ("SELECT SLEEP(100)", Reply::Hang),
            ("SELECT 1", Reply::Value("1")),
        ]);
        let commands = vec![
            Command::new("slow", "SELECT SLEEP(100)", "0"),
            Command::new("fast", "SELECT 1", "1"),
        ];
        let evaluator = CheckEvaluator::new(connector, commands, Duration::from_millis(200));

        let report = evaluator.evaluate().await;

        assert!(!report.available);
        match &report.results[0].outcome {
            Outcome::Errored { reason } => assert!(reason.contains("timed out")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(report.results[1].outcome.passed());
    }
}
