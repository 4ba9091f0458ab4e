use std::time::Duration;

use chrono::Utc;
use config::{CursorPolicy, EmptyHomeworksPolicy, FailurePolicy, PollOpts, UnknownStatusPolicy};
use tracing::{debug, error, info, warn};

use crate::{
    client::HomeworkSource,
    error::PollError,
    notifier::{Messenger, Notifier},
    response::{self, HomeworkRecord},
    status,
};


/// Result of a cycle that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The current homework changed status and a notification was delivered.
    Notified {
        /// Status that is now considered last seen
        status: String,
    },
    /// The current homework still has the last seen status.
    Unchanged,
    /// The response contained no homeworks.
    Empty,
}

/// Polls the homework statuses endpoint and notifies on status changes.
///
/// One cycle runs at a time. The poller owns the `from_date` cursor and the last seen status;
/// neither survives a restart.
#[derive(Debug)]
pub struct Poller<S, M> {
    source: S,
    notifier: Notifier<M>,
    interval: Duration,
    empty_homeworks: EmptyHomeworksPolicy,
    unknown_status: UnknownStatusPolicy,
    on_failure: FailurePolicy,
    advance_cursor: CursorPolicy,
    cursor: i64,
    last_status: Option<String>,
}

impl<S: HomeworkSource, M: Messenger> Poller<S, M> {
    /// Creates a poller whose cursor starts at the current time.
    pub fn new(source: S, notifier: Notifier<M>, opts: &PollOpts) -> Self {
        Self {
            source,
            notifier,
            interval: opts.retry_interval(),
            empty_homeworks: opts.empty_homeworks,
            unknown_status: opts.unknown_status,
            on_failure: opts.on_cycle_failure,
            advance_cursor: opts.advance_cursor,
            cursor: Utc::now().timestamp(),
            last_status: None,
        }
    }

    /// Override the initial `from_date` cursor.
    #[must_use]
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    /// Current `from_date` cursor in unix seconds.
    pub const fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Status of the current homework as of the last delivered notification.
    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    /// Run one fetch, validate, compare and notify cycle.
    ///
    /// The last seen status is only updated after a successful delivery.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome, PollError> {
        let result = self.cycle().await;

        if result.is_ok() || self.advance_cursor == CursorPolicy::Always {
            self.cursor = Utc::now().timestamp();
        }

        result
    }

    async fn cycle(&mut self) -> Result<CycleOutcome, PollError> {
        let payload = self.source.fetch(self.cursor).await?;
        let homeworks = response::validate(&payload, self.empty_homeworks)?;

        let Some(current) = homeworks.first() else {
            info!("No new homework statuses");
            return Ok(CycleOutcome::Empty);
        };

        let new_status = current.status()?;
        if self.last_status.as_deref() == Some(new_status) {
            info!(status = new_status, "No new homework statuses");
            return Ok(CycleOutcome::Unchanged);
        }

        let message = self.compose(current)?;
        self.notifier.notify(&message).await?;

        debug!(previous = ?self.last_status, status = new_status, "Updating last seen status");
        self.last_status = Some(new_status.to_owned());
        Ok(CycleOutcome::Notified { status: new_status.to_owned() })
    }

    fn compose(&self, homework: &HomeworkRecord) -> Result<String, PollError> {
        match status::parse_status(homework) {
            Err(PollError::UnrecognizedStatus(raw))
                if self.unknown_status == UnknownStatusPolicy::Rejected =>
            {
                let (name, _) = homework.fields()?;
                warn!(status = %raw, homework = name, "Unrecognized status, reporting as rejected");
                Ok(status::message(name, status::verdict(status::REJECTED)?))
            }
            other => other,
        }
    }

    /// Poll forever, sleeping for the retry interval between cycles.
    ///
    /// Returns only when a cycle fails under [`FailurePolicy::Exit`].
    pub async fn run(mut self) -> Result<(), PollError> {
        info!(
            endpoint = self.source.endpoint(),
            interval_secs = self.interval.as_secs(),
            on_failure = ?self.on_failure,
            "Starting homework status poller"
        );

        loop {
            match self.poll_once().await {
                Ok(outcome) => debug!(?outcome, cursor = self.cursor, "Cycle complete"),
                Err(e) => {
                    error!(
                        kind = %e.kind(),
                        error = %e.report(),
                        cursor = self.cursor,
                        last_status = ?self.last_status,
                        "Program failure"
                    );
                    if self.on_failure == FailurePolicy::Exit {
                        return Err(e);
                    }
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
