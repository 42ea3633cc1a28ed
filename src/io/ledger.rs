//! Ledger sinks that durably record increment events
//!
//! The git ledger turns every event into one commit dated on the event's calendar
//! day, so pushing the repository adds exactly one unit of activity per event.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{NaiveDate, NaiveTime};

use crate::calendar::grid::{CountKind, GridState, IncrementEvent};
use crate::io::configuration::{
    ASCII_IMAGE_FILE, CALENDAR_DATA_FILE, COMMIT_NOTICE, DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME,
};
use crate::io::error::{Result, SynthesisError, file_system_error, invalid_parameter};
use crate::io::render::{ascii_image, calendar_data};
use crate::synthesis::scale::ScaleResolution;

/// Accepts increment events in order and records each one durably
pub trait LedgerSink {
    /// Record a single increment
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be recorded; the caller must treat
    /// the event as not having happened
    fn record(&mut self, event: &IncrementEvent) -> Result<()>;
}

/// Sink that keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Events in the order they were recorded
    pub events: Vec<IncrementEvent>,
}

impl LedgerSink for RecordingSink {
    fn record(&mut self, event: &IncrementEvent) -> Result<()> {
        self.events.push(*event);
        Ok(())
    }
}

/// Sink that only counts events, used for dry runs
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingSink {
    /// Number of events seen
    pub recorded: u64,
}

impl LedgerSink for CountingSink {
    fn record(&mut self, _event: &IncrementEvent) -> Result<()> {
        self.recorded += 1;
        Ok(())
    }
}

/// Name and email stamped as both author and committer of ledger commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    /// Person name
    pub name: String,
    /// Email address
    pub email: String,
}

impl CommitIdentity {
    /// Identity with the given name and email
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHOR_NAME, DEFAULT_AUTHOR_EMAIL)
    }
}

/// Git repository receiving one commit per increment
///
/// The mirror grid only advances once a commit has landed, so a ledger whose commit
/// failed can keep recording from the same event.
pub struct GitLedger {
    directory: PathBuf,
    mirror: GridState,
    resolution: ScaleResolution,
    commit_time: NaiveTime,
    identity: CommitIdentity,
}

impl GitLedger {
    /// Initialize (or reuse) a repository at `directory`
    ///
    /// `grid` must already carry its targets; the ledger keeps its own copy to
    /// render the tracked files after every event.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, `git init` fails, or the
    /// commit hour is not a valid hour of day
    pub fn init(
        directory: &Path,
        grid: &GridState,
        resolution: ScaleResolution,
        commit_hour: u32,
    ) -> Result<Self> {
        let commit_time = NaiveTime::from_hms_opt(commit_hour, 0, 0)
            .ok_or_else(|| invalid_parameter("commit_hour", &commit_hour, &"must be 0-23"))?;

        fs::create_dir_all(directory)
            .map_err(|e| file_system_error(directory, "create ledger directory", e))?;

        let ledger = Self {
            directory: directory.to_path_buf(),
            mirror: grid.clone(),
            resolution,
            commit_time,
            identity: CommitIdentity::default(),
        };
        ledger.git(&["init", "--quiet"], None)?;
        tracing::info!(directory = %directory.display(), "initialized git ledger");
        Ok(ledger)
    }

    /// Stamp commits with `identity` instead of the default one
    #[must_use]
    pub fn with_identity(mut self, identity: CommitIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Identity stamped on every commit
    pub const fn identity(&self) -> &CommitIdentity {
        &self.identity
    }

    /// Repository location
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Timestamp stamped on commits for a calendar day
    pub fn commit_timestamp(&self, date: NaiveDate) -> String {
        date.and_time(self.commit_time)
            .format("%Y-%m-%dT%H:%M:%S+0000")
            .to_string()
    }

    /// Commit message for an event
    pub fn commit_message(event: &IncrementEvent) -> String {
        format!(
            "({}, {}) -> {}{COMMIT_NOTICE}",
            event.row, event.column, event.value
        )
    }

    fn write_tracked_files(&self, grid: &GridState) -> Result<()> {
        let image_path = self.directory.join(ASCII_IMAGE_FILE);
        fs::write(
            &image_path,
            ascii_image(grid, &self.resolution, CountKind::Current),
        )
        .map_err(|e| file_system_error(&image_path, "write ascii image", e))?;

        let data_path = self.directory.join(CALENDAR_DATA_FILE);
        fs::write(&data_path, calendar_data(grid))
            .map_err(|e| file_system_error(&data_path, "write calendar data", e))
    }

    fn git(&self, args: &[&str], date: Option<&str>) -> Result<()> {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.directory).args(args);
        if let Some(timestamp) = date {
            command
                .env("GIT_AUTHOR_NAME", &self.identity.name)
                .env("GIT_AUTHOR_EMAIL", &self.identity.email)
                .env("GIT_AUTHOR_DATE", timestamp)
                .env("GIT_COMMITTER_NAME", &self.identity.name)
                .env("GIT_COMMITTER_EMAIL", &self.identity.email)
                .env("GIT_COMMITTER_DATE", timestamp);
        }

        let output = command
            .output()
            .map_err(|e| file_system_error(&self.directory, "run git", e))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(SynthesisError::Command {
                program: "git",
                arguments: args.join(" "),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}

impl LedgerSink for GitLedger {
    fn record(&mut self, event: &IncrementEvent) -> Result<()> {
        let mut next = self.mirror.clone();
        next.apply(event)?;
        self.write_tracked_files(&next)?;
        self.git(&["add", ASCII_IMAGE_FILE, CALENDAR_DATA_FILE], None)?;

        let timestamp = self.commit_timestamp(event.date);
        let message = Self::commit_message(event);
        self.git(&["commit", "--quiet", "-m", &message], Some(&timestamp))?;
        self.mirror = next;
        tracing::trace!(
            row = event.row,
            column = event.column,
            value = event.value,
            date = %event.date,
            "committed increment"
        );
        Ok(())
    }
}
