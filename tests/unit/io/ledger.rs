//! Tests for in-memory sinks and the git-backed ledger

#[cfg(test)]
mod tests {
    use crate::date_at;
    use contribsynth::SynthesisError;
    use contribsynth::calendar::grid::{GridState, IncrementEvent};
    use contribsynth::io::configuration::{ASCII_IMAGE_FILE, CALENDAR_DATA_FILE};
    use contribsynth::io::ledger::{
        CommitIdentity, CountingSink, GitLedger, LedgerSink, RecordingSink,
    };
    use contribsynth::io::progress::NoProgress;
    use contribsynth::synthesis::emission::emit;
    use contribsynth::synthesis::scale::ScaleResolution;
    use std::fs;
    use std::path::Path;
    use std::process::Command;

    fn event(position: [usize; 2], value: u32) -> IncrementEvent {
        IncrementEvent {
            row: position[0],
            column: position[1],
            date: date_at(position),
            value,
        }
    }

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success())
    }

    fn git_output(directory: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(directory)
            .args(args)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    // Tests the recording sink keeps events in arrival order
    // Verified by inserting at the front
    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::default();
        sink.record(&event([0, 0], 1)).unwrap();
        sink.record(&event([0, 0], 2)).unwrap();

        assert_eq!(sink.events, vec![event([0, 0], 1), event([0, 0], 2)]);
    }

    // Tests the counting sink tallies without storing
    // Verified by counting only distinct cells
    #[test]
    fn test_counting_sink() {
        let mut sink = CountingSink::default();
        for value in 1..=5 {
            sink.record(&event([4, 9], value)).unwrap();
        }
        assert_eq!(sink.recorded, 5);
    }

    // Tests commit metadata derives from the event
    // Verified by formatting the column before the row
    #[test]
    fn test_commit_message() {
        let message = GitLedger::commit_message(&event([6, 12], 7));
        assert!(message.starts_with("(6, 12) -> 7\n\n"));
    }

    // Tests every event becomes one dated commit with refreshed tracked files
    // Verified by committing with the current date
    #[test]
    fn test_git_ledger_commits_each_event() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("ledger");

        let mut grid = GridState::new();
        grid.activate([0, 0], date_at([0, 0]), 0).unwrap();
        grid.activate([1, 0], date_at([1, 0]), 1).unwrap();
        grid.set_target([0, 0], 2).unwrap();
        grid.set_target([1, 0], 2).unwrap();

        let resolution = ScaleResolution::with_scale(1);
        let mut ledger = GitLedger::init(&repo, &grid, resolution, 12).unwrap();
        assert_eq!(ledger.directory(), repo.as_path());
        git_output(&repo, &["config", "commit.gpgsign", "false"]);

        let report = emit(&mut grid, &mut ledger, &mut NoProgress).unwrap();
        assert_eq!(report.emitted, 3);
        assert_eq!(git_output(&repo, &["rev-list", "--count", "HEAD"]), "3");

        let last_date = git_output(&repo, &["log", "-1", "--format=%ad", "--date=short"]);
        assert_eq!(last_date, date_at([1, 0]).format("%Y-%m-%d").to_string());

        let data = fs::read_to_string(repo.join(CALENDAR_DATA_FILE)).unwrap();
        assert_eq!(data, "20230101 2\n20230102 1\n");
        let ascii = fs::read_to_string(repo.join(ASCII_IMAGE_FILE)).unwrap();
        let rows: Vec<&str> = ascii.lines().map(str::trim_end).collect();
        assert_eq!(rows[..3], ["-", "-", ""]);
    }

    // Tests commits carry the ledger identity without any git user configuration
    // Verified by dropping the author environment variables
    #[test]
    fn test_git_ledger_stamps_identity() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let mut grid = GridState::new();
        grid.activate([0, 0], date_at([0, 0]), 0).unwrap();
        grid.set_target([0, 0], 1).unwrap();

        let identity = CommitIdentity::new("Pixel Painter", "painter@example.com");
        let mut ledger = GitLedger::init(dir.path(), &grid, ScaleResolution::with_scale(1), 12)
            .unwrap()
            .with_identity(identity.clone());
        assert_eq!(ledger.identity(), &identity);
        git_output(dir.path(), &["config", "commit.gpgsign", "false"]);

        emit(&mut grid, &mut ledger, &mut NoProgress).unwrap();
        assert_eq!(
            git_output(dir.path(), &["log", "-1", "--format=%an <%ae> / %cn <%ce>"]),
            "Pixel Painter <painter@example.com> / Pixel Painter <painter@example.com>"
        );
    }

    // Tests a ledger whose commit failed resumes from the rejected event
    // Verified by advancing the mirror grid before committing
    #[cfg(unix)]
    #[test]
    fn test_git_ledger_resumes_after_failed_commit() {
        use std::os::unix::fs::PermissionsExt;

        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let mut grid = GridState::new();
        grid.activate([0, 0], date_at([0, 0]), 0).unwrap();
        grid.set_target([0, 0], 2).unwrap();

        let mut ledger =
            GitLedger::init(dir.path(), &grid, ScaleResolution::with_scale(1), 12).unwrap();
        git_output(dir.path(), &["config", "commit.gpgsign", "false"]);

        let hook = dir.path().join(".git").join("hooks").join("pre-commit");
        fs::create_dir_all(hook.parent().unwrap()).unwrap();
        fs::write(&hook, "#!/bin/sh\nexit 1\n").unwrap();
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).unwrap();

        let failed = emit(&mut grid, &mut ledger, &mut NoProgress);
        assert!(matches!(failed, Err(SynthesisError::EmissionSink { value: 1, .. })));
        assert_eq!(grid.current([0, 0]), Some(0));

        fs::remove_file(&hook).unwrap();
        let report = emit(&mut grid, &mut ledger, &mut NoProgress).unwrap();
        assert_eq!(report.emitted, 2);
        assert_eq!(grid.current([0, 0]), Some(2));
        assert_eq!(git_output(dir.path(), &["rev-list", "--count", "HEAD"]), "2");
        let data = fs::read_to_string(dir.path().join(CALENDAR_DATA_FILE)).unwrap();
        assert_eq!(data, "20230101 2\n");
    }

    // Tests an out-of-range commit hour is rejected before touching disk
    // Verified by clamping the hour
    #[test]
    fn test_git_ledger_rejects_bad_hour() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("never-created");

        let result = GitLedger::init(&repo, &GridState::new(), ScaleResolution::with_scale(1), 24);
        assert!(result.is_err());
        assert!(!repo.exists());
    }

    // Tests commit timestamps pin the configured hour in UTC
    // Verified by ignoring the configured hour
    #[test]
    fn test_commit_timestamp() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let ledger =
            GitLedger::init(dir.path(), &GridState::new(), ScaleResolution::with_scale(1), 9)
                .unwrap();

        assert_eq!(
            ledger.commit_timestamp(date_at([3, 0])),
            "2023-01-04T09:00:00+0000"
        );
    }
}
