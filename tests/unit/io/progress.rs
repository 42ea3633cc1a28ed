//! Tests for progress observers

#[cfg(test)]
mod tests {
    use contribsynth::io::progress::{NoProgress, ProgressObserver, ProgressReporter};

    // Tests closures receive every update unchanged
    // Verified by swapping the argument order
    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |completed: u64, total: u64| seen.push((completed, total));
            observer.on_progress(1, 3);
            observer.on_progress(3, 3);
        }
        assert_eq!(seen, vec![(1, 3), (3, 3)]);
    }

    // Tests the silent observer accepts updates
    #[test]
    fn test_no_progress() {
        let mut observer = NoProgress;
        observer.on_progress(0, 0);
        observer.on_progress(10, 5);
    }

    // Tests the bar follows the reported position and adopts a changed total
    // Verified by ignoring the total
    #[test]
    fn test_reporter_tracks_position() {
        let mut reporter = ProgressReporter::hidden(10);
        assert_eq!(reporter.position(), 0);

        reporter.on_progress(4, 10);
        assert_eq!(reporter.position(), 4);

        reporter.on_progress(12, 20);
        assert_eq!(reporter.position(), 12);
        reporter.finish();
    }

    // Tests an empty run reports without dividing by zero
    // Verified by dividing by the raw total
    #[test]
    fn test_reporter_empty_total() {
        let mut reporter = ProgressReporter::hidden(0);
        reporter.on_progress(0, 0);
        assert_eq!(reporter.position(), 0);
        reporter.finish();
    }
}
