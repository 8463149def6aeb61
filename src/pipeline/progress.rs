//! Progress reporting for long-running generation
//!
//! The comic pipeline runs four stages and then polls the image service
//! up to sixty times; callers that front a user (the interactive shell)
//! want to show that movement, while tests and batch callers do not.
//! [`ProgressSink`] is the seam between the two.

/// Receives progress reports from the comic pipeline
///
/// Stage milestones arrive at fixed percentages (25, 50, 75, 100) with a
/// short label; poll attempts arrive once per poll with the attempt
/// number and the budget.
pub trait ProgressSink: Send + Sync {
    /// A pipeline stage completed
    fn stage(&self, percent: u8, label: &str);

    /// One image-result poll was performed
    fn poll_attempt(&self, attempt: u32, max_attempts: u32);
}

/// Progress sink that reports through tracing
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn stage(&self, percent: u8, label: &str) {
        tracing::info!("[{}%] {}", percent, label);
    }

    fn poll_attempt(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!("Waiting for image ({}/{})", attempt, max_attempts);
    }
}

/// Progress sink that discards all reports
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn stage(&self, _percent: u8, _label: &str) {}

    fn poll_attempt(&self, _attempt: u32, _max_attempts: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every report for assertion
    #[derive(Default)]
    pub struct RecordingProgress {
        pub stages: Mutex<Vec<(u8, String)>>,
        pub polls: Mutex<Vec<(u32, u32)>>,
    }

    impl ProgressSink for RecordingProgress {
        fn stage(&self, percent: u8, label: &str) {
            self.stages.lock().unwrap().push((percent, label.to_string()));
        }

        fn poll_attempt(&self, attempt: u32, max_attempts: u32) {
            self.polls.lock().unwrap().push((attempt, max_attempts));
        }
    }

    #[test]
    fn test_recording_sink_captures_reports() {
        let sink = RecordingProgress::default();
        sink.stage(25, "Creating your story");
        sink.poll_attempt(1, 60);

        assert_eq!(
            sink.stages.lock().unwrap().as_slice(),
            &[(25, "Creating your story".to_string())]
        );
        assert_eq!(sink.polls.lock().unwrap().as_slice(), &[(1, 60)]);
    }

    #[test]
    fn test_null_sink_is_object_safe() {
        let sink: &dyn ProgressSink = &NullProgress;
        sink.stage(100, "done");
        sink.poll_attempt(60, 60);
    }
}
