//! Client-side completion detection.
//!
//! The worker signals completion informally, through well-known phrases
//! in its log output. The detector consumes decoded text chunks as they
//! arrive, keeps a display log of non-empty lines, and latches a
//! completion flag the first time a sentinel phrase shows up.
//!
//! Detection is substring-based, not a protocol: any worker output that
//! happens to contain a sentinel phrase flips the flag early. The
//! phrases below are a stable contract between the worker and the UI --
//! do not edit them without changing both sides.

/// The worker finished and left its browser session open for manual
/// follow-up.
pub const SENTINEL_BROWSER_KEPT_OPEN: &str = "브라우저가 열린 상태로 유지됩니다";

/// A bounded automation test run completed successfully.
pub const SENTINEL_TEST_SUCCESS: &str = "자동화 테스트 성공";

/// The full registration flow ran to completion.
pub const SENTINEL_FULL_FLOW_DONE: &str = "전체 회원가입 자동화 테스트 완료";

/// All phrases that mark a job as complete.
pub const COMPLETION_SENTINELS: &[&str] = &[
    SENTINEL_BROWSER_KEPT_OPEN,
    SENTINEL_TEST_SUCCESS,
    SENTINEL_FULL_FLOW_DONE,
];

/// Incremental consumer of the job's text stream.
#[derive(Debug, Default)]
pub struct CompletionDetector {
    complete: bool,
    lines: Vec<String>,
}

impl CompletionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one decoded chunk: append its non-empty lines to the log
    /// and check it for completion sentinels.
    pub fn feed(&mut self, chunk: &str) {
        self.lines.extend(
            chunk
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );

        if !self.complete {
            self.complete = COMPLETION_SENTINELS
                .iter()
                .any(|sentinel| chunk.contains(sentinel));
        }
    }

    /// Whether a completion sentinel has been seen. Latches on the
    /// first match and never resets.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The accumulated display log, one entry per non-empty line.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_does_not_complete() {
        let mut detector = CompletionDetector::new();
        detector.feed("방문신청 페이지로 이동 중...\n로그인 성공\n");

        assert!(!detector.is_complete());
        assert_eq!(detector.lines().len(), 2);
    }

    #[test]
    fn each_sentinel_latches_completion() {
        for sentinel in COMPLETION_SENTINELS {
            let mut detector = CompletionDetector::new();
            detector.feed(&format!("작업 로그\n{sentinel}\n"));
            assert!(detector.is_complete(), "sentinel not detected: {sentinel}");
        }
    }

    #[test]
    fn completion_latches_across_later_chunks() {
        let mut detector = CompletionDetector::new();
        detector.feed("🌐 브라우저가 열린 상태로 유지됩니다.\n");
        assert!(detector.is_complete());

        detector.feed("이후 로그는 상태를 바꾸지 않습니다\n");
        assert!(detector.is_complete());
    }

    #[test]
    fn empty_and_whitespace_lines_are_dropped_from_log() {
        let mut detector = CompletionDetector::new();
        detector.feed("first\n\n   \nsecond\n");

        assert_eq!(detector.lines(), ["first", "second"]);
    }

    #[test]
    fn error_marker_lines_pass_through_to_log() {
        let mut detector = CompletionDetector::new();
        detector.feed("ERROR: selenium timeout\n");

        assert_eq!(detector.lines(), ["ERROR: selenium timeout"]);
        assert!(!detector.is_complete());
    }

    #[test]
    fn sentinel_inside_a_larger_line_still_matches() {
        let mut detector = CompletionDetector::new();
        detector.feed("✅ 일진홀딩스 자동화 테스트 성공!\n");

        assert!(detector.is_complete());
    }
}
