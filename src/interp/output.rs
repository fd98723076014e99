/// Capacity-limited output sink.
///
/// Program text is appended at a monotonically increasing cursor and
/// never grows past the installed limit; a write that would overflow
/// is truncated and flagged, and the native print functions report the
/// flag as a fatal condition.
#[derive(Debug)]
pub struct Output {
    buf: String,
    limit: usize,
    overflow: bool,
}

impl Output {
    pub fn new(limit: usize) -> Output {
        Output {
            buf: String::new(),
            limit,
            overflow: false,
        }
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflow = false;
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    pub fn push(&mut self, c: char) {
        if self.buf.len() + c.len_utf8() > self.limit {
            self.overflow = true;
            return;
        }
        self.buf.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            self.push(c);
        }
    }

    /// Replace whatever partial output exists with an error report.
    /// Reports bypass the capacity limit.
    pub fn force(&mut self, report: &str) {
        self.buf.clear();
        self.buf.push_str(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_at_limit() {
        let mut out = Output::new(4);
        out.push_str("abcdef");
        assert_eq!(out.as_str(), "abcd");
        assert!(out.overflowed());
    }

    #[test]
    fn test_exact_fit_is_not_overflow() {
        let mut out = Output::new(3);
        out.push_str("abc");
        assert_eq!(out.as_str(), "abc");
        assert!(!out.overflowed());
    }

    #[test]
    fn test_force_replaces_content() {
        let mut out = Output::new(4);
        out.push_str("abcdef");
        out.force("result doesn't fit");
        assert_eq!(out.as_str(), "result doesn't fit");
    }
}
