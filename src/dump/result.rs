// ABOUTME: Outcome counters of one import run
// ABOUTME: Tracks successes, failed attempts and only the most recent failure

use serde::Serialize;

/// Tally of an import run.
///
/// `error_num` counts failed *attempts*, so one statement retried three times
/// adds three. `error_msg`/`error_sql` describe the last failure seen, not a
/// history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub success_num: u64,
    pub error_num: u64,
    pub error_msg: Option<String>,
    pub error_sql: Option<String>,
}

impl ImportResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_success(&mut self) {
        self.success_num += 1;
    }

    pub(crate) fn record_failure(&mut self, message: &str, sql: &str) {
        self.error_num += 1;
        self.error_msg = Some(message.to_string());
        self.error_sql = Some(sql.to_string());
    }

    pub fn has_errors(&self) -> bool {
        self.error_num > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_failure_wins() {
        let mut result = ImportResult::new();
        result.record_failure("first", "INSERT INTO a VALUES (1);");
        result.record_success();
        result.record_failure("second", "INSERT INTO b VALUES (2);");

        assert_eq!(result.success_num, 1);
        assert_eq!(result.error_num, 2);
        assert_eq!(result.error_msg.as_deref(), Some("second"));
        assert_eq!(result.error_sql.as_deref(), Some("INSERT INTO b VALUES (2);"));
        assert!(result.has_errors());
    }

    #[test]
    fn test_serializes_for_reports() {
        let result = ImportResult {
            success_num: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success_num"], 3);
        assert!(json["error_msg"].is_null());
    }
}
