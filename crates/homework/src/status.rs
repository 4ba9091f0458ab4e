use crate::{error::PollError, response::HomeworkRecord};

/// Status the reviewer has not finished yet.
pub const REVIEWING: &str = "reviewing";
/// Alias of [`REVIEWING`] accepted on input.
pub const PENDING_REVIEW: &str = "pending-review";
/// Reviewer accepted the work.
pub const APPROVED: &str = "approved";
/// Reviewer returned the work with remarks.
pub const REJECTED: &str = "rejected";

/// Verdict text for a raw status code.
///
/// Fails closed: anything outside the table is an [`PollError::UnrecognizedStatus`].
pub fn verdict(status: &str) -> Result<&'static str, PollError> {
    match status {
        REVIEWING | PENDING_REVIEW => Ok("Work taken for review."),
        APPROVED => Ok("Work reviewed: reviewer fully satisfied."),
        REJECTED => Ok("Work reviewed: reviewer has remarks."),
        other => Err(PollError::UnrecognizedStatus(other.to_owned())),
    }
}

/// Compose the notification text for a homework record.
pub fn parse_status(homework: &HomeworkRecord) -> Result<String, PollError> {
    let (name, status) = homework.fields()?;
    Ok(message(name, verdict(status)?))
}

/// Compose the notification text from a name and an already mapped verdict.
pub fn message(name: &str, verdict: &str) -> String {
    format!("Review status changed for \"{}\". {}", name, verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record(name: Option<&str>, status: Option<&str>) -> HomeworkRecord {
        let mut map = serde_json::Map::new();
        if let Some(name) = name {
            map.insert("homework_name".to_owned(), name.into());
        }
        if let Some(status) = status {
            map.insert("status".to_owned(), status.into());
        }
        HomeworkRecord::from(serde_json::Value::Object(map))
    }

    #[test]
    fn verdict_table() {
        assert_eq!(verdict("reviewing").unwrap(), "Work taken for review.");
        assert_eq!(verdict("pending-review").unwrap(), "Work taken for review.");
        assert_eq!(verdict("approved").unwrap(), "Work reviewed: reviewer fully satisfied.");
        assert_eq!(verdict("rejected").unwrap(), "Work reviewed: reviewer has remarks.");
    }

    #[test]
    fn unknown_status_fails_closed() {
        for raw in ["", "APPROVED", "done", "rejected "] {
            let err = verdict(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnrecognizedStatus, "status {raw:?}");
        }
    }

    #[test]
    fn parse_status_builds_message() {
        let msg = parse_status(&record(Some("hw1"), Some("approved"))).unwrap();
        assert_eq!(msg, "Review status changed for \"hw1\". Work reviewed: reviewer fully satisfied.");
    }

    #[test]
    fn parse_status_distinguishes_missing_fields() {
        let err = parse_status(&record(None, Some("approved"))).unwrap_err();
        assert!(matches!(err, PollError::MissingField("homework_name")));

        let err = parse_status(&record(Some("hw1"), None)).unwrap_err();
        assert!(matches!(err, PollError::MissingField("status")));

        // name is checked first
        let err = parse_status(&record(None, None)).unwrap_err();
        assert!(matches!(err, PollError::MissingField("homework_name")));
    }

    #[test]
    fn parse_status_rejects_unknown_status() {
        let err = parse_status(&record(Some("hw1"), Some("lost"))).unwrap_err();
        assert!(matches!(err, PollError::UnrecognizedStatus(ref s) if s == "lost"));
    }
}
