use chrono::{Local, NaiveDateTime};

use crate::submission::Submission;

/// Column names of the store, in file order.
pub const HEADER: [&str; 4] = ["Name", "Email", "Date", "Time"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// One stored submission: validated contact fields plus the wall-clock time
/// the server accepted them.
///
/// Immutable once built; the store consumes it on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    name: String,
    email: String,
    date: String,
    time: String,
}

impl SubmissionRecord {
    /// Build a record stamped with an explicit local timestamp.
    pub fn new(submission: Submission, at: NaiveDateTime) -> Self {
        Self {
            name: submission.name,
            email: submission.email,
            date: at.format(DATE_FORMAT).to_string(),
            time: at.format(TIME_FORMAT).to_string(),
        }
    }

    /// Build a record stamped with the current local time.
    pub fn stamped_now(submission: Submission) -> Self {
        Self::new(submission, Local::now().naive_local())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// `YYYY-MM-DD`
    pub fn date(&self) -> &str {
        &self.date
    }

    /// `HH:MM:SS`
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Field values in [`HEADER`] order.
    pub fn fields(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.date, &self.time]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamp_formatting() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(8, 5, 9)
            .unwrap();
        let record = SubmissionRecord::new(
            Submission {
                name: "Ada".to_string(),
                email: "ada@x.com".to_string(),
            },
            at,
        );

        assert_eq!(record.fields(), ["Ada", "ada@x.com", "2026-03-07", "08:05:09"]);
    }
}
