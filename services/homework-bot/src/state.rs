//! Poll loop state: what was last sent and where the query window starts

/// State carried from one cycle to the next. Lives for the process lifetime and
/// is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    pub last_notified_message: String,
    pub last_error_message: String,
    pub cursor_timestamp: i64,
}

impl PollState {
    pub fn new(cursor_timestamp: i64) -> Self {
        Self {
            cursor_timestamp,
            ..Self::default()
        }
    }

    /// Whether `message` differs from the last delivered status message
    pub fn is_new_status(&self, message: &str) -> bool {
        self.last_notified_message != message
    }

    pub fn record_notified(&mut self, message: &str) {
        self.last_notified_message = message.to_string();
    }

    /// Whether `diagnostic` differs from the last reported failure
    pub fn is_new_error(&self, diagnostic: &str) -> bool {
        self.last_error_message != diagnostic
    }

    pub fn record_error(&mut self, diagnostic: &str) {
        self.last_error_message = diagnostic.to_string();
    }

    /// Move the cursor to the server clock; it never moves backwards
    pub fn advance_cursor(&mut self, current_date: i64) {
        if current_date > self.cursor_timestamp {
            self.cursor_timestamp = current_date;
        } else if current_date < self.cursor_timestamp {
            tracing::warn!(
                "Server reported current_date {} behind cursor {}, keeping cursor",
                current_date,
                self.cursor_timestamp
            );
        }
    }
}
