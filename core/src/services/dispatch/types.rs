//! Types for dispatch results

/// What the dispatcher did with one received message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Sent and acknowledged
    Delivered,
    /// Permanent provider failure, acknowledged
    Rejected,
    /// Body could not be decoded or validated, acknowledged
    Malformed,
    /// Transient failure on the last allowed attempt, acknowledged
    Abandoned,
    /// Transient failure, left for redelivery
    Retry,
}

impl Disposition {
    /// Whether the dispatcher acknowledged the message
    pub fn is_acknowledged(&self) -> bool {
        !matches!(self, Disposition::Retry)
    }
}

/// Running totals per disposition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispositionCounts {
    pub delivered: u64,
    pub rejected: u64,
    pub malformed: u64,
    pub abandoned: u64,
    pub retried: u64,
}

impl DispositionCounts {
    pub fn record(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Delivered => self.delivered += 1,
            Disposition::Rejected => self.rejected += 1,
            Disposition::Malformed => self.malformed += 1,
            Disposition::Abandoned => self.abandoned += 1,
            Disposition::Retry => self.retried += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.delivered + self.rejected + self.malformed + self.abandoned + self.retried
    }
}

/// Result of processing one received batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Per-disposition totals
    pub counts: DispositionCounts,
    /// Message ids left unacknowledged (partial batch failures)
    pub unacknowledged: Vec<String>,
}

impl BatchReport {
    pub fn record(&mut self, message_id: &str, disposition: Disposition) {
        self.counts.record(disposition);
        if !disposition.is_acknowledged() {
            self.unacknowledged.push(message_id.to_string());
        }
    }
}
