/// Lightweight reference to a harvested file, held while the requester
/// decides what to do with the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub url: String,
}

/// Where a requester's interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// A harvest is running for the held query.
    Searching,
    /// A harvest finished; waiting on the confirm/cancel choice.
    AwaitingChoice,
    /// Delivery is in flight and can no longer be cancelled.
    Delivering,
}

/// Per-requester slot: the most recent harvest and its originating query,
/// valid until the next query or an explicit cancel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    state: SessionState,
    query: Option<String>,
    pending: Vec<FileRef>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn pending(&self) -> &[FileRef] {
        &self.pending
    }

    pub(crate) fn begin_search(&mut self, query: String) {
        self.state = SessionState::Searching;
        self.query = Some(query);
        self.pending.clear();
    }

    pub(crate) fn hold_harvest(&mut self, files: Vec<FileRef>) {
        self.state = SessionState::AwaitingChoice;
        self.pending = files;
    }

    /// Hands the held files to delivery, leaving the slot non-cancellable.
    pub(crate) fn begin_delivery(&mut self) -> Vec<FileRef> {
        self.state = SessionState::Delivering;
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
