use crate::FileRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Free-text query from the requester.
    QueryReceived(String),
    /// The harvest finished with at least one file; `description` is the
    /// user-facing listing text.
    HarvestReady {
        files: Vec<FileRef>,
        description: String,
    },
    /// The harvest produced nothing; `message` is user-facing.
    HarvestFailed { message: String },
    /// The requester confirmed the pending download.
    ConfirmReceived,
    /// The requester cancelled the pending download.
    CancelReceived,
    /// The delivery run reached its end.
    DeliveryFinished,
}
