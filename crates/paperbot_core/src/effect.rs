use crate::FileRef;

/// Side effects requested by the update function; the platform layer
/// executes them and feeds resulting messages back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the harvest pipeline for this query.
    StartHarvest { query: String },
    /// Run the delivery pipeline over the held files.
    StartDelivery { query: String, files: Vec<FileRef> },
    /// Send a text notice to the requester.
    Notify { text: String },
}
