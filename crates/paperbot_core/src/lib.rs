//! Paperbot core: pure per-requester session state machine.
mod effect;
mod msg;
mod state;
mod update;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{FileRef, Session, SessionState};
pub use update::update;
