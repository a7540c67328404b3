use crate::{Effect, Msg, Session, SessionState};

/// Pure update function: applies a message to the session and returns any
/// effects. Cancellation is coarse: a cancel only works while a harvest is
/// waiting on the choice; once delivery starts it runs to completion.
pub fn update(mut session: Session, msg: Msg) -> (Session, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryReceived(raw) => {
            let query = raw.trim().to_string();
            if query.is_empty() {
                vec![Effect::Notify {
                    text: "Please send a valid search query.".to_string(),
                }]
            } else {
                match session.state() {
                    SessionState::Searching | SessionState::Delivering => {
                        vec![Effect::Notify {
                            text: "A request is already in progress. Please wait for it to finish."
                                .to_string(),
                        }]
                    }
                    SessionState::Idle | SessionState::AwaitingChoice => {
                        // A fresh query replaces any harvest still waiting
                        // on a choice.
                        session.begin_search(query.clone());
                        vec![Effect::StartHarvest { query }]
                    }
                }
            }
        }
        Msg::HarvestReady { files, description } => match session.state() {
            SessionState::Searching => {
                session.hold_harvest(files);
                vec![Effect::Notify { text: description }]
            }
            _ => Vec::new(),
        },
        Msg::HarvestFailed { message } => match session.state() {
            SessionState::Searching => {
                session.clear();
                vec![Effect::Notify { text: message }]
            }
            _ => Vec::new(),
        },
        Msg::ConfirmReceived => match session.state() {
            SessionState::AwaitingChoice => {
                let query = session.query().unwrap_or_default().to_string();
                let files = session.begin_delivery();
                vec![Effect::StartDelivery { query, files }]
            }
            _ => vec![Effect::Notify {
                text: "Nothing to confirm. Send a search query first.".to_string(),
            }],
        },
        Msg::CancelReceived => match session.state() {
            SessionState::AwaitingChoice => {
                session.clear();
                vec![Effect::Notify {
                    text: "Download cancelled.".to_string(),
                }]
            }
            SessionState::Delivering => vec![Effect::Notify {
                text: "Delivery has already started and cannot be cancelled.".to_string(),
            }],
            _ => vec![Effect::Notify {
                text: "Nothing to cancel.".to_string(),
            }],
        },
        Msg::DeliveryFinished => {
            session.clear();
            Vec::new()
        }
    };

    (session, effects)
}
