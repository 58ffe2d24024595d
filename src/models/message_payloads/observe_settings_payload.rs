use crate::models::message_payloads::settings_changed_payload::SettingsChangedPayload;
use actix::{Message, Recipient};

pub struct ObserveSettingsPayload {
    pub observer: Recipient<SettingsChangedPayload>,
}

impl Message for ObserveSettingsPayload {
    type Result = ();
}
