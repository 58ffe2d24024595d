use crate::views::settings_form::SettingsForm;
use actix::Message;

/// Unsaved edits typed into the settings form.
#[derive(Debug, Clone)]
pub struct EditSettingsPayload {
    pub form: SettingsForm,
}

impl Message for EditSettingsPayload {
    type Result = ();
}
