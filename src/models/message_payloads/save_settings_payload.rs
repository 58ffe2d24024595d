use crate::views::settings_form::SettingsForm;
use actix::Message;

/// Requests a save. A carried form replaces the editor's form first.
#[derive(Debug, Clone, Default)]
pub struct SaveSettingsPayload {
    pub form: Option<SettingsForm>,
}

impl Message for SaveSettingsPayload {
    type Result = ();
}
