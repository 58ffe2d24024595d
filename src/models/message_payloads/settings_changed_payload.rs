use crate::views::settings_editor::SettingsEditorState;
use actix::Message;

#[derive(Debug, Clone)]
pub struct SettingsChangedPayload {
    pub state: SettingsEditorState,
}

impl Message for SettingsChangedPayload {
    type Result = ();
}
