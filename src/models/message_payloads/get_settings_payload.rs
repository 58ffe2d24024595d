use crate::views::settings_editor::SettingsEditorState;
use actix::Message;

#[derive(Debug, Clone)]
pub struct GetSettingsPayload;

impl Message for GetSettingsPayload {
    type Result = SettingsEditorState;
}
