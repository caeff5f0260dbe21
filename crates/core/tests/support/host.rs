use parking_lot::Mutex;
use toggldeck_core::HostOutlet;
use toggldeck_domain::{ButtonId, ButtonSettings, ButtonState, HostCommand};

/// Records every command the engine sends.
#[derive(Default)]
pub struct RecordingHost {
    commands: Mutex<Vec<HostCommand>>,
}

impl RecordingHost {
    pub fn commands(&self) -> Vec<HostCommand> {
        self.commands.lock().clone()
    }

    pub fn clear(&self) {
        self.commands.lock().clear();
    }

    pub fn last_title(&self, id: &str) -> Option<String> {
        self.commands.lock().iter().rev().find_map(|command| match command {
            HostCommand::SetTitle { context, payload } if context.as_str() == id => {
                Some(payload.title.clone())
            }
            _ => None,
        })
    }

    pub fn last_state(&self, id: &str) -> Option<ButtonState> {
        self.commands.lock().iter().rev().find_map(|command| match command {
            HostCommand::SetState { context, payload } if context.as_str() == id => {
                Some(payload.state)
            }
            _ => None,
        })
    }

    pub fn alerts(&self, id: &str) -> usize {
        self.commands
            .lock()
            .iter()
            .filter(|command| {
                matches!(command, HostCommand::ShowAlert { context } if context.as_str() == id)
            })
            .count()
    }

    pub fn persisted_settings(&self, id: &str) -> Option<ButtonSettings> {
        self.commands.lock().iter().rev().find_map(|command| match command {
            HostCommand::SetSettings { context, payload } if context.as_str() == id => {
                Some(payload.clone())
            }
            _ => None,
        })
    }

    pub fn settings_requests(&self) -> Vec<ButtonId> {
        self.commands
            .lock()
            .iter()
            .filter_map(|command| match command {
                HostCommand::GetSettings { context } => Some(context.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn inspector_payloads(&self, id: &str) -> Vec<serde_json::Value> {
        self.commands
            .lock()
            .iter()
            .filter_map(|command| match command {
                HostCommand::SendToPropertyInspector { context, payload }
                    if context.as_str() == id =>
                {
                    Some(payload.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.commands
            .lock()
            .iter()
            .filter_map(|command| match command {
                HostCommand::OpenUrl { payload } => Some(payload.url.clone()),
                _ => None,
            })
            .collect()
    }
}

impl HostOutlet for RecordingHost {
    fn send(&self, command: HostCommand) {
        self.commands.lock().push(command);
    }
}
