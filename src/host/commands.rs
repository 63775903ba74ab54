use crate::reminder::SurfaceMessage;

pub const RESET_TIMERS_COMMAND: &str = "healthReminder.resetTimers";
pub const SHOW_STATUS_COMMAND: &str = "healthReminder.showStatus";
/// Name under which free text typed into the host is dispatched.
pub const TYPE_COMMAND: &str = "type";

/// Actions contributed by the reminder.
pub const ACTIONS: [&str; 2] = [RESET_TIMERS_COMMAND, SHOW_STATUS_COMMAND];

/// One line of input to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    ResetTimers,
    ShowStatus,
    Help,
    Quit,
    /// Message coming from the modal surface.
    Surface(SurfaceMessage),
    /// Any other named host command, such as `workbench.action.files.save`.
    Execute(String),
    Type(String),
}

impl HostCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.starts_with('{') {
            return match serde_json::from_str::<SurfaceMessage>(trimmed) {
                Ok(message) => HostCommand::Surface(message),
                Err(_) => HostCommand::Type(line.into()),
            };
        }
        match trimmed {
            "" | "confirm" | "ok" => HostCommand::Surface(SurfaceMessage::Confirm),
            RESET_TIMERS_COMMAND | "reset" => HostCommand::ResetTimers,
            SHOW_STATUS_COMMAND | "status" => HostCommand::ShowStatus,
            "help" | "?" => HostCommand::Help,
            "quit" | "exit" => HostCommand::Quit,
            name if is_command_name(name) => HostCommand::Execute(name.into()),
            _ => HostCommand::Type(line.into()),
        }
    }

    /// Name the command is dispatched under.
    pub fn name(&self) -> &str {
        match self {
            HostCommand::ResetTimers => RESET_TIMERS_COMMAND,
            HostCommand::ShowStatus => SHOW_STATUS_COMMAND,
            HostCommand::Help => "help",
            HostCommand::Quit => "quit",
            HostCommand::Surface(SurfaceMessage::Confirm) => "confirm",
            HostCommand::Execute(name) => name,
            HostCommand::Type(_) => TYPE_COMMAND,
        }
    }
}

fn is_command_name(text: &str) -> bool {
    text.contains('.')
        && !text.starts_with('.')
        && !text.ends_with('.')
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

pub fn help_text() -> String {
    format!(
        "Commands:\n  reset ({RESET_TIMERS_COMMAND})  restart both timers\n  status ({SHOW_STATUS_COMMAND})  show time left\n  confirm / Enter  confirm an open reminder\n  quit  stop the session"
    )
}
