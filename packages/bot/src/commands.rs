// ABOUTME: Recognized bot commands
// ABOUTME: Parses the leading slash-token of an inbound message

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    AddTask,
    Tasks,
    DoneTask,
    Cancel,
}

impl Command {
    /// Parse the leading token of a message as a command.
    ///
    /// Strips an optional `@botname` suffix (group-chat addressing).
    /// Unrecognized slash-words return `None` and are dropped entirely:
    /// they are neither commands nor flow input.
    pub fn parse(text: &str) -> Option<Command> {
        let token = text.split_whitespace().next()?;
        let name = match token.split_once('@') {
            Some((name, _)) => name,
            None => token,
        };

        match name {
            "/start" => Some(Command::Start),
            "/help" => Some(Command::Help),
            "/addtask" => Some(Command::AddTask),
            "/tasks" => Some(Command::Tasks),
            "/donetask" => Some(Command::DoneTask),
            "/cancel" => Some(Command::Cancel),
            _ => None,
        }
    }
}
