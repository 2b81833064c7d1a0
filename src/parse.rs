// A command name plus its arguments, as typed (or as produced by alias expansion)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

// Splits a raw line on runs of whitespace.
// No quoting or escaping: a token can never contain a space.
pub fn parse_input(raw: &str) -> Option<ParsedCommand> {
    let mut tokens = raw.split_whitespace().map(str::to_string);
    let command = tokens.next()?;
    Some(ParsedCommand::new(command, tokens.collect()))
}
