use nu_ansi_term::Color;

use crate::error::{Result, ShellError};

/// Raw-input prefix of the colour pseudo-command.
pub const COLOR_PREFIX: &str = "color text";

/// Wraps `text` in a 24-bit foreground escape followed by a reset.
pub fn color_text(text: &str, r: u8, g: u8, b: u8) -> String {
    Color::Rgb(r, g, b).paint(text).to_string()
}

/// Uniform error rendering: the message in red.
pub fn error_text(message: impl std::fmt::Display) -> String {
    color_text(&message.to_string(), 255, 0, 0)
}

pub fn render_error(err: &ShellError) -> String {
    error_text(format!("Error: {err}"))
}

/// Handles `color text <r> <g> <b> <text...>`.
///
/// Returns `None` when `raw` does not start with the prefix, so the caller
/// falls through to normal parsing. The check runs on the untouched input.
pub fn parse_color_command(raw: &str) -> Option<Result<String>> {
    if !raw.starts_with(COLOR_PREFIX) {
        return None;
    }
    Some(render_color_command(raw))
}

fn render_color_command(raw: &str) -> Result<String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 5 {
        return Err(ShellError::ColorArgs);
    }

    let component = |s: &str| {
        s.parse::<u8>()
            .map_err(|_| ShellError::ColorComponent(s.to_string()))
    };
    let (r, g, b) = (component(tokens[2])?, component(tokens[3])?, component(tokens[4])?);

    Ok(color_text(&tokens[5..].join(" "), r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_truecolor_escape_and_reset() {
        assert_eq!(
            color_text("hello", 255, 0, 0),
            "\x1b[38;2;255;0;0mhello\x1b[0m"
        );
    }

    #[test]
    fn color_command_joins_remaining_tokens() {
        let out = parse_color_command("color text 10 20 30 hello   world").unwrap().unwrap();
        assert_eq!(out, "\x1b[38;2;10;20;30mhello world\x1b[0m");
    }

    #[test]
    fn non_prefixed_input_is_not_claimed() {
        assert!(parse_color_command("echo color text").is_none());
        assert!(parse_color_command("  color text 1 2 3 x").is_none());
    }

    #[test]
    fn too_few_tokens_is_an_error() {
        let err = parse_color_command("color text 1 2").unwrap().unwrap_err();
        assert!(matches!(err, ShellError::ColorArgs));
    }

    #[test]
    fn bad_component_is_an_error() {
        let err = parse_color_command("color text 1 x 3 hi").unwrap().unwrap_err();
        assert!(matches!(err, ShellError::ColorComponent(ref s) if s == "x"));

        let err = parse_color_command("color text 256 0 0 hi").unwrap().unwrap_err();
        assert!(matches!(err, ShellError::ColorComponent(ref s) if s == "256"));
    }

    #[test]
    fn errors_render_in_red() {
        let out = render_error(&ShellError::ColorArgs);
        assert!(out.starts_with("\x1b[38;2;255;0;0mError: usage"));
        assert!(out.ends_with("\x1b[0m"));
    }
}
