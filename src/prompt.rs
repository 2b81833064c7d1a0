use reedline::{Prompt, PromptEditMode, PromptHistorySearch};
use std::{borrow::Cow, env};

/// `<cwd> $ `, re-read on every render so `cd` shows up immediately.
pub struct CwdPrompt;

impl Prompt for CwdPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(current_dir_label())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(" $ ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(&self, _history_search: PromptHistorySearch) -> Cow<'_, str> {
        Cow::Borrowed("(search) ")
    }
}

fn current_dir_label() -> String {
    env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "?".into())
}
