//! Interactive prompts.

use inquire::{
    CustomUserError, Password, PasswordDisplayMode, Text,
    autocompletion::{Autocomplete, Replacement},
};
use skycheck_core::suggest;

/// Completes city names from the preset list as the user types.
#[derive(Debug, Clone, Default)]
pub struct CityCompleter;

impl Autocomplete for CityCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(suggest(input).into_iter().map(str::to_string).collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

pub fn city() -> anyhow::Result<String> {
    let answer = Text::new("City:")
        .with_placeholder("e.g. Philadelphia, US")
        .with_autocomplete(CityCompleter)
        .prompt()?;

    Ok(answer)
}

pub fn api_key() -> anyhow::Result<String> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    Ok(key)
}
