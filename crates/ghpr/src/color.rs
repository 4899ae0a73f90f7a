use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Apply the color choice to the global `colored` switch
pub fn init(choice: ColorChoice) {
    let no_color = std::env::var_os("NO_COLOR").is_some();
    colored::control::set_override(should_color(
        choice,
        no_color,
        std::io::stdout().is_terminal(),
    ));
}

/// `auto` honours NO_COLOR (https://no-color.org/) and only colors a terminal
fn should_color(choice: ColorChoice, no_color: bool, is_terminal: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => !no_color && is_terminal,
    }
}
