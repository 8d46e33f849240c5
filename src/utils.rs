use indicatif::{ProgressBar, ProgressStyle};

pub static SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:2.cyan/blue} {msg}";

pub fn new_spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(SPINNER_TEMPLATE).expect("Invalid spinner template");
    let spinner = ProgressBar::new_spinner()
        .with_message(message.to_string())
        .with_style(style);

    spinner
}
