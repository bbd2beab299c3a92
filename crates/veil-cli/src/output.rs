use colored::Colorize;
use veil_application::workflow::{Notification, ResultView, Severity};

pub fn notify(notification: &Notification) {
    match notification.severity {
        Severity::Success => {
            println!("{} {}", "✓".green(), notification.title.green().bold());
            println!("  {}", notification.description);
        }
        Severity::Error => {
            eprintln!("{} {}", "✗".red(), notification.title.red().bold());
            eprintln!("  {}", notification.description);
        }
    }
}

pub fn result(view: &ResultView) {
    println!();
    println!("{}", view.heading().bright_cyan().bold());
    if let ResultView::Text { message } = view {
        println!("{}", message);
    }
    if let Some(download) = view.download() {
        println!("{}: {}", download.label, download.url.underline());
    }
}

/// Marks an error whose notification has already been printed.
#[derive(Debug)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("failure already reported")
    }
}

impl std::error::Error for Reported {}

/// Prints the notification and returns an error that `main` will not print again.
pub fn fail(notification: &Notification) -> anyhow::Error {
    notify(notification);
    Reported.into()
}
