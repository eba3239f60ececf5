//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}: {}", style("success").green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{}: {}", style("info").blue().bold(), message);
}

/// Print a phase header such as `{Cleaning}`
pub fn print_phase(name: &str) {
    println!("{}", style(format!("{{{}}}", name)).cyan().bold());
}

/// Print an indented detail line belonging to the current phase
pub fn print_step(message: &str) {
    println!(" * {}", message);
}

/// Create a spinner progress bar
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Human-readable byte size
pub fn format_size(size_bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}
