//! Sizes, durations and the output summary table.

use std::path::PathBuf;
use std::time::Duration;

use console::Term;
use owo_colors::OwoColorize;

use super::colors_enabled;

/// One written output file
#[derive(Debug, Clone)]
pub struct OutputSummary {
    /// Registration name of the module
    pub name: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Human-readable byte count.
///
/// ```
/// use modshift_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Human-readable duration.
///
/// ```
/// use modshift_cli::ui::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(42)), "42ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the written files and the total on stderr.
pub fn print_summary(outputs: &[OutputSummary], elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let name_width = outputs.iter().map(|o| o.name.len()).max().unwrap_or(0);

    eprintln!();
    for output in outputs {
        let size = format_size(output.bytes);
        if colors_enabled() {
            eprintln!(
                "  {:<name_width$}  {}  {}",
                output.name.cyan(),
                size.dimmed(),
                output.path.display().dimmed()
            );
        } else {
            eprintln!("  {:<name_width$}  {}  {}", output.name, size, output.path.display());
        }
    }
    eprintln!("{}", "─".repeat(width));

    let total: u64 = outputs.iter().map(|o| o.bytes).sum();
    let line = format!(
        "{} modules, {} in {}",
        outputs.len(),
        format_size(total),
        format_duration(elapsed)
    );
    if colors_enabled() {
        eprintln!("  {}", line.bold());
    } else {
        eprintln!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1_048_576), "1.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024 * 1024), "5120.00 GB");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
    }
}
