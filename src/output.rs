//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Menu
//!
//! ```text
//! Supported operations:
//!     load image-path [image-name]                 load an image (name defaults to the file stem)
//!     red-component image-name dest-image-name     greyscale image from the red channel
//!     ...
//!     q or quit                                    quit
//! ```
//!
//! ## Histogram
//!
//! ```text
//! img 3x3 (9 pixels)
//!     red        peak 1 (x1)  mean 14.0
//!     green      peak 2 (x1)  mean 15.0
//!     blue       peak 3 (x1)  mean 16.0
//!     intensity  peak 2 (x1)  mean 15.0
//! ```
//!
//! ## Run summary
//!
//! ```text
//! Ran 4 commands, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::command::VERBS;
use crate::imaging::{Histogram, HistogramChannel, Image};
use crate::script::RunSummary;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Menu
// ============================================================================

/// Interpreter commands that are not registry transforms.
const BUILTINS_BEFORE: &[(&str, &str)] = &[
    ("load image-path [image-name]", "load an image (name defaults to the file stem)"),
    ("save image-path image-name", "save an image, format chosen by extension"),
];

const BUILTINS_AFTER: &[(&str, &str)] = &[
    ("show image-name", "print dimensions and every pixel"),
    ("histogram image-name", "print channel histogram summary"),
    ("menu", "print this list"),
    ("q or quit", "quit"),
];

/// The list of supported script operations.
pub fn format_menu() -> Vec<String> {
    let entries: Vec<(String, &str)> = BUILTINS_BEFORE
        .iter()
        .map(|&(usage, help)| (usage.to_string(), help))
        .chain(VERBS.iter().map(|v| (format!("{} {}", v.name, v.usage), v.help)))
        .chain(BUILTINS_AFTER.iter().map(|&(usage, help)| (usage.to_string(), help)))
        .collect();
    let width = entries.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);

    let mut lines = vec!["Supported operations:".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|(usage, help)| format!("{}{usage:<width$}  {help}", indent(1))),
    );
    lines
}

// ============================================================================
// Images
// ============================================================================

/// One-line identity of an image: name and dimensions.
pub fn format_image_summary(name: &str, image: &Image) -> String {
    format!("{name} {}x{}", image.width(), image.height())
}

/// Header line plus one line per histogram table.
pub fn format_histogram(name: &str, image: &Image, histogram: &Histogram) -> Vec<String> {
    let pixels = image.width() * image.height();
    let mut lines = vec![format!(
        "{} ({})",
        format_image_summary(name, image),
        plural(pixels, "pixel")
    )];
    for channel in HistogramChannel::ALL {
        let (value, count) = histogram.peak(channel);
        let mean = histogram
            .mean(channel)
            .map_or_else(|| "-".to_string(), |m| format!("{m:.1}"));
        lines.push(format!(
            "{}{:<10} peak {value} (x{count})  mean {mean}",
            indent(1),
            channel.name()
        ));
    }
    lines
}

pub fn print_histogram(name: &str, image: &Image, histogram: &Histogram) {
    for line in format_histogram(name, image, histogram) {
        println!("{line}");
    }
}

// ============================================================================
// Scripts
// ============================================================================

pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut line = format!("Ran {}", plural(summary.executed, "command"));
    if summary.failed > 0 {
        line.push_str(&format!(", {} failed", summary.failed));
    }
    vec![line]
}

pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{image_from_rows, sample_image};

    #[test]
    fn menu_lists_every_verb_and_builtin() {
        let lines = format_menu();
        assert_eq!(lines[0], "Supported operations:");
        for v in VERBS {
            assert!(
                lines.iter().any(|l| l.trim_start().starts_with(v.name)),
                "missing {}",
                v.name
            );
        }
        for builtin in ["load ", "save ", "show ", "histogram ", "menu", "q or quit"] {
            assert!(lines.iter().any(|l| l.trim_start().starts_with(builtin)), "{builtin}");
        }
        assert_eq!(lines.len(), 1 + 2 + VERBS.len() + 4);
    }

    #[test]
    fn menu_help_column_is_aligned() {
        let lines = format_menu();
        let brighten = lines.iter().find(|l| l.contains("brighten increment")).unwrap();
        let blur = lines.iter().find(|l| l.contains("blur image-name")).unwrap();
        assert_eq!(
            brighten.find("brighten or darken"),
            blur.find("3x3 Gaussian blur")
        );
    }

    #[test]
    fn image_summary_shows_dimensions() {
        let img = image_from_rows(&[&[(0, 0, 0), (0, 0, 0)]]);
        assert_eq!(format_image_summary("wide", &img), "wide 2x1");
    }

    #[test]
    fn histogram_of_sample() {
        let img = sample_image();
        let lines = format_histogram("img", &img, &img.histogram());
        assert_eq!(
            lines,
            vec![
                "img 3x3 (9 pixels)",
                "    red        peak 1 (x1)  mean 14.0",
                "    green      peak 2 (x1)  mean 15.0",
                "    blue       peak 3 (x1)  mean 16.0",
                "    intensity  peak 2 (x1)  mean 15.0",
            ]
        );
    }

    #[test]
    fn histogram_singular_pixel() {
        let img = image_from_rows(&[&[(9, 9, 9)]]);
        let lines = format_histogram("dot", &img, &img.histogram());
        assert_eq!(lines[0], "dot 1x1 (1 pixel)");
        assert_eq!(lines[1], "    red        peak 9 (x1)  mean 9.0");
    }

    #[test]
    fn run_summary_mentions_failures_only_when_present() {
        let ok = RunSummary {
            executed: 1,
            failed: 0,
            quit: false,
        };
        assert_eq!(format_run_summary(&ok), vec!["Ran 1 command"]);

        let mixed = RunSummary {
            executed: 4,
            failed: 1,
            quit: true,
        };
        assert_eq!(format_run_summary(&mixed), vec!["Ran 4 commands, 1 failed"]);
    }
}
