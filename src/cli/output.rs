//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use comfy_table::{presets::NOTHING, Cell, Color, Table};

use crate::domain::containers::{ContainerPhase, ContainerRow};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Prompt text for stderr, without newline (cyan)
pub fn prompt_text(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{} ", msg.to_string().cyan())
}

const CONTAINER_HEADER: [&str; 5] = ["NAMESPACE", "POD", "CONTAINER", "INIT", "STATUS"];

fn phase_color(phase: ContainerPhase) -> Color {
    match phase {
        ContainerPhase::Ready => Color::Green,
        ContainerPhase::Running => Color::Cyan,
        ContainerPhase::Terminated => Color::Red,
        ContainerPhase::Waiting => Color::Yellow,
        ContainerPhase::Unknown => Color::DarkGrey,
    }
}

/// Render container rows as a kubectl-style table.
pub fn containers_table(rows: &[ContainerRow], color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    if color {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table.set_header(CONTAINER_HEADER);

    for row in rows {
        let status = Cell::new(row.phase.as_str());
        let status = if color {
            status.fg(phase_color(row.phase))
        } else {
            status
        };
        table.add_row(vec![
            Cell::new(&row.namespace),
            Cell::new(&row.pod),
            Cell::new(&row.container),
            Cell::new(if row.init { "yes" } else { "" }),
            status,
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(container: &str, init: bool, phase: ContainerPhase) -> ContainerRow {
        ContainerRow {
            namespace: "web".to_string(),
            pod: "api-0".to_string(),
            container: container.to_string(),
            init,
            phase,
        }
    }

    #[test]
    fn given_rows_without_color_when_rendering_then_plain_columns() {
        let rows = vec![
            row("migrate", true, ContainerPhase::Terminated),
            row("api", false, ContainerPhase::Ready),
        ];

        let rendered = containers_table(&rows, false);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("NAMESPACE") && lines[0].contains("STATUS"));
        assert!(lines[1].contains("migrate") && lines[1].contains("yes"));
        assert!(lines[2].contains("api") && lines[2].contains("ready"));
        assert!(!rendered.contains('\u{1b}'));
    }
}
