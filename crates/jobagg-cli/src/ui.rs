//! UI utilities for the interactive session

use colored::*;
use crossterm::terminal::size;
use jobagg_core::{PlatformType, Vacancy};
use std::io::{self, Write};

/// Display startup banner
pub fn display_banner(out: &mut impl Write) -> io::Result<()> {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = terminal_width.saturating_sub(4).clamp(40, 60);
    let inner = banner_width - 2;

    let top_border = format!("┌{}┐", "─".repeat(inner));
    let bottom_border = format!("└{}┘", "─".repeat(inner));
    let empty_line = format!("│{}│", " ".repeat(inner));

    writeln!(out)?;
    writeln!(out, "{}", top_border.blue())?;
    writeln!(out, "{}", empty_line.blue())?;

    let lines = [
        "jobagg - vacancy aggregator",
        "",
        "Search HeadHunter and SuperJob, sort and filter",
        "the results, save them to a JSON file.",
        "",
    ];
    for line in lines {
        let padding = inner.saturating_sub(line.chars().count() + 2);
        writeln!(out, "{}", format!("│  {}{}│", line, " ".repeat(padding)).blue())?;
    }

    let version = format!("v{}", env!("CARGO_PKG_VERSION"));
    let padding = inner.saturating_sub(version.chars().count() + 2);
    writeln!(
        out,
        "{}{}{}",
        "│  ".blue(),
        version.dimmed(),
        format!("{}│", " ".repeat(padding)).blue()
    )?;

    writeln!(out, "{}", empty_line.blue())?;
    writeln!(out, "{}", bottom_border.blue())?;
    Ok(())
}

pub fn print_main_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Main menu:".bold())?;
    menu_item(out, "1", "Search vacancies")?;
    menu_item(out, "2", "Display vacancies")?;
    menu_item(out, "3", "Save vacancies to a file")?;
    menu_item(out, "4", "Import vacancies from a file")?;
    menu_item(out, "5", "Exit")
}

/// List the platforms the session can search
pub fn print_platform_menu(out: &mut impl Write, platforms: &[PlatformType]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Available platforms:".bold())?;
    for platform in platforms {
        menu_item(out, platform.menu_key(), platform.display_name())?;
    }
    Ok(())
}

pub fn print_sort_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    menu_item(out, "1", "Sort by publication date")?;
    menu_item(out, "2", "Sort by salary")
}

pub fn print_filter_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    menu_item(out, "1", "Filter by keyword in requirements")?;
    menu_item(out, "2", "Keep as is")
}

fn menu_item(out: &mut impl Write, key: &str, label: &str) -> io::Result<()> {
    writeln!(out, "  {} {}", format!("{key}.").green(), label)
}

/// Print a prompt and leave the cursor on the same line
pub fn print_prompt(out: &mut impl Write, prompt: &str) -> io::Result<()> {
    write!(out, "{} ", format!("{prompt}:").cyan())?;
    out.flush()
}

/// Render one vacancy as a numbered block
pub fn format_vacancy(position: usize, vacancy: &Vacancy) -> String {
    format!(
        "{} {}\n   {}\n   {} {}",
        format!("{position}.").bold(),
        vacancy,
        vacancy.url().underline(),
        "Requirements:".dimmed(),
        vacancy.requirements()
    )
}

pub fn print_vacancies(out: &mut impl Write, vacancies: &[Vacancy]) -> io::Result<()> {
    writeln!(out)?;
    for (i, vacancy) in vacancies.iter().enumerate() {
        writeln!(out, "{}", format_vacancy(i + 1, vacancy))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", format!("{} vacancies", vacancies.len()).dimmed())
}

pub fn print_success(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "✅".green(), message)
}

pub fn print_info(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "💡".cyan(), message)
}

pub fn print_warning(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "⚠️".yellow(), message.yellow())
}

pub fn print_error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "❌".red(), message.red())
}
