//! Plain-text frame layout for terminals.

use std::io::{self, Write};

use timetable_core::{Cell, Grid, RenderScope, Selector, TimetableTable, ViewModel};
use unicode_width::UnicodeWidthStr;

const MIN_COLUMN_WIDTH: usize = 6;

/// Terminal cells occupied by `text`.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(fill))
}

pub fn write_frame(out: &mut impl Write, model: &ViewModel, scope: RenderScope) -> io::Result<()> {
    if scope == RenderScope::Full {
        writeln!(out, "{}", controls_line(model))?;
    }
    writeln!(out, "{}", model.date_header)?;
    match &model.grid {
        Grid::Table(table) => write_table(out, table)?,
        Grid::Placeholder(message) => writeln!(out, "  {message}")?,
    }
    if scope == RenderScope::Full {
        if let Some(line) = &model.last_updated {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

fn controls_line(model: &ViewModel) -> String {
    let modes: Vec<String> = model
        .mode_options
        .iter()
        .map(|option| {
            if option.active {
                format!("[{}]", option.label)
            } else {
                format!(" {} ", option.label)
            }
        })
        .collect();

    let selector = if model.track_selector.visible {
        &model.track_selector.toggle_label
    } else {
        &model.cohort_selector.toggle_label
    };
    format!("{}  {selector} ▾", modes.join(""))
}

/// One line per option, the active one starred, numbered from 1.
pub fn selector_lines<T>(selector: &Selector<T>) -> Vec<String> {
    selector
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let marker = if option.active { '*' } else { ' ' };
            format!("  {marker} {}. {}", index + 1, option.label)
        })
        .collect()
}

fn write_table(out: &mut impl Write, table: &TimetableTable) -> io::Result<()> {
    let corner_width = table
        .rows
        .iter()
        .map(|row| display_width(&row.label))
        .chain(std::iter::once(display_width(table.corner)))
        .max()
        .unwrap_or(MIN_COLUMN_WIDTH);

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let header = column.lines.iter().map(|line| display_width(line));
            let cells = table.rows.iter().filter_map(|row| match row.cells.get(index) {
                Some(Cell::Class { course, room }) => {
                    Some(display_width(course).max(display_width(room)))
                }
                _ => None,
            });
            header.chain(cells).max().unwrap_or(0).max(MIN_COLUMN_WIDTH)
        })
        .collect();

    let header_height = table
        .columns
        .iter()
        .map(|column| column.lines.len())
        .max()
        .unwrap_or(1);
    for line in 0..header_height {
        let corner = if line == 0 { table.corner } else { "" };
        let mut text = pad(corner, corner_width);
        for (column, width) in table.columns.iter().zip(&widths) {
            let label = column.lines.get(line).map(String::as_str).unwrap_or("");
            text.push_str(" | ");
            text.push_str(&pad(label, *width));
        }
        writeln!(out, "{}", text.trim_end())?;
    }

    let mut rule = "-".repeat(corner_width);
    for width in &widths {
        rule.push_str("-+-");
        rule.push_str(&"-".repeat(*width));
    }
    writeln!(out, "{rule}")?;

    for row in &table.rows {
        let (mut first, mut second) = (pad(&row.label, corner_width), pad("", corner_width));
        for (cell, width) in row.cells.iter().zip(&widths) {
            let (course, room) = match cell {
                Cell::Class { course, room } => (course.as_str(), room.as_str()),
                Cell::Empty => ("", ""),
            };
            first.push_str(" | ");
            first.push_str(&pad(course, *width));
            second.push_str(" | ");
            second.push_str(&pad(room, *width));
        }
        writeln!(out, "{}", first.trim_end())?;
        writeln!(out, "{}", second.trim_end())?;
    }

    for column in &table.columns {
        for note in &column.notes {
            writeln!(out, "※ {}: {note}", column.lines.join(" "))?;
        }
    }
    Ok(())
}
