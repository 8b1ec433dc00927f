//! Column-table rendering for window listings.
//!
//! Everything here is a pure function of (terminal width, config, entities,
//! history); the interactive loop decides when to draw.

use std::io::Write;

use crossterm::style::Stylize;

use crate::config::UiConfig;
use crate::error::ScryError;
use crate::history::History;
use crate::tmux::Entity;

/// Sanity ceiling on the entity count, not a real capacity limit.
pub const MAX_ENTITIES: usize = 1000;

/// Replaces the elided middle of an over-long name.
const ELISION_MARKER: char = '*';
const FILL: char = '-';
/// Slack added to the per-column minimum so names never touch the next cell.
const MARGIN: usize = 3;

/// Visual emphasis for the three most recently attached entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    MostRecent,
    Second,
    Third,
}

impl Highlight {
    fn from_rank(rank: Option<usize>) -> Self {
        match rank {
            Some(0) => Self::MostRecent,
            Some(1) => Self::Second,
            Some(2) => Self::Third,
            _ => Self::None,
        }
    }
}

/// One formatted table cell, styling deferred to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub highlight: Highlight,
}

/// Compute (column count, per-column width) for a terminal width.
///
/// Starts one above the configured preference and decrements until each
/// column can hold the formatting overhead plus the minimum name length plus
/// a small margin; degenerates to a single column on narrow terminals.
pub fn column_layout(terminal_width: usize, ui: &UiConfig) -> (usize, usize) {
    let min_width = ui.fmt_overhead + ui.min_name_len + MARGIN;
    let mut n_cols = ui.columns + 1;
    let mut col_width = 0;
    while col_width < min_width && n_cols > 1 {
        n_cols -= 1;
        col_width = terminal_width.saturating_sub(n_cols - 1) / n_cols;
    }
    (n_cols, col_width)
}

/// Shorten `name` to exactly `max_len` characters by eliding the middle.
///
/// Keeps the first `max_len / 2` characters and the tail, with a single
/// marker replacing whatever fell out.
pub fn elide_middle(name: &str, max_len: usize) -> String {
    let total = name.chars().count();
    if total <= max_len {
        return name.to_string();
    }
    if max_len == 0 {
        return String::new();
    }
    let head = max_len / 2;
    let tail = max_len - head - 1;
    let prefix: String = name.chars().take(head).collect();
    let suffix: String = name.chars().skip(total - tail).collect();
    format!("{prefix}{ELISION_MARKER}{suffix}")
}

/// Characters needed to print the largest row index.
fn index_width(count: usize) -> usize {
    if count > 100 {
        3
    } else if count > 10 {
        2
    } else {
        1
    }
}

/// Format every entity into a fixed-width cell with its highlight rank.
pub fn format_cells(
    entities: &[Entity],
    history: &History,
    col_width: usize,
    ui: &UiConfig,
) -> Result<Vec<Cell>, ScryError> {
    let count = entities.len();
    if count > MAX_ENTITIES {
        return Err(ScryError::TooManyEntities(count));
    }

    let idx_width = index_width(count);
    let overhead = ui.fmt_overhead + idx_width;
    let name_width = col_width.saturating_sub(overhead);

    let mut cells = Vec::with_capacity(count);
    for (i, entity) in entities.iter().enumerate() {
        let marker = if entity.is_active() { '#' } else { ' ' };
        let name = elide_middle(&entity.name, name_width);
        let fill_len = col_width
            .saturating_sub(name.chars().count())
            .saturating_sub(overhead);
        let fill: String = std::iter::repeat(FILL).take(fill_len).collect();
        let text = format!("{i:0idx_width$}){marker}{name} {fill} ");
        cells.push(Cell {
            text,
            highlight: Highlight::from_rank(history.rank(&entity.id)),
        });
    }
    Ok(cells)
}

/// Draw the header rule and the column-major entity table.
///
/// Returns the number of lines printed so the caller can pad the rest of the
/// screen. Fails before drawing any row when the entity count exceeds
/// [`MAX_ENTITIES`].
pub fn render_table<W: Write>(
    out: &mut W,
    entities: &[Entity],
    history: &History,
    terminal_width: usize,
    ui: &UiConfig,
) -> Result<usize, ScryError> {
    if entities.len() > MAX_ENTITIES {
        return Err(ScryError::TooManyEntities(entities.len()));
    }

    writeln!(out, "{}", rule_line(entities.len(), terminal_width))?;
    writeln!(out)?;
    let mut lines_printed = 2;

    if entities.is_empty() {
        return Ok(lines_printed);
    }

    let (n_cols, col_width) = column_layout(terminal_width, ui);
    let cells = format_cells(entities, history, col_width, ui)?;
    let rows_per_col = entities.len().div_ceil(n_cols);
    tracing::debug!(n_cols, col_width, rows_per_col, "table layout");

    for i in 0..rows_per_col {
        for j in 0..n_cols {
            let index = j * rows_per_col + i;
            // Trailing columns run out of entities before the last row.
            let Some(cell) = cells.get(index) else {
                break;
            };
            write_cell(out, cell, ui.color)?;
        }
        writeln!(out)?;
        lines_printed += 1;
    }

    Ok(lines_printed)
}

fn write_cell<W: Write>(out: &mut W, cell: &Cell, color: bool) -> std::io::Result<()> {
    if !color {
        return write!(out, "{}", cell.text);
    }
    match cell.highlight {
        Highlight::None => write!(out, "{}", cell.text),
        Highlight::MostRecent => write!(out, "{}", cell.text.as_str().magenta().bold().reverse()),
        Highlight::Second => write!(out, "{}", cell.text.as_str().green().bold().italic()),
        Highlight::Third => write!(out, "{}", cell.text.as_str().blue().bold().italic()),
    }
}

/// Header rule: `── scry N ────…` padded to the terminal width.
fn rule_line(count: usize, terminal_width: usize) -> String {
    let label = format!("── scry {count} ");
    let pad = terminal_width.saturating_sub(label.chars().count());
    let filler: String = std::iter::repeat('─').take(pad).collect();
    format!("{label}{filler}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui() -> UiConfig {
        UiConfig {
            color: false,
            ..UiConfig::default()
        }
    }

    fn window(id: &str, name: &str, clients: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: name.to_string(),
            activity: clients.to_string(),
            group: None,
        }
    }

    fn windows(n: usize) -> Vec<Entity> {
        (0..n)
            .map(|i| window(&format!("@{i}"), &format!("win{i}"), "0"))
            .collect()
    }

    #[test]
    fn elide_keeps_short_names_untouched() {
        assert_eq!(elide_middle("editor", 10), "editor");
        assert_eq!(elide_middle("editor", 6), "editor");
    }

    #[test]
    fn elide_produces_exact_width_with_one_marker() {
        let name = "a-very-long-window-name";
        for max_len in 3..name.len() {
            let out = elide_middle(name, max_len);
            assert_eq!(out.chars().count(), max_len, "max_len={max_len}");
            assert_eq!(out.matches(ELISION_MARKER).count(), 1, "max_len={max_len}");
            let head = max_len / 2;
            assert!(out.starts_with(&name[..head]), "max_len={max_len}");
            let tail = max_len - head - 1;
            assert!(out.ends_with(&name[name.len() - tail..]), "max_len={max_len}");
        }
    }

    #[test]
    fn column_count_shrinks_monotonically_with_width() {
        let ui = ui();
        let mut previous_cols = usize::MAX;
        for width in (10..=240).rev() {
            let (n_cols, col_width) = column_layout(width, &ui);
            assert!(n_cols <= previous_cols, "width={width}");
            assert!(n_cols >= 1);
            assert!(
                col_width >= ui.fmt_overhead + ui.min_name_len + 3 || n_cols == 1,
                "width={width} cols={n_cols} col_width={col_width}"
            );
            previous_cols = n_cols;
        }
    }

    #[test]
    fn wide_terminal_uses_preferred_columns() {
        let (n_cols, _) = column_layout(200, &ui());
        assert_eq!(n_cols, 4);
    }

    #[test]
    fn narrow_terminal_degenerates_to_one_column() {
        let (n_cols, _) = column_layout(12, &ui());
        assert_eq!(n_cols, 1);
    }

    #[test]
    fn cells_mark_active_windows() {
        let entities = vec![window("@1", "quiet", "0"), window("@2", "busy", "2")];
        let cells = format_cells(&entities, &History::new(), 30, &ui()).unwrap();
        assert!(cells[0].text.starts_with("0) quiet"));
        assert!(cells[1].text.starts_with("1)#busy"));
    }

    #[test]
    fn cells_highlight_three_most_recent() {
        let entities = windows(5);
        let mut history = History::new();
        history.promote("@4");
        history.promote("@2");
        history.promote("@0");
        let cells = format_cells(&entities, &history, 30, &ui()).unwrap();
        assert_eq!(cells[0].highlight, Highlight::MostRecent);
        assert_eq!(cells[2].highlight, Highlight::Second);
        assert_eq!(cells[4].highlight, Highlight::Third);
        assert_eq!(cells[1].highlight, Highlight::None);
        assert_eq!(cells[3].highlight, Highlight::None);
    }

    #[test]
    fn index_width_follows_entity_count() {
        assert_eq!(index_width(5), 1);
        assert_eq!(index_width(11), 2);
        assert_eq!(index_width(101), 3);
    }

    #[test]
    fn capacity_ceiling_fails_before_any_output() {
        let entities = windows(1001);
        let mut out = Vec::new();
        let err =
            render_table(&mut out, &entities, &History::new(), 120, &ui()).unwrap_err();
        assert!(matches!(err, ScryError::TooManyEntities(1001)));
        assert!(out.is_empty());
    }

    #[test]
    fn empty_listing_prints_header_only() {
        let mut out = Vec::new();
        let lines =
            render_table(&mut out, &[], &History::new(), 80, &ui()).unwrap();
        assert_eq!(lines, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("── scry 0 "));
    }

    #[test]
    fn entities_are_laid_out_column_major() {
        // 5 entities over 2 columns: rows_per_col = 3, so row 0 pairs
        // index 0 with index 3.
        let entities = windows(5);
        let narrow = UiConfig {
            columns: 2,
            color: false,
            ..UiConfig::default()
        };
        let mut out = Vec::new();
        let lines = render_table(&mut out, &entities, &History::new(), 60, &narrow).unwrap();
        assert_eq!(lines, 5);
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().skip(2).collect();
        assert!(rows[0].contains("win0") && rows[0].contains("win3"));
        assert!(rows[1].contains("win1") && rows[1].contains("win4"));
        assert!(rows[2].contains("win2") && !rows[2].contains("win3"));
    }

    #[test]
    fn rule_line_fills_terminal_width() {
        let line = rule_line(3, 40);
        assert_eq!(line.chars().count(), 40);
        assert!(line.starts_with("── scry 3 "));
    }
}
