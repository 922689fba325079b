//! Report rendering: colorized table, JSON and CSV.
//!
//! All renderers take the full row set of a run and apply the global sort
//! order themselves, so every output format agrees on ordering. Colors are
//! plain ANSI escapes, enabled only for a TTY and never for machine-readable
//! formats; `NO_COLOR` is honored (https://no-color.org/).

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::gsg::{FileComplexity, FunctionComplexity};

// =============================================================================
// OPTIONS
// =============================================================================

/// Row ordering applied across all files of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending complexity.
    Asc,
    /// Descending complexity.
    Desc,
    /// File path, then function name, then line.
    #[default]
    Name,
}

/// How much of the result set to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detail {
    /// Only functions exceeding the threshold.
    Low,
    #[default]
    Normal,
}

/// One table/JSON/CSV row: a function within its file.
#[derive(Debug, Clone)]
pub struct Row {
    pub file: PathBuf,
    pub function: FunctionComplexity,
}

/// Flatten per-file results into renderable rows.
#[must_use]
pub fn rows(files: Vec<FileComplexity>) -> Vec<Row> {
    files
        .into_iter()
        .flat_map(|fc| {
            let path = fc.path;
            fc.functions
                .into_iter()
                .map(move |function| Row {
                    file: path.clone(),
                    function,
                })
        })
        .collect()
}

/// True when any row exceeds the threshold (and the threshold is active).
#[must_use]
pub fn any_exceeds(rows: &[Row], max_complexity: u32, ignore_complexity: bool) -> bool {
    if ignore_complexity {
        return false;
    }
    rows.iter().any(|r| r.function.complexity > max_complexity)
}

fn sort_rows(rows: &mut [Row], sort: SortOrder) {
    match sort {
        SortOrder::Name => rows.sort_by(|a, b| {
            (&a.file, &a.function.name, a.function.loc.row)
                .cmp(&(&b.file, &b.function.name, b.function.loc.row))
        }),
        SortOrder::Asc => rows.sort_by(|a, b| {
            (a.function.complexity, &a.file, &a.function.name, a.function.loc.row).cmp(&(
                b.function.complexity,
                &b.file,
                &b.function.name,
                b.function.loc.row,
            ))
        }),
        SortOrder::Desc => rows.sort_by(|a, b| {
            (b.function.complexity, &a.file, &a.function.name, a.function.loc.row).cmp(&(
                a.function.complexity,
                &b.file,
                &b.function.name,
                b.function.loc.row,
            ))
        }),
    }
}

fn retain_offenders(rows: &mut Vec<Row>, max_complexity: u32) {
    rows.retain(|r| r.function.complexity > max_complexity);
}

// =============================================================================
// ANSI STYLING
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Style {
    Reset,
    Bold,
    Red,
    Green,
}

impl Style {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Reset => "\x1b[0m",
            Self::Bold => "\x1b[1m",
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
        }
    }
}

/// Whether stdout should receive ANSI escapes.
#[must_use]
pub fn colors_enabled(machine_readable: bool) -> bool {
    if machine_readable || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stdout().is_terminal()
}

fn paint(out: &mut impl Write, enabled: bool, style: Style, text: &str) -> io::Result<()> {
    if enabled {
        write!(out, "{}{}{}", style.code(), text, Style::Reset.code())
    } else {
        out.write_all(text.as_bytes())
    }
}

// =============================================================================
// RENDERERS
// =============================================================================

/// Render rows as a JSON array.
pub fn print_json(
    mut rows: Vec<Row>,
    sort: SortOrder,
    max_complexity: u32,
    ignore_complexity: bool,
    detail: Detail,
    out: &mut impl Write,
) -> io::Result<()> {
    if detail == Detail::Low && !ignore_complexity {
        retain_offenders(&mut rows, max_complexity);
    }
    sort_rows(&mut rows, sort);

    let entries: Vec<serde_json::Value> = rows
        .iter()
        .map(|r| {
            let line = r.function.loc.row + 1;
            json!({
                "file": r.file,
                "function": format!("{}@{}", r.function.name, line),
                "complexity": r.function.complexity,
                "line": line,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)
}

/// Render rows as CSV with a header line.
pub fn print_csv(
    mut rows: Vec<Row>,
    sort: SortOrder,
    max_complexity: u32,
    ignore_complexity: bool,
    detail: Detail,
    out: &mut impl Write,
) -> io::Result<()> {
    if detail == Detail::Low && !ignore_complexity {
        retain_offenders(&mut rows, max_complexity);
    }
    sort_rows(&mut rows, sort);

    writeln!(out, "file,function,complexity,line")?;
    for r in &rows {
        let line = r.function.loc.row + 1;
        writeln!(
            out,
            "{},{}@{},{},{}",
            r.file.display(),
            r.function.name,
            line,
            r.function.complexity,
            line
        )?;
    }
    Ok(())
}

/// Render the human table.
///
/// `max_fn_width` truncates the function column (`...` in the middle cell);
/// offenders print red with an `(exceeds N)` note unless the threshold is
/// ignored; `quiet` and `Detail::Low` both reduce the table to offenders.
#[allow(clippy::too_many_arguments)]
pub fn print_table(
    mut rows: Vec<Row>,
    sort: SortOrder,
    max_fn_width: usize,
    max_complexity: u32,
    ignore_complexity: bool,
    quiet: bool,
    detail: Detail,
    color: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    if (quiet || detail == Detail::Low) && !ignore_complexity {
        retain_offenders(&mut rows, max_complexity);
    }
    sort_rows(&mut rows, sort);

    const FILE_HEADER: &str = "File";
    const FN_HEADER: &str = "Function";
    const CC_HEADER: &str = "cognitive complexity";

    let mut file_w = FILE_HEADER.len();
    let mut fn_w = FN_HEADER.len();
    let mut cc_w = CC_HEADER.len();
    for r in &rows {
        let suffix = format!(" @ {}", r.function.loc.row + 1);
        file_w = file_w.max(r.file.display().to_string().len());
        fn_w = fn_w.max(r.function.name.len() + suffix.len());
        cc_w = cc_w.max(r.function.complexity.to_string().len());
    }
    if max_fn_width > 0 {
        fn_w = fn_w.min(max_fn_width).max(8);
    }

    let header = format!("{FILE_HEADER:<file_w$}  {FN_HEADER:<fn_w$}  {CC_HEADER:<cc_w$}");
    paint(out, color, Style::Bold, &header)?;
    writeln!(out)?;

    for r in &rows {
        let suffix = format!(" @ {}", r.function.loc.row + 1);
        let cell = fit_function_cell(&r.function.name, &suffix, fn_w);
        write!(out, "{:<file_w$}  {cell:<fn_w$}  ", r.file.display())?;

        let exceeds = r.function.complexity > max_complexity;
        let style = if exceeds { Style::Red } else { Style::Green };
        let value = format!("{:<cc_w$}", r.function.complexity);
        paint(out, color, style, &value)?;
        if exceeds && !ignore_complexity {
            let note = format!("  (exceeds {max_complexity})");
            paint(out, color, Style::Red, &note)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Truncate `name @ line` into `width` columns, keeping the line suffix.
fn fit_function_cell(name: &str, suffix: &str, width: usize) -> String {
    let full = format!("{name}{suffix}");
    if full.len() <= width {
        return full;
    }
    let avail = width.saturating_sub(suffix.len());
    if avail > 3 {
        format!("{}...{suffix}", &name[..avail - 3])
    } else if avail > 0 {
        format!("{}{suffix}", &name[..avail])
    } else if suffix.len() > width {
        suffix[..width].to_string()
    } else {
        suffix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gsg::SourceLoc;

    fn row(file: &str, name: &str, line: u32, complexity: u32) -> Row {
        Row {
            file: PathBuf::from(file),
            function: FunctionComplexity {
                name: name.to_string(),
                complexity,
                loc: SourceLoc {
                    row: line,
                    start_col: 0,
                    end_col: 0,
                },
                lines: Vec::new(),
            },
        }
    }

    fn render_table(rows: Vec<Row>, sort: SortOrder) -> String {
        let mut buf = Vec::new();
        print_table(rows, sort, 0, 15, false, false, Detail::Normal, false, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_sort_orders() {
        let mut rows = vec![
            row("b.py", "beta", 1, 5),
            row("a.py", "alpha", 1, 9),
            row("a.py", "gamma", 9, 1),
        ];
        sort_rows(&mut rows, SortOrder::Name);
        assert_eq!(rows[0].function.name, "alpha");
        assert_eq!(rows[2].function.name, "beta");

        sort_rows(&mut rows, SortOrder::Asc);
        assert_eq!(rows[0].function.complexity, 1);
        assert_eq!(rows[2].function.complexity, 9);

        sort_rows(&mut rows, SortOrder::Desc);
        assert_eq!(rows[0].function.complexity, 9);
        assert_eq!(rows[2].function.complexity, 1);
    }

    #[test]
    fn test_any_exceeds_respects_ignore() {
        let rows = vec![row("a.py", "f", 1, 20)];
        assert!(any_exceeds(&rows, 15, false));
        assert!(!any_exceeds(&rows, 15, true));
        assert!(!any_exceeds(&rows, 20, false));
    }

    #[test]
    fn test_table_marks_offenders() {
        let text = render_table(
            vec![row("a.py", "ok", 1, 3), row("a.py", "big", 5, 22)],
            SortOrder::Name,
        );
        assert!(text.contains("cognitive complexity"));
        assert!(text.contains("big @ 6"));
        assert!(text.contains("(exceeds 15)"));
        assert!(!text.contains("\x1b["), "no escapes without color");
    }

    #[test]
    fn test_quiet_table_keeps_offenders_only() {
        let mut buf = Vec::new();
        print_table(
            vec![row("a.py", "ok", 1, 3), row("a.py", "big", 5, 22)],
            SortOrder::Name,
            0,
            15,
            false,
            true,
            Detail::Normal,
            false,
            &mut buf,
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("big"));
        assert!(!text.contains("ok @"));
    }

    #[test]
    fn test_json_shape() {
        let mut buf = Vec::new();
        print_json(
            vec![row("src/a.py", "f", 2, 4)],
            SortOrder::Name,
            15,
            false,
            Detail::Normal,
            &mut buf,
        )
        .unwrap();
        let parsed: Vec<serde_json::Value> =
            serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["function"], "f@3");
        assert_eq!(parsed[0]["complexity"], 4);
        assert_eq!(parsed[0]["line"], 3);
    }

    #[test]
    fn test_csv_shape() {
        let mut buf = Vec::new();
        print_csv(
            vec![row("a.c", "main", 0, 2)],
            SortOrder::Name,
            15,
            false,
            Detail::Normal,
            &mut buf,
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("file,function,complexity,line"));
        assert_eq!(lines.next(), Some("a.c,main@1,2,1"));
    }

    #[test]
    fn test_detail_low_filters_machine_output() {
        let mut buf = Vec::new();
        print_csv(
            vec![row("a.c", "ok", 0, 2), row("a.c", "big", 4, 30)],
            SortOrder::Name,
            15,
            false,
            Detail::Low,
            &mut buf,
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("big"));
        assert!(!text.contains("ok"));
    }

    #[test]
    fn test_function_cell_truncation() {
        assert_eq!(fit_function_cell("short", " @ 3", 20), "short @ 3");
        let cell = fit_function_cell("a_very_long_function_name", " @ 12", 16);
        assert_eq!(cell.len(), 16);
        assert!(cell.contains("..."));
        assert!(cell.ends_with(" @ 12"));
    }
}
