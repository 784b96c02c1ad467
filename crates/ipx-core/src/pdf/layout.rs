//! Whitespace-aligned table detection in extracted page text.
//!
//! PDF text extraction does not expose table geometry, so tables are
//! recovered from runs of consecutive lines that split into several cells
//! on tabs or runs of two or more spaces.

use crate::models::page::Table;

/// Split a line into cells on tabs and runs of two or more spaces.
pub fn split_line_into_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    for ch in trimmed.chars() {
        if ch == '\t' {
            push_cell(&mut cells, &mut current);
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                push_cell(&mut cells, &mut current);
            } else {
                current.push(' ');
            }
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }

    push_cell(&mut cells, &mut current);
    cells
}

fn push_cell(cells: &mut Vec<String>, current: &mut String) {
    let cell = current.trim();
    if !cell.is_empty() {
        cells.push(cell.to_string());
    }
    current.clear();
}

/// Detect tables in page text. A table is a run of at least two lines with
/// `min_cols` or more cells; ragged rows are padded with empty cells.
pub fn detect_text_tables(text: &str, min_cols: usize) -> Vec<Table> {
    let min_cols = min_cols.max(2);
    let mut tables = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        let cells = split_line_into_cells(line);
        if cells.len() >= min_cols {
            current.push(cells);
        } else {
            flush(&mut current, &mut tables);
        }
    }
    flush(&mut current, &mut tables);

    tables
}

fn flush(rows: &mut Vec<Vec<String>>, tables: &mut Vec<Table>) {
    if rows.len() < 2 {
        rows.clear();
        return;
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let table = rows
        .drain(..)
        .map(|row| {
            let mut cells: Vec<Option<String>> = row.into_iter().map(Some).collect();
            cells.resize(width, None);
            cells
        })
        .collect();

    tables.push(table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_splits_double_space_separated_cells() {
        assert_eq!(
            split_line_into_cells("Own Damage Premium    12,500.00"),
            vec!["Own Damage Premium", "12,500.00"]
        );
    }

    #[test]
    fn test_splits_tab_separated_cells() {
        assert_eq!(split_line_into_cells("GST\t18%\t2,548"), vec!["GST", "18%", "2,548"]);
    }

    #[test]
    fn test_single_spaced_prose_is_one_cell() {
        assert_eq!(
            split_line_into_cells("This policy is subject to the terms below."),
            vec!["This policy is subject to the terms below."]
        );
    }

    #[test]
    fn test_detects_table_between_prose() {
        let text = "Premium Schedule\n\
                    Description    Amount\n\
                    Net Premium    14,152\n\
                    GST  18%       2,548\n\
                    \n\
                    Thank you for choosing us.";

        let tables = detect_text_tables(text, 2);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 3);
        assert_eq!(tables[0][0], vec![Some("Description".to_string()), Some("Amount".to_string()), None]);
        assert_eq!(
            tables[0][2],
            vec![Some("GST".to_string()), Some("18%".to_string()), Some("2,548".to_string())]
        );
    }

    #[test]
    fn test_single_aligned_line_is_not_a_table() {
        assert!(detect_text_tables("Policy No    ABC-123456\nIssued to the insured.", 2).is_empty());
    }
}
