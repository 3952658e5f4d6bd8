use std::fmt::Write;

use mediashelf_core::Entity;
use mediashelf_inventory::Item;

const HEADERS: [&str; 5] = ["ID", "TYPE", "TITLE", "AUTHOR", "YEAR"];

/// Render items as a left-aligned, space-padded table with a header row.
pub fn render_table(items: &[Item]) -> String {
    let rows: Vec<[String; 5]> = items
        .iter()
        .map(|item| {
            [
                item.id().to_string(),
                item.item_type().to_string(),
                item.title().to_string(),
                item.author().to_string(),
                item.year().map(|y| y.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 5]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{:<width$}", cell.as_ref(), width = *width);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediashelf_core::ItemId;

    fn item(id: u64, kind: &str, title: &str, author: Option<&str>, year: Option<i64>) -> Item {
        Item::restore(ItemId::new(id).unwrap(), kind, title, author, year).unwrap()
    }

    #[test]
    fn empty_list_renders_header_only() {
        assert_eq!(render_table(&[]), "ID  TYPE  TITLE  AUTHOR  YEAR\n");
    }

    #[test]
    fn columns_align_to_widest_cell() {
        let items = vec![
            item(1, "book", "Dune", Some("Frank Herbert"), Some(1965)),
            item(12, "film", "Heat", None, None),
        ];

        let table = render_table(&items);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  TYPE  TITLE  AUTHOR         YEAR");
        assert_eq!(lines[1], "1   book  Dune   Frank Herbert  1965");
        assert_eq!(lines[2], "12  film  Heat");
    }
}
