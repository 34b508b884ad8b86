use std::fmt::Display;

use unicode_width::UnicodeWidthStr;

use crate::utils::emojis;

/// Accumulates rows and renders them as an rST-style grid.
#[derive(Debug, Default, Clone)]
pub struct TabularData {
    widths: Vec<usize>,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TabularData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header labels. Each column starts out as wide as its label plus padding.
    pub fn set_columns<I, T>(&mut self, columns: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.columns = columns.into_iter().map(|c| c.to_string()).collect();
        self.widths = self.columns.iter().map(|c| c.width() + 2).collect();
    }

    pub fn add_row<I, T>(&mut self, row: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let row: Vec<String> = row.into_iter().map(|r| r.to_string()).collect();

        for (index, element) in row.iter().enumerate() {
            let width = element.chars().count() + 2;
            match self.widths.get_mut(index) {
                Some(current) if width > *current => *current = width,
                Some(_) => {}
                None => self.widths.push(width),
            }
        }

        self.rows.push(row);
    }

    pub fn add_rows<R, I, T>(&mut self, rows: R)
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for row in rows {
            self.add_row(row);
        }
    }

    /// Drops the accumulated rows. Column widths are kept.
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Renders the table in rST format.
    ///
    /// ```text
    /// +-------+-----+
    /// | Name  | Age |
    /// +-------+-----+
    /// | Alice | 24  |
    /// |  Bob  | 19  |
    /// +-------+-----+
    /// ```
    pub fn render(&self) -> String {
        let sep = self
            .widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("+");
        let sep = format!("+{sep}+");

        let mut to_draw = Vec::with_capacity(self.rows.len() + 4);
        to_draw.push(sep.clone());
        to_draw.push(self.entry(&self.columns));
        to_draw.push(sep.clone());

        for row in &self.rows {
            to_draw.push(self.entry(row));
        }

        to_draw.push(sep);
        to_draw.join("\n")
    }

    fn entry(&self, cells: &[String]) -> String {
        let elem = cells
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let width = self.widths.get(i).copied().unwrap_or_default();
                format!("{e:^width$}")
            })
            .collect::<Vec<_>>()
            .join("|");
        format!("|{elem}|")
    }
}

fn right(value: &str, width: usize) -> String {
    format!("{value:\u{a0}>width$.width$}")
}

fn left(value: &str, width: usize) -> String {
    format!("{value:\u{a0}<width$.width$}")
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or_default()
}

/// Rank indicator for a row whose first cell is a 0-based index.
fn rank_of(row: &[String]) -> &'static str {
    cell(row, 0)
        .parse::<u64>()
        .map(|index| emojis::rank(index + 1))
        .unwrap_or(emojis::IDLE)
}

/// Table with compact one-line-per-row layouts for chat embeds.
///
/// The grid contract of [`TabularData`] is available as well.
#[derive(Debug, Default, Clone)]
pub struct ClyTable {
    table: TabularData,
}

impl ClyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the rows left over from a previous page and hands the table back.
    pub fn fresh(&mut self) -> &mut Self {
        self.clear_rows();
        self
    }

    pub fn set_columns<I, T>(&mut self, columns: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.table.set_columns(columns);
    }

    pub fn add_row<I, T>(&mut self, row: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.table.add_row(row);
    }

    pub fn add_rows<R, I, T>(&mut self, rows: R)
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.table.add_rows(rows);
    }

    pub fn clear_rows(&mut self) {
        self.table.clear_rows();
    }

    pub fn rows(&self) -> &[Vec<String>] {
        self.table.rows()
    }

    pub fn render(&self) -> String {
        self.table.render()
    }

    /// Rows of `[index, donations, received, name]`.
    pub fn render_option_1(&self) -> String {
        let mut fmt = format!(
            "{}`⠀{}⠀` `⠀{}⠀` `⠀{}⠀`\n",
            emojis::NUMBER,
            right("Dons", 6),
            right("Rec", 5),
            left("Name", 10)
        );

        for v in self.rows() {
            fmt.push_str(&format!(
                "{}`⠀{}⠀` `⠀{}⠀` `⠀{}⠀`\n",
                rank_of(v),
                right(cell(v, 1), 6),
                right(cell(v, 2), 5),
                left(cell(v, 3), 10)
            ));
        }

        fmt
    }

    /// Rows of `[index, donations, name]`.
    pub fn render_option_2(&self) -> String {
        let mut fmt = format!(
            "{}`⠀{}⠀` `⠀{}⠀`\n",
            emojis::NUMBER,
            right("Dons", 6),
            left("Name", 16)
        );

        for v in self.rows() {
            fmt.push_str(&format!(
                "{}`⠀{}⠀` `⠀{}⠀`\n",
                rank_of(v),
                right(cell(v, 1), 6),
                left(cell(v, 2), 16)
            ));
        }

        fmt
    }

    /// Rows of `[prefix, rank, name, clan]`.
    pub fn render_events_log(&self) -> String {
        let mut fmt = format!(
            "{}   {}⠀`⠀{}⠀`  `⠀{}⠀`\n",
            emojis::LEGEND_CUP,
            emojis::NUMBER,
            left("Name", 10),
            left("Clan", 12)
        );

        for v in self.rows() {
            fmt.push_str(&format!(
                "{}⠀`⠀{}⠀`  `⠀{}⠀`  `⠀{}⠀`\n",
                cell(v, 0),
                right(cell(v, 1), 3),
                left(cell(v, 2), 10),
                left(cell(v, 3), 12)
            ));
        }

        fmt
    }

    /// Rows of `[icon, count, name, age]`.
    pub fn render_events_command(&self) -> String {
        let mut fmt = format!(
            "{}⠀`⠀{}⠀`  `⠀{}⠀`  `⠀{}⠀`\n",
            emojis::NUMBER,
            right("Don/Rec", 7),
            left("Name", 12),
            left("Age", 5)
        );

        for v in self.rows() {
            fmt.push_str(&format!(
                "{}⠀`⠀{}⠀`  `⠀{}⠀`  `⠀{}⠀`\n",
                cell(v, 0),
                right(cell(v, 1), 7),
                left(cell(v, 2), 12),
                left(cell(v, 3), 5)
            ));
        }

        fmt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NBSP: char = '\u{a0}';

    fn pad(n: usize) -> String {
        NBSP.to_string().repeat(n)
    }

    #[test]
    fn test_render_grid_layout() {
        let mut table = TabularData::new();
        table.set_columns(["Name", "Age"]);
        table.add_rows([["Alice", "24"], ["Bob", "19"]]);

        let expected = "\
+-------+-----+
| Name  | Age |
+-------+-----+
| Alice | 24  |
|  Bob  | 19  |
+-------+-----+";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_render_line_count_and_cells_decode() {
        let mut table = TabularData::new();
        table.set_columns(["#", "Dons", "Name"]);
        let rows = vec![
            vec![1.to_string(), 250.to_string(), "Alice".to_string()],
            vec![2.to_string(), 7.to_string(), "Bob the Builder".to_string()],
            vec![3.to_string(), 0.to_string(), "C".to_string()],
        ];
        table.add_rows(rows.clone());

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), rows.len() + 4);

        for (line, row) in lines[3..lines.len() - 1].iter().zip(&rows) {
            let decoded: Vec<&str> = line
                .trim_matches('|')
                .split('|')
                .map(str::trim)
                .collect();
            assert_eq!(decoded, *row);
        }
    }

    #[test]
    fn test_widths_never_shrink() {
        let mut table = TabularData::new();
        table.set_columns(["Name"]);
        assert_eq!(table.widths(), &[6]);

        table.add_row(["Alexander"]);
        assert_eq!(table.widths(), &[11]);

        table.add_row(["Al"]);
        assert_eq!(table.widths(), &[11]);

        table.clear_rows();
        assert!(table.rows().is_empty());
        assert_eq!(table.widths(), &[11]);
    }

    #[test]
    fn test_wide_header_width() {
        let mut table = TabularData::new();
        table.set_columns(["名前"]);
        assert_eq!(table.widths(), &[6]);
    }

    #[test]
    fn test_option_1_single_row() {
        let mut table = ClyTable::new();
        table.add_row([0.to_string(), 5.to_string(), 0.to_string(), "Bob".to_string()]);

        let rendered = table.render_option_1();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("#️⃣`⠀{}Dons⠀` `⠀{}Rec⠀` `⠀Name{}⠀`", pad(2), pad(2), pad(6))
        );
        assert_eq!(
            lines[1],
            format!(
                "1\u{fe0f}\u{20e3}`⠀{}5⠀` `⠀{}0⠀` `⠀Bob{}⠀`",
                pad(5),
                pad(4),
                pad(7)
            )
        );
    }

    #[test]
    fn test_option_2_truncates_and_ranks() {
        let mut table = ClyTable::new();
        table.add_row(["150", "1234567", "A name far too long to fit"]);

        let rendered = table.render_option_2();
        let row = rendered.lines().nth(1).unwrap();
        assert_eq!(row, format!("{}`⠀123456⠀` `⠀A name far too l⠀`", emojis::IDLE));
    }

    #[test]
    fn test_events_layouts() {
        let mut table = ClyTable::new();
        table.add_row(["📤", "12", "Bob", "2hr"]);

        let command = table.render_events_command();
        let row = command.lines().nth(1).unwrap();
        assert_eq!(
            row,
            format!("📤⠀`⠀{}12⠀`  `⠀Bob{}⠀`  `⠀2hr{}⠀`", pad(5), pad(9), pad(2))
        );

        table.fresh().add_row(["🥇", "1", "Bob", "Clashers"]);
        let log = table.render_events_log();
        assert!(log.starts_with("🏆   #️⃣⠀`⠀Name"));
        let row = log.lines().nth(1).unwrap();
        assert_eq!(
            row,
            format!("🥇⠀`⠀{}1⠀`  `⠀Bob{}⠀`  `⠀Clashers{}⠀`", pad(2), pad(7), pad(4))
        );
    }

    #[test]
    fn test_missing_cells_render_empty() {
        let mut table = ClyTable::new();
        table.add_row(["0", "5"]);

        let rendered = table.render_option_2();
        let row = rendered.lines().nth(1).unwrap();
        assert!(row.ends_with(&format!("`⠀{}⠀`", pad(16))));
    }

    #[test]
    fn test_fresh_clears_previous_page() {
        let mut table = ClyTable::new();
        table.add_row(["0", "1", "2", "a"]);
        table.add_row(["1", "1", "2", "b"]);
        assert_eq!(table.fresh().rows().len(), 0);
    }
}
