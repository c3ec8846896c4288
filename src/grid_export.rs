use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::difficulty::DifficultyBucket;
use crate::view::{FixtureCell, FixtureGrid, SquadView};

pub struct ExportReport {
    pub grid_rows: usize,
    pub squad_rows: usize,
}

impl ExportReport {
    pub fn total_rows(&self) -> usize {
        self.grid_rows + self.squad_rows
    }
}

type SheetCell = (String, Option<DifficultyBucket>);

pub fn export_views(
    path: &Path,
    grid: &FixtureGrid,
    squad: Option<&SquadView>,
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Fixtures")?;
        write_rows(sheet, &grid_rows(grid))?;
    }

    let mut squad_rows_written = 0;
    if let Some(squad) = squad {
        let rows = squad_rows(squad);
        squad_rows_written = rows.len().saturating_sub(1);
        let sheet = workbook.add_worksheet();
        sheet.set_name("Squad")?;
        write_rows(sheet, &rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        grid_rows: grid.rows.len(),
        squad_rows: squad_rows_written,
    })
}

fn grid_rows(grid: &FixtureGrid) -> Vec<Vec<SheetCell>> {
    let mut header = grid.header.clone();
    header.insert(1, "Strength".to_string());
    let mut rows = vec![plain(header)];
    for row in &grid.rows {
        let mut out = vec![(row.name.clone(), None), (row.strength.to_string(), None)];
        out.extend(row.cells.iter().map(cell_value));
        rows.push(out);
    }
    rows
}

fn squad_rows(view: &SquadView) -> Vec<Vec<SheetCell>> {
    let mut header = vec![
        view.header.first().cloned().unwrap_or_else(|| "Player".to_string()),
        "Pos".to_string(),
        "Team".to_string(),
        "Price".to_string(),
        "Form".to_string(),
        "Trend".to_string(),
        "News".to_string(),
    ];
    header.extend(view.header.iter().skip(1).cloned());
    let mut rows = vec![plain(header)];

    for row in &view.rows {
        let p = &row.pick;
        let name = format!("{} {}", p.name, p.role_marker()).trim().to_string();
        let mut out = plain(vec![
            name,
            p.position.label().to_string(),
            p.team_short.clone(),
            p.price_label(),
            p.form_label(),
            p.trend.symbol().to_string(),
            p.news.clone(),
        ]);
        out.extend(row.cells.iter().map(cell_value));
        rows.push(out);
    }
    rows
}

fn cell_value(cell: &FixtureCell) -> SheetCell {
    match cell {
        FixtureCell::Blank => ("-".to_string(), None),
        _ => {
            let labels = cell.opponent_labels().join(" / ");
            match cell.bucket() {
                Some(bucket) => (format!("{labels} [{}]", bucket.label()), Some(bucket)),
                None => (labels, None),
            }
        }
    }
}

fn plain(values: Vec<String>) -> Vec<SheetCell> {
    values.into_iter().map(|v| (v, None)).collect()
}

fn bucket_fill(bucket: DifficultyBucket) -> Color {
    match bucket {
        DifficultyBucket::VeryEasy => Color::RGB(0x1B5E20),
        DifficultyBucket::Easy => Color::RGB(0x66BB6A),
        DifficultyBucket::Moderate => Color::RGB(0xBDBDBD),
        DifficultyBucket::Tricky => Color::RGB(0xEF9A9A),
        DifficultyBucket::Hard => Color::RGB(0xE53935),
        DifficultyBucket::VeryHard => Color::RGB(0xB71C1C),
        DifficultyBucket::Extreme => Color::RGB(0x4A0072),
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<SheetCell>]) -> Result<()> {
    let header_format = Format::new().set_bold();
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, (value, bucket)) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match (row_idx, bucket) {
                (0, _) => worksheet.write_string_with_format(r, c, value, &header_format),
                (_, Some(bucket)) => {
                    let format = Format::new().set_background_color(bucket_fill(*bucket));
                    worksheet.write_string_with_format(r, c, value, &format)
                }
                (_, None) => worksheet.write_string(r, c, value),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
