use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::arena::{PredictionResult, format_percent};
use crate::round_robin::{RoundRobinReport, Standing};

pub struct ExportSummary {
    pub standings: usize,
    pub battles: usize,
}

pub fn export_round_robin(path: &Path, report: &RoundRobinReport) -> Result<ExportSummary> {
    let mut standings_rows = vec![vec![
        "Rank".to_string(),
        "Pokemon".to_string(),
        "Battles".to_string(),
        "Wins".to_string(),
        "Mean Win %".to_string(),
    ]];
    standings_rows.extend(
        report
            .standings
            .iter()
            .enumerate()
            .map(|(idx, s)| standing_row(idx + 1, s)),
    );

    let mut battle_rows = vec![vec![
        "First".to_string(),
        "Second".to_string(),
        "Winner".to_string(),
        "First Wins %".to_string(),
        "Second Wins %".to_string(),
        "First Artwork".to_string(),
        "Second Artwork".to_string(),
    ]];
    battle_rows.extend(report.battles.iter().map(battle_row));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings")?;
        write_rows(sheet, &standings_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Battles")?;
        write_rows(sheet, &battle_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportSummary {
        standings: standings_rows.len().saturating_sub(1),
        battles: battle_rows.len().saturating_sub(1),
    })
}

fn standing_row(rank: usize, s: &Standing) -> Vec<String> {
    vec![
        rank.to_string(),
        s.name.clone(),
        s.battles.to_string(),
        s.wins.to_string(),
        format_percent(s.mean_win_prob),
    ]
}

fn battle_row(b: &PredictionResult) -> Vec<String> {
    vec![
        b.first.display_name.clone(),
        b.second.display_name.clone(),
        b.winner().display_name.clone(),
        format_percent(b.p_first),
        format_percent(b.p_second),
        b.first.image_url.clone(),
        b.second.image_url.clone(),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
