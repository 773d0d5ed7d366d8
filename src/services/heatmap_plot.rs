use plotters::prelude::*;
use thiserror::Error;

use crate::domain::severity::SeverityBand;
use crate::services::calendar_grid::{CalendarCell, CalendarGrid, DAY_NAMES};

#[derive(Error, Debug)]
pub enum HeatmapPlotError {
    #[error("failed to render heat map: {0}")]
    Plot(String),
}

const CELL_SIZE: u32 = 100;
const OTHER_MONTH_COLOR: RGBColor = RGBColor(243, 244, 246);
const BORDER_COLOR: RGBColor = RGBColor(209, 213, 219);
const TODAY_COLOR: RGBColor = RGBColor(37, 99, 235);

pub async fn write_heatmap_png(output_path: &str, grid: &CalendarGrid) -> Result<(), HeatmapPlotError> {
    let output_path = output_path.to_string();
    let grid = grid.clone();
    tokio::task::spawn_blocking(move || render_heatmap_png(&output_path, &grid))
        .await
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))??;
    Ok(())
}

/// Draws the calendar with one colored square per day, a weekday header row
/// and, when the grid carries probabilities, a legend row.
pub fn render_heatmap_png(output_path: &str, grid: &CalendarGrid) -> Result<(), HeatmapPlotError> {
    let legend_rows = if grid.has_probabilities { 1 } else { 0 };
    let rows = grid.weeks.len() as i32 + 1 + legend_rows;

    let width = CELL_SIZE * 7 + 40;
    let height = CELL_SIZE * rows as u32 + 100;
    let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(grid.window.label(), ("sans-serif", 30))
        .build_cartesian_2d(0..7, 0..rows)
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;

    // Row 0 is the top of the chart.
    let top = |row: i32| rows - row;

    let header_style = ("sans-serif", 22).into_font().color(&BLACK);
    chart
        .draw_series(DAY_NAMES.iter().enumerate().map(|(col, name)| {
            EmptyElement::at((col as i32, top(0)))
                + Text::new(name.to_string(), (32, 36), header_style.clone())
        }))
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;

    let cells: Vec<(i32, i32, &CalendarCell)> = grid
        .weeks
        .iter()
        .enumerate()
        .flat_map(|(week, days)| {
            days.iter()
                .enumerate()
                .map(move |(col, cell)| (col as i32, week as i32 + 1, cell))
        })
        .collect();

    chart
        .draw_series(cells.iter().map(|(col, row, cell)| {
            Rectangle::new(
                [(*col, top(*row)), (*col + 1, top(*row) - 1)],
                cell_color(cell).filled(),
            )
        }))
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;

    chart
        .draw_series(cells.iter().map(|(col, row, cell)| {
            let border = if cell.is_today { TODAY_COLOR } else { BORDER_COLOR };
            Rectangle::new(
                [(*col, top(*row)), (*col + 1, top(*row) - 1)],
                border.stroke_width(if cell.is_today { 3 } else { 1 }),
            )
        }))
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;

    chart
        .draw_series(
            cells
                .iter()
                .filter(|(_, _, cell)| cell.in_month)
                .filter_map(|(col, row, cell)| Some((col, row, cell, cell.date?)))
                .map(|(col, row, cell, date)| {
                    EmptyElement::at((*col, top(*row)))
                        + Text::new(
                            date.format("%-d").to_string(),
                            (10, 10),
                            ("sans-serif", 22).into_font().color(&text_color(cell)),
                        )
                }),
        )
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;

    chart
        .draw_series(cells.iter().filter_map(|(col, row, cell)| {
            let percentage = cell.percentage?;
            Some(
                EmptyElement::at((*col, top(*row)))
                    + Text::new(
                        format!("{percentage:.1}%"),
                        (10, 60),
                        ("sans-serif", 18).into_font().color(&text_color(cell)),
                    ),
            )
        }))
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;

    if grid.has_probabilities {
        let legend_row = rows - 1;
        chart
            .draw_series(SeverityBand::ALL.iter().enumerate().map(|(col, band)| {
                let (r, g, b) = band.background_rgb();
                EmptyElement::at((col as i32, top(legend_row)))
                    + Rectangle::new([(10, 30), (40, 60)], RGBColor(r, g, b).filled())
                    + Rectangle::new([(10, 30), (40, 60)], BORDER_COLOR.stroke_width(1))
                    + Text::new(
                        band.legend_label().to_string(),
                        (46, 36),
                        ("sans-serif", 18).into_font().color(&BLACK),
                    )
            }))
            .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;
    }

    root.present()
        .map_err(|e| HeatmapPlotError::Plot(e.to_string()))?;
    Ok(())
}

fn cell_color(cell: &CalendarCell) -> RGBColor {
    if !cell.in_month {
        return OTHER_MONTH_COLOR;
    }
    let (r, g, b) = cell
        .band()
        .unwrap_or(SeverityBand::None)
        .background_rgb();
    RGBColor(r, g, b)
}

fn text_color(cell: &CalendarCell) -> RGBColor {
    let (r, g, b) = cell
        .band()
        .unwrap_or(SeverityBand::None)
        .text_rgb();
    RGBColor(r, g, b)
}
