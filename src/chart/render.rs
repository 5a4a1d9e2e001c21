use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::io::Cursor;
use crate::config::ChartConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Ledger;
use super::plan::{ChartPlan, Slice};

const FONT: &str = "sans-serif";
const TITLE: &str = "Weekly hours distribution";

// tab10
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const NO_ACTIVITIES_FILL: RGBColor = RGBColor(211, 211, 211);
const ALL_ZERO_FILL: RGBColor = RGBColor(173, 216, 230);

type DrawResult = Result<(), Box<dyn Error>>;

/// Renders ledgers as base64-encoded PNG pie charts.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl ChartRenderer {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }

    pub fn render(&self, ledger: &Ledger) -> AppResult<String> {
        let plan = ChartPlan::from_ledger(ledger);
        tracing::debug!("Rendering chart: {:?}", plan);
        let png = self.render_png(&plan)?;
        Ok(STANDARD.encode(png))
    }

    /// [`render`](Self::render) on the blocking pool, off the async workers.
    pub async fn render_blocking(&self, ledger: Ledger) -> AppResult<String> {
        let renderer = self.clone();
        tokio::task::spawn_blocking(move || renderer.render(&ledger)).await?
    }

    pub fn render_png(&self, plan: &ChartPlan) -> AppResult<Vec<u8>> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];
        draw_plan(plan, &mut buffer, (self.width, self.height))
            .map_err(|e| AppError::Chart(e.to_string()))?;
        encode_png(self.width, self.height, buffer)
    }
}

fn draw_plan(plan: &ChartPlan, buffer: &mut [u8], size: (u32, u32)) -> DrawResult {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE)?;

    match plan {
        ChartPlan::Pie(slices) => draw_pie(&root, slices)?,
        ChartPlan::NoActivities => draw_placeholder(&root, plan, NO_ACTIVITIES_FILL)?,
        ChartPlan::AllZero => draw_placeholder(&root, plan, ALL_ZERO_FILL)?,
    }

    root.present()?;
    Ok(())
}

fn draw_pie(root: &DrawingArea<BitMapBackend, Shift>, slices: &[Slice]) -> DrawResult {
    let area = root.titled(TITLE, (FONT, 28))?;
    let (width, height) = area.dim_in_pixel();

    // sized from the shorter side so the pie fits any canvas
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.32;

    let sizes: Vec<f64> = slices.iter().map(|s| s.hours).collect();
    let labels: Vec<String> = slices.iter().map(Slice::label).collect();
    let colors: Vec<RGBColor> = (0..slices.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style((FONT, 16).into_font().color(&BLACK));
    area.draw(&pie)?;
    Ok(())
}

fn draw_placeholder(
    root: &DrawingArea<BitMapBackend, Shift>,
    plan: &ChartPlan,
    fill: RGBColor,
) -> DrawResult {
    let Some(lines) = plan.placeholder_text() else {
        return Ok(());
    };

    let (width, height) = root.dim_in_pixel();
    let (cx, cy) = (width as i32 / 2, height as i32 / 2);
    let half_width = width as i32 * 2 / 5;

    root.draw(&Rectangle::new(
        [(cx - half_width, cy - 50), (cx + half_width, cy + 50)],
        fill.filled(),
    ))?;

    let style = (FONT, 22)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (i, line) in lines.iter().enumerate() {
        let y = cy - 16 + i as i32 * 32;
        root.draw(&Text::new(*line, (cx, y), style.clone()))?;
    }
    Ok(())
}

/// Encodes a packed RGB buffer as PNG.
pub fn encode_png(width: u32, height: u32, rgb: Vec<u8>) -> AppResult<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| AppError::Chart("pixel buffer does not match canvas size".into()))?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| AppError::Chart(e.to_string()))?;
    Ok(png.into_inner())
}
