//! Heat maps and on-disk artifacts of a recording run.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::aggregate::ProfileMatrix;
use crate::error::{Error, Result};

pub const HEAT_MAP_TITLE: &str = "Correlation Map of Neuron Activations";
const MAX_TICKS: usize = 10;
const IMAGE_SIZE: (u32, u32) = (900, 760);
const COLOR_BAR_WIDTH: u32 = 140;

// viridis anchors at 0, 0.25, 0.5, 0.75, 1
const PALETTE: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Maps a value to the colour scale, clamped to [0, 1]. NaN is grey.
pub fn scale_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(128, 128, 128);
    }
    let x = value.clamp(0.0, 1.0) * (PALETTE.len() - 1) as f64;
    let lo = (x.floor() as usize).min(PALETTE.len() - 2);
    let t = x - lo as f64;
    let (a, b) = (PALETTE[lo], PALETTE[lo + 1]);
    let mix = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Zero-based indices that get a tick label: every `max(1, n / 10)`-th neuron.
pub fn tick_indices(n: usize) -> Vec<usize> {
    let step = (n / MAX_TICKS).max(1);
    (0..n).step_by(step).collect()
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "output directory does not exist"),
        )),
        _ => Ok(()),
    }
}

/// Renders a square correlation matrix as an SVG image.
pub fn render_heat_map(corr: &[Vec<f64>], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if ext.as_deref() != Some("svg") {
        return Err(Error::UnsupportedFormat(path.to_path_buf()));
    }
    draw_heat_map(SVGBackend::new(path, IMAGE_SIZE).into_drawing_area(), corr)?;
    info!(path = %path.display(), neurons = corr.len(), "heat map written");
    Ok(())
}

fn draw_heat_map<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, corr: &[Vec<f64>]) -> Result<()> {
    let n = corr.len();
    root.fill(&WHITE).map_err(plot_err)?;
    let (map_area, bar_area) = root.split_horizontally((IMAGE_SIZE.0 - COLOR_BAR_WIDTH) as i32);

    // each cell spans two grid units so ticks land on odd cell centres; row 0 is drawn at the top
    let side = 2 * n.max(1) as i32;
    let ticks = tick_indices(n);
    let x_keys: Vec<i32> = ticks.iter().map(|&k| 2 * k as i32 + 1).collect();
    let y_keys: Vec<i32> = ticks.iter().map(|&k| side - 2 * k as i32 - 1).collect();

    let mut chart = ChartBuilder::on(&map_area)
        .caption(HEAT_MAP_TITLE, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d((0..side).with_key_points(x_keys), (0..side).with_key_points(y_keys))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&|v| format!("{}", (v - 1) / 2 + 1))
        .y_label_formatter(&|v| format!("{}", (side - 1 - v) / 2 + 1))
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(corr.iter().enumerate().flat_map(|(i, row)| {
            let y = side - 2 * i as i32 - 2;
            row.iter().enumerate().map(move |(j, &v)| {
                let x = 2 * j as i32;
                Rectangle::new([(x, y), (x + 2, y + 2)], scale_color(v).filled())
            })
        }))
        .map_err(plot_err)?;

    draw_color_bar(&bar_area)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_color_bar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<()> {
    const STEPS: usize = 100;
    let mut bar = ChartBuilder::on(area)
        .margin_top(52)
        .margin_bottom(50)
        .margin_right(50)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(plot_err)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style(("sans-serif", 12))
        .draw()
        .map_err(plot_err)?;

    bar.draw_series((0..STEPS).map(|s| {
        let lo = s as f64 / STEPS as f64;
        let hi = (s + 1) as f64 / STEPS as f64;
        Rectangle::new([(0.0, lo), (1.0, hi)], scale_color((lo + hi) / 2.0).filled())
    }))
    .map_err(plot_err)?;
    Ok(())
}

/// Writes a profile matrix as a pickled list of per-neuron rows.
pub fn save_profile(profile: &ProfileMatrix, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_pickle::to_writer(&mut writer, profile, serde_pickle::SerOptions::new())?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    info!(
        path = %path.display(),
        neurons = profile.neuron_count(),
        features = profile.feature_count(),
        "profile matrix written"
    );
    Ok(())
}

pub fn load_profile(path: impl AsRef<Path>) -> Result<ProfileMatrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let rows: Vec<Vec<f64>> =
        serde_pickle::from_reader(BufReader::new(file), serde_pickle::DeOptions::new())?;
    ProfileMatrix::new(rows)
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

pub fn write_json_pretty<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| Error::io(path, e))
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
