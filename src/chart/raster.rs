use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use super::Dashboard;
use crate::error::ChartError;

/// Static image export of a dashboard
pub trait Rasterizer {
    fn rasterize(&self, dashboard: &Dashboard, path: &Path) -> Result<(), ChartError>;
}

/// PNG export through plotters' bitmap backend.
///
/// Text rendering needs a system font; without one this fails with a
/// font error, which callers treat as non-fatal.
#[derive(Debug, Clone, Copy)]
pub struct PlottersRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersRasterizer {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Rasterizer for PlottersRasterizer {
    fn rasterize(&self, dashboard: &Dashboard, path: &Path) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        draw(dashboard, &root)?;
        root.present().map_err(drawing)?;
        Ok(())
    }
}

fn drawing<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Drawing(e.to_string())
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

fn draw<DB: DrawingBackend>(
    dashboard: &Dashboard,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), ChartError> {
    let spec = &dashboard.spec;
    root.fill(&WHITE).map_err(drawing)?;

    let dates = dashboard.date_range();
    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 30.0).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .right_y_label_area_size(80)
        .build_cartesian_2d(dates.clone(), dashboard.price_range())
        .map_err(drawing)?
        .set_secondary_coord(dates, dashboard.revenue_range());

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.price_label.as_str())
        .draw()
        .map_err(drawing)?;

    chart
        .configure_secondary_axes()
        .y_desc(spec.revenue_label.as_str())
        .draw()
        .map_err(drawing)?;

    let price_color = rgb(spec.price_color);
    chart
        .draw_series(LineSeries::new(
            dashboard.prices().iter().copied(),
            price_color.stroke_width(2),
        ))
        .map_err(drawing)?
        .label(spec.price_label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], price_color));

    let revenue_color = rgb(spec.revenue_color);
    chart
        .draw_secondary_series(LineSeries::new(
            dashboard.revenue().iter().copied(),
            revenue_color.stroke_width(2),
        ))
        .map_err(drawing)?
        .label(spec.revenue_label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], revenue_color));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing)?;

    Ok(())
}
