// src/debug/visualization/svg.rs
use crate::math::{
    geometry::voronoi::CellRaster,
    types::{Bounds2D, Point2D},
};
use bevy_log::info;
use std::io::Write;

// ===================================================================================
// 1. HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Ein Helfer zum Erstellen einer SVG-Datei.
struct SvgBuilder {
    content: String,
    // Relative Größe, die vom Builder berechnet wird
    point_radius: f64,
}

impl SvgBuilder {
    /// Erstellt ein neues SVG-Grundgerüst mit Header, Stil und Hintergrund.
    fn new(display_bounds: &Bounds2D, svg_pixel_size: f64) -> Self {
        let viewbox_min_x = display_bounds.min.x;
        let viewbox_min_y = display_bounds.min.y;
        let viewbox_width = display_bounds.width();
        let viewbox_height = display_bounds.height();

        let stroke_w_thin = (viewbox_width + viewbox_height) / 2.0 * 0.002;
        let point_radius = (viewbox_width + viewbox_height) / 2.0 * 0.006;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{svg_pixel_size}" height="{svg_pixel_size}" viewBox="{viewbox_min_x} {viewbox_min_y} {viewbox_width} {viewbox_height}" xmlns="http://www.w3.org/2000/svg" shape-rendering="crispEdges">
  <style>
    .background {{ fill: #f0f0f0; fill-opacity: 1.0; }}
    .site {{ fill: #ffffff; stroke: #000000; stroke-width: {stroke_w_thin}; }}
  </style>
  <rect x="{viewbox_min_x}" y="{viewbox_min_y}" width="{viewbox_width}" height="{viewbox_height}" class="background" />
"#,
        );

        Self {
            content,
            point_radius,
        }
    }

    /// Zeichnet ein gefülltes Rechteck.
    fn draw_filled_rect(&mut self, min: Point2D, size: Point2D, fill: &str) {
        self.content.push_str(&format!(
            r#"  <rect x="{:.4}" y="{:.4}" width="{:.4}" height="{:.4}" fill="{}" />
"#,
            min.x, min.y, size.x, size.y, fill
        ));
    }

    /// Zeichnet einen Kreis.
    fn draw_circle(&mut self, center: &Point2D, radius: f64, class: &str) {
        self.content.push_str(&format!(
            r#"  <circle cx="{:.3}" cy="{:.3}" r="{:.3}" class="{}" />
"#,
            center.x, center.y, radius, class
        ));
    }

    /// Schließt die Tags und liefert den SVG-Text.
    fn finish(mut self) -> String {
        self.content.push_str("</svg>\n");
        self.content
    }
}

/// Deterministische Farbe pro Zelle (Goldener-Winkel-Farbkreis)
fn cell_color(label: usize) -> String {
    let hue = (label as f64 * 137.508) % 360.0;
    format!("hsl({:.1}, 65%, 60%)", hue)
}

/// Rendert ein Zell-Raster als SVG: ein Rechteck pro Pixel, eingefärbt nach
/// Zelle, darüber ein Kreis pro Site.
pub fn render_cell_raster_svg(raster: &CellRaster, sites: &[Point2D], svg_pixel_size: f64) -> String {
    let bounds = *raster.bounds();
    let mut svg = SvgBuilder::new(&bounds, svg_pixel_size);
    let pixel_size = raster.pixel_size();

    for y in 0..raster.height() {
        for x in 0..raster.width() {
            if let Some(label) = raster.label(x, y) {
                let min = bounds.min + pixel_size * Point2D::new(x as f64, y as f64);
                svg.draw_filled_rect(min, pixel_size, &cell_color(label));
            }
        }
    }

    let radius = svg.point_radius;
    for site in sites.iter().filter(|site| bounds.contains_point(**site)) {
        svg.draw_circle(site, radius, "site");
    }

    svg.finish()
}

/// Erstellt eine Debug-SVG-Datei für ein Zell-Raster.
pub fn create_cell_raster_svg(
    filename: &str,
    raster: &CellRaster,
    sites: &[Point2D],
    svg_pixel_size: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = render_cell_raster_svg(raster, sites, svg_pixel_size);
    let mut file = std::fs::File::create(filename)?;
    file.write_all(content.as_bytes())?;
    info!("Debug SVG '{}' wurde erstellt.", filename);
    Ok(())
}
