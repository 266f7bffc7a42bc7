//! Polar bar chart of class-group frequencies, rendered as standalone SVG.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::classes::ClassCount;
use crate::color::hsl_to_rgb;
use crate::marker::escape_html;

pub const CHART_TITLE: &str = "Top Meteorite Types by Frequency";

const BACKGROUND: &str = "#111111";
const GRID: &str = "#444444";
const TEXT: &str = "#f2f5fa";

/// Dark-themed polar chart: one wedge per group, radius proportional to
/// count, colour rotating through the hue circle by rank.
#[derive(Debug, Clone)]
pub struct PolarChart {
    pub width: u32,
    pub height: u32,
    pub opacity: f64,
}

impl Default for PolarChart {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            opacity: 0.8,
        }
    }
}

/// `hsl(i/n*360, 70%, 50%)` as a hex colour.
pub fn wedge_color(rank: usize, n: usize) -> String {
    let hue = rank as f64 / n.max(1) as f64 * 360.0;
    let (r, g, b) = hsl_to_rgb(hue, 0.7, 0.5);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

impl PolarChart {
    pub fn render_svg(&self, top: &[ClassCount]) -> String {
        let w = self.width as f64;
        let h = self.height as f64;
        let (cx, cy) = (w / 2.0, h / 2.0 + 20.0);
        let max_radius = (w.min(h) / 2.0 - 70.0).max(10.0);

        let mut body = String::new();

        // Rings at thirds of the largest count.
        for frac in [1.0 / 3.0, 2.0 / 3.0, 1.0] {
            let _ = write!(
                body,
                r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="none" stroke="{}" stroke-width="1"/>"##,
                cx,
                cy,
                max_radius * frac,
                GRID
            );
        }

        let n = top.len();
        let max_count = top.iter().map(|c| c.count).max().unwrap_or(0).max(1);
        let step = if n > 0 { 2.0 * PI / n as f64 } else { 0.0 };

        for (i, class) in top.iter().enumerate() {
            let radius = class.count as f64 / max_count as f64 * max_radius;
            let color = wedge_color(i, n);
            let tooltip = format!(
                "{}: {} ({}%)",
                escape_html(&class.group),
                class.count,
                class.percentage
            );

            if n == 1 {
                let _ = write!(
                    body,
                    r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" opacity="{}"><title>{}</title></circle>"##,
                    cx, cy, radius, color, self.opacity, tooltip
                );
            } else {
                // Centred on the rank's angle, starting at 12 o'clock.
                let a1 = i as f64 * step - step / 2.0 - PI / 2.0;
                let a2 = a1 + step;
                let large_arc = if step > PI { 1 } else { 0 };
                let _ = write!(
                    body,
                    r##"<path d="M{:.1},{:.1} L{:.1},{:.1} A{:.1},{:.1} 0 {},1 {:.1},{:.1} Z" fill="{}" opacity="{}" stroke="{}" stroke-width="1"><title>{}</title></path>"##,
                    cx,
                    cy,
                    cx + radius * a1.cos(),
                    cy + radius * a1.sin(),
                    radius,
                    radius,
                    large_arc,
                    cx + radius * a2.cos(),
                    cy + radius * a2.sin(),
                    color,
                    self.opacity,
                    BACKGROUND,
                    tooltip
                );
            }

            let mid = i as f64 * step - PI / 2.0;
            let label_r = max_radius + 18.0;
            let anchor = match mid.cos() {
                c if c > 0.2 => "start",
                c if c < -0.2 => "end",
                _ => "middle",
            };
            let _ = write!(
                body,
                r##"<text x="{:.1}" y="{:.1}" text-anchor="{}" font-size="12" fill="{}">{}</text>"##,
                cx + label_r * mid.cos(),
                cy + label_r * mid.sin() + 4.0,
                anchor,
                TEXT,
                escape_html(&class.group)
            );
        }

        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Roboto Mono, monospace">
<rect width="100%" height="100%" fill="{bg}"/>
<text x="{tx:.1}" y="36" text-anchor="middle" font-size="24" font-family="Roboto, sans-serif" fill="{fg}">{title}</text>
{body}
</svg>
"##,
            w = self.width,
            h = self.height,
            bg = BACKGROUND,
            tx = cx,
            fg = TEXT,
            title = CHART_TITLE,
            body = body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(groups: &[(&str, usize)]) -> Vec<ClassCount> {
        groups
            .iter()
            .map(|(g, c)| ClassCount {
                group: g.to_string(),
                count: *c,
                percentage: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_wedge_color_rotates_hue() {
        assert_eq!(wedge_color(0, 4), "#d92626");
        assert_ne!(wedge_color(1, 4), wedge_color(2, 4));
    }

    #[test]
    fn test_render_one_wedge_per_group() {
        let svg = PolarChart::default().render_svg(&counts(&[
            ("L-type", 30),
            ("H-type", 20),
            ("Iron", 5),
        ]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(CHART_TITLE));
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("L-type: 30"));
        assert!(svg.contains(BACKGROUND));
    }

    #[test]
    fn test_render_single_and_empty() {
        let single = PolarChart::default().render_svg(&counts(&[("Lunar", 2)]));
        assert_eq!(single.matches("<path").count(), 0);
        assert!(single.contains("<title>Lunar: 2"));

        let empty = PolarChart::default().render_svg(&[]);
        assert!(empty.contains(CHART_TITLE));
        assert_eq!(empty.matches("<path").count(), 0);
    }

    #[test]
    fn test_group_names_escaped() {
        let svg = PolarChart::default().render_svg(&counts(&[("A<B", 1), ("C", 1)]));
        assert!(svg.contains("A&lt;B"));
        assert!(!svg.contains("A<B"));
    }
}
