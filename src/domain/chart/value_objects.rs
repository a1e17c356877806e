use chrono::NaiveDate;

/// Value Object - mapping from (date, percent) to canvas pixels.
///
/// `left/top/width/height` describe the plot rectangle inside the canvas;
/// x grows with the date, y is inverted so larger returns sit higher.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_value: f64,
    pub max_value: f64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn day_span(&self) -> f64 {
        (self.end_date - self.start_date).num_days() as f64
    }

    pub fn value_range(&self) -> f64 {
        self.max_value - self.min_value
    }

    /// Convert a date to a canvas X coordinate
    pub fn date_to_x(&self, date: NaiveDate) -> f64 {
        let span = self.day_span();
        if span == 0.0 {
            return self.left + self.width / 2.0;
        }
        let normalized = (date - self.start_date).num_days() as f64 / span;
        self.left + normalized * self.width
    }

    /// Convert a percentage value to a canvas Y coordinate
    pub fn value_to_y(&self, value: f64) -> f64 {
        let range = self.value_range();
        if range == 0.0 {
            return self.top + self.height / 2.0;
        }
        let normalized = (value - self.min_value) / range;
        self.top + self.height * (1.0 - normalized) // Invert Y
    }
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    pub fn to_hex(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// `#rrggbb` for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!("#{:06x}", self.to_hex())
    }

    pub const WHITE: Color = Color::from_hex(0xFFFFFF);
    pub const GRID: Color = Color::from_hex(0x3A4A5C);
    pub const BASELINE: Color = Color::from_hex(0xA0A0A0);
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Line colors assigned to series in order, cycling
pub const SERIES_PALETTE: [Color; 8] = [
    Color::from_hex(0x636EFA),
    Color::from_hex(0xEF553B),
    Color::from_hex(0x00CC96),
    Color::from_hex(0xAB63FA),
    Color::from_hex(0xFFA15A),
    Color::from_hex(0x19D3F3),
    Color::from_hex(0xFF6692),
    Color::from_hex(0xB6E880),
];

/// One labelled tick on an axis, positioned in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            min_value: -10.0,
            max_value: 10.0,
            left: 50.0,
            top: 20.0,
            width: 100.0,
            height: 200.0,
        }
    }

    #[test]
    fn dates_map_linearly_across_the_plot() {
        let vp = viewport();
        assert_eq!(vp.date_to_x(vp.start_date), 50.0);
        assert_eq!(vp.date_to_x(vp.end_date), 150.0);
        assert_eq!(vp.date_to_x(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()), 100.0);
    }

    #[test]
    fn y_axis_is_inverted() {
        let vp = viewport();
        assert_eq!(vp.value_to_y(10.0), 20.0);
        assert_eq!(vp.value_to_y(-10.0), 220.0);
        assert_eq!(vp.value_to_y(0.0), 120.0);
    }

    #[test]
    fn palette_colors_render_as_css() {
        assert_eq!(SERIES_PALETTE[0].to_css(), "#636efa");
        assert_eq!(Color::from(0x00FF10).to_css(), "#00ff10");
    }
}
