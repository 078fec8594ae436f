/// Named visual styles a row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleName {
    /// Title block, column headings and weekend rows.
    Holiday,
    /// Working-day rows and the footer.
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Times,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub family: FontFamily,
    pub emphasis: Emphasis,
    pub size_pt: f32,
    pub fill: (u8, u8, u8),
}

impl CellStyle {
    /// Fill color as PDF color components in 0.0..=1.0.
    pub fn fill_components(&self) -> [f32; 3] {
        let (r, g, b) = self.fill;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

pub static STYLES: [(StyleName, CellStyle); 2] = [
    (
        StyleName::Holiday,
        CellStyle {
            family: FontFamily::Times,
            emphasis: Emphasis::Bold,
            size_pt: 12.0,
            fill: (240, 192, 193),
        },
    ),
    (
        StyleName::Normal,
        CellStyle {
            family: FontFamily::Times,
            emphasis: Emphasis::Bold,
            size_pt: 12.0,
            fill: (255, 255, 255),
        },
    ),
];

impl StyleName {
    pub fn style(self) -> &'static CellStyle {
        STYLES
            .iter()
            .find(|(name, _)| *name == self)
            .map(|(_, style)| style)
            .unwrap_or(&STYLES[1].1)
    }
}
