use crate::geometry::Size;

/// Metrics for laying out the item list inside the bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleLayout {
    pub padding: f64,
    pub row_height: f64,
    pub row_spacing: f64,
    pub min_width: f64,
}

impl Default for BubbleLayout {
    fn default() -> Self {
        Self {
            padding: 10.0,
            row_height: 22.0,
            row_spacing: 2.0,
            min_width: 80.0,
        }
    }
}

/// Placeholder row shown for a folder with no visible files.
pub const EMPTY_PLACEHOLDER: &str = "(empty)";

impl BubbleLayout {
    /// Size of the content for rows whose rendered text widths are
    /// `text_widths`. An empty list is measured as a single placeholder row of
    /// `placeholder_width`.
    pub fn measure(&self, text_widths: &[f64], placeholder_width: f64) -> Size {
        let (rows, widest) = if text_widths.is_empty() {
            (1, placeholder_width)
        } else {
            (
                text_widths.len(),
                text_widths.iter().copied().fold(0.0_f64, f64::max),
            )
        };
        let width = (widest + self.padding * 2.0).max(self.min_width);
        let height = rows as f64 * self.row_height
            + (rows.saturating_sub(1)) as f64 * self.row_spacing
            + self.padding * 2.0;
        Size::new(width.ceil(), height.ceil())
    }
}
