#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;

use ratatui::prelude::Rect;

use crate::domain::models::PanelSize;
use crate::domain::models::MAX_HEIGHT;
use crate::domain::models::MAX_WIDTH;
use crate::domain::models::MIN_HEIGHT;
use crate::domain::models::MIN_WIDTH;
use crate::domain::models::SIZE_STEP;

/// Rows kept free above the panel so it never covers the whole terminal.
pub const VIEWPORT_MARGIN_ROWS: u16 = 2;

/// Visibility and size of the chat panel. Sizes are percentages of the
/// terminal, so a resize moves the bounds without touching the preference.
pub struct PanelShell {
    open: bool,
    size: PanelSize,
    viewport_cols: u16,
    viewport_rows: u16,
}

impl PanelShell {
    pub fn new(size: PanelSize) -> PanelShell {
        return PanelShell {
            open: false,
            size: size.clamped(),
            viewport_cols: 0,
            viewport_rows: 0,
        };
    }

    pub fn is_open(&self) -> bool {
        return self.open;
    }

    pub fn size(&self) -> PanelSize {
        return self.size;
    }

    /// Returns the new visibility.
    #[cfg(test)]
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        return self.open;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_viewport(&mut self, cols: u16, rows: u16) {
        self.viewport_cols = cols;
        self.viewport_rows = rows;
    }

    /// Tallest height, in percent, that still leaves the margin rows free.
    pub fn viewport_max_height(&self) -> u16 {
        if self.viewport_rows == 0 {
            return MAX_HEIGHT;
        }

        let usable = self.viewport_rows.saturating_sub(VIEWPORT_MARGIN_ROWS) as u32;
        let percent = usable * 100 / self.viewport_rows as u32;
        return percent.min(MAX_HEIGHT as u32) as u16;
    }

    /// Returns true when the size changed and needs persisting.
    pub fn increase(&mut self) -> bool {
        let before = self.size;
        let height = (self.size.height + SIZE_STEP)
            .min(MAX_HEIGHT)
            .min(self.viewport_max_height())
            .max(MIN_HEIGHT);

        self.size = PanelSize {
            width: (self.size.width + SIZE_STEP).min(MAX_WIDTH),
            height,
        };

        return self.size != before;
    }

    /// Returns true when the size changed and needs persisting.
    pub fn decrease(&mut self) -> bool {
        let before = self.size;
        self.size = PanelSize {
            width: self.size.width.saturating_sub(SIZE_STEP).max(MIN_WIDTH),
            height: self.size.height.saturating_sub(SIZE_STEP).max(MIN_HEIGHT),
        };

        return self.size != before;
    }

    /// Panel area anchored to the bottom right corner of `area`.
    pub fn panel_rect(&self, area: Rect) -> Rect {
        let width = (area.width as u32 * self.size.width as u32 / 100) as u16;
        let height = (area.height as u32 * self.size.height as u32 / 100) as u16;
        let width = width.min(area.width);
        let height = height.min(area.height);

        return Rect {
            x: area.x + area.width - width,
            y: area.y + area.height - height,
            width,
            height,
        };
    }
}
