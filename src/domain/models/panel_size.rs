#[cfg(test)]
#[path = "panel_size_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

pub const MIN_WIDTH: u16 = 40;
pub const MAX_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 50;
pub const MAX_HEIGHT: u16 = 95;
pub const SIZE_STEP: u16 = 5;

/// Chat panel size as percentages of the terminal, persisted between runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSize {
    pub width: u16,
    pub height: u16,
}

impl Default for PanelSize {
    fn default() -> PanelSize {
        return PanelSize {
            width: 40,
            height: 80,
        };
    }
}

impl PanelSize {
    pub fn clamped(self) -> PanelSize {
        return PanelSize {
            width: self.width.clamp(MIN_WIDTH, MAX_WIDTH),
            height: self.height.clamp(MIN_HEIGHT, MAX_HEIGHT),
        };
    }

    pub fn parse(payload: &str) -> Option<PanelSize> {
        return serde_json::from_str::<PanelSize>(payload)
            .ok()
            .map(|size| return size.clamped());
    }

    pub fn to_json(&self) -> String {
        return format!(
            "{{\"width\":{width},\"height\":{height}}}",
            width = self.width,
            height = self.height
        );
    }
}
