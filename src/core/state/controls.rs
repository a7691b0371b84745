/// Keys held during one tick of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlsSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub fast: bool,
}

impl ControlsSnapshot {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right || self.zoom_in || self.zoom_out)
    }
}

/// Continuous zoom applied every tick without a key held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoZoom {
    #[default]
    Off,
    In,
    Out,
}
