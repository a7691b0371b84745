use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::camera::camera::{DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::core::data::colour::Rgb;
use crate::core::data::complex::Complex;
use crate::core::data::size::Size;
use crate::core::palette::{
    ChannelKind, ChannelState, Channels, NamedChannels, PaletteState, ensure_default_channels,
};
use crate::core::state::app_state::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::core::state::{AppState, DEFAULT_MAX_ITERATIONS, MAX_ITERATIONS_LIMIT, default_window_size};

#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("could not access state file: {0}")]
    Io(#[from] io::Error),
    #[error("state file is not valid: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowRecord {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowRecord {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRecord {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
}

impl Default for CameraRecord {
    fn default() -> Self {
        Self {
            center_x: DEFAULT_CENTER.real,
            center_y: DEFAULT_CENTER.imag,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// One stored channel. Absent fields keep that channel's own defaults.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color: Option<Rgb>,
    #[serde(alias = "y_scale", skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f32>,
    #[serde(alias = "x_offset", skip_serializing_if = "Option::is_none")]
    pub phase_offset: Option<f32>,
    #[serde(alias = "x_scale", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f32>,
    #[serde(alias = "t_scale", skip_serializing_if = "Option::is_none")]
    pub time_coefficient: Option<f32>,
}

impl From<&ChannelState> for ChannelRecord {
    fn from(channel: &ChannelState) -> Self {
        Self {
            base_color: Some(channel.base_color),
            amplitude: Some(channel.amplitude),
            phase_offset: Some(channel.phase_offset),
            frequency: Some(channel.frequency),
            time_coefficient: Some(channel.time_coefficient),
        }
    }
}

impl ChannelRecord {
    #[must_use]
    pub fn merge_over(&self, base: ChannelState) -> ChannelState {
        ChannelState {
            base_color: self.base_color.unwrap_or(base.base_color),
            amplitude: self.amplitude.unwrap_or(base.amplitude),
            phase_offset: self.phase_offset.unwrap_or(base.phase_offset),
            frequency: self.frequency.unwrap_or(base.frequency),
            time_coefficient: self.time_coefficient.unwrap_or(base.time_coefficient),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteRecord {
    pub channels: BTreeMap<String, ChannelRecord>,
    pub reversed: bool,
    pub override_enabled: bool,
    pub override_color: Rgb,
    pub smooth_filtering: bool,
}

impl Default for PaletteRecord {
    fn default() -> Self {
        Self::from(&PaletteState::default())
    }
}

impl From<&PaletteState> for PaletteRecord {
    fn from(palette: &PaletteState) -> Self {
        Self {
            channels: palette
                .channels
                .iter()
                .map(|(kind, channel)| (kind.name().to_string(), ChannelRecord::from(channel)))
                .collect(),
            reversed: palette.reversed,
            override_enabled: palette.override_enabled,
            override_color: palette.override_color,
            smooth_filtering: palette.smooth_filtering,
        }
    }
}

impl PaletteRecord {
    fn to_palette(&self) -> PaletteState {
        let mut named: NamedChannels = ChannelKind::ALL
            .iter()
            .filter_map(|&kind| {
                let record = self.channels.get(kind.name())?;
                Some((kind.name().to_string(), record.merge_over(kind.default_state())))
            })
            .collect();
        ensure_default_channels(&mut named);

        PaletteState {
            channels: Channels::from_named(&named),
            reversed: self.reversed,
            override_enabled: self.override_enabled,
            override_color: self.override_color,
            smooth_filtering: self.smooth_filtering,
        }
    }
}

/// On-disk form of the viewer session.
///
/// Missing fields take their defaults and unknown fields are ignored, so
/// older and newer files both load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub window: WindowRecord,
    pub camera: CameraRecord,
    pub max_iterations: u32,
    pub show_ui: bool,
    pub use_ssaa: bool,
    pub palette: PaletteRecord,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            window: WindowRecord::default(),
            camera: CameraRecord::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            show_ui: true,
            use_ssaa: true,
            palette: PaletteRecord::default(),
        }
    }
}

impl From<&AppState> for PersistedState {
    fn from(state: &AppState) -> Self {
        let camera = state.camera();
        Self {
            window: WindowRecord {
                width: state.window().width(),
                height: state.window().height(),
            },
            camera: CameraRecord {
                center_x: camera.center().real,
                center_y: camera.center().imag,
                zoom: camera.zoom(),
            },
            max_iterations: state.max_iterations(),
            show_ui: state.show_ui,
            use_ssaa: state.use_ssaa(),
            palette: PaletteRecord::from(&state.palette),
        }
    }
}

impl PersistedState {
    /// Builds the live state, replacing out-of-range values with defaults.
    ///
    /// The result is always dirty so the first frame recomputes the fractal.
    #[must_use]
    pub fn to_app_state(&self) -> AppState {
        let window = Size::new(self.window.width, self.window.height).unwrap_or_else(|_| {
            log::warn!(
                "ignoring stored window size {}x{}",
                self.window.width,
                self.window.height
            );
            default_window_size()
        });

        let mut state = AppState::new(window);

        let center = Complex::new(self.camera.center_x, self.camera.center_y);
        if let Err(error) = state.set_center(center) {
            log::warn!("ignoring stored camera center: {}", error);
        }
        if let Err(error) = state.set_zoom(self.camera.zoom) {
            log::warn!("ignoring stored zoom: {}", error);
        }
        let max_iterations = self.max_iterations.clamp(1, MAX_ITERATIONS_LIMIT);
        if max_iterations != self.max_iterations {
            log::warn!(
                "stored iteration cap {} is out of range, using {}",
                self.max_iterations,
                max_iterations
            );
        }
        if let Err(error) = state.set_max_iterations(max_iterations) {
            log::warn!("ignoring stored iteration cap: {}", error);
        }

        state.show_ui = self.show_ui;
        state.set_ssaa(self.use_ssaa);
        state.palette = self.palette.to_palette();
        state.mark_dirty();

        state
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, StateFileError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), StateFileError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Loads the session at `path`, falling back to defaults when it is missing or unreadable.
#[must_use]
pub fn load_state(path: impl AsRef<Path>) -> AppState {
    let path = path.as_ref();

    match PersistedState::read(path) {
        Ok(persisted) => {
            log::info!("loaded state from {}", path.display());
            persisted.to_app_state()
        }
        Err(StateFileError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
            log::info!("no state file at {}, using defaults", path.display());
            AppState::default()
        }
        Err(error) => {
            log::warn!("{} ({}), using defaults", error, path.display());
            AppState::default()
        }
    }
}

pub fn save_state(state: &AppState, path: impl AsRef<Path>) -> Result<(), StateFileError> {
    let path = path.as_ref();
    PersistedState::from(state).write(path)?;
    log::info!("saved state to {}", path.display());
    Ok(())
}
