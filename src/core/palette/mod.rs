pub mod channel;
pub mod palette;
pub mod texture;

pub use channel::{ChannelKind, ChannelState, Channels, NamedChannels, ensure_default_channels, evaluate};
pub use palette::{PaletteFilter, PaletteState};
pub use texture::{PaletteLookup, PaletteTexture, fit_to_width, lookup_coordinate};
