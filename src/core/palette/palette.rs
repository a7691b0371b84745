use crate::core::data::colour::Rgb;
use crate::core::palette::channel::{ChannelKind, ChannelState, Channels};

/// Sampling mode of the palette lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PaletteFilter {
    /// Discrete colour bands.
    #[default]
    Nearest,
    /// Smooth gradient between neighbouring entries.
    Linear,
}

/// Everything that determines the generated palette colours and how they are sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteState {
    pub channels: Channels,
    pub reversed: bool,
    pub override_enabled: bool,
    /// Colour of the never-escaped bucket while `override_enabled` is set.
    pub override_color: Rgb,
    pub smooth_filtering: bool,
}

impl Default for PaletteState {
    fn default() -> Self {
        Self {
            channels: Channels::default(),
            reversed: false,
            override_enabled: false,
            override_color: Rgb::BLACK,
            smooth_filtering: false,
        }
    }
}

impl PaletteState {
    #[must_use]
    pub fn channel(&self, kind: ChannelKind) -> &ChannelState {
        self.channels.get(kind)
    }

    pub fn channel_mut(&mut self, kind: ChannelKind) -> &mut ChannelState {
        self.channels.get_mut(kind)
    }

    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    pub fn set_override(&mut self, enabled: bool, colour: Rgb) {
        self.override_enabled = enabled;
        self.override_color = colour;
    }

    pub fn set_filtering(&mut self, smooth: bool) {
        self.smooth_filtering = smooth;
    }

    #[must_use]
    pub fn filter(&self) -> PaletteFilter {
        if self.smooth_filtering {
            PaletteFilter::Linear
        } else {
            PaletteFilter::Nearest
        }
    }

    /// True when the colours depend on elapsed time and must be regenerated every frame.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.channels.is_animated()
    }

    /// Produces exactly `size` colours, one per escape-time bucket.
    ///
    /// Reversal mirrors the whole sequence, including the last slot. The
    /// override colour is written to the last slot after reversing.
    #[must_use]
    pub fn generate(&self, size: usize, time: f32) -> Vec<Rgb> {
        let mut colours = vec![Rgb::BLACK; size];

        for i in 0..size {
            let index = if self.reversed { size - 1 - i } else { i };
            colours[index] = self.channels.colour_at(i as f32, time);
        }

        if self.override_enabled {
            if let Some(last) = colours.last_mut() {
                *last = self.override_color;
            }
        }

        colours
    }
}
