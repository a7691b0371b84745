use std::collections::BTreeMap;
use std::f32::consts::PI;

use crate::core::data::colour::Rgb;

/// Parameters of one periodic colour channel.
///
/// `value(i, t) = amplitude * (0.5 + 0.5 * cos(phase_offset + i * frequency + time_coefficient * t))`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChannelState {
    /// Colour used to draw this channel's curve in the UI.
    pub base_color: Rgb,
    pub amplitude: f32,
    pub phase_offset: f32,
    pub frequency: f32,
    pub time_coefficient: f32,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            base_color: Rgb::BLACK,
            amplitude: 1.0,
            phase_offset: 0.0,
            frequency: 0.1,
            time_coefficient: 0.0,
        }
    }
}

impl ChannelState {
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.time_coefficient != 0.0
    }
}

/// Intensity of `channel` for escape-time bucket `iteration` at elapsed `time` seconds.
#[must_use]
pub fn evaluate(channel: &ChannelState, iteration: f32, time: f32) -> f32 {
    let angle =
        channel.phase_offset + iteration * channel.frequency + channel.time_coefficient * time;
    channel.amplitude * (0.5 + 0.5 * angle.cos())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKind {
    Red,
    Green,
    Blue,
}

impl ChannelKind {
    pub const ALL: &'static [Self] = &[Self::Red, Self::Green, Self::Blue];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    #[must_use]
    pub const fn primary(self) -> Rgb {
        match self {
            Self::Red => Rgb::RED,
            Self::Green => Rgb::GREEN,
            Self::Blue => Rgb::BLUE,
        }
    }

    /// Parameters seeded when a palette has no entry for this channel.
    #[must_use]
    pub fn default_state(self) -> ChannelState {
        let (amplitude, phase_offset, frequency) = match self {
            Self::Red => (0.8, 0.0, 0.013),
            Self::Green => (0.2, PI / 3.0, 0.033),
            Self::Blue => (1.0, 2.0 * PI / 3.0, 2.5),
        };

        ChannelState {
            base_color: self.primary(),
            amplitude,
            phase_offset,
            frequency,
            time_coefficient: 0.0,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The fixed red/green/blue channel set.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Channels {
    pub red: ChannelState,
    pub green: ChannelState,
    pub blue: ChannelState,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            red: ChannelKind::Red.default_state(),
            green: ChannelKind::Green.default_state(),
            blue: ChannelKind::Blue.default_state(),
        }
    }
}

impl Channels {
    #[must_use]
    pub fn get(&self, kind: ChannelKind) -> &ChannelState {
        match kind {
            ChannelKind::Red => &self.red,
            ChannelKind::Green => &self.green,
            ChannelKind::Blue => &self.blue,
        }
    }

    pub fn get_mut(&mut self, kind: ChannelKind) -> &mut ChannelState {
        match kind {
            ChannelKind::Red => &mut self.red,
            ChannelKind::Green => &mut self.green,
            ChannelKind::Blue => &mut self.blue,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChannelKind, &ChannelState)> + '_ {
        ChannelKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }

    #[must_use]
    pub fn colour_at(&self, iteration: f32, time: f32) -> Rgb {
        Rgb::new(
            evaluate(&self.red, iteration, time),
            evaluate(&self.green, iteration, time),
            evaluate(&self.blue, iteration, time),
        )
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.iter().any(|(_, channel)| channel.is_animated())
    }

    /// Builds the fixed set from a name-keyed map, seeding any missing channel.
    #[must_use]
    pub fn from_named(named: &NamedChannels) -> Self {
        let mut channels = Self::default();
        for &kind in ChannelKind::ALL {
            if let Some(state) = named.get(kind.name()) {
                *channels.get_mut(kind) = *state;
            }
        }
        channels
    }
}

/// Channel parameters keyed by channel name, as stored on disk.
pub type NamedChannels = BTreeMap<String, ChannelState>;

/// Seeds red, green and blue with their defaults where absent. Other names are left alone.
pub fn ensure_default_channels(named: &mut NamedChannels) {
    for &kind in ChannelKind::ALL {
        named
            .entry(kind.name().to_string())
            .or_insert_with(|| kind.default_state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn assert_approx_eq(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= EPSILON,
            "actual={} expected={}",
            actual,
            expected
        );
    }

    #[test]
    fn test_evaluate_peaks_at_amplitude_when_angle_is_zero() {
        let channel = ChannelState {
            amplitude: 0.8,
            ..ChannelState::default()
        };

        assert_approx_eq(evaluate(&channel, 0.0, 0.0), 0.8);
    }

    #[test]
    fn test_evaluate_reaches_zero_at_half_period() {
        let channel = ChannelState {
            amplitude: 1.0,
            phase_offset: 0.0,
            frequency: PI / 10.0,
            ..ChannelState::default()
        };

        assert_approx_eq(evaluate(&channel, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_evaluate_uses_time_coefficient() {
        let still = ChannelState {
            frequency: 0.0,
            time_coefficient: 0.0,
            ..ChannelState::default()
        };
        let animated = ChannelState {
            time_coefficient: PI,
            ..still
        };

        assert_approx_eq(evaluate(&still, 3.0, 1.0), 1.0);
        assert_approx_eq(evaluate(&animated, 3.0, 1.0), 0.0);
        assert!(animated.is_animated());
        assert!(!still.is_animated());
    }

    #[test]
    fn test_evaluate_stays_within_amplitude_range() {
        let channel = ChannelKind::Blue.default_state();

        for i in 0..500 {
            let value = evaluate(&channel, i as f32, 0.0);
            assert!((0.0..=channel.amplitude + EPSILON).contains(&value));
        }
    }

    #[test]
    fn test_default_states_match_documented_values() {
        let red = ChannelKind::Red.default_state();
        let green = ChannelKind::Green.default_state();
        let blue = ChannelKind::Blue.default_state();

        assert_eq!((red.amplitude, red.phase_offset, red.frequency), (0.8, 0.0, 0.013));
        assert_eq!(
            (green.amplitude, green.phase_offset, green.frequency),
            (0.2, PI / 3.0, 0.033)
        );
        assert_eq!(
            (blue.amplitude, blue.phase_offset, blue.frequency),
            (1.0, 2.0 * PI / 3.0, 2.5)
        );
        assert_eq!(red.base_color, Rgb::RED);
        assert_eq!(green.base_color, Rgb::GREEN);
        assert_eq!(blue.base_color, Rgb::BLUE);
    }

    #[test]
    fn test_channel_kind_names_round_trip() {
        for &kind in ChannelKind::ALL {
            assert_eq!(ChannelKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ChannelKind::from_name("alpha"), None);
    }

    #[test]
    fn test_colour_at_composes_channels_in_rgb_order() {
        let channels = Channels::default();
        let colour = channels.colour_at(7.0, 0.0);

        assert_eq!(colour.r, evaluate(&channels.red, 7.0, 0.0));
        assert_eq!(colour.g, evaluate(&channels.green, 7.0, 0.0));
        assert_eq!(colour.b, evaluate(&channels.blue, 7.0, 0.0));
    }

    #[test]
    fn test_ensure_default_channels_seeds_empty_map() {
        let mut named = NamedChannels::new();

        ensure_default_channels(&mut named);

        assert_eq!(named.len(), 3);
        assert_eq!(named["red"], ChannelKind::Red.default_state());
        assert_eq!(named["green"], ChannelKind::Green.default_state());
        assert_eq!(named["blue"], ChannelKind::Blue.default_state());
    }

    #[test]
    fn test_ensure_default_channels_keeps_existing_entries() {
        let custom = ChannelState {
            amplitude: 0.3,
            ..ChannelState::default()
        };
        let mut named = NamedChannels::new();
        named.insert("green".to_string(), custom);
        named.insert("alpha".to_string(), custom);

        ensure_default_channels(&mut named);

        assert_eq!(named.len(), 4);
        assert_eq!(named["green"], custom);
        assert_eq!(named["red"], ChannelKind::Red.default_state());
    }

    #[test]
    fn test_from_named_ignores_unknown_and_seeds_missing() {
        let custom = ChannelState {
            frequency: 0.25,
            ..ChannelState::default()
        };
        let mut named = NamedChannels::new();
        named.insert("blue".to_string(), custom);
        named.insert("alpha".to_string(), ChannelState::default());

        let channels = Channels::from_named(&named);

        assert_eq!(channels.blue, custom);
        assert_eq!(channels.red, ChannelKind::Red.default_state());
    }

    #[test]
    fn test_channels_iter_is_red_green_blue() {
        let kinds: Vec<ChannelKind> = Channels::default().iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![ChannelKind::Red, ChannelKind::Green, ChannelKind::Blue]);
    }
}
