use std::borrow::Cow;

use crate::core::data::colour::Rgb;
use crate::core::palette::palette::{PaletteFilter, PaletteState};

/// Device-side 1-D colour table the palette pass samples from.
pub trait PaletteLookup {
    /// Replaces the whole table. An empty slice leaves an empty lookup.
    fn upload(&mut self, colours: &[Rgb]);

    /// Sampler change only; colours are untouched.
    fn set_filter(&mut self, filter: PaletteFilter);
}

/// Texture coordinate in `[0, 1]` for escape-time `iterations` in a table of `len` entries.
///
/// Bucket 0 lands on the left edge and the last bucket on the right edge, so
/// nearest sampling returns exactly entry `iterations` and linear sampling
/// blends towards the next entry.
#[must_use]
pub fn lookup_coordinate(iterations: f32, len: usize) -> f32 {
    if len <= 1 {
        return 0.0;
    }

    (iterations / (len - 1) as f32).clamp(0.0, 1.0)
}

/// Shrinks `colours` to at most `max_width` evenly spaced entries, keeping
/// the first and last. Tables that already fit are borrowed unchanged.
#[must_use]
pub fn fit_to_width(colours: &[Rgb], max_width: usize) -> Cow<'_, [Rgb]> {
    let max_width = max_width.max(2);
    if colours.len() <= max_width {
        return Cow::Borrowed(colours);
    }

    let last = colours.len() - 1;
    Cow::Owned(
        (0..max_width)
            .map(|i| colours[i * last / (max_width - 1)])
            .collect(),
    )
}

/// Keeps a [`PaletteLookup`] in step with a [`PaletteState`].
///
/// Colours are regenerated when the entry count or any colour-affecting
/// parameter changes, and on every sync while a channel is animated.
#[derive(Debug)]
pub struct PaletteTexture<L: PaletteLookup> {
    lookup: L,
    colours: Vec<Rgb>,
    uploaded: Option<PaletteSnapshot>,
    filter: Option<PaletteFilter>,
}

#[derive(Debug, Clone, PartialEq)]
struct PaletteSnapshot {
    size: usize,
    state: PaletteState,
}

impl<L: PaletteLookup> PaletteTexture<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            colours: Vec::new(),
            uploaded: None,
            filter: None,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Colours most recently uploaded.
    pub fn colours(&self) -> &[Rgb] {
        &self.colours
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Forces regeneration on the next [`sync`](Self::sync).
    pub fn invalidate(&mut self) {
        self.uploaded = None;
    }

    /// Brings the lookup up to date. Returns `true` when colours were regenerated.
    pub fn sync(&mut self, state: &PaletteState, size: usize, time: f32) -> bool {
        let filter = state.filter();
        if self.filter != Some(filter) {
            self.lookup.set_filter(filter);
            self.filter = Some(filter);
        }

        // Filtering never affects the colours themselves.
        let snapshot = PaletteSnapshot {
            size,
            state: PaletteState {
                smooth_filtering: false,
                ..state.clone()
            },
        };

        let stale = self.uploaded.as_ref() != Some(&snapshot);
        if !stale && !state.is_animated() {
            return false;
        }

        self.colours = state.generate(size, time);
        self.lookup.upload(&self.colours);
        self.uploaded = Some(snapshot);

        log::debug!("palette regenerated with {} colours", size);
        true
    }
}
