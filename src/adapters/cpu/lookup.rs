use crate::core::data::colour::Rgb;
use crate::core::palette::palette::PaletteFilter;
use crate::core::palette::texture::PaletteLookup;

/// Host-memory palette table sampled the way a clamped 1-D texture is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuPaletteLookup {
    colours: Vec<Rgb>,
    filter: PaletteFilter,
}

impl CpuPaletteLookup {
    #[must_use]
    pub fn colours(&self) -> &[Rgb] {
        &self.colours
    }

    #[must_use]
    pub fn filter(&self) -> PaletteFilter {
        self.filter
    }

    /// Samples at texture coordinate `u` in `[0, 1]`. An empty table samples black.
    #[must_use]
    pub fn sample(&self, u: f32) -> Rgb {
        let len = self.colours.len();
        if len == 0 {
            return Rgb::BLACK;
        }

        let last = len - 1;
        let texel = u.clamp(0.0, 1.0) * len as f32;

        match self.filter {
            PaletteFilter::Nearest => self.colours[(texel as usize).min(last)],
            PaletteFilter::Linear => {
                let position = texel - 0.5;
                let base = position.floor();
                let fraction = position - base;
                let i0 = (base.max(0.0) as usize).min(last);
                let i1 = ((base + 1.0).max(0.0) as usize).min(last);
                self.colours[i0].lerp(self.colours[i1], fraction)
            }
        }
    }
}

impl PaletteLookup for CpuPaletteLookup {
    fn upload(&mut self, colours: &[Rgb]) {
        self.colours.clear();
        self.colours.extend_from_slice(colours);
    }

    fn set_filter(&mut self, filter: PaletteFilter) {
        self.filter = filter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::palette::texture::lookup_coordinate;

    fn lookup(colours: &[Rgb], filter: PaletteFilter) -> CpuPaletteLookup {
        let mut lookup = CpuPaletteLookup::default();
        lookup.upload(colours);
        lookup.set_filter(filter);
        lookup
    }

    #[test]
    fn test_empty_lookup_samples_black() {
        assert_eq!(CpuPaletteLookup::default().sample(0.5), Rgb::BLACK);
    }

    #[test]
    fn test_nearest_returns_exact_entry_for_each_count() {
        let colours: Vec<Rgb> = (0..5).map(|i| Rgb::new(i as f32 / 4.0, 0.0, 0.0)).collect();
        let lookup = lookup(&colours, PaletteFilter::Nearest);

        for (i, colour) in colours.iter().enumerate() {
            assert_eq!(lookup.sample(lookup_coordinate(i as f32, 5)), *colour);
        }
    }

    #[test]
    fn test_linear_blends_neighbours_and_clamps_edges() {
        let lookup = lookup(&[Rgb::BLACK, Rgb::new(1.0, 1.0, 1.0)], PaletteFilter::Linear);

        assert_eq!(lookup.sample(0.0), Rgb::BLACK);
        assert_eq!(lookup.sample(1.0), Rgb::new(1.0, 1.0, 1.0));
        assert_eq!(lookup.sample(0.5), Rgb::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_upload_replaces_table() {
        let mut lookup = lookup(&[Rgb::RED, Rgb::GREEN], PaletteFilter::Nearest);

        lookup.upload(&[Rgb::BLUE]);

        assert_eq!(lookup.colours(), &[Rgb::BLUE]);
        assert_eq!(lookup.sample(0.7), Rgb::BLUE);
    }
}
