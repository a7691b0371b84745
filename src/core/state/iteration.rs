use thiserror::Error;

pub const DEFAULT_MAX_ITERATIONS: u32 = 150;

/// Largest accepted cap. The palette then has 8192 entries, the default
/// wgpu limit for 1-D texture width.
pub const MAX_ITERATIONS_LIMIT: u32 = 8191;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum IterationError {
    #[error("maximum iterations must be greater than zero")]
    ZeroMaxIterations,
    #[error("maximum iterations {requested} exceeds the limit of {limit}")]
    TooManyIterations { requested: u32, limit: u32 },
}

/// Iteration cap plus the flag telling the renderer the fractal buffer is stale.
///
/// Starts dirty so the first frame always computes the fractal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IterationParameters {
    max_iterations: u32,
    dirty: bool,
}

impl Default for IterationParameters {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            dirty: true,
        }
    }
}

impl IterationParameters {
    pub fn new(max_iterations: u32) -> Result<Self, IterationError> {
        let mut params = Self::default();
        params.set_max_iterations(max_iterations)?;
        Ok(params)
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Number of palette entries: one per escape count plus the never-escaped bucket.
    #[must_use]
    pub fn palette_size(&self) -> usize {
        self.max_iterations as usize + 1
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<(), IterationError> {
        if max_iterations == 0 {
            return Err(IterationError::ZeroMaxIterations);
        }
        if max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(IterationError::TooManyIterations {
                requested: max_iterations,
                limit: MAX_ITERATIONS_LIMIT,
            });
        }

        if max_iterations != self.max_iterations {
            self.max_iterations = max_iterations;
            self.dirty = true;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dirty_with_documented_cap() {
        let params = IterationParameters::default();

        assert_eq!(params.max_iterations(), 150);
        assert_eq!(params.palette_size(), 151);
        assert!(params.is_dirty());
    }

    #[test]
    fn test_zero_max_iterations_is_rejected() {
        assert_eq!(
            IterationParameters::new(0),
            Err(IterationError::ZeroMaxIterations)
        );

        let mut params = IterationParameters::default();
        params.clear_dirty();
        assert_eq!(
            params.set_max_iterations(0),
            Err(IterationError::ZeroMaxIterations)
        );
        assert_eq!(params.max_iterations(), 150);
        assert!(!params.is_dirty());
    }

    #[test]
    fn test_cap_above_limit_is_rejected() {
        let mut params = IterationParameters::default();
        params.clear_dirty();

        assert_eq!(
            params.set_max_iterations(u32::MAX),
            Err(IterationError::TooManyIterations {
                requested: u32::MAX,
                limit: MAX_ITERATIONS_LIMIT,
            })
        );
        assert_eq!(params.max_iterations(), 150);
        assert!(!params.is_dirty());

        params.set_max_iterations(MAX_ITERATIONS_LIMIT).unwrap();
        assert_eq!(params.palette_size(), 8192);
    }

    #[test]
    fn test_changing_max_iterations_marks_dirty() {
        let mut params = IterationParameters::default();
        params.clear_dirty();

        params.set_max_iterations(300).unwrap();

        assert_eq!(params.max_iterations(), 300);
        assert!(params.is_dirty());
    }

    #[test]
    fn test_writing_same_value_stays_clean() {
        let mut params = IterationParameters::default();
        params.clear_dirty();

        params.set_max_iterations(150).unwrap();

        assert!(!params.is_dirty());
    }
}
