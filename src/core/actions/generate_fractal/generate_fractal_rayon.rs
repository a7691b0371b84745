use rayon::prelude::*;

use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::point::Point;
use crate::core::data::size::Size;

/// Evaluates `algorithm` for every pixel with one rayon task per row.
///
/// The result is row-major, so index `y * width + x` holds pixel `(x, y)`.
/// The first failing pixel in row order is returned as the error.
pub fn generate_fractal_rayon<Alg>(
    size: Size,
    algorithm: &Alg,
) -> Result<Vec<Alg::Success>, Alg::Failure>
where
    Alg: FractalAlgorithm + Sync,
    Alg::Success: Send,
    Alg::Failure: Send,
{
    let width = size.width();

    let rows = (0..size.height())
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| algorithm.compute(Point { x, y }))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().flatten().collect())
}
