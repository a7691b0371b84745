use rayon::prelude::*;

use crate::adapters::cpu::frame_buffer::CpuFrameBuffer;
use crate::adapters::cpu::lookup::CpuPaletteLookup;
use crate::core::actions::generate_fractal::generate_fractal_rayon::generate_fractal_rayon;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::size::Size;
use crate::core::fractals::mandelbrot::MandelbrotAlgorithm;
use crate::core::palette::texture::lookup_coordinate;
use crate::pipeline::errors::RenderError;
use crate::pipeline::ports::backend::{PassTarget, RenderBackend};
use crate::pipeline::ports::frame_buffer::{FrameBuffer, FrameBufferDescriptor, PixelFormat};
use crate::pipeline::uniforms::{FractalUniforms, PaletteUniforms};

/// Largest side accepted for a frame buffer, matching common GPU texture limits.
pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

/// Software reference renderer. Passes run on the rayon pool.
#[derive(Debug, Clone)]
pub struct CpuBackend {
    max_dimension: u32,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIMENSION)
    }
}

impl CpuBackend {
    #[must_use]
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    #[must_use]
    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }
}

fn expect_format(
    pass: &'static str,
    frame_buffer: &CpuFrameBuffer,
    expected: PixelFormat,
) -> Result<(), RenderError> {
    if frame_buffer.format() != expected {
        return Err(RenderError::FormatMismatch {
            pass,
            expected,
            actual: frame_buffer.format(),
        });
    }
    if !frame_buffer.is_complete() {
        return Err(RenderError::IncompleteFrameBuffer {
            label: frame_buffer.label(),
        });
    }
    Ok(())
}

fn expect_size(pass: &'static str, expected: Size, actual: Size) -> Result<(), RenderError> {
    if expected != actual {
        return Err(RenderError::SizeMismatch {
            pass,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Source span `[start, end)` covered by destination index `index` when
/// `source_len` texels shrink (or stretch) to `target_len`.
fn footprint(index: usize, source_len: usize, target_len: usize) -> (usize, usize) {
    let start = index * source_len / target_len;
    let end = ((index + 1) * source_len / target_len).max(start + 1);
    (start, end.min(source_len))
}

/// Box-filters `source` into `target`. Equal sizes copy.
fn downsample(source: &PixelBuffer, target: &mut PixelBuffer) {
    let source_width = source.size().width() as usize;
    let source_height = source.size().height() as usize;
    let target_width = target.size().width() as usize;
    let target_height = target.size().height() as usize;

    if source.size() == target.size() {
        target.buffer_mut().copy_from_slice(source.buffer());
        return;
    }

    let source_data = source.buffer();
    target
        .buffer_mut()
        .par_chunks_mut(target_width * 3)
        .enumerate()
        .for_each(|(y, row)| {
            let (y0, y1) = footprint(y, source_height, target_height);

            for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                let (x0, x1) = footprint(x, source_width, target_width);
                let mut sum = [0u32; 3];

                for sy in y0..y1 {
                    for sx in x0..x1 {
                        let index = (sy * source_width + sx) * 3;
                        for channel in 0..3 {
                            sum[channel] += u32::from(source_data[index + channel]);
                        }
                    }
                }

                let count = ((y1 - y0) * (x1 - x0)) as u32;
                for channel in 0..3 {
                    pixel[channel] = ((sum[channel] + count / 2) / count) as u8;
                }
            }
        });
}

impl RenderBackend for CpuBackend {
    type FrameBuffer = CpuFrameBuffer;
    type PaletteLookup = CpuPaletteLookup;
    type Surface<'a> = &'a mut PixelBuffer;

    fn create_frame_buffer(
        &mut self,
        descriptor: &FrameBufferDescriptor,
    ) -> Result<CpuFrameBuffer, RenderError> {
        Ok(CpuFrameBuffer::allocate(descriptor, self.max_dimension))
    }

    fn resize_frame_buffer(
        &mut self,
        frame_buffer: &mut CpuFrameBuffer,
        size: Size,
    ) -> Result<(), RenderError> {
        frame_buffer.reallocate(size, self.max_dimension);
        Ok(())
    }

    fn create_palette_lookup(&mut self) -> Result<CpuPaletteLookup, RenderError> {
        Ok(CpuPaletteLookup::default())
    }

    fn fractal_pass(
        &mut self,
        target: &mut CpuFrameBuffer,
        uniforms: &FractalUniforms,
    ) -> Result<(), RenderError> {
        expect_format("fractal", target, PixelFormat::R32Float)?;
        expect_size("fractal", target.size(), uniforms.resolution)?;

        let algorithm = MandelbrotAlgorithm::new(
            uniforms.resolution,
            uniforms.center,
            uniforms.zoom,
            uniforms.max_iterations,
        )?;
        let counts = generate_fractal_rayon(uniforms.resolution, &algorithm)?;

        if let Some(iterations) = target.iterations_mut() {
            for (value, count) in iterations.iter_mut().zip(counts) {
                *value = count as f32;
            }
        }
        Ok(())
    }

    fn palette_pass(
        &mut self,
        iterations: &CpuFrameBuffer,
        lookup: &CpuPaletteLookup,
        target: &mut CpuFrameBuffer,
        uniforms: &PaletteUniforms,
    ) -> Result<(), RenderError> {
        expect_format("palette", iterations, PixelFormat::R32Float)?;
        expect_format("palette", target, PixelFormat::Rgb8)?;
        expect_size("palette", iterations.size(), target.size())?;

        let palette_size = uniforms.palette_size as usize;
        let (Some(counts), Some(colours)) = (iterations.iterations(), target.colours_mut()) else {
            return Ok(());
        };

        colours
            .buffer_mut()
            .par_chunks_mut(3)
            .zip(counts.par_iter())
            .for_each(|(pixel, &count)| {
                let colour = lookup.sample(lookup_coordinate(count, palette_size));
                pixel.copy_from_slice(&colour.to_rgb8());
            });
        Ok(())
    }

    fn downsample_pass<'a>(
        &mut self,
        source: &CpuFrameBuffer,
        target: PassTarget<'a, Self>,
    ) -> Result<(), RenderError>
    where
        Self: 'a,
    {
        expect_format("downsample", source, PixelFormat::Rgb8)?;
        let Some(source) = source.colours() else {
            return Ok(());
        };

        match target {
            PassTarget::Surface(surface) => downsample(source, surface),
            PassTarget::FrameBuffer(frame_buffer) => {
                expect_format("downsample", frame_buffer, PixelFormat::Rgb8)?;
                if let Some(colours) = frame_buffer.colours_mut() {
                    downsample(source, colours);
                }
            }
        }
        Ok(())
    }

    fn read_pixels(&mut self, frame_buffer: &CpuFrameBuffer) -> Result<PixelBuffer, RenderError> {
        expect_format("read", frame_buffer, PixelFormat::Rgb8)?;

        frame_buffer
            .colours()
            .cloned()
            .ok_or(RenderError::IncompleteFrameBuffer {
                label: frame_buffer.label(),
            })
    }
}
