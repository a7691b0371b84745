use mandelbrot_viewer::{
    AppState, ChannelKind, Complex, CpuBackend, FrameBuffer, MAX_ITERATIONS_LIMIT, PixelBuffer,
    RenderPipeline, Rgb, ScreenPoint, Size, load_state,
};

fn size(width: u32, height: u32) -> Size {
    Size::new(width, height).unwrap()
}

/// Odd-sized window without supersampling, so the middle pixel sits exactly on the camera centre.
fn centred_state(center: Complex, zoom: f64) -> AppState {
    let mut state = AppState::new(size(5, 5));
    state.set_ssaa(false);
    state.set_center(center).unwrap();
    state.set_zoom(zoom).unwrap();
    state
}

fn centre_count(pipeline: &RenderPipeline<CpuBackend>) -> f32 {
    let iterations = pipeline.fractal_buffer().iterations().unwrap();
    iterations[2 * 5 + 2]
}

#[test]
fn test_point_inside_set_reaches_iteration_cap_and_last_palette_entry() {
    let mut state = centred_state(Complex::new(-0.65, 0.0), 0.5);
    state.set_max_iterations(150).unwrap();
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());

    pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    assert_eq!(centre_count(&pipeline), 150.0);
    let expected = state.palette.generate(151, 0.0)[150].to_rgb8();
    assert_eq!(surface.pixel(2, 2).unwrap(), expected);
}

#[test]
fn test_override_colour_paints_points_inside_set() {
    let mut state = centred_state(Complex::new(-0.65, 0.0), 0.5);
    state.palette.set_override(true, Rgb::new(0.0, 1.0, 1.0));
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());

    pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    assert_eq!(surface.pixel(2, 2).unwrap(), [0, 255, 255]);
}

#[test]
fn test_point_far_outside_set_escapes_on_first_iteration() {
    let mut state = centred_state(Complex::new(2.0, 2.0), 0.1);
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());

    pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    assert_eq!(centre_count(&pipeline), 1.0);
    assert_ne!(centre_count(&pipeline), state.max_iterations() as f32);
}

#[test]
fn test_resize_reallocates_both_buffers_and_marks_dirty() {
    let mut state = AppState::new(size(800, 600));
    state.set_ssaa(false);
    state.set_center(Complex::new(2.0, 2.0)).unwrap();
    state.set_zoom(1_000.0).unwrap();
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());
    pipeline.render(&mut state, &mut surface, 0.0).unwrap();
    assert!(!state.is_dirty());

    state.resize(size(1600, 1200));
    assert!(state.is_dirty());
    let mut surface = PixelBuffer::new(state.window());
    let report = pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    assert!(report.fractal_pass);
    assert_eq!(pipeline.fractal_buffer().size(), size(1600, 1200));
    assert_eq!(pipeline.colour_buffer().size(), size(1600, 1200));
    assert!(pipeline.colour_buffer().has_depth_stencil());
    assert!(!state.is_dirty());
}

#[test]
fn test_clean_frame_skips_fractal_pass_and_keeps_counts() {
    let mut state = centred_state(Complex::new(-0.5, 0.25), 0.8);
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());

    let first = pipeline.render(&mut state, &mut surface, 0.0).unwrap();
    let counts = pipeline.fractal_buffer().iterations().unwrap().to_vec();
    let second = pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    assert!(first.fractal_pass);
    assert!(!second.fractal_pass);
    assert_eq!(pipeline.fractal_passes(), 1);
    assert_eq!(pipeline.frames(), 2);
    assert_eq!(pipeline.fractal_buffer().iterations().unwrap(), &counts[..]);
}

#[test]
fn test_palette_edit_recolours_without_fractal_pass() {
    let mut state = centred_state(Complex::new(-0.65, 0.0), 0.5);
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());
    pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    state.palette.set_override(true, Rgb::new(1.0, 0.0, 1.0));
    let report = pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    assert!(!report.fractal_pass);
    assert!(report.palette_regenerated);
    assert_eq!(surface.pixel(2, 2).unwrap(), [255, 0, 255]);
}

#[test]
fn test_anchored_zoom_then_render_keeps_cursor_point() {
    let mut state = AppState::new(size(64, 48));
    let cursor = ScreenPoint::new(40.5, 12.5);
    let before = state.camera().screen_to_complex(cursor, state.window());

    state.zoom_at_cursor(cursor, 3.0);
    let after = state.camera().screen_to_complex(cursor, state.window());

    assert!((before.real - after.real).abs() < 1e-12);
    assert!((before.imag - after.imag).abs() < 1e-12);
    assert!(state.is_dirty());
}

#[test]
fn test_export_renders_at_requested_size_without_touching_live_frame() {
    let mut state = AppState::new(size(40, 30));
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());
    pipeline.render(&mut state, &mut surface, 0.0).unwrap();
    state.set_center(Complex::new(-1.0, 0.0)).unwrap();

    let image = pipeline.export(&state, size(12, 9), 0.0).unwrap();

    assert_eq!(image.size(), size(12, 9));
    assert!(state.is_dirty());
    assert_eq!(pipeline.fractal_buffer().size(), size(80, 60));
    assert_eq!(pipeline.fractal_passes(), 1);
}

#[test]
fn test_session_with_oversized_cap_and_partial_channel_renders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        r#"{
            "window": { "width": 5, "height": 5 },
            "camera": { "center_x": -0.65, "center_y": 0.0, "zoom": 0.5 },
            "use_ssaa": false,
            "max_iterations": 4294967295,
            "palette": { "channels": { "red": { "amplitude": 0.5 } } }
        }"#,
    )
    .unwrap();

    let mut state = load_state(&path);
    let mut pipeline = RenderPipeline::new(CpuBackend::default(), &state).unwrap();
    let mut surface = PixelBuffer::new(state.window());
    pipeline.render(&mut state, &mut surface, 0.0).unwrap();

    assert_eq!(state.max_iterations(), MAX_ITERATIONS_LIMIT);
    assert_eq!(pipeline.palette().len(), 8192);
    assert_eq!(centre_count(&pipeline), MAX_ITERATIONS_LIMIT as f32);
    let red = state.palette.channel(ChannelKind::Red);
    assert_eq!(red.amplitude, 0.5);
    assert_eq!(red.frequency, 0.013);
    assert_eq!(red.base_color, Rgb::RED);
}
