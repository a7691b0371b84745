use std::f32::consts::TAU;

use egui::{Color32, Pos2, Rect, Stroke, Ui};

use crate::core::data::colour::Rgb;
use crate::core::data::complex::Complex;
use crate::core::palette::{ChannelKind, ChannelState, evaluate};
use crate::core::state::{AppState, AutoZoom};

const MAX_ITERATIONS_SLIDER: u32 = 500;
const STRIP_HEIGHT: f32 = 16.0;
const PLOT_HEIGHT: f32 = 80.0;

/// Read-only figures shown alongside the controls.
#[derive(Debug, Clone, Default)]
pub struct PanelStats {
    pub fps: f64,
    pub renderer: &'static str,
    pub last_error: Option<String>,
}

fn to_colour32(colour: Rgb) -> Color32 {
    let [r, g, b] = colour.to_rgb8();
    Color32::from_rgb(r, g, b)
}

pub fn draw_panels(ctx: &egui::Context, state: &mut AppState, stats: &PanelStats, time: f32) {
    egui::Window::new("Mandelbrot")
        .default_pos([10.0, 10.0])
        .default_width(280.0)
        .show(ctx, |ui| {
            view_section(ui, state);
            ui.separator();
            palette_section(ui, state, time);
            ui.separator();
            ui.label(format!("{:.1} fps ({})", stats.fps, stats.renderer));
            ui.label(format!(
                "Window: {}x{}",
                state.window().width(),
                state.window().height()
            ));
            if let Some(message) = &stats.last_error {
                ui.colored_label(Color32::LIGHT_RED, message);
            }
        });
}

fn view_section(ui: &mut Ui, state: &mut AppState) {
    let mut max_iterations = state.max_iterations();
    ui.horizontal(|ui| {
        ui.label("Iterations:");
        if ui
            .add(egui::Slider::new(&mut max_iterations, 1..=MAX_ITERATIONS_SLIDER))
            .changed()
        {
            if let Err(error) = state.set_max_iterations(max_iterations) {
                log::warn!("{}", error);
            }
        }
    });

    let mut center = state.camera().center();
    let mut zoom = state.camera().zoom();
    let step = 0.01 / zoom;

    let center_changed = ui
        .horizontal(|ui| {
            ui.label("Center:");
            let real = ui.add(egui::DragValue::new(&mut center.real).speed(step));
            let imag = ui.add(egui::DragValue::new(&mut center.imag).speed(step));
            real.changed() || imag.changed()
        })
        .inner;
    if center_changed {
        if let Err(error) = state.set_center(Complex::new(center.real, center.imag)) {
            log::warn!("{}", error);
        }
    }

    ui.horizontal(|ui| {
        ui.label("Zoom:");
        if ui
            .add(egui::DragValue::new(&mut zoom).speed(zoom * 0.01))
            .changed()
        {
            if let Err(error) = state.set_zoom(zoom) {
                log::warn!("{}", error);
            }
        }
    });

    ui.horizontal(|ui| {
        let mut zoom_in = state.auto_zoom() == AutoZoom::In;
        let mut zoom_out = state.auto_zoom() == AutoZoom::Out;
        if ui.checkbox(&mut zoom_in, "Auto zoom in").changed() {
            state.set_auto_zoom(if zoom_in { AutoZoom::In } else { AutoZoom::Off });
        }
        if ui.checkbox(&mut zoom_out, "Auto zoom out").changed() {
            state.set_auto_zoom(if zoom_out { AutoZoom::Out } else { AutoZoom::Off });
        }
    });

    ui.horizontal(|ui| {
        if ui.button("Reset view").clicked() {
            state.reset_view();
        }

        let mut use_ssaa = state.use_ssaa();
        if ui.checkbox(&mut use_ssaa, "SSAA").changed() {
            state.set_ssaa(use_ssaa);
        }

        let mut smooth = state.palette.smooth_filtering;
        if ui.checkbox(&mut smooth, "Smooth").changed() {
            state.palette.set_filtering(smooth);
        }
    });
}

/// Polyline of `channel` over buckets `[0, count)`, one point per column of `rect` at most.
///
/// Intensity 0 sits on the bottom edge and 1 on the top edge.
fn curve_points(channel: &ChannelState, count: usize, time: f32, rect: Rect) -> Vec<Pos2> {
    if count == 0 {
        return Vec::new();
    }

    let samples = count.min(rect.width().max(2.0) as usize).max(2);
    let last_bucket = count.saturating_sub(1) as f32;

    (0..samples)
        .map(|sample| {
            let t = sample as f32 / (samples - 1) as f32;
            let value = evaluate(channel, t * last_bucket, time).clamp(0.0, 1.0);
            Pos2::new(
                rect.left() + t * rect.width(),
                rect.bottom() - value * rect.height(),
            )
        })
        .collect()
}

fn channel_plot(ui: &mut Ui, state: &AppState, time: f32) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, PLOT_HEIGHT), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, Color32::from_gray(24));

    for (_, channel) in state.palette.channels.iter() {
        let points = curve_points(channel, state.palette_size(), time, rect);
        painter.add(egui::Shape::line(
            points,
            Stroke::new(1.5, to_colour32(channel.base_color)),
        ));
    }
}

fn palette_section(ui: &mut Ui, state: &mut AppState, time: f32) {
    let colours = state.palette.generate(state.palette_size(), time);

    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, STRIP_HEIGHT), egui::Sense::hover());
    let columns = rect.width().max(1.0) as usize;
    if !colours.is_empty() {
        let painter = ui.painter();
        for column in 0..columns {
            let index = column * colours.len() / columns;
            let left = rect.left() + column as f32;
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(left, rect.top()),
                    egui::pos2(left + 1.0, rect.bottom()),
                ),
                0.0,
                to_colour32(colours[index]),
            );
        }
    }

    channel_plot(ui, state, time);

    ui.horizontal(|ui| {
        ui.label("In set:");
        let swatch = colours.last().copied().unwrap_or(Rgb::BLACK);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(24.0, STRIP_HEIGHT), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, to_colour32(swatch));

        if ui.button("Invert").clicked() {
            state.palette.reverse();
        }
    });

    ui.horizontal(|ui| {
        let mut enabled = state.palette.override_enabled;
        let colour = state.palette.override_color;
        let mut rgb = [colour.r, colour.g, colour.b];

        let toggled = ui.checkbox(&mut enabled, "Override in-set colour").changed();
        let picked = ui.color_edit_button_rgb(&mut rgb).changed();
        if toggled || picked {
            state
                .palette
                .set_override(enabled, Rgb::new(rgb[0], rgb[1], rgb[2]));
        }
    });

    for &kind in ChannelKind::ALL {
        egui::CollapsingHeader::new(kind.name())
            .id_source(("channel", kind.name()))
            .show(ui, |ui| {
                let channel = state.palette.channel_mut(kind);
                ui.add(egui::Slider::new(&mut channel.amplitude, 0.0..=1.0).text("amplitude"));
                ui.add(egui::Slider::new(&mut channel.phase_offset, 0.0..=TAU).text("phase"));
                ui.add(
                    egui::Slider::new(&mut channel.frequency, 0.0..=3.0)
                        .logarithmic(true)
                        .text("frequency"),
                );
                ui.add(
                    egui::Slider::new(&mut channel.time_coefficient, -5.0..=5.0).text("time"),
                );
            });
    }
}
