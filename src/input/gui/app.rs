pub mod frame_stats;
pub mod gui_app;
pub mod panels;
pub mod ports;
pub mod viewer_input;
