//! Drawing surfaces and frame buffers.
//!
//! [`surface::DrawSurface`] is the canvas-like seam the compositor draws through. The
//! [`cpu::CpuSurface`] rasterizes for real; [`recording::RecordingSurface`] only records calls.

/// Premultiplied source-over compositing.
pub mod composite;
/// CPU raster surface backed by `vello_cpu` and `parley`.
pub mod cpu;
/// Frame buffers and PNG export.
pub mod frame;
/// Surface that records draw calls instead of rasterizing.
pub mod recording;
/// The drawing surface trait and its state stack.
pub mod surface;
