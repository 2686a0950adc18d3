//! Figure rendering for snow depth animation frames.
//!
//! Each frame has two panels:
//! - Map view: snow thickness through a colormap, with colorbar, axes and
//!   the study site marker
//! - Surface view: smoothed terrain drawn in 3D, coloured by snow thickness
//!   and shaded by a fixed light source
//!
//! Frames are encoded as JPEG.

pub mod axes;
pub mod canvas;
pub mod error;
pub mod figure;
pub mod font;
pub mod gradient;
pub mod jpeg;
pub mod map;
pub mod style;
pub mod surface;

pub use canvas::{Align, Canvas, PixelRect};
pub use error::{RenderError, RenderResult};
pub use figure::{Figure, FigureStyle, FrameData, Layout, Metrics};
pub use font::TextRenderer;
pub use gradient::{Color, Colormap, Normalize};
pub use jpeg::{encode_jpeg, write_jpeg, DEFAULT_JPEG_QUALITY};
pub use style::ColorStop;
pub use surface::{LightSource, SurfaceStats, View};
