pub mod form;
pub mod quantize;
pub mod render;

pub use form::{ChartForm, ChartUpload};
pub use quantize::{handle_quantize, __path_handle_quantize};
pub use render::{handle_render, __path_handle_render};
