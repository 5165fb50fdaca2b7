mod codec;
mod convert;
mod resize;

pub use codec::{FileFailure, ImageFileError, JPEG_QUALITY};
pub use convert::{convert_directory, ConvertOptions, ConvertStats};
pub use resize::{resize_directory, ResizeOptions, ResizeStats};
