mod settings;

pub use settings::{ConvertSettings, ResizeSettings, Settings};
