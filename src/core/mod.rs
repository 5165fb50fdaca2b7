pub mod dataset;
pub mod imaging;
pub mod operations;
pub mod split;

pub use dataset::*;
pub use imaging::*;
pub use operations::*;
pub use split::*;
