pub mod blob;
pub mod draft;

pub use blob::*;
pub use draft::*;
