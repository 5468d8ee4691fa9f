pub mod conversion;
pub mod criteria;
pub mod definition;
pub mod editor;

pub use conversion::*;
pub use criteria::*;
pub use definition::*;
pub use editor::*;
