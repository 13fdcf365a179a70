pub mod conversion;
pub mod definition;
pub mod raw;
pub mod reader;
pub mod validate;

pub use conversion::*;
pub use definition::*;
pub use raw::{RawEdge, RawForm, RawNode, RawSchema};
pub use reader::*;
pub use validate::*;
