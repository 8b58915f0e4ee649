pub mod datatype;
pub mod ir;
pub mod reader;
pub mod types;

pub use datatype::DataType;
pub use ir::{Direction, Import, Param, Procedure};
pub use reader::{OccdocReader, ReadError, ReadErrorKind, ReadOutput};
pub use types::{Diagnostic, SkipKind};
