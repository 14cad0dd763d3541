mod convert;
mod oid;
mod val;

pub use oid::{ObjectId, ParseObjectIdError};
pub use val::Value;
