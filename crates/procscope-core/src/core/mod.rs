mod address;
mod handle;
pub(crate) mod macros;

pub use self::{
    address::Va,
    handle::{Handle, ProcessId},
};
