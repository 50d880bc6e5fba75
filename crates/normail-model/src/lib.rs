pub mod address;
pub mod error;

pub use address::{Address, SEPARATOR};
pub use error::AddressError;
