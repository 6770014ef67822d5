pub mod frame;
pub mod upload;
