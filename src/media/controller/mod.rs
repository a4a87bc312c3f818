pub mod common;
pub mod generic;
pub mod windows;

pub use generic::UnsupportedController;
pub use windows::PowerShellController;
