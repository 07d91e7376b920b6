pub mod common;
pub mod frontend;
pub mod ir;
pub mod pretty;
pub mod report;
mod utility;
