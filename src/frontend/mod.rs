pub mod context;
pub mod conversion;
pub mod elaborate;
pub mod evaluate;
pub mod fresh;
pub mod message;
pub mod parse;
pub mod session;
pub mod unevaluate;
