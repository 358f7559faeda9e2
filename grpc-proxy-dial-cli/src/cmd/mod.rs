pub mod hello;
pub mod resolve;
pub mod serve;
