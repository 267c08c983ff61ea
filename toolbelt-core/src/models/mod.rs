pub mod toolkit;
pub mod tools;
