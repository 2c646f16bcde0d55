#![allow(dead_code, unused_imports)]

pub mod app;
pub mod factory;

pub use app::{test_config, TestApp};
pub use factory::{Factory, TestAuth};
