#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod feedback;
pub mod model;
pub mod settings;
pub mod similarity;
pub mod time;

pub use time::Clock;
