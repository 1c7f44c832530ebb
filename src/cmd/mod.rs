pub mod catalog;
pub mod compare;
pub mod metrics;
pub mod show;
