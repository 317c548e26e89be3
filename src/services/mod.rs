pub mod bootstrap;
pub mod catalog;
