pub mod blocks;
pub mod page_builder;
pub mod pages;
pub mod public;
pub mod versions;
