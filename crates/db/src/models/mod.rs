pub mod block_translation;
pub mod content_block;
pub mod page_layout;
pub mod page_version;
