//! Repository layer: one zero-sized struct per table.

pub mod block_translation_repo;
pub mod content_block_repo;
pub mod page_layout_repo;
pub mod page_version_repo;

pub use block_translation_repo::BlockTranslationRepo;
pub use content_block_repo::ContentBlockRepo;
pub use page_layout_repo::PageLayoutRepo;
pub use page_version_repo::PageVersionRepo;
