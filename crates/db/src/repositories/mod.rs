//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod annotation_repo;
pub mod connection_repo;
pub mod document_repo;
pub mod page_repo;
pub mod symbol_repo;

pub use annotation_repo::AnnotationRepo;
pub use connection_repo::ConnectionRepo;
pub use document_repo::DocumentRepo;
pub use page_repo::PageRepo;
pub use symbol_repo::SymbolRepo;
