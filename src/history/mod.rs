// src/history/mod.rs

pub mod store;
pub mod view;

pub use store::{BlobHistory, BlobStore, FileBlobStore, MemoryBlobStore, TestHistory};
