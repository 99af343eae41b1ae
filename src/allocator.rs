//! Global allocator.
//!
//! The binary runs on mimalloc. The library crate leaves the allocator to
//! its embedder.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
