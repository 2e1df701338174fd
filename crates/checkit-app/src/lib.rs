// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dispatch;
pub mod error;
pub mod ids;
pub mod memory;
pub mod model;
pub mod ops;
pub mod state;
pub mod store;
pub mod view;

pub use dispatch::*;
pub use error::*;
pub use ids::*;
pub use memory::MemoryStore;
pub use model::*;
pub use state::*;
pub use store::*;
pub use view::*;
