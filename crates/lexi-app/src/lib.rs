// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod model;
pub mod panel;
pub mod ports;
pub mod state;

pub use model::*;
pub use panel::*;
pub use ports::*;
pub use state::*;
