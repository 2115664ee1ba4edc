//! The camera controller: pure motion logic, and the [`component::GlideCam`] that hosts it.

pub mod component;
pub mod error;
pub mod focus;
pub mod mode;
pub mod orbit;
pub mod session;
pub mod settings;
pub mod smoothing;
pub mod zoom;
