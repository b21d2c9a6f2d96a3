//! Session persistence for copied variations

mod state;

pub use state::SessionState;
