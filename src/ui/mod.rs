pub mod dashboard;
pub(crate) mod events;
pub mod input;
pub mod render;
pub mod snapshot;
pub(crate) mod spinner;
pub(crate) mod terminal;
pub mod theme;
