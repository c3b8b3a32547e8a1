//! TUI widgets for binaural
//!
//! Each widget is a free `render_*` function over plain data; the app owns
//! all state and decides the layout.

pub mod dials;
pub mod presets;
pub mod scope;
pub mod spectrum;
pub mod transport;
