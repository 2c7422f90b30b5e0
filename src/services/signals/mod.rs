//! Trading signals service module.
//!
//! Provides technical indicator calculations, the technicals plus
//! sentiment scoring engine, and the store that ties them to live data.

pub mod engine;
pub mod indicators;
pub mod store;
pub mod technicals;

pub use engine::{generate_quick_signal, generate_signal};
pub use indicators::MacdSignalMode;
pub use store::{SignalSettings, SignalSources, SignalStore};
pub use technicals::{calculate_technicals, calculate_technicals_with};
