// ABOUTME: Library module for the slide-site program.
// ABOUTME: Contains section-aware slide navigation, deck generation and the static site builder.

// Reexport modules
pub mod config;
pub mod deck;
pub mod errors;
pub mod resources;
pub mod site;
pub mod slides;
pub mod utils;

// Reexport common types and functions
pub use config::Config;
pub use deck::{generate_deck_html, parse_deck, render_deck, scan_deck_html, Deck, DeckPosition};
pub use errors::{Result, SiteError};
pub use resources::{ResourceFile, ResourceKind};
pub use site::{BuildReport, SiteBuilder, Staticrypt};
pub use slides::{HeaderSync, Navigator, SlideIndex};

#[cfg(test)]
mod tests;
