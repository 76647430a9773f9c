//! Vinted Tauri Integration
//!
//! Provides Tauri plugin for frontend integration with the Vinted search client.
//!
//! # Usage
//!
//! Register the plugin in your Tauri application:
//!
//! ```ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(vinted_tauri::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Then invoke commands from the frontend:
//!
//! ```javascript
//! import { invoke } from '@tauri-apps/api/core';
//!
//! // Search with the filters of a catalog page
//! const results = await invoke('plugin:vinted|search_items', {
//!   url: 'https://www.vinted.fr/catalog?catalog[]=5&search_text=shoes',
//!   customParams: { per_page: '96' }
//! });
//!
//! // Inspect the translated querystring
//! const parsed = await invoke('plugin:vinted|parse_url', { url: '...' });
//! ```

use std::sync::Arc;

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};
use vinted_core::VintedScraper;

mod commands;

pub use commands::CustomParams;

/// Shared VintedScraper for all commands
///
/// The scraper only needs `&self`, so commands share it through an `Arc`
/// and reuse one session cookie cache.
pub struct ScraperState {
    pub(crate) scraper: Arc<VintedScraper>,
}

impl ScraperState {
    /// Create a new ScraperState with default configuration
    ///
    /// # Errors
    /// Returns error string if scraper initialization fails
    pub fn new() -> Result<Self, String> {
        let scraper = VintedScraper::new().map_err(|e| e.to_string())?;
        Ok(Self {
            scraper: Arc::new(scraper),
        })
    }
}

/// Initialize the vinted plugin
///
/// # Example
/// ```ignore
/// tauri::Builder::default()
///     .plugin(vinted_tauri::init())
///     .run(tauri::generate_context!())
///     .expect("error while running tauri application");
/// ```
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("vinted")
        .invoke_handler(tauri::generate_handler![
            commands::search_items,
            commands::parse_url
        ])
        .setup(|app, _api| {
            let state = ScraperState::new().map_err(Box::<dyn std::error::Error>::from)?;
            app.manage(state);
            Ok(())
        })
        .build()
}

// Re-export types for convenience
pub use vinted_core::{ParamValue, ParsedUrl};
