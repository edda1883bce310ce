//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Rain ambience volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Play the looping rain ambience
    pub music_enabled: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Gameplay ===
    /// Pause when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            music_enabled: true,
            mute_on_blur: true,

            pause_on_blur: true,

            show_fps: false,
        }
    }
}

impl Settings {
    /// Effective one-shot effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        unit(self.master_volume) * unit(self.sfx_volume)
    }

    /// Effective ambience volume (0 when music is off)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            unit(self.master_volume) * unit(self.music_volume)
        } else {
            0.0
        }
    }

    /// Parse settings JSON, falling back to defaults on bad data
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "rain_catcher_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Clamp a stored volume to 0..=1, treating NaN as silence
fn unit(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
