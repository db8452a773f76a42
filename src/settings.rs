//! Visualization settings and preferences
//!
//! Persisted in LocalStorage on the web and as a JSON file natively.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Points sampled along the ECG trace
    pub fn waveform_samples(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 300,
            QualityPreset::High => 600,
        }
    }

    /// Floating dust points in the background
    pub fn background_dust(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 30,
            QualityPreset::High => 30,
        }
    }

    /// Segments used to tessellate round particles and glows
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 16,
            QualityPreset::High => 32,
        }
    }

    /// Whether the ECG line and particles get a soft glow pass
    pub fn glow_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Visualization settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Glow around the ECG line and particles
    pub glow: bool,
    /// Background flash on each beat
    pub beat_flash: bool,

    // === HUD ===
    /// Show the vital-sign and metric cards
    pub show_metrics: bool,

    // === Simulation ===
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === Accessibility ===
    /// Reduced motion (no pulsing origin marker, no beat flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            glow: true,
            beat_flash: true,
            show_metrics: true,
            seed: None,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset disables some effects for performance
        if preset == QualityPreset::Low {
            self.glow = false;
        }
    }

    /// Effective glow (respects the preset)
    pub fn effective_glow(&self) -> bool {
        self.glow && self.quality.glow_enabled()
    }

    /// Effective beat flash (respects reduced_motion)
    pub fn effective_beat_flash(&self) -> bool {
        self.beat_flash && !self.reduced_motion
    }

    /// Whether the origin marker scales with the pulse
    pub fn pulse_motion(&self) -> bool {
        !self.reduced_motion
    }

    /// Seed to start from, falling back to `fallback` (usually the clock)
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Flip metrics visibility, returning the new value
    pub fn toggle_metrics(&mut self) -> bool {
        self.show_metrics = !self.show_metrics;
        self.show_metrics
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "heartbeat_flow_settings";

    /// Settings file looked up in the working directory (native only)
    pub const FILE_NAME: &'static str = "heartbeat_flow_settings.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
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
            match self.to_json() {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Could not save settings: {:?}", e),
                },
                Err(e) => log::warn!("Could not serialize settings: {}", e),
            }
        }
    }

    /// Load settings from `FILE_NAME`, defaulting when absent or invalid
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::FILE_NAME))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to `FILE_NAME`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        if let Err(e) = self.save_to(std::path::Path::new(Self::FILE_NAME)) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_medium_matches_classic_sampling() {
        assert_eq!(
            Settings::default().quality.waveform_samples(),
            crate::consts::DEFAULT_WAVEFORM_SAMPLES
        );
    }

    #[test]
    fn test_low_preset_disables_glow() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert!(!settings.glow);
        assert!(!settings.effective_glow());
        assert_eq!(settings.quality.background_dust(), 0);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_beat_flash());
        assert!(!settings.pulse_motion());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"quality":"High","seed":42}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.seed_or(7), 42);
        assert!(settings.show_metrics);
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_toggle_metrics() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_metrics());
        assert!(settings.toggle_metrics());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "heartbeat_flow_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            quality: QualityPreset::High,
            seed: Some(99),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);

        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        let _ = std::fs::remove_file(&path);

        assert_eq!(Settings::load_from(&path), Settings::default());
    }
}
