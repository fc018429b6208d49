//! Player preferences and adaptive render quality
//!
//! Settings are plain serde data; where they are stored is up to the host.

use serde::{Deserialize, Serialize};

/// Seconds of frames averaged per quality decision
const SAMPLE_WINDOW: f32 = 1.5;
/// Headroom above the target before stepping up a tier
const STEP_UP_MARGIN: f32 = 12.0;
const STEP_DOWN_COOLDOWN: f32 = 4.5;
const STEP_UP_COOLDOWN: f32 = 6.5;

/// Render quality tiers, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    #[default]
    Ultra,
    High,
    Medium,
    Low,
}

impl QualityLevel {
    pub const ALL: [QualityLevel; 4] = [
        QualityLevel::Ultra,
        QualityLevel::High,
        QualityLevel::Medium,
        QualityLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Ultra => "ultra",
            QualityLevel::High => "high",
            QualityLevel::Medium => "medium",
            QualityLevel::Low => "low",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ultra" => Some(QualityLevel::Ultra),
            "high" => Some(QualityLevel::High),
            "medium" | "med" => Some(QualityLevel::Medium),
            "low" => Some(QualityLevel::Low),
            _ => None,
        }
    }

    /// Backbuffer scale relative to the logical resolution
    pub fn scale(&self) -> f32 {
        match self {
            QualityLevel::Ultra => 1.0,
            QualityLevel::High => 0.85,
            QualityLevel::Medium => 0.7,
            QualityLevel::Low => 0.55,
        }
    }

    /// Frame rate this tier is expected to hold
    pub fn fps_target(&self) -> f32 {
        match self {
            QualityLevel::Ultra => 54.0,
            QualityLevel::High => 48.0,
            QualityLevel::Medium => 42.0,
            QualityLevel::Low => 36.0,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }

    fn display_name(&self) -> &'static str {
        match self {
            QualityLevel::Ultra => "Ultra",
            QualityLevel::High => "High",
            QualityLevel::Medium => "Medium",
            QualityLevel::Low => "Low",
        }
    }
}

/// Quality selection: follow the frame rate, or pin a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityMode {
    #[default]
    Auto,
    Fixed(QualityLevel),
}

impl QualityMode {
    /// Unknown ids fall back to `Auto`
    pub fn from_id(s: &str) -> Self {
        QualityLevel::from_id(s).map_or(QualityMode::Auto, QualityMode::Fixed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityMode::Auto => "auto",
            QualityMode::Fixed(level) => level.as_str(),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityMode,
    /// Silences all sound effects
    pub muted: bool,
    /// Effects volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityMode::Auto,
            muted: false,
            volume: 0.8,
        }
    }
}

impl Settings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Steps the render tier up or down to hold a frame rate
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveQuality {
    mode: QualityMode,
    current: QualityLevel,
    /// Tier auto mode returns to after an explicit pin is lifted
    auto_level: QualityLevel,
    cooldown: f32,
    sample_time: f32,
    sample_frames: u32,
}

impl AdaptiveQuality {
    pub fn new(mode: QualityMode) -> Self {
        let mut quality = Self {
            mode,
            current: QualityLevel::Ultra,
            auto_level: QualityLevel::Ultra,
            cooldown: 0.0,
            sample_time: 0.0,
            sample_frames: 0,
        };
        quality.set_mode(mode);
        quality
    }

    pub fn set_mode(&mut self, mode: QualityMode) {
        self.mode = mode;
        self.current = match mode {
            QualityMode::Auto => self.auto_level,
            QualityMode::Fixed(level) => level,
        };
    }

    /// Feed one frame's duration. Returns the new tier when it changed.
    pub fn update(&mut self, dt: f32) -> Option<QualityLevel> {
        if self.mode != QualityMode::Auto {
            return None;
        }
        self.sample_time += dt;
        self.sample_frames += 1;
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
        if self.sample_time < SAMPLE_WINDOW {
            return None;
        }

        let fps = self.sample_frames as f32 / self.sample_time;
        self.sample_time = 0.0;
        self.sample_frames = 0;
        if self.cooldown > 0.0 {
            return None;
        }

        let index = self.current.index();
        let target = self.current.fps_target();
        let next = if fps < target && index + 1 < QualityLevel::ALL.len() {
            self.cooldown = STEP_DOWN_COOLDOWN;
            QualityLevel::ALL[index + 1]
        } else if fps > target + STEP_UP_MARGIN && index > 0 {
            self.cooldown = STEP_UP_COOLDOWN;
            QualityLevel::ALL[index - 1]
        } else {
            return None;
        };

        log::info!(
            "Render quality {} -> {} ({:.0} fps)",
            self.current.as_str(),
            next.as_str(),
            fps
        );
        self.current = next;
        self.auto_level = next;
        Some(next)
    }

    pub fn mode(&self) -> QualityMode {
        self.mode
    }

    pub fn level(&self) -> QualityLevel {
        self.current
    }

    pub fn scale(&self) -> f32 {
        self.current.scale()
    }

    /// "Auto (high)" in auto mode, "High" when pinned
    pub fn label(&self) -> String {
        match self.mode {
            QualityMode::Auto => format!("Auto ({})", self.current.as_str()),
            QualityMode::Fixed(level) => level.display_name().to_string(),
        }
    }
}

impl Default for AdaptiveQuality {
    fn default() -> Self {
        Self::new(QualityMode::Auto)
    }
}
