use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::classifier::{ClassifierConfig, ZoneLayout};
use crate::controller::{GestureController, MissingHandPolicy};
use crate::debounce::NopPolicy;
use crate::ingest::SourceConfig;

const DEFAULT_INPUT: &str = "stub://demo";
const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_REPEAT: u32 = 1;
const DEFAULT_WINDOW_NAME: &str = "Playback";
const DEFAULT_FRAME_WIDTH: u32 = 800;
const DEFAULT_FRAME_HEIGHT: u32 = 800;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct HandflixConfigFile {
    classifier: Option<ClassifierConfigFile>,
    debounce: Option<DebounceConfigFile>,
    input: Option<InputConfigFile>,
    media: Option<MediaConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ClassifierConfigFile {
    pinch_threshold: Option<f32>,
    left_threshold: Option<f32>,
    right_threshold: Option<f32>,
    zone_layout: Option<ZoneLayout>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DebounceConfigFile {
    cooldown_frames: Option<u32>,
    nop_policy: Option<NopPolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct InputConfigFile {
    path: Option<String>,
    target_fps: Option<u32>,
    seed: Option<u64>,
    repeat: Option<u32>,
    missing_hand: Option<MissingHandPolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct MediaConfigFile {
    window_name: Option<String>,
    frame_width: Option<u32>,
    frame_height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct HandflixConfig {
    pub classifier: ClassifierConfig,
    pub nop_policy: NopPolicy,
    pub input: InputSettings,
    pub media: MediaSettings,
}

#[derive(Debug, Clone)]
pub struct InputSettings {
    /// Local `.jsonl` recording or `stub://<script>`.
    pub path: String,
    /// Pacing for the frame loop; 0 runs as fast as frames arrive.
    pub target_fps: u32,
    pub seed: u64,
    pub repeat: u32,
    pub missing_hand: MissingHandPolicy,
}

/// Playback window the overlay text is reported against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSettings {
    pub window_name: String,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for HandflixConfig {
    fn default() -> Self {
        Self::from_file(HandflixConfigFile::default())
    }
}

impl HandflixConfig {
    /// Defaults, then the file named by `HANDFLIX_CONFIG`, then environment
    /// overrides. The result is validated.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("HANDFLIX_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Like `load`, with an explicit config file instead of `HANDFLIX_CONFIG`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => HandflixConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: HandflixConfigFile) -> Self {
        let defaults = ClassifierConfig::default();
        let classifier_file = file.classifier.unwrap_or_default();
        let debounce_file = file.debounce.unwrap_or_default();
        let input_file = file.input.unwrap_or_default();
        let media_file = file.media.unwrap_or_default();

        let classifier = ClassifierConfig {
            pinch_threshold: classifier_file
                .pinch_threshold
                .unwrap_or(defaults.pinch_threshold),
            left_threshold: classifier_file
                .left_threshold
                .unwrap_or(defaults.left_threshold),
            right_threshold: classifier_file
                .right_threshold
                .unwrap_or(defaults.right_threshold),
            cooldown_frames: debounce_file
                .cooldown_frames
                .unwrap_or(defaults.cooldown_frames),
            zone_layout: classifier_file.zone_layout.unwrap_or_default(),
        };
        let input = InputSettings {
            path: input_file
                .path
                .unwrap_or_else(|| DEFAULT_INPUT.to_string()),
            target_fps: input_file.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            seed: input_file.seed.unwrap_or_default(),
            repeat: input_file.repeat.unwrap_or(DEFAULT_REPEAT),
            missing_hand: input_file.missing_hand.unwrap_or_default(),
        };
        let media = MediaSettings {
            window_name: media_file
                .window_name
                .unwrap_or_else(|| DEFAULT_WINDOW_NAME.to_string()),
            frame_width: media_file.frame_width.unwrap_or(DEFAULT_FRAME_WIDTH),
            frame_height: media_file.frame_height.unwrap_or(DEFAULT_FRAME_HEIGHT),
        };
        Self {
            classifier,
            nop_policy: debounce_file.nop_policy.unwrap_or_default(),
            input,
            media,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(value) = env_parse::<f32>("HANDFLIX_PINCH_THRESHOLD")? {
            self.classifier.pinch_threshold = value;
        }
        if let Some(value) = env_parse::<f32>("HANDFLIX_LEFT_THRESHOLD")? {
            self.classifier.left_threshold = value;
        }
        if let Some(value) = env_parse::<f32>("HANDFLIX_RIGHT_THRESHOLD")? {
            self.classifier.right_threshold = value;
        }
        if let Some(value) = env_parse::<u32>("HANDFLIX_COOLDOWN_FRAMES")? {
            self.classifier.cooldown_frames = value;
        }
        if let Some(value) = env_parse::<u32>("HANDFLIX_TARGET_FPS")? {
            self.input.target_fps = value;
        }
        if let Ok(path) = std::env::var("HANDFLIX_INPUT") {
            if !path.trim().is_empty() {
                self.input.path = path;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;
        if self.input.path.trim().is_empty() {
            return Err(anyhow!("input path must not be empty"));
        }
        if self.input.repeat == 0 {
            return Err(anyhow!("input repeat must be at least 1"));
        }
        if self.media.window_name.trim().is_empty() {
            return Err(anyhow!("media window_name must not be empty"));
        }
        if self.media.frame_width == 0 || self.media.frame_height == 0 {
            return Err(anyhow!(
                "media frame size must be non-zero (got {}x{})",
                self.media.frame_width,
                self.media.frame_height
            ));
        }
        Ok(())
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            path: self.input.path.clone(),
            seed: self.input.seed,
            repeat: self.input.repeat,
        }
    }

    pub fn controller(&self) -> Result<GestureController> {
        Ok(GestureController::new(self.classifier)?
            .with_nop_policy(self.nop_policy)
            .with_missing_hand(self.input.missing_hand))
    }
}

fn read_config_file(path: &Path) -> Result<HandflixConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg: HandflixConfigFile = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{} has an invalid value '{}'", key, raw)),
        _ => Ok(None),
    }
}
