use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use knob::{Knob, KnobError, KnobStyle};
use knob::theme::DEFAULT_LINE_WIDTH;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An opaque colour written as `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay, Deref, From, Into)]
pub struct ColorSpec(Srgb<u8>);

impl ColorSpec {
    pub fn to_srgba(&self) -> Srgba<f64> {
        self.0.into_format::<f64>().with_alpha(1.0)
    }
}

impl FromStr for ColorSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KnobConfig {
    pub line_width: f64,
    pub tint: Option<ColorSpec>,
    pub background: Option<ColorSpec>,
    pub value: f64,
    pub enabled: bool,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            tint: None,
            background: None,
            value: 0.0,
            enabled: true,
        }
    }
}

impl KnobConfig {
    /// Style for the knob. An unset tint falls back to `theme_tint`, then to
    /// the library default.
    pub fn style(&self, theme_tint: Option<Srgba<f64>>) -> KnobStyle {
        let defaults = KnobStyle::default();
        KnobStyle {
            line_width: self.line_width,
            tint: self
                .tint
                .map(|c| c.to_srgba())
                .or(theme_tint)
                .unwrap_or(defaults.tint),
            background: self.background.map(|c| c.to_srgba()),
        }
    }

    /// Startup state: value, enabled flag and style.
    pub fn apply_initial(
        &self,
        knob: &mut Knob,
        theme_tint: Option<Srgba<f64>>,
    ) -> Result<(), KnobError> {
        knob.set_value(self.value)?;
        knob.set_enabled(self.enabled);
        self.apply_style(knob, theme_tint)
    }

    /// Reload path. Only the style is taken from the file; value and enabled
    /// state keep whatever the drag or the control socket last set.
    pub fn apply_style(
        &self,
        knob: &mut Knob,
        theme_tint: Option<Srgba<f64>>,
    ) -> Result<(), KnobError> {
        knob.set_style(self.style(theme_tint))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub knob: KnobConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Invalid colour '{0}', expected #rrggbb or #rgb")]
    InvalidColor(String),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "knob", "knob").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("KNOB")
        .prefix_separator("_")
        .separator("__")
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_deserialization() {
        let cases = vec![
            ("\"#ff8000\"", Srgb::new(255u8, 128, 0)),
            ("\"ff8000\"", Srgb::new(255u8, 128, 0)),
            ("\"#F80\"", Srgb::new(255u8, 136, 0)),
            ("\" #007aff \"", Srgb::new(0u8, 122, 255)),
        ];

        for (json, expected) in cases {
            let deserialized: ColorSpec = serde_json::from_str(json).unwrap();
            assert_eq!(*deserialized, expected);
        }
    }

    #[test]
    fn test_color_rejects_names() {
        assert!(serde_json::from_str::<ColorSpec>("\"orange\"").is_err());
        assert!(matches!(
            "#12345".parse::<ColorSpec>(),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let color = ColorSpec::from(Srgb::new(0u8, 122, 255));
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#007aff\"");
    }

    #[test]
    fn test_default_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.knob.line_width, 2.0);
        assert!(config.knob.tint.is_none());
        assert!(config.knob.enabled);
        assert_eq!(config.window.width, 240);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = parse_config("[knob]\ntint = \"#ff0000\"\nvalue = 1.5\n").unwrap();
        assert_eq!(config.knob.value, 1.5);
        assert_eq!(config.knob.line_width, DEFAULT_LINE_WIDTH);
        assert_eq!(config.window.height, 240);
        assert_eq!(
            config.knob.tint.map(|c| c.to_srgba()),
            Some(Srgba::new(1.0, 0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn test_style_tint_fallbacks() {
        let theme = Srgba::new(0.5, 0.5, 0.5, 1.0);
        let mut knob = KnobConfig::default();

        assert_eq!(knob.style(None).tint, KnobStyle::default().tint);
        assert_eq!(knob.style(Some(theme)).tint, theme);

        knob.tint = Some(ColorSpec::from(Srgb::new(0u8, 0, 0)));
        knob.background = Some(ColorSpec::from(Srgb::new(255u8, 255, 255)));
        let style = knob.style(Some(theme));
        assert_eq!(style.tint, Srgba::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(style.background, Some(Srgba::new(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_apply_initial_sets_value_and_enabled() {
        let config = parse_config("[knob]\nvalue = 2.0\nenabled = false\nline_width = 3.0\n")
            .unwrap();
        let mut knob = Knob::new(knob::Rect::from_size(100.0, 100.0));
        config.knob.apply_initial(&mut knob, None).unwrap();

        assert!((knob.value() - 2.0).abs() < 1e-9);
        assert!(!knob.is_enabled());
        assert_eq!(knob.line_width(), 3.0);
    }

    #[test]
    fn test_reload_keeps_runtime_enabled_state() {
        let mut knob = Knob::new(knob::Rect::from_size(100.0, 100.0));
        knob.set_enabled(false);
        knob.set_value(1.0).unwrap();

        let reloaded = parse_config("[knob]\nenabled = true\nvalue = 0.0\nline_width = 4.0\n")
            .unwrap();
        reloaded.knob.apply_style(&mut knob, None).unwrap();

        assert!(!knob.is_enabled());
        assert!((knob.value() - 1.0).abs() < 1e-9);
        assert_eq!(knob.line_width(), 4.0);
    }

    #[test]
    fn test_apply_style_rejects_negative_width() {
        let mut knob = Knob::new(knob::Rect::from_size(100.0, 100.0));
        let config = KnobConfig {
            line_width: -1.0,
            ..KnobConfig::default()
        };
        assert_eq!(
            config.apply_style(&mut knob, None),
            Err(KnobError::InvalidLineWidth(-1.0))
        );
    }
}
