use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tuning values for the whole page. Every field has a default, so a partial
/// JSON document (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub certificates: CertificateConfig,
    #[serde(default)]
    pub typing: TypingConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl ViewportConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fractions = [
            ("reveal.threshold", self.reveal.threshold),
            ("reveal.counter_threshold", self.reveal.counter_threshold),
            ("reveal.bar_threshold", self.reveal.bar_threshold),
            ("certificates.failure_rate", self.certificates.failure_rate),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        if self.reveal.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "reveal.frame_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scroll pipeline thresholds, in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Lookahead added to the scroll offset before locating the active section
    #[serde(default = "default_section_bias")]
    pub section_bias_px: f64,
    #[serde(default = "default_elevate_after")]
    pub elevate_after_px: f64,
    #[serde(default = "default_hide_after")]
    pub hide_after_px: f64,
    #[serde(default = "default_scroll_top_after")]
    pub scroll_top_after_px: f64,
    /// Height of the fixed navbar, subtracted from anchor scroll targets
    #[serde(default = "default_anchor_offset")]
    pub anchor_offset_px: f64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
}

fn default_section_bias() -> f64 {
    150.0
}

fn default_elevate_after() -> f64 {
    100.0
}

fn default_hide_after() -> f64 {
    200.0
}

fn default_scroll_top_after() -> f64 {
    500.0
}

fn default_anchor_offset() -> f64 {
    80.0
}

fn default_debounce_ms() -> u32 {
    10
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            section_bias_px: default_section_bias(),
            elevate_after_px: default_elevate_after(),
            hide_after_px: default_hide_after(),
            scroll_top_after_px: default_scroll_top_after(),
            anchor_offset_px: default_anchor_offset(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Visible fraction that triggers a reveal
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    #[serde(default = "default_root_margin")]
    pub root_margin: String,
    #[serde(default = "default_child_stagger_ms")]
    pub child_stagger_ms: u32,
    #[serde(default = "default_half")]
    pub bar_threshold: f64,
    #[serde(default = "default_bar_stagger_ms")]
    pub bar_stagger_ms: u32,
    #[serde(default = "default_bar_duration_ms")]
    pub bar_duration_ms: u32,
    #[serde(default = "default_half")]
    pub counter_threshold: f64,
    #[serde(default = "default_counter_duration_ms")]
    pub counter_duration_ms: u32,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u32,
    #[serde(default = "default_counter_suffix")]
    pub counter_suffix: String,
}

fn default_reveal_threshold() -> f64 {
    0.1
}

fn default_root_margin() -> String {
    crate::visibility::DEFAULT_ROOT_MARGIN.to_string()
}

fn default_child_stagger_ms() -> u32 {
    100
}

fn default_half() -> f64 {
    0.5
}

fn default_bar_stagger_ms() -> u32 {
    200
}

fn default_bar_duration_ms() -> u32 {
    1000
}

fn default_counter_duration_ms() -> u32 {
    2000
}

fn default_frame_interval_ms() -> u32 {
    16
}

fn default_counter_suffix() -> String {
    "+".to_string()
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            root_margin: default_root_margin(),
            child_stagger_ms: default_child_stagger_ms(),
            bar_threshold: default_half(),
            bar_stagger_ms: default_bar_stagger_ms(),
            bar_duration_ms: default_bar_duration_ms(),
            counter_threshold: default_half(),
            counter_duration_ms: default_counter_duration_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            counter_suffix: default_counter_suffix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Minimum message length in UTF-16 code units
    #[serde(default = "default_min_message_chars")]
    pub min_message_chars: usize,
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u32,
}

fn default_min_message_chars() -> usize {
    10
}

fn default_submit_delay_ms() -> u32 {
    2000
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            min_message_chars: default_min_message_chars(),
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateConfig {
    #[serde(default = "default_verify_delay_ms")]
    pub verify_delay_ms: u32,
    /// Probability that a simulated verification fails
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    #[serde(default = "default_reset_after_ms")]
    pub reset_after_ms: u32,
}

fn default_verify_delay_ms() -> u32 {
    1500
}

fn default_failure_rate() -> f64 {
    0.1
}

fn default_reset_after_ms() -> u32 {
    3000
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            verify_delay_ms: default_verify_delay_ms(),
            failure_rate: default_failure_rate(),
            reset_after_ms: default_reset_after_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingConfig {
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u32,
    #[serde(default = "default_char_interval_ms")]
    pub char_interval_ms: u32,
    #[serde(default = "default_cursor_hold_ms")]
    pub cursor_hold_ms: u32,
}

fn default_start_delay_ms() -> u32 {
    1000
}

fn default_char_interval_ms() -> u32 {
    100
}

fn default_cursor_hold_ms() -> u32 {
    1000
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: default_start_delay_ms(),
            char_interval_ms: default_char_interval_ms(),
            cursor_hold_ms: default_cursor_hold_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_enter_delay_ms")]
    pub enter_delay_ms: u32,
    #[serde(default = "default_auto_dismiss_ms")]
    pub auto_dismiss_ms: u32,
    #[serde(default = "default_exit_ms")]
    pub exit_ms: u32,
}

fn default_enter_delay_ms() -> u32 {
    100
}

fn default_auto_dismiss_ms() -> u32 {
    5000
}

fn default_exit_ms() -> u32 {
    300
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: default_enter_delay_ms(),
            auto_dismiss_ms: default_auto_dismiss_ms(),
            exit_ms: default_exit_ms(),
        }
    }
}
