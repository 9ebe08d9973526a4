//! Visual cues for users who cannot rely on audio.
//!
//! When visual cues mode is on, the shell frames the screen with a pulsing
//! border while the app is listening or a live session is open, and deaf users
//! additionally get a vibrating overlay. Rendering the cue is up to the host;
//! this module only decides which cue applies.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    #[default]
    Default,
    Deaf,
    Blind,
    Elderly,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub visual_cues_mode: bool,
    #[serde(default)]
    pub large_text_mode: bool,
    #[serde(default)]
    pub persona: Persona,
}

/// Overlay the host should draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualCue {
    /// Pulsing border: audio input is being captured.
    pub border_pulse: bool,
    pub vibrate: bool,
}

/// `None` when visual cues mode is off.
pub fn visual_cue(
    settings: &AccessibilitySettings,
    is_listening: bool,
    is_live_active: bool,
) -> Option<VisualCue> {
    if !settings.visual_cues_mode {
        return None;
    }
    Some(VisualCue {
        border_pulse: is_listening || is_live_active,
        vibrate: settings.persona == Persona::Deaf,
    })
}
