//! Navigation announcements through the platform speech engine.

use shell::{Announcer, LiveSession};

/// Speaks through `window.speechSynthesis` on the web. Native builds have no
/// speech engine wired in and only log the announcement.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpeechAnnouncer;

impl Announcer for SpeechAnnouncer {
    fn announce(&self, text: &str, language_code: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Err(e) = speak(text, language_code) {
                tracing::warn!("Failed to announce {:?}: {:?}", text, e);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::info!(language = language_code, "announce: {}", text);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn speak(text: &str, language_code: &str) -> Result<(), wasm_bindgen::JsValue> {
    let window = web_sys::window().ok_or_else(|| wasm_bindgen::JsValue::from_str("no window"))?;
    let synth = window.speech_synthesis()?;
    let utterance = web_sys::SpeechSynthesisUtterance::new_with_text(text)?;
    utterance.set_lang(language_code);
    // Drop anything still queued so announcements track the latest screen
    synth.cancel();
    synth.speak(&utterance);
    Ok(())
}

/// Stand-in when no live-audio provider is mounted above the shell.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLiveSession;

impl LiveSession for NoLiveSession {
    fn start_session(&self) {
        tracing::warn!("live session requested but no live-audio provider is mounted");
    }

    fn stop_session(&self) {}

    fn is_active(&self) -> bool {
        false
    }
}
