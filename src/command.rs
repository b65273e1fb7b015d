use crate::{controller::Controller, media::MediaSurface, store::StateStore};

/// Every user action the player understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Previous,
    Next,
    /// Replay the current sentence from its start.
    Repeat,
    GoTo(i64),
    TogglePlayback,
    ToggleSentenceList,
    ToggleVideoLock,
    ToggleTextBlur,
}

impl Command {
    /// Keyboard bindings. Arrow keys use their DOM key names.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "," | "ArrowLeft" => Some(Self::Previous),
            "." | "ArrowRight" => Some(Self::Next),
            "r" | "m" => Some(Self::Repeat),
            "h" => Some(Self::ToggleTextBlur),
            " " => Some(Self::TogglePlayback),
            _ => None,
        }
    }

    pub fn apply<M: MediaSurface, S: StateStore>(self, controller: &mut Controller<M, S>) {
        tracing::debug!(command = ?self, "dispatch");
        match self {
            Self::Previous => controller.previous(),
            Self::Next => controller.next(),
            Self::Repeat => controller.play_current(),
            Self::GoTo(index) => controller.go_to(index),
            Self::TogglePlayback => controller.toggle_playback(),
            Self::ToggleSentenceList => controller.toggle_sentence_list_visible(),
            Self::ToggleVideoLock => controller.toggle_video_lock(),
            Self::ToggleTextBlur => controller.toggle_text_blur(),
        }
    }
}

/// Turns horizontal wheel deltas into previous/next, with a cooldown so one
/// trackpad swipe yields one step.
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    threshold: f64,
    cooldown_ms: u64,
    last_swipe_ms: Option<u64>,
}

impl SwipeDetector {
    pub fn new(threshold: f64, cooldown_ms: u64) -> Self {
        Self {
            threshold,
            cooldown_ms,
            last_swipe_ms: None,
        }
    }

    pub fn on_wheel(&mut self, delta_x: f64, now_ms: u64) -> Option<Command> {
        if let Some(last) = self.last_swipe_ms {
            if now_ms.saturating_sub(last) < self.cooldown_ms {
                return None;
            }
        }

        let command = if delta_x < -self.threshold {
            Command::Previous
        } else if delta_x > self.threshold {
            Command::Next
        } else {
            return None;
        };

        self.last_swipe_ms = Some(now_ms);
        Some(command)
    }
}
