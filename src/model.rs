use serde::{Deserialize, Serialize};

/// One timed subtitle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// 1-based position among the blocks that survived parsing.
    #[serde(default, alias = "idx")]
    pub sequence_number: u32,
    #[serde(alias = "start")]
    pub start_seconds: f64,
    #[serde(alias = "end")]
    pub end_seconds: f64,
    pub text: String,
}

impl Cue {
    pub fn duration_seconds(&self) -> f64 {
        (self.end_seconds - self.start_seconds).max(0.0)
    }
}

/// Authoritative runtime state of a player session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub cues: Vec<Cue>,
    /// `None` when no cue is selected, otherwise a valid index into `cues`.
    pub current_index: Option<usize>,
    pub sentence_list_visible: bool,
    pub is_video_locked: bool,
    pub notes: String,
    /// Display-only, never persisted.
    pub text_blurred: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            cues: Vec::new(),
            current_index: None,
            sentence_list_visible: true,
            is_video_locked: false,
            notes: String::new(),
            text_blurred: false,
        }
    }
}

impl PlayerState {
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn current_cue(&self) -> Option<&Cue> {
        self.current_index.and_then(|i| self.cues.get(i))
    }

    /// Current index in the `-1` sentinel form used by navigation arithmetic
    /// and the stored schema.
    pub fn current_index_signed(&self) -> i64 {
        self.current_index.map(|i| i as i64).unwrap_or(-1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(n: u32, start: f64, end: f64) -> Cue {
        Cue {
            sequence_number: n,
            start_seconds: start,
            end_seconds: end,
            text: format!("cue {n}"),
        }
    }

    #[test]
    fn current_cue_tolerates_stale_index() {
        let state = PlayerState {
            cues: vec![cue(1, 0.0, 1.0)],
            current_index: Some(4),
            ..PlayerState::default()
        };
        assert!(state.current_cue().is_none());
        assert_eq!(state.current_index_signed(), 4);
    }

    #[test]
    fn empty_state_defaults() {
        let state = PlayerState::default();
        assert!(state.is_empty());
        assert_eq!(state.current_index_signed(), -1);
        assert!(state.sentence_list_visible);
        assert!(!state.is_video_locked);
    }

    #[test]
    fn inverted_range_has_zero_duration() {
        assert_eq!(cue(1, 5.0, 3.0).duration_seconds(), 0.0);
        assert_eq!(cue(1, 1.5, 3.0).duration_seconds(), 1.5);
    }
}
