use std::io::Write;

use crate::{
    controller::{Change, PlayerObserver},
    formats::time::format_seconds,
    model::PlayerState,
};

const PLACEHOLDER: &str = "Load an SRT to begin.";

/// Current-sentence panel: index, time range and text.
pub fn render_current(state: &PlayerState) -> String {
    match state.current_cue() {
        None => format!(
            "#–  [{} → {}]\n{PLACEHOLDER}\n",
            format_seconds(0.0),
            format_seconds(0.0)
        ),
        Some(cue) => {
            let text = if state.text_blurred {
                blur(&cue.text)
            } else {
                cue.text.clone()
            };
            format!(
                "#{}  [{} → {}]\n{}\n",
                cue.sequence_number,
                format_seconds(cue.start_seconds),
                format_seconds(cue.end_seconds),
                text
            )
        }
    }
}

/// Sentence list with the current cue marked. Empty when hidden.
pub fn render_list(state: &PlayerState, wrap_width: usize) -> String {
    if !state.sentence_list_visible {
        return String::new();
    }

    let mut out = String::new();
    for (i, cue) in state.cues.iter().enumerate() {
        let marker = if Some(i) == state.current_index { '>' } else { ' ' };
        let prefix = format!(
            "{marker} #{} [{}] ",
            cue.sequence_number,
            format_seconds(cue.start_seconds)
        );
        let indent = " ".repeat(prefix.chars().count());
        let options = textwrap::Options::new(wrap_width.max(prefix.len() + 8))
            .initial_indent(&prefix)
            .subsequent_indent(&indent);

        for line in textwrap::wrap(&cue.text.replace('\n', " "), options) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn blur(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() { c } else { '•' })
        .collect()
}

/// Prints state changes to a terminal.
pub struct ConsoleView<W: Write> {
    out: W,
    wrap_width: usize,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W, wrap_width: usize) -> Self {
        Self { out, wrap_width }
    }

    fn render(&self, state: &PlayerState, change: Change) -> String {
        match change {
            Change::CuesLoaded | Change::CurrentChanged | Change::SentenceListToggled => {
                let mut s = render_list(state, self.wrap_width);
                if !s.is_empty() {
                    s.push('\n');
                }
                s.push_str(&render_current(state));
                s
            }
            Change::TextBlurToggled => render_current(state),
            Change::VideoLockToggled => {
                let word = if state.is_video_locked { "locked" } else { "unlocked" };
                format!("video {word}\n")
            }
            Change::NotesChanged => "notes saved\n".to_string(),
            Change::PlaybackToggled => String::new(),
            Change::PlaybackBounded => "(end of sentence)\n".to_string(),
        }
    }
}

impl<W: Write> PlayerObserver for ConsoleView<W> {
    fn on_change(&mut self, state: &PlayerState, change: Change) {
        let text = self.render(state, change);
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed writing to console");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cue;

    fn state() -> PlayerState {
        PlayerState {
            cues: vec![
                Cue {
                    sequence_number: 1,
                    start_seconds: 1.0,
                    end_seconds: 3.0,
                    text: "Hello world".to_string(),
                },
                Cue {
                    sequence_number: 2,
                    start_seconds: 4.0,
                    end_seconds: 5.0,
                    text: "Bye".to_string(),
                },
            ],
            current_index: Some(1),
            ..PlayerState::default()
        }
    }

    #[test]
    fn current_panel_shows_cue_or_placeholder() {
        assert_eq!(
            render_current(&state()),
            "#2  [00:00:04.000 → 00:00:05.000]\nBye\n"
        );
        assert!(render_current(&PlayerState::default()).contains(PLACEHOLDER));
    }

    #[test]
    fn blurred_text_keeps_word_shapes() {
        let mut s = state();
        s.current_index = Some(0);
        s.text_blurred = true;
        assert!(render_current(&s).ends_with("••••• •••••\n"));
    }

    #[test]
    fn list_marks_current_and_hides_when_toggled_off() {
        let mut s = state();
        let list = render_list(&s, 72);
        assert_eq!(
            list,
            "  #1 [00:00:01.000] Hello world\n> #2 [00:00:04.000] Bye\n"
        );

        s.sentence_list_visible = false;
        assert_eq!(render_list(&s, 72), "");
    }

    #[test]
    fn long_sentences_wrap_under_their_prefix() {
        let mut s = state();
        s.cues[0].text = "one two three four five six seven eight".to_string();
        let list = render_list(&s, 40);
        let first: Vec<&str> = list.lines().take(2).collect();
        assert!(first[0].starts_with("  #1 [00:00:01.000] one"));
        assert!(first[1].starts_with("                    "));
    }

    #[test]
    fn console_view_writes_on_change() {
        let mut view = ConsoleView::new(Vec::new(), 72);
        view.on_change(&state(), Change::PlaybackBounded);
        view.on_change(&state(), Change::PlaybackToggled);
        assert_eq!(String::from_utf8(view.out).unwrap(), "(end of sentence)\n");
    }
}
