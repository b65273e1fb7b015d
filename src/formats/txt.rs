use crate::{formats::time::format_seconds, model::Cue};

/// Plain transcript, one cue per line, optionally prefixed with its range.
pub fn write_txt(cues: &[Cue], text_only: bool) -> String {
    let mut out = String::new();

    for cue in cues {
        if !text_only {
            out.push_str(&format!(
                "[{} --> {}] ",
                format_seconds(cue.start_seconds),
                format_seconds(cue.end_seconds),
            ));
        }
        // Multi-line bodies would break the one-line-per-cue layout.
        out.push_str(&cue.text.trim().replace('\n', " "));
        out.push('\n');
    }

    out
}

/// Starts a new paragraph after every sentence ending in `.` or `?`.
pub fn break_sentences(text: &str) -> String {
    text.replace(". ", ".\n\n").replace("? ", "?\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamped_and_text_only_layouts() {
        let cues = vec![Cue {
            sequence_number: 1,
            start_seconds: 1.0,
            end_seconds: 2.5,
            text: "two\nlines".to_string(),
        }];
        assert_eq!(
            write_txt(&cues, false),
            "[00:00:01.000 --> 00:00:02.500] two lines\n"
        );
        assert_eq!(write_txt(&cues, true), "two lines\n");
    }

    #[test]
    fn breaks_after_full_stops_and_questions() {
        assert_eq!(
            break_sentences("Run. Why? Because.\nEnd"),
            "Run.\n\nWhy?\n\nBecause.\nEnd"
        );
    }
}
