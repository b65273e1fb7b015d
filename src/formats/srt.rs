use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    formats::time::{format_srt_timestamp, parse_time_range_arrow},
    model::Cue,
};

static BLOCK_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("separator pattern compiles"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern compiles"));

/// Parses SubRip text into cues. Blocks that are too short or lack a valid
/// timing line are dropped, and survivors are renumbered from 1 in source
/// order.
pub fn parse_srt(raw: &str) -> Vec<Cue> {
    let normalized = raw.replace('\r', "");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cues = Vec::new();
    for (block_no, block) in BLOCK_SEPARATOR_RE.split(trimmed).enumerate() {
        match parse_block(block, cues.len() as u32 + 1) {
            Some(cue) => cues.push(cue),
            None => tracing::trace!(block = block_no, "dropped malformed block"),
        }
    }
    cues
}

fn parse_block(block: &str, sequence_number: u32) -> Option<Cue> {
    let lines: Vec<&str> = block.split('\n').collect();
    if lines.len() < 2 {
        return None;
    }

    let first = lines[0].trim();
    let timing_at = if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
        1
    } else {
        0
    };

    let (start_seconds, end_seconds) = parse_time_range_arrow(lines.get(timing_at)?)?;

    let body = lines[timing_at + 1..].join("\n");
    let text = TAG_RE.replace_all(&body, "").trim().to_string();

    Some(Cue {
        sequence_number,
        start_seconds,
        end_seconds,
        text,
    })
}

const EMPTY_LINE_MARK: &str = "<i></i>";

/// Renders cues back to SubRip, numbering them by position.
pub fn write_srt(cues: &[Cue]) -> String {
    let mut out = String::new();

    for (i, cue) in cues.iter().enumerate() {
        out.push_str(&(i + 1).to_string());
        out.push('\n');

        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(cue.start_seconds),
            format_srt_timestamp(cue.end_seconds)
        ));

        write_body(&mut out, &cue.text);
        out.push_str("\n\n");
    }

    out
}

/// A blank line inside a body would end the block on re-parse, so it is
/// written with an empty tag that parsing strips again.
fn write_body(out: &mut String, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line);
        if !text.is_empty() && line.trim_matches([' ', '\t']).is_empty() {
            out.push_str(EMPTY_LINE_MARK);
        }
    }
}

/// Joins runs of cues until the accumulated text ends with one of
/// `terminators`, so each resulting cue holds a whole sentence.
pub fn merge_sentences(cues: &[Cue], terminators: &str) -> Vec<Cue> {
    let mut merged: Vec<Cue> = Vec::with_capacity(cues.len());
    let mut iter = cues.iter();

    while let Some(first) = iter.next() {
        let mut acc = Cue {
            sequence_number: merged.len() as u32 + 1,
            text: normalize_ws(&first.text),
            ..first.clone()
        };

        while !ends_sentence(&acc.text, terminators) {
            let Some(next) = iter.next() else { break };
            acc.text = join_text(&acc.text, &normalize_ws(&next.text));
            acc.end_seconds = next.end_seconds;
        }

        merged.push(acc);
    }

    merged
}

fn ends_sentence(text: &str, terminators: &str) -> bool {
    text.trim_end()
        .chars()
        .last()
        .is_some_and(|c| terminators.contains(c))
}

fn join_text(acc: &str, add: &str) -> String {
    if acc.is_empty() {
        return add.to_string();
    }
    if add.is_empty() {
        return acc.to_string();
    }
    format!("{acc} {add}")
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
