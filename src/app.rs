use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path};

use crate::{
    cli::{MergeCmd, OutputFormat, ParseCmd, SplitCmd},
    config::Config,
    formats,
    model::Cue,
};

pub fn run_parse(cmd: ParseCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("parse", input = cmd.input.as_str(), format = ?cmd.format);
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.input)?;
    tracing::info!(bytes = raw.len(), "read input");

    let cues = formats::srt::parse_srt(&raw);
    log_cue_summary(&cues, cfg);

    let rendered = match cmd.format {
        OutputFormat::Txt => formats::txt::write_txt(&cues, false),
        OutputFormat::Text => formats::txt::write_txt(&cues, true),
        OutputFormat::Srt => formats::srt::write_srt(&cues),
        OutputFormat::Json => formats::json::write_json(&cues, cfg.formats.json.wrapped)?,
    };

    match cmd.output {
        Some(path) => {
            write_output(&path, &rendered, cmd.overwrite)?;
            tracing::info!(path = path.as_str(), "wrote output file");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

pub fn run_merge(cmd: MergeCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("merge", input = cmd.input.as_str());
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.input)?;
    let cues = formats::srt::parse_srt(&raw);
    let merged = formats::srt::merge_sentences(&cues, &cfg.merge.terminators);
    tracing::info!(before = cues.len(), after = merged.len(), "merged sentences");

    let rendered = formats::srt::write_srt(&merged);
    if cmd.stdout {
        print!("{rendered}");
        return Ok(());
    }

    let out_path = derive_output_path(&cmd.input, cmd.output.as_deref(), "merged", Some("srt"))?;
    write_output(&out_path, &rendered, cmd.overwrite)?;
    tracing::info!(path = out_path.as_str(), "wrote output file");
    Ok(())
}

pub fn run_split_sentences(cmd: SplitCmd) -> Result<()> {
    let span = tracing::info_span!("split_sentences", input = cmd.input.as_str());
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.input)?;
    let rendered = formats::txt::break_sentences(&raw);
    if cmd.stdout {
        print!("{rendered}");
        return Ok(());
    }

    let out_path = derive_output_path(&cmd.input, cmd.output.as_deref(), "after", None)?;
    write_output(&out_path, &rendered, cmd.overwrite)?;
    tracing::info!(path = out_path.as_str(), "wrote output file");
    Ok(())
}

fn read_input_to_string(input: &str) -> Result<String> {
    if input == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed reading stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed reading input: {input}"))
    }
}

pub(crate) fn log_cue_summary(cues: &[Cue], cfg: &Config) {
    tracing::info!(
        cues = cues.len(),
        duration_s = cues.iter().map(|c| c.end_seconds).fold(0.0, f64::max),
        "cue summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = cfg.logging.debug_cue_samples.min(cues.len());
        for c in cues.iter().take(n) {
            tracing::debug!(
                seq = c.sequence_number,
                start_s = c.start_seconds,
                end_s = c.end_seconds,
                dur_s = c.duration_seconds(),
                chars = c.text.chars().count(),
                "cue sample"
            );
        }
    }
}

/// `<stem>.<tag>.<ext>` next to the input, where `ext` defaults to the
/// input's own extension.
fn derive_output_path(
    input: &str,
    explicit: Option<&str>,
    tag: &str,
    ext: Option<&str>,
) -> Result<String> {
    if let Some(o) = explicit {
        return Ok(o.to_string());
    }

    if input == "-" {
        return Err(anyhow!(
            "output path required when input is stdin and --stdout is not set"
        ));
    }

    let p = Path::new(input);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("bad input filename"))?;

    let name = match ext.or_else(|| p.extension().and_then(|e| e.to_str())) {
        Some(ext) => format!("{stem}.{tag}.{ext}"),
        None => format!("{stem}.{tag}"),
    };

    let parent = p.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(name).to_string_lossy().to_string())
}

fn write_output(path: &str, data: &str, overwrite: bool) -> Result<()> {
    if Path::new(path).exists() && !overwrite {
        return Err(anyhow!(
            "refusing to overwrite existing file (pass --overwrite): {path}"
        ));
    }
    fs::write(path, data).with_context(|| format!("failed writing {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_follow_the_input() {
        assert_eq!(
            derive_output_path("subs/captions.srt", None, "merged", Some("srt")).unwrap(),
            Path::new("subs")
                .join("captions.merged.srt")
                .to_string_lossy()
                .into_owned()
        );
        assert_eq!(
            derive_output_path("trapping.txt", None, "after", None).unwrap(),
            "trapping.after.txt"
        );
        assert_eq!(
            derive_output_path("notes", None, "after", None).unwrap(),
            "notes.after"
        );
        assert_eq!(
            derive_output_path("-", Some("out.srt"), "merged", None).unwrap(),
            "out.srt"
        );
        assert!(derive_output_path("-", None, "merged", None).is_err());
    }

    #[test]
    fn merge_writes_next_to_input_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("captions.srt");
        fs::write(
            &input,
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,000 --> 00:00:03,000\nthere.\n",
        )
        .unwrap();

        let cmd = || MergeCmd {
            input: input.to_string_lossy().to_string(),
            output: None,
            stdout: false,
            overwrite: false,
        };
        run_merge(cmd(), &Config::default()).unwrap();

        let out = fs::read_to_string(dir.path().join("captions.merged.srt")).unwrap();
        assert_eq!(out, "1\n00:00:01,000 --> 00:00:03,000\nHello there.\n\n");
        assert!(run_merge(cmd(), &Config::default()).is_err());
    }

    #[test]
    fn parse_writes_requested_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.srt");
        let output = dir.path().join("a.json");
        fs::write(&input, "00:00:01.000 --> 00:00:02.000\n<i>hi</i>").unwrap();

        run_parse(
            ParseCmd {
                input: input.to_string_lossy().to_string(),
                format: OutputFormat::Json,
                output: Some(output.to_string_lossy().to_string()),
                overwrite: false,
            },
            &Config::default(),
        )
        .unwrap();

        let cues = formats::json::parse_json(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "hi");
    }

    #[test]
    fn parse_honors_bare_json_setting() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.srt");
        let output = dir.path().join("a.json");
        fs::write(&input, "00:00:01.000 --> 00:00:02.000\nhi").unwrap();

        let mut cfg = Config::default();
        cfg.formats.json.wrapped = false;
        run_parse(
            ParseCmd {
                input: input.to_string_lossy().to_string(),
                format: OutputFormat::Json,
                output: Some(output.to_string_lossy().to_string()),
                overwrite: false,
            },
            &cfg,
        )
        .unwrap();

        let raw = fs::read_to_string(output).unwrap();
        assert!(raw.trim_start().starts_with('['));
        assert_eq!(formats::json::parse_json(&raw).unwrap()[0].text, "hi");
    }
}
