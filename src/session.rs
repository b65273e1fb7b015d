use anyhow::Result;
use std::{
    io::{self, BufRead},
    path::PathBuf,
    time::Instant,
};

use crate::{
    app::log_cue_summary,
    cli::PlayCmd,
    command::{Command, SwipeDetector},
    config::Config,
    controller::Controller,
    formats::time::format_seconds,
    media::{MediaSurface, SimulatedSurface},
    source::DirSource,
    store::{FileStore, MemoryStore, StateStore},
    view::{ConsoleView, render_current},
};

/// Position reports are emitted at roughly this spacing while ticking.
const TIME_UPDATE_STEP: f64 = 0.25;

/// One `tick` runs at most a day of media time.
const MAX_CLOCK_STEPS: u64 = 4 * 60 * 60 * 24;

const HELP: &str = "\
keys:   ,  .  (or left/right)  previous / next sentence
        r  m                   replay current sentence
        h                      blur/unblur text
        space                  play / pause
lines:  goto N                 jump to sentence #N
        tick SECONDS           let the video run
        wheel DX               horizontal swipe
        list | lock            toggle sentence list / video lock
        load FILE | media FILE load subtitles (.srt or .json) / media
        notes TEXT             replace notes
        show | help | quit
";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Tick(f64),
    Wheel(f64),
    LoadSubtitles(String),
    LoadMedia(String),
    Notes(String),
    Show,
    Help,
    Quit,
}

/// Maps one line of terminal input to an action. Unknown lines yield `None`.
pub fn parse_line(line: &str) -> Option<Input> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line == " " {
        return Some(Input::Command(Command::TogglePlayback));
    }

    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    if rest.is_empty() {
        if let Some(cmd) = Command::from_key(word) {
            return Some(Input::Command(cmd));
        }
    }

    let input = match word {
        "left" | "prev" => Input::Command(Command::Previous),
        "right" | "next" => Input::Command(Command::Next),
        "space" => Input::Command(Command::TogglePlayback),
        "list" => Input::Command(Command::ToggleSentenceList),
        "lock" => Input::Command(Command::ToggleVideoLock),
        // Sentences are numbered from 1 on screen.
        "goto" => Input::Command(Command::GoTo(rest.parse::<i64>().ok()?.saturating_sub(1))),
        "tick" => Input::Tick(rest.parse::<f64>().ok().filter(|s| s.is_finite())?),
        "wheel" => Input::Wheel(rest.parse::<f64>().ok()?),
        "load" if !rest.is_empty() => Input::LoadSubtitles(rest.to_string()),
        "media" if !rest.is_empty() => Input::LoadMedia(rest.to_string()),
        "notes" => Input::Notes(rest.to_string()),
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

pub fn run_play(cmd: PlayCmd, cfg: &Config) -> Result<()> {
    let media = cmd.media.unwrap_or_else(|| cfg.player.default_media.clone());
    let subtitles = cmd
        .subtitles
        .unwrap_or_else(|| cfg.player.default_subtitles.clone());
    let media_dir = cmd
        .media_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.player.media_dir));
    let state_dir = cmd
        .state_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.player.state_dir));

    let span = tracing::info_span!("play", media = media.as_str(), subtitles = subtitles.as_str());
    let _g = span.enter();

    let source = DirSource::new(&media_dir);
    let defaults = Defaults {
        media: &media,
        subtitles: &subtitles,
        fresh: cmd.fresh,
    };

    if cmd.no_save {
        tracing::info!("session will not be saved");
        let controller = Controller::new(
            SimulatedSurface::new(),
            MemoryStore::new(),
            &cfg.player.storage_key,
        );
        drive(controller, &source, defaults, cfg)
    } else {
        let store = FileStore::new(&state_dir);
        tracing::info!(state = %store.path_for(&cfg.player.storage_key).display(), "session store");
        let controller = Controller::new(SimulatedSurface::new(), store, &cfg.player.storage_key);
        drive(controller, &source, defaults, cfg)
    }
}

struct Defaults<'a> {
    media: &'a str,
    subtitles: &'a str,
    /// Skip the saved session.
    fresh: bool,
}

fn drive<S: StateStore>(
    mut controller: Controller<SimulatedSurface, S>,
    source: &DirSource,
    defaults: Defaults<'_>,
    cfg: &Config,
) -> Result<()> {
    controller.add_observer(Box::new(ConsoleView::new(
        io::stdout(),
        cfg.display.wrap_width,
    )));

    let started_up = if defaults.fresh {
        controller.load_media(defaults.media);
        controller
            .load_subtitles(source, defaults.subtitles)
            .map(|_| ())
    } else {
        controller.bootstrap(source, defaults.media, defaults.subtitles)
    };
    if let Err(e) = started_up {
        tracing::warn!(error = %e, "starting without subtitles");
    }
    log_cue_summary(&controller.state().cues, cfg);

    let mut swipe = SwipeDetector::new(
        cfg.navigation.swipe_threshold,
        cfg.navigation.swipe_cooldown_ms,
    );
    let started = Instant::now();

    println!("type 'help' for keys");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some(input) = parse_line(&line) else {
            if !line.trim().is_empty() {
                println!("unknown input: {}", line.trim());
            }
            continue;
        };

        match input {
            Input::Command(c) => c.apply(&mut controller),
            Input::Tick(seconds) => run_clock(&mut controller, seconds),
            Input::Wheel(dx) => {
                let now_ms = started.elapsed().as_millis() as u64;
                if let Some(c) = swipe.on_wheel(dx, now_ms) {
                    c.apply(&mut controller);
                }
            }
            Input::LoadSubtitles(name) => {
                if let Err(e) = controller.load_subtitles(source, &name) {
                    println!("could not load {name}: {e:#}");
                }
            }
            Input::LoadMedia(name) => controller.load_media(&name),
            Input::Notes(text) => controller.set_notes(text),
            Input::Show => print!("{}", render_status(&controller)),
            Input::Help => print!("{HELP}"),
            Input::Quit => break,
        }
    }

    tracing::info!(
        index = controller.state().current_index_signed(),
        "session ended"
    );
    Ok(())
}

fn render_status<S: StateStore>(controller: &Controller<SimulatedSurface, S>) -> String {
    let media = controller.media();
    let mut out = render_current(controller.state());
    out.push_str(&format!(
        "media: {} at {} ({}, controls {})\n",
        media.source().unwrap_or("none"),
        format_seconds(media.position()),
        if media.is_paused() { "paused" } else { "playing" },
        if media.controls_enabled() { "on" } else { "off" },
    ));
    if let Some(w) = controller.active_watch() {
        out.push_str(&format!("stops at {}\n", format_seconds(w.end_seconds)));
    }
    if !controller.state().notes.is_empty() {
        out.push_str(&format!("notes: {}\n", controller.state().notes));
    }
    out
}

/// Lets the simulated surface run for `seconds`, reporting each step to the
/// controller the way a video element fires time updates. Stops early once
/// the surface is paused.
fn run_clock<S: StateStore>(controller: &mut Controller<SimulatedSurface, S>, seconds: f64) {
    if seconds.is_nan() || seconds <= 0.0 {
        return;
    }
    let steps = (seconds / TIME_UPDATE_STEP).ceil().min(MAX_CLOCK_STEPS as f64) as u64;

    let mut remaining = seconds;
    for _ in 0..steps {
        if controller.media().is_paused() {
            break;
        }
        let step = remaining.min(TIME_UPDATE_STEP);
        remaining -= step;
        let position = controller.media_mut().advance(step);
        controller.on_time_update(position);
    }
}
