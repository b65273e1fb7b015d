/// Playback device the controller drives. Position changes flow the other
/// way: the host forwards them to `Controller::on_time_update`.
pub trait MediaSurface {
    fn position(&self) -> f64;
    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Points the surface at a new source and reloads it.
    fn load_source(&mut self, source: &str);
    fn set_native_controls(&mut self, enabled: bool);
}

/// In-process surface whose clock only moves when `advance` is called.
#[derive(Debug, Clone)]
pub struct SimulatedSurface {
    position: f64,
    paused: bool,
    controls_enabled: bool,
    source: Option<String>,
}

impl Default for SimulatedSurface {
    fn default() -> Self {
        Self {
            position: 0.0,
            paused: true,
            controls_enabled: true,
            source: None,
        }
    }
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward while playing and returns the new position.
    pub fn advance(&mut self, seconds: f64) -> f64 {
        if !self.paused {
            self.position += seconds.max(0.0);
        }
        self.position
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl MediaSurface for SimulatedSurface {
    fn position(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn load_source(&mut self, source: &str) {
        tracing::debug!(source, "media source loaded");
        self.source = Some(source.to_string());
        self.position = 0.0;
        self.paused = true;
    }

    fn set_native_controls(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }
}
