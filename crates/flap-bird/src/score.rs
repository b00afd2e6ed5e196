/// Accumulates survival-time score and pass bonuses, and owns the
/// display strings the UI layer reads back. Purely in-memory; nothing
/// survives a reset.
#[derive(Debug, Default)]
pub struct ScoreKeeper {
    score: u32,
    last_delta: u32,
    delta_text: Option<String>,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The most recent increment.
    pub fn last_delta(&self) -> u32 {
        self.last_delta
    }

    /// Transient "+N" text, if one is currently shown.
    pub fn delta_display(&self) -> Option<&str> {
        self.delta_text.as_deref()
    }

    /// Absolute set. Clears any transient delta display.
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
        self.last_delta = 0;
        self.delta_text = None;
    }

    /// Add `delta`. When `show_change` is set, the "+N" text goes up
    /// and the caller is expected to schedule its one-shot clear.
    pub fn add(&mut self, delta: u32, show_change: bool) {
        self.score += delta;
        self.last_delta = delta;
        if show_change {
            self.delta_text = Some(format!("+{delta}"));
        }
    }

    /// Take the transient display down (one-shot timer target).
    pub fn clear_delta_display(&mut self) {
        self.delta_text = None;
    }
}
