/// A linearly eased change of one displayed value.
///
/// Retargeting mid-flight starts from the currently displayed value, so the
/// latest target always wins and nothing queues up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
}

impl Transition {
    /// A value at rest.
    pub fn settled(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start: 0.0,
            duration: 0.0,
        }
    }

    /// Final value of the current transition.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Displayed value at time `now` (seconds).
    pub fn value_at(&self, now: f64) -> f64 {
        let t = self.progress(now);
        self.from + (self.to - self.from) * t
    }

    pub fn is_running(&self, now: f64) -> bool {
        self.progress(now) < 1.0
    }

    /// Head towards `to` from wherever the value is displayed at `now`.
    pub fn retarget(&mut self, to: f64, now: f64, duration: f64) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
    }

    fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }
}
