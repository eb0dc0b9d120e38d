use std::time::Duration;

/// One 60 Hz slice.
const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// The delay and sound countdown timers.
///
/// Both decrement by exactly 1 per 1/60 s of wall-clock time and floor at
/// zero, regardless of how many instruction cycles ran in that interval.
/// The host feeds real elapsed time into [`advance`](Timers::advance);
/// the executor only reads `delay` and writes `delay`/`sound`.
#[derive(Debug, Default)]
pub struct Timers {
    delay: u8,
    sound: u8,
    accumulator: Duration,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// The host beeps while this is true.
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Fold elapsed wall-clock time into the accumulator, ticking once per
    /// full 1/60 s it contains. Leftover time carries to the next call.
    pub fn advance(&mut self, dt: Duration) {
        self.accumulator += dt;
        while self.accumulator >= TICK {
            self.accumulator -= TICK;
            self.tick();
        }
    }

    /// One 60 Hz slice: each counter moves toward zero by exactly 1.
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}
