//! Replay clock over a recording. The renderer's frame loop feeds in elapsed
//! seconds; whole records are stepped off at the configured rate and the
//! fractional remainder is carried, so playback speed is independent of the
//! display's frame rate.

/// Records per second the capture was taken at.
pub const DEFAULT_RATE: f32 = 30.0;

pub struct Player {
    record_count: usize,
    cursor: usize,
    accum: f32,
    playing: bool,
    looping: bool,
}

impl Player {
    pub fn new(record_count: usize) -> Player {
        Player {
            record_count,
            cursor: 0,
            accum: 0.0,
            playing: record_count > 0,
            looping: true,
        }
    }

    /// Advances the clock by `dt` seconds at `rate` records per second.
    /// Returns true when the cursor moved. With nothing to play, or a
    /// degenerate rate or time step, the tick is a no-op.
    pub fn update(&mut self, dt: f32, rate: f32) -> bool {
        if !self.playing || self.record_count == 0 {
            return false;
        }
        // An infinite rate implies a zero period, which the catch-up loop
        // below can never drain.
        if !(rate > 0.0) || !rate.is_finite() || !(dt >= 0.0) || !dt.is_finite() {
            return false;
        }
        let before = self.cursor;
        self.accum += dt;
        let period = 1.0 / rate;
        while self.accum >= period {
            self.accum -= period;
            self.step();
            if !self.playing {
                // hit the end without looping
                self.accum = 0.0;
                break;
            }
        }
        self.cursor != before
    }

    /// One cursor advance: wraps past the last record when looping, otherwise
    /// parks on it and pauses.
    pub fn step(&mut self) {
        if self.record_count == 0 {
            return;
        }
        if self.cursor + 1 == self.record_count && !self.looping {
            self.playing = false;
            return;
        }
        self.cursor = (self.cursor + 1) % self.record_count;
    }

    pub fn seek(&mut self, index: usize) {
        if self.record_count == 0 {
            return;
        }
        self.cursor = index.min(self.record_count - 1);
        self.accum = 0.0;
    }

    pub fn play(&mut self) {
        if self.record_count == 0 {
            return;
        }
        // Restarting play from a parked end position rewinds.
        if !self.looping && self.cursor + 1 == self.record_count {
            self.cursor = 0;
        }
        self.playing = true;
        self.accum = 0.0;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.accum = 0.0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.cursor = 0;
        self.accum = 0.0;
    }

    pub fn toggle_looping(&mut self) {
        self.looping = !self.looping;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_after_a_full_pass() {
        let mut player = Player::new(5);
        for _ in 0..5 {
            player.step();
        }
        assert_eq!(player.cursor(), 0);
    }

    #[test]
    fn update_steps_once_per_period() {
        let mut player = Player::new(100);
        let period = 1.0 / DEFAULT_RATE;

        assert!(player.update(period, DEFAULT_RATE));
        assert_eq!(player.cursor(), 1);

        // under one period: no movement, remainder carried
        assert!(!player.update(period * 0.5, DEFAULT_RATE));
        assert_eq!(player.cursor(), 1);
        assert!(player.update(period * 0.5, DEFAULT_RATE));
        assert_eq!(player.cursor(), 2);
    }

    #[test]
    fn long_frame_steps_multiple_records() {
        let mut player = Player::new(100);
        let period = 1.0 / DEFAULT_RATE;
        player.update(period * 3.5, DEFAULT_RATE);
        assert_eq!(player.cursor(), 3);
    }

    #[test]
    fn rate_scales_the_step_count() {
        // 0.5s period divides 3s exactly, no float residue
        let mut player = Player::new(100);
        player.update(3.0, 2.0);
        assert_eq!(player.cursor(), 6);

        let mut player = Player::new(100);
        player.update(3.0, 4.0);
        assert_eq!(player.cursor(), 12);
    }

    #[test]
    fn paused_player_ignores_time() {
        let mut player = Player::new(10);
        player.pause();
        assert!(!player.update(5.0, DEFAULT_RATE));
        assert_eq!(player.cursor(), 0);
    }

    #[test]
    fn empty_recording_never_moves() {
        let mut player = Player::new(0);
        assert!(!player.is_playing());
        assert!(!player.update(1.0, DEFAULT_RATE));
        player.step();
        player.seek(3);
        assert_eq!(player.cursor(), 0);
    }

    #[test]
    fn degenerate_rate_is_a_no_op() {
        let mut player = Player::new(10);
        assert!(!player.update(1.0, 0.0));
        assert!(!player.update(1.0, -30.0));
        assert!(!player.update(1.0, f32::NAN));
        // an infinite rate implies a zero period; the catch-up loop must
        // still terminate
        assert!(!player.update(0.016, f32::INFINITY));
        assert!(!player.update(0.016, f32::NEG_INFINITY));
        assert_eq!(player.cursor(), 0);
        assert!(player.is_playing());
    }

    #[test]
    fn degenerate_time_step_is_a_no_op() {
        let mut player = Player::new(10);
        assert!(!player.update(-1.0, DEFAULT_RATE));
        assert!(!player.update(f32::NAN, DEFAULT_RATE));
        assert!(!player.update(f32::INFINITY, DEFAULT_RATE));
        assert_eq!(player.cursor(), 0);
        assert!(player.is_playing());
    }

    #[test]
    fn non_looping_playback_parks_on_the_last_record() {
        let mut player = Player::new(3);
        player.set_looping(false);
        for _ in 0..10 {
            player.step();
        }
        assert_eq!(player.cursor(), 2);
        assert!(!player.is_playing());
    }

    #[test]
    fn play_from_the_parked_end_rewinds() {
        let mut player = Player::new(3);
        player.set_looping(false);
        player.update(1.0, DEFAULT_RATE);
        assert_eq!(player.cursor(), 2);

        player.play();
        assert_eq!(player.cursor(), 0);
        assert!(player.is_playing());
    }

    #[test]
    fn seek_clamps_to_the_recording() {
        let mut player = Player::new(4);
        player.seek(2);
        assert_eq!(player.cursor(), 2);
        player.seek(99);
        assert_eq!(player.cursor(), 3);
    }

    #[test]
    fn stop_rewinds_and_pauses() {
        let mut player = Player::new(4);
        player.update(1.0, DEFAULT_RATE);
        player.stop();
        assert_eq!(player.cursor(), 0);
        assert!(!player.is_playing());
    }
}
