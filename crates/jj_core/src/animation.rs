//! Frame-count sprite animation.
//!
//! An [`Animator`] cycles a fixed list of image keys. Time is counted in
//! frames, not seconds: the frame loop calls [`Animator::advance`] once per
//! frame for animations that should move, and leaves pose-only animators
//! untouched.

#[derive(Debug, Clone)]
pub struct Animator {
    frames: Vec<&'static str>,
    period_frames: u32,
    looping: bool,
    index: usize,
    counter: u32,
}

impl Animator {
    pub const DEFAULT_PERIOD: u32 = 60;

    pub fn new(frames: &[&'static str], period_frames: u32, looping: bool) -> Self {
        assert!(!frames.is_empty(), "animator needs at least one frame");
        Self {
            frames: frames.to_vec(),
            period_frames,
            looping,
            index: 0,
            counter: 0,
        }
    }

    /// Single-image animator used for static poses.
    pub fn still(frame: &'static str) -> Self {
        Self::new(&[frame], Self::DEFAULT_PERIOD, true)
    }

    pub fn current(&self) -> &'static str {
        self.frames[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) {
        self.counter += 1;
        if self.counter <= self.period_frames {
            return;
        }
        if self.index + 1 < self.frames.len() {
            self.index += 1;
        } else if self.looping {
            self.index = 0;
        }
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches_frame_after_period() {
        let mut anim = Animator::new(&["walk_0", "walk_1"], 30, true);
        for _ in 0..30 {
            anim.advance();
        }
        assert_eq!(anim.current(), "walk_0");
        anim.advance();
        assert_eq!(anim.current(), "walk_1");
    }

    #[test]
    fn looping_wraps_to_first_frame() {
        let mut anim = Animator::new(&["a", "b"], 2, true);
        for _ in 0..6 {
            anim.advance();
        }
        assert_eq!(anim.current(), "a");
        assert_eq!(anim.index(), 0);
    }

    #[test]
    fn non_looping_holds_last_frame() {
        let mut anim = Animator::new(&["a", "b", "c"], 1, false);
        for _ in 0..20 {
            anim.advance();
        }
        assert_eq!(anim.current(), "c");
    }

    #[test]
    fn still_never_changes() {
        let mut anim = Animator::still("stand");
        for _ in 0..500 {
            anim.advance();
        }
        assert_eq!(anim.current(), "stand");
    }
}
