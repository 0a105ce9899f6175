use std::collections::VecDeque;

/// Up Up Down Down Left Right Left Right B A, as DOM key codes.
pub const KONAMI_CODE: [u32; 10] = [38, 38, 40, 40, 37, 39, 37, 39, 66, 65];

/// Sliding window over the most recent key codes.
#[derive(Clone, Debug, Default)]
pub struct KonamiDetector {
    window: VecDeque<u32>,
}

impl KonamiDetector {
    /// Feed one key code; true when it completes the sequence. The window is
    /// cleared on a match so the next activation needs the full sequence again.
    pub fn push(&mut self, key_code: u32) -> bool {
        self.window.push_back(key_code);
        if self.window.len() > KONAMI_CODE.len() {
            self.window.pop_front();
        }
        let matched = self.window.len() == KONAMI_CODE.len() && self.window.iter().eq(KONAMI_CODE.iter());
        if matched {
            self.window.clear();
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_sequence_after_noise() {
        let mut d = KonamiDetector::default();
        for code in [13, 38, 65] {
            assert!(!d.push(code));
        }
        let (last, head) = KONAMI_CODE.split_last().unwrap();
        for code in head {
            assert!(!d.push(*code));
        }
        assert!(d.push(*last));
    }

    #[test]
    fn window_resets_after_match() {
        let mut d = KonamiDetector::default();
        assert!(KONAMI_CODE.iter().any(|c| d.push(*c)));
        // The trailing "A" alone must not re-trigger.
        assert!(!d.push(65));
    }

    #[test]
    fn wrong_key_in_the_middle_breaks_the_match() {
        let mut d = KonamiDetector::default();
        for (i, code) in KONAMI_CODE.iter().enumerate() {
            let code = if i == 4 { 32 } else { *code };
            assert!(!d.push(code));
        }
    }
}
