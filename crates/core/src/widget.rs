//! Randomised digit pickers.

use std::fmt;

use crate::random::{self, RandomSource};

/// Digits offered for every slot.
pub const DIGITS: [u8; 5] = [1, 2, 3, 4, 5];

/// 3×3 pip layout of a die face.
pub type PipGrid = [[bool; 3]; 3];

/// How the options of a picker are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStyle {
    /// Plain numerals.
    Numbers,
    /// Framed die faces.
    Dice,
    /// Loose pip clusters without a frame.
    Spots,
}

impl InputStyle {
    /// Every style, in draw order.
    pub const ALL: [InputStyle; 3] = [InputStyle::Numbers, InputStyle::Dice, InputStyle::Spots];

    /// Pick a style uniformly.
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        Self::ALL[rng.next_index(Self::ALL.len())]
    }

    /// Short label for headings.
    pub fn label(self) -> &'static str {
        match self {
            InputStyle::Numbers => "Numbers",
            InputStyle::Dice => "Dice",
            InputStyle::Spots => "Spots",
        }
    }
}

impl fmt::Display for InputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Open picker for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPicker {
    /// Slot the picked digit is written to.
    pub slot: usize,
    /// Presentation of the options.
    pub style: InputStyle,
    /// The digits 1–5 in shuffled order.
    pub options: [u8; 5],
    cursor: usize,
}

impl OptionPicker {
    /// Draw a style and a shuffled option order for `slot`.
    pub fn random(slot: usize, rng: &mut dyn RandomSource) -> Self {
        let style = InputStyle::random(rng);
        let mut options = DIGITS;
        random::shuffle(rng, &mut options);
        Self {
            slot,
            style,
            options,
            cursor: 0,
        }
    }

    /// Move the highlight, wrapping at both ends.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    /// Highlighted option index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Highlight the option at `index`. Out-of-range indices are ignored.
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index >= self.options.len() {
            return false;
        }
        self.cursor = index;
        true
    }

    /// Digit under the highlight.
    pub fn highlighted(&self) -> u8 {
        self.options[self.cursor]
    }
}

/// Pip layout for a digit in `1..=5`.
pub fn pips(digit: u8) -> Option<PipGrid> {
    const O: bool = false;
    const X: bool = true;
    let grid = match digit {
        1 => [[O, O, O], [O, X, O], [O, O, O]],
        2 => [[X, O, O], [O, O, O], [O, O, X]],
        3 => [[X, O, O], [O, X, O], [O, O, X]],
        4 => [[X, O, X], [O, O, O], [X, O, X]],
        5 => [[X, O, X], [O, X, O], [X, O, X]],
        _ => return None,
    };
    Some(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SeededRandom, SequenceRandom};

    #[test]
    fn pip_counts_match_digits() {
        for digit in DIGITS {
            let grid = pips(digit).unwrap();
            let count = grid.iter().flatten().filter(|&&pip| pip).count();
            assert_eq!(count, digit as usize);
        }
        assert!(pips(0).is_none());
        assert!(pips(6).is_none());
    }

    #[test]
    fn options_are_a_permutation() {
        let mut rng = SeededRandom::new(3);
        for slot in 0..20 {
            let picker = OptionPicker::random(slot % 5, &mut rng);
            let mut sorted = picker.options;
            sorted.sort_unstable();
            assert_eq!(sorted, DIGITS);
        }
    }

    #[test]
    fn style_follows_first_draw() {
        let mut rng = SequenceRandom::new(vec![1, 0]);
        let picker = OptionPicker::random(2, &mut rng);
        assert_eq!(picker.style, InputStyle::Dice);
        assert_eq!(picker.slot, 2);
    }

    #[test]
    fn cursor_wraps() {
        let mut picker = OptionPicker {
            slot: 0,
            style: InputStyle::Numbers,
            options: [4, 2, 5, 1, 3],
            cursor: 0,
        };
        picker.move_cursor(-1);
        assert_eq!(picker.highlighted(), 3);
        picker.move_cursor(2);
        assert_eq!(picker.highlighted(), 2);
    }

    #[test]
    fn set_cursor_rejects_out_of_range() {
        let mut rng = SequenceRandom::new(vec![0]);
        let mut picker = OptionPicker::random(0, &mut rng);
        assert!(picker.set_cursor(4));
        assert_eq!(picker.cursor(), 4);
        assert!(!picker.set_cursor(5));
        assert_eq!(picker.cursor(), 4);
        assert_eq!(picker.highlighted(), picker.options[4]);
    }
}
