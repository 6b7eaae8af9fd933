//! State of one play session: the loaded sheet plus the code being entered.

use tracing::{debug, info};

use crate::{
    error::{SessionError, SubmitError},
    link,
    matcher::{self, CODE_LENGTH, WRONG_CODE_LABEL},
    random::RandomSource,
    sheet::Sheet,
    widget::{OptionPicker, DIGITS},
};

/// Five slots, each unset or holding a digit 1–5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnteredCode {
    slots: [Option<u8>; CODE_LENGTH],
}

impl EnteredCode {
    /// Digit in `slot`, if set.
    pub fn get(&self, slot: usize) -> Option<u8> {
        self.slots.get(slot).copied().flatten()
    }

    /// Write `digit` into `slot`.
    pub fn set(&mut self, slot: usize, digit: u8) -> Result<(), SessionError> {
        if !DIGITS.contains(&digit) {
            return Err(SessionError::DigitOutOfRange(digit));
        }
        let cell = self
            .slots
            .get_mut(slot)
            .ok_or(SessionError::SlotOutOfRange(slot))?;
        *cell = Some(digit);
        Ok(())
    }

    /// All slots set.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The five digits, once every slot is set.
    pub fn digits(&self) -> Option<[u8; CODE_LENGTH]> {
        let mut digits = [0; CODE_LENGTH];
        for (target, slot) in digits.iter_mut().zip(self.slots) {
            *target = slot?;
        }
        Some(digits)
    }

    /// Raw slot values.
    pub fn slots(&self) -> &[Option<u8>; CODE_LENGTH] {
        &self.slots
    }

    /// Unset every slot.
    pub fn clear(&mut self) {
        self.slots = [None; CODE_LENGTH];
    }
}

/// What to show after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Heading above the player.
    pub title: String,
    /// Embeddable preview URL.
    pub embed_url: String,
    /// Whether the code matched a record.
    pub matched: bool,
}

/// Session state owned by the UI controller.
#[derive(Debug, Clone)]
pub struct GameSession {
    sheet: Sheet,
    code: EnteredCode,
    active_slot: usize,
    picker: Option<OptionPicker>,
    wrong_code_label: String,
}

impl GameSession {
    /// Start a session over a loaded sheet.
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet,
            code: EnteredCode::default(),
            active_slot: 0,
            picker: None,
            wrong_code_label: WRONG_CODE_LABEL.to_string(),
        }
    }

    /// Override the title shown for fallback videos.
    pub fn with_wrong_code_label(mut self, label: impl Into<String>) -> Self {
        self.wrong_code_label = label.into();
        self
    }

    /// Loaded sheet.
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Code entered so far.
    pub fn code(&self) -> &EnteredCode {
        &self.code
    }

    /// Slot receiving the next pick.
    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    /// Open picker, if any.
    pub fn picker(&self) -> Option<&OptionPicker> {
        self.picker.as_ref()
    }

    /// Mutable access to the open picker.
    pub fn picker_mut(&mut self) -> Option<&mut OptionPicker> {
        self.picker.as_mut()
    }

    /// Highlight `slot` without opening a picker.
    pub fn set_active(&mut self, slot: usize) -> Result<(), SessionError> {
        if slot >= CODE_LENGTH {
            return Err(SessionError::SlotOutOfRange(slot));
        }
        self.active_slot = slot;
        Ok(())
    }

    /// Activate `slot` and open a freshly randomised picker for it.
    pub fn open_picker(
        &mut self,
        slot: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<&OptionPicker, SessionError> {
        self.set_active(slot)?;
        let picker = OptionPicker::random(slot, rng);
        debug!(slot, style = %picker.style, options = ?picker.options, "Picker opened");
        let picker = self.picker.insert(picker);
        Ok(&*picker)
    }

    /// Dismiss the picker without selecting.
    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Store `digit` in `slot`, close the picker and move on to the next
    /// slot when it is still unset.
    pub fn select(&mut self, slot: usize, digit: u8) -> Result<(), SessionError> {
        self.code.set(slot, digit)?;
        self.picker = None;
        if slot + 1 < CODE_LENGTH && self.code.get(slot + 1).is_none() {
            self.active_slot = slot + 1;
        }
        Ok(())
    }

    /// Commit the highlighted option of the open picker, if any.
    pub fn select_highlighted(&mut self) -> Result<Option<u8>, SessionError> {
        let Some(picker) = self.picker.as_ref() else {
            return Ok(None);
        };
        let (slot, digit) = (picker.slot, picker.highlighted());
        self.select(slot, digit)?;
        Ok(Some(digit))
    }

    /// All five slots are filled, so the code may be submitted.
    pub fn is_complete(&self) -> bool {
        self.code.is_complete()
    }

    /// Resolve the entered code and produce the embeddable result.
    pub fn submit(&self, rng: &mut dyn RandomSource) -> Result<Outcome, SubmitError> {
        let digits = self.code.digits().ok_or(SessionError::Incomplete)?;
        let resolution = matcher::resolve(
            &digits,
            &self.sheet.records,
            &self.sheet.fallbacks,
            rng,
        )?;
        let key = matcher::passcode_key(&digits);
        let Some(video_link) = resolution.video_link() else {
            info!(code = %key, "Nothing loaded to resolve against");
            return Err(SubmitError::NothingLoaded);
        };
        let embed_url = link::embed_url(video_link)?;
        info!(code = %key, matched = resolution.is_match(), "Code resolved");
        Ok(Outcome {
            title: resolution.title(&self.wrong_code_label).to_string(),
            embed_url,
            matched: resolution.is_match(),
        })
    }

    /// Clear the code for another attempt.
    pub fn reset(&mut self) {
        self.code.clear();
        self.picker = None;
        self.active_slot = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{LinkError, MatchError},
        random::SequenceRandom,
        sheet::parse_sheet,
    };

    fn session() -> GameSession {
        GameSession::new(parse_sheet(
            "Name,Passcode,Video,F1,F2,F3\n\
             Alice,1-2-3-4-5,https://drive.google.com/file/d/alice/view,https://drive.google.com/file/d/fb1/view,https://drive.google.com/file/d/fb2/view\n\
             Broken,2-2-2-2-2,not a link,x,y\n",
        ))
    }

    fn enter(session: &mut GameSession, digits: [u8; 5]) {
        for (slot, digit) in digits.into_iter().enumerate() {
            session.select(slot, digit).unwrap();
        }
    }

    #[test]
    fn selecting_advances_to_next_unset_slot() {
        let mut session = session();
        session.select(0, 3).unwrap();
        assert_eq!(session.active_slot(), 1);

        session.select(2, 4).unwrap();
        assert_eq!(session.active_slot(), 3);

        session.set_active(1).unwrap();
        session.select(1, 1).unwrap();
        assert_eq!(session.active_slot(), 1, "slot 2 already set, stay put");

        session.set_active(4).unwrap();
        session.select(4, 5).unwrap();
        assert_eq!(session.active_slot(), 4);
        assert!(!session.is_complete());
    }

    #[test]
    fn rejects_out_of_range_input() {
        let mut session = session();
        assert_eq!(session.select(5, 1), Err(SessionError::SlotOutOfRange(5)));
        assert_eq!(session.select(0, 6), Err(SessionError::DigitOutOfRange(6)));
        assert_eq!(session.select(0, 0), Err(SessionError::DigitOutOfRange(0)));
        assert_eq!(session.code().get(0), None);
    }

    #[test]
    fn picker_selection_fills_its_slot() {
        let mut session = session();
        let mut rng = SequenceRandom::new(vec![2, 0]);
        let options = session.open_picker(3, &mut rng).unwrap().options;
        assert_eq!(session.active_slot(), 3);

        session.picker_mut().unwrap().move_cursor(1);
        let chosen = session.select_highlighted().unwrap();
        assert_eq!(chosen, Some(options[1]));
        assert_eq!(session.code().get(3), Some(options[1]));
        assert!(session.picker().is_none());
        assert_eq!(session.active_slot(), 4);
    }

    #[test]
    fn submit_requires_complete_code() {
        let mut session = session();
        session.select(0, 1).unwrap();
        let mut rng = SequenceRandom::new(vec![0]);
        assert_eq!(
            session.submit(&mut rng),
            Err(SubmitError::Session(SessionError::Incomplete))
        );
    }

    #[test]
    fn submit_matches_and_embeds() {
        let mut session = session();
        enter(&mut session, [1, 2, 3, 4, 5]);
        let mut rng = SequenceRandom::new(vec![0]);
        let outcome = session.submit(&mut rng).unwrap();
        assert_eq!(outcome.title, "Alice");
        assert!(outcome.matched);
        assert_eq!(
            outcome.embed_url,
            "https://drive.google.com/file/d/alice/preview"
        );
    }

    #[test]
    fn wrong_code_uses_fallback_label() {
        let mut session = session().with_wrong_code_label("Nope");
        enter(&mut session, [5, 4, 3, 2, 1]);
        let mut rng = SequenceRandom::new(vec![1]);
        let outcome = session.submit(&mut rng).unwrap();
        assert_eq!(outcome.title, "Nope");
        assert!(!outcome.matched);
        assert_eq!(outcome.embed_url, "https://drive.google.com/file/d/fb2/preview");
    }

    #[test]
    fn unusable_link_is_reported() {
        let mut session = session();
        enter(&mut session, [2, 2, 2, 2, 2]);
        let mut rng = SequenceRandom::new(vec![0]);
        assert_eq!(
            session.submit(&mut rng),
            Err(SubmitError::Link(LinkError::Invalid {
                link: "not a link".to_string()
            }))
        );
    }

    #[test]
    fn empty_sheet_cannot_resolve() {
        let mut session = GameSession::new(Sheet::empty());
        enter(&mut session, [1, 1, 1, 1, 1]);
        let mut rng = SequenceRandom::new(vec![0]);
        assert_eq!(session.submit(&mut rng), Err(SubmitError::NothingLoaded));
    }

    #[test]
    fn records_without_fallbacks_break_the_invariant() {
        let mut session = GameSession::new(parse_sheet(
            "Name,Passcode,Video,F1,F2
Solo,1-1-1-1-1,https://x/d/solo,,
",
        ));
        enter(&mut session, [2, 2, 2, 2, 2]);
        let mut rng = SequenceRandom::new(vec![0]);
        assert_eq!(
            session.submit(&mut rng),
            Err(SubmitError::Match(MatchError::EmptyFallback))
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = session();
        enter(&mut session, [1, 2, 3, 4, 5]);
        let mut rng = SequenceRandom::new(vec![0]);
        session.open_picker(2, &mut rng).unwrap();
        session.reset();
        assert_eq!(session.code(), &EnteredCode::default());
        assert_eq!(session.active_slot(), 0);
        assert!(session.picker().is_none());
        assert!(!session.is_complete());
    }
}
