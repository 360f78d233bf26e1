// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flashcard review deck.

use std::collections::BTreeSet;

use crate::model::Flashcard;

/// Cards shown before the tutor has generated any.
pub fn sample_deck() -> Vec<Flashcard> {
    vec![
        Flashcard::new("What is the derivative of x²?", "2x").with_subject("Calculus"),
        Flashcard::new(
            "Define photosynthesis",
            "The process by which plants convert light energy into chemical energy",
        )
        .with_subject("Biology"),
        Flashcard::new(
            "What is a metaphor?",
            "A figure of speech that makes a comparison between two unlike things without using \
             'like' or 'as'",
        )
        .with_subject("English"),
    ]
}

/// A deck with a cursor, a flip state, and per-card marks.
///
/// Marks are keyed by card position, so replacing the cards resets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
    mastered: BTreeSet<usize>,
    difficult: BTreeSet<usize>,
}

impl Default for FlashcardDeck {
    fn default() -> Self {
        Self::new(sample_deck())
    }
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            flipped: false,
            mastered: BTreeSet::new(),
            difficult: BTreeSet::new(),
        }
    }

    /// Swaps in a new set of cards; an empty set keeps the current deck.
    pub fn replace_cards(&mut self, cards: Vec<Flashcard>) -> bool {
        if cards.is_empty() {
            return false;
        }
        *self = Self::new(cards);
        true
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn mastered_count(&self) -> usize {
        self.mastered.len()
    }

    pub fn difficult_count(&self) -> usize {
        self.difficult.len()
    }

    pub fn is_mastered(&self, index: usize) -> bool {
        self.mastered.contains(&index)
    }

    pub fn is_difficult(&self, index: usize) -> bool {
        self.difficult.contains(&index)
    }

    pub fn next(&mut self) {
        if self.index + 1 < self.cards.len() {
            self.index += 1;
            self.flipped = false;
        }
    }

    pub fn previous(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            self.flipped = false;
        }
    }

    pub fn flip(&mut self) {
        if !self.cards.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    pub fn mark_mastered(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.mastered.insert(self.index);
        self.next();
    }

    pub fn mark_difficult(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.difficult.insert(self.index);
        self.next();
    }

    /// Position through the deck as a rounded percentage.
    pub fn progress(&self) -> u16 {
        if self.cards.is_empty() {
            return 0;
        }
        let percent = (self.index + 1) as f64 / self.cards.len() as f64 * 100.0;
        percent.round() as u16
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{sample_deck, FlashcardDeck};
    use crate::model::Flashcard;

    #[fixture]
    fn deck() -> FlashcardDeck {
        FlashcardDeck::default()
    }

    #[rstest]
    fn starts_on_first_sample_card(deck: FlashcardDeck) {
        assert_eq!(deck.len(), sample_deck().len());
        assert_eq!(deck.index(), 0);
        assert!(!deck.is_flipped());
        assert_eq!(deck.current().unwrap().answer(), "2x");
        assert_eq!(deck.progress(), 33);
    }

    #[rstest]
    fn navigation_is_bounded_and_resets_flip(mut deck: FlashcardDeck) {
        deck.previous();
        assert_eq!(deck.index(), 0);

        deck.flip();
        assert!(deck.is_flipped());
        deck.next();
        assert_eq!(deck.index(), 1);
        assert!(!deck.is_flipped());
        assert_eq!(deck.progress(), 67);

        deck.next();
        deck.flip();
        deck.next();
        assert_eq!(deck.index(), 2);
        assert!(deck.is_flipped(), "no-op at the end keeps the flip");
        assert_eq!(deck.progress(), 100);

        deck.previous();
        assert_eq!(deck.index(), 1);
        assert!(!deck.is_flipped());
    }

    #[rstest]
    fn marking_records_once_and_advances(mut deck: FlashcardDeck) {
        deck.mark_mastered();
        assert_eq!(deck.index(), 1);
        deck.previous();
        deck.mark_mastered();
        assert_eq!(deck.mastered_count(), 1);
        assert!(deck.is_mastered(0));

        deck.next();
        deck.mark_difficult();
        assert_eq!(deck.index(), 2);
        deck.mark_difficult();
        deck.mark_difficult();
        assert_eq!(deck.index(), 2);
        assert_eq!(deck.difficult_count(), 1);
        assert!(deck.is_difficult(2));
    }

    #[rstest]
    fn replacing_cards_resets_state(mut deck: FlashcardDeck) {
        deck.mark_mastered();
        assert!(!deck.replace_cards(Vec::new()));
        assert_eq!(deck.index(), 1);

        assert!(deck.replace_cards(vec![Flashcard::new("Cell", "Unit of life")]));
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.index(), 0);
        assert_eq!(deck.mastered_count(), 0);
        assert_eq!(deck.progress(), 100);
    }

    #[test]
    fn empty_deck_is_inert() {
        let mut deck = FlashcardDeck::new(Vec::new());
        deck.next();
        deck.flip();
        deck.mark_mastered();
        assert!(deck.current().is_none());
        assert!(!deck.is_flipped());
        assert_eq!(deck.mastered_count(), 0);
        assert_eq!(deck.progress(), 0);
    }
}
