//! Task decks.

use alloc::vec::Vec;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::task::Task;

/// An ordered pile of tasks. Cards are drawn from the end.
///
/// A deck is shuffled once when it is built and never reshuffled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    cards: Vec<Task>,
}

impl Deck {
    /// Creates an empty deck.
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Builds a deck holding a uniformly random permutation of `tasks`.
    ///
    /// The input slice is left untouched.
    pub fn shuffled<R: Rng + ?Sized>(tasks: &[Task], rng: &mut R) -> Self {
        let mut cards = tasks.to_vec();
        cards.shuffle(rng);
        Self { cards }
    }

    /// Builds an unshuffled deck that yields `draw_order` front to back.
    ///
    /// Useful for scripted play and tests.
    #[must_use]
    pub fn stacked<I>(draw_order: I) -> Self
    where
        I: IntoIterator<Item = Task>,
    {
        let mut cards: Vec<Task> = draw_order.into_iter().collect();
        cards.reverse();
        Self { cards }
    }

    /// Draws the top card.
    ///
    /// Returns `None` when the deck is empty; the deck stays empty.
    pub fn draw(&mut self) -> Option<Task> {
        self.cards.pop()
    }

    /// Returns the number of cards left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the deck is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterates the remaining cards, bottom first.
    pub fn iter(&self) -> core::slice::Iter<'_, Task> {
        self.cards.iter()
    }
}
