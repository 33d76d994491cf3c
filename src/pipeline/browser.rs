use image::RgbImage;

use crate::error::Result;
use crate::store::Flashcard;

/// Cursor over a loaded collection. Moving past either end stays put.
#[derive(Debug, Clone, Default)]
pub struct Browser {
    cards: Vec<Flashcard>,
    cursor: usize,
}

impl Browser {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self { cards, cursor: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.cursor)
    }

    pub fn current_image(&self) -> Option<Result<RgbImage>> {
        self.current().map(Flashcard::decode_image)
    }

    /// One-based position and total, for "Card 2 of 5". `None` when empty.
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.is_empty()).then(|| (self.cursor + 1, self.cards.len()))
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.cards.len()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn next(&mut self) -> Option<&Flashcard> {
        if self.has_next() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn previous(&mut self) -> Option<&Flashcard> {
        if self.has_previous() {
            self.cursor -= 1;
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cards(n: usize) -> Vec<Flashcard> {
        (0..n)
            .map(|i| Flashcard {
                id: format!("id{i}"),
                image: String::new(),
                text: format!("card {i}"),
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut browser = Browser::new(cards(3));
        assert_eq!(browser.position(), Some((1, 3)));
        assert!(!browser.has_previous());

        assert_eq!(browser.previous().unwrap().id, "id0");
        assert_eq!(browser.next().unwrap().id, "id1");
        assert_eq!(browser.next().unwrap().id, "id2");
        assert_eq!(browser.next().unwrap().id, "id2");
        assert!(!browser.has_next());
        assert_eq!(browser.position(), Some((3, 3)));

        for _ in 0..5 {
            browser.previous();
        }
        assert_eq!(browser.current().unwrap().id, "id0");
    }

    #[test]
    fn empty_collection_has_no_card() {
        let mut browser = Browser::new(Vec::new());
        assert!(browser.is_empty());
        assert!(browser.current().is_none());
        assert!(browser.next().is_none());
        assert!(browser.previous().is_none());
        assert_eq!(browser.position(), None);
        assert!(!browser.has_next() && !browser.has_previous());
        assert!(browser.current_image().is_none());
    }

    #[test]
    fn single_card() {
        let mut browser = Browser::new(cards(1));
        assert_eq!(browser.next().unwrap().id, "id0");
        assert_eq!(browser.previous().unwrap().id, "id0");
        assert_eq!(browser.position(), Some((1, 1)));
    }
}
