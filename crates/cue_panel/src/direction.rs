//! Text direction as seen by entrance handlers

use serde::{Deserialize, Serialize};

/// Writing direction of the host document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Direction input to a handler: the document direction plus the panel's
/// `force_ltr` override
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Direction {
    pub force_ltr: bool,
    pub document: TextDirection,
}

impl Direction {
    pub fn new(force_ltr: bool, document: TextDirection) -> Self {
        Self {
            force_ltr,
            document,
        }
    }

    /// Direction the panel actually lays out in
    pub fn effective(&self) -> TextDirection {
        if self.force_ltr {
            TextDirection::Ltr
        } else {
            self.document
        }
    }

    /// +1.0 when the inline start edge is on the left, -1.0 otherwise
    pub fn inline_sign(&self) -> f32 {
        match self.effective() {
            TextDirection::Ltr => 1.0,
            TextDirection::Rtl => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_ltr_wins() {
        let rtl = Direction::new(false, TextDirection::Rtl);
        assert_eq!(rtl.effective(), TextDirection::Rtl);
        assert_eq!(rtl.inline_sign(), -1.0);

        let forced = Direction::new(true, TextDirection::Rtl);
        assert_eq!(forced.effective(), TextDirection::Ltr);
        assert_eq!(forced.inline_sign(), 1.0);
    }
}
