//! Four-slot alive/eliminated status and its glyph encodings.
//!
//! The same status has two textual forms:
//! - display glyphs (`✅` / `❌`) used by the editor and its table view
//! - document glyphs (`🟩` / `🟥`) written to the persisted HTML
//!
//! Translation between the two happens only at the codec boundary.

use std::fmt;

/// Number of status slots carried by every row
pub const STATUS_SLOTS: usize = 4;

/// Display glyph for an alive slot
pub const DISPLAY_ALIVE: char = '✅';
/// Display glyph for an eliminated slot
pub const DISPLAY_ELIMINATED: char = '❌';
/// Document glyph for an alive slot
pub const DOCUMENT_ALIVE: char = '🟩';
/// Document glyph for an eliminated slot
pub const DOCUMENT_ELIMINATED: char = '🟥';

/// Emoji presentation selector; carries no slot of its own.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Alive/eliminated flags for exactly four slots.
///
/// `true` is alive. The default status has every slot eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status([bool; STATUS_SLOTS]);

impl Status {
    /// Creates a status from explicit slot flags.
    pub fn new(slots: [bool; STATUS_SLOTS]) -> Self {
        Self(slots)
    }

    /// Every slot eliminated.
    pub fn eliminated() -> Self {
        Self::default()
    }

    /// Returns the slot flags.
    pub fn slots(&self) -> [bool; STATUS_SLOTS] {
        self.0
    }

    /// Flips one slot and returns its new value.
    ///
    /// Returns `None` (and changes nothing) when `slot` is out of range.
    pub fn toggle(&mut self, slot: usize) -> Option<bool> {
        let flag = self.0.get_mut(slot)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Number of alive slots.
    pub fn alive_count(&self) -> usize {
        self.0.iter().filter(|alive| **alive).count()
    }

    /// Renders with display glyphs.
    pub fn to_display(&self) -> String {
        self.render(DISPLAY_ALIVE, DISPLAY_ELIMINATED)
    }

    /// Renders with document glyphs.
    pub fn to_document(&self) -> String {
        self.render(DOCUMENT_ALIVE, DOCUMENT_ELIMINATED)
    }

    fn render(&self, alive: char, eliminated: char) -> String {
        self.0
            .iter()
            .map(|is_alive| if *is_alive { alive } else { eliminated })
            .collect()
    }

    /// Parses a glyph string in either encoding.
    ///
    /// Whitespace and emoji variation selectors are ignored. Alive glyphs of
    /// either encoding map to alive; any other glyph counts as an eliminated
    /// slot. Short strings are padded with eliminated slots and long strings
    /// are truncated; the returned [`ParsedStatus`] records the original
    /// glyph count so callers can surface the repair.
    pub fn parse_glyphs(text: &str) -> ParsedStatus {
        let mut slots = [false; STATUS_SLOTS];
        let mut glyph_count = 0;

        for glyph in text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != VARIATION_SELECTOR)
        {
            if glyph_count < STATUS_SLOTS {
                slots[glyph_count] = is_alive_glyph(glyph);
            }
            glyph_count += 1;
        }

        ParsedStatus {
            status: Self(slots),
            glyph_count,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

fn is_alive_glyph(glyph: char) -> bool {
    glyph == DISPLAY_ALIVE || glyph == DOCUMENT_ALIVE
}

/// Result of [`Status::parse_glyphs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedStatus {
    /// Normalized four-slot status
    pub status: Status,
    /// Number of glyphs found before padding/truncation
    pub glyph_count: usize,
}

impl ParsedStatus {
    /// Whether the source had to be padded or truncated.
    pub fn was_repaired(&self) -> bool {
        self.glyph_count != STATUS_SLOTS
    }
}
