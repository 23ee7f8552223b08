//! Position save format.
//!
//! A save holds only the two ship positions, truncated to integers, one ship
//! per line:
//!
//! ```text
//! x1 y1
//! x2 y2
//! ```
//!
//! Scores, lives and every other entity are not persisted.
//!
//! ```
//! use duelwing_core::save::SavedPositions;
//! use glam::Vec2;
//!
//! let save = SavedPositions::from_positions([Vec2::new(100.7, 400.2), Vec2::new(-3.9, 12.0)]);
//! assert_eq!(save.encode(), "100 400\n-3 12\n");
//! assert_eq!(SavedPositions::parse("100 400\n-3 12\n").unwrap(), save);
//! ```

use std::fmt;
use std::str::FromStr;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::entity::ShipId;
use crate::error::{GameError, Result};

/// Integer positions of both ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPositions {
    ships: [IVec2; 2],
}

impl SavedPositions {
    /// Captures positions indexed by [`ShipId::index`], truncating toward zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_positions(positions: [Vec2; 2]) -> Self {
        Self {
            ships: positions.map(|p| IVec2::new(p.x as i32, p.y as i32)),
        }
    }

    /// Saved position of `ship`.
    #[must_use]
    pub fn position(&self, ship: ShipId) -> Vec2 {
        self.ships[ship.index()].as_vec2()
    }

    /// Renders the two-line save text.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses save text.
    ///
    /// Exactly two non-empty lines of two integers are expected; blank
    /// trailing lines are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SaveFormat`] naming the first offending line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());
        let mut ships = [IVec2::ZERO; 2];
        for (slot, ship) in ships.iter_mut().enumerate() {
            let Some((index, line)) = lines.next() else {
                return Err(GameError::SaveFormat {
                    line: slot + 1,
                    reason: "missing ship position".into(),
                });
            };
            *ship = parse_line(index + 1, line)?;
        }
        if let Some((index, _)) = lines.next() {
            return Err(GameError::SaveFormat {
                line: index + 1,
                reason: "unexpected trailing data".into(),
            });
        }
        Ok(Self { ships })
    }
}

fn parse_line(line: usize, text: &str) -> Result<IVec2> {
    let malformed = |reason: &str| GameError::SaveFormat {
        line,
        reason: reason.to_owned(),
    };

    let mut fields = text.split_whitespace();
    let mut coordinate = || -> Result<i32> {
        let field = fields.next().ok_or_else(|| malformed("expected two integers"))?;
        field
            .parse()
            .map_err(|_| malformed(&format!("`{field}` is not an integer")))
    };
    let x = coordinate()?;
    let y = coordinate()?;
    if fields.next().is_some() {
        return Err(malformed("expected two integers"));
    }
    Ok(IVec2::new(x, y))
}

impl fmt::Display for SavedPositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ship in &self.ships {
            writeln!(f, "{} {}", ship.x, ship.y)?;
        }
        Ok(())
    }
}

impl FromStr for SavedPositions {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
