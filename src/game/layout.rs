//! Mouse hit-rectangles for the menu-like boards
//!
//! Label widths depend on the font the presentation layer uses, so the
//! defaults here are placeholders it is expected to replace through the
//! setters once text is measured.

use glam::IVec2;

use crate::consts::*;
use crate::settings::Language;
use crate::sim::rect::Rect;

const LABEL_X: i32 = 400;
const LABEL_W: i32 = 600;
const LABEL_H: i32 = 80;

/// Labels laid out one per 100 units, starting at row 3
fn label_column(count: usize) -> Vec<Rect> {
    (0..count as i32)
        .map(|i| Rect::new(LABEL_X, (i + 3) * 100 - LABEL_H, LABEL_W, LABEL_H))
        .collect()
}

/// Rectangle of `size` centered on (cx, cy)
fn centered(cx: i32, cy: i32, size: IVec2) -> Rect {
    Rect::new(cx - size.x / 2, cy - size.y / 2, size.x, size.y)
}

/// Player select board widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRects {
    pub prev: Rect,
    /// The large ship preview, clicking it starts the game
    pub big: Rect,
    pub next: Rect,
}

impl PlayerRects {
    pub fn from_sizes(icon: IVec2, big: IVec2) -> Self {
        Self {
            prev: centered(ARENA_WIDTH / 4, 600, icon),
            big: centered(ARENA_WIDTH / 2, 600, big),
            next: centered(3 * ARENA_WIDTH / 4, 600, icon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub menu: Vec<Rect>,
    pub options: Vec<Rect>,
    pub player: PlayerRects,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            menu: label_column(7),
            options: label_column(4),
            player: PlayerRects::from_sizes(IVec2::new(100, 100), IVec2::new(400, 300)),
        }
    }
}

impl Layout {
    pub fn set_menu_rects(&mut self, rects: Vec<Rect>) {
        self.menu = rects;
    }

    pub fn set_options_rects(&mut self, rects: Vec<Rect>) {
        self.options = rects;
    }

    pub fn set_player_rects(&mut self, rects: PlayerRects) {
        self.player = rects;
    }

    /// Index of the first rectangle containing `p`
    pub fn hit(rects: &[Rect], p: IVec2) -> Option<usize> {
        rects.iter().position(|r| r.contains(p.x, p.y))
    }

    pub fn menu_hit(&self, p: IVec2) -> Option<usize> {
        Self::hit(&self.menu, p)
    }

    pub fn options_hit(&self, p: IVec2) -> Option<usize> {
        Self::hit(&self.options, p)
    }

    /// Language switch in the bottom-right corner, if `p` is on one
    pub fn language_hit(p: IVec2) -> Option<Language> {
        let pl = Rect::new(ARENA_WIDTH - 160, ARENA_HEIGHT - 60, 80, 60);
        let en = Rect::new(ARENA_WIDTH - 80, ARENA_HEIGHT - 60, 80, 60);
        if pl.contains(p.x, p.y) {
            Some(Language::Pl)
        } else if en.contains(p.x, p.y) {
            Some(Language::En)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_corners() {
        let pl = IVec2::new(ARENA_WIDTH - 120, ARENA_HEIGHT - 30);
        let en = IVec2::new(ARENA_WIDTH - 20, ARENA_HEIGHT - 30);
        assert_eq!(Layout::language_hit(pl), Some(Language::Pl));
        assert_eq!(Layout::language_hit(en), Some(Language::En));
        assert_eq!(Layout::language_hit(IVec2::new(10, 10)), None);
    }

    #[test]
    fn test_default_columns() {
        let layout = Layout::default();
        assert_eq!(layout.menu.len(), 7);
        assert_eq!(layout.options.len(), 4);
        assert_eq!(layout.menu_hit(IVec2::new(450, 250)), Some(0));
        assert_eq!(layout.options_hit(IVec2::new(450, 350)), Some(1));
        assert_eq!(layout.menu_hit(IVec2::new(100, 250)), None);
    }

    #[test]
    fn test_player_rects_centered() {
        let rects = PlayerRects::from_sizes(IVec2::new(100, 100), IVec2::new(400, 300));
        assert_eq!(rects.big.center(), IVec2::new(ARENA_WIDTH / 2, 600));
        assert!(rects.prev.right() < rects.big.x);
    }
}
