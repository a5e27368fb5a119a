//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Piece, Shape};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Where the board frame landed in the last layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

/// Renders a snapshot: board, ghost, falling piece, side panel and overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Board frame placement for a viewport (border included).
    pub fn board_rect(&self, viewport: Viewport) -> BoardRect {
        let w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let h = BOARD_HEIGHT as u16 * self.cell_h + 2;
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        BoardRect { x, y, w, h }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    ///
    /// Callers can reuse one framebuffer across frames.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let rect = self.board_rect(viewport);
        let inner_w = rect.w.saturating_sub(2);
        let inner_h = rect.h.saturating_sub(2);

        fb.fill_rect(
            rect.x + 1,
            rect.y + 1,
            inner_w,
            inner_h,
            ' ',
            CellStyle::plain(Rgb::new(80, 80, 90), PLAY_BG),
        );
        draw_border(
            fb,
            rect,
            CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG),
        );

        let dot = CellStyle::plain(Rgb::new(90, 90, 100), PLAY_BG).dim();
        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Some(kind) => self.draw_block(fb, rect, x as i8, y as i8, *kind),
                    None => self.fill_cell(fb, rect, x as i8, y as i8, '·', dot),
                }
            }
        }

        let live = matches!(snap.phase, Phase::Playing | Phase::Paused);
        if let (true, Some(piece), Some(ghost_y)) = (live, snap.current, snap.ghost_y) {
            if ghost_y > piece.y {
                let ghost = CellStyle::plain(Rgb::new(140, 140, 140), PLAY_BG).dim();
                let landed = Piece { y: ghost_y, ..piece };
                for (x, y) in landed.cells() {
                    self.fill_cell(fb, rect, x, y, '░', ghost);
                }
            }
        }

        if let Some(piece) = snap.current {
            for (x, y) in piece.cells() {
                self.draw_block(fb, rect, x, y, piece.kind);
            }
        }

        self.draw_side_panel(fb, snap, viewport, rect);
        self.draw_overlay(fb, snap, rect);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Fill one board cell; cells outside the visible board are skipped.
    fn fill_cell(&self, fb: &mut FrameBuffer, rect: BoardRect, x: i8, y: i8, ch: char, style: CellStyle) {
        if !(0..BOARD_WIDTH as i8).contains(&x) || !(0..BOARD_HEIGHT as i8).contains(&y) {
            return;
        }
        let px = rect.x + 1 + x as u16 * self.cell_w;
        let py = rect.y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, rect: BoardRect, x: i8, y: i8, kind: ShapeKind) {
        let style = CellStyle::plain(shape_color(kind), PLAY_BG).bold();
        self.fill_cell(fb, rect, x, y, '█', style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, rect: BoardRect) {
        let panel_x = rect.x.saturating_add(rect.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::plain(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = rect.y;
        for (name, n) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        match snap.next {
            Some(kind) => {
                let shape = Shape::template(kind);
                let style = CellStyle::plain(shape_color(kind), SCREEN_BG).bold();
                for (dx, dy) in shape.filled() {
                    let px = panel_x.saturating_add(dx as u16 * self.cell_w);
                    fb.fill_rect(px, y.saturating_add(dy as u16), self.cell_w, 1, '█', style);
                }
            }
            None => {
                fb.put_char(panel_x, y, '-', value);
            }
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, rect: BoardRect) {
        let (title, hint) = if snap.quit_pending {
            ("QUIT GAME?", Some("Y / N"))
        } else {
            match snap.phase {
                Phase::Initial => ("PRESS ENTER", Some("TO START")),
                Phase::Paused => ("PAUSED", Some("P TO RESUME")),
                Phase::GameOver => ("GAME OVER", Some("ENTER TO RETRY")),
                Phase::Playing => return,
            }
        };

        let style = CellStyle::plain(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let mid_y = rect.y.saturating_add(rect.h / 2);
        fb.put_str_centered(rect.x, rect.w, mid_y, title, style);
        if let Some(hint) = hint {
            fb.put_str_centered(rect.x, rect.w, mid_y.saturating_add(1), hint, style.dim());
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, rect: BoardRect, style: CellStyle) {
    let BoardRect { x, y, w, h } = rect;
    if w < 2 || h < 2 {
        return;
    }
    let right = x + w - 1;
    let bottom = y + h - 1;

    fb.put_char(x, y, '┌', style);
    fb.put_char(right, y, '┐', style);
    fb.put_char(x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    fb.fill_rect(x + 1, y, w - 2, 1, '─', style);
    fb.fill_rect(x + 1, bottom, w - 2, 1, '─', style);
    fb.fill_rect(x, y + 1, 1, h - 2, '│', style);
    fb.fill_rect(right, y + 1, 1, h - 2, '│', style);
}

pub fn shape_color(kind: ShapeKind) -> Rgb {
    match kind {
        ShapeKind::T => Rgb::new(200, 120, 220),
        ShapeKind::O => Rgb::new(240, 220, 80),
        ShapeKind::L => Rgb::new(255, 165, 0),
        ShapeKind::J => Rgb::new(80, 120, 220),
        ShapeKind::I => Rgb::new(80, 220, 220),
    }
}
