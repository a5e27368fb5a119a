//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed against the previous frame one row at a time: any row that
//! changed is rewritten in full, unchanged rows are skipped.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    keyboard_enhanced: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            keyboard_enhanced: false,
        }
    }

    /// Switch to raw mode and the alternate screen.
    ///
    /// Returns whether the terminal will report key releases.
    pub fn enter(&mut self) -> Result<bool> {
        terminal::enable_raw_mode()?;
        self.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        if self.keyboard_enhanced {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_buf()?;
        Ok(self.keyboard_enhanced)
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.keyboard_enhanced {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
            self.keyboard_enhanced = false;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Draw a frame, then keep a copy of it to diff the next frame against.
    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        match &self.last {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_rows_into(prev, fb, &mut self.buf)?;
            }
            _ => encode_full_into(fb, &mut self.buf)?,
        }
        self.flush_buf()?;

        match &mut self.last {
            Some(prev) => prev.clone_from(fb),
            None => self.last = Some(fb.clone()),
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style = None;
    for y in 0..fb.height() {
        encode_row(fb, y, &mut style, out)?;
    }
    finish(out)
}

/// Encode only the rows that differ between `prev` and `next`.
///
/// Both frames must have the same size; anything else is a full redraw.
pub fn encode_rows_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }
    let mut style = None;
    let mut any = false;
    for y in changed_rows(prev, next) {
        encode_row(next, y, &mut style, out)?;
        any = true;
    }
    if any {
        finish(out)?;
    }
    Ok(())
}

/// Rows whose cells differ between two equally sized frames.
pub fn changed_rows<'a>(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> impl Iterator<Item = u16> + 'a {
    (0..next.height()).filter(move |&y| prev.row(y) != next.row(y))
}

fn encode_row(fb: &FrameBuffer, y: u16, style: &mut Option<CellStyle>, out: &mut Vec<u8>) -> Result<()> {
    out.queue(cursor::MoveTo(0, y))?;
    for cell in fb.row(y) {
        if *style != Some(cell.style) {
            apply_style_into(out, cell.style)?;
            *style = Some(cell.style);
        }
        out.queue(Print(cell.ch))?;
    }
    Ok(())
}

fn finish(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
