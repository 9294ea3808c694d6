use anyhow::Context;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Stdout, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Cell {
    pub(crate) fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    fn blank() -> Self {
        Self::new(' ', Color::Reset, Color::Black)
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::blank(); (w as usize) * (h as usize)],
        }
    }

    #[inline]
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    /// Writes `text` on row `y`, keeping each cell's background.
    pub(crate) fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Color) {
        if y >= self.h {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let cx = x as usize + i;
            if cx >= self.w as usize {
                break;
            }
            let idx = self.idx(cx as u16, y);
            let bg = self.cells[idx].bg;
            self.cells[idx] = Cell::new(ch, fg, bg);
        }
    }
}

/// Owns the alternate screen; dropping it restores the terminal.
pub(crate) struct Terminal {
    out: Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    full_redraw: bool,
}

impl Terminal {
    /// Enters raw mode and the alternate screen. The value exists before any
    /// step that can fail, so an error still restores the terminal on drop.
    pub(crate) fn begin() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut term = Self {
            out: io::stdout(),
            cols: 0,
            rows: 0,
            prev: CellBuffer::new(0, 0),
            cur: CellBuffer::new(0, 0),
            full_redraw: true,
        };

        execute!(
            term.out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )
        .context("enter alternate screen")?;

        let (cols, rows) = terminal::size().context("query terminal size")?;
        term.resize(cols, rows);
        Ok(term)
    }

    pub(crate) fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.prev = CellBuffer::new(cols, rows);
        self.cur = CellBuffer::new(cols, rows);
        self.full_redraw = true;
    }

    pub(crate) fn request_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Writes the cells that changed since the last call.
    pub(crate) fn present(&mut self) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if !self.full_redraw && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        self.full_redraw = false;
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/// Leaves the alternate screen and shows the cursor again.
fn write_restore<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        EndSynchronizedUpdate,
        ResetColor,
        cursor::Show,
        EnableLineWrap,
        LeaveAlternateScreen
    )?;
    out.flush()
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = write_restore(&mut self.out);
        let _ = terminal::disable_raw_mode();
    }
}
