//! Console progress animation while a log is scanned
//!
//! A spinner turns in place as lines are read. Every settled confirmation
//! leaves a mark behind it, so the finished row reads like a history of the
//! log:
//!
//! ```text
//! DEADLINES -> ███X██!█
//! ```

use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveLeft;
use crossterm::queue;
use crossterm::style::Print;
use plotcheck_core::{ConfirmationOutcome, ProgressObserver};
use tracing::debug;

use crate::console::{display_width, whitespace};

/// Spinner frames used when none are configured
pub const DEFAULT_FRAMES: &[&str] = &["-", "\\", "|", "/"];

/// Minimum time between spinner frames
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(6);

/// Left behind by a confirmation that matched a found deadline
pub const MATCHED_MARK: &str = "█";

/// Left behind by a confirmation blamed on the latest found deadline
pub const ATTRIBUTED_MARK: &str = "!";

/// Left behind by a confirmation that matched nothing
pub const UNMATCHED_MARK: &str = "X";

/// Spinner-and-marks progress observer writing to any terminal-like sink
#[derive(Debug)]
pub struct CursorAnimator<W: Write> {
    out: W,

    /// Frames padded to a common width
    frames: Vec<String>,

    /// Column width of every frame
    frame_width: usize,

    interval: Duration,

    /// Index of the next frame to draw
    next_frame: usize,

    last_draw: Option<Instant>,

    /// Whether a spinner frame is currently on screen
    spinner_visible: bool,

    /// Set after the first write error; the animation is cosmetic
    broken: bool,
}

impl<W: Write> CursorAnimator<W> {
    /// Create an animator with custom frames.
    ///
    /// Empty frame lists fall back to [`DEFAULT_FRAMES`].
    pub fn new(out: W, frames: &[String], interval: Duration) -> Self {
        let frames: Vec<String> = if frames.is_empty() {
            DEFAULT_FRAMES.iter().map(|f| f.to_string()).collect()
        } else {
            frames.to_vec()
        };
        let frame_width = frames.iter().map(|f| display_width(f)).max().unwrap_or(0);
        let frames = frames
            .into_iter()
            .map(|f| {
                let pad = frame_width - display_width(&f);
                format!("{}{}", f, whitespace(pad))
            })
            .collect();

        Self {
            out,
            frames,
            frame_width,
            interval,
            next_frame: 0,
            last_draw: None,
            spinner_visible: false,
            broken: false,
        }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Frame width as a cursor move, clamped to what a terminal can address
    fn frame_columns(&self) -> u16 {
        u16::try_from(self.frame_width).unwrap_or(u16::MAX)
    }

    fn draw_next_frame(&mut self) -> std::io::Result<()> {
        let columns = self.frame_columns();
        let frame = &self.frames[self.next_frame];
        queue!(self.out, Print(frame), MoveLeft(columns))?;
        self.out.flush()?;
        self.next_frame = (self.next_frame + 1) % self.frames.len();
        self.spinner_visible = true;
        Ok(())
    }

    fn erase_spinner(&mut self) -> std::io::Result<()> {
        if self.spinner_visible && self.frame_width > 0 {
            let columns = self.frame_columns();
            queue!(
                self.out,
                Print(whitespace(self.frame_width)),
                MoveLeft(columns)
            )?;
        }
        self.spinner_visible = false;
        Ok(())
    }

    fn leave_mark(&mut self, mark: &str) -> std::io::Result<()> {
        self.erase_spinner()?;
        queue!(self.out, Print(mark))?;
        // Redraw the spinner right after the mark on the next line
        self.last_draw = None;
        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        self.erase_spinner()?;
        queue!(self.out, Print("\n"))?;
        self.out.flush()
    }

    fn guard(&mut self, result: std::io::Result<()>) {
        if let Err(e) = result {
            debug!("Progress animation disabled after write error: {}", e);
            self.broken = true;
        }
    }
}

impl<W: Write> ProgressObserver for CursorAnimator<W> {
    fn line_processed(&mut self, _line_number: u64) {
        if self.broken || self.frame_width == 0 {
            return;
        }
        let due = self
            .last_draw
            .map_or(true, |last| last.elapsed() >= self.interval);
        if due {
            let result = self.draw_next_frame();
            self.last_draw = Some(Instant::now());
            self.guard(result);
        }
    }

    fn confirmation(&mut self, outcome: ConfirmationOutcome) {
        if self.broken {
            return;
        }
        let mark = match outcome {
            ConfirmationOutcome::Matched => MATCHED_MARK,
            ConfirmationOutcome::Attributed => ATTRIBUTED_MARK,
            ConfirmationOutcome::Unmatched => UNMATCHED_MARK,
        };
        let result = self.leave_mark(mark);
        self.guard(result);
    }

    fn finished(&mut self) {
        if self.broken {
            return;
        }
        let result = self.finish();
        self.guard(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::Command;

    /// Escape sequence the animator queues to step back `size` columns
    fn move_cursor_back(size: usize) -> String {
        let mut out = String::new();
        MoveLeft(u16::try_from(size).unwrap()).write_ansi(&mut out).unwrap();
        out
    }

    fn animator(frames: &[&str]) -> CursorAnimator<Vec<u8>> {
        let frames: Vec<String> = frames.iter().map(|f| f.to_string()).collect();
        CursorAnimator::new(Vec::new(), &frames, Duration::ZERO)
    }

    fn output(animator: CursorAnimator<Vec<u8>>) -> String {
        String::from_utf8(animator.into_inner()).unwrap()
    }

    #[test]
    fn test_spinner_cycles_frames() {
        let mut anim = animator(&["a", "b"]);
        anim.line_processed(1);
        anim.line_processed(2);
        anim.line_processed(3);

        let back = move_cursor_back(1);
        assert_eq!(output(anim), format!("a{back}b{back}a{back}"));
    }

    #[test]
    fn test_marks_replace_spinner() {
        let mut anim = animator(&["-"]);
        anim.line_processed(1);
        anim.confirmation(ConfirmationOutcome::Matched);
        anim.confirmation(ConfirmationOutcome::Unmatched);
        anim.confirmation(ConfirmationOutcome::Attributed);

        let back = move_cursor_back(1);
        assert_eq!(output(anim), format!("-{back} {back}█X!"));
    }

    #[test]
    fn test_finish_clears_spinner_and_ends_line() {
        let mut anim = animator(&["-"]);
        anim.line_processed(1);
        anim.finished();

        let back = move_cursor_back(1);
        assert_eq!(output(anim), format!("-{back} {back}\n"));
    }

    #[test]
    fn test_frames_padded_to_common_width() {
        let mut anim = animator(&["..", "."]);
        anim.line_processed(1);
        anim.line_processed(2);

        let back = move_cursor_back(2);
        assert_eq!(output(anim), format!("..{back}. {back}"));
    }

    #[test]
    fn test_oversized_frame_clamps_cursor_move() {
        let wide = "=".repeat(usize::from(u16::MAX) + 10);
        let mut anim = animator(&[wide.as_str()]);
        assert_eq!(anim.frame_columns(), u16::MAX);

        anim.line_processed(1);
        let back = move_cursor_back(usize::from(u16::MAX));
        assert_eq!(output(anim), format!("{wide}{back}"));
    }

    #[test]
    fn test_interval_throttles_frames() {
        let frames = vec!["-".to_string(), "|".to_string()];
        let mut anim = CursorAnimator::new(Vec::new(), &frames, Duration::from_secs(3600));
        anim.line_processed(1);
        anim.line_processed(2);
        anim.line_processed(3);

        let back = move_cursor_back(1);
        assert_eq!(output(anim), format!("-{back}"));
    }

    #[test]
    fn test_empty_frames_use_defaults() {
        let mut anim = CursorAnimator::new(Vec::new(), &[], Duration::ZERO);
        anim.line_processed(1);
        assert!(output(anim).starts_with('-'));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_disable_animation() {
        let mut anim = CursorAnimator::new(FailingWriter, &[], DEFAULT_FRAME_INTERVAL);
        anim.line_processed(1);
        anim.confirmation(ConfirmationOutcome::Matched);
        anim.finished();
        assert!(anim.broken);
    }
}
