//! Frames and normalized frame sets.
//!
//! The streaming protocol redraws each frame in place by homing the
//! cursor and overwriting, without clearing the screen in between. That
//! only works if every frame covers exactly the same rectangle, so a
//! [`FrameSet`] is always normalized: every line is padded to the widest
//! line in the set and every frame is padded to the tallest frame.
//! Content is never cropped.

/// One rectangular grid of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// The frame's lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The frame as it goes on the wire: lines joined by `\n`, with no
    /// trailing newline.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// An ordered set of equally sized frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    frames: Vec<Frame>,
    width: usize,
    height: usize,
}

impl FrameSet {
    /// Normalize raw frame texts (in playback order) into a uniform grid.
    ///
    /// Trailing line breaks are stripped from each text before it is split
    /// into lines. Width is measured in characters, not bytes.
    pub fn normalize<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owned: Vec<String> = texts.into_iter().map(|t| t.as_ref().to_owned()).collect();
        let split: Vec<Vec<&str>> = owned
            .iter()
            .map(|text| split_lines(text.trim_end_matches('\n')))
            .collect();

        let height = split.iter().map(Vec::len).max().unwrap_or(0);
        let width = split
            .iter()
            .flat_map(|lines| lines.iter().map(|l| l.chars().count()))
            .max()
            .unwrap_or(0);

        let frames = split
            .into_iter()
            .map(|lines| {
                let mut padded: Vec<String> =
                    lines.into_iter().map(|l| format!("{l:<width$}")).collect();
                padded.resize(height, " ".repeat(width));
                Frame { lines: padded }
            })
            .collect();

        Self {
            frames,
            width,
            height,
        }
    }

    /// Frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Width of every frame, in characters.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height of every frame, in lines.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the set holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Whether `c` ends a line. Besides `\n` and `\r` this covers the
/// vertical tab, form feed, file/group/record separators, NEL and the
/// Unicode line and paragraph separators, none of which may reach the
/// terminal mid-frame.
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` at every line break, treating `\r\n` as one. A break at
/// the very end does not start an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some((at, brk)) = rest.char_indices().find(|(_, c)| is_line_break(*c)) else {
            lines.push(rest);
            break;
        };
        let (line, tail) = rest.split_at(at);
        lines.push(line);
        let tail = tail.strip_prefix(brk).unwrap_or(tail);
        rest = if brk == '\r' {
            tail.strip_prefix('\n').unwrap_or(tail)
        } else {
            tail
        };
    }

    lines
}
