//! Stream Controller: the per-connection playback protocol.
//!
//! A stream is a sequence of writes to a [`FrameSink`]:
//!
//! 1. setup -- alternate screen on, hide cursor, clear once, cursor home
//! 2. for each loop, for each frame -- cursor home, frame text, `\n`,
//!    then a `1 / fps` pause
//! 3. teardown -- show cursor, alternate screen off
//!
//! Frames overwrite each other in place without clearing, which is why
//! every frame in a [`FrameSet`] has the same dimensions. Frame chunks are
//! encoded once per [`Animation`] and shared by every stream playing it.
//!
//! A failed write means the client is gone. Playback stops at once and
//! the teardown write is still attempted exactly once; if that fails too
//! it is ignored.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use termreel_frames::{AnimationName, Frame, FrameSet};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::params::PlaybackParams;

/// Switch to the alternate screen buffer.
pub const ALT_SCREEN_ON: &[u8] = b"\x1b[?1049h";
/// Return to the main screen buffer.
pub const ALT_SCREEN_OFF: &[u8] = b"\x1b[?1049l";
/// Hide the cursor.
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
/// Show the cursor.
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
/// Move the cursor to the top-left corner.
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
/// Clear the whole screen.
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";

/// Chunks buffered between the playback task and the response body.
const BODY_BUFFER: usize = 1;

/// The client stopped accepting data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stream closed by client")]
pub struct StreamWriteError;

/// Destination for stream chunks.
///
/// Each write either succeeds or reports that the client is gone; there
/// is no partial write.
pub trait FrameSink: Send {
    /// Write one chunk and flush it.
    fn write(&mut self, chunk: Bytes) -> impl Future<Output = Result<(), StreamWriteError>> + Send;
}

/// [`FrameSink`] feeding an HTTP response body through a bounded channel.
///
/// When the connection drops, the body and its receiver are dropped and
/// the next send fails.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Bytes>,
}

impl ChannelSink {
    /// Wrap the sending half of a body channel.
    pub const fn new(tx: mpsc::Sender<Bytes>) -> Self {
        Self { tx }
    }
}

impl FrameSink for ChannelSink {
    async fn write(&mut self, chunk: Bytes) -> Result<(), StreamWriteError> {
        if self.tx.send(chunk).await.is_err() {
            return Err(StreamWriteError);
        }
        Ok(())
    }
}

/// A frame set together with its frames encoded as wire chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: FrameSet,
    chunks: Vec<Bytes>,
}

impl Animation {
    /// Encode every frame of `frames` once.
    pub fn new(frames: FrameSet) -> Self {
        let chunks = frames.frames().iter().map(frame_chunk).collect();
        Self { frames, chunks }
    }

    /// The normalized frames.
    pub const fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// One chunk per frame, in playback order.
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }
}

/// How a stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Every loop played to the end.
    Completed {
        /// Frames written.
        frames_sent: u64,
    },
    /// A write failed and playback was abandoned.
    Disconnected {
        /// Frames written before the failure.
        frames_sent: u64,
    },
}

/// Bytes sent once before the first frame.
pub fn setup_sequence() -> Bytes {
    Bytes::from([ALT_SCREEN_ON, HIDE_CURSOR, CLEAR_SCREEN, CURSOR_HOME].concat())
}

/// Bytes sent once after the last frame, or after a failed write.
pub fn teardown_sequence() -> Bytes {
    Bytes::from([SHOW_CURSOR, ALT_SCREEN_OFF].concat())
}

/// One frame as written to the wire: cursor home, frame text, newline.
pub fn frame_chunk(frame: &Frame) -> Bytes {
    let text = frame.text();
    let mut buf = Vec::with_capacity(CURSOR_HOME.len().saturating_add(text.len()).saturating_add(1));
    buf.extend_from_slice(CURSOR_HOME);
    buf.extend_from_slice(text.as_bytes());
    buf.push(b'\n');
    Bytes::from(buf)
}

/// Play `animation` into `sink` with the given pacing, then restore the
/// terminal.
pub async fn play<S: FrameSink>(
    sink: &mut S,
    animation: &Animation,
    params: PlaybackParams,
) -> StreamOutcome {
    let outcome = play_loops(sink, animation, params).await;

    if sink.write(teardown_sequence()).await.is_err() {
        debug!("teardown write failed, client already gone");
    }

    outcome
}

async fn play_loops<S: FrameSink>(
    sink: &mut S,
    animation: &Animation,
    params: PlaybackParams,
) -> StreamOutcome {
    let mut frames_sent: u64 = 0;

    if sink.write(setup_sequence()).await.is_err() {
        return StreamOutcome::Disconnected { frames_sent };
    }

    let chunks = animation.chunks();
    if chunks.is_empty() {
        return StreamOutcome::Completed { frames_sent };
    }

    let delay = params.frame_delay();

    for _ in 0..params.loops() {
        for chunk in chunks {
            if sink.write(chunk.clone()).await.is_err() {
                return StreamOutcome::Disconnected { frames_sent };
            }
            frames_sent = frames_sent.saturating_add(1);
            tokio::time::sleep(delay).await;
        }
    }

    StreamOutcome::Completed { frames_sent }
}

/// Start playback on its own task and return the response body it feeds.
pub fn spawn_stream(
    name: AnimationName,
    animation: Arc<Animation>,
    params: PlaybackParams,
) -> Body {
    let (tx, rx) = mpsc::channel::<Bytes>(BODY_BUFFER);

    tokio::spawn(async move {
        info!(
            animation = %name,
            fps = params.fps(),
            loops = params.loops(),
            frames = animation.frames().len(),
            "stream started"
        );

        let mut sink = ChannelSink::new(tx);
        match play(&mut sink, &animation, params).await {
            StreamOutcome::Completed { frames_sent } => {
                info!(animation = %name, frames_sent, "stream completed");
            }
            StreamOutcome::Disconnected { frames_sent } => {
                debug!(animation = %name, frames_sent, "client disconnected mid-stream");
            }
        }
    });

    let chunks = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });
    Body::from_stream(chunks)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;

    /// Records every write attempt; fails the attempt at `fail_from` and
    /// every one after it.
    struct RecordingSink {
        attempts: Vec<(Instant, Bytes)>,
        fail_from: Option<usize>,
    }

    impl RecordingSink {
        const fn new() -> Self {
            Self {
                attempts: Vec::new(),
                fail_from: None,
            }
        }

        const fn failing_from(index: usize) -> Self {
            Self {
                attempts: Vec::new(),
                fail_from: Some(index),
            }
        }

        fn teardown_attempts(&self) -> usize {
            let teardown = teardown_sequence();
            self.attempts.iter().filter(|(_, b)| *b == teardown).count()
        }
    }

    impl FrameSink for RecordingSink {
        async fn write(&mut self, chunk: Bytes) -> Result<(), StreamWriteError> {
            let index = self.attempts.len();
            self.attempts.push((Instant::now(), chunk));
            match self.fail_from {
                Some(from) if index >= from => Err(StreamWriteError),
                _ => Ok(()),
            }
        }
    }

    fn panda() -> Animation {
        Animation::new(FrameSet::normalize([
            "/\\_/\n(oo)",
            "/\\_/\n(--)",
            "/\\_/\n(^^)",
        ]))
    }

    #[test]
    fn control_sequences_are_exact() {
        assert_eq!(&setup_sequence()[..], b"\x1b[?1049h\x1b[?25l\x1b[2J\x1b[H");
        assert_eq!(&teardown_sequence()[..], b"\x1b[?25h\x1b[?1049l");
    }

    #[test]
    fn frame_chunk_is_home_text_newline() {
        let set = FrameSet::normalize(["ab\nc"]);
        assert_eq!(&frame_chunk(&set.frames()[0])[..], b"\x1b[Hab\nc \n");
    }

    #[tokio::test(start_paused = true)]
    async fn full_playback_sequence_and_pacing() {
        let animation = panda();
        assert_eq!(
            (animation.frames().width(), animation.frames().height()),
            (4, 2)
        );
        let mut sink = RecordingSink::new();

        let outcome = play(&mut sink, &animation, PlaybackParams::new(10, 1)).await;
        assert_eq!(outcome, StreamOutcome::Completed { frames_sent: 3 });

        let bytes: Vec<&[u8]> = sink.attempts.iter().map(|(_, b)| &b[..]).collect();
        assert_eq!(
            bytes,
            vec![
                &b"\x1b[?1049h\x1b[?25l\x1b[2J\x1b[H"[..],
                &b"\x1b[H/\\_/\n(oo)\n"[..],
                &b"\x1b[H/\\_/\n(--)\n"[..],
                &b"\x1b[H/\\_/\n(^^)\n"[..],
                &b"\x1b[?25h\x1b[?1049l"[..],
            ]
        );

        let start = sink.attempts[1].0;
        for (i, (at, _)) in sink.attempts[1..].iter().enumerate() {
            let expected = Duration::from_millis(100) * u32::try_from(i).unwrap();
            let elapsed = at.duration_since(start);
            assert!(
                elapsed >= expected && elapsed < expected + Duration::from_millis(5),
                "write {i} at {elapsed:?}, expected ~{expected:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loops_repeat_frames_in_order() {
        let animation = panda();
        let mut sink = RecordingSink::new();

        let outcome = play(&mut sink, &animation, PlaybackParams::new(30, 3)).await;
        assert_eq!(outcome, StreamOutcome::Completed { frames_sent: 9 });

        let played: Vec<Bytes> = sink.attempts[1..10].iter().map(|(_, b)| b.clone()).collect();
        let one_loop: Vec<Bytes> = animation.frames().frames().iter().map(frame_chunk).collect();
        assert_eq!(played, [one_loop.clone(), one_loop.clone(), one_loop].concat());
        assert_eq!(sink.teardown_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_mid_loop_still_tears_down_once() {
        let animation = Animation::new(FrameSet::normalize(["1", "2", "3", "4", "5", "6"]));
        // Write 0 is setup, writes 1..=6 are loop 1, write 11 is frame 5
        // of loop 2.
        let mut sink = RecordingSink::failing_from(11);

        let outcome = play(&mut sink, &animation, PlaybackParams::new(60, 3)).await;
        assert_eq!(outcome, StreamOutcome::Disconnected { frames_sent: 10 });

        assert_eq!(sink.attempts.len(), 13);
        assert_eq!(&sink.attempts[11].1[..], b"\x1b[H5\n");
        assert_eq!(sink.attempts[12].1, teardown_sequence());
        assert_eq!(sink.teardown_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_during_setup_skips_frames() {
        let mut sink = RecordingSink::failing_from(0);

        let outcome = play(&mut sink, &panda(), PlaybackParams::default()).await;
        assert_eq!(outcome, StreamOutcome::Disconnected { frames_sent: 0 });
        assert_eq!(sink.attempts.len(), 2);
        assert_eq!(sink.teardown_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_animation_sends_only_setup_and_teardown() {
        let mut sink = RecordingSink::new();

        let outcome = play(
            &mut sink,
            &Animation::new(FrameSet::normalize(Vec::<String>::new())),
            PlaybackParams::default(),
        )
        .await;
        assert_eq!(outcome, StreamOutcome::Completed { frames_sent: 0 });
        assert_eq!(sink.attempts.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn streams_share_encoded_frames() {
        let animation = panda();
        let mut first = RecordingSink::new();
        let mut second = RecordingSink::new();

        play(&mut first, &animation, PlaybackParams::new(30, 2)).await;
        play(&mut second, &animation, PlaybackParams::new(30, 1)).await;

        // Every frame write points into the chunk encoded by `Animation::new`
        // rather than a per-stream copy.
        for sink in [&first, &second] {
            let frame_writes = &sink.attempts[1..sink.attempts.len() - 1];
            for (i, (_, written)) in frame_writes.iter().enumerate() {
                let cached = &animation.chunks()[i % animation.chunks().len()];
                assert_eq!(written.as_ptr(), cached.as_ptr());
                assert_eq!(written.len(), cached.len());
            }
        }
        assert_eq!(first.attempts[1].1.as_ptr(), second.attempts[1].1.as_ptr());
    }

    #[tokio::test(start_paused = true)]
    async fn channel_sink_reports_dropped_receiver() {
        let (tx, rx) = mpsc::channel(1);
        let mut sink = ChannelSink::new(tx);
        drop(rx);
        assert_eq!(sink.write(Bytes::from_static(b"x")).await, Err(StreamWriteError));
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_stream_stops_when_body_dropped() {
        let animation = Arc::new(panda());
        let body = spawn_stream(
            AnimationName::parse("panda").unwrap(),
            Arc::clone(&animation),
            PlaybackParams::new(1, u32::MAX),
        );
        drop(body);

        // The playback task holds the only other reference; it must finish
        // instead of sleeping through four billion loops.
        for _ in 0..100 {
            if Arc::strong_count(&animation) == 1 {
                return;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        assert_eq!(Arc::strong_count(&animation), 1);
    }
}
