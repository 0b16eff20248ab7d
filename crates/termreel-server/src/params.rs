//! Playback parameter resolution.
//!
//! `fps` and `loops` come from the query string. Each one independently
//! falls back to its default when absent or not an integer, and is then
//! floored at 1. Bad input is never an error: `fps=0` and `fps=-3` play
//! at 1 fps, `fps=abc` plays at the default.

use std::num::IntErrorKind;
use std::time::Duration;

/// Frames per second when the query does not say otherwise.
pub const DEFAULT_FPS: u32 = 15;

/// Loop count when the query does not say otherwise.
pub const DEFAULT_LOOPS: u32 = 50;

/// Resolved playback settings for one stream. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackParams {
    fps: u32,
    loops: u32,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            loops: DEFAULT_LOOPS,
        }
    }
}

impl PlaybackParams {
    /// Build params, raising zero values to 1.
    pub fn new(fps: u32, loops: u32) -> Self {
        Self {
            fps: fps.max(1),
            loops: loops.max(1),
        }
    }

    /// Resolve params from decoded query pairs. The first occurrence of
    /// each key wins.
    pub fn from_query<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .map(|(_, v)| v.as_ref())
        };

        Self {
            fps: resolve(first("fps"), DEFAULT_FPS),
            loops: resolve(first("loops"), DEFAULT_LOOPS),
        }
    }

    /// Frames per second.
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Number of full passes over the frame set.
    pub const fn loops(&self) -> u32 {
        self.loops
    }

    /// Pause between consecutive frames (`1 / fps` seconds).
    pub fn frame_delay(&self) -> Duration {
        Duration::from_secs(1)
            .checked_div(self.fps)
            .unwrap_or(Duration::ZERO)
    }
}

fn resolve(raw: Option<&str>, default: u32) -> u32 {
    let value = raw.and_then(parse_int).unwrap_or_else(|| i64::from(default));
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Parse a signed integer, saturating on overflow. `None` for anything
/// that is not an integer at all.
fn parse_int(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PlaybackParams {
        PlaybackParams::from_query(pairs)
    }

    #[test]
    fn no_query_uses_defaults() {
        assert_eq!(params(&[]), PlaybackParams::default());
        assert_eq!(params(&[]), params(&[("fps", "15"), ("loops", "50")]));
    }

    #[test]
    fn explicit_values() {
        let p = params(&[("fps", "10"), ("loops", "1")]);
        assert_eq!((p.fps(), p.loops()), (10, 1));
    }

    #[test]
    fn zero_and_negative_floor_to_one() {
        assert_eq!(params(&[("fps", "0")]).fps(), 1);
        assert_eq!(params(&[("fps", "-3")]).fps(), 1);
        assert_eq!(params(&[("loops", "-100")]).loops(), 1);
    }

    #[test]
    fn unparseable_uses_default() {
        assert_eq!(params(&[("fps", "abc")]).fps(), DEFAULT_FPS);
        assert_eq!(params(&[("fps", "")]).fps(), DEFAULT_FPS);
        assert_eq!(params(&[("loops", "1.5")]).loops(), DEFAULT_LOOPS);
    }

    #[test]
    fn each_parameter_falls_back_independently() {
        let p = params(&[("fps", "abc"), ("loops", "3")]);
        assert_eq!((p.fps(), p.loops()), (DEFAULT_FPS, 3));
    }

    #[test]
    fn whitespace_and_sign_are_tolerated() {
        assert_eq!(params(&[("fps", " 24 ")]).fps(), 24);
        assert_eq!(params(&[("fps", "+30")]).fps(), 30);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(params(&[("loops", "99999999999999999999999")]).loops(), u32::MAX);
        assert_eq!(params(&[("fps", "-99999999999999999999999")]).fps(), 1);
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(params(&[("fps", "5"), ("fps", "50")]).fps(), 5);
    }

    #[test]
    fn unknown_keys_ignored() {
        assert_eq!(params(&[("speed", "99")]), PlaybackParams::default());
    }

    #[test]
    fn delay_is_inverse_of_fps() {
        assert_eq!(PlaybackParams::new(10, 1).frame_delay(), Duration::from_millis(100));
        assert_eq!(PlaybackParams::new(1, 1).frame_delay(), Duration::from_secs(1));
        assert_eq!(PlaybackParams::new(0, 0), PlaybackParams::new(1, 1));
    }
}
