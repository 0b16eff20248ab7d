//! Frame Store Loader.
//!
//! An animation named `panda` lives in `<root>/panda/` as a set of
//! `.txt` files, one per frame. [`FrameStore::load`] reads them in
//! natural order and returns a normalized [`FrameSet`]. A load is all or
//! nothing: one unreadable or non-UTF-8 file fails the whole animation.

use std::path::PathBuf;

use tracing::debug;

use crate::error::LoadError;
use crate::frame::FrameSet;
use crate::name::AnimationName;
use crate::natural::sort_natural;

/// File name suffix recognized as a text frame.
pub const FRAME_EXTENSION: &str = ".txt";

/// Anything that can produce a normalized frame set for a name.
///
/// [`FrameStore`] is the production implementation. The trait exists so
/// the cache can be exercised against in-memory sources.
pub trait FrameSource: Send + Sync {
    /// Load the frames for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if the animation does not exist,
    /// or another [`LoadError`] if it exists but cannot be read.
    fn load(&self, name: &AnimationName) -> Result<FrameSet, LoadError>;
}

/// Loads animations from subdirectories of a root directory.
#[derive(Debug, Clone)]
pub struct FrameStore {
    root: PathBuf,
}

impl FrameStore {
    /// Create a store rooted at `root`. The directory does not need to
    /// exist yet; missing animations are reported at load time.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory backing `name`.
    pub fn animation_dir(&self, name: &AnimationName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Frame file paths for `name`, in playback order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if the directory is missing or has
    /// no frame files, [`LoadError::Read`] if it cannot be listed.
    pub fn frame_paths(&self, name: &AnimationName) -> Result<Vec<PathBuf>, LoadError> {
        let dir = self.animation_dir(name);
        if !dir.is_dir() {
            return Err(LoadError::NotFound {
                name: name.to_string(),
            });
        }

        let entries = std::fs::read_dir(&dir).map_err(|source| LoadError::Read {
            path: dir.clone(),
            source,
        })?;

        let mut frames: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Read {
                path: dir.clone(),
                source,
            })?;
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let path = entry.path();
            if file_name.ends_with(FRAME_EXTENSION) && path.is_file() {
                frames.push((file_name, path));
            }
        }

        if frames.is_empty() {
            return Err(LoadError::NotFound {
                name: name.to_string(),
            });
        }

        sort_natural(&mut frames, |(file_name, _)| file_name.as_str());
        Ok(frames.into_iter().map(|(_, path)| path).collect())
    }
}

impl FrameSource for FrameStore {
    fn load(&self, name: &AnimationName) -> Result<FrameSet, LoadError> {
        let paths = self.frame_paths(name)?;

        let mut texts = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = std::fs::read(&path).map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?;
            let text = String::from_utf8(bytes)
                .map_err(|source| LoadError::Encoding { path, source })?;
            texts.push(text);
        }

        let set = FrameSet::normalize(texts);
        debug!(
            animation = %name,
            frames = set.len(),
            width = set.width(),
            height = set.height(),
            "frames loaded from disk"
        );
        Ok(set)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::Path;

    use super::*;

    fn name(s: &str) -> AnimationName {
        AnimationName::parse(s).unwrap()
    }

    fn write_frames(root: &Path, anim: &str, frames: &[(&str, &str)]) {
        let dir = root.join(anim);
        std::fs::create_dir_all(&dir).unwrap();
        for (file, body) in frames {
            std::fs::write(dir.join(file), body).unwrap();
        }
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FrameStore::new(tmp.path());
        let err = store.load(&name("ghost")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn directory_without_frames_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        write_frames(tmp.path(), "empty", &[("notes.md", "hi"), ("frame.png", "")]);
        let store = FrameStore::new(tmp.path());
        assert!(store.load(&name("empty")).unwrap_err().is_not_found());
    }

    #[test]
    fn plain_file_in_place_of_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("panda"), "not a dir").unwrap();
        let store = FrameStore::new(tmp.path());
        assert!(store.load(&name("panda")).unwrap_err().is_not_found());
    }

    #[test]
    fn frames_play_in_natural_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_frames(
            tmp.path(),
            "count",
            &[("f10.txt", "ten"), ("f2.txt", "two"), ("f1.txt", "one")],
        );
        let store = FrameStore::new(tmp.path());
        let set = store.load(&name("count")).unwrap();
        let texts: Vec<String> = set.frames().iter().map(|f| f.text()).collect();
        assert_eq!(texts, vec!["one", "two", "ten"]);
    }

    #[test]
    fn only_txt_files_are_frames() {
        let tmp = tempfile::tempdir().unwrap();
        write_frames(
            tmp.path(),
            "mixed",
            &[("1.txt", "a"), ("2.png", "zzzz"), ("3.txt", "b")],
        );
        std::fs::create_dir(tmp.path().join("mixed").join("4.txt")).unwrap();
        let store = FrameStore::new(tmp.path());
        let set = store.load(&name("mixed")).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.width(), 1);
    }

    #[test]
    fn loaded_frames_are_normalized() {
        let tmp = tempfile::tempdir().unwrap();
        write_frames(
            tmp.path(),
            "ragged",
            &[("1.txt", "abc\nd\n"), ("2.txt", "x\n"), ("3.txt", "12\n34\n56\n")],
        );
        let store = FrameStore::new(tmp.path());
        let set = store.load(&name("ragged")).unwrap();
        assert_eq!((set.width(), set.height()), (3, 3));
        assert_eq!(set.frames()[0].lines(), ["abc", "d  ", "   "]);
        assert_eq!(set.frames()[1].lines(), ["x  ", "   ", "   "]);
        assert_eq!(set.frames()[2].lines(), ["12 ", "34 ", "56 "]);
    }

    #[test]
    fn invalid_utf8_fails_whole_load() {
        let tmp = tempfile::tempdir().unwrap();
        write_frames(tmp.path(), "broken", &[("1.txt", "fine")]);
        std::fs::write(tmp.path().join("broken").join("2.txt"), [0xff, 0xfe, 0x00]).unwrap();
        let store = FrameStore::new(tmp.path());
        let err = store.load(&name("broken")).unwrap_err();
        assert!(matches!(err, LoadError::Encoding { .. }));
        assert!(!err.is_not_found());
    }
}
