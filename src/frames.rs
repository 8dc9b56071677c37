//! Pre-rendered model animation
//!
//! Frames are PNG files named `<prefix>NNN.png` in one directory. They are
//! decoded and resized one at a time behind the loading screen, then cycled at
//! a fixed rate.

use crate::error::Result;
use image::imageops::FilterType;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Wrapping index over a fixed number of frames
#[derive(Debug, Clone, Default)]
pub struct FrameCycler {
    index: usize,
    len: usize,
}

impl FrameCycler {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Frame to show now, `None` when there are no frames
    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    /// Return the frame to show this tick and step to the next one
    pub fn advance(&mut self) -> Option<usize> {
        let shown = self.current()?;
        self.index = (self.index + 1) % self.len;
        Some(shown)
    }
}

/// Sorted `prefix*.png` files in `dir`. A missing directory yields no frames.
pub fn discover_frames(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("No pre-rendered frames in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut frames: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            let name_ok = p
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix));
            let png = p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            name_ok && png && p.is_file()
        })
        .collect();
    frames.sort();

    if frames.is_empty() {
        log::warn!(
            "No {}*.png frames found in {}; the model view stays empty",
            prefix,
            dir.display()
        );
    }
    frames
}

/// Decode one frame and resize it to `size` x `size`
pub fn load_frame(path: &Path, size: u32) -> Result<RgbaImage> {
    let img = image::open(path)?.into_rgba8();
    if img.width() == size && img.height() == size {
        return Ok(img);
    }
    Ok(image::imageops::resize(&img, size, size, FilterType::Lanczos3))
}

/// Decoded animation frames, in playback order
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<RgbaImage>,
}

impl FrameSequence {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RgbaImage> {
        self.frames.iter()
    }

    pub fn into_frames(self) -> Vec<RgbaImage> {
        self.frames
    }
}

/// Loads a discovered frame list one file per [`FrameLoader::step`]
pub struct FrameLoader {
    paths: Vec<PathBuf>,
    next: usize,
    size: u32,
    frames: Vec<RgbaImage>,
}

impl FrameLoader {
    pub fn new(paths: Vec<PathBuf>, size: u32) -> Self {
        let frames = Vec::with_capacity(paths.len());
        Self {
            paths,
            next: 0,
            size: size.max(1),
            frames,
        }
    }

    /// Discover frames in `dir` and prepare to load them
    pub fn from_dir(dir: &Path, prefix: &str, size: u32) -> Self {
        Self::new(discover_frames(dir, prefix), size)
    }

    pub fn total(&self) -> usize {
        self.paths.len()
    }

    /// Files processed so far, including skipped ones
    pub fn processed(&self) -> usize {
        self.next
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.paths.len()
    }

    /// Fraction of files processed, 1.0 when there is nothing to load
    pub fn progress(&self) -> f32 {
        if self.paths.is_empty() {
            1.0
        } else {
            self.next as f32 / self.paths.len() as f32
        }
    }

    /// Load the next file. Returns false once every file has been processed.
    pub fn step(&mut self) -> bool {
        let Some(path) = self.paths.get(self.next) else {
            return false;
        };
        match load_frame(path, self.size) {
            Ok(frame) => self.frames.push(frame),
            Err(e) => log::warn!("Skipping frame {}: {}", path.display(), e),
        }
        self.next += 1;
        true
    }

    pub fn finish(self) -> FrameSequence {
        log::info!(
            "Loaded {} of {} animation frames",
            self.frames.len(),
            self.paths.len()
        );
        FrameSequence {
            frames: self.frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 212, 255, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_cycler_wraps() {
        let mut cycler = FrameCycler::new(3);
        let shown: Vec<usize> = (0..7).filter_map(|_| cycler.advance()).collect();
        assert_eq!(shown, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(cycler.current(), Some(1));
    }

    #[test]
    fn test_cycler_index_in_range() {
        let mut cycler = FrameCycler::new(5);
        for _ in 0..1000 {
            let i = cycler.advance().unwrap();
            assert!(i < cycler.len());
        }
    }

    #[test]
    fn test_empty_cycler() {
        let mut cycler = FrameCycler::new(0);
        assert!(cycler.is_empty());
        assert_eq!(cycler.current(), None);
        assert_eq!(cycler.advance(), None);
    }

    #[test]
    fn test_discover_frames_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["frame_002.png", "frame_000.png", "frame_001.png"] {
            write_png(&dir.path().join(name), 2, 2);
        }
        fs::write(dir.path().join("frame_notes.txt"), "x").unwrap();
        fs::write(dir.path().join("code_lines.txt"), "x").unwrap();
        write_png(&dir.path().join("thumb.png"), 2, 2);

        let frames = discover_frames(dir.path(), "frame_");
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["frame_000.png", "frame_001.png", "frame_002.png"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_frames(&dir.path().join("nope"), "frame_").is_empty());
        let loader = FrameLoader::from_dir(&dir.path().join("nope"), "frame_", 300);
        assert!(loader.is_done());
        assert_eq!(loader.progress(), 1.0);
        assert!(loader.finish().is_empty());
    }

    #[test]
    fn test_loader_resizes_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("frame_000.png"), 64, 32);
        fs::write(dir.path().join("frame_001.png"), b"not a png").unwrap();
        write_png(&dir.path().join("frame_002.png"), 16, 16);

        let mut loader = FrameLoader::from_dir(dir.path(), "frame_", 16);
        assert_eq!(loader.total(), 3);
        assert_eq!(loader.progress(), 0.0);

        let mut steps = 0;
        while loader.step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert!(loader.is_done());
        assert_eq!(loader.processed(), 3);
        assert_eq!(loader.progress(), 1.0);

        let seq = loader.finish();
        assert_eq!(seq.len(), 2);
        for frame in seq.iter() {
            assert_eq!(frame.dimensions(), (16, 16));
        }
    }
}
