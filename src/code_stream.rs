//! Decorative scrolling code panels
//!
//! A pool of short source lines is built once (from a cache file, or by
//! sampling source files under a directory) and two panels scroll through it
//! in opposite directions at different speeds.

use crate::error::{Error, Result};
use crate::format::truncate_chars;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions sampled when generating the line pool
pub const SOURCE_EXTENSIONS: &[&str] = &["rs", "toml", "py", "js", "ts", "json", "sh"];

/// Lines read from the top of each source file
const LINES_PER_FILE: usize = 50;

/// Directory levels descended below the source root
const MAX_WALK_DEPTH: usize = 6;

/// Source files sampled at most when generating the pool
pub const MAX_SOURCE_FILES: usize = 500;

/// Size of the generated pool
pub const MAX_LINES: usize = 1000;

/// Times the themed lines are repeated in a generated pool
const THEMED_REPEAT: usize = 50;

/// Characters shown per panel row
pub const VISIBLE_CHARS: usize = 25;

/// Rows at each edge drawn in the faded color
const FADE_ROWS: usize = 2;

pub const THEMED_LINES: &[&str] = &[
    "def boot_jarvis_core():",
    "    arc_reactor.initialize()",
    "class MarkIII(IronManSuit):",
    "    def __init__(self):",
    "        self.weapons = WeaponSystem()",
    "async fn scan_threat_level() {",
    "    sensors.activate();",
    "    return analysis.run();",
    "}",
    "POWER_OUTPUT = 3_000_000_000",
    "const JARVIS_VERSION = '4.0.1';",
    "target.lock(coordinates);",
    "repulsor.charge(85);",
    "flight_systems.engage();",
    "hud.display(threat_data);",
    "armor.integrity = 98.7;",
    "reactor_temp = 347.2;",
    "altitude = 12847.5;",
    "velocity = mach_2.3;",
];

/// Load the line pool from `cache_file`, generating it from `source_dir` when
/// the cache is missing or empty. A fresh pool is only cached when the
/// cache's directory already exists.
pub fn load_or_generate(cache_file: &Path, source_dir: &Path) -> Vec<String> {
    match read_cache(cache_file) {
        Ok(lines) if !lines.is_empty() => {
            log::info!("Loaded {} code lines from {}", lines.len(), cache_file.display());
            return lines;
        }
        Ok(_) => log::debug!("code line cache {} is empty", cache_file.display()),
        Err(e) => log::debug!("no code line cache at {}: {}", cache_file.display(), e),
    }

    log::info!("Generating code lines from {}", source_dir.display());
    let lines = generate(source_dir, &mut rand::rng());

    if let Err(e) = write_cache(cache_file, &lines) {
        log::warn!("Could not cache code lines to {}: {}", cache_file.display(), e);
    } else {
        log::info!("Cached {} code lines", lines.len());
    }
    lines
}

/// Non-blank lines of the cache file, right-trimmed
pub fn read_cache(cache_file: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(cache_file)?;
    Ok(content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim_end().to_string())
        .collect())
}

fn write_cache(cache_file: &Path, lines: &[String]) -> Result<()> {
    let dir = match cache_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(Error::NotSupported(format!(
            "cache directory {} does not exist",
            dir.display()
        )));
    }
    fs::write(cache_file, lines.join("\n"))?;
    Ok(())
}

/// Build a shuffled pool of sampled source lines plus the themed lines
pub fn generate<R: Rng + ?Sized>(source_dir: &Path, rng: &mut R) -> Vec<String> {
    let mut lines = collect_source_lines(source_dir);
    for _ in 0..THEMED_REPEAT {
        lines.extend(THEMED_LINES.iter().map(|l| l.to_string()));
    }
    lines.shuffle(rng);
    lines.truncate(MAX_LINES);
    lines
}

/// Short lines (6 to 59 chars) from the first lines of each source file,
/// sampling at most [`MAX_SOURCE_FILES`] files
pub fn collect_source_lines(source_dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    walk_sources(source_dir, 0, &mut files);
    files.sort();

    let mut lines = Vec::new();
    for path in files {
        let Ok(bytes) = fs::read(&path) else {
            continue;
        };
        let text = String::from_utf8_lossy(&bytes);
        lines.extend(
            text.lines()
                .take(LINES_PER_FILE)
                .map(str::trim_end)
                .filter(|l| {
                    let len = l.chars().count();
                    len > 5 && len < 60
                })
                .map(str::to_string),
        );
    }
    lines
}

fn walk_sources(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        if out.len() >= MAX_SOURCE_FILES {
            return;
        }
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        // skip .git, build output and vendored packages
        if name.starts_with('.') || name == "target" || name == "node_modules" {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if depth < MAX_WALK_DEPTH {
                walk_sources(&path, depth + 1, out);
            }
        } else if file_type.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e))
        {
            out.push(path);
        }
    }
}

/// Scroll direction of a code panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Text moves up, fractional offset scrolls smoothly
    Up,
    /// Text moves down a whole row at a time
    Down,
}

impl ScrollDirection {
    /// Lines advanced per scroll tick
    pub fn speed(&self) -> f32 {
        match self {
            ScrollDirection::Up => 0.5,
            ScrollDirection::Down => 0.3,
        }
    }
}

/// One row of a code panel
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLine<'a> {
    pub text: &'a str,
    /// Vertical position in rows from the panel top (may be negative)
    pub y_offset: f32,
    pub faded: bool,
}

#[derive(Debug, Clone)]
pub struct CodeScroller {
    offset: f32,
    direction: ScrollDirection,
}

impl CodeScroller {
    pub fn new(direction: ScrollDirection) -> Self {
        Self {
            offset: 0.0,
            direction,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Rows to draw for a panel of `height`, including partial rows
    pub fn rows_for_height(height: f32, line_height: f32) -> usize {
        if line_height <= 0.0 || !height.is_finite() {
            return 0;
        }
        (height / line_height).max(0.0) as usize + 2
    }

    /// Lines to draw this frame
    pub fn visible<'a>(&self, lines: &'a [String], rows: usize) -> Vec<VisibleLine<'a>> {
        if lines.is_empty() {
            return Vec::new();
        }
        let len = lines.len() as i64;

        (0..rows)
            .map(|i| {
                let (index, y_offset) = match self.direction {
                    ScrollDirection::Up => {
                        let pos = self.offset + i as f32;
                        (
                            (pos.floor() as i64).rem_euclid(len),
                            i as f32 - self.offset.fract(),
                        )
                    }
                    ScrollDirection::Down => {
                        let pos = len as f32 - self.offset - i as f32;
                        ((pos.trunc() as i64).rem_euclid(len), i as f32)
                    }
                };
                VisibleLine {
                    text: truncate_chars(&lines[index as usize], VISIBLE_CHARS),
                    y_offset,
                    faded: i < FADE_ROWS || i + FADE_ROWS >= rows,
                }
            })
            .collect()
    }

    /// Move one scroll tick forward, wrapping within `len` lines
    pub fn advance(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.offset = (self.offset + self.direction.speed()).rem_euclid(len as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_scroll_up_visible() {
        let lines = numbered(10);
        let mut scroller = CodeScroller::new(ScrollDirection::Up);
        scroller.advance(lines.len());
        assert_eq!(scroller.offset(), 0.5);

        let rows = scroller.visible(&lines, 6);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].text, "line 0");
        assert_eq!(rows[0].y_offset, -0.5);
        assert_eq!(rows[5].text, "line 5");
        let faded: Vec<bool> = rows.iter().map(|r| r.faded).collect();
        assert_eq!(faded, vec![true, true, false, false, true, true]);
    }

    #[test]
    fn test_scroll_down_visible() {
        let lines = numbered(10);
        let scroller = CodeScroller::new(ScrollDirection::Down);
        let rows = scroller.visible(&lines, 3);
        // starts at len - 0 which wraps to the first line, then walks back
        assert_eq!(rows[0].text, "line 0");
        assert_eq!(rows[1].text, "line 9");
        assert_eq!(rows[2].text, "line 8");
        assert!(rows.iter().all(|r| r.y_offset.fract() == 0.0));
    }

    #[test]
    fn test_offset_stays_in_range() {
        for direction in [ScrollDirection::Up, ScrollDirection::Down] {
            let mut scroller = CodeScroller::new(direction);
            for _ in 0..1000 {
                scroller.advance(7);
                assert!(scroller.offset() >= 0.0 && scroller.offset() < 7.0);
            }
            // more rows than lines still indexes safely
            let lines = numbered(7);
            assert_eq!(scroller.visible(&lines, 40).len(), 40);
        }
    }

    #[test]
    fn test_empty_pool_is_safe() {
        let mut scroller = CodeScroller::new(ScrollDirection::Up);
        scroller.advance(0);
        assert_eq!(scroller.offset(), 0.0);
        assert!(scroller.visible(&[], 10).is_empty());
        assert_eq!(CodeScroller::rows_for_height(120.0, 12.0), 12);
        assert_eq!(CodeScroller::rows_for_height(120.0, 0.0), 0);
    }

    #[test]
    fn test_long_lines_truncated() {
        let lines = vec!["x".repeat(80)];
        let scroller = CodeScroller::new(ScrollDirection::Up);
        assert_eq!(scroller.visible(&lines, 1)[0].text.len(), VISIBLE_CHARS);
    }

    #[test]
    fn test_collect_source_lines_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("main.rs"),
            "fn main() {\n}\n    println!(\"hello\");   \n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored because of extension\n").unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target/gen.rs"), "build output line\n").unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("sub/run.sh"),
            format!("echo start\n{}\n", "#".repeat(70)),
        )
        .unwrap();

        let lines = collect_source_lines(dir.path());
        assert_eq!(
            lines,
            vec![
                "fn main() {".to_string(),
                "    println!(\"hello\");".to_string(),
                "echo start".to_string(),
            ]
        );
    }

    #[test]
    fn test_generate_caps_and_includes_themed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let lines = generate(dir.path(), &mut rng);
        // 19 themed lines x 50 = 950, all kept
        assert_eq!(lines.len(), THEMED_LINES.len() * THEMED_REPEAT);
        assert!(lines.iter().all(|l| THEMED_LINES.contains(&l.as_str())));

        let long: String = (0..1200).map(|i| format!("let value_{} = {};\n", i, i)).collect();
        for i in 0..30 {
            fs::write(dir.path().join(format!("f{}.rs", i)), &long).unwrap();
        }
        assert_eq!(generate(dir.path(), &mut rng).len(), MAX_LINES);
    }

    #[test]
    fn test_load_or_generate_writes_then_reads_cache() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cache")).unwrap();
        let cache = dir.path().join("cache/code_lines.txt");

        let generated = load_or_generate(&cache, dir.path());
        assert!(cache.exists());
        assert!(!generated.is_empty());

        let reloaded = load_or_generate(&cache, dir.path());
        assert_eq!(reloaded, generated);
    }

    #[test]
    fn test_missing_cache_dir_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("ironman/cache");
        let cache = cache_dir.join("code_lines.txt");

        let lines = load_or_generate(&cache, dir.path());
        assert!(!lines.is_empty());
        assert!(!cache_dir.exists());
        assert!(!dir.path().join("ironman").exists());
    }

    #[test]
    fn test_walk_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let vendored = dir.path().join("app/node_modules/pkg");
        fs::create_dir_all(&vendored).unwrap();
        fs::write(vendored.join("index.js"), "module.exports = vendored;\n").unwrap();

        let mut deep = dir.path().to_path_buf();
        for level in 0..=MAX_WALK_DEPTH + 1 {
            deep = deep.join(format!("d{}", level));
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("deep.rs"), "let too_deep = true;\n").unwrap();

        for i in 0..MAX_SOURCE_FILES + 20 {
            fs::write(dir.path().join(format!("f{:04}.sh", i)), "echo sampled\n").unwrap();
        }

        let lines = collect_source_lines(dir.path());
        assert_eq!(lines.len(), MAX_SOURCE_FILES);
        assert!(lines.iter().all(|l| l == "echo sampled"));
    }

    #[test]
    fn test_read_cache_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("code_lines.txt");
        fs::write(&cache, "alpha  \n\n   \nbeta\n").unwrap();
        assert_eq!(read_cache(&cache).unwrap(), vec!["alpha", "beta"]);
    }
}
