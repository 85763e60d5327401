use super::MatchRecord;
use super::Scanner;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Lines;
use std::path::Path;
use std::path::PathBuf;

/// a convenience [`Scanner`] over a newline-delimited JSON file of
/// [`MatchRecord`]s, with its cursor persisted as a line offset in a sibling
/// `.cursor` file. the hosting application's real match source is an
/// external collaborator; this adapter exists so the bundled `rate` binary
/// is runnable standalone, sitting behind the same trait the driver
/// consumes.
pub struct JsonlScanner {
    path: PathBuf,
    cursor_path: PathBuf,
    lines: Lines<BufReader<File>>,
    position: usize,
}

impl JsonlScanner {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cursor_path = path.with_extension("cursor");
        let start = std::fs::read_to_string(&cursor_path)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let mut lines = BufReader::new(File::open(&path)?).lines();
        for _ in 0..start {
            if lines.next().is_none() {
                break;
            }
        }
        Ok(Self {
            path,
            cursor_path,
            lines,
            position: start,
        })
    }
}

impl Iterator for JsonlScanner {
    type Item = MatchRecord;

    fn next(&mut self) -> Option<MatchRecord> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    log::warn!("failed to read match record line: {err}");
                    return None;
                }
            };
            self.position += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => return Some(record),
                Err(err) => {
                    log::warn!("skipping malformed match record at line {}: {err}", self.position);
                    continue;
                }
            }
        }
    }
}

impl Scanner for JsonlScanner {
    fn reset(&mut self) {
        let _ = std::fs::remove_file(&self.cursor_path);
        self.position = 0;
        match File::open(&self.path) {
            Ok(file) => self.lines = BufReader::new(file).lines(),
            Err(err) => log::warn!("failed to reopen {}: {err}", self.path.display()),
        }
    }

    fn save(&mut self) -> anyhow::Result<()> {
        std::fs::write(&self.cursor_path, self.position.to_string())?;
        Ok(())
    }

    fn status_msg(&self) -> String {
        format!("scanned {} lines of {}", self.position, self.path.display())
    }
}
