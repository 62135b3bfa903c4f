use crate::shell::{Module, RefreshContext, Region, RenderState, Result, Widget, WidgetContent};
use anyhow::Context;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

pub const ID: &str = "log_tail";
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

/// Last `max_lines` lines of a text file, reloaded only when its size or
/// modification time changes.
pub struct LogTail {
    path: PathBuf,
    max_lines: usize,
    stamp: Option<FileStamp>,
    lines: VecDeque<String>,
    reloads: u64,
}

impl LogTail {
    pub fn new(path: impl Into<PathBuf>, max_lines: usize) -> Self {
        Self {
            path: path.into(),
            max_lines: max_lines.max(1),
            stamp: None,
            lines: VecDeque::new(),
            reloads: 0,
        }
    }

    pub fn reloads(&self) -> u64 {
        self.reloads
    }

    fn reload(&mut self) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        self.lines.clear();
        for line in content.lines() {
            if self.lines.len() == self.max_lines {
                self.lines.pop_front();
            }
            self.lines.push_back(line.to_string());
        }
        self.reloads += 1;
        Ok(())
    }
}

impl WidgetContent for LogTail {
    fn render(&mut self, _ctx: &RefreshContext) -> anyhow::Result<RenderState> {
        let meta = std::fs::metadata(&self.path)
            .with_context(|| format!("cannot stat {}", self.path.display()))?;
        let stamp = FileStamp {
            len: meta.len(),
            modified: meta.modified().ok(),
        };
        if self.stamp != Some(stamp) {
            self.reload()?;
            self.stamp = Some(stamp);
        }
        if self.lines.is_empty() {
            return Ok(RenderState::text("(empty)"));
        }
        Ok(RenderState::lines(self.lines.iter().cloned()))
    }

    fn release(&mut self) {
        self.stamp = None;
        self.lines.clear();
    }
}

pub fn module(path: impl Into<PathBuf>, max_lines: usize) -> Result<Module> {
    let path = path.into();
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Log".into());
    Module::builder(ID, "Log tail", Region::Right)
        .widget(Widget::new_timed(
            "tail",
            title,
            REFRESH_INTERVAL,
            LogTail::new(path, max_lines),
        )?)
        .build()
}
