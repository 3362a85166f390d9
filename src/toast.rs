//! Transient notifications.
//!
//! [`Model::push`] shows a toast and hands back the command that will expire
//! it. Expiry messages carry the toast id, so a toast that was already
//! dismissed or evicted is simply not found and nothing happens.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

pub const DEFAULT_TTL: Duration = Duration::from_secs(4);
pub const DEFAULT_CAPACITY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Info,
    Success,
    Error,
}

impl Kind {
    fn icon(self) -> &'static str {
        match self {
            Kind::Info => "ℹ",
            Kind::Success => "✓",
            Kind::Error => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: i64,
    pub kind: Kind,
    pub title: String,
    pub description: Option<String>,
}

/// Removes the toast with this id, if it is still shown.
#[derive(Debug, Clone)]
pub struct ExpireMsg {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct Styles {
    pub info: Style,
    pub success: Style,
    pub error: Style,
    pub description: Style,
    pub frame: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            info: Style::new().foreground(Color::from("#7571F9")).bold(true),
            success: Style::new().foreground(Color::from("#04B575")).bold(true),
            error: Style::new().foreground(Color::from("#FF5F87")).bold(true),
            description: Style::new().foreground(Color::from("#A0A0A0")),
            frame: Style::new().padding(0, 1, 0, 1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    pub ttl: Duration,
    pub capacity: usize,
    pub styles: Styles,
    toasts: Vec<Toast>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
            styles: Styles::default(),
            toasts: Vec::new(),
        }
    }

    /// Visible toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn info(&mut self, title: impl Into<String>, description: Option<String>) -> Cmd {
        self.push(Kind::Info, title, description)
    }

    pub fn success(&mut self, title: impl Into<String>, description: Option<String>) -> Cmd {
        self.push(Kind::Success, title, description)
    }

    pub fn error(&mut self, title: impl Into<String>, description: Option<String>) -> Cmd {
        self.push(Kind::Error, title, description)
    }

    /// Shows a toast, evicting the oldest when full, and returns its expiry
    /// command.
    pub fn push(&mut self, kind: Kind, title: impl Into<String>, description: Option<String>) -> Cmd {
        let id = self.insert(kind, title.into(), description);
        bubbletea_tick(self.ttl, move |_| Box::new(ExpireMsg { id }) as Msg)
    }

    fn insert(&mut self, kind: Kind, title: String, description: Option<String>) -> i64 {
        let id = next_id();
        tracing::debug!(id, ?kind, %title, "toast");
        self.toasts.push(Toast {
            id,
            kind,
            title,
            description,
        });
        let capacity = self.capacity.max(1);
        if self.toasts.len() > capacity {
            let excess = self.toasts.len() - capacity;
            self.toasts.drain(..excess);
        }
        id
    }

    /// Removes a toast. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: i64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(expire) = msg.downcast_ref::<ExpireMsg>() {
            self.dismiss(expire.id);
        }
        None
    }

    /// Toasts stacked newest first, each right-aligned to `width`.
    pub fn view(&self, width: usize) -> String {
        self.toasts
            .iter()
            .rev()
            .map(|t| {
                let title_style = match t.kind {
                    Kind::Info => &self.styles.info,
                    Kind::Success => &self.styles.success,
                    Kind::Error => &self.styles.error,
                };
                let mut body = title_style.render(&format!("{} {}", t.kind.icon(), t.title));
                if let Some(desc) = &t.description {
                    body.push('\n');
                    body.push_str(&self.styles.description.render(&format!("  {}", desc)));
                }
                let rendered = self.styles.frame.render(&body);
                right_align(&rendered, width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn right_align(block: &str, width: usize) -> String {
    block
        .lines()
        .map(|line| {
            let w = lipgloss::width_visible(line);
            if w >= width {
                line.to_string()
            } else {
                format!("{}{}", " ".repeat(width - w), line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
