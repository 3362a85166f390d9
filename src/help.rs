//! Help line for the page's key bindings.
//!
//! Renders a [`KeyMap`] either as a compact single line
//! (`space start • r reset • ? more`) or, when `show_all` is set, as columns
//! of bindings. When a width is set, items that do not fit are replaced by an
//! ellipsis.

use crate::key::{Binding, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

#[derive(Debug, Clone)]
pub struct Styles {
    pub ellipsis: Style,
    pub short_key: Style,
    pub short_desc: Style,
    pub short_separator: Style,
    pub full_key: Style,
    pub full_desc: Style,
    pub full_separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            short_key: key_style.clone(),
            short_desc: desc_style.clone(),
            short_separator: sep_style.clone(),
            full_key: key_style,
            full_desc: desc_style,
            full_separator: sep_style,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    /// Render every group instead of the short line.
    pub show_all: bool,
    /// Maximum width in cells; 0 disables truncation.
    pub width: usize,
    pub short_separator: String,
    pub full_separator: String,
    pub ellipsis: String,
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    pub fn short_help_view(&self, bindings: Vec<&Binding>) -> String {
        let mut out = String::new();
        let mut total_width = 0;
        let separator = self
            .styles
            .short_separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        for kb in bindings.into_iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let help = kb.help();
            let item = format!(
                "{}{} {}",
                sep,
                self.styles.short_key.clone().inline(true).render(&help.key),
                self.styles.short_desc.clone().inline(true).render(&help.desc)
            );
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.overflow_tail(total_width, item_width) {
                out.push_str(&tail);
                break;
            }
            total_width += item_width;
            out.push_str(&item);
        }
        out
    }

    pub fn full_help_view(&self, groups: Vec<Vec<&Binding>>) -> String {
        let separator = self
            .styles
            .full_separator
            .clone()
            .inline(true)
            .render(&self.full_separator);
        let mut columns: Vec<String> = Vec::new();
        let mut total_width = 0;

        for group in groups.iter().filter(|g| g.iter().any(|b| b.enabled())) {
            let col = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| {
                    let help = b.help();
                    format!(
                        "{} {}",
                        self.styles.full_key.clone().inline(true).render(&help.key),
                        self.styles.full_desc.clone().inline(true).render(&help.desc)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            let col_width = lipgloss::width(&col);
            let sep_width = if columns.is_empty() {
                0
            } else {
                lipgloss::width_visible(&separator)
            };

            if let Some(tail) = self.overflow_tail(total_width, col_width + sep_width) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }
            total_width += col_width + sep_width;
            columns.push(col);
        }

        let mut parts: Vec<&str> = Vec::new();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(col.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    /// `Some(tail)` once adding `item_width` would overflow; the tail is the
    /// ellipsis if it still fits, otherwise empty.
    fn overflow_tail(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles.ellipsis.clone().inline(true).render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    struct Keys {
        start: Binding,
        reset: Binding,
        quit: Binding,
    }

    impl Keys {
        fn new() -> Self {
            Self {
                start: Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start"),
                reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
                quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
            }
        }
    }

    impl KeyMap for Keys {
        fn short_help(&self) -> Vec<&Binding> {
            vec![&self.start, &self.reset, &self.quit]
        }

        fn full_help(&self) -> Vec<Vec<&Binding>> {
            vec![vec![&self.start, &self.reset], vec![&self.quit]]
        }
    }

    fn plain(s: &str) -> String {
        lipgloss::strip_ansi(s)
    }

    #[test]
    fn test_short_help_lists_bindings() {
        let help = Model::new();
        let view = plain(&help.view(&Keys::new()));
        assert_eq!(view, "space start • r reset • q quit");
    }

    #[test]
    fn test_short_help_skips_disabled() {
        let mut keys = Keys::new();
        keys.reset.set_enabled(false);
        let view = plain(&Model::new().view(&keys));
        assert_eq!(view, "space start • q quit");
    }

    #[test]
    fn test_short_help_truncates_with_ellipsis() {
        let help = Model::new().with_width(24);
        let view = plain(&help.view(&Keys::new()));
        assert!(view.starts_with("space start • r reset"));
        assert!(view.ends_with('…'));
        assert!(!view.contains("quit"));
    }

    #[test]
    fn test_full_help_renders_columns() {
        let mut help = Model::new();
        help.show_all = true;
        let view = plain(&help.view(&Keys::new()));
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("space start"));
        assert!(lines[0].contains("q quit"));
        assert!(lines[1].contains("r reset"));
    }

    #[test]
    fn test_full_help_columns_measured_by_widest_line() {
        // "space start" (11) + separator (4) + "q quit" (6).
        let mut help = Model::new().with_width(21);
        help.show_all = true;
        let view = plain(&help.view(&Keys::new()));
        assert!(view.contains("q quit"), "cut off:\n{}", view);
        assert!(!view.contains('…'));

        help.width = 20;
        let view = plain(&help.view(&Keys::new()));
        assert!(!view.contains("q quit"));
    }

    #[test]
    fn test_empty_keymap_renders_nothing() {
        let help = Model::new();
        assert_eq!(help.short_help_view(Vec::new()), "");
    }
}
