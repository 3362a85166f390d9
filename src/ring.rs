//! Circular progress indicator.
//!
//! Draws a ring of glyphs on the character grid and fills it clockwise from
//! twelve o'clock as the cycle elapses. A label, normally the `MM:SS`
//! countdown, sits in the middle. Terminal cells are roughly twice as tall as
//! they are wide, so the grid is stretched horizontally to look round.
//!
//! ```rust
//! use interval_habit::ring::{new, with_radius, with_fill_characters};
//!
//! let mut ring = new(&[with_radius(3), with_fill_characters('#', '.')]);
//! ring.set_percent(0.25);
//! let view = ring.view("00:45");
//! assert_eq!(view.lines().count(), 7);
//! assert!(view.contains("00:45"));
//! ```

use lipgloss_extras::lipgloss;
use lipgloss_extras::lipgloss::blending::blend_1d;
use lipgloss_extras::prelude::*;
use std::f64::consts::TAU;

const DEFAULT_RADIUS: usize = 5;
const MIN_RADIUS: usize = 2;
const DEFAULT_RAMP_A: &str = "#5A56E0";
const DEFAULT_RAMP_B: &str = "#EE6FF8";

/// Construction options, applied in order by [`new`].
pub enum RingOption {
    WithDefaultGradient,
    WithGradient(String, String),
    WithSolidFill(String),
    WithFillCharacters(char, char),
    WithRadius(usize),
    WithoutLabel,
}

impl RingOption {
    fn apply(&self, m: &mut Model) {
        match self {
            RingOption::WithDefaultGradient => {
                m.set_ramp(DEFAULT_RAMP_A.to_string(), DEFAULT_RAMP_B.to_string());
            }
            RingOption::WithGradient(a, b) => m.set_ramp(a.clone(), b.clone()),
            RingOption::WithSolidFill(color) => {
                m.full_color = color.clone();
                m.use_ramp = false;
            }
            RingOption::WithFillCharacters(full, empty) => {
                m.full = *full;
                m.empty = *empty;
            }
            RingOption::WithRadius(r) => m.radius = (*r).max(MIN_RADIUS),
            RingOption::WithoutLabel => m.show_label = false,
        }
    }
}

pub fn with_default_gradient() -> RingOption {
    RingOption::WithDefaultGradient
}

pub fn with_gradient(color_a: String, color_b: String) -> RingOption {
    RingOption::WithGradient(color_a, color_b)
}

pub fn with_solid_fill(color: String) -> RingOption {
    RingOption::WithSolidFill(color)
}

pub fn with_fill_characters(full: char, empty: char) -> RingOption {
    RingOption::WithFillCharacters(full, empty)
}

pub fn with_radius(radius: usize) -> RingOption {
    RingOption::WithRadius(radius)
}

pub fn without_label() -> RingOption {
    RingOption::WithoutLabel
}

#[derive(Debug, Clone)]
pub struct Model {
    /// Radius in rows. The grid is `2r+1` rows by `4r+1` columns.
    pub radius: usize,
    pub full: char,
    pub full_color: String,
    pub empty: char,
    pub empty_color: String,
    pub show_label: bool,
    pub label_style: Style,
    percent: f64,
    use_ramp: bool,
    ramp_color_a: String,
    ramp_color_b: String,
}

pub fn new(opts: &[RingOption]) -> Model {
    let mut m = Model {
        radius: DEFAULT_RADIUS,
        full: '●',
        full_color: "#7571F9".to_string(),
        empty: '·',
        empty_color: "#606060".to_string(),
        show_label: true,
        label_style: Style::new().bold(true),
        percent: 0.0,
        use_ramp: false,
        ramp_color_a: String::new(),
        ramp_color_b: String::new(),
    };
    for opt in opts {
        opt.apply(&mut m);
    }
    m
}

/// One cell of the ring: its grid position and its clockwise position
/// around the circle as a fraction of a full turn.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    row: usize,
    col: usize,
    turn: f64,
}

impl Model {
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Sets the filled fraction, clamped to `[0, 1]`.
    pub fn set_percent(&mut self, p: f64) {
        self.percent = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    }

    pub fn width(&self) -> usize {
        4 * self.radius + 1
    }

    pub fn height(&self) -> usize {
        2 * self.radius + 1
    }

    pub fn view(&self, label: &str) -> String {
        self.view_as(self.percent, label)
    }

    pub fn view_as(&self, percent: f64, label: &str) -> String {
        let percent = percent.clamp(0.0, 1.0);
        let (w, h) = (self.width(), self.height());
        let mut grid: Vec<Vec<String>> = vec![vec![" ".to_string(); w]; h];

        let cells = self.cells();
        let colors = if self.use_ramp {
            let start = Color::from(self.ramp_color_a.as_str());
            let end = Color::from(self.ramp_color_b.as_str());
            blend_1d(cells.len().max(2), vec![start, end])
        } else {
            Vec::new()
        };
        let empty_style = Style::new().foreground(Color::from(self.empty_color.as_str()));
        let solid_style = Style::new().foreground(Color::from(self.full_color.as_str()));

        for (i, cell) in cells.iter().enumerate() {
            let filled = percent >= 1.0 || cell.turn < percent;
            grid[cell.row][cell.col] = if !filled {
                empty_style.render(&self.empty.to_string())
            } else if let Some(color) = colors.get(i) {
                Style::new()
                    .foreground(color.clone())
                    .render(&self.full.to_string())
            } else {
                solid_style.render(&self.full.to_string())
            };
        }

        let label_w = lipgloss::width_visible(label);
        if self.show_label && label_w > 0 && label_w + 2 <= w {
            let row = &mut grid[self.radius];
            let left = (w - label_w) / 2;
            row[left] = self.label_style.render(label);
            for cell in row.iter_mut().skip(left + 1).take(label_w - 1) {
                cell.clear();
            }
        }

        grid.into_iter()
            .map(|row| row.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Ring cells in clockwise order starting at twelve o'clock.
    fn cells(&self) -> Vec<Cell> {
        let r = self.radius as f64;
        let mut cells = Vec::new();
        for row in 0..self.height() {
            for col in 0..self.width() {
                let dx = (col as f64 - 2.0 * r) / 2.0;
                let dy = row as f64 - r;
                let dist = (dx * dx + dy * dy).sqrt();
                if (dist - r).abs() >= 0.5 {
                    continue;
                }
                let mut angle = dx.atan2(-dy);
                if angle < 0.0 {
                    angle += TAU;
                }
                cells.push(Cell {
                    row,
                    col,
                    turn: angle / TAU,
                });
            }
        }
        cells.sort_by(|a, b| a.turn.total_cmp(&b.turn));
        cells
    }

    fn set_ramp(&mut self, color_a: String, color_b: String) {
        self.use_ramp = true;
        self.ramp_color_a = color_a;
        self.ramp_color_b = color_b;
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[with_default_gradient()])
    }
}
