use super::{Focus, Model};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

const TITLE: &str = "Interval Habit";
const HERO_TITLE: &str = "Focus on the habit, we'll keep the time";
const HERO_BLURB: &str = "Set an interval and let it loop until you stop. Perfect for repetitive routines like brushing teeth, stretching, or pomodoros.";

const STEPS: [(&str, &str); 3] = [
    ("1. Set interval", "Choose minutes and seconds for one round."),
    ("2. Auto-repeat", "It loops until you stop. We'll ping you each cycle."),
    ("3. Track cycles", "See how many rounds you've completed."),
];

fn title_style() -> Style {
    Style::new().bold(true).foreground(Color::from("#7571F9"))
}

fn muted() -> Style {
    Style::new().foreground(Color::from("#8A8A8A"))
}

fn button(label: &str, focused: bool) -> String {
    let text = format!("[ {} ]", label);
    if focused {
        Style::new()
            .bold(true)
            .foreground(Color::from("#EE6FF8"))
            .render(&text)
    } else {
        Style::new().foreground(Color::from("#C0C0C0")).render(&text)
    }
}

/// Greedy word wrap to `width` columns.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

impl Model {
    pub(super) fn render(&self) -> String {
        let sections = [
            self.header_view(),
            self.hero_view(),
            self.card_view(),
            self.steps_view(),
        ];
        let mut out = sections.join("\n\n");
        if !self.toasts.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.toasts.view(self.width));
        }
        out.push_str("\n\n");
        out.push_str(&self.help.view(self));
        out
    }

    fn header_view(&self) -> String {
        let title = title_style().render(TITLE);
        let account = match (&self.session, self.signing_in) {
            (Some(session), _) => muted().render(&format!("Signed in as {}", session.display_name())),
            (None, true) => muted().render("Signing in…"),
            (None, false) => button("Continue with Google", self.focus == Focus::SignIn),
        };
        let used = lipgloss::width_visible(&title) + lipgloss::width_visible(&account);
        let gap = self.width.saturating_sub(used).max(2);
        format!("{}{}{}", title, " ".repeat(gap), account)
    }

    fn hero_view(&self) -> String {
        let mut lines = vec![Style::new().bold(true).render(HERO_TITLE)];
        lines.extend(
            wrap(HERO_BLURB, self.width.clamp(20, 72))
                .iter()
                .map(|l| muted().render(l)),
        );
        lines.join("\n")
    }

    fn card_view(&self) -> String {
        let countdown = self.timer.view();
        let ring = self.ring.view_as(self.timer.progress(), &countdown);

        let start_label = if self.timer.running() { "Pause" } else { "Start" };
        let controls = [
            self.minutes.view(),
            self.seconds.view(),
            self.repeat.view(),
            String::new(),
            format!(
                "{} {}",
                button(start_label, self.focus == Focus::StartPause),
                button("Reset", self.focus == Focus::Reset)
            ),
            String::new(),
            format!("Cycles: {}", self.timer.cycles()),
        ]
        .join("\n");

        let body = lipgloss::join_horizontal(lipgloss::TOP, &[ring.as_str(), "    ", controls.as_str()]);
        let card = Style::new()
            .border_style(lipgloss::normal_border())
            .border_top(true)
            .border_bottom(true)
            .border_left(true)
            .border_right(true)
            .border_foreground(Color::from("#444444"))
            .padding(0, 2, 0, 2)
            .render(&body);

        format!("{}\n{}", Style::new().bold(true).render("Interval Timer"), card)
    }

    fn steps_view(&self) -> String {
        let mut lines = vec![Style::new().bold(true).render("How it works")];
        for (title, desc) in STEPS {
            lines.push(format!("  {}  {}", title_style().render(title), muted().render(desc)));
        }
        lines.join("\n")
    }
}
