use super::*;
use crate::clock::ManualClock;
use crate::config::FeedbackSettings;
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;

fn quiet_settings() -> Settings {
    Settings {
        feedback: FeedbackSettings {
            bell: false,
            tone: false,
            notification: false,
        },
        ..Settings::default()
    }
}

fn page() -> (Model, ManualClock) {
    let clock = ManualClock::new();
    let model = Model::new(&quiet_settings()).with_clock(Arc::new(clock.clone()));
    (model, clock)
}

fn press(model: &mut Model, code: KeyCode) -> Option<Cmd> {
    model.update(Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    }))
}

fn frame(model: &mut Model) -> Option<Cmd> {
    let msg = model.timer.live_frame();
    model.update(Box::new(msg))
}

fn screen(model: &Model) -> String {
    lipgloss::strip_ansi(&BubbleTeaModel::view(model))
}

struct SignsIn;

impl AuthProvider for SignsIn {
    fn sign_in(&self) -> Result<Session, AuthError> {
        Ok(Session {
            access_token: "token".to_string(),
            refresh_token: None,
            email: Some("ada@example.com".to_string()),
        })
    }
}

#[test]
fn test_initial_page() {
    let (model, _) = page();
    assert_eq!(model.focus(), Focus::StartPause);
    assert!(!model.timer.running());

    let view = screen(&model);
    for text in [
        "Interval Habit",
        "Continue with Google",
        "Focus on the habit, we'll keep the time",
        "Interval Timer",
        "02:00",
        "Auto-repeat [■ on ]  Restart interval automatically",
        "[ Start ]",
        "[ Reset ]",
        "Cycles: 0",
        "How it works",
        "1. Set interval",
        "2. Auto-repeat",
        "3. Track cycles",
    ] {
        assert!(view.contains(text), "missing {:?} in\n{}", text, view);
    }
}

#[test]
fn test_space_starts_and_pauses() {
    let (mut model, _) = page();
    assert!(press(&mut model, KeyCode::Char(' ')).is_some());
    assert!(model.timer.running());
    assert_eq!(model.keys.toggle.help().desc, "pause");
    assert!(screen(&model).contains("[ Pause ]"));

    assert!(press(&mut model, KeyCode::Char('s')).is_none());
    assert!(!model.timer.running());
    assert_eq!(model.keys.toggle.help().desc, "start");
}

#[test]
fn test_enter_activates_focused_button() {
    let (mut model, _) = page();
    press(&mut model, KeyCode::Enter);
    assert!(model.timer.running());

    model.set_focus(Focus::Reset);
    press(&mut model, KeyCode::Enter);
    assert!(!model.timer.running());
    assert_eq!(model.timer.remaining_ms(), 120_000);
}

#[test]
fn test_tab_cycles_focus() {
    let (mut model, _) = page();
    press(&mut model, KeyCode::Tab);
    assert_eq!(model.focus(), Focus::Reset);
    press(&mut model, KeyCode::Tab);
    assert_eq!(model.focus(), Focus::SignIn);
    press(&mut model, KeyCode::Tab);
    assert_eq!(model.focus(), Focus::Minutes);
    assert!(model.minutes.focused());
    press(&mut model, KeyCode::BackTab);
    assert_eq!(model.focus(), Focus::SignIn);
    assert!(!model.minutes.focused());
}

#[test]
fn test_editing_fields_updates_timer() {
    let (mut model, _) = page();
    model.set_focus(Focus::Minutes);
    press(&mut model, KeyCode::Char('5'));
    assert_eq!(model.minutes.value(), 25);
    assert_eq!(model.timer.state().minutes(), 25);

    press(&mut model, KeyCode::Enter);
    assert_eq!(model.focus(), Focus::Seconds);
    press(&mut model, KeyCode::Char('9'));
    press(&mut model, KeyCode::Char('9'));
    assert_eq!(model.seconds.value(), 59);
    assert_eq!(model.timer.duration_ms(), (25 * 60 + 59) * 1000);
    assert!(screen(&model).contains("25:59"));

    press(&mut model, KeyCode::Down);
    assert_eq!(model.timer.state().seconds(), 58);
}

#[test]
fn test_global_keys_still_work_on_a_field() {
    let (mut model, _) = page();
    model.set_focus(Focus::Seconds);
    press(&mut model, KeyCode::Char('s'));
    assert!(model.timer.running());
    press(&mut model, KeyCode::Char('r'));
    assert!(!model.timer.running());
}

#[test]
fn test_auto_repeat_key_and_switch() {
    let (mut model, _) = page();
    assert!(model.repeat.is_on());
    press(&mut model, KeyCode::Char('a'));
    assert!(!model.repeat.is_on());
    assert!(!model.timer.state().auto_repeat());

    model.set_focus(Focus::Repeat);
    press(&mut model, KeyCode::Enter);
    assert!(model.repeat.is_on());
    assert!(model.timer.state().auto_repeat());
}

#[test]
fn test_cycles_are_counted_on_screen() {
    let (mut model, clock) = page();
    model.set_focus(Focus::Minutes);
    press(&mut model, KeyCode::Delete);
    model.set_focus(Focus::Seconds);
    press(&mut model, KeyCode::Char('3'));
    assert_eq!(model.timer.duration_ms(), 3_000);

    press(&mut model, KeyCode::Char(' '));
    for _ in 0..2 {
        clock.advance_ms(3_000);
        assert!(frame(&mut model).is_some());
    }
    assert_eq!(model.timer.cycles(), 2);
    assert!(model.timer.running());
    assert!(screen(&model).contains("Cycles: 2"));
}

#[test]
fn test_single_cycle_stops_at_zero() {
    let (mut model, clock) = page();
    press(&mut model, KeyCode::Char('a'));
    press(&mut model, KeyCode::Char(' '));
    clock.advance_ms(120_000);
    frame(&mut model);

    assert!(!model.timer.running());
    let view = screen(&model);
    assert!(view.contains("00:00"));
    assert!(view.contains("Cycles: 1"));
    assert!(view.contains("[ Start ]"));
}

#[test]
fn test_help_toggle_and_width() {
    let (mut model, _) = page();
    assert!(!model.help.show_all);
    press(&mut model, KeyCode::Char('?'));
    assert!(model.help.show_all);
    assert_eq!(model.keys.help.help().desc, "less");
    assert!(screen(&model).contains("increase"));

    model.update(Box::new(WindowSizeMsg {
        width: 120,
        height: 40,
    }));
    assert_eq!(model.help.width, 120);
}

#[test]
fn test_quit_stops_the_loop() {
    let (mut model, clock) = page();
    press(&mut model, KeyCode::Char(' '));
    let live = model.timer.live_frame();
    assert!(press(&mut model, KeyCode::Char('q')).is_some());

    clock.advance_ms(1_000);
    assert!(model.update(Box::new(live)).is_none());
}

#[test]
fn test_not_configured_sign_in_shows_info_toast() {
    let (mut model, _) = page();
    model.update(Box::new(AuthResultMsg(Err(AuthError::NotConfigured))));

    assert!(!model.signing_in());
    let toast = &model.toasts.toasts()[0];
    assert_eq!(toast.kind, toast::Kind::Info);
    assert_eq!(toast.title, NOT_CONFIGURED_TITLE);
    assert_eq!(toast.description.as_deref(), Some(NOT_CONFIGURED_BODY));
    assert!(screen(&model).contains(NOT_CONFIGURED_TITLE));
    assert!(model.session().is_none());
}

#[test]
fn test_failed_sign_in_shows_error_toast() {
    let (mut model, _) = page();
    model.update(Box::new(AuthResultMsg(Err(AuthError::Timeout))));
    let toast = &model.toasts.toasts()[0];
    assert_eq!(toast.kind, toast::Kind::Error);
    assert_eq!(
        toast.description.as_deref(),
        Some("timed out waiting for the browser to finish signing in")
    );
}

#[test]
fn test_auth_never_touches_the_timer() {
    let (mut model, _) = page();
    press(&mut model, KeyCode::Char(' '));
    model.update(Box::new(AuthResultMsg(Err(AuthError::Timeout))));
    assert!(model.timer.running());
    assert_eq!(model.timer.cycles(), 0);
}

#[tokio::test]
async fn test_placeholder_sign_in_round_trip() {
    let (mut model, _) = page();
    let cmd = press(&mut model, KeyCode::Char('g')).expect("sign-in command");
    assert!(model.signing_in());
    assert!(screen(&model).contains("Signing in"));

    // Presses while in flight are ignored.
    assert!(model.sign_in().is_none());

    let msg = cmd.await.expect("auth result");
    model.update(msg);
    assert!(!model.signing_in());
    assert_eq!(model.toasts.toasts()[0].title, NOT_CONFIGURED_TITLE);
}

#[tokio::test]
async fn test_successful_sign_in() {
    let (model, _) = page();
    let mut model = model.with_auth(Arc::new(SignsIn));
    model.set_focus(Focus::SignIn);
    let cmd = press(&mut model, KeyCode::Enter).expect("sign-in command");
    let msg = cmd.await.expect("auth result");
    model.update(msg);

    assert_eq!(
        model.session().and_then(|s| s.email.as_deref()),
        Some("ada@example.com")
    );
    assert_eq!(model.toasts.toasts()[0].title, "Signed in as ada@example.com");
    assert!(screen(&model).contains("Signed in as ada@example.com"));
    assert!(!model.keys.sign_in.enabled());
    assert!(press(&mut model, KeyCode::Char('g')).is_none());
}

#[test]
fn test_toast_expiry_message() {
    let (mut model, _) = page();
    model.update(Box::new(AuthResultMsg(Err(AuthError::Timeout))));
    let id = model.toasts.toasts()[0].id;
    model.update(Box::new(toast::ExpireMsg { id }));
    assert!(model.toasts.is_empty());
}

#[test]
fn test_focus_order_wraps() {
    assert_eq!(Focus::SignIn.next(), Focus::Minutes);
    assert_eq!(Focus::Minutes.prev(), Focus::SignIn);
    assert_eq!(Focus::Seconds.next(), Focus::Repeat);
}
