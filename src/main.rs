mod app;
mod event;
mod reader;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readcoach::annotate::HighlightColor;
use readcoach::auth::{self, User};
use readcoach::config::Config;
use readcoach::session::{BlitzPhase, GateState};
use readcoach::store::export::{UserExport, export_user, import_user};
use readcoach::store::{JsonStore, SharedStore};

use app::{App, AppScreen, ToastKind};
use event::{AppEvent, EventHandler};
use reader::Focus;
use ui::components::blitz_view::BlitzView;
use ui::components::definition_popup::DefinitionPopup;
use ui::components::login_view::LoginView;
use ui::components::menu::MenuAction;
use ui::components::mistakes_view::MistakesView;
use ui::components::vocabulary_list::VocabularyList;
use ui::components::passage_view::{PassageView, StaticPassage};
use ui::components::question_panel::QuestionPanel;
use ui::components::stats_dashboard::StatsDashboard;
use ui::components::trainer_view::TrainerPanel;
use ui::components::week_list::WeekList;
use ui::components::xp_header::XpHeader;
use ui::layout::{AppLayout, SplitPanes, centered_rect, pack_hint_lines};
use ui::theme::Theme;

const LOG_FILE: &str = "readcoach.log";

#[derive(Parser)]
#[command(name = "readcoach", version, about = "Terminal reading-comprehension and interview-skills trainer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Sign in as this learner")]
    user: Option<String>,

    #[arg(long, help = "Directory for saved progress")]
    data_dir: Option<PathBuf>,

    #[arg(long, value_name = "FILE", requires = "user", help = "Write the learner's data to FILE and exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "FILE", conflicts_with = "export", help = "Load learner data from FILE and exit")]
    import: Option<PathBuf>,
}

fn init_logging(dir: &std::path::Path) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .with_context(|| format!("cannot open log file in {}", dir.display()))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("READCOACH_LOG")
                .unwrap_or_else(|_| "readcoach=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_store = match &cli.data_dir {
        Some(dir) => JsonStore::with_base_dir(dir.clone())?,
        None => JsonStore::new()?,
    };
    init_logging(json_store.base_dir())?;
    let swept = json_store.sweep_stale_temp_files();
    if swept > 0 {
        tracing::info!(count = swept, "removed stale temp files");
    }
    let store: SharedStore = Rc::new(json_store);

    let mut config = Config::load()?;
    config.validate();

    if let Some(path) = &cli.export {
        let name = cli.user.as_deref().unwrap_or_default();
        let user = User::from_name(name);
        let data = export_user(&*store, &config.storage_namespace, &user);
        fs::write(path, serde_json::to_string_pretty(&data)?)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("Exported {} to {}", user.id, path.display());
        return Ok(());
    }
    if let Some(path) = &cli.import {
        let content = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
        let data: UserExport = serde_json::from_str(&content)?;
        import_user(&*store, &config.storage_namespace, &data)?;
        println!("Imported {}", data.user.id);
        return Ok(());
    }

    let theme_name = cli.theme.clone().unwrap_or_else(|| config.theme.clone());
    let theme = Theme::load(&theme_name).unwrap_or_default();
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, store, theme)?;
    if let Some(name) = cli.user.as_deref() {
        match auth::login(name, &app.config.allowed_users) {
            Ok(user) => app.enter_as(user),
            Err(e) => app.login_error = Some(e.to_string()),
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut last = Instant::now();
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => app.paste_into_focus(&text),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        let now = Instant::now();
        app.tick(now - last);
        last = now;

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Login => handle_login_key(app, key),
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::WeekSelect => handle_week_select_key(app, key),
        AppScreen::Week => handle_week_key(app, key),
        AppScreen::Blitz => handle_blitz_key(app, key),
        AppScreen::Trainer => handle_trainer_key(app, key),
        AppScreen::Mistakes => handle_mistakes_key(app, key),
        AppScreen::Vocabulary => handle_vocabulary_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.try_login(),
        KeyCode::Backspace => app.login.backspace(),
        KeyCode::Left => app.login.move_left(),
        KeyCode::Right => app.login.move_right(),
        KeyCode::Char(ch) => app.login.insert(ch),
        _ => {}
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::Curriculum => app.go_to_week_select(),
        MenuAction::Blitz => app.go_to_blitz(),
        MenuAction::Trainer => app.go_to_trainer(),
        MenuAction::Vocabulary => app.go_to_vocabulary(),
        MenuAction::Mistakes => app.go_to_mistakes(),
        MenuAction::Stats => app.go_to_stats(),
        MenuAction::Logout => app.logout(),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                run_menu_action(app, action);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                run_menu_action(app, action);
            }
        }
        _ => {}
    }
}

fn handle_week_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Up | KeyCode::Char('k') => app.week_select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.week_select_next(),
        KeyCode::Enter => app.open_selected_week(),
        _ => {}
    }
}

fn handle_week_key(app: &mut App, key: KeyEvent) {
    if app.definition.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d')) {
            app.definition = None;
        }
        return;
    }
    let Some(reader) = app.reader.as_ref() else {
        app.go_to_week_select();
        return;
    };
    match reader.focus() {
        Focus::Passage => handle_passage_key(app, key),
        Focus::Questions => handle_questions_key(app, key),
        Focus::Checkpoint => handle_checkpoint_key(app, key),
    }
}

fn handle_passage_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('1') => return app.highlight(HighlightColor::Main),
        KeyCode::Char('2') => return app.highlight(HighlightColor::Evidence),
        KeyCode::Char('3') => return app.highlight(HighlightColor::Confusion),
        KeyCode::Char('x') => return app.clear_highlight(),
        KeyCode::Char('d') => return app.lookup_word_at_cursor(),
        KeyCode::Char('y') => return app.copy_attempt(),
        KeyCode::Char('[') => return app.switch_passage(-1),
        KeyCode::Char(']') => return app.switch_passage(1),
        KeyCode::Char('c') => return app.complete_week(),
        KeyCode::Esc => {
            let interview_open = app.reader.as_ref().is_some_and(|r| r.show_interview);
            if !interview_open {
                return app.go_to_week_select();
            }
            if let Some(reader) = app.reader.as_mut() {
                reader.show_interview = false;
            }
            return;
        }
        _ => {}
    }

    let Some(reader) = app.reader.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab => reader.toggle_focus(),
        KeyCode::Left | KeyCode::Char('h') => reader.move_left(),
        KeyCode::Right | KeyCode::Char('l') => reader.move_right(),
        KeyCode::Up | KeyCode::Char('k') => reader.paragraph_up(),
        KeyCode::Down | KeyCode::Char('j') => reader.paragraph_down(),
        KeyCode::Home | KeyCode::Char('0') => reader.line_start(),
        KeyCode::End | KeyCode::Char('$') => reader.line_end(),
        KeyCode::Char('w') => reader.word_forward(),
        KeyCode::Char('b') => reader.word_back(),
        KeyCode::Char('v') => reader.toggle_anchor(),
        KeyCode::Char('e') => reader.toggle_exam_mode(),
        KeyCode::Char('r') => {
            if reader.pending_gate().is_some_and(|(_, s)| s == GateState::Failed) {
                reader.retry_checkpoint();
            }
        }
        KeyCode::Enter => {
            reader.open_checkpoint();
        }
        _ => {}
    }
}

fn handle_questions_key(app: &mut App, key: KeyEvent) {
    let Some(reader) = app.reader.as_mut() else {
        return;
    };
    let multiple_choice = reader
        .current_question()
        .is_some_and(|q| q.is_multiple_choice());

    match key.code {
        KeyCode::Tab | KeyCode::Esc => reader.toggle_focus(),
        KeyCode::Up => reader.prev_question(),
        KeyCode::Down => reader.next_question(),
        _ if multiple_choice => match key.code {
            KeyCode::Left | KeyCode::Char('k') => reader.prev_option(),
            KeyCode::Right | KeyCode::Char('j') => reader.next_option(),
            KeyCode::Char(ch @ 'a'..='f') => {
                let option = (ch as u8 - b'a') as usize;
                app.choose_option(option);
            }
            KeyCode::Enter => {
                let option = reader.option_index();
                app.choose_option(option);
            }
            _ => {}
        },
        KeyCode::Enter => app.submit_paraphrase(),
        _ => {
            let Some(answer) = reader.current_answer_mut() else {
                return;
            };
            match key.code {
                KeyCode::Backspace => answer.backspace(),
                KeyCode::Left => answer.field_mut().move_left(),
                KeyCode::Right => answer.field_mut().move_right(),
                KeyCode::Char(ch) => answer.insert(ch),
                _ => {}
            }
        }
    }
}

fn handle_checkpoint_key(app: &mut App, key: KeyEvent) {
    let Some(reader) = app.reader.as_mut() else {
        return;
    };
    let state = reader.pending_gate().map(|(_, s)| s);
    if state == Some(GateState::Failed) {
        match key.code {
            KeyCode::Char('r') => reader.retry_checkpoint(),
            KeyCode::Esc | KeyCode::Tab => reader.toggle_focus(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Tab => reader.toggle_focus(),
        KeyCode::Char('x') if key.modifiers.contains(KeyModifiers::CONTROL) => reader.give_up_checkpoint(),
        KeyCode::Enter => {
            if reader.submit_checkpoint() {
                app.show_toast("Next paragraph unlocked", ToastKind::Success);
            }
        }
        KeyCode::Backspace => reader.checkpoint_backspace(),
        KeyCode::Char(ch) => reader.checkpoint_insert(ch),
        _ => {}
    }
}

fn handle_blitz_key(app: &mut App, key: KeyEvent) {
    match app.blitz.phase() {
        BlitzPhase::Menu | BlitzPhase::Finished => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => app.start_blitz(),
            KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
            _ => {}
        },
        BlitzPhase::Playing => match key.code {
            KeyCode::Esc => app.go_to_blitz(),
            KeyCode::Char(ch @ 'a'..='d') => app.blitz_answer((ch as u8 - b'a') as usize),
            KeyCode::Char(ch @ '1'..='4') => app.blitz_answer((ch as u8 - b'1') as usize),
            _ => {}
        },
    }
}

fn handle_trainer_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Tab => app.trainer_next(),
        KeyCode::BackTab => app.trainer_prev(),
        KeyCode::Enter => app.trainer_submit(),
        KeyCode::Backspace => app.trainer_answer.backspace(),
        KeyCode::Left => app.trainer_answer.field_mut().move_left(),
        KeyCode::Right => app.trainer_answer.field_mut().move_right(),
        KeyCode::Char(ch) if !app.trainer_submitted => app.trainer_answer.insert(ch),
        _ => {}
    }
}

fn handle_mistakes_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Up | KeyCode::Char('k') => app.mistakes_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.mistakes_next(),
        KeyCode::Enter | KeyCode::Char('m') => app.mark_mastered(),
        _ => {}
    }
}

// Letters feed the search, so movement stays on the arrow keys.
fn handle_vocabulary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.vocab_escape(),
        KeyCode::Up => app.vocab_prev(),
        KeyCode::Down => app.vocab_next(),
        KeyCode::Enter => app.vocab_open_source(),
        KeyCode::Backspace => app.vocab_backspace(),
        KeyCode::Char(ch) => app.vocab_type(ch),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

// --- rendering ---

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    let title = match app.screen {
        AppScreen::Login => "Sign In",
        AppScreen::Menu => "Menu",
        AppScreen::WeekSelect => "Curriculum",
        AppScreen::Week => app
            .reader
            .as_ref()
            .map_or("Week", |r| r.quiz.week().title.as_str()),
        AppScreen::Blitz => "Vocabulary Blitz",
        AppScreen::Trainer => "No-Copy Trainer",
        AppScreen::Mistakes => "Mistakes Review",
        AppScreen::Vocabulary => "Vocabulary Repository",
        AppScreen::Stats => "Statistics",
    };
    let header = XpHeader::new(
        title,
        app.user.as_ref().map(|u| u.name.as_str()),
        app.xp.as_ref().map(|x| x.state()),
        app.theme,
    );
    frame.render_widget(header, layout.header);

    let hints: &[&str] = match app.screen {
        AppScreen::Login => &["[Enter] Sign in", "[Esc] Quit"],
        AppScreen::Menu => &["[1-3/v/m/s] Open", "[j/k] Move", "[t] Theme", "[l] Log out", "[q] Quit"],
        AppScreen::WeekSelect => &["[j/k] Move", "[Enter] Open", "[Esc] Back"],
        AppScreen::Week => week_hints(app),
        AppScreen::Blitz => &["[a-d] Answer", "[Enter] Start", "[Esc] Back"],
        AppScreen::Trainer => &["[Enter] Submit", "[Tab] Next", "[Shift+Tab] Previous", "[Esc] Back"],
        AppScreen::Mistakes => &["[j/k] Move", "[m] Mark mastered", "[Esc] Back"],
        AppScreen::Vocabulary => &["[type] Search", "[Up/Down] Move", "[Enter] Review source", "[Esc] Clear/Back"],
        AppScreen::Stats => &["[t] Theme", "[Esc] Back"],
    };
    let footer_lines: Vec<Line> = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);

    match app.screen {
        AppScreen::Login => render_login(frame, app, layout.main),
        AppScreen::Menu => {
            let menu_area = centered_rect(50, 90, layout.main);
            frame.render_widget(&app.menu, menu_area);
        }
        AppScreen::WeekSelect => render_week_select(frame, app, layout.main),
        AppScreen::Week => render_week(frame, app, layout.main),
        AppScreen::Blitz => {
            let view = BlitzView::new(&app.blitz, app.blitz_last, app.config.blitz_duration_secs, app.theme);
            frame.render_widget(view, centered_rect(70, 90, layout.main));
        }
        AppScreen::Trainer => render_trainer(frame, app, layout.main),
        AppScreen::Mistakes => {
            let items = app.review_items();
            let view = MistakesView {
                items: &items,
                selected: app.mistakes_selected,
                theme: app.theme,
            };
            frame.render_widget(view, layout.main);
        }
        AppScreen::Vocabulary => {
            let items = app.vocab_matches();
            let view = VocabularyList {
                items: &items,
                total: app.vocab_total(),
                query: &app.vocab_query,
                selected: app.vocab_selected,
                theme: app.theme,
            };
            frame.render_widget(view, layout.main);
        }
        AppScreen::Stats => render_stats(frame, app, layout.main),
    }

    render_toast(frame, app, layout.main);
}

fn week_hints(app: &App) -> &'static [&'static str] {
    match app.reader.as_ref().map(|r| r.focus()) {
        Some(Focus::Questions) => &[
            "[Up/Down] Question",
            "[Left/Right] Option",
            "[a-d] Choose",
            "[Enter] Submit",
            "[Tab] Passage",
        ],
        Some(Focus::Checkpoint) => &["[Enter] Continue", "[Ctrl+X] I'm not sure", "[r] Retry", "[Esc] Passage"],
        _ => &[
            "[hjkl/wb] Move",
            "[v] Select",
            "[1] Main idea",
            "[2] Evidence",
            "[3] Confusing",
            "[x] Clear",
            "[d] Define",
            "[Enter] Checkpoint",
            "[[/]] Passage",
            "[e] Exam",
            "[c] Complete",
            "[Tab] Questions",
            "[Esc] Back",
        ],
    }
}

fn render_login(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let view = LoginView {
        field: &app.login,
        error: app.login_error.as_deref(),
        theme: app.theme,
    };
    frame.render_widget(view, centered_rect(40, 60, area));
}

fn render_week_select(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let completed = app.progress.completed_weeks(app.user_id());
    let view = WeekList {
        weeks: app.weeks(),
        completed: &completed,
        selected: app.week_selected,
        theme: app.theme,
    };
    frame.render_widget(view, centered_rect(70, 100, area));
}

fn render_week(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(reader) = app.reader.as_ref() else {
        return;
    };
    let panes = SplitPanes::new(area);
    let title = reader.quiz.passage().map_or("Passage", |p| p.title.as_str());
    frame.render_widget(PassageView::new(reader, title, app.theme), panes.primary);
    frame.render_widget(QuestionPanel::new(reader, app.theme), panes.secondary);

    if let Some(popup) = &app.definition {
        let view = DefinitionPopup {
            word: &popup.word,
            result: &popup.result,
            theme: app.theme,
        };
        frame.render_widget(view, centered_rect(50, 50, area));
    }
}

fn render_trainer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(scenario) = app.trainer_scenario() else {
        let msg = Paragraph::new(Span::styled(
            "  No trainer scenarios available.",
            Style::default().fg(app.theme.colors.text_dim()),
        ));
        frame.render_widget(msg, area);
        return;
    };
    let panes = SplitPanes::new(area);
    frame.render_widget(StaticPassage::new(&scenario.content_html, &scenario.title, app.theme), panes.primary);
    let panel = TrainerPanel {
        scenario,
        position: (app.trainer_index, app.trainer_scenarios().len()),
        answer: &app.trainer_answer,
        finished: app.trainer_submitted,
        theme: app.theme,
    };
    frame.render_widget(panel, panes.secondary);
}

fn render_stats(frame: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let skills = app
        .dashboard
        .as_mut()
        .map(|d| d.stats().clone())
        .unwrap_or_default();
    let themes = app.theme_progress();
    let completed = app.progress.completed_weeks(app.user_id()).len();
    let mistakes = app.progress.mistakes(app.user_id()).len();
    let Some(xp) = app.xp.as_ref() else {
        return;
    };
    let view = StatsDashboard::new(xp.state(), xp.daily_goal(), &skills, &themes, app.theme)
        .weeks(completed, app.weeks().len())
        .mistakes(mistakes);
    frame.render_widget(view, area);
}

fn render_toast(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(toast) = &app.toast else {
        return;
    };
    let colors = &app.theme.colors;
    let color = match toast.kind {
        ToastKind::Info => colors.accent(),
        ToastKind::Success => colors.success(),
        ToastKind::Warning => colors.error(),
    };
    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height),
        width,
        height,
    );
    frame.render_widget(Clear, rect);
    let block = Block::bordered()
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(colors.bg()));
    frame.render_widget(
        Paragraph::new(Span::styled(toast.message.clone(), Style::default().fg(color))).block(block),
        rect,
    );
}
