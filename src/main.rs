use std::io;
use std::sync::Arc;

use color_eyre::Result;
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use vidya::adapters::{EspeakSynthesizer, ReqwestHttpClient};
use vidya::app::{App, AppMessage, CourseStage, Focus, Screen};
use vidya::catalog;
use vidya::config::Config;
use vidya::state::ActiveView;
use vidya::storage::Store;
use vidya::traits::Synthesizer;
use vidya::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("vidya {}", VERSION);
        std::process::exit(0);
    }

    color_eyre::install()?;
    setup_panic_hook();
    let _log_guard = init_logging();

    // =========================================================
    // Pre-flight: configuration and storage, before the TUI
    // =========================================================

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if !config.image_enabled() {
        eprintln!(
            "Warning: {} is not set; image generation is disabled.",
            vidya::config::IMAGE_KEY_ENV
        );
    }

    let store = match Store::open_default() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Storage error: {}", e);
            std::process::exit(1);
        }
    };

    // A missing TTS binary disables read-aloud but is not fatal.
    let synth: Arc<dyn Synthesizer> = match EspeakSynthesizer::detect() {
        Ok(synth) => Arc::new(synth),
        Err(e) => {
            tracing::warn!(error = %e, "speech synthesis unavailable");
            eprintln!("Warning: {}; read-aloud is disabled.", e);
            Arc::new(NullSynthesizer)
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;

    // =========================================================
    // TUI initialization
    // =========================================================

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let http = Arc::new(ReqwestHttpClient::new());
    let mut app = App::new(config, store, http, synth);

    let result = runtime.block_on(run_app(&mut terminal, &mut app));

    restore_terminal(&mut terminal)?;
    result
}

/// Synthesizer used when no TTS binary exists; every start fails and
/// the controller stays idle.
struct NullSynthesizer;

impl Synthesizer for NullSynthesizer {
    fn start(
        &self,
        _text: &str,
        _settings: &vidya::state::VoiceSettings,
    ) -> Result<(), vidya::traits::SpeechError> {
        Err(vidya::traits::SpeechError::Unavailable(
            "no TTS binary found".to_string(),
        ))
    }

    fn stop(&self) {}
}

/// Route tracing output to a file so the TUI stays clean.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::data_dir()?.join("vidya");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, "vidya.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

/// Setup panic hook to restore the terminal before printing the panic.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = execute!(io::stdout(), Show);
        original_hook(panic_info);
    }));
}

/// Restore terminal to normal mode.
fn restore_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<ReqwestHttpClient>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();

    // Take the message receiver (we need ownership for select!)
    let mut message_rx: Option<mpsc::UnboundedReceiver<AppMessage>> = app.message_rx.take();

    loop {
        if app.needs_redraw || app.is_busy() {
            terminal.draw(|f| {
                ui::render(f, &*app);
            })?;
            app.needs_redraw = false;
        }

        let timeout = tokio::time::sleep(std::time::Duration::from_millis(100));

        tokio::select! {
            _ = timeout => {
                app.tick();
            }

            event_result = event_stream.next() => {
                if let Some(Ok(event)) = event_result {
                    match event {
                        Event::Resize(..) => {
                            app.mark_dirty();
                        }
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            app.mark_dirty();

                            if key.code == KeyCode::Char('c')
                                && key.modifiers.contains(KeyModifiers::CONTROL)
                            {
                                app.quit();
                                return Ok(());
                            }

                            match app.screen {
                                Screen::CourseSelect => handle_course_select_key(app, key.code),
                                Screen::Study => {
                                    if handle_study_key(app, key.code) {
                                        return Ok(());
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }

            msg = async {
                match &mut message_rx {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(msg) = msg {
                    app.handle_message(msg);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Keys on the course-selection screen.
fn handle_course_select_key(app: &mut App<ReqwestHttpClient>, code: KeyCode) {
    match app.course_stage {
        CourseStage::Subject => {
            let count = catalog::subjects().len();
            match code {
                KeyCode::Up => {
                    app.subject_cursor = app.subject_cursor.saturating_sub(1);
                }
                KeyCode::Down => {
                    if app.subject_cursor + 1 < count {
                        app.subject_cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    app.standard_cursor = 0;
                    app.course_stage = CourseStage::Standard;
                }
                KeyCode::Char('q') => app.quit(),
                _ => {}
            }
        }
        CourseStage::Standard => {
            let subject = catalog::subjects()
                .get(app.subject_cursor)
                .copied()
                .unwrap_or_default();
            let standards = catalog::standards_for(subject);
            match code {
                KeyCode::Up => {
                    app.standard_cursor = app.standard_cursor.saturating_sub(1);
                }
                KeyCode::Down => {
                    if app.standard_cursor + 1 < standards.len() {
                        app.standard_cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(standard) = standards.get(app.standard_cursor) {
                        let standard = standard.to_string();
                        app.select_course(subject, &standard);
                    }
                }
                KeyCode::Esc => {
                    app.course_stage = CourseStage::Subject;
                }
                KeyCode::Char('q') => app.quit(),
                _ => {}
            }
        }
    }
}

/// Keys on the study screen; returns true to exit the app.
fn handle_study_key(app: &mut App<ReqwestHttpClient>, code: KeyCode) -> bool {
    // Chat input captures printable keys while focused.
    if app.focus == Focus::Chat {
        match code {
            KeyCode::Char(c) => {
                app.chat_input.push(c);
                return false;
            }
            KeyCode::Backspace => {
                app.chat_input.pop();
                return false;
            }
            KeyCode::Enter => {
                app.submit_chat();
                return false;
            }
            KeyCode::Esc => {
                app.focus = Focus::Topics;
                return false;
            }
            KeyCode::Tab => {
                app.focus = Focus::Chapters;
                return false;
            }
            _ => return false,
        }
    }

    match code {
        KeyCode::Char('q') => {
            app.quit();
            return true;
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Chapters => Focus::Topics,
                Focus::Topics => Focus::Content,
                Focus::Content => Focus::Chat,
                Focus::Chat => Focus::Chapters,
            };
        }
        KeyCode::Up => match app.focus {
            Focus::Chapters => app.chapter_cursor = app.chapter_cursor.saturating_sub(1),
            Focus::Topics => app.topic_cursor = app.topic_cursor.saturating_sub(1),
            _ => {}
        },
        KeyCode::Down => match app.focus {
            Focus::Chapters => {
                if app.chapter_cursor + 1 < app.chapters().len() {
                    app.chapter_cursor += 1;
                }
            }
            Focus::Topics => {
                if app.topic_cursor + 1 < app.state.current_topics().len() {
                    app.topic_cursor += 1;
                }
            }
            _ => {}
        },
        KeyCode::Left if app.focus == Focus::Content => app.quiz_prev(),
        KeyCode::Right if app.focus == Focus::Content => app.quiz_next(),
        KeyCode::Enter => match app.focus {
            Focus::Chapters => {
                if let Some(chapter) = app.chapters().get(app.chapter_cursor).copied() {
                    app.select_chapter(chapter);
                }
            }
            Focus::Topics => {
                app.select_topic(app.topic_cursor);
            }
            Focus::Content => app.quiz_reveal(),
            Focus::Chat => {}
        },
        KeyCode::Char('a') => app.generate_answer(),
        KeyCode::Char('i') => app.generate_image(),
        KeyCode::Char('z') => app.generate_quiz(),
        KeyCode::Char('e') => app.generate_eli5(),
        KeyCode::Char('s') => app.speak_selected_topic(),
        KeyCode::Char('m') => app.fetch_more_topics(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('c') => app.focus = Focus::Chat,
        KeyCode::Char('[') => app.adjust_voice_rate(-0.1),
        KeyCode::Char(']') => app.adjust_voice_rate(0.1),
        KeyCode::Char('{') => app.adjust_voice_pitch(-0.1),
        KeyCode::Char('}') => app.adjust_voice_pitch(0.1),
        KeyCode::Char('R') => app.reset_course(),
        KeyCode::Char('1') => app.set_active_view(ActiveView::Answer),
        KeyCode::Char('2') => app.set_active_view(ActiveView::Image),
        KeyCode::Char('3') => app.set_active_view(ActiveView::Quiz),
        KeyCode::Char('4') => app.set_active_view(ActiveView::Eli5),
        _ => {}
    }
    false
}
