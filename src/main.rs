use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Paragraph};
use std::collections::VecDeque;
use std::io;
use std::process::exit;
use std::time::{Duration, Instant};

use smartstatus::config::{Cli, load_config, reset_config, save_config};
use smartstatus::logging::init_logging;
use smartstatus::types::Target;
use smartstatus::ui::{self, input};
use smartstatus::{DismissBehavior, StatusRegistry, StatusWidget};

fn display_startup_info(dismiss: DismissBehavior, fade_ms: u64) {
    eprintln!("🚀 Starting smartstatus demo...");
    eprintln!("🧩 Widgets: upload, sync, and a screen-level status");
    eprintln!(
        "🖱️  Dismiss control: {}",
        match dismiss {
            DismissBehavior::HideOnly => "hide only",
            DismissBehavior::Destroy => "destroy",
        }
    );
    eprintln!("⏱️  Fade-out: {} ms", fade_ms);
    eprintln!();
    eprintln!("🎯 Tip: Press 'r' to reset, 'h' to hide, 's' to show, 'q' to quit");
    eprintln!("🖱️  Click a widget's ✕ to dismiss it");
    eprintln!();
}

/// Title bar, the two demo panels, and the footer.
fn layout_chunks(screen: Rect) -> (Rect, Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Title
                Constraint::Length(3), // Panels
                Constraint::Min(0),    // Free space the widgets land in
                Constraint::Length(3), // Footer
            ]
            .as_ref(),
        )
        .split(screen);
    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);
    (chunks[0], row[0], row[1], chunks[3])
}

fn render_demo(f: &mut Frame, registry: &StatusRegistry) {
    let (title_area, upload_area, sync_area, footer_area) = layout_chunks(f.size());

    let title = Paragraph::new(format!("smartstatus demo v{}", smartstatus::VERSION))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, title_area);

    let upload_panel =
        Paragraph::new("release.tar.gz").block(Block::default().borders(Borders::ALL).title("Upload"));
    f.render_widget(upload_panel, upload_area);

    let sync_panel =
        Paragraph::new("mailbox index").block(Block::default().borders(Borders::ALL).title("Sync"));
    f.render_widget(sync_panel, sync_area);

    let footer = Paragraph::new("'q' quit | 'r' reset | 'h' hide | 's' show | click ✕ to dismiss")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, footer_area);

    ui::render_widgets(f, registry);
}

enum DemoStep {
    ScreenReady,
    HideScreen,
    UploadFailed,
    RetryUpload,
    SyncDone,
    RetryDone,
}

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    let cli = Cli::parse();
    init_logging();

    // Handle reset flag first
    if cli.reset {
        match reset_config() {
            Ok(true) => {
                println!("✅ Saved configuration has been reset.");
            }
            Ok(false) => {
                println!("ℹ️  No saved configuration found to reset.");
            }
            Err(e) => {
                eprintln!("❌ Error resetting configuration: {}", e);
                exit(1);
            }
        }
        return Ok(());
    }

    let mut config = load_config().unwrap_or_default();
    if cli.destroy_on_dismiss {
        config.dismiss = DismissBehavior::Destroy;
    }
    if let Some(fade_ms) = cli.fade_ms {
        config.fade_ms = fade_ms;
    }

    display_startup_info(config.dismiss, config.fade_ms);

    // Small delay to let user read the information
    std::thread::sleep(Duration::from_millis(1500));

    let mut terminal = ui::setup_terminal()?;
    let initial_size = terminal.size()?;
    let (_, upload_area, sync_area, _) = layout_chunks(initial_size);

    let registry = StatusRegistry::new();
    let dismiss = config.dismiss;
    let new_widget = |message: &'static str| {
        let w = StatusWidget::with_message(&registry, message);
        w.set_dismiss_behavior(dismiss);
        w
    };
    let attach_or_bail =
        |w: StatusWidget, target: &Target| match w.attach(target, false) {
            Ok(w) => w,
            Err(e) => {
                eprintln!("❌ Could not attach status widget: {}", e);
                exit(1);
            }
        };

    let upload = attach_or_bail(
        new_widget("Uploading release artifacts"),
        &Target::region("upload", upload_area),
    );
    upload.show();
    let sync = attach_or_bail(
        new_widget("Indexing mailbox"),
        &Target::region("sync", sync_area),
    );
    sync.show();
    let screen_status = attach_or_bail(new_widget("Preparing workspace"), &Target::Screen);
    screen_status.show();

    let mut script: VecDeque<(Duration, DemoStep)> = VecDeque::from(vec![
        (Duration::from_millis(2000), DemoStep::ScreenReady),
        (Duration::from_millis(3500), DemoStep::HideScreen),
        (Duration::from_millis(4000), DemoStep::UploadFailed),
        (Duration::from_millis(5500), DemoStep::RetryUpload),
        (Duration::from_millis(6500), DemoStep::SyncDone),
        (Duration::from_millis(8000), DemoStep::RetryDone),
    ]);
    let mut retry: Option<StatusWidget> = None;

    let start = Instant::now();
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // --- Draw UI ---
        terminal.draw(|f| render_demo(f, &registry))?;

        // --- Input Handling ---
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('r') => {
                        for w in registry.widgets() {
                            w.reset();
                        }
                    }
                    KeyCode::Char('h') => {
                        for w in registry.widgets() {
                            w.hide_over(Duration::from_millis(config.fade_ms));
                        }
                    }
                    KeyCode::Char('s') => {
                        for w in registry.widgets() {
                            w.show();
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    input::handle_mouse_event(&registry, &mouse);
                }
                _ => {}
            }
        }

        // --- Tick-based updates ---
        if last_tick.elapsed() >= tick_rate {
            while script.front().is_some_and(|(at, _)| start.elapsed() >= *at) {
                if let Some((_, step)) = script.pop_front() {
                    match step {
                        DemoStep::ScreenReady => {
                            screen_status.finish("Workspace ready", true);
                        }
                        DemoStep::HideScreen => {
                            screen_status.hide_over(Duration::from_millis(config.fade_ms));
                        }
                        DemoStep::UploadFailed => {
                            upload.finish("Upload failed: connection reset", false);
                        }
                        DemoStep::RetryUpload => {
                            match new_widget("Retrying upload")
                                .attach(&Target::region("upload", upload_area), true)
                            {
                                Ok(w) => {
                                    w.show();
                                    retry = Some(w);
                                }
                                Err(e) => tracing::warn!("retry attach failed: {}", e),
                            }
                        }
                        DemoStep::SyncDone => {
                            sync.finish("Index up to date", true);
                        }
                        DemoStep::RetryDone => {
                            if let Some(w) = &retry {
                                w.finish("Upload complete", true);
                            }
                        }
                    }
                }
            }
            last_tick = Instant::now();
        }
    }

    // Fade everything out and wait for the transitions to settle before the
    // screen is torn down.
    let widgets = registry.widgets();
    for w in &widgets {
        w.hide_over(Duration::from_millis(300));
    }
    for w in &widgets {
        w.fade_done().await;
    }
    registry.clear();

    ui::restore_terminal(&mut terminal)?;

    config.saved_at = chrono::Utc::now();
    if let Err(e) = save_config(&config) {
        eprintln!("⚠️  Could not save configuration: {}", e);
    }
    eprintln!("👋 smartstatus demo finished.");
    Ok(())
}
