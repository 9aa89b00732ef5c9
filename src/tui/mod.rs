//! TUI module for interactive directory size browsing.

pub mod app;
pub mod event;
pub mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::TuiConfig;

pub use app::App;

/// Terminal in raw mode on the alternate screen; restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default panic output is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Run the interactive browser rooted at `root` until the user quits.
pub fn run(root: PathBuf, config: &TuiConfig) -> io::Result<()> {
    let mut app = App::new(root).with_confirm_delete(config.confirm_delete);

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;

    // first frame before the initial build, which can take a while
    guard.terminal.draw(|frame| ui::render(&app, frame))?;
    app.open();

    while !app.should_quit {
        guard.terminal.draw(|frame| ui::render(&app, frame))?;
        event::handle_events(&mut app, Duration::from_millis(250))?;
    }

    Ok(())
}
