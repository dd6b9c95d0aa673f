use anyhow::Result;

mod app;
mod catalog;
mod config;
mod handler;
mod intent;
mod logging;
mod openai;
mod tui;
mod ui;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Config::load().unwrap_or_else(|err| {
        log::warn!("failed to load config, using defaults: {err}");
        Config::default()
    });

    let mut app = App::new(config).await;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event).await?,
            None => break,
        }

        app.poll_answers().await;
    }

    tui::restore()?;
    Ok(())
}
