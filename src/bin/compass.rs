use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compass_wm::common::config::{self, Config};
use compass_wm::common::log;
use compass_wm::layout_engine::Direction;

#[derive(Parser)]
#[command(version, about = "Move keyboard focus between windows with Control+Option+Arrow")]
struct Cli {
    /// Configuration file to read instead of ~/.config/compass/compass.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for the navigation hotkeys until interrupted (default).
    Listen,
    /// Move focus once and exit.
    Focus { direction: Direction },
    /// Print the current navigation candidates as JSON.
    Windows {
        #[arg(long)]
        include_untitled: bool,
    },
    /// Print the effective configuration.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(config::config_file);
    let mut config = Config::read(&path)?;
    log::init_logging(&config.log);

    match cli.command.unwrap_or(Command::Listen) {
        Command::Listen => platform::listen(config),
        Command::Focus { direction } => platform::focus(config, direction),
        Command::Windows { include_untitled } => {
            config.settings = config.settings.for_listing(include_untitled);
            platform::windows(config)
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use anyhow::Context;
    use compass_wm::common::config::Config;
    use compass_wm::layout_engine::Direction;
    use compass_wm::nav::{HotkeyDispatcher, Navigator};
    use compass_wm::sys::axuielement::{self, SystemAccessibility};
    use compass_wm::sys::error::Error;
    use compass_wm::sys::event_tap::EventTap;
    use compass_wm::sys::run_loop::{self, RunLoopHandle};
    use compass_wm::sys::screen::{Actual, ScreenFrames};
    use compass_wm::sys::window_server::SystemWindows;
    use objc2_foundation::MainThreadMarker;
    use tracing::info;

    type SystemNavigator = Navigator<SystemWindows, Actual, SystemAccessibility>;

    fn navigator(mtm: MainThreadMarker, config: Config) -> SystemNavigator {
        Navigator::new(SystemWindows, ScreenFrames::new(mtm), SystemAccessibility, config.settings)
    }

    fn trusted() -> Result<(), Error> {
        if axuielement::is_process_trusted() { Ok(()) } else { Err(Error::NotTrusted) }
    }

    pub fn listen(config: Config) -> anyhow::Result<()> {
        let mtm = MainThreadMarker::new().ok_or(Error::NotMainThread)?;
        trusted()?;
        let main_loop = RunLoopHandle::current().context("the main thread has no run loop")?;
        run_loop::stop_on_signals(main_loop.clone())?;

        let mut dispatcher = HotkeyDispatcher::new(navigator(mtm, config));
        let bindings: Vec<String> = dispatcher.hotkeys().iter().map(|hk| hk.to_string()).collect();
        let tap = EventTap::new(move |event| dispatcher.handle(event))?;
        info!(?bindings, "listening");

        main_loop.run();
        drop(tap);
        info!("stopped");
        Ok(())
    }

    pub fn focus(config: Config, direction: Direction) -> anyhow::Result<()> {
        let mtm = MainThreadMarker::new().ok_or(Error::NotMainThread)?;
        trusted()?;
        let outcome = navigator(mtm, config).navigate(direction);
        info!(?outcome, "done");
        Ok(())
    }

    pub fn windows(config: Config) -> anyhow::Result<()> {
        let mtm = MainThreadMarker::new().ok_or(Error::NotMainThread)?;
        let candidates = navigator(mtm, config).candidates()?;
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        Ok(())
    }
}

#[cfg(not(target_os = "macos"))]
mod platform {
    use compass_wm::common::config::Config;
    use compass_wm::layout_engine::Direction;
    use compass_wm::sys::error::Error;

    pub fn listen(_: Config) -> anyhow::Result<()> { Err(Error::Unsupported.into()) }

    pub fn focus(_: Config, _: Direction) -> anyhow::Result<()> { Err(Error::Unsupported.into()) }

    pub fn windows(_: Config) -> anyhow::Result<()> { Err(Error::Unsupported.into()) }
}
