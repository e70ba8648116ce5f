use clap::{Parser, Subcommand};
use knob_host::config;
use knob_host::events::AppEvent;
use knob_host::gui::app::AppModel;
use knob_host::logging;
use knob_host::sys::{runtime, server};
use relm4::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "knob_host", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Set the value of the running knob, in radians clockwise from 12 o'clock
    Set {
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },
    /// Enable the running knob
    Enable,
    /// Disable the running knob
    Disable,
    /// Reload the configuration file
    Reload,
    /// Write the default configuration file and print its path
    Init,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Set { value }) => server::send_command(&AppEvent::SetValue(value)),
        Some(Commands::Enable) => server::send_command(&AppEvent::SetEnabled(true)),
        Some(Commands::Disable) => server::send_command(&AppEvent::SetEnabled(false)),
        Some(Commands::Reload) => server::send_command(&AppEvent::ConfigReload),
        Some(Commands::Init) => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        None => {
            run();
            Ok(())
        }
    }
}

fn run() {
    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.knob.host");

    app.run::<AppModel>((config, rx));
}
