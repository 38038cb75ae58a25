//! A Lotería TUI client.
//!
//! Connects to the session server over websocket, joins a room, and plays
//! rounds from the terminal.

use anyhow::Result;
use pico_args::Arguments;

use loteria::{Language, RoomCode};
use lt_client::session::Connection;
use lt_client::tui_app::TuiApp;

const HELP: &str = "\
Connect to a Lotería session server

USAGE:
  lt_client [OPTIONS]

OPTIONS:
  --server URL          Websocket server URL  [default: ws://localhost:3001]
  --room CODE           Room code to join on startup
  --name NAME           Player name to submit once the room is joined
  --lang LANG           Card text language, es or en  [default: es]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: String,
    room: Option<String>,
    name: Option<String>,
    lang: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs
            .value_from_str("--server")
            .unwrap_or_else(|_| "ws://localhost:3001".to_string()),
        room: pargs.opt_value_from_str("--room").ok().flatten(),
        name: pargs.opt_value_from_str("--name").ok().flatten(),
        lang: pargs.opt_value_from_str("--lang").ok().flatten(),
    };

    let room = match &args.room {
        Some(code) => Some(RoomCode::parse(code)?),
        None => None,
    };
    let language = match args.lang.as_deref() {
        Some("en") => Language::En,
        _ => Language::Es,
    };

    println!("Connecting to {}...", args.server_url);
    let connection = Connection::open(&args.server_url).await?;

    let terminal = ratatui::init();
    let app = TuiApp::new(connection, room, args.name, language);
    let result = app.run(terminal).await;
    ratatui::restore();

    result
}
