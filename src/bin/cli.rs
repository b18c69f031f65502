//! SoundBridge CLI Client
//!
//! Command-line interface for driving a SoundBridge over RCP.

use clap::{Args as ClapArgs, Parser, Subcommand};
use soundbridge::{Config, Result, SoundBridge, TrackQuery};
use tracing_subscriber::{fmt, EnvFilter};

/// SoundBridge CLI
#[derive(Parser, Debug)]
#[command(name = "soundbridge-cli")]
#[command(about = "Remote control for Roku SoundBridge players")]
#[command(version)]
struct Args {
    /// Appliance host name or IP address
    #[arg(short = 'H', long)]
    host: String,

    /// Appliance RCP port
    #[arg(short, long, default_value = "5555")]
    port: u16,

    /// Connect/read/write timeout in seconds
    #[arg(short, long, default_value = "10")]
    timeout: u64,

    /// Log every protocol line
    #[arg(long)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Browse filters shared by `songs` and `play`
#[derive(ClapArgs, Debug)]
struct Filters {
    /// Media server to switch to first
    #[arg(long)]
    server: Option<String>,

    /// Artist filter
    #[arg(long)]
    artist: Option<String>,

    /// Album filter
    #[arg(long)]
    album: Option<String>,
}

impl From<Filters> for TrackQuery {
    fn from(filters: Filters) -> Self {
        TrackQuery {
            server: filters.server,
            artist: filters.artist,
            album: filters.album,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available media servers
    Servers,

    /// Show the active media server
    Active,

    /// Switch to a media server by name
    ConnectServer {
        /// Server name as shown by `servers`
        name: String,
    },

    /// List songs matching the browse filters
    Songs {
        #[command(flatten)]
        filters: Filters,
    },

    /// Find a song and play it
    Play {
        /// Exact song title
        song: String,

        #[command(flatten)]
        filters: Filters,
    },

    /// List stored presets
    Presets,

    /// Play a stored preset
    Preset {
        /// Preset identifier
        preset: String,
    },

    /// Stop playback
    Stop,

    /// Send an arbitrary command and print the decoded reply
    Raw {
        /// Command name, e.g. GetPowerState
        command: String,

        /// Command arguments
        args: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.trace {
        "warn,soundbridge=debug"
    } else {
        "warn,soundbridge=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .timeout_ms(args.timeout.saturating_mul(1000))
        .trace_lines(args.trace)
        .build();

    if let Err(e) = run(&config, args.command) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> Result<()> {
    let mut bridge = SoundBridge::connect(config)?;

    match command {
        Commands::Servers => print_indexed(&bridge.list_servers()?),
        Commands::Active => match bridge.get_active_server()? {
            Some(server) => println!("{} ({})", server.name, server.kind),
            None => println!("no active server"),
        },
        Commands::ConnectServer { name } => {
            bridge.connect_to_server(&name)?;
            println!("connected to {}", name);
        }
        Commands::Songs { filters } => {
            print_indexed(&bridge.matching_songs(&filters.into())?);
        }
        Commands::Play { song, filters } => {
            let index = bridge.find_song(&song, &filters.into())?;
            println!("{}", bridge.queue_and_play(index)?);
        }
        Commands::Presets => print_indexed(&bridge.list_presets()?),
        Commands::Preset { preset } => println!("{}", bridge.play_preset(&preset)?),
        Commands::Stop => println!("{}", bridge.stop()?),
        Commands::Raw { command, args } => {
            println!("{}", bridge.engine().execute(&command, &args)?);
        }
    }

    bridge.close();
    Ok(())
}

fn print_indexed(items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        println!("{:>3}  {}", i, item);
    }
}
