//! Domain operations
//!
//! Named appliance operations built on [`Engine`]. None of them carry
//! protocol logic of their own: each is a fixed command name plus argument
//! handling and interpretation of the decoded reply.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{Result, SoundBridgeError};
use crate::protocol::{scalar_value, Reply, Status};

/// The media server the appliance is currently browsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveServer {
    /// Server type as reported by the appliance, e.g. `iTunes`
    pub kind: String,
    pub name: String,
}

/// Browse filters used to narrow the song list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackQuery {
    pub server: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl TrackQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }
}

/// A session with one SoundBridge appliance
pub struct SoundBridge {
    engine: Engine,
}

impl SoundBridge {
    /// Connect and handshake with the appliance described by `config`
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::new(Engine::connect(config)?))
    }

    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Access the underlying engine for commands without a named operation
    pub fn engine(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Close the session
    pub fn close(&mut self) {
        self.engine.close();
    }

    // =========================================================================
    // Servers
    // =========================================================================

    /// Whether the session is connected to a media server.
    ///
    /// Also syncs the session's active server with the appliance's.
    pub fn get_connected_server(&mut self) -> Result<bool> {
        let reply = self.scalar("GetConnectedServer", NO_ARGS)?;
        Ok(reply == Status::Ok.as_str())
    }

    /// Type and name of the active server, or `None` when disconnected
    pub fn get_active_server(&mut self) -> Result<Option<ActiveServer>> {
        const COMMAND: &str = "GetActiveServerInfo";

        self.get_connected_server()?;
        let (status, info) = self.engine.execute_multi(COMMAND, NO_ARGS)?;

        match status {
            Status::Ok => {
                let kind = info_field(COMMAND, &info, 0, "Type")?;
                let name = info_field(COMMAND, &info, 1, "Name")?;
                Ok(Some(ActiveServer { kind, name }))
            }
            Status::ErrorDisconnected | Status::Disconnected => Ok(None),
            other => Err(SoundBridgeError::UnexpectedStatus {
                command: COMMAND.to_string(),
                status: other.to_string(),
            }),
        }
    }

    /// Names of the media servers the appliance can see, in index order
    pub fn list_servers(&mut self) -> Result<Vec<String>> {
        self.list("ListServers", NO_ARGS)
    }

    pub fn server_disconnect(&mut self) -> Result<String> {
        self.scalar("ServerDisconnect", NO_ARGS)
    }

    /// Connect to the server at `index` in [`Self::list_servers`] order
    pub fn server_connect(&mut self, index: usize) -> Result<String> {
        self.scalar("ServerConnect", [index])
    }

    /// Make `name` the active server, switching only when needed
    pub fn connect_to_server(&mut self, name: &str) -> Result<()> {
        if let Some(current) = self.get_active_server()? {
            if current.name == name {
                tracing::debug!("Already connected to server {:?}", name);
                return Ok(());
            }
        }

        let servers = self.list_servers()?;
        let index = servers
            .iter()
            .position(|s| s == name)
            .ok_or_else(|| SoundBridgeError::ServerNotFound {
                name: name.to_string(),
                available: servers.clone(),
            })?;

        let status = self.server_disconnect()?;
        if status != Status::ErrorDisconnected.as_str() && status != Status::Disconnected.as_str() {
            return Err(SoundBridgeError::UnexpectedStatus {
                command: "ServerDisconnect".to_string(),
                status,
            });
        }

        let status = self.server_connect(index)?;
        if status != "Connected" {
            return Err(SoundBridgeError::UnexpectedStatus {
                command: "ServerConnect".to_string(),
                status,
            });
        }

        tracing::info!("Switched to server {:?} (index {})", name, index);
        Ok(())
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    pub fn set_browse_filter_artist(&mut self, artist: &str) -> Result<String> {
        self.scalar("SetBrowseFilterArtist", [artist])
    }

    pub fn set_browse_filter_album(&mut self, album: &str) -> Result<String> {
        self.scalar("SetBrowseFilterAlbum", [album])
    }

    /// Songs matching the current browse filters
    pub fn list_songs(&mut self) -> Result<Vec<String>> {
        self.list("ListSongs", NO_ARGS)
    }

    /// Apply `query` (server first, then artist, then album) and list songs
    pub fn matching_songs(&mut self, query: &TrackQuery) -> Result<Vec<String>> {
        if let Some(server) = &query.server {
            self.connect_to_server(server)?;
        }
        if let Some(artist) = &query.artist {
            self.set_browse_filter_artist(artist)?;
        }
        if let Some(album) = &query.album {
            self.set_browse_filter_album(album)?;
        }
        self.list_songs()
    }

    /// Index of `song` among the songs matching `query`
    pub fn find_song(&mut self, song: &str, query: &TrackQuery) -> Result<usize> {
        self.matching_songs(query)?
            .iter()
            .position(|s| s == song)
            .ok_or_else(|| SoundBridgeError::SongNotFound {
                song: song.to_string(),
            })
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Queue the current song list and start playing at `index`
    pub fn queue_and_play(&mut self, index: usize) -> Result<String> {
        self.scalar("QueueAndPlay", [index])
    }

    pub fn list_presets(&mut self) -> Result<Vec<String>> {
        self.list("ListPresets", NO_ARGS)
    }

    pub fn play_preset(&mut self, preset: &str) -> Result<String> {
        self.scalar("PlayPreset", [preset])
    }

    pub fn stop(&mut self) -> Result<String> {
        self.scalar("Stop", NO_ARGS)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn scalar<I, A>(&mut self, command: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.to_string()).collect();
        match self.engine.execute(command, &args)? {
            Reply::Scalar(value) => Ok(value),
            Reply::List(items) => Err(SoundBridgeError::unexpected_reply(
                command,
                &args,
                &items.join(", "),
                "Expected a single value, got a list",
            )),
        }
    }

    /// A single value where a list is expected is a one-element list
    fn list<I, A>(&mut self, command: &str, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        Ok(self.engine.execute(command, args)?.into_list())
    }
}

const NO_ARGS: [&str; 0] = [];

/// Decode `<key>: <value>` from line `index` of a multi-line reply
fn info_field(command: &str, info: &[String], index: usize, key: &str) -> Result<String> {
    let line = info.get(index).map(String::as_str).unwrap_or("");
    scalar_value(key, line)
        .map(str::to_string)
        .ok_or_else(|| {
            SoundBridgeError::unexpected_reply(command, &[], line, format!("Expected {} field", key))
        })
}

// =============================================================================
// Shared access
// =============================================================================

/// A session that several threads may drive, one command at a time
#[derive(Clone)]
pub struct SharedSoundBridge {
    inner: Arc<Mutex<SoundBridge>>,
}

impl SharedSoundBridge {
    pub fn new(session: SoundBridge) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session
    pub fn with<T>(&self, f: impl FnOnce(&mut SoundBridge) -> T) -> T {
        let mut session = self.inner.lock();
        f(&mut session)
    }
}
