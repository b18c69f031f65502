//! Tests for SoundBridge domain operations
//!
//! Each test scripts the appliance side and checks both the decoded result
//! and the exact command lines that reached the appliance.

#[path = "../common/mod.rs"]
mod common;

use std::thread;

use common::Peer;
use soundbridge::{ActiveServer, SharedSoundBridge, SoundBridge, SoundBridgeError, TrackQuery};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn connected() -> Vec<&'static str> {
    vec!["GetConnectedServer: OK"]
}

fn active_imac() -> Vec<&'static str> {
    vec![
        "GetActiveServerInfo: TransactionInitiated",
        "GetActiveServerInfo: OK",
        "GetActiveServerInfo: Type: iTunes",
        "GetActiveServerInfo: Name: iMac iTunes",
        "GetActiveServerInfo: TransactionComplete",
    ]
}

fn two_servers() -> Vec<&'static str> {
    vec![
        "ListServers: ListResultSize 2",
        "ListServers: iMac iTunes",
        "ListServers: Living Room",
        "ListServers: ListResultEnd",
    ]
}

// =============================================================================
// Active Server Tests
// =============================================================================

#[test]
fn test_get_active_server() {
    let peer = Peer::spawn(vec![connected(), active_imac()]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    let active = bridge.get_active_server().unwrap();
    assert_eq!(
        active,
        Some(ActiveServer {
            kind: "iTunes".to_string(),
            name: "iMac iTunes".to_string(),
        })
    );

    bridge.close();
    assert_eq!(
        peer.join(),
        strings(&["GetConnectedServer", "GetActiveServerInfo"])
    );
}

#[test]
fn test_get_active_server_when_disconnected() {
    let peer = Peer::spawn(vec![
        vec!["GetConnectedServer: GenericError"],
        vec!["GetActiveServerInfo: ErrorDisconnected"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    assert_eq!(bridge.get_active_server().unwrap(), None);

    bridge.close();
    peer.join();
}

#[test]
fn test_get_active_server_unexpected_status() {
    let peer = Peer::spawn(vec![
        connected(),
        vec!["GetActiveServerInfo: ErrorInitialSetupRequired"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    match bridge.get_active_server() {
        Err(SoundBridgeError::UnexpectedStatus { command, status }) => {
            assert_eq!(command, "GetActiveServerInfo");
            assert_eq!(status, "ErrorInitialSetupRequired");
        }
        other => panic!("Expected unexpected status, got {:?}", other),
    }

    bridge.close();
    peer.join();
}

#[test]
fn test_get_active_server_missing_fields() {
    let peer = Peer::spawn(vec![
        connected(),
        vec!["GetActiveServerInfo: Type: iTunes", "GetActiveServerInfo: OK"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    let err = bridge.get_active_server().unwrap_err();
    assert!(matches!(err, SoundBridgeError::UnexpectedReply { .. }));
    assert!(!err.is_fatal());
    assert!(bridge.engine().is_usable());

    bridge.close();
    peer.join();
}

#[test]
fn test_get_connected_server() {
    let peer = Peer::spawn(vec![connected(), vec!["GetConnectedServer: GenericError"]]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    assert!(bridge.get_connected_server().unwrap());
    assert!(!bridge.get_connected_server().unwrap());

    bridge.close();
    peer.join();
}

// =============================================================================
// Server Switching Tests
// =============================================================================

#[test]
fn test_connect_to_server_short_circuits() {
    let peer = Peer::spawn(vec![connected(), active_imac()]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    bridge.connect_to_server("iMac iTunes").unwrap();

    bridge.close();
    assert_eq!(
        peer.join(),
        strings(&["GetConnectedServer", "GetActiveServerInfo"])
    );
}

#[test]
fn test_connect_to_server_switches_by_index() {
    let peer = Peer::spawn(vec![
        connected(),
        active_imac(),
        two_servers(),
        vec!["ServerDisconnect: Disconnected"],
        vec!["ServerConnect: Connected"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    bridge.connect_to_server("Living Room").unwrap();

    bridge.close();
    assert_eq!(
        peer.join(),
        strings(&[
            "GetConnectedServer",
            "GetActiveServerInfo",
            "ListServers",
            "ServerDisconnect",
            "ServerConnect 1",
        ])
    );
}

#[test]
fn test_connect_to_server_from_disconnected_state() {
    let peer = Peer::spawn(vec![
        vec!["GetConnectedServer: GenericError"],
        vec!["GetActiveServerInfo: ErrorDisconnected"],
        two_servers(),
        vec!["ServerDisconnect: ErrorDisconnected"],
        vec!["ServerConnect: Connected"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    bridge.connect_to_server("iMac iTunes").unwrap();

    bridge.close();
    assert_eq!(peer.join().last().map(String::as_str), Some("ServerConnect 0"));
}

#[test]
fn test_connect_to_unknown_server() {
    let peer = Peer::spawn(vec![connected(), active_imac(), two_servers(), vec!["Stop: OK"]]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    match bridge.connect_to_server("Kitchen") {
        Err(SoundBridgeError::ServerNotFound { name, available }) => {
            assert_eq!(name, "Kitchen");
            assert_eq!(available, strings(&["iMac iTunes", "Living Room"]));
        }
        other => panic!("Expected server not found, got {:?}", other),
    }

    // Domain errors leave the session usable
    assert!(bridge.engine().is_usable());
    assert_eq!(bridge.stop().unwrap(), "OK");

    bridge.close();
    peer.join();
}

#[test]
fn test_connect_to_server_rejects_unexpected_disconnect_status() {
    let peer = Peer::spawn(vec![
        connected(),
        active_imac(),
        two_servers(),
        vec!["ServerDisconnect: GenericError"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    match bridge.connect_to_server("Living Room") {
        Err(SoundBridgeError::UnexpectedStatus { command, status }) => {
            assert_eq!(command, "ServerDisconnect");
            assert_eq!(status, "GenericError");
        }
        other => panic!("Expected unexpected status, got {:?}", other),
    }

    bridge.close();
    peer.join();
}

#[test]
fn test_connect_to_server_rejects_failed_connect() {
    let peer = Peer::spawn(vec![
        connected(),
        active_imac(),
        two_servers(),
        vec!["ServerDisconnect: Disconnected"],
        vec!["ServerConnect: ResourceAllocationError"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    assert!(matches!(
        bridge.connect_to_server("Living Room"),
        Err(SoundBridgeError::UnexpectedStatus { .. })
    ));

    bridge.close();
    peer.join();
}

// =============================================================================
// Browsing and Playback Tests
// =============================================================================

#[test]
fn test_find_song_and_play() {
    let peer = Peer::spawn(vec![
        vec!["SetBrowseFilterArtist: OK"],
        vec!["SetBrowseFilterAlbum: OK"],
        vec![
            "ListSongs: ListResultSize 2",
            "ListSongs: Flying Saucer Boogie",
            "ListSongs: Purple People Eater",
            "ListSongs: ListResultEnd",
        ],
        vec!["QueueAndPlay: OK"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    let query = TrackQuery::new().artist("Sheb Wooley").album("Greatest Hits");
    let index = bridge.find_song("Purple People Eater", &query).unwrap();
    assert_eq!(index, 1);
    assert_eq!(bridge.queue_and_play(index).unwrap(), "OK");

    bridge.close();
    assert_eq!(
        peer.join(),
        strings(&[
            "SetBrowseFilterArtist Sheb Wooley",
            "SetBrowseFilterAlbum Greatest Hits",
            "ListSongs",
            "QueueAndPlay 1",
        ])
    );
}

#[test]
fn test_matching_songs_switches_server_first() {
    let peer = Peer::spawn(vec![
        connected(),
        active_imac(),
        vec!["ListSongs: ListResultSize 0", "ListSongs: ListResultEnd"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    let songs = bridge
        .matching_songs(&TrackQuery::new().server("iMac iTunes"))
        .unwrap();
    assert!(songs.is_empty());

    bridge.close();
    assert_eq!(
        peer.join(),
        strings(&["GetConnectedServer", "GetActiveServerInfo", "ListSongs"])
    );
}

#[test]
fn test_find_missing_song() {
    let peer = Peer::spawn(vec![vec![
        "ListSongs: ListResultSize 1",
        "ListSongs: Fish Heads",
        "ListSongs: ListResultEnd",
    ]]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    match bridge.find_song("Purple People Eater", &TrackQuery::new()) {
        Err(SoundBridgeError::SongNotFound { song }) => assert_eq!(song, "Purple People Eater"),
        other => panic!("Expected song not found, got {:?}", other),
    }

    bridge.close();
    peer.join();
}

#[test]
fn test_presets_and_stop() {
    let peer = Peer::spawn(vec![
        vec![
            "ListPresets: TransactionInitiated",
            "ListPresets: ListResultSize 2",
            "ListPresets: KQED",
            "ListPresets: Radio Paradise",
            "ListPresets: ListResultEnd",
            "ListPresets: TransactionComplete",
        ],
        vec!["PlayPreset: OK"],
        vec!["Stop: OK"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    assert_eq!(
        bridge.list_presets().unwrap(),
        strings(&["KQED", "Radio Paradise"])
    );
    assert_eq!(bridge.play_preset("B").unwrap(), "OK");
    assert_eq!(bridge.stop().unwrap(), "OK");

    bridge.close();
    assert_eq!(peer.join(), strings(&["ListPresets", "PlayPreset B", "Stop"]));
}

#[test]
fn test_play_preset_list_reply_keeps_session() {
    let peer = Peer::spawn(vec![
        vec![
            "PlayPreset: ListResultSize 1",
            "PlayPreset: KQED",
            "PlayPreset: ListResultEnd",
        ],
        vec!["Stop: OK"],
    ]);
    let mut bridge = SoundBridge::connect(&peer.config()).unwrap();

    let err = bridge.play_preset("A").unwrap_err();
    match &err {
        SoundBridgeError::UnexpectedReply {
            command,
            args,
            reply,
            ..
        } => {
            assert_eq!(command, "PlayPreset");
            assert_eq!(args, &strings(&["A"]));
            assert_eq!(reply, "KQED");
        }
        other => panic!("Expected unexpected reply, got {:?}", other),
    }
    assert!(!err.is_fatal());
    assert!(err.to_string().contains("PlayPreset A"));

    // The reply was fully framed, so the session carries on
    assert!(bridge.engine().is_usable());
    assert_eq!(bridge.stop().unwrap(), "OK");

    bridge.close();
    assert_eq!(peer.join(), strings(&["PlayPreset A", "Stop"]));
}

// =============================================================================
// Shared Access Tests
// =============================================================================

#[test]
fn test_shared_session_serializes_commands() {
    let peer = Peer::spawn(vec![vec!["Stop: OK"], vec!["Stop: OK"], vec!["Stop: OK"]]);
    let shared = SharedSoundBridge::new(SoundBridge::connect(&peer.config()).unwrap());

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || shared.with(|bridge| bridge.stop().unwrap()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "OK");
    }

    shared.with(|bridge| bridge.close());
    assert_eq!(peer.join(), strings(&["Stop", "Stop", "Stop"]));
}
