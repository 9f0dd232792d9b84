use crate::events::{
    art_path, art_url, player_label, track_from_metadata, MediaCommand, MediaEvent, MPRIS_PREFIX,
};
use futures::{Stream, StreamExt};
use image::RgbaImage;
use ribbon_core::state::{ControlFlags, PlaybackInfo, PlaybackStatus, TrackInfo};
use ribbon_core::{Result, RibbonError};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use zbus::fdo::{DBusProxy, NameOwnerChanged};
use zbus::names::OwnedBusName;
use zbus::zvariant::OwnedValue;
use zbus::{proxy, Connection};

/// The `org.mpris.MediaPlayer2.Player` interface, reduced to what the
/// widget consumes.
#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait Player {
    fn play_pause(&self) -> zbus::Result<()>;

    fn next(&self) -> zbus::Result<()>;

    fn previous(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    #[zbus(property)]
    fn can_play(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn can_pause(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn can_go_next(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn can_go_previous(&self) -> zbus::Result<bool>;
}

/// Clonable command handle to the media session task.
///
/// Sends are non-blocking; a full queue or a dead task surfaces as a
/// [`RibbonError::Media`] for the caller's action wrapper to log.
#[derive(Debug, Clone)]
pub struct MediaController {
    tx: mpsc::Sender<MediaCommand>,
}

impl MediaController {
    pub fn play_pause(&self) -> Result<()> {
        self.send(MediaCommand::PlayPause)
    }

    pub fn prev(&self) -> Result<()> {
        self.send(MediaCommand::Previous)
    }

    pub fn next(&self) -> Result<()> {
        self.send(MediaCommand::Next)
    }

    /// Ask the task to re-emit session, playback and track state.
    pub fn force_update(&self) -> Result<()> {
        self.send(MediaCommand::ForceUpdate)
    }

    fn send(&self, cmd: MediaCommand) -> Result<()> {
        self.tx
            .try_send(cmd)
            .map_err(|e| RibbonError::Media(format!("command queue: {e}")))
    }
}

/// MPRIS media session source.
///
/// Watches the session bus for `org.mpris.MediaPlayer2.*` players, attaches
/// to one at a time, and forwards session/playback/track notifications on a
/// bounded channel.  The receiving side marshals them onto the UI thread.
pub struct MediaSession;

impl MediaSession {
    /// Spawn the background session task.
    ///
    /// The task stops when the event receiver is dropped; it reconnects
    /// automatically when the bus connection drops.
    pub fn spawn() -> (MediaController, mpsc::Receiver<MediaEvent>) {
        let (ev_tx, ev_rx) = mpsc::channel(32);
        let (cmd_tx, cmd_rx) = mpsc::channel(8);

        tokio::spawn(run(ev_tx, cmd_rx));

        (MediaController { tx: cmd_tx }, ev_rx)
    }
}

/// Why a bus session ended.
enum Flow {
    /// Event receiver dropped — stop the task for good.
    Stop,
    /// Bus connection failed — reconnect after a pause.
    Reconnect,
}

/// Why an attachment to a single player ended.
enum Attach {
    PlayerGone,
    BusLost,
    Closed,
}

async fn run(tx: mpsc::Sender<MediaEvent>, mut cmd_rx: mpsc::Receiver<MediaCommand>) {
    loop {
        match Connection::session().await {
            Ok(conn) => {
                info!("Connected to the session bus");
                match session_loop(&conn, &tx, &mut cmd_rx).await {
                    Flow::Stop => return,
                    Flow::Reconnect => warn!("Session bus lost; reconnecting in 2s…"),
                }
            }
            Err(e) => {
                error!("Cannot connect to the session bus: {e}; retrying in 2s…");
            }
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

async fn session_loop(
    conn: &Connection,
    tx: &mpsc::Sender<MediaEvent>,
    cmd_rx: &mut mpsc::Receiver<MediaCommand>,
) -> Flow {
    let dbus = match DBusProxy::new(conn).await {
        Ok(p) => p,
        Err(e) => {
            warn!("D-Bus proxy setup failed: {e}");
            return Flow::Reconnect;
        }
    };
    let mut owner_changes = match dbus.receive_name_owner_changed().await {
        Ok(s) => s,
        Err(e) => {
            warn!("NameOwnerChanged subscription failed: {e}");
            return Flow::Reconnect;
        }
    };

    loop {
        let player = match find_player(&dbus).await {
            Ok(p) => p,
            Err(e) => {
                warn!("Player discovery failed: {e}");
                return Flow::Reconnect;
            }
        };

        match player {
            Some(bus_name) => {
                if tx.send(MediaEvent::Session(true)).await.is_err() {
                    return Flow::Stop;
                }
                match attach(conn, &bus_name, &mut owner_changes, cmd_rx, tx).await {
                    Attach::PlayerGone => {
                        if tx.send(MediaEvent::Session(false)).await.is_err() {
                            return Flow::Stop;
                        }
                        // fall through to rediscovery
                    }
                    Attach::BusLost => return Flow::Reconnect,
                    Attach::Closed => return Flow::Stop,
                }
            }
            None => {
                if tx.send(MediaEvent::Session(false)).await.is_err() {
                    return Flow::Stop;
                }
                match wait_for_player(&mut owner_changes, cmd_rx, tx).await {
                    Ok(()) => {} // a player appeared — rediscover
                    Err(flow) => return flow,
                }
            }
        }
    }
}

/// Pick the first MPRIS player currently on the bus.
///
/// The attachment sticks until that player vanishes; players appearing
/// later are picked up on the next discovery pass.
async fn find_player(dbus: &DBusProxy<'_>) -> zbus::Result<Option<OwnedBusName>> {
    let names = dbus.list_names().await?;
    Ok(names
        .into_iter()
        .find(|n| n.as_str().starts_with(MPRIS_PREFIX)))
}

/// Block until some MPRIS name gains an owner, draining commands meanwhile.
async fn wait_for_player(
    owner_changes: &mut (impl Stream<Item = NameOwnerChanged> + Unpin),
    cmd_rx: &mut mpsc::Receiver<MediaCommand>,
    tx: &mpsc::Sender<MediaEvent>,
) -> std::result::Result<(), Flow> {
    loop {
        tokio::select! {
            sig = owner_changes.next() => {
                let Some(sig) = sig else { return Err(Flow::Reconnect) };
                if let Ok(args) = sig.args() {
                    if args.name().as_str().starts_with(MPRIS_PREFIX) && args.new_owner().is_some() {
                        return Ok(());
                    }
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(MediaCommand::ForceUpdate) => {
                        if tx.send(MediaEvent::Session(false)).await.is_err() {
                            return Err(Flow::Stop);
                        }
                    }
                    Some(cmd) => debug!("ignoring {cmd:?}: no active media session"),
                    None => return Err(Flow::Stop),
                }
            }
        }
    }
}

/// (title, artist, art URL) — the identity used to collapse metadata bursts.
type MetaKey = (Option<String>, Option<String>, Option<String>);

async fn attach(
    conn: &Connection,
    bus_name: &OwnedBusName,
    owner_changes: &mut (impl Stream<Item = NameOwnerChanged> + Unpin),
    cmd_rx: &mut mpsc::Receiver<MediaCommand>,
    tx: &mpsc::Sender<MediaEvent>,
) -> Attach {
    let proxy = match build_proxy(conn, bus_name).await {
        Ok(p) => p,
        Err(e) => {
            warn!("Cannot attach to '{bus_name}': {e}");
            return Attach::PlayerGone;
        }
    };
    let player = player_label(bus_name.as_str());
    info!("Attached to media session '{player}'");

    let mut status_changes = proxy.receive_playback_status_changed().await;
    let mut metadata_changes = proxy.receive_metadata_changed().await;
    let mut last_meta: Option<MetaKey> = None;

    // Initial snapshot, so the widget isn't blank until the first change.
    if !emit_snapshot(&proxy, &player, tx, &mut last_meta).await {
        return Attach::Closed;
    }

    loop {
        tokio::select! {
            change = status_changes.next() => {
                if change.is_none() {
                    return Attach::PlayerGone;
                }
                if tx.send(MediaEvent::Playback(read_playback(&proxy).await)).await.is_err() {
                    return Attach::Closed;
                }
            }
            change = metadata_changes.next() => {
                let Some(change) = change else { return Attach::PlayerGone };
                match change.get().await {
                    Ok(meta) => {
                        if let Some(track) = track_update(&meta, &player, &mut last_meta).await {
                            if tx.send(MediaEvent::Track(track)).await.is_err() {
                                return Attach::Closed;
                            }
                        }
                    }
                    Err(e) => debug!("metadata read failed: {e}"),
                }
            }
            sig = owner_changes.next() => {
                let Some(sig) = sig else { return Attach::BusLost };
                if let Ok(args) = sig.args() {
                    if args.name().as_str() == bus_name.as_str() && args.new_owner().is_none() {
                        info!("Media session '{player}' went away");
                        return Attach::PlayerGone;
                    }
                }
            }
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { return Attach::Closed };
                if !handle_command(&proxy, cmd, &player, tx, &mut last_meta).await {
                    return Attach::Closed;
                }
            }
        }
    }
}

async fn build_proxy<'a>(
    conn: &'a Connection,
    bus_name: &OwnedBusName,
) -> zbus::Result<PlayerProxy<'a>> {
    PlayerProxy::builder(conn)
        .destination(bus_name.clone())?
        .build()
        .await
}

/// Returns `false` when the event channel is closed.
async fn handle_command(
    proxy: &PlayerProxy<'_>,
    cmd: MediaCommand,
    player: &str,
    tx: &mpsc::Sender<MediaEvent>,
    last_meta: &mut Option<MetaKey>,
) -> bool {
    match cmd {
        MediaCommand::PlayPause => {
            if let Err(e) = proxy.play_pause().await {
                warn!("play/pause failed: {e}");
            }
        }
        MediaCommand::Previous => {
            if let Err(e) = proxy.previous().await {
                warn!("previous-track failed: {e}");
            }
        }
        MediaCommand::Next => {
            if let Err(e) = proxy.next().await {
                warn!("next-track failed: {e}");
            }
        }
        MediaCommand::ForceUpdate => {
            *last_meta = None;
            if tx.send(MediaEvent::Session(true)).await.is_err() {
                return false;
            }
            return emit_snapshot(proxy, player, tx, last_meta).await;
        }
    }
    true
}

/// Emit current playback + track state.  Returns `false` when the event
/// channel is closed.
async fn emit_snapshot(
    proxy: &PlayerProxy<'_>,
    player: &str,
    tx: &mpsc::Sender<MediaEvent>,
    last_meta: &mut Option<MetaKey>,
) -> bool {
    if tx.send(MediaEvent::Playback(read_playback(proxy).await)).await.is_err() {
        return false;
    }
    match proxy.metadata().await {
        Ok(meta) => {
            if let Some(track) = track_update(&meta, player, last_meta).await {
                if tx.send(MediaEvent::Track(track)).await.is_err() {
                    return false;
                }
            }
        }
        Err(e) => debug!("metadata read failed: {e}"),
    }
    true
}

async fn read_playback(proxy: &PlayerProxy<'_>) -> PlaybackInfo {
    let status = proxy
        .playback_status()
        .await
        .map(|s| PlaybackStatus::from(s.as_str()))
        .unwrap_or_default();
    let can_play = proxy.can_play().await.unwrap_or(false);
    let can_pause = proxy.can_pause().await.unwrap_or(false);

    PlaybackInfo {
        status,
        controls: ControlFlags {
            prev_enabled: proxy.can_go_previous().await.unwrap_or(false),
            toggle_enabled: can_play || can_pause,
            next_enabled: proxy.can_go_next().await.unwrap_or(false),
        },
    }
}

/// Turn a metadata delivery into a track event, or `None` when it repeats
/// the previous delivery (property-change bursts collapse to one event).
async fn track_update(
    meta: &HashMap<String, OwnedValue>,
    player: &str,
    last_meta: &mut Option<MetaKey>,
) -> Option<Option<TrackInfo>> {
    let mut track = track_from_metadata(meta, Some(player.to_string()));
    let url = art_url(meta);

    let key = (track.title.clone(), track.artist.clone(), url.clone());
    if last_meta.as_ref() == Some(&key) {
        return None;
    }
    *last_meta = Some(key);

    track.art = load_art(url.as_deref()).await;
    Some(Some(track))
}

async fn load_art(url: Option<&str>) -> Option<RgbaImage> {
    let url = url?;
    let Some(path) = art_path(url) else {
        debug!("unsupported album-art URL scheme: {url}");
        return None;
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => match image::load_from_memory(&bytes) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn!("cannot decode album art '{}': {e}", path.display());
                None
            }
        },
        Err(e) => {
            warn!("cannot read album art '{}': {e}", path.display());
            None
        }
    }
}
