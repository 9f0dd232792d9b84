//! Wayland layer-shell surface for `ribbon`.
//!
//! Owns the Iced application loop and wires together all background tasks:
//! - MPRIS media session stream (session presence, playback, track metadata)
//! - Hyprland IPC event stream (keyboard layout switches)
//! - Keyboard-language poll timer
//! - Config file watcher (live reload on change)
//!
//! Background sources deliver through bounded channels; every widget
//! mutation happens here, in `update()`, on the single UI thread.

use futures::channel::mpsc::Sender;
use futures::SinkExt;
use iced::{
    widget::{container, row},
    Element, Length, Subscription, Task,
};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use ribbon_config::{default_path, load as load_config, BarConfig, ConfigWatcher, Position};
use ribbon_core::{event::Message as AppMessage, run_action, ServiceRegistry};
use ribbon_ipc::{fetch_keyboard_language, HyprlandEvent, HyprlandIpc};
use ribbon_media::{MediaController, MediaEvent, MediaSession};
use ribbon_theme::Theme;
use ribbon_widgets::{LanguageWidget, MediaWidget};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the Wayland bar.  Never returns under normal operation.
pub fn run() -> iced_layershell::Result {
    let config = load_config(default_path()).unwrap_or_default();
    let height = config.global.height;
    let anchor = position_to_anchor(config.global.position);
    let exclusive_zone = if config.global.exclusive_zone {
        height as i32
    } else {
        0
    };

    application(Bar::new, Bar::namespace, Bar::update, Bar::view)
        .subscription(Bar::subscription)
        .style(Bar::style)
        .settings(Settings {
            layer_settings: LayerShellSettings {
                size: Some((0, height)), // width=0 + L|R anchor = full-width stretch
                exclusive_zone,
                anchor,
                layer: Layer::Top,
                ..Default::default()
            },
            ..Default::default()
        })
        .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants (AnchorChange,
/// SizeChange, etc.).  Those are handled by the backend and never reach
/// `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    /// Propagate a core event-bus message.
    App(AppMessage),
    /// The media session task started and handed over its command handle.
    MediaReady(MediaController),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Bar {
    config:   BarConfig,
    theme:    Theme,
    registry: ServiceRegistry,
    language: LanguageWidget,
    media:    MediaWidget,
}

impl Bar {
    fn new() -> (Self, Task<Message>) {
        let config = load_config(default_path()).unwrap_or_default();
        let theme = Theme::from_config(&config.theme);

        // Explicit service registry — background handles live here and are
        // resolved by type in `update()`.
        let mut registry = ServiceRegistry::new();
        match HyprlandIpc::new() {
            Ok(ipc) => registry.insert(Arc::new(ipc)),
            Err(e) => warn!("Hyprland command socket unavailable: {e}"),
        }

        let bar = Self {
            language: LanguageWidget::new(&config.language),
            media: MediaWidget::new(&config.media),
            theme,
            registry,
            config,
        };

        // Seed the language widget so it isn't blank until the first poll.
        let init_task = bar.language_fetch_task();
        (bar, init_task)
    }

    fn namespace() -> String {
        String::from("ribbon")
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(msg) => self.handle_app(msg),
            Message::MediaReady(controller) => {
                // Matches the construction-time force update of the widget:
                // detect an already-running session immediately.
                run_action("media.force_update", || controller.force_update());
                self.registry.insert(controller);
                Task::none()
            }
            // Layer-shell injected variants are handled by the backend.
            _ => Task::none(),
        }
    }

    fn handle_app(&mut self, msg: AppMessage) -> Task<Message> {
        let bar_height = self.config.global.height;

        match msg {
            AppMessage::MediaSessionChanged(active) => {
                self.media.on_session(active);
            }
            AppMessage::MediaPlaybackChanged(info) => {
                self.media.on_playback(&info);
            }
            AppMessage::MediaTrackChanged(track) => {
                self.media.on_track(track.as_ref(), &self.theme, bar_height);
            }
            AppMessage::MediaPlayPause => {
                if let Some(ctl) = self.registry.get::<MediaController>() {
                    run_action("media.play_pause", || ctl.play_pause());
                }
            }
            AppMessage::MediaPrev => {
                if let Some(ctl) = self.registry.get::<MediaController>() {
                    run_action("media.prev", || ctl.prev());
                }
            }
            AppMessage::MediaNext => {
                if let Some(ctl) = self.registry.get::<MediaController>() {
                    run_action("media.next", || ctl.next());
                }
            }
            AppMessage::MediaLabelToggled => {
                self.media.toggle(&self.theme, bar_height);
            }
            AppMessage::LanguageLabelToggled => {
                self.language.toggle();
            }
            AppMessage::LanguageRefreshRequested => {
                return self.language_fetch_task();
            }
            AppMessage::LanguageUpdated(info) => {
                self.language.set_language(info);
            }
            AppMessage::ConfigReloaded => {
                match load_config(default_path()) {
                    Ok(cfg) => {
                        info!("Config reloaded");
                        self.theme = Theme::from_config(&cfg.theme);
                        self.language = LanguageWidget::new(&cfg.language);
                        self.media = MediaWidget::new(&cfg.media);
                        self.config = cfg;

                        // Rebuilt widgets start blank — refresh both sources.
                        if let Some(ctl) = self.registry.get::<MediaController>() {
                            run_action("media.force_update", || ctl.force_update());
                        }
                        return self.language_fetch_task();
                    }
                    Err(e) => warn!("Config reload failed: {e}"),
                }
            }
        }
        Task::none()
    }

    /// One-shot keyboard-language query; failure degrades to `None`.
    fn language_fetch_task(&self) -> Task<Message> {
        if !self.config.language.enabled {
            return Task::none();
        }
        let Some(ipc) = self.registry.get::<Arc<HyprlandIpc>>() else {
            return Task::none();
        };
        let ipc = ipc.clone();

        Task::perform(
            async move {
                match fetch_keyboard_language(&ipc).await {
                    Ok(info) => Some(info),
                    Err(e) => {
                        debug!("keyboard language query failed: {e}");
                        None
                    }
                }
            },
            |result| Message::App(AppMessage::LanguageUpdated(result)),
        )
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let pad = self.theme.padding;

        let media: Element<'_, Message> = if self.config.media.enabled {
            match self.media.view(&self.theme) {
                Some(el) => el.map(Message::App),
                None => row![].into(),
            }
        } else {
            row![].into()
        };

        let language: Element<'_, Message> = if self.config.language.enabled {
            self.language.view(&self.theme).map(Message::App)
        } else {
            row![].into()
        };

        let bar = row![
            container(row![])
                .width(Length::FillPortion(1))
                .padding(pad),
            container(media)
                .width(Length::FillPortion(2))
                .center_x(Length::Fill)
                .padding(pad),
            container(language)
                .width(Length::FillPortion(1))
                .align_right(Length::Fill)
                .padding(pad),
        ]
        .width(Length::Fill)
        .height(Length::Fill);

        container(bar)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![Subscription::run(config_stream)];

        if self.config.media.enabled {
            subs.push(Subscription::run(media_stream));
        }
        if self.config.language.enabled {
            subs.push(Subscription::run(ipc_stream));
            let interval = self.config.language.update_interval.max(1);
            subs.push(
                iced::time::every(Duration::from_secs(interval))
                    .map(|_| Message::App(AppMessage::LanguageRefreshRequested)),
            );
        }

        Subscription::batch(subs)
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        let bg = self.theme.background.with_alpha(self.config.global.opacity);
        iced::theme::Style {
            background_color: bg.to_iced(),
            text_color: self.theme.foreground.to_iced(),
        }
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// Each free function acts as both the stream builder AND the unique identity
// key for `Subscription::run(fn_ptr)`.  Iced uses the function pointer address
// to deduplicate subscriptions across redraws.

/// Spawns the MPRIS session task, hands its command handle to the shell,
/// then forwards session/playback/track events indefinitely.
fn media_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(32, |mut sender: Sender<Message>| async move {
        let (controller, mut rx) = MediaSession::spawn();
        if sender.send(Message::MediaReady(controller)).await.is_err() {
            return;
        }

        while let Some(event) = rx.recv().await {
            let msg = match event {
                MediaEvent::Session(active) => AppMessage::MediaSessionChanged(active),
                MediaEvent::Playback(info) => AppMessage::MediaPlaybackChanged(info),
                MediaEvent::Track(track) => AppMessage::MediaTrackChanged(track),
            };
            if sender.send(Message::App(msg)).await.is_err() {
                return;
            }
        }

        // Session task exited — shouldn't happen; stall rather than crash.
        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Streams Hyprland IPC events; layout switches trigger an immediate
/// keyboard-language refresh instead of waiting out the poll interval.
fn ipc_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(32, |mut sender: Sender<Message>| async move {
        let ipc = match HyprlandIpc::new() {
            Ok(c) => c,
            Err(e) => {
                warn!("Hyprland IPC unavailable (not under Hyprland?): {e}");
                // Bar still runs; the language widget shows template text.
                loop {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
            }
        };

        let mut rx = ipc.spawn_listener();
        while let Some(event) = rx.recv().await {
            if matches!(event, HyprlandEvent::ActiveLayout(_)) {
                let msg = Message::App(AppMessage::LanguageRefreshRequested);
                if sender.send(msg).await.is_err() {
                    return;
                }
            }
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Watches `~/.config/ribbon/ribbon.toml` for writes and sends `ConfigReloaded`.
fn config_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = ConfigWatcher::spawn(default_path());

        while rx.recv().await.is_some() {
            let msg = Message::App(AppMessage::ConfigReloaded);
            if sender.send(msg).await.is_err() {
                return;
            }
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn position_to_anchor(pos: Position) -> Anchor {
    match pos {
        Position::Top    => Anchor::Top    | Anchor::Left | Anchor::Right,
        Position::Bottom => Anchor::Bottom | Anchor::Left | Anchor::Right,
    }
}
