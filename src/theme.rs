use tokio::sync::watch;
use tracing::info;

/// Colors the page chrome is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub color: &'static str,
    pub accent: &'static str,
    pub card_background: &'static str,
    pub card_border: &'static str,
}

pub const LIGHT: Palette = Palette {
    background: "#f0f4f8",
    color: "#1a1f23",
    accent: "#0070ba",
    card_background: "#ffffff",
    card_border: "rgba(0, 112, 186, 0.15)",
};

pub const DARK: Palette = Palette {
    background: "#0a0e14",
    color: "#e6edf3",
    accent: "#00a0ff",
    card_background: "#111821",
    card_border: "rgba(0, 160, 255, 0.2)",
};

/// Light/dark flag shared by everything that renders. One writer (the theme
/// actions) and any number of readers; readers always see the latest value.
#[derive(Debug)]
pub struct ThemeStore {
    sender: watch::Sender<bool>,
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ThemeStore {
    pub fn new(dark: bool) -> Self {
        let (sender, _) = watch::channel(dark);
        Self { sender }
    }

    pub fn is_dark(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn palette(&self) -> Palette {
        if self.is_dark() { DARK } else { LIGHT }
    }

    pub fn toggle(&self) -> bool {
        self.sender.send_modify(|dark| *dark = !*dark);
        let dark = self.is_dark();
        info!(dark, "theme toggled");
        dark
    }

    pub fn enable(&self) {
        self.set(true);
    }

    pub fn disable(&self) {
        self.set(false);
    }

    /// Receivers are notified only when the flag actually changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    fn set(&self, dark: bool) {
        if self.sender.send_if_modified(|current| {
            let changed = *current != dark;
            *current = dark;
            changed
        }) {
            info!(dark, "theme set");
        }
    }
}
