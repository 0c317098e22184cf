//! Remote key translation
//!
//! Host remote keys are a fixed set; ECP keys are the strings the device
//! accepts on `/keypress/<key>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keys the device accepts on its keypress endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcpKey {
    Home,
    Rev,
    Fwd,
    Play,
    Select,
    Left,
    Right,
    Down,
    Up,
    Back,
    InstantReplay,
    Info,
    Backspace,
    Search,
    Enter,
    VolumeDown,
    VolumeUp,
    VolumeMute,
    PowerOff,
    PowerOn,
}

impl EcpKey {
    /// Wire name used in the keypress path
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Rev => "Rev",
            Self::Fwd => "Fwd",
            Self::Play => "Play",
            Self::Select => "Select",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Down => "Down",
            Self::Up => "Up",
            Self::Back => "Back",
            Self::InstantReplay => "InstantReplay",
            Self::Info => "Info",
            Self::Backspace => "Backspace",
            Self::Search => "Search",
            Self::Enter => "Enter",
            Self::VolumeDown => "VolumeDown",
            Self::VolumeUp => "VolumeUp",
            Self::VolumeMute => "VolumeMute",
            Self::PowerOff => "PowerOff",
            Self::PowerOn => "PowerOn",
        }
    }
}

impl fmt::Display for EcpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EcpKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [EcpKey; 20] = [
            EcpKey::Home,
            EcpKey::Rev,
            EcpKey::Fwd,
            EcpKey::Play,
            EcpKey::Select,
            EcpKey::Left,
            EcpKey::Right,
            EcpKey::Down,
            EcpKey::Up,
            EcpKey::Back,
            EcpKey::InstantReplay,
            EcpKey::Info,
            EcpKey::Backspace,
            EcpKey::Search,
            EcpKey::Enter,
            EcpKey::VolumeDown,
            EcpKey::VolumeUp,
            EcpKey::VolumeMute,
            EcpKey::PowerOff,
            EcpKey::PowerOn,
        ];

        ALL.into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown ECP key: {s}"))
    }
}

/// Remote control keys sent by the host's remote widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKey {
    Rewind,
    FastForward,
    NextTrack,
    PreviousTrack,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Select,
    Back,
    Exit,
    PlayPause,
    Information,
}

impl RemoteKey {
    /// Translate to the device key, with an optional override for `Information`
    #[must_use]
    pub const fn to_ecp(self, info_override: Option<EcpKey>) -> EcpKey {
        match self {
            Self::Rewind | Self::PreviousTrack => EcpKey::Rev,
            Self::FastForward | Self::NextTrack => EcpKey::Fwd,
            Self::ArrowUp => EcpKey::Up,
            Self::ArrowDown => EcpKey::Down,
            Self::ArrowLeft => EcpKey::Left,
            Self::ArrowRight => EcpKey::Right,
            Self::Select => EcpKey::Select,
            Self::Back => EcpKey::Back,
            Self::Exit => EcpKey::Home,
            Self::PlayPause => EcpKey::Play,
            Self::Information => match info_override {
                Some(key) => key,
                None => EcpKey::Info,
            },
        }
    }
}
