use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SoundChannel {
    Kuks,
    Quaas,
    Moans,
}

impl SoundChannel {
    pub const ALL: [SoundChannel; 3] = [Self::Kuks, Self::Quaas, Self::Moans];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Kuks => "kuks",
            Self::Quaas => "quaas",
            Self::Moans => "moans",
        }
    }

    /// Symbolic key of the channel's pre-loaded clip.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Kuks => "sound:kuks",
            Self::Quaas => "sound:quaas",
            Self::Moans => "sound:moans",
        }
    }

    pub fn clip_file(&self) -> &'static str {
        match self {
            Self::Kuks => "squirrel-kuk.wav",
            Self::Quaas => "squirrel-quaa.wav",
            Self::Moans => "squirrel-moan.mp3",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Kuks => 0,
            Self::Quaas => 1,
            Self::Moans => 2,
        }
    }
}

impl fmt::Display for SoundChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown sound channel \"{0}\"")]
pub struct UnknownChannel(pub String);

impl FromStr for SoundChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownChannel(s.to_owned()))
    }
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
    #[default]
    Idle,
    Playing,
}

impl ChannelState {
    pub fn toggle(self) -> ChannelState {
        match self {
            ChannelState::Idle => ChannelState::Playing,
            ChannelState::Playing => ChannelState::Idle,
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SoundInstruction {
    Play {
        channel: SoundChannel,
        clip_key: &'static str,
    },
    Stop {
        channel: SoundChannel,
    },
}

impl SoundInstruction {
    pub fn channel(&self) -> SoundChannel {
        match self {
            SoundInstruction::Play { channel, .. } | SoundInstruction::Stop { channel } => *channel,
        }
    }
}

/// Independent two-state machine per channel, every channel starts idle.
#[derive(Clone, Debug, Default)]
pub struct AudioToggleController {
    states: [ChannelState; 3],
}

impl AudioToggleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, channel: SoundChannel) -> ChannelState {
        self.states[channel.index()]
    }

    pub fn states(&self) -> Vec<(SoundChannel, ChannelState)> {
        SoundChannel::ALL
            .into_iter()
            .map(|c| (c, self.state(c)))
            .collect()
    }

    pub fn click(&mut self, channel: SoundChannel) -> SoundInstruction {
        let state = &mut self.states[channel.index()];
        *state = state.toggle();
        match state {
            ChannelState::Playing => SoundInstruction::Play {
                channel,
                clip_key: channel.key(),
            },
            ChannelState::Idle => SoundInstruction::Stop { channel },
        }
    }
}
