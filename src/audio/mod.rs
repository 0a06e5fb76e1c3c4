mod toggle;

pub use toggle::{AudioToggleController, ChannelState, SoundChannel, SoundInstruction, UnknownChannel};
