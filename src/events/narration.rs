//! Narration thread protocol.
//!
//! [`NarrationCmd`] flows from the [`Narrator`](crate::resources::narration::Narrator)
//! to the speech backend thread; [`NarrationMessage`] flows back. Every
//! utterance carries the id the narrator assigned, so completion messages for
//! utterances that were cancelled in the meantime can be recognised and
//! dropped.

use bevy_ecs::message::Message;

use crate::resources::narration::voice::VoiceSettings;

/// Identifier the narrator assigns to each utterance.
pub type UtteranceId = u64;

/// Commands sent *to* the narration thread.
#[derive(Debug, Clone)]
pub enum NarrationCmd {
    Speak {
        id: UtteranceId,
        text: String,
        settings: VoiceSettings,
    },
    /// Cancel whatever is being spoken. No `Ended` is reported for it.
    Cancel,
    Pause,
    Resume,
    Shutdown,
}

/// Messages sent *back* from the narration thread.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum NarrationMessage {
    Started { id: UtteranceId },
    Ended { id: UtteranceId },
    Errored { id: UtteranceId, error: String },
}
