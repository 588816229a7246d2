//! Trigger parser: terminal commands and voice phrases → narrative triggers
//!
//! Commands are matched against the whole line; voice phrases anywhere in a
//! transcript, case-insensitive.

use lazy_static::lazy_static;
use regex::Regex;
use crate::types::{Trigger, TriggerSource};

lazy_static! {
    // =========================================================================
    // Commands that dig deeper into the infection
    // =========================================================================
    static ref RE_ADVANCE_COMMAND: Regex = Regex::new(
        r"(?i)^\s*(scan|decrypt|trace|override|inject|sudo\s+\S+)(\s+\S+)*\s*$"
    ).unwrap();

    // =========================================================================
    // Commands that wipe the session back to level 0
    // =========================================================================
    static ref RE_RESET_COMMAND: Regex = Regex::new(
        r"(?i)^\s*(reset|reboot|restore)\s*$"
    ).unwrap();

    // =========================================================================
    // Voice phrases heard by the audio module
    // =========================================================================
    static ref RE_VOICE_PHRASE: Regex = Regex::new(
        r"(?i)\b(let me in|who are you|open the vault|what do you want|i am here)\b"
    ).unwrap();
}

/// Parser for command lines and voice transcripts
#[derive(Debug, Default)]
pub struct TriggerParser;

impl TriggerParser {
    pub fn new() -> Self {
        Self
    }

    /// Map a typed terminal command to a trigger. Unknown commands yield None.
    pub fn parse_command(&self, line: &str) -> Option<Trigger> {
        if RE_RESET_COMMAND.is_match(line) {
            Some(Trigger::Reset)
        } else if RE_ADVANCE_COMMAND.is_match(line) {
            Some(Trigger::Advance(TriggerSource::Command))
        } else {
            None
        }
    }

    /// Map a voice transcript to a trigger when it contains a known phrase
    pub fn parse_voice(&self, transcript: &str) -> Option<Trigger> {
        RE_VOICE_PHRASE
            .is_match(transcript)
            .then_some(Trigger::Advance(TriggerSource::Voice))
    }

    /// The phrase that matched, for echoing back in the terminal
    pub fn matched_phrase<'a>(&self, transcript: &'a str) -> Option<&'a str> {
        RE_VOICE_PHRASE.find(transcript).map(|m| m.as_str())
    }
}
