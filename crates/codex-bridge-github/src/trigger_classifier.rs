use codex_bridge_core::{BridgeConfig, Instruction};

use crate::comment_event::{CommentAction, CommentEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why a comment event was not treated as an instruction.
pub enum SkipReason {
    ActionNotCreated,
    MissingTriggerPrefix,
    EmptyInstruction,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActionNotCreated => "action_not_created",
            Self::MissingTriggerPrefix => "missing_trigger_prefix",
            Self::EmptyInstruction => "empty_instruction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `Classification` values.
pub enum Classification {
    Actionable(Instruction),
    NotActionable(SkipReason),
}

impl Classification {
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            Self::Actionable(instruction) => Some(instruction),
            Self::NotActionable(_) => None,
        }
    }
}

/// Decides whether `event` is an instruction for the bridge.
///
/// The prefix match is exact and case-sensitive after trimming leading
/// whitespace from the body. A bare prefix with nothing after it is not
/// actionable.
pub fn classify_comment_event(event: &CommentEvent, config: &BridgeConfig) -> Classification {
    if event.action != CommentAction::Created {
        return Classification::NotActionable(SkipReason::ActionNotCreated);
    }

    let prefix = config.trigger_prefix.as_str();
    if prefix.is_empty() {
        return Classification::NotActionable(SkipReason::MissingTriggerPrefix);
    }
    let Some(remainder) = event.body.trim_start().strip_prefix(prefix) else {
        return Classification::NotActionable(SkipReason::MissingTriggerPrefix);
    };

    let prompt = remainder.trim();
    if prompt.is_empty() {
        return Classification::NotActionable(SkipReason::EmptyInstruction);
    }

    Classification::Actionable(Instruction {
        prompt: prompt.to_string(),
        author: event.author.clone(),
    })
}
