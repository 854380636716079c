//! Game actor message types.

use crate::game::{
    CallOutcome, Card, Claim, ClaimDecision, ClaimSource, GameResult, GameUpdate, Stage,
};
use tokio::sync::oneshot;

/// Reply channel for a game command
pub type Reply<T> = oneshot::Sender<GameResult<T>>;

/// Commands that can be sent to a GameActor.
///
/// Every variant mutates the game; reads go through the published snapshot.
#[derive(Debug)]
pub enum GameMessage {
    /// Buy `quantity` cards for an owner
    Buy {
        owner_name: String,
        quantity: usize,
        response: Reply<Vec<Card>>,
    },

    /// Draw and call a random uncalled number
    Roll { response: Reply<CallOutcome> },

    /// Call a specific number
    Call {
        number: u32,
        response: Reply<CallOutcome>,
    },

    /// Leave the lobby
    Start { response: Reply<Stage> },

    /// Move to the next prize stage
    AdvanceStage { response: Reply<Stage> },

    /// End the game; replies `false` if it had already ended
    End { response: Reply<bool> },

    SubmitClaim {
        card_id: String,
        owner_name: String,
        source: ClaimSource,
        response: Reply<Claim>,
    },

    ApproveClaim {
        card_id: String,
        response: Reply<ClaimDecision>,
    },

    DenyClaim {
        card_id: String,
        response: Reply<ClaimDecision>,
    },

    /// Server-side mark on a card cell
    MarkCell {
        card_id: String,
        row: usize,
        col: usize,
        response: Reply<()>,
    },

    /// Admin metadata update
    Update {
        update: GameUpdate,
        response: Reply<()>,
    },

    /// Stop the actor
    Close { response: oneshot::Sender<()> },
}

impl GameMessage {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            GameMessage::Buy { .. } => "buy",
            GameMessage::Roll { .. } => "roll",
            GameMessage::Call { .. } => "call",
            GameMessage::Start { .. } => "start",
            GameMessage::AdvanceStage { .. } => "advance_stage",
            GameMessage::End { .. } => "end",
            GameMessage::SubmitClaim { .. } => "submit_claim",
            GameMessage::ApproveClaim { .. } => "approve_claim",
            GameMessage::DenyClaim { .. } => "deny_claim",
            GameMessage::MarkCell { .. } => "mark_cell",
            GameMessage::Update { .. } => "update",
            GameMessage::Close { .. } => "close",
        }
    }
}
