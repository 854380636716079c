//! Game actor implementation with async message handling.

use super::messages::{GameMessage, Reply};
use crate::{
    game::{
        CallOutcome, Card, Claim, ClaimDecision, ClaimSource, GameError, GameId, GameResult,
        GameState, GameUpdate, Stage,
    },
    store::GameStore,
};
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Default inbox capacity per game
pub const DEFAULT_INBOX_CAPACITY: usize = 100;

/// Game actor handle for sending commands and reading snapshots
#[derive(Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<GameMessage>,
    snapshot: watch::Receiver<Arc<GameState>>,
    game_id: GameId,
}

impl GameHandle {
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Latest committed state. Never observes a half-applied mutation.
    pub fn snapshot(&self) -> Arc<GameState> {
        self.snapshot.borrow().clone()
    }

    /// Whether the actor is still accepting commands
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Send a message to the game
    pub async fn send(&self, message: GameMessage) -> GameResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| GameError::Unavailable)
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> GameMessage) -> GameResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| GameError::Unavailable)?
    }

    pub async fn buy(&self, owner_name: &str, quantity: usize) -> GameResult<Vec<Card>> {
        self.request(|response| GameMessage::Buy {
            owner_name: owner_name.to_string(),
            quantity,
            response,
        })
        .await
    }

    /// Roll a number; the reply carries the call log right after this roll
    pub async fn roll(&self) -> GameResult<CallOutcome> {
        self.request(|response| GameMessage::Roll { response }).await
    }

    pub async fn call(&self, number: u32) -> GameResult<CallOutcome> {
        self.request(|response| GameMessage::Call { number, response })
            .await
    }

    pub async fn start(&self) -> GameResult<Stage> {
        self.request(|response| GameMessage::Start { response })
            .await
    }

    pub async fn advance_stage(&self) -> GameResult<Stage> {
        self.request(|response| GameMessage::AdvanceStage { response })
            .await
    }

    pub async fn end(&self) -> GameResult<bool> {
        self.request(|response| GameMessage::End { response }).await
    }

    pub async fn submit_claim(
        &self,
        card_id: &str,
        owner_name: &str,
        source: ClaimSource,
    ) -> GameResult<Claim> {
        self.request(|response| GameMessage::SubmitClaim {
            card_id: card_id.to_string(),
            owner_name: owner_name.to_string(),
            source,
            response,
        })
        .await
    }

    pub async fn approve_claim(&self, card_id: &str) -> GameResult<ClaimDecision> {
        self.request(|response| GameMessage::ApproveClaim {
            card_id: card_id.to_string(),
            response,
        })
        .await
    }

    pub async fn deny_claim(&self, card_id: &str) -> GameResult<ClaimDecision> {
        self.request(|response| GameMessage::DenyClaim {
            card_id: card_id.to_string(),
            response,
        })
        .await
    }

    pub async fn mark_cell(&self, card_id: &str, row: usize, col: usize) -> GameResult<()> {
        self.request(|response| GameMessage::MarkCell {
            card_id: card_id.to_string(),
            row,
            col,
            response,
        })
        .await
    }

    pub async fn update(&self, update: GameUpdate) -> GameResult<()> {
        self.request(|response| GameMessage::Update { update, response })
            .await
    }

    /// Stop the actor after it drains commands already queued ahead of this one
    pub async fn close(&self) {
        let (tx, rx) = oneshot::channel();
        if self.send(GameMessage::Close { response: tx }).await.is_ok() {
            let _ = rx.await;
        }
    }
}

/// Actor owning a single game.
///
/// Commands are applied one at a time in arrival order. After each accepted
/// mutation the new state is published to every [`GameHandle`] and written to
/// the store. A rejected command leaves the state untouched and publishes
/// nothing.
pub struct GameActor {
    state: GameState,
    inbox: mpsc::Receiver<GameMessage>,
    snapshot: watch::Sender<Arc<GameState>>,
    store: Arc<dyn GameStore>,
    rng: StdRng,
    is_closed: bool,
}

impl GameActor {
    /// Create a new game actor
    ///
    /// # Returns
    ///
    /// * `(GameActor, GameHandle)` - Actor and handle for sending messages
    pub fn new(
        state: GameState,
        store: Arc<dyn GameStore>,
        inbox_capacity: usize,
    ) -> (Self, GameHandle) {
        let (sender, inbox) = mpsc::channel(inbox_capacity.max(1));
        let game_id = state.game_id().to_string();
        let (snapshot, receiver) = watch::channel(Arc::new(state.clone()));

        let actor = Self {
            state,
            inbox,
            snapshot,
            store,
            rng: StdRng::from_os_rng(),
            is_closed: false,
        };

        let handle = GameHandle {
            sender,
            snapshot: receiver,
            game_id,
        };

        (actor, handle)
    }

    /// Replace the random source, for reproducible draws
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Run the game actor event loop
    pub async fn run(mut self) {
        log::info!(
            "Game {} '{}' starting",
            self.state.game_id(),
            self.state.config().title
        );

        while let Some(message) = self.inbox.recv().await {
            log::debug!(
                "Game {}: handling {}",
                self.state.game_id(),
                message.name()
            );
            self.handle_message(message).await;

            if self.is_closed {
                break;
            }
        }

        log::info!("Game {} closed", self.state.game_id());
    }

    async fn handle_message(&mut self, message: GameMessage) {
        match message {
            GameMessage::Buy {
                owner_name,
                quantity,
                response,
            } => {
                let result = self
                    .apply(|state, rng| state.buy(&owner_name, quantity, rng))
                    .await;
                let _ = response.send(result);
            }

            GameMessage::Roll { response } => {
                let result = self
                    .apply(|state, rng| state.roll(rng).map(|n| state.call_outcome(n)))
                    .await;
                let _ = response.send(result);
            }

            GameMessage::Call { number, response } => {
                let result = self
                    .apply(|state, _| state.call(number).map(|n| state.call_outcome(n)))
                    .await;
                let _ = response.send(result);
            }

            GameMessage::Start { response } => {
                let result = self.apply(|state, _| state.start()).await;
                let _ = response.send(result);
            }

            GameMessage::AdvanceStage { response } => {
                let result = self.apply(|state, _| state.advance_stage()).await;
                let _ = response.send(result);
            }

            GameMessage::End { response } => {
                let result = self.apply(|state, _| Ok(state.end())).await;
                let _ = response.send(result);
            }

            GameMessage::SubmitClaim {
                card_id,
                owner_name,
                source,
                response,
            } => {
                let result = self
                    .apply(|state, _| state.submit_claim(&card_id, &owner_name, source))
                    .await;
                let _ = response.send(result);
            }

            GameMessage::ApproveClaim { card_id, response } => {
                let result = self.apply(|state, _| state.approve_claim(&card_id)).await;
                let _ = response.send(result);
            }

            GameMessage::DenyClaim { card_id, response } => {
                let result = self.apply(|state, _| state.deny_claim(&card_id)).await;
                let _ = response.send(result);
            }

            GameMessage::MarkCell {
                card_id,
                row,
                col,
                response,
            } => {
                let result = self
                    .apply(|state, _| state.mark_cell(&card_id, row, col))
                    .await;
                let _ = response.send(result);
            }

            GameMessage::Update { update, response } => {
                let result = self.apply(|state, _| state.update(update)).await;
                let _ = response.send(result);
            }

            GameMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    /// Run one command against the state and commit it if accepted
    async fn apply<T, F>(&mut self, op: F) -> GameResult<T>
    where
        F: FnOnce(&mut GameState, &mut StdRng) -> GameResult<T>,
    {
        let result = op(&mut self.state, &mut self.rng);
        if result.is_ok() {
            self.commit().await;
        }
        result
    }

    /// Publish the current state and persist it
    async fn commit(&mut self) {
        self.snapshot.send_replace(Arc::new(self.state.clone()));

        if let Err(e) = self.store.save(&self.state).await {
            log::warn!(
                "Game {}: failed to persist state: {}",
                self.state.game_id(),
                e
            );
        }
    }
}
