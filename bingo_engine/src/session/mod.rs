//! Session module: one async actor per game.
//!
//! This module implements:
//! - GameActor: owns a single game and applies its commands in order
//! - GameHandle: cloneable sender plus a watch on the latest snapshot
//! - GameManager: registry that spawns, finds and deletes game actors
//!
//! ## Architecture
//!
//! Each game runs in its own Tokio task with an mpsc inbox. Mutations are
//! serialized by the inbox; reads never touch the actor and instead borrow
//! the last published `Arc<GameState>`. Different games never contend.
//!
//! ## Example
//!
//! ```ignore
//! use bingo_engine::{GameConfig, GameManager, MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = GameManager::new(Arc::new(MemoryStore::new()));
//!     let game = manager.create_game(GameConfig::default()).await.unwrap();
//!
//!     let handle = manager.handle(game.game_id()).await.unwrap();
//!     handle.buy("alice", 2).await.unwrap();
//!     handle.start().await.unwrap();
//!     let outcome = handle.roll().await.unwrap();
//!     println!("called {}", outcome.number);
//! }
//! ```

pub mod actor;
pub mod manager;
pub mod messages;

pub use actor::{DEFAULT_INBOX_CAPACITY, GameActor, GameHandle};
pub use manager::GameManager;
pub use messages::GameMessage;
