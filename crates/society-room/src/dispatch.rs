//! Inbound message dispatch: the per-room game-phase state machine.
//!
//! | message             | effect                                              |
//! |---------------------|-----------------------------------------------------|
//! | `start_countdown`   | relay                                               |
//! | `nomination`        | record role, relay `{player, role}`; if every bound |
//! |                     | player now has a role, start campaigning            |
//! | `start_campaigning` | relay, start the countdown if idle                  |
//! | `chat`              | relay `{from, text}` with the sender's name         |
//! | `start_voting`      | relay with the role options                         |
//! | anything else       | relay the original bytes                            |
//!
//! State changes happen under the room lock; broadcasts happen after it is
//! released, since the broadcast path takes the lock itself.

use std::sync::Arc;

use society_protocol::{ClientMessage, PlayerId, ServerMessage};
use society_transport::Connection;

use crate::{Phase, Room};

impl<C: Connection> Room<C> {
    /// Applies one decoded message from `sender`.
    pub async fn dispatch(self: &Arc<Self>, sender: &PlayerId, msg: ClientMessage) {
        tracing::trace!(
            room = %self.code(),
            player = %sender,
            kind = msg.kind(),
            "dispatching message"
        );

        match msg {
            ClientMessage::StartCountdown => {
                self.broadcast(&ServerMessage::StartCountdown).await;
            }

            ClientMessage::Nomination { role } => {
                self.handle_nomination(sender, role).await;
            }

            ClientMessage::StartCampaigning => {
                self.broadcast(&ServerMessage::StartCampaigning).await;
                self.set_phase(Phase::Campaigning).await;
                self.start_countdown().await;
            }

            ClientMessage::Chat { text } => {
                let Some(from) = self.player_name(sender).await else {
                    tracing::debug!(
                        room = %self.code(),
                        player = %sender,
                        "chat from unknown player, dropping"
                    );
                    return;
                };
                self.broadcast(&ServerMessage::Chat { from, text }).await;
            }

            ClientMessage::StartVoting => {
                self.set_phase(Phase::Voting).await;
                self.broadcast(&ServerMessage::start_voting()).await;
            }

            ClientMessage::Raw(bytes) => {
                self.broadcast_raw(&bytes).await;
            }
        }
    }

    /// Records the nomination and, when it completes the set, opens the
    /// campaign.
    ///
    /// The unanimity check only looks at players with a bound connection,
    /// so someone who joined but never connected cannot stall the game.
    /// Check and phase change share one lock acquisition, so exactly one
    /// nomination per round triggers `start_campaigning`, whatever order
    /// they arrive in.
    async fn handle_nomination(self: &Arc<Self>, sender: &PlayerId, role: String) {
        let (name, open_campaign) = {
            let mut inner = self.inner.lock().await;
            let Some(player) = inner.players.get_mut(sender) else {
                tracing::debug!(
                    room = %self.code(),
                    player = %sender,
                    "nomination from unknown player, dropping"
                );
                return;
            };
            player.role = Some(role.clone());
            let name = player.name.clone();

            let all_chosen = inner
                .players
                .values()
                .filter(|p| p.is_connected())
                .all(|p| p.has_role());

            let open_campaign = all_chosen && inner.phase != Phase::Campaigning;
            if open_campaign {
                inner.phase = Phase::Campaigning;
            } else if inner.phase != Phase::Campaigning {
                inner.phase = Phase::Nominating;
            }
            (name, open_campaign)
        };

        self.broadcast(&ServerMessage::Nomination { player: name, role })
            .await;

        if open_campaign {
            tracing::info!(
                room = %self.code(),
                "all players nominated, starting campaigning"
            );
            self.broadcast(&ServerMessage::StartCampaigning).await;
            self.start_countdown().await;
        }
    }

    pub(crate) async fn set_phase(&self, phase: Phase) {
        let mut inner = self.inner.lock().await;
        if inner.phase != phase {
            tracing::debug!(
                room = %self.code(),
                from = %inner.phase,
                to = %phase,
                "phase changed"
            );
            inner.phase = phase;
        }
    }

    async fn player_name(&self, player_id: &PlayerId) -> Option<String> {
        let inner = self.inner.lock().await;
        inner.players.get(player_id).map(|p| p.name.clone())
    }
}
