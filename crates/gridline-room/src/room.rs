//! Room actor: an isolated Tokio task that owns one game instance.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. This is the "actor model" — board, member
//! list, and turn index are touched only by the room's own loop, so
//! there is no locking and no interleaving: requests against a room
//! execute in a strict total order defined by queue arrival.
//!
//! Some actions produce follow-up actions (a second join starts the
//! game, a finished game resets the board). Follow-ups are enqueued,
//! never executed inline, so a request that arrived while the current
//! one was executing is processed first.

use std::collections::VecDeque;

use gridline_protocol::SessionId;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::{mpsc, oneshot};

use crate::{Board, Mark, Player, RoomError};

/// Capacity of a room's bounded action queue. Submitting to a full
/// queue suspends the submitter until space frees; actions are never
/// dropped.
pub const ACTION_QUEUE_CAPACITY: usize = 10;

/// A room never holds more than two members.
const MEMBER_LIMIT: usize = 2;

/// One request to mutate room state.
///
/// `Join`, `Leave`, `Hangup`, and `Mark` originate from client input.
/// `Start`, `PromptTurn`, and `Reset` are the follow-ups the actor
/// enqueues for itself; they carry no player because there is no
/// session to report their failures to.
#[derive(Debug, Clone)]
pub enum Action {
    /// Add a member.
    Join(Player),
    /// Remove a member who quit or switched rooms.
    Leave(Player),
    /// Remove a member whose connection dropped without a QUIT.
    Hangup(Player),
    /// Mark a cell for a member.
    Mark { player: Player, cell: usize },
    /// Begin a game: shuffle marks and first turn, show the board.
    Start,
    /// Tell the current member to move and the other one to wait.
    PromptTurn,
    /// Clear the board and start over.
    Reset,
}

/// What actually travels on a room's queue: an action with an optional
/// completion reply, a chat broadcast, or a shutdown request. Keeping
/// chat on the same queue as actions gives it the same ordering
/// guarantee without letting anything outside the actor read the
/// member list.
enum RoomRequest {
    Act {
        action: Action,
        reply: Option<oneshot::Sender<Result<(), RoomError>>>,
    },
    Chat {
        from: SessionId,
        text: String,
    },
    Shutdown,
}

/// Handle to a running room actor.
///
/// Cheap to clone — the registry hands out clones to every connection
/// that joins the room. The actor exits when every handle is dropped
/// or after [`RoomHandle::shutdown`].
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::Sender<RoomRequest>,
}

impl RoomHandle {
    /// The name this room is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submits an action and waits until the actor has executed it.
    ///
    /// # Errors
    /// Whatever the action's handler decided (the caller relays the
    /// message to the offending session), or `Unavailable` if the
    /// actor is gone.
    pub async fn submit(&self, action: Action) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomRequest::Act {
                action,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Queues a chat line for broadcast to every member, formatted
    /// `{session}: {text}`. Fire-and-forget: completion is not awaited.
    pub async fn chat(&self, from: SessionId, text: String) -> Result<(), RoomError> {
        self.sender
            .send(RoomRequest::Chat { from, text })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Tells the actor to stop draining its queue and exit.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomRequest::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

/// The room state owned by its actor task.
struct RoomActor {
    name: String,
    board: Board,
    members: Vec<Player>,
    /// Index into `members` of the player expected to mark next.
    /// Meaningful only while the room is ready (two members).
    turn: usize,
    receiver: mpsc::Receiver<RoomRequest>,
}

impl RoomActor {
    /// Runs the actor loop, executing one request at a time until the
    /// queue closes or a shutdown request arrives.
    async fn run(mut self) {
        tracing::info!(room = %self.name, "room actor started");

        // `pending` fronts the channel. Follow-up actions go behind
        // every request that had already reached the queue (see
        // `enqueue_follow_up`), and pushing to a local buffer cannot
        // block the actor on its own bounded channel.
        let mut pending: VecDeque<RoomRequest> = VecDeque::new();

        loop {
            let request = match pending.pop_front() {
                Some(request) => request,
                None => match self.receiver.recv().await {
                    Some(request) => request,
                    None => break,
                },
            };

            match request {
                RoomRequest::Act { action, reply } => {
                    let outcome = match self.execute(action) {
                        Ok(Some(follow_up)) => {
                            self.enqueue_follow_up(&mut pending, follow_up);
                            Ok(())
                        }
                        Ok(None) => Ok(()),
                        Err(err) => Err(err),
                    };
                    match reply {
                        Some(reply) => {
                            // Submitter may have given up waiting.
                            let _ = reply.send(outcome);
                        }
                        None => {
                            // Internally generated action: nobody to
                            // deliver the error to.
                            if let Err(err) = outcome {
                                tracing::debug!(
                                    room = %self.name,
                                    %err,
                                    "follow-up action failed"
                                );
                            }
                        }
                    }
                }
                RoomRequest::Chat { from, text } => {
                    self.broadcast(&format!("{from}: {text}"));
                }
                RoomRequest::Shutdown => {
                    tracing::info!(room = %self.name, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room = %self.name, "room actor stopped");
    }

    /// Places a self-generated action behind everything that has
    /// already arrived: drain the channel into `pending` without
    /// blocking, then append the follow-up. Queue-arrival order is
    /// preserved exactly as if the follow-up had been sent through
    /// the channel at completion time.
    fn enqueue_follow_up(&mut self, pending: &mut VecDeque<RoomRequest>, follow_up: Action) {
        while let Ok(request) = self.receiver.try_recv() {
            pending.push_back(request);
        }
        pending.push_back(RoomRequest::Act {
            action: follow_up,
            reply: None,
        });
    }

    /// Single point of entry for executing a room action. Returns the
    /// follow-up to enqueue, if the action produced one.
    fn execute(&mut self, action: Action) -> Result<Option<Action>, RoomError> {
        match action {
            Action::Join(player) => self.handle_join(player),
            Action::Leave(player) => self.handle_leave(&player, false),
            Action::Hangup(player) => self.handle_leave(&player, true),
            Action::Mark { player, cell } => self.handle_mark(&player, cell),
            Action::Start => self.handle_start(),
            Action::PromptTurn => self.handle_prompt_turn(),
            Action::Reset => self.handle_reset(),
        }
    }

    fn handle_join(&mut self, player: Player) -> Result<Option<Action>, RoomError> {
        if self.members.len() >= MEMBER_LIMIT {
            return Err(RoomError::RoomFull);
        }
        if self.members.contains(&player) {
            return Err(RoomError::AlreadyJoined);
        }

        let id = player.id();
        self.members.push(player);
        tracing::info!(
            room = %self.name,
            session = %id,
            members = self.members.len(),
            "member joined"
        );

        if self.is_ready() {
            Ok(Some(Action::Start))
        } else {
            for member in &self.members {
                member.send("Waiting for the other player to join...");
            }
            Ok(None)
        }
    }

    fn handle_leave(&mut self, player: &Player, abrupt: bool) -> Result<Option<Action>, RoomError> {
        let Some(slot) = self.slot_of(player.id()) else {
            return Err(RoomError::NotAMember);
        };
        self.members.remove(slot);
        tracing::info!(
            room = %self.name,
            session = %player.id(),
            abrupt,
            members = self.members.len(),
            "member left"
        );

        self.broadcast("The other player left the game.");
        Ok(Some(Action::Reset))
    }

    fn handle_start(&mut self) -> Result<Option<Action>, RoomError> {
        if !self.is_ready() {
            return Err(RoomError::NotReady);
        }

        // Shuffling the member list decides mark ownership (slot 0
        // plays noughts); the first turn is drawn separately.
        let mut rng = rand::rng();
        self.members.shuffle(&mut rng);
        self.turn = rng.random_range(0..MEMBER_LIMIT);

        for (slot, member) in self.members.iter().enumerate() {
            member.send(format!("You mark with '{}'", Mark::for_slot(slot)));
        }
        self.broadcast(&self.board.render());

        tracing::info!(
            room = %self.name,
            first = %self.members[self.turn].id(),
            "game started"
        );
        Ok(Some(Action::PromptTurn))
    }

    fn handle_prompt_turn(&self) -> Result<Option<Action>, RoomError> {
        if !self.is_ready() {
            return Err(RoomError::NotReady);
        }
        self.members[self.turn].send("It's your turn.");
        self.members[1 - self.turn].send("Waiting for the other player to move...");
        Ok(None)
    }

    fn handle_mark(&mut self, player: &Player, cell: usize) -> Result<Option<Action>, RoomError> {
        if !self.is_ready() {
            return Err(RoomError::NotReady);
        }
        let Some(slot) = self.slot_of(player.id()) else {
            return Err(RoomError::NotAMember);
        };
        if slot != self.turn {
            return Err(RoomError::NotYourTurn);
        }

        self.board.mark(cell, Mark::for_slot(slot))?;
        self.broadcast(&self.board.render());

        let other = 1 - slot;
        if self.board.winner().is_some() {
            self.members[slot].send("Oh hey you won! Congrats!");
            self.members[other].send("Oops! Sorry bud better luck next time!");
            tracing::info!(room = %self.name, winner = %player.id(), "game won");
            return Ok(Some(Action::Reset));
        }
        if self.board.is_full() {
            self.broadcast("It's a draw! Nobody wins this one.");
            tracing::info!(room = %self.name, "game drawn");
            return Ok(Some(Action::Reset));
        }

        self.turn = other;
        Ok(Some(Action::PromptTurn))
    }

    fn handle_reset(&mut self) -> Result<Option<Action>, RoomError> {
        self.broadcast("Resetting the board.");
        self.board.reset();
        self.turn = 0;
        Ok(Some(Action::Start))
    }

    fn is_ready(&self) -> bool {
        self.members.len() == MEMBER_LIMIT
    }

    fn slot_of(&self, id: SessionId) -> Option<usize> {
        self.members.iter().position(|member| member.id() == id)
    }

    /// Sends a line to every member.
    fn broadcast(&self, line: &str) {
        for member in &self.members {
            member.send(line);
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate
/// with it. The room starts empty with a clear board.
pub fn spawn(name: impl Into<String>) -> RoomHandle {
    let name = name.into();
    let (tx, rx) = mpsc::channel(ACTION_QUEUE_CAPACITY);

    let actor = RoomActor {
        name: name.clone(),
        board: Board::new(),
        members: Vec::new(),
        turn: 0,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { name, sender: tx }
}
