//! End-to-end tests over real TCP connections.

use std::time::Duration;

use gridline::Server;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

// ==================== helpers ====================

async fn start_server() -> String {
    let server = Server::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(server.run());
    sleep(Duration::from_millis(10)).await;
    addr
}

struct Client {
    lines: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: &str) -> Client {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        Client {
            lines: BufReader::new(read_half),
            writer: write_half,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> String {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(2), self.lines.read_line(&mut line))
            .await
            .expect("timed out waiting for a line")
            .unwrap();
        assert!(n > 0, "connection closed while expecting a line");
        line.trim_end_matches('\n').to_string()
    }

    /// Reads lines until one contains `needle`, returning it. Panics if
    /// the server sends a pile of unrelated lines instead.
    async fn recv_until_contains(&mut self, needle: &str) -> String {
        for _ in 0..32 {
            let line = self.recv().await;
            if line.contains(needle) {
                return line;
            }
        }
        panic!("never received a line containing {needle:?}");
    }

    async fn expect_close(&mut self) {
        loop {
            let mut line = String::new();
            let n = timeout(Duration::from_secs(2), self.lines.read_line(&mut line))
                .await
                .expect("timed out waiting for the connection to close")
                .unwrap();
            if n == 0 {
                return;
            }
        }
    }
}

/// Consumes one game-start sequence: the mark assignment, three board
/// rows and the turn prompt. Returns the assignment and prompt lines.
async fn read_start(client: &mut Client) -> (String, String) {
    let deal = client.recv().await;
    assert!(
        deal.starts_with("You mark with '"),
        "expected a mark assignment, got {deal:?}"
    );
    for _ in 0..3 {
        assert_eq!(client.recv().await, "...");
    }
    let prompt = client.recv().await;
    (deal, prompt)
}

/// Joins two clients into `room` and waits for the game to start.
/// Returns them as (current, waiting) according to the turn prompts.
async fn start_game(addr: &str, room: &str) -> (Client, Client) {
    let mut c1 = Client::connect(addr).await;
    c1.send(&format!("JOIN {room}")).await;
    assert_eq!(c1.recv().await, "Waiting for the other player to join...");

    let mut c2 = Client::connect(addr).await;
    c2.send(&format!("JOIN {room}")).await;

    let (_, prompt1) = read_start(&mut c1).await;
    let (_, prompt2) = read_start(&mut c2).await;
    assert_ne!(prompt1, prompt2);

    if prompt1 == "It's your turn." {
        (c1, c2)
    } else {
        (c2, c1)
    }
}

/// Marks a cell as `actor` and waits for the turn to pass to `other`,
/// draining the board broadcast on both sides.
async fn mark_and_wait(actor: &mut Client, other: &mut Client, cell: usize) {
    actor.send(&format!("MARK {cell}")).await;
    other.recv_until_contains("It's your turn.").await;
    actor
        .recv_until_contains("Waiting for the other player to move...")
        .await;
}

// ==================== joining and starting ====================

#[tokio::test]
async fn test_two_players_get_marks_and_board() {
    let addr = start_server().await;

    let mut c1 = Client::connect(&addr).await;
    c1.send("JOIN duel").await;
    assert_eq!(c1.recv().await, "Waiting for the other player to join...");

    let mut c2 = Client::connect(&addr).await;
    c2.send("JOIN duel").await;

    let (deal1, prompt1) = read_start(&mut c1).await;
    let (deal2, prompt2) = read_start(&mut c2).await;

    // One nought, one cross, never the same.
    assert_ne!(deal1, deal2);
    for deal in [&deal1, &deal2] {
        assert!(
            *deal == "You mark with 'o'" || *deal == "You mark with 'x'",
            "unexpected assignment {deal:?}"
        );
    }

    // Exactly one player is prompted to move.
    assert_ne!(prompt1, prompt2);
    for prompt in [&prompt1, &prompt2] {
        assert!(
            *prompt == "It's your turn."
                || *prompt == "Waiting for the other player to move...",
            "unexpected prompt {prompt:?}"
        );
    }
}

#[tokio::test]
async fn test_join_switches_rooms() {
    let addr = start_server().await;
    let (mut switcher, mut peer) = start_game(&addr, "r1").await;

    switcher.send("JOIN r2").await;
    assert_eq!(peer.recv().await, "The other player left the game.");
    assert_eq!(peer.recv().await, "Resetting the board.");
    assert_eq!(
        switcher.recv().await,
        "Waiting for the other player to join..."
    );

    // Rejoining the room the session already sits in is rejected.
    switcher.send("JOIN r2").await;
    assert_eq!(switcher.recv().await, "player is already in this room");
}

#[tokio::test]
async fn test_empty_room_is_reusable() {
    let addr = start_server().await;
    let (mut c1, mut c2) = start_game(&addr, "phoenix").await;

    c1.send("QUIT").await;
    c1.expect_close().await;
    c2.recv_until_contains("Resetting the board.").await;
    c2.send("QUIT").await;
    c2.expect_close().await;

    // The emptied room is still registered and hosts a fresh game.
    let (mut current, _waiting) = start_game(&addr, "phoenix").await;
    current.send("MARK 5").await;
    assert_eq!(current.recv().await, "...");
    let middle = current.recv().await;
    assert!(
        middle == ".o." || middle == ".x.",
        "expected a marked center row, got {middle:?}"
    );
}

// ==================== marking ====================

#[tokio::test]
async fn test_mark_out_of_turn_is_rejected() {
    let addr = start_server().await;
    let (mut current, mut waiting) = start_game(&addr, "turns").await;

    waiting.send("MARK 5").await;
    assert_eq!(waiting.recv().await, "not your turn yet");

    // The rejected attempt must not have consumed the turn.
    mark_and_wait(&mut current, &mut waiting, 5).await;
}

#[tokio::test]
async fn test_mark_without_room_is_rejected() {
    let addr = start_server().await;
    let mut client = Client::connect(&addr).await;

    client.send("MARK 5").await;
    assert_eq!(client.recv().await, "player is not in a room");
}

#[tokio::test]
async fn test_invalid_mark_arguments() {
    let addr = start_server().await;
    let mut client = Client::connect(&addr).await;

    client.send("MARK abc").await;
    assert_eq!(client.recv().await, "cell must be a number between 1 and 9");

    client.send("MARK").await;
    assert_eq!(client.recv().await, "invalid arguments, usage: MARK <cell>");

    client.send("JOIN a b").await;
    assert_eq!(client.recv().await, "invalid arguments, usage: JOIN <room>");
}

// ==================== game over ====================

#[tokio::test]
async fn test_completed_row_wins() {
    let addr = start_server().await;
    let (mut first, mut second) = start_game(&addr, "match").await;

    mark_and_wait(&mut first, &mut second, 1).await;
    mark_and_wait(&mut second, &mut first, 4).await;
    mark_and_wait(&mut first, &mut second, 2).await;
    mark_and_wait(&mut second, &mut first, 5).await;

    // Completes the top row.
    first.send("MARK 3").await;
    first.recv_until_contains("Oh hey you won! Congrats!").await;
    second
        .recv_until_contains("Oops! Sorry bud better luck next time!")
        .await;

    // Both players see the reset and a fresh deal.
    first.recv_until_contains("Resetting the board.").await;
    second.recv_until_contains("Resetting the board.").await;
    first.recv_until_contains("You mark with '").await;
    second.recv_until_contains("You mark with '").await;
}

// ==================== chat ====================

#[tokio::test]
async fn test_chat_reaches_room_members() {
    let addr = start_server().await;
    let (mut current, mut waiting) = start_game(&addr, "banter").await;

    current.send("!good luck").await;
    for client in [&mut current, &mut waiting] {
        let line = client.recv_until_contains(": good luck").await;
        assert!(line.starts_with("S-"), "unexpected chat line {line:?}");
    }
}

#[tokio::test]
async fn test_chat_without_room_is_rejected() {
    let addr = start_server().await;
    let mut client = Client::connect(&addr).await;

    client.send("!anyone here?").await;
    assert_eq!(client.recv().await, "player is not in a room");
}

// ==================== leaving ====================

#[tokio::test]
async fn test_quit_closes_connection() {
    let addr = start_server().await;
    let mut client = Client::connect(&addr).await;
    client.send("JOIN q1").await;
    assert_eq!(client.recv().await, "Waiting for the other player to join...");

    client.send("QUIT").await;
    client.expect_close().await;
}

#[tokio::test]
async fn test_quit_without_room_closes_connection() {
    let addr = start_server().await;
    let mut client = Client::connect(&addr).await;

    client.send("QUIT").await;
    client.expect_close().await;
}

#[tokio::test]
async fn test_abrupt_disconnect_notifies_peer() {
    let addr = start_server().await;
    let (mut current, waiting) = start_game(&addr, "ghosted").await;

    drop(waiting);
    assert_eq!(current.recv().await, "The other player left the game.");
    assert_eq!(current.recv().await, "Resetting the board.");
}

// ==================== help ====================

#[tokio::test]
async fn test_unknown_command_gets_help() {
    let addr = start_server().await;
    let mut client = Client::connect(&addr).await;

    client.send("BOGUS").await;
    client.recv_until_contains("Commands are:").await;
    client.recv_until_contains("QUIT").await;

    // The session survives the unknown command.
    client.send("JOIN h1").await;
    client
        .recv_until_contains("Waiting for the other player to join...")
        .await;
}
