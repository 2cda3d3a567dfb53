//! Grid Duel text client.
//!
//! Thin polling frontend: registers with a generated token, waits for the
//! opponent, renders the board, and reads moves from stdin on our turn.

use anyhow::Result;
use clap::Parser;
use grid_duel::{Board, GameClient, MoveStatus, RegisterStatus, Symbol, is_full, winner};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Text client for the Grid Duel server.
#[derive(Debug, Parser)]
#[command(name = "client_cli", version)]
struct Args {
    /// Server host.
    host: String,
    /// Server port.
    port: u16,
    /// Player name to register as.
    player_name: String,
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

/// Reads one trimmed line from stdin without blocking the runtime.
async fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    use std::io::Write;
    std::io::stdout().flush()?;
    let line = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        std::io::stdin().read_line(&mut buf).map(|_| buf)
    })
    .await??;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let base_url = format!("http://{}:{}", args.host, args.port);
    let token = uuid::Uuid::new_v4().to_string();
    let client = GameClient::new(base_url, args.player_name.clone(), token);

    let registration = client.register().await?;
    match registration.status {
        RegisterStatus::Ok => {}
        RegisterStatus::Full => {
            println!("Server is full, could not join.");
            return Ok(());
        }
        RegisterStatus::Ended => {
            println!(
                "The game has already ended: {}",
                registration.reason.unwrap_or_default()
            );
            return Ok(());
        }
        RegisterStatus::NameInUse => {
            println!("That name is already taken by another player.");
            return Ok(());
        }
        RegisterStatus::AlreadyInProgress => {
            println!("A match is already in progress.");
            return Ok(());
        }
    }

    println!("Connected as {}.", client.name);
    println!("Waiting for another player...");

    // Poll until the second slot fills.
    loop {
        let ended = client.ended().await?;
        if ended.ended {
            println!("Game ended: {}", ended.reason);
            return Ok(());
        }
        if client.players().await?.len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    let players = client.players().await?;
    let mut symbol = players
        .get(&client.name)
        .copied()
        .unwrap_or(Symbol::Pending);
    let opponent = players
        .keys()
        .find(|n| **n != client.name)
        .cloned()
        .unwrap_or_else(|| "opponent".to_string());

    clear_screen();
    println!("Coin flip done! You are: {symbol}");
    println!("You are playing against {opponent}.");

    loop {
        let ended = client.ended().await?;
        if ended.ended {
            println!("Game ended: {}", ended.reason);
            break;
        }

        let turn = client.turn().await?;
        let board = Board::from_grid(client.board().await?);

        println!();
        println!("{}", "=".repeat(40));
        println!("{}", board.display());

        let mut game_over = false;
        if turn.as_deref() == Some(client.name.as_str()) {
            println!();
            println!("Your turn! ({symbol})");
            loop {
                let input = read_line("Enter your move (e.g. A1) or 'quit': ").await?;
                if input.eq_ignore_ascii_case("quit") {
                    client.leave().await?;
                    println!("You left the game. The session is over for both players.");
                    return Ok(());
                }
                let response = client.make_move(&input).await?;
                match response.status {
                    MoveStatus::Ok => break,
                    MoveStatus::Win => {
                        println!("You won!");
                        game_over = true;
                        break;
                    }
                    MoveStatus::Draw => {
                        println!("It's a draw!");
                        game_over = true;
                        break;
                    }
                    MoveStatus::Error => {
                        let message = response.message.unwrap_or_default();
                        println!("Error: {message}");
                        if message.contains("ended") {
                            return Ok(());
                        }
                    }
                }
            }
        } else {
            println!();
            println!("Waiting for {opponent}...");
            tokio::time::sleep(Duration::from_secs(2)).await;
        }

        // Re-check the board so the waiting player also notices the end of
        // a match.
        let board = Board::from_grid(client.board().await?);
        let finished = game_over || winner(&board).is_some() || is_full(&board);
        if !finished {
            continue;
        }

        println!();
        println!("{}", "=".repeat(40));
        println!("{}", board.display());
        match winner(&board) {
            Some(mark) => {
                if symbol.mark() == Some(mark) {
                    println!("You won!");
                } else {
                    println!("{opponent} won!");
                }
            }
            None => println!("It's a draw!"),
        }

        let stats = client.stats().await?;
        println!("Score: X [{}] x O [{}]", stats.x, stats.o);

        let again = read_line("\nPlay again? (y/n): ").await?;
        if again.eq_ignore_ascii_case("y") {
            if client.restart().await? {
                println!("New match started!");
                let players = client.players().await?;
                symbol = players
                    .get(&client.name)
                    .copied()
                    .unwrap_or(Symbol::Pending);
                debug!(%symbol, "symbols rotated for rematch");
                println!("You are now: {symbol}");
            } else {
                println!("Could not restart, the session is over.");
                break;
            }
        } else {
            client.leave().await?;
            println!("You left the game. Thanks for playing!");
            break;
        }
    }

    Ok(())
}
