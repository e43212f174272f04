//! Interactive console client. Lines you type go to the server, lines
//! the server sends are printed as they arrive.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser, Debug)]
#[command(name = "gridline-client")]
#[command(about = "Console client for a Gridline server")]
struct Args {
    /// Server address to connect to.
    #[arg(long, default_value = "127.0.0.1:4000")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let stream = TcpStream::connect(&args.addr).await?;
    println!("connected to {}", args.addr);
    let (read_half, mut write_half) = stream.into_split();

    let mut server_lines = BufReader::new(read_half).lines();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = server_lines.next_line() => match line? {
                Some(line) => println!("{line}"),
                None => {
                    println!("server closed the connection");
                    break;
                }
            },
            line = input.next_line() => match line? {
                Some(line) => {
                    write_half.write_all(line.as_bytes()).await?;
                    write_half.write_all(b"\n").await?;
                }
                None => break,
            },
        }
    }
    Ok(())
}
