//! Two players over an in-memory link: one sends a burst of words, the
//! other echoes each word back doubled.
//!
//! ```sh
//! cargo run --example ping_pong
//! ```

use std::sync::Arc;

use nbsp_tokio::{metrics, Event, MemoryLink, NbspConfig, Player};

const WORDS: u32 = 8;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (left, right) = MemoryLink::pair();
    let mut ping = Player::new(Arc::new(left), NbspConfig::new().buffer_words(8))?;
    let mut pong = Player::new(Arc::new(right), NbspConfig::new().buffer_words(8))?;

    let echo = tokio::spawn(async move {
        let mut echoed = 0;
        while echoed < WORDS {
            if let Event::Data(word) = pong.recv().await? {
                println!("pong: got {word}, echoing {}", word * 2);
                while !pong.send(word * 2).await? {
                    // buffer full: service the channel until a slot frees up
                    pong.recv().await?;
                }
                echoed += 1;
            }
        }
        pong.flush().await?;
        Ok::<_, nbsp_tokio::NbspError>(())
    });

    for word in 1..=WORDS {
        while !ping.send(word).await? {
            ping.recv().await?;
        }
    }

    let mut echoes = 0;
    while echoes < WORDS {
        if let Event::Data(word) = ping.recv().await? {
            println!("ping: echo {word}");
            echoes += 1;
        }
    }
    ping.flush().await?;

    echo.await??;

    println!("{}", metrics::format_metrics(&metrics::global_metrics().snapshot()));
    Ok(())
}
