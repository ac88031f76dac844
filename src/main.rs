use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use lapnote::{Record, RecordStore, StopwatchController, StopwatchStatus};

/// Terminal stand-in for the single-screen app: the stopwatch readout
/// redraws in place, and single-letter commands play the role of taps.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let db_path = std::env::var("LAPNOTE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("lapnote.sqlite3"));

    let store = RecordStore::new(db_path)?;
    info!("Record store ready at {}", store.path().display());

    print_records(&store).await;

    let stopwatch = StopwatchController::new();
    let mut ticks = stopwatch.subscribe();

    println!("commands: t = tap (start/pause/resume), x = stop & record, l = list, q = quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = ticks.borrow_and_update().clone();
                print!("\r{}  ", snapshot.formatted);
                let _ = std::io::stdout().flush();
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "t" => {
                        if stopwatch.snapshot().await.status == StopwatchStatus::Stopped {
                            stopwatch.start().await;
                        } else {
                            stopwatch.toggle().await;
                        }
                    }
                    "x" => {
                        if let Some(duration) = stopwatch.stop().await {
                            println!("\rstopped at {duration}");
                            print!("note (optional): ");
                            let _ = std::io::stdout().flush();
                            let note = lines.next_line().await?.unwrap_or_default();
                            let record = Record::new(duration, note.trim().to_string());
                            // Persistence failures are logged and otherwise
                            // ignored; the stopwatch is already reset.
                            if let Err(err) = store.insert_record(&record).await {
                                error!("Failed to save record: {err:#}");
                            }
                            print_records(&store).await;
                        }
                    }
                    "b" => stopwatch.suspend(Utc::now()).await,
                    "f" => stopwatch.resume(Utc::now()).await,
                    "l" => print_records(&store).await,
                    "q" => break,
                    "" => {}
                    other => println!("unknown command: {other}"),
                }
            }
        }
    }

    Ok(())
}

async fn print_records(store: &RecordStore) {
    match store.list_records().await {
        Ok(records) => {
            for record in records {
                println!("{}   {}", record.duration, record.note);
            }
        }
        Err(err) => error!("Failed to load records: {err:#}"),
    }
}
