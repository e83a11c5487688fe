//! Basic team example
//!
//! Demonstrates building a bounded pool, submitting work, growing and
//! shrinking it, and quitting cleanly.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use team::{Team, TeamConfig};

fn main() {
    println!("=== Team Basic Example ===\n");

    let config = TeamConfig::new().worker_limit(4).thread_name_prefix("demo");
    let team = Team::with_limit(config);

    let completed = Arc::new(AtomicUsize::new(0));
    let total_tasks = 6;

    println!("Submitting {total_tasks} tasks...\n");
    for i in 0..total_tasks {
        let completed = Arc::clone(&completed);
        team.submit(Box::new(move || {
            println!("[task {i}] running on {:?}", std::thread::current().name());
            completed.fetch_add(1, Ordering::SeqCst);
        }))
        .expect("team still accepting work");
    }

    let start = std::time::Instant::now();
    while completed.load(Ordering::SeqCst) < total_tasks {
        if start.elapsed() > Duration::from_secs(5) {
            println!("WARNING: timed out waiting for tasks!");
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    println!("\n{}/{total_tasks} tasks completed!", completed.load(Ordering::SeqCst));

    let stats = team.statistics();
    println!(
        "\nPool state: idle={} busy={} pending={}",
        stats.idle_count, stats.busy_count, stats.pending_count
    );

    println!("\nShrinking to zero idle workers...");
    team.shrink(None).expect("team still accepting work");
    std::thread::sleep(Duration::from_millis(50));
    println!("Pool state: {:?}", team.statistics());

    println!("\nGrowing back to 2 workers...");
    team.grow(2).expect("team still accepting work");
    std::thread::sleep(Duration::from_millis(50));
    println!("Pool state: {:?}", team.statistics());

    println!("\nQuitting...");
    team.quit();

    println!("\n=== Example Complete ===");
}
