use bounded_pool::ThreadPoolInner;
use std::time::{Duration, Instant};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let now = Instant::now();
    let pool = ThreadPoolInner::new(4, 16);

    for task_id in 0..100 {
        if let Err(err) = pool.submit(move || {
            let worker = std::thread::current();
            tracing::info!(task_id, worker = worker.name().unwrap_or("?"), "task running");
        }) {
            tracing::warn!(task_id, "submission rejected: {err}");
            break;
        }
    }

    pool.shutdown();
    let terminated = pool.await_termination(Duration::from_secs(5));

    let metrics = pool.metrics();
    println!(
        "terminated: {terminated}, completed: {}/{}, elapsed: {:?}",
        metrics.completed_tasks,
        metrics.total_submitted,
        now.elapsed()
    );
}
