#[cfg(test)]
mod tests {
    use bounded_pool::{
        model::RejectionPolicy,
        pool::{Config, ThreadPoolInner},
    };
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
        time::{Duration, Instant},
    };

    fn measure<T>(name: &str, f: impl FnOnce() -> T) -> (T, Duration) {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();
        println!("✓ {}: {:?}", name, elapsed);
        (result, elapsed)
    }

    #[test]
    fn load_test_1_blocking_backpressure_serializes() {
        println!("\n=== LOAD TEST 1: 5 x 50ms through 2 workers, capacity 2 ===");
        let pool = ThreadPoolInner::new(2, 2);
        let completed = Arc::new(AtomicUsize::new(0));

        let (_, elapsed) = measure("5 sleeping tasks with blocking backpressure", || {
            for _ in 0..5 {
                let completed = completed.clone();
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(50));
                    completed.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
            pool.shutdown();
            assert!(pool.await_termination(Duration::from_secs(5)));
        });

        assert_eq!(completed.load(Ordering::SeqCst), 5, "every admitted task runs");
        // 5 tasks over 2 workers force at least three 50ms waves (minus
        // scheduling slack).
        assert!(
            elapsed >= Duration::from_millis(125),
            "finished too fast for 2 workers: {elapsed:?}"
        );
    }

    #[test]
    fn load_test_2_graceful_shutdown_completeness() {
        println!("\n=== LOAD TEST 2: graceful shutdown runs the whole queue ===");
        let pool = ThreadPoolInner::new(1, 8);
        let completed = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let completed = completed.clone();
            pool.submit(move || {
                thread::sleep(Duration::from_millis(10));
                completed.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.shutdown();
        assert!(pool.await_termination(Duration::from_secs(5)));
        assert_eq!(completed.load(Ordering::SeqCst), 3);
        assert!(pool.is_terminated());
    }

    #[test]
    fn load_test_3_many_small_tasks() {
        println!("\n=== LOAD TEST 3: 10k trivial tasks through 8 workers ===");
        let pool = ThreadPoolInner::new(8, 64);
        let completed = Arc::new(AtomicUsize::new(0));

        measure("10k tasks", || {
            for _ in 0..10_000 {
                let completed = completed.clone();
                pool.submit(move || {
                    completed.fetch_add(1, Ordering::Relaxed);
                })
                .unwrap();
            }
            pool.shutdown();
            assert!(pool.await_termination(Duration::from_secs(30)));
        });

        assert_eq!(completed.load(Ordering::Relaxed), 10_000);
        let metrics = pool.metrics();
        println!("  completed: {}/{}", metrics.completed_tasks, metrics.total_submitted);
        assert_eq!(metrics.completed_tasks, 10_000);
        assert_eq!(metrics.failed_tasks, 0);
        assert_eq!(metrics.success_rate(), 1.0);
    }

    #[test]
    fn load_test_4_concurrent_submitters() {
        println!("\n=== LOAD TEST 4: 8 submitter threads x 500 tasks ===");
        let pool = ThreadPoolInner::new(4, 32);
        let completed = Arc::new(AtomicUsize::new(0));

        measure("4000 tasks from 8 threads", || {
            let submitters: Vec<_> = (0..8)
                .map(|_| {
                    let pool = pool.clone();
                    let completed = completed.clone();
                    thread::spawn(move || {
                        for _ in 0..500 {
                            let completed = completed.clone();
                            pool.submit(move || {
                                completed.fetch_add(1, Ordering::Relaxed);
                            })
                            .unwrap();
                        }
                    })
                })
                .collect();
            for submitter in submitters {
                submitter.join().unwrap();
            }
            pool.shutdown();
            assert!(pool.await_termination(Duration::from_secs(30)));
        });

        assert_eq!(completed.load(Ordering::Relaxed), 4_000);
        assert_eq!(pool.metrics().total_submitted, 4_000);
    }

    #[test]
    fn load_test_5_shutdown_now_under_load_loses_nothing_silently() {
        println!("\n=== LOAD TEST 5: immediate shutdown mid-load ===");
        let pool = ThreadPoolInner::with_config(Config {
            num_threads: 2,
            queue_capacity: 100,
            rejection_policy: RejectionPolicy::Abort,
        });
        let executed = Arc::new(AtomicUsize::new(0));

        let mut admitted = 0usize;
        for _ in 0..100 {
            let executed = executed.clone();
            let result = pool.submit(move || {
                thread::sleep(Duration::from_millis(1));
                executed.fetch_add(1, Ordering::SeqCst);
            });
            if result.is_ok() {
                admitted += 1;
            }
        }

        let returned = pool.shutdown_now();
        assert!(pool.await_termination(Duration::from_secs(5)));

        // Accounting closes exactly: a task either ran or came back.
        let ran = executed.load(Ordering::SeqCst);
        println!("  admitted: {admitted}, ran: {ran}, returned: {}", returned.len());
        assert_eq!(ran + returned.len(), admitted);
    }
}
