//! Multi-producer / multi-consumer behavior under real contention.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use depot_channel::{BoundedChannel, MIN_CAPACITY, PopError};

/// Runs `f` on a helper thread and fails the test if it does not finish in time.
fn with_watchdog<F>(limit: Duration, f: F)
where
    F: FnOnce() + Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        f();
        done_tx.send(()).unwrap();
    });

    let result = done_rx.recv_timeout(limit);
    assert!(result.is_ok(), "Test timed out - possible deadlock!");

    handle.join().unwrap();
}

// =============================================================================
// No lost wakeup
// =============================================================================

#[test]
fn four_producers_four_consumers_capacity_eight() {
    const PRODUCERS: u64 = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: u64 = 100;
    const TOTAL: u64 = PRODUCERS * PER_PRODUCER;

    with_watchdog(Duration::from_secs(10), || {
        let ch = Arc::new(BoundedChannel::<u64>::new(8).unwrap());
        let popped = Arc::new(AtomicUsize::new(0));

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let ch = Arc::clone(&ch);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        ch.push(p * PER_PRODUCER + i).unwrap();
                    }
                })
            })
            .collect();

        // Consumers stop on a shared count, not on close, so a lost wakeup
        // would leave one of them parked forever.
        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let ch = Arc::clone(&ch);
                let popped = Arc::clone(&popped);
                thread::spawn(move || {
                    let mut mine = Vec::new();
                    loop {
                        let claimed = popped.fetch_add(1, Ordering::SeqCst);
                        if claimed >= TOTAL as usize {
                            break;
                        }
                        mine.push(ch.pop().unwrap());
                    }
                    mine
                })
            })
            .collect();

        for h in producers {
            h.join().unwrap();
        }

        let mut all: Vec<u64> = consumers
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(all.len(), TOTAL as usize);
        all.sort_unstable();
        assert_eq!(all, (0..TOTAL).collect::<Vec<_>>());
        assert!(ch.is_empty());
    });
}

// =============================================================================
// No loss / duplication
// =============================================================================

#[test]
fn multiset_of_popped_equals_multiset_of_pushed() {
    const PRODUCERS: u32 = 6;
    const CONSUMERS: usize = 3;
    const PER_PRODUCER: u32 = 2_000;

    with_watchdog(Duration::from_secs(20), || {
        let ch = Arc::new(BoundedChannel::<(u32, u32)>::new(MIN_CAPACITY).unwrap());

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let ch = Arc::clone(&ch);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        ch.push((p, i)).unwrap();
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let ch = Arc::clone(&ch);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Ok(item) = ch.pop() {
                        seen.push(item);
                    }
                    seen
                })
            })
            .collect();

        for h in producers {
            h.join().unwrap();
        }
        ch.close();

        let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
        for h in consumers {
            for item in h.join().unwrap() {
                *counts.entry(item).or_default() += 1;
            }
        }

        assert_eq!(counts.len(), (PRODUCERS * PER_PRODUCER) as usize);
        assert!(counts.values().all(|&n| n == 1), "item popped twice");
    });
}

// =============================================================================
// FIFO
// =============================================================================

#[test]
fn single_producer_order_seen_by_single_consumer() {
    with_watchdog(Duration::from_secs(10), || {
        let ch = Arc::new(BoundedChannel::<u32>::new(8).unwrap());

        let producer = {
            let ch = Arc::clone(&ch);
            thread::spawn(move || {
                for i in 0..50_000 {
                    ch.push(i).unwrap();
                }
                ch.close();
            })
        };

        let mut expected = 0;
        while let Ok(val) = ch.pop() {
            assert_eq!(val, expected, "FIFO order violated");
            expected += 1;
        }

        producer.join().unwrap();
        assert_eq!(expected, 50_000);
    });
}

#[test]
fn per_producer_order_is_preserved() {
    const PRODUCERS: u32 = 4;
    const PER_PRODUCER: u32 = 5_000;

    with_watchdog(Duration::from_secs(10), || {
        let ch = Arc::new(BoundedChannel::<(u32, u32)>::new(16).unwrap());

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let ch = Arc::clone(&ch);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        ch.push((p, i)).unwrap();
                    }
                })
            })
            .collect();

        let mut next = [0u32; PRODUCERS as usize];
        for _ in 0..PRODUCERS * PER_PRODUCER {
            let (p, i) = ch.pop().unwrap();
            assert_eq!(i, next[p as usize], "producer {p} reordered");
            next[p as usize] += 1;
        }

        for h in producers {
            h.join().unwrap();
        }
        assert!(next.iter().all(|&n| n == PER_PRODUCER));
    });
}

// =============================================================================
// Blocking correctness
// =============================================================================

#[test]
fn ninth_push_blocks_until_one_pop() {
    let ch = Arc::new(BoundedChannel::<u32>::new(8).unwrap());
    for i in 0..8 {
        ch.push(i).unwrap();
    }

    let returned = Arc::new(AtomicBool::new(false));

    let blocked = {
        let ch = Arc::clone(&ch);
        let returned = Arc::clone(&returned);
        thread::spawn(move || {
            ch.push(8).unwrap();
            returned.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!returned.load(Ordering::SeqCst), "9th push did not block");

    assert_eq!(ch.pop().unwrap(), 0);

    blocked.join().unwrap();
    assert!(returned.load(Ordering::SeqCst));
    assert_eq!(ch.len(), 8);
}

#[test]
fn pop_on_empty_blocks_until_push() {
    let ch = Arc::new(BoundedChannel::<u32>::new(8).unwrap());
    let returned = Arc::new(AtomicBool::new(false));

    let blocked = {
        let ch = Arc::clone(&ch);
        let returned = Arc::clone(&returned);
        thread::spawn(move || {
            let val = ch.pop().unwrap();
            returned.store(true, Ordering::SeqCst);
            val
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!returned.load(Ordering::SeqCst), "pop returned on an empty channel");

    ch.push(5).unwrap();

    assert_eq!(blocked.join().unwrap(), 5);
}

// =============================================================================
// Capacity bound
// =============================================================================

#[test]
fn len_never_exceeds_capacity_under_load() {
    with_watchdog(Duration::from_secs(10), || {
        let ch = Arc::new(BoundedChannel::<u64>::new(8).unwrap());
        let stop = Arc::new(AtomicBool::new(false));

        let sampler = {
            let ch = Arc::clone(&ch);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut max_seen = 0;
                while !stop.load(Ordering::Relaxed) {
                    max_seen = max_seen.max(ch.len());
                }
                max_seen
            })
        };

        let producers: Vec<_> = (0..4)
            .map(|_| {
                let ch = Arc::clone(&ch);
                thread::spawn(move || {
                    for i in 0..5_000 {
                        ch.push(i).unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..20_000 {
            ch.pop().unwrap();
        }

        for h in producers {
            h.join().unwrap();
        }
        stop.store(true, Ordering::Relaxed);

        let max_seen = sampler.join().unwrap();
        assert!(max_seen <= ch.capacity(), "saw {max_seen} items");
    });
}

// =============================================================================
// Close under contention
// =============================================================================

#[test]
fn close_releases_blocked_producers_and_consumers() {
    with_watchdog(Duration::from_secs(10), || {
        let full = Arc::new(BoundedChannel::<u32>::new(8).unwrap());
        for i in 0..8 {
            full.push(i).unwrap();
        }
        let empty = Arc::new(BoundedChannel::<u32>::new(8).unwrap());

        let pushers: Vec<_> = (0..3)
            .map(|i| {
                let full = Arc::clone(&full);
                thread::spawn(move || full.push(100 + i))
            })
            .collect();
        let poppers: Vec<_> = (0..3)
            .map(|_| {
                let empty = Arc::clone(&empty);
                thread::spawn(move || empty.pop())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        full.close();
        empty.close();

        for h in pushers {
            let err = h.join().unwrap().unwrap_err();
            assert!(err.into_inner() >= 100);
        }
        for h in poppers {
            assert_eq!(h.join().unwrap(), Err(PopError));
        }

        // The buffered items survive close and are still delivered in order
        for i in 0..8 {
            assert_eq!(full.pop().unwrap(), i);
        }
        assert_eq!(full.pop(), Err(PopError));
    });
}

#[test]
fn scoped_threads_share_by_reference() {
    let ch = BoundedChannel::<u64>::new(8).unwrap();

    let total = crossbeam_utils::thread::scope(|s| {
        for p in 0..2u64 {
            let ch = &ch;
            s.spawn(move |_| {
                for i in 0..500 {
                    ch.push(p * 500 + i).unwrap();
                }
            });
        }

        let consumer = s.spawn(|_| (0..1000).map(|_| ch.pop().unwrap()).sum::<u64>());
        consumer.join().unwrap()
    })
    .unwrap();

    assert_eq!(total, 999 * 1000 / 2);
    assert!(ch.is_empty());
}
