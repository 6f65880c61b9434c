mod common;
use common::*;

use dialog_queue::{BoundedBlockingQueue, CancelToken, TryOfferError, TryPollError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[test]
fn sync_offer_poll_fifo() {
  let queue = BoundedBlockingQueue::new(4).unwrap();
  let cancel = CancelToken::new();
  for word in ["a", "b", "c", "d"] {
    queue.offer(word, &cancel).unwrap();
  }
  let drained: Vec<_> = (0..4).map(|_| queue.poll(&cancel).unwrap()).collect();
  assert_eq!(drained, vec!["a", "b", "c", "d"]);
}

#[test]
fn sync_capacity_is_enforced() {
  assert!(BoundedBlockingQueue::<u8>::new(0).is_err());
  let queue = BoundedBlockingQueue::new(1).unwrap();
  assert_eq!(queue.capacity(), 1);
  queue.try_offer(1).unwrap();
  assert_eq!(queue.try_offer(2), Err(TryOfferError::Full(2)));
  assert_eq!(queue.size(), 1);
}

#[test]
fn sync_offer_blocks_until_poll() {
  let queue = BoundedBlockingQueue::new(1).unwrap();
  let cancel = CancelToken::new();
  queue.offer(1, &cancel).unwrap();

  let producer_queue = queue.clone();
  let producer_cancel = cancel.clone();
  let offer_handle = thread::spawn(move || {
    producer_queue.offer(2, &producer_cancel).unwrap(); // This should block
  });

  thread::sleep(SETTLE);
  assert!(!offer_handle.is_finished(), "Offer should have blocked");
  assert_eq!(queue.size(), 1);

  assert_eq!(queue.poll(&cancel), Ok(1));
  offer_handle.join().expect("Offer thread panicked");
  assert_eq!(queue.poll(&cancel), Ok(2));
}

#[test]
fn sync_poll_blocks_until_offer() {
  let queue = BoundedBlockingQueue::new(3).unwrap();
  let cancel = CancelToken::new();

  let consumer_queue = queue.clone();
  let consumer_cancel = cancel.clone();
  let poll_handle = thread::spawn(move || consumer_queue.poll(&consumer_cancel));

  thread::sleep(SETTLE);
  assert!(!poll_handle.is_finished(), "Poll should have blocked");

  queue.offer("hello", &cancel).unwrap();
  assert_eq!(poll_handle.join().unwrap(), Ok("hello"));
  assert!(queue.is_empty());
}

#[test]
fn sync_peek_blocks_and_does_not_remove() {
  let queue = BoundedBlockingQueue::new(2).unwrap();
  let cancel = CancelToken::new();

  let peek_queue = queue.clone();
  let peek_cancel = cancel.clone();
  let peek_handle = thread::spawn(move || peek_queue.peek(&peek_cancel));

  thread::sleep(SETTLE);
  assert!(!peek_handle.is_finished(), "Peek should have blocked");

  queue.offer(String::from("head"), &cancel).unwrap();
  assert_eq!(peek_handle.join().unwrap().as_deref(), Ok("head"));
  assert_eq!(queue.size(), 1);
  assert_eq!(queue.try_peek().as_deref(), Ok("head"));
  assert_eq!(queue.try_poll().as_deref(), Ok("head"));
  assert_eq!(queue.try_poll(), Err(TryPollError::Empty));
}

#[test]
fn sync_capacity_one_alternation_never_deadlocks() {
  let queue = BoundedBlockingQueue::new(1).unwrap();
  let cancel = CancelToken::new();

  queue.offer('A', &cancel).unwrap();
  assert_eq!(queue.poll(&cancel), Ok('A'));
  queue.offer('B', &cancel).unwrap();
  assert_eq!(queue.poll(&cancel), Ok('B'));

  // Same alternation across two threads.
  let producer_queue = queue.clone();
  let producer_cancel = cancel.clone();
  let start = Instant::now();
  let producer = thread::spawn(move || {
    for i in 0..ITEMS_MEDIUM {
      producer_queue.offer(i, &producer_cancel).unwrap();
    }
  });
  for expected in 0..ITEMS_MEDIUM {
    assert_eq!(queue.poll(&cancel), Ok(expected));
  }
  producer.join().unwrap();
  assert!(start.elapsed() < LONG_TIMEOUT);
}

#[test]
fn sync_every_blocked_producer_is_released() {
  const PRODUCERS: usize = 4;
  let queue = BoundedBlockingQueue::new(1).unwrap();
  let cancel = CancelToken::new();
  queue.offer(usize::MAX, &cancel).unwrap();

  let handles: Vec<_> = (0..PRODUCERS)
    .map(|i| {
      let queue = queue.clone();
      let cancel = cancel.clone();
      thread::spawn(move || queue.offer(i, &cancel).unwrap())
    })
    .collect();

  thread::sleep(SETTLE);
  let mut received = Vec::new();
  for _ in 0..=PRODUCERS {
    received.push(queue.poll(&cancel).unwrap());
  }
  for handle in handles {
    handle.join().expect("Producer thread panicked");
  }

  assert_eq!(received[0], usize::MAX);
  received.sort_unstable();
  assert_eq!(&received[..PRODUCERS], &[0, 1, 2, 3]);
  assert!(queue.is_empty());
}

#[test]
fn sync_every_blocked_consumer_is_released() {
  const CONSUMERS: usize = 4;
  let queue = BoundedBlockingQueue::new(CONSUMERS).unwrap();
  let cancel = CancelToken::new();

  let handles: Vec<_> = (0..CONSUMERS)
    .map(|_| {
      let queue = queue.clone();
      let cancel = cancel.clone();
      thread::spawn(move || queue.poll(&cancel).unwrap())
    })
    .collect();

  thread::sleep(SETTLE);
  for i in 0..CONSUMERS {
    queue.offer(i, &cancel).unwrap();
  }

  let mut received: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
  received.sort_unstable();
  assert_eq!(received, vec![0, 1, 2, 3]);
}

#[test]
fn sync_size_stays_within_bounds_under_contention() {
  const CAPACITY: usize = 3;
  const PRODUCERS: usize = 4;
  let queue = BoundedBlockingQueue::new(CAPACITY).unwrap();
  let cancel = CancelToken::new();
  let done = Arc::new(AtomicBool::new(false));
  let violations = Arc::new(AtomicUsize::new(0));

  let monitor = {
    let queue = queue.clone();
    let done = done.clone();
    let violations = violations.clone();
    thread::spawn(move || {
      while !done.load(Ordering::Acquire) {
        if queue.size() > CAPACITY {
          violations.fetch_add(1, Ordering::Relaxed);
        }
        thread::yield_now();
      }
    })
  };

  let producers: Vec<_> = (0..PRODUCERS)
    .map(|_| {
      let queue = queue.clone();
      let cancel = cancel.clone();
      thread::spawn(move || {
        for i in 0..ITEMS_MEDIUM {
          queue.offer(i, &cancel).unwrap();
        }
      })
    })
    .collect();

  let consumer = {
    let queue = queue.clone();
    let cancel = cancel.clone();
    thread::spawn(move || {
      for _ in 0..PRODUCERS * ITEMS_MEDIUM {
        queue.poll(&cancel).unwrap();
      }
    })
  };

  for handle in producers {
    handle.join().unwrap();
  }
  consumer.join().unwrap();
  done.store(true, Ordering::Release);
  monitor.join().unwrap();

  assert_eq!(violations.load(Ordering::Relaxed), 0);
  assert!(queue.is_empty());
}
