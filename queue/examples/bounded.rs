// examples/bounded.rs
use dialog_queue::{BoundedBlockingQueue, CancelToken, Cancelled};
use std::{thread, time::Duration};

fn main() {
  println!("--- Bounded queue: sync producer, sync consumer ---");
  {
    let queue = BoundedBlockingQueue::<String>::new(2).unwrap();
    let cancel = CancelToken::new();

    let producer = {
      let (queue, cancel) = (queue.clone(), cancel.clone());
      thread::spawn(move || {
        for i in 1..=5 {
          let msg = format!("Message #{}", i);
          println!("[Producer] Offering: {} (size before: {})", msg, queue.size());
          if queue.offer(msg, &cancel).is_err() {
            println!("[Producer] Cancelled.");
            break;
          }
        }
      })
    };

    for _ in 0..5 {
      thread::sleep(Duration::from_millis(20));
      match queue.poll(&cancel) {
        Ok(msg) => println!("[Consumer] Received: {}", msg),
        Err(Cancelled) => break,
      }
    }
    producer.join().unwrap();
  }

  println!("\n--- Bounded queue: cancelling a blocked consumer ---");
  {
    let queue = BoundedBlockingQueue::<u32>::new(1).unwrap();
    let cancel = CancelToken::new();
    let consumer = {
      let (queue, cancel) = (queue.clone(), cancel.clone());
      thread::spawn(move || queue.poll(&cancel))
    };
    thread::sleep(Duration::from_millis(50));
    cancel.cancel();
    println!("[Consumer] Result after cancel: {:?}", consumer.join().unwrap());
    println!("[Main] Queue size is still {}", queue.size());
  }

  println!("\n--- Bounded queue: async producer, async consumer ---");
  let rt = tokio::runtime::Runtime::new().unwrap();
  rt.block_on(async {
    let queue = BoundedBlockingQueue::<u32>::new(1).unwrap();
    let producer_queue = queue.clone();
    let producer = tokio::spawn(async move {
      for i in 0..3 {
        producer_queue.offer_async(i).await;
        println!("[Async Producer] Sent: {}", i);
      }
    });
    for _ in 0..3 {
      println!("[Async Consumer] Received: {}", queue.poll_async().await);
    }
    producer.await.unwrap();
  });
}
