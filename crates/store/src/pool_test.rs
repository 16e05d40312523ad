//! Tests for the lock-free object pools

use std::sync::Arc;
use std::thread;

use bytes::BytesMut;

use crate::metric::Metric;
use crate::pool::{Pool, Pools};

#[test]
fn test_new_pool_is_full() {
    let pool: Pool<BytesMut> = Pool::new(4, 1024);

    assert_eq!(pool.capacity(), 4);
    assert_eq!(pool.available(), 4);
}

#[test]
fn test_get_returns_empty_instance_with_capacity() {
    let pool: Pool<String> = Pool::new(2, 128);

    let s = pool.get();
    assert!(s.is_empty());
    assert!(s.capacity() >= 128);
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_get_from_empty_pool_allocates() {
    let pool: Pool<Vec<Metric>> = Pool::new(1, 16);

    let _a = pool.get();
    assert_eq!(pool.available(), 0);

    // Miss still yields a usable instance
    let b = pool.get();
    assert!(b.is_empty());
    assert!(b.capacity() >= 16);

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits, 1);
    assert_eq!(snapshot.misses, 1);
}

#[test]
fn test_put_resets_contents() {
    let pool: Pool<BytesMut> = Pool::new(1, 1024);

    let mut buf = pool.get();
    buf.extend_from_slice(b"cpu_time");
    pool.put(buf);

    let buf = pool.get();
    assert!(buf.is_empty());
}

#[test]
fn test_put_drops_when_full() {
    let pool: Pool<String> = Pool::new(1, 64);

    // Pool is already full; an extra instance gets dropped on return
    pool.put(String::with_capacity(64));

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.drops, 1);
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_put_drops_shrunken_storage() {
    let pool: Pool<BytesMut> = Pool::new(2, 1024);

    let buf = pool.get();
    assert_eq!(pool.available(), 1);

    // Simulate the filled region being split off into a request body
    let mut buf = buf;
    buf.extend_from_slice(&[0u8; 1024]);
    let _body = buf.split().freeze();
    pool.put(buf);

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.drops, 1);
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_get_put_symmetry_across_threads() {
    let pool: Arc<Pool<Vec<turso::Value>>> = Arc::new(Pool::new(4, 32));
    let mut handles = Vec::new();

    for _ in 0..8 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let mut params = pool.get();
                params.push(turso::Value::Integer(1));
                pool.put(params);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.gets(), 800);
    assert_eq!(snapshot.puts(), 800);
}

#[test]
fn test_pools_construct_with_defaults() {
    let pools = Pools::new();

    assert!(pools.bytes.available() > 0);
    assert!(pools.metrics.available() > 0);
    assert!(pools.statements.available() > 0);
    assert!(pools.params.available() > 0);
}
