//! Benchmark utilities.

use ormkit_core::{Db, OrmResult};
use ormkit_memory::MemoryAdapter;
use ormkit_testkit::User;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate a random alphanumeric name of `len` characters.
pub fn random_name(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate `count` users with sequential ids and random names and ages.
pub fn generate_users(count: usize) -> Vec<User> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| User::new(i as i64, random_name(12), rng.gen_range(18..90)))
        .collect()
}

/// Open a memory-backed `Db` holding `count` random users.
pub fn populated_db(count: usize) -> OrmResult<(MemoryAdapter, Db)> {
    let adapter = MemoryAdapter::new();
    let db = Db::new(adapter.clone());
    for user in generate_users(count) {
        db.create(&user)?;
    }
    Ok((adapter, db))
}
