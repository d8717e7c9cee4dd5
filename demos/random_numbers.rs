// Writes 100 pseudo-random numbers to a log and iterates the database,
// printing them out.

use anyhow::bail;
use ashlog::{Log, OpenStatus, Options};
use std::time::{SystemTime, UNIX_EPOCH};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let options = Options { error_if_exists: true, ..Options::default() };

    let log: Log<u32> = Log::new("./random_numbers_db", options);
    match log.open()? {
        OpenStatus::Ok => {}
        status => bail!("could not open database: {status}"),
    }

    // xorshift seeded from the clock; good enough for demo data
    let mut seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)?
        .subsec_nanos()
        .max(1);
    let mut next = || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed % 1_000_000
    };

    for _ in 0..100 {
        log.write(&next())?;
    }

    for (i, value) in log.iter().enumerate() {
        println!("{i} : {}", value?);
    }

    log.close();
    Ok(())
}
