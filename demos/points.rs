// Shows how to store a custom type. The only requirement is that the
// fields are written and read in the same order.

use anyhow::bail;
use ashlog::{Log, OpenStatus, Options, Record};
use std::fmt;
use std::io::{self, Read, Write};

struct Point {
    x: u32,
    y: u32,
    z: u32,
}

impl Record for Point {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        self.x.encode(sink)?;
        self.y.encode(sink)?;
        self.z.encode(sink)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        Ok(Point {
            x: u32::decode(source)?,
            y: u32::decode(source)?,
            z: u32::decode(source)?,
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}, z={}", self.x, self.y, self.z)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let options = Options {
        prefix: "points".to_string(),
        extension: "bin".to_string(),
        filesize_max: 1024 * 1024 * 5,
        ..Options::default()
    };

    let log: Log<Point> = Log::new("./points_db", options);
    match log.open()? {
        OpenStatus::Ok => {}
        status => bail!("could not open database: {status}"),
    }

    for i in 0..10_000u32 {
        log.write(&Point { x: i, y: 10_000 - i, z: i + i })?;
    }

    // read a fixed spread of points back and print them
    for i in (0..10_000u64).step_by(250) {
        println!("{}", log.read(i)?);
    }

    log.close();
    Ok(())
}
