#![allow(dead_code)]

use ashlog::Record;
use std::io::{self, Read, Write};
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

/// The first 1000+ digits of pi, used as a fixed ~1KB payload.
pub const PI_STR: &str = "3.1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679821480865132823066470938446095505822317253594081284811174502841027019385211055596446229489549303819644288109756659334461284756482337867831652712019091456485669234603486104543266482133936072602491412737245870066063155881748815209209628292540917153643678925903600113305305488204665213841469519415116094330572703657595919530921861173819326117931051185480744623799627495673518857527248912279381830119491298336733624406566430860213949463952247371907021798609437027705392171762931767523846748184676694051320005681271452635608277857713427577896091736371787214684409012249534301465495853710507922796892589235420199561121290219608640344181598136297747713099605187072113499999983729780499510597317328160963185950244594553469083026425223082533446850352619311881710100031378387528865875332083814206171776691473035982534904287554687311595628638823537875937519577818577805321712268066130019278766111959092164201989";

/// Euler's number to 100 decimal places, a fixed ~100 byte payload.
pub const E_100_CHARS: &str = "2.7182818284590452353602874713526624977572470936999595749669676277240766303535475945713821785251664274";

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl Record for Name {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        self.first.encode(sink)?;
        self.middle.encode(sink)?;
        self.last.encode(sink)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        Ok(Name {
            first: String::decode(source)?,
            middle: String::decode(source)?,
            last: String::decode(source)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: Name,
    pub age: u8,
    pub salary: f64,
    pub married: bool,
}

impl Record for Person {
    fn encode<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        self.name.encode(sink)?;
        self.age.encode(sink)?;
        self.salary.encode(sink)?;
        self.married.encode(sink)
    }

    fn decode<R: Read>(source: &mut R) -> io::Result<Self> {
        Ok(Person {
            name: Name::decode(source)?,
            age: u8::decode(source)?,
            salary: f64::decode(source)?,
            married: bool::decode(source)?,
        })
    }
}

/// Deterministic sample person for index `i`.
pub fn person(i: u64) -> Person {
    Person {
        name: Name {
            first: format!("Firstname{i}"),
            middle: if i % 2 == 1 { format!("Middle{i}") } else { String::new() },
            last: format!("Lastname{i}"),
        },
        age: (i % 80) as u8,
        salary: (i % 5) as f64 * 12345.67,
        married: i % 2 == 0,
    }
}
