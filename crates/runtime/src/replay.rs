use std::io::{self, Write};

use crate::engine::{SimError, Simulation};

pub const REPLAY_CSV_HEADER: &str = "t,kind,key,value\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayRowKind {
    Price,
    Equity,
}

impl ReplayRowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Equity => "equity",
        }
    }
}

/// One journal line: an instrument price (`key` is the symbol) or an agent's
/// portfolio value (`key` is the agent index).
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRow {
    pub tick: u64,
    pub kind: ReplayRowKind,
    pub key: String,
    pub value: f64,
}

impl ReplayRow {
    /// Price rows for every listing followed by one equity row per agent.
    pub fn from_simulation(simulation: &Simulation) -> Result<Vec<Self>, SimError> {
        let tick = simulation.time();
        let prices = simulation.catalog().iter().map(|instrument| Self {
            tick,
            kind: ReplayRowKind::Price,
            key: instrument.symbol().to_owned(),
            value: instrument.price(),
        });
        let equity = simulation
            .portfolio_values()?
            .into_iter()
            .enumerate()
            .map(|(agent, value)| Self {
                tick,
                kind: ReplayRowKind::Equity,
                key: agent.to_string(),
                value,
            });

        Ok(prices.chain(equity).collect())
    }
}

pub struct ReplayCsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReplayCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(REPLAY_CSV_HEADER.as_bytes())
    }

    pub fn append_rows(&mut self, rows: &[ReplayRow]) -> io::Result<()> {
        for row in rows {
            let key = escape_csv_field(&row.key);
            writeln!(
                self.writer,
                "{},{},{key},{}",
                row.tick,
                row.kind.as_str(),
                row.value
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

fn escape_csv_field(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|ch| matches!(ch, ',' | '"' | '\n' | '\r'));
    if !needs_quotes {
        return value.to_string();
    }

    let escaped = value.replace('"', "\"\"");
    format!("\"{escaped}\"")
}
