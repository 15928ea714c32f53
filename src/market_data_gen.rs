//! Synthetic command generator: deterministic buy/sell/cancel streams for
//! tests and benchmarks.
//!
//! [`Generator`] emits limit buys, limit sells, and cancels, occasionally
//! cancelling a previously-generated id. Same config and seed always
//! produce the same stream.

use crate::connection::{CommandSource, ConnectionHandler, ReadOutcome};
use crate::types::{Command, OrderId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for the synthetic command generator. Same config + seed
/// produces the same stream.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same command stream.
    pub seed: u64,
    /// Number of commands to generate.
    pub num_commands: usize,
    /// Instrument names commands are spread across.
    pub instruments: Vec<String>,
    /// Probability a new order is a buy (0.0..=1.0). Sell otherwise.
    pub buy_ratio: f64,
    /// Probability a command is a cancel of a previously-issued id, rather
    /// than a new order (0.0..=1.0). No-op (falls through to a new order)
    /// until at least one id has been issued.
    pub cancel_ratio: f64,
    /// Price range (inclusive).
    pub price_min: u64,
    pub price_max: u64,
    /// Count range (inclusive).
    pub count_min: u64,
    pub count_max: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_commands: 1000,
            instruments: vec!["GOOG".into(), "IBM".into(), "AAPL".into()],
            buy_ratio: 0.5,
            cancel_ratio: 0.1,
            price_min: 90,
            price_max: 110,
            count_min: 1,
            count_max: 20,
        }
    }
}

/// Deterministic command stream. Create with [`Generator::new`]; call
/// [`Generator::next_command`] or collect the whole run with [`Generator::all`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_id: u32,
    issued_ids: Vec<OrderId>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            next_id: 1,
            issued_ids: Vec::new(),
        }
    }

    /// Generates the next command, advancing internal state (RNG, id
    /// counter, and the set of ids a cancel may reference).
    pub fn next_command(&mut self) -> Command {
        if !self.issued_ids.is_empty() && self.rng.gen::<f64>() < self.config.cancel_ratio {
            let idx = self.rng.gen_range(0..self.issued_ids.len());
            let id = self.issued_ids[idx];
            return Command::Cancel { id };
        }

        let id = OrderId(self.next_id);
        self.next_id += 1;
        self.issued_ids.push(id);

        let instrument = self.config.instruments[self.rng.gen_range(0..self.config.instruments.len())].clone();
        let price = self.rng.gen_range(self.config.price_min..=self.config.price_max);
        let count = self.rng.gen_range(self.config.count_min..=self.config.count_max);

        if self.rng.gen::<f64>() < self.config.buy_ratio {
            Command::Buy { id, instrument, price, count }
        } else {
            Command::Sell { id, instrument, price, count }
        }
    }

    /// Returns exactly `n` commands, advancing the generator.
    pub fn take(&mut self, n: usize) -> Vec<Command> {
        (0..n).map(|_| self.next_command()).collect()
    }

    /// Returns the full stream defined by `config.num_commands`.
    pub fn all(&mut self) -> Vec<Command> {
        let n = self.config.num_commands;
        self.take(n)
    }
}

/// A [`CommandSource`] backed by a [`Generator`], terminating with
/// `EndOfFile` once `config.num_commands` have been issued. Lets a
/// synthetic stream be driven straight through [`ConnectionHandler::run`]
/// or [`crate::engine::Engine::accept`], exactly like a real connection.
pub struct GeneratorSource {
    generator: Generator,
    remaining: usize,
}

impl GeneratorSource {
    pub fn new(config: GeneratorConfig) -> Self {
        let remaining = config.num_commands;
        Self {
            generator: Generator::new(config),
            remaining,
        }
    }
}

impl CommandSource for GeneratorSource {
    fn read_next(&mut self) -> ReadOutcome {
        if self.remaining == 0 {
            return ReadOutcome::EndOfFile;
        }
        self.remaining -= 1;
        ReadOutcome::Success(self.generator.next_command())
    }
}

/// Replays a synthetic command stream through `handler`, as a load test or
/// demo fixture would.
pub fn replay(handler: &mut ConnectionHandler<'_>, config: GeneratorConfig) {
    handler.run(GeneratorSource::new(config));
}
