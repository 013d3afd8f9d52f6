use std::io::{self, Write};

use super::{driver::Cycle, stats::SimStats};
use crate::core::SimEvent;

pub trait Reporter {
    fn cycle(&mut self, cycle: &Cycle) -> io::Result<()>;

    fn finish(&mut self, _stats: &SimStats) -> io::Result<()> {
        Ok(())
    }
}

/// Text log in the simulator's console format: one line per dispatch, then
/// the contents of every policy queue.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn cycle(&mut self, cycle: &Cycle) -> io::Result<()> {
        for event in &cycle.events {
            if let SimEvent::Dispatched {
                policy,
                process,
                started_at,
            } = event
            {
                writeln!(
                    self.out,
                    "Tempo: {}, Executando processo {} - ID: {}, Tamanho: {}",
                    started_at, policy, process.id, process.size
                )?;
            }
        }

        writeln!(self.out, "Estado das filas:")?;
        for (policy, procs) in &cycle.queues {
            writeln!(self.out, "{policy}:")?;
            for process in procs {
                writeln!(self.out, "ID: {}, Tamanho: {}", process.id, process.size)?;
            }
        }
        self.out.flush()
    }

    fn finish(&mut self, stats: &SimStats) -> io::Result<()> {
        writeln!(
            self.out,
            "Fim da simulação: tempo {}, ciclos {}",
            stats.final_clock, stats.cycles
        )?;
        for lane in &stats.lanes {
            let response = lane
                .mean_response()
                .map_or_else(|| "-".to_string(), |mean| format!("{mean:.2}"));
            writeln!(
                self.out,
                "{}: executados {}, tempo ocupado {}, resposta média {}, fila máxima {}",
                lane.policy, lane.dispatches, lane.busy, response, lane.peak_queue_len
            )?;
        }
        self.out.flush()
    }
}
