//! No-connect bus packing.
//!
//! Reconnecting a terminal to the [`NOCONN`] sentinel binds it to a fresh
//! `noconn<k>` net, with `k` counting up from zero in the order the
//! reconnections are applied. Once all reconnections are done, the cell's
//! single placeholder sink instance is resolved against the final count: it
//! is removed, bound to the scalar net `noconn<0>`, or arrayed as
//! `<sink><k-1:0>` driving `noconn<k-1:0>`.
//!
//! The counter belongs to one [`ComposeCtx`], so sibling compositions never
//! share indices.
use arcstr::ArcStr;
use log::debug;

use super::ComposeCtx;
use crate::error::{config_err, ComposeError, Result};
use crate::netlist::bus::{bus_bit, bus_range, range_suffix};

/// Reconnection target marking a terminal as unused.
pub const NOCONN: &str = "noconn";

#[derive(Debug, Default)]
pub(crate) struct NoConnBus {
    count: usize,
    resolved: bool,
}

impl NoConnBus {
    pub(crate) fn next_net(&mut self) -> Result<ArcStr> {
        if self.resolved {
            return Err(config_err!(
                "no-connect terminal requested after the sink was packed"
            ));
        }
        let net = bus_bit(NOCONN, self.count);
        self.count += 1;
        Ok(net)
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// True once every synthesized net has a sink, or none were synthesized.
    pub(crate) fn is_settled(&self) -> bool {
        self.resolved || self.count == 0
    }
}

/// How the sink instance was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoConnResolution {
    /// No terminal was left unconnected; the sink was deleted.
    Removed,
    /// Exactly one; the sink drives `noconn<0>` directly.
    Scalar,
    /// Several; the sink was renamed to the arrayed `name`.
    Bus { name: ArcStr, width: usize },
}

impl ComposeCtx<'_> {
    /// Number of `noconn<k>` nets synthesized so far in this pass.
    pub fn noconn_count(&self) -> usize {
        self.noconn.count()
    }

    /// Packs every no-connect net of this pass into instance `sink`, whose
    /// terminal `term` is a bus.
    ///
    /// May be called once per pass.
    pub fn resolve_noconn(&mut self, sink: &str, term: &str) -> Result<NoConnResolution> {
        if self.noconn.resolved {
            return Err(config_err!(
                "{}: no-connect sink already packed",
                self.cell()
            ));
        }
        if self.graph.instance(sink)?.terminal(term).is_none() {
            return Err(ComposeError::TerminalNotFound {
                inst: sink.into(),
                term: term.into(),
            });
        }
        self.noconn.resolved = true;

        let resolution = match self.noconn.count {
            0 => {
                self.graph.remove_instance(sink)?;
                NoConnResolution::Removed
            }
            1 => {
                self.graph.reconnect(sink, term, bus_bit(NOCONN, 0))?;
                NoConnResolution::Scalar
            }
            k => {
                let suffix = range_suffix(k - 1, 0);
                let name = arcstr::format!("{sink}{suffix}");
                self.graph.rename_instance(sink, name.clone())?;
                self.graph.reconnect(&name, term, bus_range(NOCONN, k - 1, 0))?;
                NoConnResolution::Bus { name, width: k }
            }
        };
        debug!(
            "{}: packed {} no-connect nets into {sink}: {resolution:?}",
            self.cell(),
            self.noconn.count
        );
        Ok(resolution)
    }
}
