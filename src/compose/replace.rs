//! Master replacement.
use arcstr::ArcStr;
use derive_builder::Builder;
use indexmap::IndexMap;
use log::debug;

use super::ComposeCtx;
use crate::error::{config_err, Result};
use crate::netlist::MasterId;

/// Options for [`ComposeCtx::replace_master`].
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ReplaceMaster {
    /// The new master.
    master: MasterId,
    /// Keep the nets of terminals whose names the old and new masters share.
    ///
    /// Terminals that are not kept are bound to nets of their own name.
    #[builder(default = "true")]
    keep_connections: bool,
    /// The new master is a finished, externally supplied circuit and needs no design pass.
    #[builder(default)]
    is_static: bool,
    /// `(terminal, net)` overrides applied after replacement.
    #[builder(default)]
    conns: Vec<(ArcStr, ArcStr)>,
}

impl ReplaceMaster {
    #[inline]
    pub fn builder() -> ReplaceMasterBuilder {
        ReplaceMasterBuilder::default()
    }
}

impl ReplaceMasterBuilder {
    /// Builds the options, reporting a missing master as a configuration error.
    pub fn finish(&self) -> Result<ReplaceMaster> {
        self.build().map_err(|e| config_err!("invalid master replacement: {e}"))
    }
}

impl ComposeCtx<'_> {
    /// Swaps the master of instance `name`.
    pub fn replace_master(&mut self, name: &str, opts: ReplaceMaster) -> Result<()> {
        let ReplaceMaster {
            master,
            keep_connections,
            is_static,
            conns,
        } = opts;

        self.graph.instance(name)?;
        let pins = self.lib.store().master_pins(&master)?;

        let inst = self.graph.instance_mut(name)?;
        debug!(
            "{name}: replacing master {} with {master} (keep connections: {keep_connections})",
            inst.master()
        );
        let old = inst.terminals();
        let terminals: IndexMap<ArcStr, ArcStr> = pins
            .into_iter()
            .map(|pin| {
                let net = old
                    .get(&pin.name)
                    .filter(|_| keep_connections)
                    .cloned()
                    .unwrap_or_else(|| pin.name.clone());
                (pin.name, net)
            })
            .collect();
        inst.set_master(master, terminals);
        if is_static {
            inst.mark_static();
        }

        self.reconnect_all(name, &conns)
    }
}
