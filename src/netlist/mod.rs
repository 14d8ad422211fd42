//! The mutable instance/pin/net graph that composition operates on.
//!
//! Nets are implicit: any string bound to a terminal or named by a pin is a net.
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, Result};
use crate::params::Params;

pub mod bus;
mod edit;

/// Identity of a cell: the library it lives in and its name within that library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MasterId {
    pub lib: ArcStr,
    pub cell: ArcStr,
}

impl MasterId {
    pub fn new(lib: impl Into<ArcStr>, cell: impl Into<ArcStr>) -> Self {
        Self {
            lib: lib.into(),
            cell: cell.into(),
        }
    }
}

impl Display for MasterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}__{}", self.lib, self.cell)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
    InOut,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PinDescriptor {
    pub name: ArcStr,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
}

impl PinDescriptor {
    pub fn new(name: impl Into<ArcStr>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            width: None,
        }
    }

    pub fn bus(name: impl Into<ArcStr>, direction: Direction, width: usize) -> Self {
        Self {
            name: name.into(),
            direction,
            width: Some(width),
        }
    }
}

/// A placed occurrence of a master within a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRef {
    name: ArcStr,
    master: MasterId,
    terminals: IndexMap<ArcStr, ArcStr>,
    #[serde(default)]
    designed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cell: Option<Arc<NetlistGraph>>,
}

impl InstanceRef {
    pub fn new<K, V>(
        name: impl Into<ArcStr>,
        master: MasterId,
        terminals: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<ArcStr>,
        V: Into<ArcStr>,
    {
        Self {
            name: name.into(),
            master,
            terminals: terminals
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            designed: false,
            params: None,
            cell: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn master(&self) -> &MasterId {
        &self.master
    }

    #[inline]
    pub fn terminals(&self) -> &IndexMap<ArcStr, ArcStr> {
        &self.terminals
    }

    pub fn terminal(&self, term: &str) -> Option<&ArcStr> {
        self.terminals.get(term)
    }

    #[inline]
    pub fn designed(&self) -> bool {
        self.designed
    }

    /// Parameters this instance was designed with, if any.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// The designed contents of this instance's master, if it has any.
    pub fn cell(&self) -> Option<&NetlistGraph> {
        self.cell.as_deref()
    }

    /// Array width implied by a `<hi:lo>` suffix on the instance name.
    pub fn width(&self) -> usize {
        bus::split_bus(&self.name).1
    }

    /// Rebinds `term` to `net`.
    pub fn connect(&mut self, term: &str, net: impl Into<ArcStr>) -> Result<()> {
        let slot = self
            .terminals
            .get_mut(term)
            .ok_or_else(|| ComposeError::TerminalNotFound {
                inst: self.name.clone(),
                term: term.into(),
            })?;
        *slot = net.into();
        Ok(())
    }

    pub(crate) fn set_name(&mut self, name: ArcStr) {
        self.name = name;
    }

    pub(crate) fn set_master(&mut self, master: MasterId, terminals: IndexMap<ArcStr, ArcStr>) {
        self.master = master;
        self.terminals = terminals;
        self.params = None;
        self.cell = None;
        self.designed = false;
    }

    pub(crate) fn mark_static(&mut self) {
        self.designed = true;
    }

    /// Records the result of designing this instance and conforms its
    /// terminals to the designed cell's pins.
    pub(crate) fn attach(&mut self, params: Params, cell: Option<NetlistGraph>) {
        if let Some(cell) = &cell {
            self.terminals = sync_terminals(&self.name, &self.terminals, cell.pins());
        }
        self.params = Some(params);
        self.cell = cell.map(Arc::new);
        self.designed = true;
    }
}

/// Conforms a terminal map to a pin list.
///
/// Shared names keep their nets, terminals without a pin are dropped, and new
/// pins are bound to a net of the same name.
pub(crate) fn sync_terminals(
    inst: &str,
    terminals: &IndexMap<ArcStr, ArcStr>,
    pins: &[PinDescriptor],
) -> IndexMap<ArcStr, ArcStr> {
    for term in terminals.keys() {
        if !pins.iter().any(|p| &p.name == term) {
            log::trace!("{inst}: dropping terminal {term}");
        }
    }
    pins.iter()
        .map(|pin| {
            let net = match terminals.get(&pin.name) {
                Some(net) => net.clone(),
                None => {
                    log::trace!("{inst}: new terminal {} bound to same-named net", pin.name);
                    pin.name.clone()
                }
            };
            (pin.name.clone(), net)
        })
        .collect()
}

/// The working graph of one cell: its boundary pins and its instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetlistGraph {
    cell: MasterId,
    pins: Vec<PinDescriptor>,
    instances: IndexMap<ArcStr, InstanceRef>,
}

impl NetlistGraph {
    pub fn new(cell: MasterId) -> Self {
        Self {
            cell,
            pins: Vec::new(),
            instances: IndexMap::new(),
        }
    }

    #[inline]
    pub fn cell(&self) -> &MasterId {
        &self.cell
    }

    #[inline]
    pub fn pins(&self) -> &[PinDescriptor] {
        &self.pins
    }

    pub fn pin(&self, name: &str) -> Option<&PinDescriptor> {
        self.pins.iter().find(|p| p.name == name)
    }

    pub fn has_pin(&self, name: &str) -> bool {
        self.pin(name).is_some()
    }

    #[inline]
    pub fn instances(&self) -> &IndexMap<ArcStr, InstanceRef> {
        &self.instances
    }

    pub fn instance(&self, name: &str) -> Result<&InstanceRef> {
        self.instances
            .get(name)
            .ok_or_else(|| ComposeError::InstanceNotFound(name.into()))
    }

    pub fn instance_mut(&mut self, name: &str) -> Result<&mut InstanceRef> {
        self.instances
            .get_mut(name)
            .ok_or_else(|| ComposeError::InstanceNotFound(name.into()))
    }

    /// Adds an instance, keyed by its name.
    pub fn add_instance(&mut self, inst: InstanceRef) -> Result<()> {
        if self.instances.contains_key(&inst.name) {
            return Err(ComposeError::DuplicateInstance(inst.name));
        }
        self.instances.insert(inst.name.clone(), inst);
        Ok(())
    }

    /// Whether any live terminal is bound to `net`.
    pub fn is_net_used(&self, net: &str) -> bool {
        self.instances
            .values()
            .any(|inst| inst.terminals.values().any(|n| n == net))
    }

    /// Marks every undesigned instance whose master is static as designed.
    pub(crate) fn mark_static_instances(&mut self, is_static: impl Fn(&MasterId) -> bool) {
        for inst in self.instances.values_mut() {
            if !inst.designed && is_static(&inst.master) {
                inst.mark_static();
            }
        }
    }

    /// All `(instance, terminal)` pairs bound to `net`.
    pub fn connections_to<'a>(
        &'a self,
        net: &'a str,
    ) -> impl Iterator<Item = (&'a ArcStr, &'a ArcStr)> + 'a {
        self.instances.values().flat_map(move |inst| {
            inst.terminals
                .iter()
                .filter(move |(_, n)| *n == net)
                .map(move |(t, _)| (&inst.name, t))
        })
    }

    /// Every net name in the graph: pins plus everything terminals are bound to.
    pub fn nets(&self) -> BTreeSet<ArcStr> {
        self.pins
            .iter()
            .map(|p| p.name.clone())
            .chain(
                self.instances
                    .values()
                    .flat_map(|inst| inst.terminals.values().cloned()),
            )
            .collect()
    }

    /// `(instance, terminal)` pairs that are bound to no net.
    pub fn unconnected_terminals(&self) -> Vec<(ArcStr, ArcStr)> {
        self.instances
            .values()
            .flat_map(|inst| {
                inst.terminals
                    .iter()
                    .filter(|(_, net)| net.is_empty())
                    .map(|(t, _)| (inst.name.clone(), t.clone()))
            })
            .collect()
    }
}
