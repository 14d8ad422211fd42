//! Structural edits on a [`NetlistGraph`].
//!
//! Pin edits relabel the cell boundary only; they never touch terminal
//! connections. Callers that rename a pin are responsible for rebinding any
//! internal terminals that should follow it.
use arcstr::ArcStr;
use log::debug;

use super::{Direction, InstanceRef, NetlistGraph, PinDescriptor};
use crate::error::{ComposeError, Result};

impl NetlistGraph {
    /// Removes the pin named `name`.
    pub fn remove_pin(&mut self, name: &str) -> Result<PinDescriptor> {
        let idx = self
            .pins
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ComposeError::PinNotFound(name.into()))?;
        debug!("{}: removing pin {name}", self.cell);
        Ok(self.pins.remove(idx))
    }

    /// Renames pin `old` to `new`.
    ///
    /// `new` may not name an existing pin or a net any live terminal is bound to.
    pub fn rename_pin(&mut self, old: &str, new: impl Into<ArcStr>) -> Result<()> {
        let new = new.into();
        if !self.has_pin(old) {
            return Err(ComposeError::PinNotFound(old.into()));
        }
        if self.has_pin(&new) || self.is_net_used(&new) {
            return Err(ComposeError::PinRenameConflict {
                old: old.into(),
                new,
            });
        }
        debug!("{}: renaming pin {old} to {new}", self.cell);
        for pin in self.pins.iter_mut().filter(|p| p.name == old) {
            pin.name = new.clone();
        }
        Ok(())
    }

    /// Adds a scalar pin.
    pub fn add_pin(&mut self, name: impl Into<ArcStr>, direction: Direction) -> Result<()> {
        self.add_pin_desc(PinDescriptor::new(name, direction))
    }

    pub fn add_pin_desc(&mut self, pin: PinDescriptor) -> Result<()> {
        if self.has_pin(&pin.name) {
            return Err(ComposeError::DuplicatePin(pin.name));
        }
        debug!("{}: adding {:?} pin {}", self.cell, pin.direction, pin.name);
        self.pins.push(pin);
        Ok(())
    }

    /// Rebinds terminal `term` of instance `inst` to `net`.
    ///
    /// Reapplying the same triple leaves the graph unchanged.
    pub fn reconnect(&mut self, inst: &str, term: &str, net: impl Into<ArcStr>) -> Result<()> {
        let net = net.into();
        debug!("{}: {inst}.{term} -> {net}", self.cell);
        self.instance_mut(inst)?.connect(term, net)
    }

    /// Removes instance `name` from the graph.
    pub fn remove_instance(&mut self, name: &str) -> Result<InstanceRef> {
        debug!("{}: removing instance {name}", self.cell);
        self.instances
            .shift_remove(name)
            .ok_or_else(|| ComposeError::InstanceNotFound(name.into()))
    }

    /// Re-keys instance `old` as `new`, keeping its position in the graph.
    pub fn rename_instance(&mut self, old: &str, new: impl Into<ArcStr>) -> Result<()> {
        let new = new.into();
        let idx = self
            .instances
            .get_index_of(old)
            .ok_or_else(|| ComposeError::InstanceNotFound(old.into()))?;
        if new.as_str() != old && self.instances.contains_key(&new) {
            return Err(ComposeError::DuplicateInstance(new));
        }
        debug!("{}: renaming instance {old} to {new}", self.cell);
        let Some(mut inst) = self.instances.shift_remove(old) else {
            return Err(ComposeError::InstanceNotFound(old.into()));
        };
        inst.set_name(new.clone());
        self.instances.shift_insert(idx, new, inst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::netlist::{Direction, InstanceRef, MasterId, NetlistGraph, PinDescriptor};
    use crate::ComposeError;

    fn graph() -> NetlistGraph {
        let mut graph = NetlistGraph::new(MasterId::new("lib", "buf"));
        for (name, dir) in [
            ("in", Direction::Input),
            ("out", Direction::Output),
            ("VDD", Direction::InOut),
        ] {
            graph.add_pin(name, dir).unwrap();
        }
        for name in ["X0", "X1"] {
            graph
                .add_instance(InstanceRef::new(
                    name,
                    MasterId::new("basic", "inv"),
                    [("in", "in"), ("out", "mid"), ("VDD", "VDD")],
                ))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_remove_pin() {
        let mut graph = graph();
        let pin = graph.remove_pin("out").unwrap();
        assert_eq!(pin.direction, Direction::Output);
        assert!(!graph.has_pin("out"));
        assert!(matches!(
            graph.remove_pin("out"),
            Err(ComposeError::PinNotFound(_))
        ));
    }

    #[test]
    fn test_rename_pin() {
        let mut graph = graph();
        graph.rename_pin("out", "outb").unwrap();
        assert_eq!(graph.pins()[1].name, "outb");
        assert_eq!(graph.pins()[1].direction, Direction::Output);
        // terminals are untouched
        assert_eq!(graph.instance("X0").unwrap().terminal("in").unwrap(), "in");

        assert!(matches!(
            graph.rename_pin("outb", "VDD"),
            Err(ComposeError::PinRenameConflict { .. })
        ));
        assert!(matches!(
            graph.rename_pin("outb", "mid"),
            Err(ComposeError::PinRenameConflict { .. })
        ));
        assert!(matches!(
            graph.rename_pin("nope", "x"),
            Err(ComposeError::PinNotFound(_))
        ));
    }

    #[test]
    fn test_add_pin() {
        let mut graph = graph();
        graph
            .add_pin_desc(PinDescriptor::bus("sel", Direction::Input, 4))
            .unwrap();
        assert_eq!(graph.pin("sel").unwrap().width, Some(4));
        assert!(matches!(
            graph.add_pin("in", Direction::Output),
            Err(ComposeError::DuplicatePin(_))
        ));
    }

    #[test]
    fn test_reconnect_idempotent() {
        let mut graph = graph();
        graph.reconnect("X1", "in", "mid").unwrap();
        let once = graph.clone();
        graph.reconnect("X1", "in", "mid").unwrap();
        assert_eq!(graph, once);

        assert!(matches!(
            graph.reconnect("X2", "in", "mid"),
            Err(ComposeError::InstanceNotFound(_))
        ));
        assert!(matches!(
            graph.reconnect("X1", "clk", "mid"),
            Err(ComposeError::TerminalNotFound { .. })
        ));
    }

    #[test]
    fn test_rename_instance_keeps_order() {
        let mut graph = graph();
        graph.rename_instance("X0", "XA<1:0>").unwrap();
        let names: Vec<_> = graph.instances().keys().map(|k| k.as_str()).collect();
        assert_eq!(names, ["XA<1:0>", "X1"]);
        assert_eq!(graph.instance("XA<1:0>").unwrap().name(), "XA<1:0>");
        assert_eq!(graph.instance("XA<1:0>").unwrap().width(), 2);
        assert!(matches!(
            graph.rename_instance("X1", "XA<1:0>"),
            Err(ComposeError::DuplicateInstance(_))
        ));
    }

    #[test]
    fn test_remove_instance() {
        let mut graph = graph();
        graph.remove_instance("X0").unwrap();
        assert!(graph.instance("X0").is_err());
        assert!(matches!(
            graph.remove_instance("X0"),
            Err(ComposeError::InstanceNotFound(_))
        ));
    }
}
