//! Flag-gated pins.
//!
//! A boolean feature such as an optional reset both decides whether a
//! boundary pin survives and is forwarded to the sub-instances that implement
//! the feature. The two must agree: instances designed with the feature must
//! have a terminal on the pin's net, and instances designed without it must
//! not reference that net at all.
use log::debug;

use super::ComposeCtx;
use crate::error::{config_err, Result};
use crate::params::Params;

/// A pin and the sub-instances gated by the same flag.
#[derive(Debug, Clone)]
pub struct FeatureGate<'a> {
    pub flag: bool,
    /// Boundary pin kept only when `flag` is set.
    pub pin: &'a str,
    /// Parameter through which `flag` is passed to each gated instance.
    pub param: &'a str,
    /// Gated instances and their own parameters.
    pub instances: Vec<(&'a str, Params)>,
}

impl ComposeCtx<'_> {
    /// Designs the gated instances, prunes the pin if the feature is off, and
    /// checks that the two agree.
    pub fn design_gated(&mut self, gate: FeatureGate<'_>) -> Result<()> {
        let FeatureGate {
            flag,
            pin,
            param,
            instances,
        } = gate;

        if !self.graph.has_pin(pin) {
            return Err(config_err!(
                "{}: gated pin {pin} does not exist",
                self.cell()
            ));
        }

        let designs = instances
            .iter()
            .map(|(name, params)| (*name, params.with(param, flag)))
            .collect::<Vec<_>>();
        self.design_instances(&designs)?;

        if !flag {
            debug!("{}: {param} is off, dropping pin {pin}", self.cell());
            self.graph.remove_pin(pin)?;
        }

        for (name, _) in &instances {
            let bound = self
                .graph
                .instance(name)?
                .terminals()
                .values()
                .any(|net| net == pin);
            if bound != flag {
                return Err(config_err!(
                    "{}: {name} was designed with {param} = {flag}, but {}",
                    self.cell(),
                    if flag {
                        format!("none of its terminals connect to pin {pin}")
                    } else {
                        format!("it still connects to removed pin {pin}")
                    }
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ComposeCtx, Library};
    use crate::tests::{fixture_library, test_cell, Ignorant, RstGated};
    use crate::ComposeError;

    fn gated_top(lib: &Library) -> ComposeCtx<'_> {
        ComposeCtx::new(lib, lib.store().load_template(&test_cell("sa_top")).unwrap())
    }

    fn gate(flag: bool) -> FeatureGate<'static> {
        FeatureGate {
            flag,
            pin: "rstlb",
            param: "has_rstb",
            instances: vec![("XSA", Params::new())],
        }
    }

    #[test]
    fn test_gate_off_prunes_pin() {
        let mut lib = fixture_library();
        lib.register(test_cell("sa"), RstGated);
        let mut ctx = gated_top(&lib);
        ctx.design_gated(gate(false)).unwrap();
        let graph = ctx.finish().unwrap();
        assert!(!graph.has_pin("rstlb"));
        let sa = graph.instance("XSA").unwrap();
        assert!(sa.terminal("rstb").is_none());
        assert!(!sa.params().unwrap().bool("has_rstb").unwrap());
    }

    #[test]
    fn test_gate_on_keeps_pin() {
        let mut lib = fixture_library();
        lib.register(test_cell("sa"), RstGated);
        let mut ctx = gated_top(&lib);
        ctx.design_gated(gate(true)).unwrap();
        let graph = ctx.finish().unwrap();
        assert!(graph.has_pin("rstlb"));
        assert_eq!(
            graph.instance("XSA").unwrap().terminal("rstb").unwrap(),
            "rstlb"
        );
    }

    #[test]
    fn test_gate_mismatch_detected() {
        // a generator that accepts the flag but never prunes its reset pin
        let mut lib = fixture_library();
        lib.register(test_cell("sa"), Ignorant);
        let mut ctx = gated_top(&lib);
        assert!(matches!(
            ctx.design_gated(gate(false)),
            Err(ComposeError::ConfigurationInvariant(_))
        ));
    }

    #[test]
    fn test_gate_missing_pin() {
        let lib = fixture_library();
        let mut ctx = gated_top(&lib);
        let mut g = gate(true);
        g.pin = "rst";
        assert!(matches!(
            ctx.design_gated(g),
            Err(ComposeError::ConfigurationInvariant(_))
        ));
    }
}
