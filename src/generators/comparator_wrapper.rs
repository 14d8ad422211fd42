//! A comparator behind a front-end switch.
//!
//! The wrapper's boundary is editable from parameters: pins may be removed,
//! renamed, or added, and both sub-instances may have terminals rewired. Any
//! terminal rewired to `noconn` is packed into the `XNC` sink once both
//! sub-instances are done.
use crate::compose::{ComposeCtx, Designable};
use crate::netlist::Direction;
use crate::params::{Param, Params};
use crate::{params, Result};

pub struct ComparatorWrapper;

impl Designable for ComparatorWrapper {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("comp_params", "Comparator parameters."),
            ("fes_params", "Front-end switch parameters."),
            ("remove_pins_list", "Pins to remove."),
            ("rename_pins_list", "[old, new] pin renames."),
            ("extra_pins", "Extra `in` and `out` pins to add."),
            ("reconn_comp_list", "[terminal, net] reconnections of XCOMP."),
            ("reconn_fes_list", "[terminal, net] reconnections of XFES."),
        ]
    }

    fn default_params(&self) -> Params {
        let empty = || Param::List(Vec::new());
        params! {
            "remove_pins_list" => empty(),
            "rename_pins_list" => empty(),
            "extra_pins" => Params::new(),
            "reconn_comp_list" => empty(),
            "reconn_fes_list" => empty(),
        }
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        ctx.remove_pins(&params.str_list("remove_pins_list")?)?;
        ctx.rename_pins(&params.pairs("rename_pins_list")?)?;

        let extra = params.table("extra_pins")?;
        for (key, direction) in [("in", Direction::Input), ("out", Direction::Output)] {
            if extra.contains(key) {
                ctx.add_pins(&extra.str_list(key)?, direction)?;
            }
        }

        ctx.design_instance("XCOMP", params.table("comp_params")?)?;
        ctx.reconnect_all("XCOMP", &params.pairs("reconn_comp_list")?)?;
        ctx.design_instance("XFES", params.table("fes_params")?)?;
        ctx.reconnect_all("XFES", &params.pairs("reconn_fes_list")?)?;

        ctx.resolve_noconn("XNC", "noConn")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::NoConnResolution;
    use crate::netlist::MasterId;
    use crate::tests::shipped_library;
    use crate::ComposeError;

    fn cell() -> MasterId {
        MasterId::new("bag3_digital", "comparator_wrapper")
    }

    fn base() -> Params {
        params! {
            "comp_params" => params! { "seg_dict" => params! { "in" => 4i64, "tail" => 6i64 } },
            "fes_params" => params! { "seg" => 2i64 },
        }
    }

    fn pair(a: &str, b: &str) -> Param {
        Param::from(vec![a, b])
    }

    #[test]
    fn test_defaults_drop_sink() {
        let lib = shipped_library();
        let graph = lib.design(&cell(), &base()).unwrap();
        assert!(graph.instance("XNC").is_err());
        assert_eq!(graph.pins().len(), 10);
        let comp = graph.instance("XCOMP").unwrap();
        assert!(comp.designed());
        assert_eq!(comp.terminal("inp").unwrap(), "vinp");
    }

    #[test]
    fn test_unused_outputs_packed() {
        let lib = shipped_library();
        let params = base()
            .with("remove_pins_list", vec!["mon"])
            .with(
                "reconn_comp_list",
                vec![pair("outp_m", "noconn"), pair("outn_m", "noconn")],
            )
            .with("reconn_fes_list", vec![pair("mon", "noconn")]);
        let graph = lib.design(&cell(), &params).unwrap();

        assert!(!graph.has_pin("mon"));
        let comp = graph.instance("XCOMP").unwrap();
        assert_eq!(comp.terminal("outp_m").unwrap(), "noconn<0>");
        assert_eq!(comp.terminal("outn_m").unwrap(), "noconn<1>");
        assert_eq!(
            graph.instance("XFES").unwrap().terminal("mon").unwrap(),
            "noconn<2>"
        );
        let sink = graph.instance("XNC<2:0>").unwrap();
        assert_eq!(sink.terminal("noConn").unwrap(), "noconn<2:0>");
        assert_eq!(sink.width(), 3);
    }

    #[test]
    fn test_pin_edits() {
        let lib = shipped_library();
        let params = base()
            .with("rename_pins_list", vec![pair("clk", "clk_cmp")])
            .with("reconn_comp_list", vec![pair("clk", "clk_cmp")])
            .with(
                "extra_pins",
                params! { "in" => vec!["vref"], "out" => vec!["dbg"] },
            );
        let graph = lib.design(&cell(), &params).unwrap();
        assert!(graph.has_pin("clk_cmp"));
        assert!(!graph.has_pin("clk"));
        assert_eq!(graph.pin("vref").unwrap().direction, Direction::Input);
        assert_eq!(graph.pin("dbg").unwrap().direction, Direction::Output);
        assert_eq!(
            graph.instance("XCOMP").unwrap().terminal("clk").unwrap(),
            "clk_cmp"
        );
    }

    #[test]
    fn test_rename_conflict() {
        let lib = shipped_library();
        let params = base().with("rename_pins_list", vec![pair("clk", "vinp")]);
        assert!(matches!(
            lib.design(&cell(), &params),
            Err(ComposeError::PinRenameConflict { .. })
        ));
    }

    #[test]
    fn test_single_noconn_is_scalar() {
        let lib = shipped_library();
        let mut ctx = crate::compose::ComposeCtx::new(
            &lib,
            lib.store().load_template(&cell()).unwrap(),
        );
        ctx.reconnect("XFES", "mon", "noconn").unwrap();
        assert_eq!(
            ctx.resolve_noconn("XNC", "noConn").unwrap(),
            NoConnResolution::Scalar
        );
    }
}
