//! S-parameter testbench around an arbitrary diode device.
//!
//! The placeholder `XDUT` is swapped for the externally supplied cell named by
//! `dut_lib`/`dut_cell`. Terminals shared with the placeholder keep their nets,
//! and `dut_conns` overrides individual terminals afterwards.
use crate::compose::{ComposeCtx, Designable, ReplaceMaster};
use crate::netlist::MasterId;
use crate::params::Params;
use crate::{params, Result};

pub struct DiodeTbSp;

impl Designable for DiodeTbSp {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("dut_lib", "Library of the device under test."),
            ("dut_cell", "Cell of the device under test."),
            ("dut_conns", "Terminal to net overrides for the device under test."),
        ]
    }

    fn default_params(&self) -> Params {
        params! { "dut_conns" => Params::new() }
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        let opts = ReplaceMaster::builder()
            .master(MasterId::new(
                params.str("dut_lib")?.clone(),
                params.str("dut_cell")?.clone(),
            ))
            .keep_connections(true)
            .is_static(true)
            .conns(params.str_map("dut_conns")?)
            .finish()?;
        ctx.replace_master("XDUT", opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::shipped_library;
    use crate::ComposeError;

    fn cell() -> MasterId {
        MasterId::new("bag3_testbenches", "diode_tb_sp")
    }

    #[test]
    fn test_replace_dut() {
        let lib = shipped_library();
        let params = params! {
            "dut_lib" => "aib_ams",
            "dut_cell" => "ndiode",
            "dut_conns" => params! { "en" => "clk_en" },
        };
        let graph = lib.design(&cell(), &params).unwrap();
        let dut = graph.instance("XDUT").unwrap();
        assert_eq!(dut.master(), &MasterId::new("aib_ams", "ndiode"));
        assert!(dut.designed());
        assert!(dut.cell().is_none());
        assert_eq!(dut.terminal("plus").unwrap(), "vp");
        assert_eq!(dut.terminal("minus").unwrap(), "VSS");
        assert_eq!(dut.terminal("en").unwrap(), "clk_en");
    }

    #[test]
    fn test_null_conns_use_default() {
        let lib = shipped_library();
        let params: Params = serde_json::from_str(
            r#"{"dut_lib": "aib_ams", "dut_cell": "ndiode", "dut_conns": null}"#,
        )
        .unwrap();
        let graph = lib.design(&cell(), &params).unwrap();
        assert_eq!(graph.instance("XDUT").unwrap().terminal("en").unwrap(), "en");
    }

    #[test]
    fn test_missing_terminals_take_own_name() {
        let lib = shipped_library();
        let params = params! { "dut_lib" => "aib_ams", "dut_cell" => "pdiode" };
        let graph = lib.design(&cell(), &params).unwrap();
        let dut = graph.instance("XDUT").unwrap();
        assert_eq!(dut.terminals().len(), 2);
        assert!(dut.terminal("en").is_none());

        // `en` only exists on the placeholder
        let params = params.with("dut_conns", params! { "en" => "clk_en" });
        assert!(matches!(
            lib.design(&cell(), &params),
            Err(ComposeError::TerminalNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_dut() {
        let lib = shipped_library();
        let params = params! { "dut_lib" => "aib_ams", "dut_cell" => "zener" };
        assert!(matches!(
            lib.design(&cell(), &params),
            Err(ComposeError::MasterNotFound(_))
        ));
    }
}
