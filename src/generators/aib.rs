//! AIB analog cells built purely from sibling sub-designs.
use crate::compose::{ComposeCtx, Designable};
use crate::params::Params;
use crate::Result;

/// Duty-cycle-correction helper core.
pub struct AibDccHelperCore;

impl Designable for AibDccHelperCore {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("mux_params", "Clock mux parameters, shared by both muxes."),
            ("flop_params", "Divider flop parameters."),
            ("inv_params", "Inverter chain parameters."),
        ]
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        let mux = params.table("mux_params")?;
        let inv = params.table("inv_params")?;
        ctx.design_instances(&[
            ("XMUXI", mux.clone()),
            ("XMUXO", mux.clone()),
            ("XDIV", params.table("flop_params")?.clone()),
            ("XINV0", inv.with("dual_output", false)),
            ("XINV1", inv.with("dual_output", true)),
        ])
    }
}

/// Pad frontend with ESD diodes.
pub struct AibFrontend;

impl Designable for AibFrontend {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("fe_params", "Frontend parameters."),
            ("nd_params", "N-type ESD diode parameters."),
            ("pd_params", "P-type ESD diode parameters."),
            ("ms_params", "Metal short parameters."),
        ]
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        let designs = [
            ("XFE", "fe_params"),
            ("XND", "nd_params"),
            ("XPD", "pd_params"),
            ("XMS", "ms_params"),
        ]
        .into_iter()
        .map(|(inst, key)| params.table(key).map(|p| (inst, p.clone())))
        .collect::<Result<Vec<_>>>()?;
        ctx.design_instances(&designs)
    }
}
