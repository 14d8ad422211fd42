//! Break-before-make buffer around a level shifter.
use crate::compose::{ComposeCtx, Designable};
use crate::params::Params;
use crate::Result;

pub struct BreakBeforeMakeBuf;

impl Designable for BreakBeforeMakeBuf {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[("levelshifter_params", "Level shifter parameters.")]
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        ctx.design_instance("XLS", params.table("levelshifter_params")?)?;
        // the level shifter's internal midpoints drive the reset outputs
        ctx.reconnect_all("XLS", &[("midp", "RST"), ("midn", "RSTB")])
    }
}
