//! StrongARM flip-flop: a sense-amp front end driving an SR latch.
//!
//! The optional active-low reset `rstlb` is a [`FeatureGate`] over both
//! stages, so the boundary pin exists exactly when both stages take a reset.
use crate::compose::{ComposeCtx, Designable, FeatureGate};
use crate::error::config_err;
use crate::params::Params;
use crate::{params, Result};

pub struct FlopStrongArm;

impl Designable for FlopStrongArm {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("sa_params", "Sense amplifier parameters."),
            ("sr_params", "SR latch parameters."),
            ("has_rstlb", "True to add the rstlb pin."),
        ]
    }

    fn default_params(&self) -> Params {
        params! { "has_rstlb" => false }
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        let sa_params = params.table("sa_params")?;
        let sr_params = params.table("sr_params")?;
        if !sr_params.contains("inbuf_params") {
            return Err(config_err!("SR latch must have input buffers."));
        }

        ctx.design_gated(FeatureGate {
            flag: params.bool("has_rstlb")?,
            pin: "rstlb",
            param: "has_rstb",
            instances: vec![("XSA", sa_params.clone()), ("XSR", sr_params.clone())],
        })
    }
}

/// Drops the `rstb` pin unless `has_rstb` is set.
fn gate_reset(ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
    if !params.bool("has_rstb")? {
        ctx.remove_pins(&["rstb"])?;
    }
    Ok(())
}

pub struct StrongArmFrontend;

impl Designable for StrongArmFrontend {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("seg_dict", "Transistor segments."),
            ("has_rstb", "True to add the rstb pin."),
        ]
    }

    fn default_params(&self) -> Params {
        params! { "has_rstb" => false }
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        params.table("seg_dict")?;
        gate_reset(ctx, params)
    }
}

pub struct SrLatch;

impl Designable for SrLatch {
    fn params_info(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("core_params", "Cross-coupled core parameters."),
            ("inbuf_params", "Input buffer parameters."),
            ("has_rstb", "True to add the rstb pin."),
        ]
    }

    fn default_params(&self) -> Params {
        params! { "has_rstb" => false }
    }

    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()> {
        params.table("core_params")?;
        params.table("inbuf_params")?;
        gate_reset(ctx, params)
    }
}
