use std::fs::canonicalize;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::cli::args::Args;
use crate::cli::progress::{StepContext, StepKey};
use crate::compose::Library;
use crate::config::parse_run_config;
use crate::generators::register_all;
use crate::paths::out_json;
use crate::template::FileTemplateStore;

pub use anyhow::Result;

pub mod args;
pub mod progress;

pub const BANNER: &str = r"
           _                                  
  ___  ___| |__   ___ _ __ ___   __ _  ___ _ __  
 / __|/ __| '_ \ / _ \ '_ ` _ \ / _` |/ _ \ '_ \ 
 \__ \ (__| | | |  __/ | | | | | (_| |  __/ | | |
 |___/\___|_| |_|\___|_| |_| |_|\__, |\___|_| |_|
                                |___/            
SCHEMGEN v0.2
";

pub fn run() -> Result<()> {
    run_with(Args::parse()).map(|_| ())
}

/// Runs one composition, returning the path of the written netlist.
pub fn run_with(args: Args) -> Result<PathBuf> {
    let config_path = canonicalize(&args.config)?;

    if !args.quiet {
        println!("{BANNER}");
        println!("Configuration file: {:?}", &config_path);
        println!("Template directory: {:?}\n", &args.templates);
    }

    let mut ctx = StepContext::new(args.quiet);

    let store = ctx.check(FileTemplateStore::open(&args.templates).map_err(Into::into))?;
    ctx.finish(StepKey::LoadTemplates)?;

    let config = ctx.check(parse_run_config(&config_path).map_err(Into::into))?;
    ctx.finish(StepKey::LoadConfig)?;

    let mut lib = Library::new(store);
    register_all(&mut lib);
    if args.jobs == Some(1) {
        lib.set_parallel(false);
    }
    let res = match args.jobs {
        Some(jobs) if jobs > 1 => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(anyhow::Error::from)
            .and_then(|pool| Ok(pool.install(|| lib.design(&config.cell, &config.params))?)),
        _ => lib.design(&config.cell, &config.params).map_err(Into::into),
    };
    let graph = ctx.check(res)?;
    ctx.finish(StepKey::Compose)?;

    let out = args
        .output
        .unwrap_or_else(|| out_json(".", &config.cell));
    let res = serde_json::to_string_pretty(&graph)
        .map_err(anyhow::Error::from)
        .and_then(|json| Ok(std::fs::write(&out, json)?));
    ctx.check(res)?;
    ctx.finish(StepKey::WriteNetlist)?;

    info!("wrote {} to {:?}", config.cell, out);
    if !args.quiet {
        println!("Netlist saved to: {:?}\n", &out);
    }

    Ok(out)
}
