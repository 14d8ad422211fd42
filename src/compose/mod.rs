//! The netlist composition engine.
//!
//! A [`Library`] pairs a [`TemplateStore`] with the generators that know how
//! to design each cell. Designing a cell loads its template into a
//! [`ComposeCtx`], which owns the working graph for exactly one composition
//! pass. The generator edits the graph and recursively designs sub-instances
//! through the context; [`ComposeCtx::finish`] validates the result.
//!
//! Any error aborts the pass and the partially edited graph is dropped.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arcstr::ArcStr;
use log::{debug, info};
use rayon::prelude::*;

use crate::error::{config_err, ComposeError, Result};
use crate::netlist::{Direction, MasterId, NetlistGraph};
use crate::params::Params;
use crate::template::TemplateStore;

pub mod gate;
pub mod noconn;
pub mod replace;

pub use gate::FeatureGate;
pub use noconn::{NoConnResolution, NOCONN};
pub use replace::ReplaceMaster;

use noconn::NoConnBus;

/// A generator that designs one kind of cell.
///
/// Implementations are registered with a [`Library`] under the master they design.
pub trait Designable: Send + Sync {
    /// Parameter names paired with short descriptions.
    fn params_info(&self) -> &'static [(&'static str, &'static str)];

    /// Values used for parameters the caller leaves out.
    fn default_params(&self) -> Params {
        Params::new()
    }

    /// Edits `ctx`'s graph according to `params`.
    fn design(&self, ctx: &mut ComposeCtx<'_>, params: &Params) -> Result<()>;
}

/// Templates plus the generators that design them.
pub struct Library {
    store: Box<dyn TemplateStore>,
    generators: HashMap<MasterId, Arc<dyn Designable>>,
    parallel: bool,
}

impl Library {
    pub fn new(store: impl TemplateStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            generators: HashMap::new(),
            parallel: true,
        }
    }

    pub fn register(&mut self, cell: MasterId, generator: impl Designable + 'static) {
        self.generators.insert(cell, Arc::new(generator));
    }

    /// Whether sibling sub-instances may be designed on the rayon pool.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    #[inline]
    pub fn store(&self) -> &dyn TemplateStore {
        self.store.as_ref()
    }

    pub fn generator(&self, cell: &MasterId) -> Option<&dyn Designable> {
        self.generators.get(cell).map(|g| g.as_ref())
    }

    /// Designs `cell` with `params`, producing its finished graph.
    pub fn design(&self, cell: &MasterId, params: &Params) -> Result<NetlistGraph> {
        self.design_cell(cell, params).map(|designed| designed.graph)
    }

    /// Designs `cell`, returning the effective parameters alongside its graph.
    ///
    /// Cells without a generator are static: the template is returned as-is
    /// and the parameters are passed through unchecked.
    fn design_cell(&self, cell: &MasterId, params: &Params) -> Result<Designed> {
        let mut template = self.store.load_template(cell)?;
        let Some(generator) = self.generators.get(cell) else {
            debug!("{cell} is static");
            template.mark_static_instances(|master| self.generator(master).is_none());
            return Ok(Designed {
                params: params.clone(),
                graph: template,
                generated: false,
            });
        };
        let params = check_params(cell, generator.as_ref(), params)?;
        info!("designing {cell}");
        let mut ctx = ComposeCtx::new(self, template);
        generator.design(&mut ctx, &params)?;
        let graph = ctx.finish()?;
        info!("finished {cell}");
        Ok(Designed {
            params,
            graph,
            generated: true,
        })
    }
}

struct Designed {
    params: Params,
    graph: NetlistGraph,
    generated: bool,
}

impl Designed {
    fn attach_to(self, ctx: &mut ComposeCtx<'_>, name: &str) -> Result<()> {
        let cell = self.generated.then_some(self.graph);
        ctx.graph.instance_mut(name)?.attach(self.params, cell);
        Ok(())
    }
}

/// Merges defaults and checks `params` against the generator's declared parameters.
fn check_params(cell: &MasterId, generator: &dyn Designable, params: &Params) -> Result<Params> {
    let info = generator.params_info();
    let params = params.with_defaults(&generator.default_params());
    if let Some((name, desc)) = info.iter().find(|(name, _)| !params.contains(name)) {
        return Err(config_err!(
            "{cell}: missing required parameter `{name}` ({desc})"
        ));
    }
    if let Some(key) = params
        .keys()
        .find(|key| !info.iter().any(|(name, _)| key.as_str() == *name))
    {
        return Err(config_err!("{cell}: unknown parameter `{key}`"));
    }
    Ok(params)
}

/// One composition pass over one cell's graph.
pub struct ComposeCtx<'a> {
    lib: &'a Library,
    graph: NetlistGraph,
    noconn: NoConnBus,
}

impl<'a> ComposeCtx<'a> {
    pub fn new(lib: &'a Library, graph: NetlistGraph) -> Self {
        Self {
            lib,
            graph,
            noconn: NoConnBus::default(),
        }
    }

    #[inline]
    pub fn library(&self) -> &'a Library {
        self.lib
    }

    #[inline]
    pub fn graph(&self) -> &NetlistGraph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut NetlistGraph {
        &mut self.graph
    }

    #[inline]
    pub fn cell(&self) -> &MasterId {
        self.graph.cell()
    }

    /// Removes each of `pins`, in order.
    pub fn remove_pins<S: AsRef<str>>(&mut self, pins: &[S]) -> Result<()> {
        for pin in pins {
            self.graph.remove_pin(pin.as_ref())?;
        }
        Ok(())
    }

    /// Applies each `(old, new)` pin rename, in order.
    pub fn rename_pins<S: AsRef<str>>(&mut self, renames: &[(S, S)]) -> Result<()> {
        for (old, new) in renames {
            self.graph.rename_pin(old.as_ref(), new.as_ref())?;
        }
        Ok(())
    }

    /// Adds each of `pins` with direction `direction`.
    pub fn add_pins<S: AsRef<str>>(&mut self, pins: &[S], direction: Direction) -> Result<()> {
        for pin in pins {
            self.graph.add_pin(pin.as_ref(), direction)?;
        }
        Ok(())
    }

    /// Rebinds `inst.term` to `net`, returning the net actually bound.
    ///
    /// The [`NOCONN`] sentinel is replaced by the next `noconn<k>` net of
    /// this pass.
    pub fn reconnect(&mut self, inst: &str, term: &str, net: &str) -> Result<ArcStr> {
        // A failed reconnect must not consume a no-connect index.
        self.graph
            .instance(inst)?
            .terminal(term)
            .ok_or_else(|| ComposeError::TerminalNotFound {
                inst: inst.into(),
                term: term.into(),
            })?;
        let net = if net == NOCONN {
            self.noconn.next_net()?
        } else {
            ArcStr::from(net)
        };
        self.graph.reconnect(inst, term, net.clone())?;
        Ok(net)
    }

    /// Applies `(terminal, net)` reconnections to `inst` in declared order.
    pub fn reconnect_all<S: AsRef<str>>(&mut self, inst: &str, conns: &[(S, S)]) -> Result<()> {
        for (term, net) in conns {
            self.reconnect(inst, term.as_ref(), net.as_ref())?;
        }
        Ok(())
    }

    /// Re-keys instance `old` as `new` and applies `conns` to it.
    pub fn rename_instance<S: AsRef<str>>(
        &mut self,
        old: &str,
        new: &str,
        conns: &[(S, S)],
    ) -> Result<()> {
        self.graph.rename_instance(old, new)?;
        self.reconnect_all(new, conns)
    }

    pub fn remove_instance(&mut self, name: &str) -> Result<()> {
        self.graph.remove_instance(name).map(|_| ())
    }

    /// Recursively designs instance `name` with `params`.
    pub fn design_instance(&mut self, name: &str, params: &Params) -> Result<()> {
        let master = self.designable(name)?;
        self.lib.design_cell(&master, params)?.attach_to(self, name)
    }

    /// Designs sibling instances, each with its own parameters.
    ///
    /// Siblings share no mutable state, so with a parallel [`Library`] they
    /// are composed on the rayon pool. Results are attached in declared order
    /// and are identical to designing the siblings one at a time.
    pub fn design_instances<S: AsRef<str>>(&mut self, designs: &[(S, Params)]) -> Result<()> {
        let mut seen = HashSet::new();
        let mut jobs = Vec::with_capacity(designs.len());
        for (name, params) in designs {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(ComposeError::AlreadyDesigned(name.into()));
            }
            jobs.push((name, self.designable(name)?, params));
        }

        let lib = self.lib;
        let results = if lib.parallel && jobs.len() > 1 {
            jobs.par_iter()
                .map(|(_, master, params)| lib.design_cell(master, params))
                .collect::<Result<Vec<_>>>()?
        } else {
            jobs.iter()
                .map(|(_, master, params)| lib.design_cell(master, params))
                .collect::<Result<Vec<_>>>()?
        };

        for ((name, _, _), designed) in jobs.into_iter().zip(results) {
            designed.attach_to(self, name)?;
        }
        Ok(())
    }

    /// Returns the master of `name`, checking that it exists and is undesigned.
    fn designable(&self, name: &str) -> Result<MasterId> {
        let inst = self.graph.instance(name)?;
        if inst.designed() {
            return Err(ComposeError::AlreadyDesigned(name.into()));
        }
        Ok(inst.master().clone())
    }

    /// Validates and returns the finished graph.
    ///
    /// Instances of masters with no generator are marked designed.
    pub fn finish(self) -> Result<NetlistGraph> {
        let Self {
            lib,
            mut graph,
            noconn,
        } = self;
        if let Some((inst, term)) = graph.unconnected_terminals().into_iter().next() {
            return Err(config_err!(
                "{}: terminal {inst}.{term} is unconnected",
                graph.cell()
            ));
        }
        if !noconn.is_settled() {
            return Err(config_err!(
                "{}: {} no-connect nets were created but never packed into a sink",
                graph.cell(),
                noconn.count()
            ));
        }
        if let Some(inst) = graph
            .instances()
            .values()
            .find(|inst| !inst.designed() && lib.generator(inst.master()).is_some())
        {
            return Err(config_err!(
                "{}: instance {} of {} was never designed",
                graph.cell(),
                inst.name(),
                inst.master()
            ));
        }
        graph.mark_static_instances(|master| lib.generator(master).is_none());
        Ok(graph)
    }
}
