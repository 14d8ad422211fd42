//! Template storage.
//!
//! A template is the parameter-free starting shape of a cell. Templates are
//! grouped into libraries; on disk, each library is one TOML file.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arcstr::ArcStr;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{config_err, ComposeError, Result};
use crate::netlist::{InstanceRef, MasterId, NetlistGraph, PinDescriptor};

/// Source of the initial graph for a cell.
pub trait TemplateStore: Send + Sync {
    /// Returns a fresh copy of the template graph for `cell`.
    fn load_template(&self, cell: &MasterId) -> Result<NetlistGraph>;

    /// The boundary pins of `cell`, which are the terminals of any instance of it.
    fn master_pins(&self, cell: &MasterId) -> Result<Vec<PinDescriptor>> {
        self.load_template(cell)
            .map(|graph| graph.pins().to_vec())
            .map_err(|e| match e {
                ComposeError::TemplateNotFound(id) => ComposeError::MasterNotFound(id),
                e => e,
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDef {
    pub lib: ArcStr,
    #[serde(default)]
    pub cells: Vec<CellDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellDef {
    pub name: ArcStr,
    #[serde(default)]
    pub pins: Vec<PinDescriptor>,
    #[serde(default)]
    pub instances: Vec<InstanceDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDef {
    pub name: ArcStr,
    pub master: MasterId,
    #[serde(default)]
    pub terminals: IndexMap<ArcStr, ArcStr>,
}

impl CellDef {
    fn into_graph(self, lib: &ArcStr) -> Result<NetlistGraph> {
        let mut graph = NetlistGraph::new(MasterId::new(lib.clone(), self.name));
        for pin in self.pins {
            graph.add_pin_desc(pin)?;
        }
        for inst in self.instances {
            graph.add_instance(InstanceRef::new(inst.name, inst.master, inst.terminals))?;
        }
        Ok(graph)
    }
}

/// A template store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    cells: HashMap<MasterId, Arc<NetlistGraph>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, graph: NetlistGraph) {
        self.cells.insert(graph.cell().clone(), Arc::new(graph));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &MasterId> {
        self.cells.keys()
    }

    pub fn add_library(&mut self, def: LibraryDef) -> Result<()> {
        let LibraryDef { lib, cells } = def;
        for cell in cells {
            let graph = cell.into_graph(&lib)?;
            debug!("loaded template {}", graph.cell());
            self.insert(graph);
        }
        Ok(())
    }

    pub fn add_toml(&mut self, s: &str) -> Result<()> {
        let def: LibraryDef = toml::from_str(s)?;
        self.add_library(def)
    }

    /// Loads every `*.toml` library in `dir`, then validates the result.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut store = Self::new();
        let paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter(|p| p.extension().map_or(false, |ext| ext == "toml"))
            .sorted();
        for path in paths {
            store.add_toml(&std::fs::read_to_string(&path)?)?;
        }
        store.validate()?;
        info!("loaded {} templates from {:?}", store.len(), dir);
        Ok(store)
    }

    /// Checks that every instance refers to a known master and that its
    /// terminals are exactly that master's pins.
    pub fn validate(&self) -> Result<()> {
        for (id, graph) in self.cells.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            for inst in graph.instances().values() {
                let master = self
                    .cells
                    .get(inst.master())
                    .ok_or_else(|| ComposeError::MasterNotFound(inst.master().clone()))?;
                let pins = master.pins().iter().map(|p| &p.name).sorted().collect_vec();
                let terms = inst.terminals().keys().sorted().collect_vec();
                if pins != terms {
                    return Err(config_err!(
                        "{id}: terminals of {} ({}) do not match pins of {} ({})",
                        inst.name(),
                        terms.iter().join(", "),
                        inst.master(),
                        pins.iter().join(", ")
                    ));
                }
                if let Some((term, _)) = inst.terminals().iter().find(|(_, n)| n.is_empty()) {
                    return Err(config_err!(
                        "{id}: terminal {}.{term} is unconnected",
                        inst.name()
                    ));
                }
            }
        }
        Ok(())
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load_template(&self, cell: &MasterId) -> Result<NetlistGraph> {
        self.cells
            .get(cell)
            .map(|graph| (**graph).clone())
            .ok_or_else(|| ComposeError::TemplateNotFound(cell.clone()))
    }
}

/// A template store backed by a directory of TOML libraries.
///
/// The directory is read once, when the store is opened.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    dir: PathBuf,
    templates: MemoryTemplateStore,
}

impl FileTemplateStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let templates = MemoryTemplateStore::from_dir(&dir)?;
        Ok(Self { dir, templates })
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn templates(&self) -> &MemoryTemplateStore {
        &self.templates
    }
}

impl TemplateStore for FileTemplateStore {
    fn load_template(&self, cell: &MasterId) -> Result<NetlistGraph> {
        self.templates.load_template(cell)
    }
}
