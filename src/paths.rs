use std::path::{Path, PathBuf};

use crate::netlist::MasterId;

pub fn out_json(work_dir: impl AsRef<Path>, cell: &MasterId) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join(format!("{cell}.json"))
}
