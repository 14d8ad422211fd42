//! Built-in generators for the shipped template libraries.
use crate::compose::Library;
use crate::netlist::MasterId;

pub mod aib;
pub mod break_before_make_buf;
pub mod comparator_wrapper;
pub mod diode_tb_sp;
pub mod flop_strongarm;

pub use aib::{AibDccHelperCore, AibFrontend};
pub use break_before_make_buf::BreakBeforeMakeBuf;
pub use comparator_wrapper::ComparatorWrapper;
pub use diode_tb_sp::DiodeTbSp;
pub use flop_strongarm::{FlopStrongArm, SrLatch, StrongArmFrontend};

pub const BAG3_DIGITAL: &str = "bag3_digital";
pub const BAG3_TESTBENCHES: &str = "bag3_testbenches";
pub const AIB_AMS: &str = "aib_ams";

/// Registers every built-in generator with `lib`.
pub fn register_all(lib: &mut Library) {
    let digital = |cell: &'static str| MasterId::new(BAG3_DIGITAL, cell);
    lib.register(digital("comparator_wrapper"), ComparatorWrapper);
    lib.register(digital("flop_strongarm"), FlopStrongArm);
    lib.register(digital("strongarm_frontend"), StrongArmFrontend);
    lib.register(digital("sr_latch"), SrLatch);
    lib.register(digital("break_before_make_buf"), BreakBeforeMakeBuf);
    lib.register(MasterId::new(BAG3_TESTBENCHES, "diode_tb_sp"), DiodeTbSp);
    lib.register(MasterId::new(AIB_AMS, "aib_dcc_helper_core"), AibDccHelperCore);
    lib.register(MasterId::new(AIB_AMS, "aib_frontend"), AibFrontend);
}
