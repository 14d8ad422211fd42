use schemgen::compose::{ComposeCtx, Library, NoConnResolution, NOCONN};
use schemgen::config::parse_run_config;
use schemgen::generators::register_all;
use schemgen::netlist::MasterId;
use schemgen::params;
use schemgen::template::FileTemplateStore;
use schemgen::{ComposeError, CONFIGS_PATH, TEMPLATES_PATH};

fn library() -> Library {
    let store = FileTemplateStore::open(TEMPLATES_PATH).unwrap();
    let mut lib = Library::new(store);
    register_all(&mut lib);
    lib
}

fn design_config(lib: &Library, name: &str) -> schemgen::Result<schemgen::netlist::NetlistGraph> {
    let config = parse_run_config(format!("{CONFIGS_PATH}/{name}"))?;
    lib.design(&config.cell, &config.params)
}

#[test]
fn test_shipped_configs_compose() {
    let lib = library();
    for name in [
        "flop_strongarm.toml",
        "comparator_wrapper.toml",
        "diode_tb_sp.toml",
        "aib_dcc_helper_core.json",
    ] {
        let graph = design_config(&lib, name).unwrap();
        assert!(graph.unconnected_terminals().is_empty(), "{name}");
        assert!(
            graph.instances().values().all(|inst| inst.designed()),
            "{name}"
        );
    }
}

#[test]
fn test_comparator_wrapper_config() {
    let lib = library();
    let graph = design_config(&lib, "comparator_wrapper.toml").unwrap();
    assert!(graph.has_pin("clk_cmp"));
    assert!(graph.has_pin("vref"));
    assert!(!graph.has_pin("mon"));
    let sink = graph.instance("XNC<2:0>").unwrap();
    assert_eq!(sink.terminal("noConn").unwrap(), "noconn<2:0>");
    assert_eq!(
        graph.instance("XCOMP").unwrap().terminal("clk").unwrap(),
        "clk_cmp"
    );
}

#[test]
fn test_diode_tb_config() {
    let lib = library();
    let graph = design_config(&lib, "diode_tb_sp.toml").unwrap();
    let dut = graph.instance("XDUT").unwrap();
    assert_eq!(dut.master(), &MasterId::new("aib_ams", "ndiode"));
    assert_eq!(dut.terminal("en").unwrap(), "clk_en");
    assert_eq!(dut.terminal("plus").unwrap(), "vp");
}

#[test]
fn test_manual_composition() {
    // drive the context directly against a shipped template
    let lib = library();
    let cell = MasterId::new("aib_ams", "aib_frontend");
    let mut ctx = ComposeCtx::new(&lib, lib.store().load_template(&cell).unwrap());
    ctx.rename_instance("XMS", "XMS0", &[("PLUS", "iopad_aux")])
        .unwrap();
    assert!(matches!(
        ctx.rename_instance("XMS", "XMS1", &[] as &[(&str, &str)]),
        Err(ComposeError::InstanceNotFound(_))
    ));
    ctx.remove_instance("XPD").unwrap();
    ctx.graph_mut().remove_pin("iopad_out").unwrap();
    ctx.design_instances(&[
        ("XFE", params! { "seg" => 8i64 }),
        ("XND", params! { "seg" => 2i64 }),
        ("XMS0", params! { "w" => 0.5 }),
    ])
    .unwrap();
    let graph = ctx.finish().unwrap();
    assert_eq!(
        graph.instances().keys().map(|k| k.as_str()).collect::<Vec<_>>(),
        ["XFE", "XND", "XMS0"]
    );
    assert_eq!(
        graph.instance("XMS0").unwrap().terminal("PLUS").unwrap(),
        "iopad_aux"
    );
}

#[test]
fn test_noconn_sink_in_shipped_template() {
    let lib = library();
    let cell = MasterId::new("bag3_digital", "comparator_wrapper");
    let mut ctx = ComposeCtx::new(&lib, lib.store().load_template(&cell).unwrap());
    assert_eq!(ctx.reconnect("XCOMP", "outn_m", NOCONN).unwrap(), "noconn<0>");
    assert_eq!(ctx.reconnect("XCOMP", "outp_m", NOCONN).unwrap(), "noconn<1>");
    assert_eq!(
        ctx.resolve_noconn("XNC", "noConn").unwrap(),
        NoConnResolution::Bus {
            name: "XNC<1:0>".into(),
            width: 2
        }
    );
}
