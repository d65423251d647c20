//! Build script for lcdbridge-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bridge.toml and bakes it into the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use lcdbridge_core::BridgeConfig;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    let config = load_config();
    emit_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and validate bridge.toml
fn load_config() -> BridgeConfig {
    println!("cargo:rerun-if-changed=bridge.toml");

    let config_path = Path::new("bridge.toml");
    if !config_path.exists() {
        println!("cargo:warning=bridge.toml not found, using defaults");
        return BridgeConfig::default();
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read bridge.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: BridgeConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid bridge.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: bridge.toml failed validation                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&e.to_string())
        );
    }

    println!("cargo:warning=bridge.toml validated successfully");
    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the configuration as a `const` the firmware includes
fn emit_config(out_dir: &Path, config: &BridgeConfig) {
    let source = format!(
        "pub const BRIDGE_CONFIG: BridgeConfig = BridgeConfig {{\n\
         \x20   geometry: Geometry::new({columns}, {rows}),\n\
         \x20   backend: BackendKind::{backend:?},\n\
         \x20   queueing_enabled: {queueing},\n\
         \x20   idle_threshold_us: {idle},\n\
         \x20   pump_budget: {budget},\n\
         \x20   startup_brightness: {brightness},\n\
         \x20   baudrate: {baudrate},\n\
         \x20   banner: {banner},\n\
         \x20   oled: OledSettings {{\n\
         \x20       i2c_address: {address:#04x},\n\
         \x20       column_offset: {offset},\n\
         \x20       brightness_min: {min:#04x},\n\
         \x20       brightness_max: {max:#04x},\n\
         \x20   }},\n\
         }};\n",
        columns = config.geometry.columns,
        rows = config.geometry.rows,
        backend = config.backend,
        queueing = config.queueing_enabled,
        idle = config.idle_threshold_us,
        budget = config.pump_budget,
        brightness = config.startup_brightness,
        baudrate = config.baudrate,
        banner = config.banner,
        address = config.oled.i2c_address,
        offset = config.oled.column_offset,
        min = config.oled.brightness_min,
        max = config.oled.brightness_max,
    );

    let mut f = File::create(out_dir.join("bridge_config.rs")).unwrap();
    f.write_all(source.as_bytes()).unwrap();
}
