//! CLI smoke entry point.
//!
//! # Responsibility
//! - Run the register-or-park handshake end to end with the sample payloads.
//! - Keep output deterministic for quick local sanity checks.

use implreg_core::{
    attach_viewer, init_registry, register_implementors, sample, Delivery, RegistryConfig,
    RegistryError, SharedIndex,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("implreg smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), RegistryError> {
    println!("implreg_core version={}", implreg_core::core_version());
    init_registry(RegistryConfig::default())?;

    // Payload evaluated before the viewer exists.
    let early = register_implementors(sample::colstodian_payload())?;
    println!("colstodian payload delivery={}", delivery_name(early));

    let index = SharedIndex::new();
    let drained = attach_viewer(index.clone())?;
    println!("viewer attached drained={drained}");

    let late = register_implementors(sample::downstream_payload())?;
    println!("colstodian_wgpu payload delivery={}", delivery_name(late));

    let index = index.read();
    for namespace in index.namespaces() {
        println!("[{namespace}]");
        for record in index.get(namespace.as_str()).unwrap_or_default() {
            println!("  {}", record.plain_text());
        }
    }
    println!(
        "namespaces={} records={}",
        index.len(),
        index.record_count()
    );
    Ok(())
}

fn delivery_name(delivery: Delivery) -> &'static str {
    match delivery {
        Delivery::Delivered => "delivered",
        Delivery::Parked => "parked",
    }
}
