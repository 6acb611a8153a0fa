//! `refer ping`: liveness check.

use crate::output::{OutputMode, render};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct PingOutput {
    status: &'static str,
    version: &'static str,
}

pub fn run_ping(output: OutputMode) -> anyhow::Result<()> {
    let out = PingOutput {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    };
    render(output, &out, |_, w| writeln!(w, "Pong! refer is working."))
}
