//! Shared helpers for the integration tests.
#![allow(dead_code)]

use sprig::prelude::*;

/// A fresh session whose output is captured.
pub fn engine() -> (Engine, OutputBuffer) {
    let output = OutputBuffer::new();
    (Engine::new(SharedOutput::new(output.clone())), output)
}

/// A fresh session with a custom depth limit.
pub fn engine_with_depth(max_depth: usize) -> Engine {
    let config = EngineConfig {
        max_depth,
        ..EngineConfig::default()
    };
    Engine::with_config(SharedOutput::new(NullSink), &config)
}

/// Runs `src` in a fresh session and returns the printed last value.
pub fn eval_ok(src: &str) -> String {
    let (mut engine, _) = engine();
    match engine.run_str("test", src) {
        Ok(value) => value.to_string(),
        Err(e) => panic!("evaluation of {src:?} failed: {e}"),
    }
}

/// Runs `src` in a fresh session and returns the error it must raise.
pub fn eval_err(src: &str) -> SprigError {
    let (mut engine, _) = engine();
    match engine.run_str("test", src) {
        Ok(value) => panic!("evaluation of {src:?} succeeded with {value}"),
        Err(e) => e,
    }
}

/// Canonical forms of `src`, one string per top-level form.
pub fn expand(src: &str) -> Vec<String> {
    let (mut engine, _) = engine();
    match engine.expand_str("test", src) {
        Ok(forms) => forms.iter().map(|f| f.to_string()).collect(),
        Err(e) => panic!("expansion of {src:?} failed: {e}"),
    }
}

pub fn expand_err(src: &str) -> SprigError {
    let (mut engine, _) = engine();
    match engine.expand_str("test", src) {
        Ok(forms) => panic!("expansion of {src:?} succeeded with {forms:?}"),
        Err(e) => e,
    }
}
