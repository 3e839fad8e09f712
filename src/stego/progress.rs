// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Stage counter for [`encode`](crate::encode) and [`decode`](crate::decode).
//!
//! Each pipeline run resets the counter to `0 / ENCODE_STEPS` or
//! `0 / DECODE_STEPS` and bumps it once per finished stage (keys derived,
//! payload prepared or header read, slots drawn, bits written or message
//! decrypted). Step and total share one atomic word, so a poller on another
//! thread never sees a step from one run paired with the total of another.
//!
//! With the `wasm` feature a JS function can be registered to receive
//! `(step, total)` after every change.

use core::sync::atomic::{AtomicU64, Ordering};

static STATE: AtomicU64 = AtomicU64::new(0);

fn pack(step: u32, total: u32) -> u64 {
    (u64::from(step) << 32) | u64::from(total)
}

fn unpack(state: u64) -> (u32, u32) {
    ((state >> 32) as u32, state as u32)
}

/// One stage further, holding below `total` until the run finishes.
fn bump(state: u64) -> u64 {
    let (step, total) = unpack(state);
    pack(if step.saturating_add(1) < total { step + 1 } else { step }, total)
}

/// Start a run of `total` stages.
pub fn init(total: u32) {
    STATE.store(pack(0, total), Ordering::Relaxed);
    notify();
}

pub fn advance() {
    let _ = STATE.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| Some(bump(s)));
    notify();
}

/// Current `(step, total)`.
pub fn get() -> (u32, u32) {
    unpack(STATE.load(Ordering::Relaxed))
}

/// Mark the run complete, whether it succeeded or not.
pub fn finish() {
    let (_, total) = get();
    STATE.store(pack(total, total), Ordering::Relaxed);
    notify();
}

#[cfg(feature = "wasm")]
thread_local! {
    static LISTENER: std::cell::RefCell<Option<js_sys::Function>> = const { std::cell::RefCell::new(None) };
}

/// Register (or with `None`, drop) the JS function called with `(step, total)`.
#[cfg(feature = "wasm")]
pub fn set_wasm_callback(listener: Option<js_sys::Function>) {
    LISTENER.with(|slot| *slot.borrow_mut() = listener);
}

fn notify() {
    #[cfg(feature = "wasm")]
    {
        use wasm_bindgen::JsValue;
        let (step, total) = get();
        LISTENER.with(|slot| {
            if let Some(f) = slot.borrow().as_ref() {
                let _ = f.call2(&JsValue::NULL, &JsValue::from(step), &JsValue::from(total));
            }
        });
    }
}
