#![forbid(unsafe_code)]

//! JSON input parser and dispatcher for encoded browser events.
//!
//! A JS shim serializes DOM events on the toast element and its region into
//! small JSON objects:
//!
//! ```json
//! {"kind":"pointerdown","pointer_id":1,"button":0,"pointer_type":"touch","x":10,"y":4,"t_ms":16.5}
//! {"kind":"keydown","key":"Escape","mods":0,"repeat":false}
//! {"kind":"layerkeydown","key":"Escape"}
//! {"kind":"pointerenter"}
//! ```
//!
//! [`parse_toast_input`] turns one into a [`ToastInput`]; [`dispatch_input`]
//! routes it to a toast, its group, or its surface. Kinds without a toast
//! meaning return `Ok(None)`.

use core::time::Duration;

use ftoast_core::event::{
    DefaultPrevention, KeyCode, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerType,
};
use ftoast_core::geometry::Point;
use ftoast_runtime::Toast;
use serde::Deserialize;

use crate::HostError;
use crate::host::WebSurface;

/// A decoded host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastInput {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// The browser aborted the pointer.
    PointerCancel(PointerEvent),
    /// Key press on the focused toast element.
    KeyDown(KeyEvent),
    /// Key press seen by the dismissable layer around the toast.
    LayerKeyDown(KeyEvent),
    /// Pointer entered the toast region.
    PointerEnter,
    /// Pointer left the toast region.
    PointerLeave,
    /// Focus entered the toast region.
    FocusIn,
    /// Focus left the toast region.
    FocusOut,
    /// Synthetic click on the toast element.
    Click,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    pointer_id: Option<u32>,
    #[serde(default)]
    button: Option<i16>,
    #[serde(default)]
    pointer_type: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    t_ms: Option<f64>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    mods: Option<u8>,
    #[serde(default)]
    repeat: Option<bool>,
}

/// Parse one JSON-encoded host event.
///
/// Returns `Ok(None)` for kinds that have no toast meaning and `Err` for
/// malformed JSON or missing required fields.
pub fn parse_toast_input(json: &str) -> Result<Option<ToastInput>, HostError> {
    let raw: RawInput = serde_json::from_str(json).map_err(|e| HostError::Parse(e.to_string()))?;

    let input = match raw.kind.as_str() {
        "pointerdown" => ToastInput::PointerDown(parse_pointer(&raw, 0)?),
        "pointermove" => ToastInput::PointerMove(parse_pointer(&raw, -1)?),
        "pointerup" => ToastInput::PointerUp(parse_pointer(&raw, 0)?),
        "pointercancel" => ToastInput::PointerCancel(parse_pointer(&raw, -1)?),
        "keydown" => ToastInput::KeyDown(parse_key(&raw)?),
        "layerkeydown" => ToastInput::LayerKeyDown(parse_key(&raw)?),
        "pointerenter" => ToastInput::PointerEnter,
        "pointerleave" => ToastInput::PointerLeave,
        "focusin" => ToastInput::FocusIn,
        "focusout" => ToastInput::FocusOut,
        "click" => ToastInput::Click,
        _ => return Ok(None),
    };
    Ok(Some(input))
}

fn missing(field: &str) -> HostError {
    HostError::Parse(format!("missing required field: {field}"))
}

fn parse_modifiers(mods: Option<u8>) -> Modifiers {
    Modifiers::from_bits_truncate(mods.unwrap_or(0))
}

fn parse_pointer(raw: &RawInput, default_button: i16) -> Result<PointerEvent, HostError> {
    let pointer_id = raw.pointer_id.ok_or_else(|| missing("pointer_id"))?;
    let x = raw.x.ok_or_else(|| missing("x"))?;
    let y = raw.y.ok_or_else(|| missing("y"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(HostError::Parse("non-finite pointer coordinates".into()));
    }
    let timestamp = match raw.t_ms {
        Some(t) => Duration::try_from_secs_f64(t / 1000.0)
            .map_err(|e| HostError::Parse(format!("invalid t_ms {t}: {e}")))?,
        None => Duration::ZERO,
    };

    Ok(PointerEvent::new(pointer_id, Point::new(x, y))
        .with_button(PointerButton::from_dom(raw.button.unwrap_or(default_button)))
        .with_pointer_type(
            raw.pointer_type
                .as_deref()
                .map_or(PointerType::Mouse, PointerType::from_dom),
        )
        .with_modifiers(parse_modifiers(raw.mods))
        .at(timestamp))
}

fn parse_key(raw: &RawInput) -> Result<KeyEvent, HostError> {
    let key = raw.key.as_deref().ok_or_else(|| missing("key"))?;
    let mut event = KeyEvent::new(KeyCode::from_dom(key)).with_modifiers(parse_modifiers(raw.mods));
    if raw.repeat.unwrap_or(false) {
        event = event.repeated();
    }
    Ok(event)
}

/// Route `input` to `toast`, its group, or `surface`.
///
/// Returns `true` when the event's default action was prevented; for a click,
/// when a pending suppression swallowed it.
pub fn dispatch_input(input: ToastInput, toast: &Toast, surface: &WebSurface) -> bool {
    #[cfg(feature = "tracing")]
    tracing::trace!(toast_id = toast.id().get(), ?input, "dispatch toast input");

    match input {
        ToastInput::PointerDown(mut event) => {
            toast.pointer_down(&mut event);
            event.is_default_prevented()
        }
        ToastInput::PointerMove(mut event) => {
            toast.pointer_move(&mut event);
            event.is_default_prevented()
        }
        ToastInput::PointerUp(mut event) => {
            toast.pointer_up(&mut event);
            event.is_default_prevented()
        }
        ToastInput::PointerCancel(mut event) => {
            toast.pointer_cancel(&mut event);
            false
        }
        ToastInput::KeyDown(mut event) => {
            toast.key_down(&mut event);
            event.is_default_prevented()
        }
        ToastInput::LayerKeyDown(mut event) => {
            if event.is_escape() {
                toast.layer_escape_key_down(&mut event);
            }
            event.is_default_prevented()
        }
        ToastInput::PointerEnter => {
            toast.group().pointer_enter();
            false
        }
        ToastInput::PointerLeave => {
            toast.group().pointer_leave();
            false
        }
        ToastInput::FocusIn => {
            toast.group().focus_in();
            false
        }
        ToastInput::FocusOut => {
            toast.group().focus_out();
            false
        }
        ToastInput::Click => surface.dispatch_click(),
    }
}

/// Parse and dispatch in one step. Unknown kinds are ignored.
pub fn dispatch_encoded(json: &str, toast: &Toast, surface: &WebSurface) -> Result<bool, HostError> {
    match parse_toast_input(json)? {
        Some(input) => Ok(dispatch_input(input, toast, surface)),
        None => Ok(false),
    }
}
