//! Calculator input state machine
//!
//! Owns the calculator state and exposes one entry point per user
//! action (digits, decimal point, operators, percent, equals,
//! backspace, clear). Every action is synchronous and total: each
//! reachable state accepts each action without panicking, and
//! malformed intermediate states degrade to no-ops.
//!
//! `Engine` is the pure core. `Calculator`, at the bottom of this
//! file, wraps it for JavaScript behind wasm-bindgen and owns the
//! deferred error-recovery timer.

use crate::action::{Action, Op};
use crate::compute::compute;
use crate::format::{format_number, parse_operand};
use crate::history::{Calculation, History};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Delay before an error display resets itself, in milliseconds
const ERROR_RECOVERY_DELAY_MS: i32 = 1000;

/// Longest operand text the engine will accumulate
const MAX_OPERAND_LEN: usize = 18;

/// What the display currently shows
///
/// The error state replaces a sentinel string in the display text: the
/// frontend maps it to its localized error message, the engine only
/// tracks the tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Display {
    /// Raw display text: a number, or a pending expression like `5 + 3`
    Text(String),
    /// A computation failed and pending state has been reset
    Error,
}

impl Display {
    /// The raw text, unless the display is in the error state
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Display::Text(s) => Some(s),
            Display::Error => None,
        }
    }

    fn initial() -> Display {
        Display::Text("0".to_string())
    }
}

/// Token handed out when an error lands on the display
///
/// `Engine::recover` resets the engine only if no other action has run
/// since the token was issued, so a stale timer can never clobber
/// newer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryToken(u64);

/// The calculator state machine
pub struct Engine {
    /// Left operand of the pending operation
    first: Option<f64>,
    /// Pending binary operator
    op: Option<Op>,
    /// Raw textual accumulation of the right operand
    second: String,
    /// An operator was chosen but no right-operand digit typed yet
    awaiting_second: bool,
    /// `equals` just produced a result; the next digit starts fresh
    just_computed: bool,
    display: Display,
    history: History,
    /// Bumped by every state change; stale recovery timers check it
    epoch: u64,
}

impl Engine {
    /// Create an engine in the initial state
    pub fn new() -> Engine {
        Engine {
            first: None,
            op: None,
            second: String::new(),
            awaiting_second: false,
            just_computed: false,
            display: Display::initial(),
            history: History::new(),
            epoch: 0,
        }
    }

    // === Accessors ===

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Generation counter; every state change bumps it
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn touch(&mut self) {
        self.epoch += 1;
    }

    /// Render the pending expression, e.g. `5 + 3` or `5 +`
    fn render_pending(&self, op: Op) -> String {
        let first = format_number(self.first.unwrap_or(0.0));
        if self.second.is_empty() {
            format!("{} {}", first, op.glyph())
        } else {
            format!("{} {} {}", first, op.glyph(), self.second)
        }
    }

    // === Actions ===

    /// Enter one digit
    ///
    /// Digits are rejected without any state change once the active
    /// operand's text reaches the length ceiling.
    pub fn digit(&mut self, d: char) {
        if !d.is_ascii_digit() {
            return;
        }

        if let Some(op) = self.op {
            if self.awaiting_second {
                self.second.clear();
                self.second.push(d);
                self.awaiting_second = false;
            } else if self.second == "0" {
                self.second.clear();
                self.second.push(d);
            } else {
                if self.second.len() >= MAX_OPERAND_LEN {
                    return;
                }
                self.second.push(d);
            }
            self.display = Display::Text(self.render_pending(op));
            self.touch();
            return;
        }

        // An error display or a just-computed result gives way to a
        // fresh entry
        if self.just_computed || self.display == Display::Error {
            self.display = Display::Text(d.to_string());
            self.just_computed = false;
            self.touch();
            return;
        }

        if let Display::Text(text) = &mut self.display {
            if text.as_str() == "0" {
                *text = d.to_string();
            } else {
                if text.len() >= MAX_OPERAND_LEN {
                    return;
                }
                text.push(d);
            }
            self.touch();
        }
    }

    /// Enter the decimal point
    ///
    /// Routes to whichever operand is active; at most one decimal
    /// point per operand. An empty or fresh operand is seeded with
    /// `0.`.
    pub fn decimal_point(&mut self) {
        if let Some(op) = self.op {
            if self.awaiting_second {
                self.second.clear();
                self.second.push_str("0.");
                self.awaiting_second = false;
            } else if !self.second.contains('.') {
                if self.second.is_empty() {
                    self.second.push_str("0.");
                } else {
                    self.second.push('.');
                }
            } else {
                return;
            }
            self.display = Display::Text(self.render_pending(op));
            self.touch();
            return;
        }

        if self.just_computed || self.display == Display::Error {
            self.display = Display::Text("0.".to_string());
            self.just_computed = false;
            self.touch();
            return;
        }

        if let Display::Text(text) = &mut self.display {
            if !text.contains('.') {
                text.push('.');
                self.touch();
            }
        }
    }

    /// Choose a binary operator, resolving any pending operation first
    ///
    /// When an operator is already active and a second operand has
    /// been typed, the pending operation resolves exactly as `equals`
    /// would (including the history entry). If that resolution fails,
    /// the newly requested operator is discarded and the recovery
    /// token is passed through.
    pub fn operator(&mut self, next: Op) -> Option<RecoveryToken> {
        let had_pending = self.op.is_some();
        if had_pending && !self.second.is_empty() {
            // The resolution leaves its raw result in `first`
            let token = self.equals();
            if token.is_some() {
                return token;
            }
        } else if !had_pending {
            // No pending operation: the display text is the left
            // operand. An unparsable display (the error state) makes
            // this a no-op.
            match self.display.as_text().and_then(parse_operand) {
                Some(v) => self.first = Some(v),
                None => return None,
            }
        }

        self.op = Some(next);
        self.awaiting_second = true;
        self.second.clear();
        self.just_computed = false;
        self.display = Display::Text(self.render_pending(next));
        self.touch();
        None
    }

    /// Apply percent semantics to the active operand
    ///
    /// With a pending operator and a typed second operand, the second
    /// operand becomes `first * second / 100` and the displayed text
    /// gains a `%` marker without resolving the operation. With no
    /// operator, the display is replaced by `value / 100` immediately.
    pub fn percent(&mut self) {
        let text = match self.display.as_text() {
            Some(t) => t.to_string(),
            None => return,
        };
        if text.contains('%') || text == "0" {
            return;
        }

        if self.op.is_some() {
            let first = match self.first {
                Some(v) => v,
                None => return,
            };
            let second = match parse_operand(&self.second) {
                Some(v) => v,
                None => return,
            };
            self.second = format_number(first * second / 100.0);
            self.display = Display::Text(format!("{}%", text));
            self.touch();
        } else {
            let value = match parse_operand(&text) {
                Some(v) => v,
                None => return,
            };
            self.display = Display::Text(format_number(value / 100.0));
            self.just_computed = true;
            self.touch();
        }
    }

    /// Resolve the pending operation
    ///
    /// No-op while no operator is active or no second-operand digit
    /// has been typed. Returns a recovery token when the computation
    /// failed and the display now shows the error state; the caller
    /// schedules `recover` with it.
    pub fn equals(&mut self) -> Option<RecoveryToken> {
        let op = match self.op {
            Some(op) => op,
            None => return None,
        };
        if self.awaiting_second {
            return None;
        }

        let first = self.first.unwrap_or(0.0);
        let (v2, right_text) = if self.second.is_empty() {
            let text = match self.display.as_text() {
                Some(t) => t.to_string(),
                None => return None,
            };
            match parse_operand(&text) {
                Some(v) => (v, text),
                None => return None,
            }
        } else {
            match parse_operand(&self.second) {
                Some(v) => (v, self.second.clone()),
                None => return None,
            }
        };

        match compute(first, v2, op) {
            Ok(result) => {
                self.history.push(Calculation {
                    left: first,
                    op,
                    right: right_text,
                    result,
                });
                self.display = Display::Text(format_number(result));
                self.first = Some(result);
                self.op = None;
                self.second.clear();
                self.awaiting_second = false;
                self.just_computed = true;
                self.touch();
                None
            }
            Err(_) => Some(self.fail()),
        }
    }

    /// Delete the last character of the active operand
    ///
    /// With a pending operator this edits the second operand; the
    /// display never goes blank, it falls back to `0`.
    pub fn backspace(&mut self) {
        if let Some(op) = self.op {
            if self.second.is_empty() {
                // `{first} {op}` has no editable digit
                return;
            }
            self.second.pop();
            self.display = Display::Text(self.render_pending(op));
            self.touch();
            return;
        }

        if let Display::Text(text) = &mut self.display {
            if text.len() <= 1 {
                *text = "0".to_string();
            } else {
                text.pop();
                // A bare sign is not a number
                if text.as_str() == "-" {
                    *text = "0".to_string();
                }
            }
            self.touch();
        }
    }

    /// Reset every field to its initial value, including history
    pub fn clear(&mut self) {
        self.first = None;
        self.op = None;
        self.second.clear();
        self.awaiting_second = false;
        self.just_computed = false;
        self.display = Display::initial();
        self.history.clear();
        self.touch();
    }

    /// Deferred error recovery
    ///
    /// Resets the engine only if it is still in the exact error state
    /// the token was issued for; any intervening action makes the
    /// token stale and this call a no-op.
    pub fn recover(&mut self, token: RecoveryToken) {
        if self.epoch == token.0 && self.display == Display::Error {
            self.clear();
        }
    }

    /// Dispatch one action
    pub fn apply(&mut self, action: Action) -> Option<RecoveryToken> {
        match action {
            Action::Digit(d) => {
                self.digit(d);
                None
            }
            Action::Decimal => {
                self.decimal_point();
                None
            }
            Action::Operator(op) => self.operator(op),
            Action::Percent => {
                self.percent();
                None
            }
            Action::Equals => self.equals(),
            Action::Backspace => {
                self.backspace();
                None
            }
            Action::Clear => {
                self.clear();
                None
            }
        }
    }

    /// Land in the error state and hand back the matching token
    fn fail(&mut self) -> RecoveryToken {
        self.display = Display::Error;
        self.first = None;
        self.op = None;
        self.second.clear();
        self.awaiting_second = false;
        self.just_computed = false;
        self.touch();
        RecoveryToken(self.epoch)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

/// Serializable snapshot of the engine state for the frontend
#[derive(Clone, Serialize)]
pub struct Snapshot {
    /// Raw display text; empty when `error` is set
    pub display: String,
    /// The display is showing the error state
    pub error: bool,
    /// Completed calculations, oldest first
    pub history: Vec<Calculation>,
}

// ============================================================================
// WASM bindings for JavaScript interop
// ============================================================================

/// JavaScript-facing calculator handle
///
/// Holds the engine in shared ownership so the deferred error-recovery
/// timer can still reach it after the call that scheduled it returned.
#[wasm_bindgen]
pub struct Calculator {
    engine: Rc<RefCell<Engine>>,
}

#[wasm_bindgen]
impl Calculator {
    /// Create a calculator in the initial state
    #[wasm_bindgen(constructor)]
    pub fn new() -> Calculator {
        Calculator {
            engine: Rc::new(RefCell::new(Engine::new())),
        }
    }

    /// Enter one digit character
    #[wasm_bindgen(js_name = inputDigit)]
    pub fn input_digit(&self, digit: char) {
        self.engine.borrow_mut().digit(digit);
    }

    /// Enter the decimal point
    #[wasm_bindgen(js_name = inputDecimal)]
    pub fn input_decimal(&self) {
        self.engine.borrow_mut().decimal_point();
    }

    /// Choose an operator by its glyph or keyboard character
    #[wasm_bindgen(js_name = applyOperator)]
    pub fn apply_operator(&self, op: char) {
        if let Some(op) = Op::from_char(op) {
            let token = self.engine.borrow_mut().operator(op);
            self.schedule_recovery(token);
        }
    }

    /// Apply percent semantics to the active operand
    pub fn percent(&self) {
        self.engine.borrow_mut().percent();
    }

    /// Resolve the pending operation
    pub fn equals(&self) {
        let token = self.engine.borrow_mut().equals();
        self.schedule_recovery(token);
    }

    /// Delete the last character of the active operand
    pub fn backspace(&self) {
        self.engine.borrow_mut().backspace();
    }

    /// Reset to the initial state
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&self) {
        self.engine.borrow_mut().clear();
    }

    /// Map a keyboard key to an action and apply it
    ///
    /// Returns true when the key was consumed, so the frontend knows
    /// whether to preventDefault.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str) -> bool {
        match Action::from_key(key) {
            Some(action) => {
                let token = self.engine.borrow_mut().apply(action);
                self.schedule_recovery(token);
                true
            }
            None => false,
        }
    }

    /// Raw display text (pre visual-formatting); empty in the error state
    #[wasm_bindgen(getter)]
    pub fn display(&self) -> String {
        self.engine
            .borrow()
            .display()
            .as_text()
            .unwrap_or_default()
            .to_string()
    }

    /// Whether the display is showing the error state
    #[wasm_bindgen(getter, js_name = isError)]
    pub fn is_error(&self) -> bool {
        self.engine.borrow().display() == &Display::Error
    }

    /// Completed calculations, oldest first
    #[wasm_bindgen(js_name = historyEntries)]
    pub fn history_entries(&self) -> Result<JsValue, JsValue> {
        let engine = self.engine.borrow();
        let entries: Vec<&Calculation> = engine.history().iter().collect();
        serde_wasm_bindgen::to_value(&entries).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Full state snapshot for rendering
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let engine = self.engine.borrow();
        let snapshot = Snapshot {
            display: engine
                .display()
                .as_text()
                .unwrap_or_default()
                .to_string(),
            error: engine.display() == &Display::Error,
            history: engine.history().iter().cloned().collect(),
        };
        serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new()
    }
}

impl Calculator {
    /// Schedule the deferred auto-clear for an error display
    ///
    /// Fire-and-forget setTimeout; the token makes a stale timer a
    /// no-op once the user acts before it fires. Outside a browser
    /// context (no window) the error display simply persists until the
    /// next action.
    fn schedule_recovery(&self, token: Option<RecoveryToken>) {
        let token = match token {
            Some(t) => t,
            None => return,
        };
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let engine = Rc::clone(&self.engine);
        let callback = Closure::once_into_js(move || {
            engine.borrow_mut().recover(token);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref::<js_sys::Function>(),
            ERROR_RECOVERY_DELAY_MS,
        );
    }
}
