use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use flowcore_types::{Value, ValueBag};

/// The ephemeral per-node state a single run needs: the inputs collected
/// so far and a countdown of how many required inputs are still missing.
///
/// An atomic counter plus a plain mutex-guarded slot map is sufficient
/// because each slot is written at most once (the model guarantees a
/// single assignment per input) and the task whose `fetch_sub` brings
/// `waiting` to zero is uniquely the one responsible for spawning this
/// node.
pub struct NodeRunState {
  slots: Mutex<ValueBag>,
  waiting: AtomicI64,
}

impl NodeRunState {
  /// `optional_input_names` is pre-seeded with a null sentinel so that an
  /// optional input left uncovered by any edge or injection binding is
  /// still present in the bag the invoker receives, rather than missing
  /// from it entirely.
  pub fn new<'a>(optional_input_names: impl IntoIterator<Item = &'a str>, required_input_count: usize) -> Self {
    let mut slots = ValueBag::new();
    for name in optional_input_names {
      slots.insert(name.to_string(), Value::Json(serde_json::Value::Null));
    }
    Self {
      slots: Mutex::new(slots),
      waiting: AtomicI64::new(required_input_count as i64),
    }
  }

  pub fn set(&self, input_name: &str, value: flowcore_types::Value) {
    self.slots.lock().expect("run state lock poisoned").insert(input_name.to_string(), value);
  }

  /// Decrement the outstanding-required-input counter. Returns `true` for
  /// the single caller whose decrement brought it to zero — that caller is
  /// responsible for spawning the node's task.
  pub fn decrement_and_check_ready(&self) -> bool {
    self.waiting.fetch_sub(1, Ordering::SeqCst) == 1
  }

  pub fn is_ready_without_decrementing(&self) -> bool {
    self.waiting.load(Ordering::SeqCst) <= 0
  }

  pub fn take_inputs(&self) -> ValueBag {
    self.slots.lock().expect("run state lock poisoned").clone()
  }
}
