use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use flowcore_model::PipelineModel;
use flowcore_registry::ComponentRegistry;
use flowcore_types::{NodeId, Value, ValueBag};
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::ExecutionError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::run_state::NodeRunState;

/// What a run produced once its event stream has been fully drained.
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
  pub total_nodes: usize,
  pub completed_nodes: usize,
}

struct RunContext<N: ExecutionNotifier> {
  model: Arc<PipelineModel>,
  registry: Arc<ComponentRegistry>,
  states: HashMap<NodeId, Arc<NodeRunState>>,
  sender: mpsc::Sender<ExecutionEvent>,
  notifier: Arc<N>,
  cancel: CancellationToken,
  completed: AtomicUsize,
}

impl<N: ExecutionNotifier> RunContext<N> {
  async fn emit(&self, event: ExecutionEvent) {
    self.notifier.notify(&event);
    // A closed receiver means the caller dropped the stream; that's not
    // this task's problem to report, the cancellation token (set by
    // whichever sibling task fails first) is what stops further work.
    let _ = self.sender.send(event).await;
  }
}

/// Run a validated pipeline to completion, seeded with `injected` external
/// inputs and observed through `notifier`.
///
/// Returns immediately with a stream of [`ExecutionEvent`]s (bounded at
/// `2 * node_count`, per the backpressure requirement of a run whose
/// events are produced at most twice per node) and a handle whose result is
/// only meaningful after the stream has been fully drained.
pub fn run<N: ExecutionNotifier>(
  model: Arc<PipelineModel>,
  registry: Arc<ComponentRegistry>,
  injected: ValueBag,
  notifier: Arc<N>,
  cancel: CancellationToken,
) -> (ReceiverStream<ExecutionEvent>, JoinHandle<Result<RunOutcome, ExecutionError>>) {
  let total_nodes = model.len();
  let buffer = (2 * total_nodes).max(1);
  let (sender, receiver) = mpsc::channel(buffer);

  let handle = tokio::spawn(run_to_completion(model, registry, injected, notifier, cancel, sender));

  (ReceiverStream::new(receiver), handle)
}

/// Convenience wrapper over [`run`] for callers with no observability
/// side-channel.
pub fn run_default(
  model: Arc<PipelineModel>,
  registry: Arc<ComponentRegistry>,
  injected: ValueBag,
  cancel: CancellationToken,
) -> (ReceiverStream<ExecutionEvent>, JoinHandle<Result<RunOutcome, ExecutionError>>) {
  run(model, registry, injected, Arc::new(NoopNotifier), cancel)
}

async fn run_to_completion<N: ExecutionNotifier>(
  model: Arc<PipelineModel>,
  registry: Arc<ComponentRegistry>,
  injected: ValueBag,
  notifier: Arc<N>,
  cancel: CancellationToken,
  sender: mpsc::Sender<ExecutionEvent>,
) -> Result<RunOutcome, ExecutionError> {
  let total_nodes = model.len();
  info!(total_nodes, "starting pipeline run");

  let mut states = HashMap::with_capacity(total_nodes);
  for (id, node) in model.nodes() {
    let descriptor = registry
      .lookup(&node.component_name)
      .expect("model construction already validated every component exists");
    states.insert(
      id.clone(),
      Arc::new(NodeRunState::new(descriptor.optional_input_names(), descriptor.required_input_names().count())),
    );
  }

  // Seed injected inputs. A required input missing from `injected` is a
  // runtime error distinct from the model's build-time check, which only
  // verifies a binding *exists* — not that the caller actually supplied a
  // value for it this run.
  for (param, (node_id, input_name)) in model.injection_bindings() {
    let node = model.node(node_id).expect("model construction validated injection targets");
    let descriptor = registry.lookup(&node.component_name).expect("validated at construction");
    let input_spec = descriptor.input(input_name).expect("validated at construction");

    match injected.get(param) {
      Some(value) => {
        let state = &states[node_id];
        state.set(input_name, value.clone());
        if input_spec.required {
          state.decrement_and_check_ready();
        }
      }
      None if input_spec.required => {
        error!(%node_id, input_name, param, "missing injected input");
        return Err(ExecutionError::MissingInjectedInput {
          node_id: node_id.clone(),
          input_name: input_name.clone(),
        });
      }
      None => {}
    }
  }

  for param in injected.keys() {
    if !model.injection_bindings().contains_key(param) {
      warn!(param, "injected input has no matching binding in the pipeline");
    }
  }

  let ctx = Arc::new(RunContext {
    model: model.clone(),
    registry,
    states,
    sender,
    notifier,
    cancel,
    completed: AtomicUsize::new(0),
  });

  let handles: Vec<JoinHandle<Result<(), ExecutionError>>> = model
    .begin_nodes()
    .iter()
    .cloned()
    .map(|id| tokio::spawn(run_node(id, ctx.clone())))
    .collect();

  let results = join_all(handles).await;
  let mut first_error = None;
  for result in results {
    match result {
      Ok(Ok(())) => {}
      Ok(Err(e)) => first_error.get_or_insert(e),
      Err(join_err) => first_error.get_or_insert(ExecutionError::Join(join_err)),
    };
  }

  let completed_nodes = ctx.completed.load(Ordering::SeqCst);
  match first_error {
    Some(e) => {
      error!(error = %e, completed_nodes, total_nodes, "pipeline run failed");
      Err(e)
    }
    None => {
      info!(completed_nodes, total_nodes, "pipeline run completed");
      Ok(RunOutcome { total_nodes, completed_nodes })
    }
  }
}

async fn run_node<N: ExecutionNotifier>(node_id: NodeId, ctx: Arc<RunContext<N>>) -> Result<(), ExecutionError> {
  if ctx.cancel.is_cancelled() {
    return Err(ExecutionError::Cancelled);
  }

  let node = ctx.model.node(&node_id).expect("ready nodes always exist in the model");
  let descriptor = ctx
    .registry
    .lookup(&node.component_name)
    .expect("model construction already validated every component exists");
  let state = ctx.states.get(&node_id).expect("state built for every node");
  let inputs = state.take_inputs();

  info!(%node_id, component = %node.component_name, "node started");

  let outputs = match descriptor.invoker.invoke(&inputs).await {
    Ok(outputs) => outputs,
    Err(source) => {
      let error = ExecutionError::Invoker { node_id: node_id.clone(), source };
      ctx
        .emit(ExecutionEvent::NodeFailed {
          node_id: node_id.clone(),
          timestamp: Utc::now(),
          error: error.to_string(),
        })
        .await;
      ctx.cancel.cancel();
      return Err(error);
    }
  };

  if let Some(surface) = &node.output_surface_name {
    ctx
      .emit(ExecutionEvent::OutputInfo {
        node_id: node_id.clone(),
        timestamp: Utc::now(),
        output_surface_name: surface.clone(),
        data: outputs.clone(),
      })
      .await;
  }
  ctx
    .emit(ExecutionEvent::ProcessInfo {
      node_id: node_id.clone(),
      timestamp: Utc::now(),
      data: outputs.clone(),
    })
    .await;
  ctx.completed.fetch_add(1, Ordering::SeqCst);
  info!(%node_id, "node finished");

  let mut children = Vec::new();
  for edge in &node.forwards {
    let value = outputs
      .get(&edge.from_output_name)
      .cloned()
      .unwrap_or(Value::Json(serde_json::Value::Null));

    let target_node = ctx.model.node(&edge.to_node_id).expect("validated at construction");
    let target_descriptor = ctx
      .registry
      .lookup(&target_node.component_name)
      .expect("validated at construction");
    let input_spec = target_descriptor.input(&edge.to_node_input_name).expect("validated at construction");

    if !input_spec.allowed_types.contains(&value.io_type()) {
      let error = ExecutionError::TypeMismatch {
        to_node: edge.to_node_id.clone(),
        to_input: edge.to_node_input_name.clone(),
        produced: value.io_type(),
      };
      ctx
        .emit(ExecutionEvent::NodeFailed {
          node_id: edge.to_node_id.clone(),
          timestamp: Utc::now(),
          error: error.to_string(),
        })
        .await;
      ctx.cancel.cancel();
      return Err(error);
    }

    let target_state = ctx.states.get(&edge.to_node_id).expect("state built for every node");
    target_state.set(&edge.to_node_input_name, value);
    if input_spec.required && target_state.decrement_and_check_ready() {
      children.push(tokio::spawn(run_node(edge.to_node_id.clone(), ctx.clone())));
    }
  }

  for child in children {
    match child.await {
      Ok(Ok(())) => {}
      Ok(Err(e)) => return Err(e),
      Err(join_err) => return Err(ExecutionError::Join(join_err)),
    }
  }

  Ok(())
}
