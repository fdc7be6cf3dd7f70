//! Integration tests exercising the full registry -> model -> engine
//! pipeline end to end.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use flowcore_engine::{ExecutionEvent, ExecutionError, run_default};
use flowcore_model::{NodeConnection, PipelineModel, PipelineNode};
use flowcore_registry::{ComponentDescriptor, ComponentError, ComponentRegistry, InputSpec, Invoker, OutputSpec};
use flowcore_types::{IOType, NodeId, Value, ValueBag};
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

struct Constant(Value);

#[async_trait]
impl Invoker for Constant {
  async fn invoke(&self, _inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    let mut out = ValueBag::new();
    out.insert("value".to_string(), self.0.clone());
    Ok(out)
  }
}

struct Concat;

#[async_trait]
impl Invoker for Concat {
  async fn invoke(&self, inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    let left = match inputs.get("left") {
      Some(Value::String(s)) => s.clone(),
      _ => String::new(),
    };
    let right = match inputs.get("right") {
      Some(Value::String(s)) => s.clone(),
      _ => String::new(),
    };
    let mut out = ValueBag::new();
    out.insert("joined".to_string(), Value::String(format!("{left}{right}")));
    Ok(out)
  }
}

struct Failing;

#[async_trait]
impl Invoker for Failing {
  async fn invoke(&self, _inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    Err(ComponentError::new("boom"))
  }
}

struct Slow(Duration);

#[async_trait]
impl Invoker for Slow {
  async fn invoke(&self, _inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    tokio::time::sleep(self.0).await;
    let mut out = ValueBag::new();
    out.insert("value".to_string(), Value::Bool(true));
    Ok(out)
  }
}

fn register(registry: &ComponentRegistry, descriptor: ComponentDescriptor) {
  registry.register(descriptor).unwrap();
}

/// A diamond pipeline (two independent sources feeding one sink) produces
/// exactly `n` `ProcessInfo` events, one per node, with every node's
/// `OutputInfo` (when it has one) preceding its own `ProcessInfo`.
#[tokio::test]
async fn diamond_pipeline_runs_to_completion() {
  let registry = ComponentRegistry::new();
  register(
    &registry,
    ComponentDescriptor {
      name: "left_source".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![],
      outputs: vec![OutputSpec::new("value", IOType::String)],
      invoker: Arc::new(Constant(Value::String("hello-".to_string()))),
    },
  );
  register(
    &registry,
    ComponentDescriptor {
      name: "right_source".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![],
      outputs: vec![OutputSpec::new("value", IOType::String)],
      invoker: Arc::new(Constant(Value::String("world".to_string()))),
    },
  );
  register(
    &registry,
    ComponentDescriptor {
      name: "concat".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![
        InputSpec::required("left", [IOType::String]),
        InputSpec::required("right", [IOType::String]),
      ],
      outputs: vec![OutputSpec::new("joined", IOType::String)],
      invoker: Arc::new(Concat),
    },
  );

  let nodes = vec![
    PipelineNode::new("a", "left_source").forward(NodeConnection {
      from_output_name: "value".to_string(),
      to_node_id: NodeId::from("c"),
      to_node_input_name: "left".to_string(),
    }),
    PipelineNode::new("b", "right_source").forward(NodeConnection {
      from_output_name: "value".to_string(),
      to_node_id: NodeId::from("c"),
      to_node_input_name: "right".to_string(),
    }),
    PipelineNode::new("c", "concat").surfaced_as("joined_result"),
  ];

  let model = Arc::new(PipelineModel::new(nodes, HashMap::new(), &registry).unwrap());
  let (mut events, handle) = run_default(model, Arc::new(registry), ValueBag::new(), CancellationToken::new());

  let mut process_infos = 0;
  let mut output_before_process: HashMap<NodeId, bool> = HashMap::new();
  while let Some(event) = events.next().await {
    match &event {
      ExecutionEvent::OutputInfo { node_id, .. } => {
        output_before_process.insert(node_id.clone(), true);
      }
      ExecutionEvent::ProcessInfo { node_id, .. } => {
        process_infos += 1;
        if node_id.as_str() == "c" {
          assert!(output_before_process.get(node_id).copied().unwrap_or(false));
        }
      }
      ExecutionEvent::NodeFailed { .. } => panic!("no node should fail in this test"),
    }
  }

  assert_eq!(process_infos, 3);
  let outcome = handle.await.unwrap().unwrap();
  assert_eq!(outcome.completed_nodes, 3);
  assert_eq!(outcome.total_nodes, 3);
}

/// A required input covered by an injection binding is filled from the
/// caller-supplied map at run time, not at model construction time.
#[tokio::test]
async fn external_injection_feeds_a_required_input() {
  let registry = ComponentRegistry::new();
  register(
    &registry,
    ComponentDescriptor {
      name: "echo".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![InputSpec::required("text", [IOType::String])],
      outputs: vec![OutputSpec::new("text", IOType::String)],
      invoker: Arc::new(EchoInvoker),
    },
  );

  let nodes = vec![PipelineNode::new("n", "echo").surfaced_as("echoed")];
  let mut bindings = HashMap::new();
  bindings.insert("greeting".to_string(), (NodeId::from("n"), "text".to_string()));
  let model = Arc::new(PipelineModel::new(nodes, bindings, &registry).unwrap());

  let mut injected = ValueBag::new();
  injected.insert("greeting".to_string(), Value::String("hi".to_string()));

  let (mut events, handle) = run_default(model, Arc::new(registry), injected, CancellationToken::new());
  let mut saw_process = false;
  while let Some(event) = events.next().await {
    if let ExecutionEvent::ProcessInfo { data, .. } = &event {
      saw_process = true;
      assert_eq!(data.get("text"), Some(&Value::String("hi".to_string())));
    }
  }
  assert!(saw_process);
  handle.await.unwrap().unwrap();
}

/// A required injection whose external parameter is never supplied is a
/// run-time `MissingInjectedInput` failure, not a panic.
#[tokio::test]
async fn missing_injected_input_fails_cleanly() {
  let registry = ComponentRegistry::new();
  register(
    &registry,
    ComponentDescriptor {
      name: "echo".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![InputSpec::required("text", [IOType::String])],
      outputs: vec![OutputSpec::new("text", IOType::String)],
      invoker: Arc::new(EchoInvoker),
    },
  );
  let nodes = vec![PipelineNode::new("n", "echo")];
  let mut bindings = HashMap::new();
  bindings.insert("greeting".to_string(), (NodeId::from("n"), "text".to_string()));
  let model = Arc::new(PipelineModel::new(nodes, bindings, &registry).unwrap());

  let (mut events, handle) = run_default(model, Arc::new(registry), ValueBag::new(), CancellationToken::new());
  assert!(events.next().await.is_none(), "no node should have been ready to run");
  let err = handle.await.unwrap().unwrap_err();
  assert!(matches!(err, ExecutionError::MissingInjectedInput { .. }));
}

/// An optional input with no edge and no injection binding simply runs
/// without it.
#[tokio::test]
async fn optional_input_left_unset_does_not_block_the_node() {
  let registry = ComponentRegistry::new();
  register(
    &registry,
    ComponentDescriptor {
      name: "greeter".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![InputSpec::optional("title", [IOType::String])],
      outputs: vec![OutputSpec::new("greeting", IOType::String)],
      invoker: Arc::new(Constant(Value::String("hello".to_string()))),
    },
  );
  let nodes = vec![PipelineNode::new("n", "greeter")];
  let model = Arc::new(PipelineModel::new(nodes, HashMap::new(), &registry).unwrap());
  let (mut events, handle) = run_default(model, Arc::new(registry), ValueBag::new(), CancellationToken::new());

  let mut count = 0;
  while events.next().await.is_some() {
    count += 1;
  }
  assert_eq!(count, 1);
  handle.await.unwrap().unwrap();
}

/// An optional input left uncovered by any edge or injection binding is
/// still present in the bag the invoker receives, as a null sentinel —
/// not simply absent from the map.
#[tokio::test]
async fn uncovered_optional_input_is_passed_as_null() {
  let registry = ComponentRegistry::new();
  register(
    &registry,
    ComponentDescriptor {
      name: "echo".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![InputSpec::optional("title", [IOType::String])],
      outputs: vec![],
      invoker: Arc::new(EchoInvoker),
    },
  );
  let nodes = vec![PipelineNode::new("n", "echo")];
  let model = Arc::new(PipelineModel::new(nodes, HashMap::new(), &registry).unwrap());
  let (mut events, handle) = run_default(model, Arc::new(registry), ValueBag::new(), CancellationToken::new());

  let mut saw_process = false;
  while let Some(event) = events.next().await {
    if let ExecutionEvent::ProcessInfo { data, .. } = &event {
      saw_process = true;
      assert_eq!(data.get("title"), Some(&Value::Json(serde_json::Value::Null)));
    }
  }
  assert!(saw_process);
  handle.await.unwrap().unwrap();
}

/// An invoker failure aborts the run with the underlying error and a
/// `NodeFailed` event, rather than hanging or panicking.
#[tokio::test]
async fn invoker_failure_terminates_the_run() {
  let registry = ComponentRegistry::new();
  register(
    &registry,
    ComponentDescriptor {
      name: "boom".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![],
      outputs: vec![],
      invoker: Arc::new(Failing),
    },
  );
  let nodes = vec![PipelineNode::new("n", "boom")];
  let model = Arc::new(PipelineModel::new(nodes, HashMap::new(), &registry).unwrap());
  let (mut events, handle) = run_default(model, Arc::new(registry), ValueBag::new(), CancellationToken::new());

  let mut saw_failure = false;
  while let Some(event) = events.next().await {
    if matches!(event, ExecutionEvent::NodeFailed { .. }) {
      saw_failure = true;
    }
  }
  assert!(saw_failure);
  let err = handle.await.unwrap().unwrap_err();
  assert!(matches!(err, ExecutionError::Invoker { .. }));
}

/// Two nodes with no dependency between them run concurrently, not
/// sequentially: total wall-clock is close to one node's delay, not two.
#[tokio::test(flavor = "multi_thread")]
async fn independent_nodes_run_concurrently() {
  let registry = ComponentRegistry::new();
  let delay = Duration::from_millis(80);
  register(
    &registry,
    ComponentDescriptor {
      name: "slow".to_string(),
      description: String::new(),
      is_official: true,
      enable_type_check: false,
      inputs: vec![],
      outputs: vec![OutputSpec::new("value", IOType::Bool)],
      invoker: Arc::new(Slow(delay)),
    },
  );
  let nodes = vec![PipelineNode::new("a", "slow"), PipelineNode::new("b", "slow")];
  let model = Arc::new(PipelineModel::new(nodes, HashMap::new(), &registry).unwrap());

  let start = Instant::now();
  let (mut events, handle) = run_default(model, Arc::new(registry), ValueBag::new(), CancellationToken::new());
  while events.next().await.is_some() {}
  handle.await.unwrap().unwrap();

  assert!(start.elapsed() < delay * 2, "nodes should overlap, not run back-to-back");
}

struct EchoInvoker;

#[async_trait]
impl Invoker for EchoInvoker {
  async fn invoke(&self, inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    Ok(inputs.clone())
  }
}
